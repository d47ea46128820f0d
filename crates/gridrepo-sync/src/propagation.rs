//! Propagation between repositories.
//!
//! Promotes packages, for example from a staging repository to a release
//! one, by moving their files under the destination repository. A
//! repository exists once it holds any file; a published repository always
//! holds at least its `repodata`.

use gridrepo_core::{latest_rpm, FileAddress};
use gridrepo_store::{FileStore, FileStoreExt};

use crate::error::{Result, SyncError};

/// Move one package from `source/architecture` to
/// `destination/architecture`.
///
/// `package` is either an exact filename or a bare package name, which
/// resolves to the newest `name-version-release.arch.rpm` of that name.
/// Returns the filename that was moved.
pub async fn propagate_package<S: FileStore + ?Sized>(
    store: &S,
    package: &str,
    source: &str,
    destination: &str,
    architecture: &str,
) -> Result<String> {
    ensure_repositories(store, source, destination).await?;

    let exact = FileAddress::new(source, architecture, package)?;
    let from = if store.has_file(&exact).await? {
        exact
    } else {
        resolve_latest(store, package, source, architecture)
            .await?
            .ok_or_else(|| SyncError::PackageNotFound(exact.canonical_path()))?
    };
    let to = FileAddress::new(destination, architecture, from.filename())?;

    store.move_file(&from, &to).await?;
    tracing::info!(package = from.filename(), from = source, to = destination, arch = architecture, "package propagated");

    Ok(to.filename().to_owned())
}

/// Move every package of `source`, in every architecture, to
/// `destination`. Repository metadata stays where it is. Returns the
/// number of files moved.
pub async fn propagate_repository<S: FileStore + ?Sized>(
    store: &S,
    source: &str,
    destination: &str,
) -> Result<usize> {
    ensure_repositories(store, source, destination).await?;

    let mut moved = 0;
    for from in store.list_files(source).await? {
        if from.is_repodata() {
            continue;
        }
        let to = FileAddress::new(destination, from.architecture(), from.filename())?;
        store.move_file(&from, &to).await?;
        moved += 1;
    }

    tracing::info!(from = source, to = destination, files = moved, "repository propagated");
    Ok(moved)
}

async fn ensure_repositories<S: FileStore + ?Sized>(
    store: &S,
    source: &str,
    destination: &str,
) -> Result<()> {
    if !store.repository_exists(source).await? {
        return Err(SyncError::SourceRepositoryMissing(source.to_owned()));
    }
    if !store.repository_exists(destination).await? {
        return Err(SyncError::DestinationRepositoryMissing(destination.to_owned()));
    }
    Ok(())
}

async fn resolve_latest<S: FileStore + ?Sized>(
    store: &S,
    name: &str,
    source: &str,
    architecture: &str,
) -> Result<Option<FileAddress>> {
    let candidates: Vec<FileAddress> = store
        .list_files(source)
        .await?
        .into_iter()
        .filter(|address| address.architecture() == architecture)
        .collect();

    let latest = latest_rpm(name, candidates.iter().map(FileAddress::filename));
    Ok(latest.and_then(|filename| {
        candidates
            .iter()
            .find(|address| address.filename() == filename)
            .cloned()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridrepo_store::{MemoryStore, StoredFile};

    async fn store_with(paths: &[&str]) -> MemoryStore {
        let store = MemoryStore::new();
        for path in paths {
            store
                .put_file(StoredFile::new(FileAddress::parse(path).unwrap(), path.as_bytes().to_vec()))
                .await
                .unwrap();
        }
        store
    }

    fn addr(path: &str) -> FileAddress {
        FileAddress::parse(path).unwrap()
    }

    #[tokio::test]
    async fn test_propagate_moves_package() {
        let store = store_with(&[
            "staging/x86_64/tool-1.0-1.x86_64.rpm",
            "staging/x86_64/other-2.0-1.x86_64.rpm",
            "release/repodata/repomd.xml",
        ])
        .await;

        let name = propagate_package(&store, "tool-1.0-1.x86_64.rpm", "staging", "release", "x86_64")
            .await
            .unwrap();

        assert_eq!(name, "tool-1.0-1.x86_64.rpm");
        assert!(store.has_file(&addr("release/x86_64/tool-1.0-1.x86_64.rpm")).await.unwrap());
        assert!(!store.has_file(&addr("staging/x86_64/tool-1.0-1.x86_64.rpm")).await.unwrap());
        assert!(store.has_file(&addr("staging/x86_64/other-2.0-1.x86_64.rpm")).await.unwrap());
    }

    #[tokio::test]
    async fn test_bare_name_resolves_to_latest_version() {
        let store = store_with(&[
            "staging/noarch/package-name-1-2-5.noarch.rpm",
            "staging/noarch/package-name-1-2-4.noarch.rpm",
            "staging/noarch/package-name-1-10-1.noarch.rpm.sig",
            "staging/x86_64/package-name-1-9-1.x86_64.rpm",
            "release/repodata/repomd.xml",
        ])
        .await;

        let name = propagate_package(&store, "package-name-1", "staging", "release", "noarch")
            .await
            .unwrap();

        assert_eq!(name, "package-name-1-2-5.noarch.rpm");
        assert!(store
            .has_file(&addr("release/noarch/package-name-1-2-5.noarch.rpm"))
            .await
            .unwrap());
        assert!(store
            .has_file(&addr("staging/noarch/package-name-1-2-4.noarch.rpm"))
            .await
            .unwrap());
        assert!(store
            .has_file(&addr("staging/x86_64/package-name-1-9-1.x86_64.rpm"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_missing_repositories() {
        let store = store_with(&["staging/noarch/a.rpm"]).await;

        assert!(matches!(
            propagate_package(&store, "a.rpm", "nowhere", "staging", "noarch").await,
            Err(SyncError::SourceRepositoryMissing(repo)) if repo == "nowhere"
        ));
        assert!(matches!(
            propagate_package(&store, "a.rpm", "staging", "nowhere", "noarch").await,
            Err(SyncError::DestinationRepositoryMissing(repo)) if repo == "nowhere"
        ));
    }

    #[tokio::test]
    async fn test_missing_package() {
        let store = store_with(&["staging/noarch/a.rpm", "release/noarch/b.rpm"]).await;

        let err = propagate_package(&store, "a.rpm", "staging", "release", "x86_64")
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::PackageNotFound(path) if path == "staging/x86_64/a.rpm"));
        assert!(store.has_file(&addr("staging/noarch/a.rpm")).await.unwrap());

        assert!(matches!(
            propagate_package(&store, "tool", "staging", "release", "noarch").await,
            Err(SyncError::PackageNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_package_name() {
        let store = store_with(&["staging/noarch/a.rpm", "release/noarch/b.rpm"]).await;

        assert!(matches!(
            propagate_package(&store, "sub/a.rpm", "staging", "release", "noarch").await,
            Err(SyncError::Address(_))
        ));
    }

    #[tokio::test]
    async fn test_propagate_repository_with_one_package() {
        let store = store_with(&[
            "staging/arch/spam.rpm",
            "staging/repodata/repomd.xml",
            "release/repodata/repomd.xml",
        ])
        .await;

        assert_eq!(propagate_repository(&store, "staging", "release").await.unwrap(), 1);
        assert!(store.has_file(&addr("release/arch/spam.rpm")).await.unwrap());
        assert!(!store.has_file(&addr("staging/arch/spam.rpm")).await.unwrap());
        assert!(store.has_file(&addr("staging/repodata/repomd.xml")).await.unwrap());
    }

    #[tokio::test]
    async fn test_propagate_repository_across_architectures() {
        let store = store_with(&[
            "staging/noarch/a-1.0-1.noarch.rpm",
            "staging/x86_64/b-1.0-1.x86_64.rpm",
            "staging/i686/c-1.0-1.i686.rpm",
            "release/repodata/repomd.xml",
        ])
        .await;

        assert_eq!(propagate_repository(&store, "staging", "release").await.unwrap(), 3);
        assert_eq!(store.list_files("release").await.unwrap().len(), 4);
        assert!(!store.repository_exists("staging").await.unwrap());
    }

    #[tokio::test]
    async fn test_propagate_empty_repository() {
        let store = store_with(&["staging/repodata/repomd.xml", "release/repodata/repomd.xml"]).await;

        assert_eq!(propagate_repository(&store, "staging", "release").await.unwrap(), 0);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_propagate_repository_requires_both_repositories() {
        let store = store_with(&["staging/noarch/a.rpm"]).await;

        assert!(matches!(
            propagate_repository(&store, "nowhere", "staging").await,
            Err(SyncError::SourceRepositoryMissing(_))
        ));
        assert!(matches!(
            propagate_repository(&store, "staging", "nowhere").await,
            Err(SyncError::DestinationRepositoryMissing(_))
        ));
        assert!(store.has_file(&addr("staging/noarch/a.rpm")).await.unwrap());
    }
}
