//! Canonical file addressing.
//!
//! Every stored file is named by `repository/architecture/filename`. The
//! three segments are non-empty and contain no separator, so the canonical
//! path round-trips exactly through [`FileAddress::parse`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};
use crate::package::PackageRecord;

/// Separator between address segments.
pub const SEPARATOR: char = '/';

/// Architecture segment reserved for repository metadata (indexes).
pub const REPODATA_ARCH: &str = "repodata";

/// The three-part key of a stored file.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FileAddress {
    repository: String,
    architecture: String,
    filename: String,
}

impl FileAddress {
    /// Parse a canonical `repo/arch/filename` path.
    pub fn parse(path: &str) -> Result<Self> {
        match split_exact::<3>(path) {
            Some([repository, architecture, filename]) => Ok(Self {
                repository: repository.to_owned(),
                architecture: architecture.to_owned(),
                filename: filename.to_owned(),
            }),
            None => Err(CoreError::MalformedAddress {
                path: path.to_owned(),
            }),
        }
    }

    /// Build an address from its three segments.
    ///
    /// The segments are validated by re-parsing the joined path, so an
    /// embedded separator or an empty segment is rejected.
    pub fn new(
        repository: impl Into<String>,
        architecture: impl Into<String>,
        filename: impl Into<String>,
    ) -> Result<Self> {
        let address = Self {
            repository: repository.into(),
            architecture: architecture.into(),
            filename: filename.into(),
        };
        let path = address.canonical_path();
        if split_exact::<3>(&path).is_none() {
            return Err(CoreError::MalformedAddress { path });
        }
        Ok(address)
    }

    /// Build an address from a repository and a package's relative
    /// location, which must be exactly `arch/filename`.
    pub fn from_location(repository: &str, relative_location: &str) -> Result<Self> {
        let [architecture, filename] =
            split_exact::<2>(relative_location).ok_or_else(|| CoreError::MalformedLocation {
                href: relative_location.to_owned(),
            })?;
        validate_repository(repository)?;

        Ok(Self {
            repository: repository.to_owned(),
            architecture: architecture.to_owned(),
            filename: filename.to_owned(),
        })
    }

    /// Build an address from a stored package record.
    pub fn from_record(record: &PackageRecord) -> Result<Self> {
        Self::from_location(&record.repository, &record.location_href)
    }

    /// The canonical `repo/arch/filename` form.
    pub fn canonical_path(&self) -> String {
        format!(
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.repository, self.architecture, self.filename
        )
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn architecture(&self) -> &str {
        &self.architecture
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Whether this address names repository metadata rather than a package.
    pub fn is_repodata(&self) -> bool {
        self.architecture == REPODATA_ARCH
    }

    /// Reassign the file to another repository.
    ///
    /// Used when the owner of a stored record moves it, e.g. during a
    /// repository rename.
    pub fn set_repository(&mut self, repository: impl Into<String>) -> Result<()> {
        let repository = repository.into();
        validate_repository(&repository)?;
        self.repository = repository;
        Ok(())
    }
}

/// Split `input` on the separator into exactly `N` non-empty segments.
fn split_exact<const N: usize>(input: &str) -> Option<[&str; N]> {
    let mut segments = [""; N];
    let mut parts = input.split(SEPARATOR);
    for slot in segments.iter_mut() {
        let part = parts.next()?;
        if part.is_empty() {
            return None;
        }
        *slot = part;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(segments)
}

fn validate_repository(repository: &str) -> Result<()> {
    if repository.is_empty() || repository.contains(SEPARATOR) {
        return Err(CoreError::InvalidRepositoryName(repository.to_owned()));
    }
    Ok(())
}

impl FromStr for FileAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FileAddress {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<FileAddress> for String {
    fn from(address: FileAddress) -> Self {
        address.canonical_path()
    }
}

impl fmt::Display for FileAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.repository, self.architecture, self.filename
        )
    }
}

impl fmt::Debug for FileAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileAddress({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_three_segments() {
        let address = FileAddress::parse("base/x86_64/tool-1.0-1.x86_64.rpm").unwrap();

        assert_eq!(address.repository(), "base");
        assert_eq!(address.architecture(), "x86_64");
        assert_eq!(address.filename(), "tool-1.0-1.x86_64.rpm");
    }

    #[test]
    fn test_parse_rejects_wrong_segment_count() {
        for path in ["a/b", "a/b/c/d", "abc", "", "a/b/c/"] {
            let err = FileAddress::parse(path).unwrap_err();
            assert_eq!(
                err,
                CoreError::MalformedAddress {
                    path: path.to_string()
                }
            );
        }
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        assert!(FileAddress::parse("/noarch/file.rpm").is_err());
        assert!(FileAddress::parse("repo//file.rpm").is_err());
        assert!(FileAddress::parse("//").is_err());
    }

    #[test]
    fn test_error_mentions_offending_path() {
        let err = FileAddress::parse("only/two").unwrap_err();
        assert!(err.to_string().contains("only/two"));
    }

    #[test]
    fn test_new_rejects_separator_in_segment() {
        assert!(FileAddress::new("repo", "noarch/extra", "file.rpm").is_err());
        assert!(FileAddress::new("repo", "", "file.rpm").is_err());
        assert!(FileAddress::new("repo", "noarch", "file.rpm").is_ok());
    }

    #[test]
    fn test_from_location() {
        let address = FileAddress::from_location("updates", "noarch/pkg-2.0-1.noarch.rpm").unwrap();
        assert_eq!(address.canonical_path(), "updates/noarch/pkg-2.0-1.noarch.rpm");

        let err = FileAddress::from_location("updates", "pkg.rpm").unwrap_err();
        assert_eq!(
            err,
            CoreError::MalformedLocation {
                href: "pkg.rpm".into()
            }
        );
        assert!(FileAddress::from_location("updates", "a/b/c").is_err());
    }

    #[test]
    fn test_from_location_rejects_bad_repository() {
        assert!(matches!(
            FileAddress::from_location("", "noarch/pkg.rpm"),
            Err(CoreError::InvalidRepositoryName(_))
        ));
    }

    #[test]
    fn test_set_repository() {
        let mut address = FileAddress::parse("old/noarch/pkg.rpm").unwrap();
        address.set_repository("new").unwrap();
        assert_eq!(address.canonical_path(), "new/noarch/pkg.rpm");

        assert!(address.set_repository("bad/name").is_err());
        assert_eq!(address.repository(), "new");
    }

    #[test]
    fn test_repodata_detection() {
        assert!(FileAddress::parse("r/repodata/primary.xml.gz").unwrap().is_repodata());
        assert!(!FileAddress::parse("r/noarch/repodata.rpm").unwrap().is_repodata());
    }

    #[test]
    fn test_display_and_serde_use_canonical_path() {
        let address = FileAddress::parse("r/noarch/f.rpm").unwrap();
        assert_eq!(address.to_string(), "r/noarch/f.rpm");

        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, "\"r/noarch/f.rpm\"");
        let back: FileAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);

        assert!(serde_json::from_str::<FileAddress>("\"r/f.rpm\"").is_err());
    }

    proptest! {
        #[test]
        fn canonical_path_roundtrips(
            repo in "[a-zA-Z0-9._-]{1,24}",
            arch in "[a-zA-Z0-9_]{1,12}",
            file in "[a-zA-Z0-9._+-]{1,48}",
        ) {
            let path = format!("{repo}/{arch}/{file}");
            let address = FileAddress::parse(&path).unwrap();
            prop_assert_eq!(address.canonical_path(), path);
        }

        #[test]
        fn parse_requires_exactly_two_separators(segments in prop::collection::vec("[a-z]{1,6}", 1..7)) {
            let path = segments.join("/");
            prop_assert_eq!(FileAddress::parse(&path).is_ok(), segments.len() == 3);
        }
    }
}
