//! The RepoServer: access-controlled front of a repository store.
//!
//! Every web download goes through the shared [`AccessPolicy`]. Uploads and
//! administrative operations are trusted callers and skip it.

use std::collections::BTreeSet;
use std::net::IpAddr;
use std::sync::Arc;

use bytes::Bytes;

use gridrepo_core::FileAddress;
use gridrepo_perms::{AccessDecision, AccessPolicy, ClientIdentity, HostResolver, IdentityResolver};
use gridrepo_store::{FileStore, PutResult, StoredFile};
use gridrepo_sync::{MirrorConfig, MirrorReport, MirrorSession, MirrorTarget};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};

/// Where a request came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOrigin {
    /// Public web tier, identified by the peer address. The identity is
    /// derived through reverse DNS when enabled.
    Web(IpAddr),
    /// Public web tier behind a front end that already reports the remote
    /// host, either as a literal IP or a host name.
    RemoteHost(String),
    /// Internal call with no client identity. Never access checked.
    Internal,
}

/// The main server struct.
pub struct RepoServer<S: FileStore> {
    store: Arc<S>,
    policy: Arc<AccessPolicy>,
    identity: IdentityResolver,
    mirror: MirrorConfig,
}

impl<S: FileStore> RepoServer<S> {
    /// Create a server from already-built parts.
    pub fn new(
        store: S,
        policy: Arc<AccessPolicy>,
        identity: IdentityResolver,
        mirror: MirrorConfig,
    ) -> Self {
        Self {
            store: Arc::new(store),
            policy,
            identity,
            mirror,
        }
    }

    /// Create a server from configuration.
    ///
    /// Without a `resolver` every web caller is identified by literal IP.
    pub fn from_config(
        store: S,
        config: &ServerConfig,
        resolver: Option<Arc<dyn HostResolver>>,
    ) -> Result<Self> {
        config.validate()?;
        let policy = AccessPolicy::from_config(&config.security)?;
        let identity = match resolver {
            Some(resolver) => IdentityResolver::new(resolver, config.identity.clone()),
            None => IdentityResolver::literal_ip(),
        };
        Ok(Self::new(store, Arc::new(policy), identity, config.mirror.clone()))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The shared policy, for components running beside the server.
    pub fn policy(&self) -> &Arc<AccessPolicy> {
        &self.policy
    }

    // ─────────────────────────────────────────────────────────────────────────
    // File Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Serve the file at `path` (`repository/architecture/filename`).
    ///
    /// The access check runs before the lookup, so a denied caller cannot
    /// learn whether a protected file exists.
    pub async fn download(&self, path: &str, origin: &RequestOrigin) -> Result<StoredFile> {
        let address = FileAddress::parse(path)?;
        let identity = self.identify(origin).await;

        if let AccessDecision::Deny(reason) = self.policy.evaluate(&address, identity.as_ref()) {
            return Err(ServerError::Forbidden {
                path: address.canonical_path(),
                reason,
            });
        }

        self.store
            .get_file(&address)
            .await?
            .ok_or_else(|| ServerError::NotFound(address.canonical_path()))
    }

    /// Store `content` at `path`.
    pub async fn upload(&self, path: &str, content: impl Into<Bytes>) -> Result<PutResult> {
        let address = FileAddress::parse(path)?;
        let result = self.store.put_file(StoredFile::new(address, content)).await?;
        tracing::debug!(path, ?result, "file uploaded");
        Ok(result)
    }

    async fn identify(&self, origin: &RequestOrigin) -> Option<ClientIdentity> {
        match origin {
            RequestOrigin::Web(ip) => Some(self.identity.resolve(*ip).await),
            RequestOrigin::RemoteHost(host) => Some(ClientIdentity::classify(host)),
            RequestOrigin::Internal => None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Repository Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Administrative access to the protected set.
    pub fn admin(&self) -> Admin<'_> {
        Admin {
            policy: &self.policy,
        }
    }

    /// Replicate every unprotected repository to `target`.
    pub async fn mirror_to<T: MirrorTarget + ?Sized>(&self, target: &T) -> Result<MirrorReport> {
        let session = MirrorSession::new(
            self.store.as_ref(),
            target,
            Arc::clone(&self.policy),
            self.mirror.clone(),
        );
        Ok(session.run().await?)
    }

    /// Rename a repository. Protection follows the files to the new name.
    ///
    /// The new name is protected before any file moves, so no file of a
    /// protected repository is ever reachable under an unprotected name. If
    /// the rename then fails, the new name stays protected.
    pub async fn rename_repository(&self, from: &str, to: &str) -> Result<usize> {
        if to.trim().is_empty() {
            return Err(ServerError::BadRequest("repository name is blank".into()));
        }
        if self.policy.is_protected(from) {
            self.policy.add_protected_repo(to);
        }
        Ok(self.store.rename_repository(from, to).await?)
    }

    /// Move a package between repositories. Returns the filename moved,
    /// which for a bare package name is its newest version.
    ///
    /// Refused when `source` is protected and `destination` is not.
    pub async fn propagate_package(
        &self,
        package: &str,
        source: &str,
        destination: &str,
        architecture: &str,
    ) -> Result<String> {
        self.ensure_protection_kept(source, destination)?;
        Ok(gridrepo_sync::propagate_package(
            self.store.as_ref(),
            package,
            source,
            destination,
            architecture,
        )
        .await?)
    }

    /// Move every package of one repository into another. Returns the
    /// number of files moved.
    ///
    /// Refused when `source` is protected and `destination` is not.
    pub async fn propagate_repository(&self, source: &str, destination: &str) -> Result<usize> {
        self.ensure_protection_kept(source, destination)?;
        Ok(gridrepo_sync::propagate_repository(self.store.as_ref(), source, destination).await?)
    }

    fn ensure_protection_kept(&self, source: &str, destination: &str) -> Result<()> {
        if self.policy.is_protected(source) && !self.policy.is_protected(destination) {
            tracing::warn!(from = source, to = destination, "propagation out of a protected repository refused");
            return Err(ServerError::ProtectionDowngrade {
                protected: source.to_owned(),
                destination: destination.to_owned(),
            });
        }
        Ok(())
    }
}

/// Administrative view of the access policy.
pub struct Admin<'a> {
    policy: &'a AccessPolicy,
}

impl Admin<'_> {
    /// Protect another repository. Returns `false` if it already was
    /// protected or the name is blank.
    pub fn add_protected_repo(&self, repository: &str) -> bool {
        self.policy.add_protected_repo(repository)
    }

    pub fn protected_repos(&self) -> BTreeSet<String> {
        self.policy.protected_repos()
    }
}
