//! The access policy for protected repositories.
//!
//! A single [`AccessPolicy`] is built at startup and shared (behind an
//! `Arc`) by every request handler, the mirroring job and the
//! administrative surface. The protected set can grow at runtime; the IP
//! whitelist is fixed.

use std::collections::{BTreeSet, HashSet};
use std::net::IpAddr;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use gridrepo_core::FileAddress;

use crate::config::SecurityConfig;
use crate::error::Result;
use crate::identity::ClientIdentity;
use crate::range::IpRange;

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow(AllowReason),
    Deny(DenyReason),
}

/// Why a request was allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowReason {
    /// No client identity: the call did not come from the public web tier.
    Internal,
    /// Repository metadata is always public.
    Repodata,
    /// The repository is not protected.
    Unprotected,
    /// The caller's IP is inside a whitelisted range.
    WhitelistedIp,
    /// The filename embeds the caller's short host name.
    HostNameMatch,
}

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Literal IP caller outside every whitelisted range.
    IpNotWhitelisted,
    /// Host name caller whose short name is not part of the filename.
    HostNameMismatch,
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }
}

/// Protected repositories plus the IP ranges allowed to read them.
#[derive(Debug, Default)]
pub struct AccessPolicy {
    /// Repositories requiring an access check. Add-only.
    protected_repos: RwLock<HashSet<String>>,

    /// Whitelisted ranges, checked in configured order.
    white_listed_ranges: Vec<IpRange>,
}

impl AccessPolicy {
    /// Create a policy from already-parsed parts.
    pub fn new<I, S>(protected_repos: I, white_listed_ranges: Vec<IpRange>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            protected_repos: RwLock::new(protected_repos.into_iter().map(Into::into).collect()),
            white_listed_ranges,
        }
    }

    /// Build the policy from startup configuration.
    ///
    /// Fails on the first malformed range expression.
    pub fn from_config(config: &SecurityConfig) -> Result<Self> {
        let ranges = config
            .white_listed_range_expressions()
            .iter()
            .map(|expr| IpRange::parse(expr))
            .collect::<Result<Vec<_>>>()?;

        let policy = Self::new(config.protected_repo_names(), ranges);
        tracing::info!(
            protected_repos = policy.read_repos().len(),
            white_listed_ranges = policy.white_listed_ranges.len(),
            "access policy configured"
        );
        Ok(policy)
    }

    /// Whether a repository may be replicated to downstream mirrors.
    /// Protected repositories never are.
    pub fn is_allowed_propagation_repo(&self, repository: &str) -> bool {
        !self.is_protected(repository)
    }

    /// Whether `identity` may read the file at `address`.
    pub fn is_allowed(&self, address: &FileAddress, identity: Option<&ClientIdentity>) -> bool {
        self.evaluate(address, identity).is_allowed()
    }

    /// Decide access and report the rule that applied.
    pub fn evaluate(
        &self,
        address: &FileAddress,
        identity: Option<&ClientIdentity>,
    ) -> AccessDecision {
        let Some(identity) = identity else {
            return AccessDecision::Allow(AllowReason::Internal);
        };
        if address.is_repodata() {
            return AccessDecision::Allow(AllowReason::Repodata);
        }
        if !self.is_protected(address.repository()) {
            return AccessDecision::Allow(AllowReason::Unprotected);
        }

        tracing::info!(peer = %identity, path = %address, "check access permission");
        let decision = match identity {
            ClientIdentity::Ip(ip) => {
                if self.is_white_listed_ip(ip) {
                    AccessDecision::Allow(AllowReason::WhitelistedIp)
                } else {
                    AccessDecision::Deny(DenyReason::IpNotWhitelisted)
                }
            }
            ClientIdentity::Host(host) => {
                if host.matches_filename(address.filename()) {
                    AccessDecision::Allow(AllowReason::HostNameMatch)
                } else {
                    AccessDecision::Deny(DenyReason::HostNameMismatch)
                }
            }
        };

        match decision {
            AccessDecision::Deny(reason) => {
                tracing::info!(peer = %identity, path = %address, ?reason, "access denied")
            }
            AccessDecision::Allow(reason) => {
                tracing::debug!(peer = %identity, path = %address, ?reason, "access allowed")
            }
        }
        decision
    }

    /// Whether any whitelisted range contains `ip`.
    pub fn is_white_listed_ip(&self, ip: &IpAddr) -> bool {
        self.white_listed_ranges
            .iter()
            .any(|range| range.contains(ip))
    }

    pub fn is_protected(&self, repository: &str) -> bool {
        self.read_repos().contains(repository)
    }

    /// Protect another repository. Returns `false` if it already was
    /// protected or the name is blank.
    pub fn add_protected_repo(&self, repository: &str) -> bool {
        let repository = repository.trim();
        if repository.is_empty() {
            return false;
        }
        let added = self.write_repos().insert(repository.to_owned());
        if added {
            tracing::info!(repo = repository, "repository is now protected");
        }
        added
    }

    /// Snapshot of the protected repositories.
    pub fn protected_repos(&self) -> BTreeSet<String> {
        self.read_repos().iter().cloned().collect()
    }

    pub fn white_listed_ranges(&self) -> &[IpRange] {
        &self.white_listed_ranges
    }

    fn read_repos(&self) -> RwLockReadGuard<'_, HashSet<String>> {
        self.protected_repos
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_repos(&self) -> RwLockWriteGuard<'_, HashSet<String>> {
        self.protected_repos
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
