//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use gridrepo_core::FileAddress;
use gridrepo_perms::{AccessPolicy, SecurityConfig};
use gridrepo_store::{FileStore, MemoryStore, StoredFile};

/// Protected repository of the reference scenario.
pub const SCENARIO_PROTECTED_REPO: &str = "secure-repo";

/// Whitelisted range of the reference scenario.
pub const SCENARIO_WHITE_LISTED_RANGE: &str = "10.0.0.0/24";

/// Files preloaded by [`TestFixture::seeded`].
pub const SCENARIO_FILES: &[&str] = &[
    "secure-repo/noarch/pkg.rpm",
    "secure-repo/noarch/host01-config.rpm",
    "secure-repo/repodata/primary.xml",
    "secure-repo/repodata/repomd.xml",
    "public/noarch/tool-1.0-1.noarch.rpm",
    "public/x86_64/tool-libs-1.0-1.x86_64.rpm",
    "public/repodata/repomd.xml",
];

/// Security configuration of the reference scenario.
pub fn scenario_config() -> SecurityConfig {
    SecurityConfig {
        protected_repos: SCENARIO_PROTECTED_REPO.to_string(),
        protected_repo_white_listed_ip_ranges: SCENARIO_WHITE_LISTED_RANGE.to_string(),
    }
}

/// Policy of the reference scenario.
pub fn scenario_policy() -> AccessPolicy {
    match AccessPolicy::from_config(&scenario_config()) {
        Ok(policy) => policy,
        Err(e) => panic!("scenario config is valid: {e}"),
    }
}

/// A memory store and the scenario policy.
pub struct TestFixture {
    pub store: MemoryStore,
    pub policy: Arc<AccessPolicy>,
}

impl TestFixture {
    /// Empty store, scenario policy.
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
            policy: Arc::new(scenario_policy()),
        }
    }

    /// Store preloaded with [`SCENARIO_FILES`], scenario policy.
    pub async fn seeded() -> Self {
        let fixture = Self::new();
        for path in SCENARIO_FILES {
            fixture.add_file(path, path.as_bytes()).await;
        }
        fixture
    }

    /// Store `content` at `path`.
    pub async fn add_file(&self, path: &str, content: &[u8]) -> FileAddress {
        let address = parse(path);
        let file = StoredFile::new(address.clone(), content.to_vec());
        if let Err(e) = self.store.put_file(file).await {
            panic!("memory store rejected {path}: {e}");
        }
        address
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a path known to be a valid address.
pub fn parse(path: &str) -> FileAddress {
    match FileAddress::parse(path) {
        Ok(address) => address,
        Err(e) => panic!("fixture path {path:?} is not an address: {e}"),
    }
}
