//! # gridrepo
//!
//! Access-controlled serving of RPM-style artifact repositories.
//!
//! ## Overview
//!
//! Files are addressed as `repository/architecture/filename`. Most
//! repositories are public; protected repositories only serve their
//! packages to:
//!
//! - **Whitelisted IPs**: callers identified by an address inside a
//!   configured CIDR range
//! - **Matching hosts**: callers resolved to a host whose short name is part
//!   of the requested filename
//!
//! Repository metadata stays public, internal calls are never checked, and
//! protected repositories are never replicated to mirrors.
//!
//! ## Usage
//!
//! ```rust
//! use gridrepo::{RepoServer, RequestOrigin, ServerConfig};
//! use gridrepo::store::MemoryStore;
//!
//! # async fn example() -> gridrepo::Result<()> {
//! let config = ServerConfig::from_json(
//!     r#"{"security": {
//!         "protected_repos": "secure-repo",
//!         "protected_repo_white_listed_ip_ranges": "10.0.0.0/24"
//!     }}"#,
//! )?;
//! let server = RepoServer::from_config(MemoryStore::new(), &config, None)?;
//!
//! server.upload("secure-repo/noarch/pkg.rpm", &b"..."[..]).await?;
//!
//! let inside = RequestOrigin::Web("10.0.0.5".parse().unwrap());
//! let outside = RequestOrigin::Web("192.168.1.5".parse().unwrap());
//! assert!(server.download("secure-repo/noarch/pkg.rpm", &inside).await.is_ok());
//! assert!(server.download("secure-repo/noarch/pkg.rpm", &outside).await.is_err());
//! # Ok(())
//! # }
//! ```
//!
//! ## Re-exports
//!
//! - `gridrepo::core` - File addresses and package records
//! - `gridrepo::perms` - Access policy and caller identity
//! - `gridrepo::store` - Storage abstraction
//! - `gridrepo::sync` - Mirroring and propagation

pub mod config;
pub mod error;
pub mod server;

// Re-export component crates
pub use gridrepo_core as core;
pub use gridrepo_perms as perms;
pub use gridrepo_store as store;
pub use gridrepo_sync as sync;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use server::{Admin, RepoServer, RequestOrigin};

// Re-export commonly used types
pub use gridrepo_core::FileAddress;
pub use gridrepo_perms::{AccessDecision, AccessPolicy, ClientIdentity, IpRange};
pub use gridrepo_store::{FileStore, StoredFile};
