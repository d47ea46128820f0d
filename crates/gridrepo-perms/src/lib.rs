//! # gridrepo Permissions
//!
//! The access-control decision engine for protected repositories.
//!
//! ## Overview
//!
//! Most repositories are public. A repository named in the protected set
//! only serves its package payloads to web callers that pass one of two
//! checks:
//!
//! - **IP whitelist**: a caller known only by its IP address must fall
//!   inside one of the configured CIDR ranges.
//! - **Host name match**: a caller resolved to a host name may only fetch
//!   files whose name contains the host's short name (its first DNS label),
//!   e.g. `host01.example.com` may fetch `host01-config-1.0-1.noarch.rpm`.
//!
//! Repository metadata (`repodata`) is always readable, and internal calls
//! that carry no client identity bypass the check entirely. Protected
//! repositories are never propagated to mirrors.
//!
//! ## Key Types
//!
//! - [`AccessPolicy`] - Shared, runtime-extendable policy
//! - [`ClientIdentity`] - Literal IP or resolved host name of a caller
//! - [`IpRange`] - CIDR range used for the whitelist
//! - [`IdentityResolver`] - Bounded reverse-DNS resolution that fails closed
//!
//! ## Usage
//!
//! ```rust
//! use gridrepo_core::FileAddress;
//! use gridrepo_perms::{AccessPolicy, ClientIdentity, SecurityConfig};
//!
//! let policy = AccessPolicy::from_config(&SecurityConfig {
//!     protected_repos: "secure-repo".into(),
//!     protected_repo_white_listed_ip_ranges: "10.0.0.0/24".into(),
//! })
//! .unwrap();
//!
//! let address = FileAddress::parse("secure-repo/noarch/pkg.rpm").unwrap();
//! let inside = ClientIdentity::classify("10.0.0.5");
//! let outside = ClientIdentity::classify("192.168.1.5");
//!
//! assert!(policy.is_allowed(&address, Some(&inside)));
//! assert!(!policy.is_allowed(&address, Some(&outside)));
//! assert!(policy.is_allowed(&address, None));
//! ```

pub mod config;
pub mod error;
pub mod identity;
pub mod policy;
pub mod range;
pub mod resolver;

pub use config::{comma_delimited_list, IdentityConfig, SecurityConfig};
pub use error::{PermsError, Result};
pub use identity::{ClientIdentity, HostName};
pub use policy::{AccessDecision, AccessPolicy, AllowReason, DenyReason};
pub use range::IpRange;
pub use resolver::{HickoryResolver, HostResolver, IdentityResolver, StaticResolver};
