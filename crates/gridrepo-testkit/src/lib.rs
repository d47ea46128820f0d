//! # gridrepo Testkit
//!
//! Testing utilities for gridrepo.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden access cases**: Requests with the decision the reference
//!   scenario policy must reach
//! - **Generators**: Proptest strategies for addresses and callers
//! - **Fixtures**: Scenario policy and a preloaded memory store
//!
//! ## Golden Access Cases
//!
//! ```rust
//! use gridrepo_testkit::fixtures::scenario_policy;
//! use gridrepo_testkit::vectors::verify_all_cases;
//!
//! assert!(verify_all_cases(&scenario_policy()).is_empty());
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use gridrepo_testkit::generators::{client_identity, repodata_address};
//!
//! proptest! {
//!     #[test]
//!     fn metadata_is_public(address in repodata_address(), caller in client_identity()) {
//!         prop_assert!(policy.is_allowed(&address, Some(&caller)));
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{scenario_config, scenario_policy, TestFixture};
pub use vectors::{all_cases, verify_all_cases, verify_case, AccessCase};
