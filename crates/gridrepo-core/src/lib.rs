//! # gridrepo Core
//!
//! Pure primitives shared by every gridrepo component: the canonical
//! `repository/architecture/filename` address, package metadata records and
//! content hashes.
//!
//! This crate contains no I/O, no storage, no networking.
//!
//! ## Key Types
//!
//! - [`FileAddress`] - The three-part key naming every stored file
//! - [`PackageRecord`] - A repository entry pointing at a package location
//! - [`ContentHash`] - Blake3 digest of stored file content
//! - [`RpmFilename`] - `name-version-release.arch.rpm` parts, with
//!   [`latest_rpm`] picking the newest version of a package
//!
//! ## Addressing
//!
//! Upload, download, listing and mirroring all name files through
//! [`FileAddress`]. Its canonical string form has exactly two `/`
//! separators:
//!
//! ```rust
//! use gridrepo_core::FileAddress;
//!
//! let address: FileAddress = "base/noarch/tool-1.0-1.noarch.rpm".parse().unwrap();
//! assert_eq!(address.repository(), "base");
//! assert_eq!(address.canonical_path(), "base/noarch/tool-1.0-1.noarch.rpm");
//! ```

pub mod address;
pub mod error;
pub mod hash;
pub mod package;
pub mod rpm;

pub use address::{FileAddress, REPODATA_ARCH, SEPARATOR};
pub use error::{CoreError, Result};
pub use hash::ContentHash;
pub use package::PackageRecord;
pub use rpm::{compare_versions, latest_rpm, RpmFilename};
