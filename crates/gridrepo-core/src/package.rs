//! Package metadata records.
//!
//! A repository's metadata lists its packages by relative location
//! (`arch/filename`). The record pairs that location with the repository
//! that owns it.

use serde::{Deserialize, Serialize};

use crate::address::FileAddress;
use crate::error::Result;

/// A repository entry for one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    /// Repository that owns the package.
    pub repository: String,

    /// Location relative to the repository root, `arch/filename`.
    pub location_href: String,
}

impl PackageRecord {
    pub fn new(repository: impl Into<String>, location_href: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            location_href: location_href.into(),
        }
    }

    /// Resolve the record to the address of the package file.
    pub fn address(&self) -> Result<FileAddress> {
        FileAddress::from_record(self)
    }
}
