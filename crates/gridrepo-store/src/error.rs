//! Error types for the store module.

use gridrepo_core::CoreError;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File or repository not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Target repository of a rename already holds files.
    #[error("repository already exists: {0}")]
    RepositoryExists(String),

    /// Address could not be built or rewritten.
    #[error("invalid address: {0}")]
    Address(#[from] CoreError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
