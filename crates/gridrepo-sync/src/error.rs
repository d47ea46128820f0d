//! Error types for the sync module.

use thiserror::Error;

/// Errors that can occur during mirroring or propagation.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Store operation failed.
    #[error("store error: {0}")]
    StoreError(#[from] gridrepo_store::StoreError),

    /// Address could not be built.
    #[error("invalid address: {0}")]
    Address(#[from] gridrepo_core::CoreError),

    /// Batch could not be encoded or decoded.
    #[error("encoding error: {0}")]
    EncodingError(String),

    /// Mirror did not acknowledge in time.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Propagation source repository does not exist.
    #[error("source repository {0} does not exist")]
    SourceRepositoryMissing(String),

    /// Propagation destination repository does not exist.
    #[error("destination repository {0} does not exist")]
    DestinationRepositoryMissing(String),

    /// Package to propagate is not in the source repository.
    #[error("package not found: {0}")]
    PackageNotFound(String),
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
