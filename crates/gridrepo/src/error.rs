//! Error types for the server API.

use gridrepo_core::CoreError;
use gridrepo_perms::{DenyReason, PermsError};
use gridrepo_store::StoreError;
use gridrepo_sync::SyncError;
use thiserror::Error;

/// Errors that can occur during server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Request path is not a valid file address.
    #[error("bad request: {0}")]
    Address(#[from] CoreError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Mirroring or propagation error.
    #[error("sync error: {0}")]
    Sync(#[from] SyncError),

    /// Access policy setup error.
    #[error("permission error: {0}")]
    Permission(#[from] PermsError),

    /// Configuration could not be read or is inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The caller may not read this file.
    #[error("access to {path} denied: {reason:?}")]
    Forbidden { path: String, reason: DenyReason },

    /// No file at this address.
    #[error("not found: {0}")]
    NotFound(String),

    /// Propagation would move files of a protected repository into an
    /// unprotected one.
    #[error("cannot propagate from protected repository {protected} into unprotected {destination}")]
    ProtectionDowngrade { protected: String, destination: String },

    /// Request rejected before reaching the store.
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl ServerError {
    /// HTTP status an outer layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Address(_) | Self::BadRequest(_) => 400,
            Self::Forbidden { .. } => 403,
            Self::NotFound(_)
            | Self::Store(StoreError::NotFound(_))
            | Self::Sync(
                SyncError::SourceRepositoryMissing(_)
                | SyncError::DestinationRepositoryMissing(_)
                | SyncError::PackageNotFound(_),
            ) => 404,
            Self::Store(StoreError::RepositoryExists(_)) | Self::ProtectionDowngrade { .. } => 409,
            Self::Store(StoreError::Address(_)) | Self::Sync(SyncError::Address(_)) => 400,
            Self::Sync(SyncError::Timeout(_)) => 504,
            _ => 500,
        }
    }
}

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;
