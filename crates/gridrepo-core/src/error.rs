//! Error types for gridrepo core.

use thiserror::Error;

/// Errors raised while building core values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("path {path} does not follow pattern repo/arch/filename")]
    MalformedAddress { path: String },

    #[error("location href {href} does not follow pattern arch/filename")]
    MalformedLocation { href: String },

    #[error("invalid repository name: {0:?}")]
    InvalidRepositoryName(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
