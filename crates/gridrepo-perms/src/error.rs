//! Error types for the permissions module.

use std::net::IpAddr;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while configuring or resolving access control.
#[derive(Debug, Error)]
pub enum PermsError {
    /// A configured IP range expression could not be parsed.
    #[error("malformed ip range {expression:?}: {reason}")]
    MalformedRange { expression: String, reason: String },

    /// Reverse lookup failed.
    #[error("reverse lookup for {ip} failed: {reason}")]
    LookupFailed { ip: IpAddr, reason: String },

    /// Reverse lookup did not finish in time.
    #[error("reverse lookup for {ip} timed out after {timeout:?}")]
    LookupTimeout { ip: IpAddr, timeout: Duration },

    /// Resolver could not be built.
    #[error("resolver setup failed: {0}")]
    ResolverSetup(String),
}

/// Result type for permission operations.
pub type Result<T> = std::result::Result<T, PermsError>;
