//! Server configuration.

use serde::{Deserialize, Serialize};

use gridrepo_perms::{AccessPolicy, IdentityConfig, SecurityConfig};
use gridrepo_sync::MirrorConfig;

use crate::error::{Result, ServerError};

/// Configuration for a [`RepoServer`](crate::RepoServer).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Protected repositories and whitelisted ranges.
    pub security: SecurityConfig,
    /// Caller identification.
    pub identity: IdentityConfig,
    /// Mirroring behavior.
    pub mirror: MirrorConfig,
}

impl ServerConfig {
    /// Parse from JSON. Missing sections take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Check every section, including the whitelisted range expressions.
    pub fn validate(&self) -> Result<()> {
        self.identity.validate().map_err(ServerError::Config)?;
        self.mirror.validate().map_err(ServerError::Config)?;
        AccessPolicy::from_config(&self.security)?;
        Ok(())
    }
}
