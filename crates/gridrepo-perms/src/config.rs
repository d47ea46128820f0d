//! Access control configuration.
//!
//! Read once at startup. Later changes to the protected set go through
//! [`AccessPolicy::add_protected_repo`](crate::AccessPolicy::add_protected_repo),
//! never through reloading this configuration.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Protected repositories and the IP ranges allowed to read them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Comma-delimited repository names, e.g. `"secure, internal"`.
    pub protected_repos: String,

    /// Comma-delimited CIDR ranges, e.g. `"10.0.0.0/24, 192.168.7.0/28"`.
    /// Blank means no IP caller may read protected files.
    pub protected_repo_white_listed_ip_ranges: String,
}

impl SecurityConfig {
    /// Protected repository names, in configured order.
    pub fn protected_repo_names(&self) -> Vec<String> {
        comma_delimited_list(&self.protected_repos)
    }

    /// Whitelisted range expressions, in configured order.
    pub fn white_listed_range_expressions(&self) -> Vec<String> {
        comma_delimited_list(&self.protected_repo_white_listed_ip_ranges)
    }
}

/// How caller identities are derived from peer addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Resolve peers to host names via reverse DNS. When disabled every
    /// caller is identified by its literal IP.
    #[serde(default = "default_resolve_host_names")]
    pub resolve_host_names: bool,

    /// Upper bound for a single reverse lookup, in milliseconds.
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
}

fn default_resolve_host_names() -> bool {
    true
}

fn default_lookup_timeout_ms() -> u64 {
    2_000
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            resolve_host_names: default_resolve_host_names(),
            lookup_timeout_ms: default_lookup_timeout_ms(),
        }
    }
}

impl IdentityConfig {
    /// Identify every caller by IP, without DNS.
    pub fn literal_ip_only() -> Self {
        Self {
            resolve_host_names: false,
            ..Self::default()
        }
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.resolve_host_names && self.lookup_timeout_ms == 0 {
            return Err("lookup_timeout_ms must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Split a comma-delimited list.
///
/// All whitespace is removed, empty entries are dropped and duplicates keep
/// their first position.
pub fn comma_delimited_list(input: &str) -> Vec<String> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let mut seen = HashSet::new();
    compact
        .split(',')
        .filter(|entry| !entry.is_empty())
        .filter(|entry| seen.insert(*entry))
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_delimited_list() {
        assert_eq!(
            comma_delimited_list(" a , b,\tc ,a,, "),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert!(comma_delimited_list("").is_empty());
        assert!(comma_delimited_list("  ,  ").is_empty());
    }

    #[test]
    fn test_whitespace_inside_entries_is_removed() {
        assert_eq!(comma_delimited_list("10.0.0.0 / 24"), vec!["10.0.0.0/24"]);
    }

    #[test]
    fn test_security_config_from_json() {
        let config: SecurityConfig = serde_json::from_str(
            r#"{"protected_repos": "secure-repo, other", "protected_repo_white_listed_ip_ranges": "10.0.0.0/24"}"#,
        )
        .unwrap();

        assert_eq!(config.protected_repo_names(), vec!["secure-repo", "other"]);
        assert_eq!(config.white_listed_range_expressions(), vec!["10.0.0.0/24"]);

        let empty: SecurityConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, SecurityConfig::default());
    }

    #[test]
    fn test_identity_config_defaults() {
        let config: IdentityConfig = serde_json::from_str("{}").unwrap();
        assert!(config.resolve_host_names);
        assert_eq!(config.lookup_timeout(), Duration::from_secs(2));
        assert!(config.validate().is_ok());

        let broken = IdentityConfig {
            resolve_host_names: true,
            lookup_timeout_ms: 0,
        };
        assert!(broken.validate().is_err());
        assert!(IdentityConfig {
            lookup_timeout_ms: 0,
            ..IdentityConfig::literal_ip_only()
        }
        .validate()
        .is_ok());
    }
}
