//! Golden access cases.
//!
//! Each case fixes a request and the decision the scenario policy (see
//! [`scenario_policy`](crate::fixtures::scenario_policy)) must reach for it.
//! The table is exported as JSON so other front ends can check against it.

use serde::Serialize;

use gridrepo_core::FileAddress;
use gridrepo_perms::{AccessPolicy, ClientIdentity};

/// A golden access case.
#[derive(Debug, Clone, Serialize)]
pub struct AccessCase {
    /// Human-readable name for the case.
    pub name: &'static str,
    /// Requested `repository/architecture/filename`.
    pub path: &'static str,
    /// Remote host of the caller, literal IP or host name. `None` is an
    /// internal call.
    pub caller: Option<&'static str>,
    /// Expected decision.
    pub allowed: bool,
}

/// Get all golden access cases.
pub fn all_cases() -> Vec<AccessCase> {
    vec![
        AccessCase {
            name: "whitelisted ip reads protected package",
            path: "secure-repo/noarch/pkg.rpm",
            caller: Some("10.0.0.5"),
            allowed: true,
        },
        AccessCase {
            name: "foreign ip denied protected package",
            path: "secure-repo/noarch/pkg.rpm",
            caller: Some("192.168.1.5"),
            allowed: false,
        },
        AccessCase {
            name: "foreign ip reads protected metadata",
            path: "secure-repo/repodata/primary.xml",
            caller: Some("192.168.1.5"),
            allowed: true,
        },
        AccessCase {
            name: "matching host reads its package",
            path: "secure-repo/noarch/host01-config.rpm",
            caller: Some("host01.example.com"),
            allowed: true,
        },
        AccessCase {
            name: "other host denied package",
            path: "secure-repo/noarch/host01-config.rpm",
            caller: Some("host02.example.com"),
            allowed: false,
        },
        AccessCase {
            name: "whitelist ignored for host callers",
            path: "secure-repo/noarch/pkg.rpm",
            caller: Some("host01.example.com"),
            allowed: false,
        },
        AccessCase {
            name: "whitelist range upper bound",
            path: "secure-repo/noarch/pkg.rpm",
            caller: Some("10.0.0.255"),
            allowed: true,
        },
        AccessCase {
            name: "just outside whitelist range",
            path: "secure-repo/noarch/pkg.rpm",
            caller: Some("10.0.1.0"),
            allowed: false,
        },
        AccessCase {
            name: "ipv4-mapped ipv6 caller in range",
            path: "secure-repo/noarch/pkg.rpm",
            caller: Some("::ffff:10.0.0.7"),
            allowed: true,
        },
        AccessCase {
            name: "internal call bypasses policy",
            path: "secure-repo/noarch/pkg.rpm",
            caller: None,
            allowed: true,
        },
        AccessCase {
            name: "unprotected repository is public",
            path: "public/noarch/tool-1.0-1.noarch.rpm",
            caller: Some("192.168.1.5"),
            allowed: true,
        },
        AccessCase {
            name: "repository names match exactly",
            path: "secure-repo-old/noarch/pkg.rpm",
            caller: Some("192.168.1.5"),
            allowed: true,
        },
    ]
}

/// Check one case against `policy`.
pub fn verify_case(policy: &AccessPolicy, case: &AccessCase) -> Result<(), String> {
    let address = FileAddress::parse(case.path).map_err(|e| format!("{}: {e}", case.name))?;
    let identity = case.caller.map(ClientIdentity::classify);

    let decision = policy.evaluate(&address, identity.as_ref());
    if decision.is_allowed() == case.allowed {
        Ok(())
    } else {
        Err(format!(
            "{}: expected allowed={}, got {decision:?}",
            case.name, case.allowed
        ))
    }
}

/// Check every case. Returns the failures.
pub fn verify_all_cases(policy: &AccessPolicy) -> Vec<String> {
    all_cases()
        .iter()
        .filter_map(|case| verify_case(policy, case).err())
        .collect()
}

/// The case table as pretty-printed JSON.
pub fn cases_json() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&all_cases())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::scenario_policy;

    #[test]
    fn test_cases_hold_for_scenario_policy() {
        let failures = verify_all_cases(&scenario_policy());
        assert!(failures.is_empty(), "{failures:#?}");
    }

    #[test]
    fn test_case_names_are_unique() {
        let cases = all_cases();
        let mut names: Vec<_> = cases.iter().map(|case| case.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), cases.len());
    }

    #[test]
    fn test_cases_export_as_json() {
        let json = cases_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), all_cases().len());
        assert_eq!(parsed[9]["caller"], serde_json::Value::Null);
    }
}
