//! Proptest generators for property-based testing.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use proptest::prelude::*;

use gridrepo_core::{FileAddress, REPODATA_ARCH};
use gridrepo_perms::ClientIdentity;

/// Generate a repository name.
pub fn repository() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9._-]{0,23}"
}

/// Generate a package architecture (never `repodata`).
pub fn architecture() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("noarch".to_string()),
        Just("x86_64".to_string()),
        Just("aarch64".to_string()),
        Just("i686".to_string()),
    ]
}

/// Generate a package filename.
pub fn filename() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_+-]{0,23}-[0-9]{1,3}\\.[0-9]{1,3}-[0-9]{1,2}\\.rpm"
}

/// Generate the address of a package.
pub fn package_address() -> impl Strategy<Value = FileAddress> {
    (repository(), architecture(), filename()).prop_filter_map(
        "segments form an address",
        |(repo, arch, file)| FileAddress::new(repo, arch, file).ok(),
    )
}

/// Generate the address of a repository metadata file.
pub fn repodata_address() -> impl Strategy<Value = FileAddress> {
    (repository(), "[a-z]{1,12}\\.xml(\\.gz)?").prop_filter_map(
        "segments form an address",
        |(repo, file)| FileAddress::new(repo, REPODATA_ARCH, file).ok(),
    )
}

/// Generate any IPv4 or IPv6 address.
pub fn ip_addr() -> impl Strategy<Value = IpAddr> {
    prop_oneof![
        any::<u32>().prop_map(|bits| IpAddr::V4(Ipv4Addr::from(bits))),
        any::<u128>().prop_map(|bits| IpAddr::V6(Ipv6Addr::from(bits))),
    ]
}

/// Generate a fully qualified host name.
pub fn host_name() -> impl Strategy<Value = String> {
    ("[a-z][a-z0-9-]{0,15}", "[a-z]{2,10}").prop_map(|(host, domain)| format!("{host}.{domain}.com"))
}

/// Generate a client identity, either kind.
pub fn client_identity() -> impl Strategy<Value = ClientIdentity> {
    prop_oneof![
        ip_addr().prop_map(ClientIdentity::from_ip),
        host_name().prop_map(ClientIdentity::from_host_name),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn package_addresses_are_not_repodata(address in package_address()) {
            prop_assert!(!address.is_repodata());
        }

        #[test]
        fn repodata_addresses_are_repodata(address in repodata_address()) {
            prop_assert!(address.is_repodata());
        }

        #[test]
        fn host_identities_have_short_names(name in host_name()) {
            let identity = ClientIdentity::from_host_name(name.clone());
            prop_assert!(!identity.short_name().is_empty());
            prop_assert!(name.starts_with(identity.short_name()));
        }
    }
}
