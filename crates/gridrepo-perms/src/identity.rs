//! Caller identities.
//!
//! A web caller is known either by its literal IP address or by the host
//! name its address resolved to. Internal calls carry no identity at all,
//! which the policy treats as trusted.

use std::fmt;
use std::net::IpAddr;

/// Domain label separator in host names.
const LABEL_SEPARATOR: char = '.';

/// Identity of a public web caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClientIdentity {
    /// Caller known only by address.
    Ip(IpAddr),
    /// Caller whose address resolved to a host name.
    Host(HostName),
}

/// A resolved host name and its short name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostName {
    name: String,
    /// `None` marks a caller whose lookup failed.
    short_name: Option<String>,
}

impl HostName {
    /// Wrap a resolved name. A trailing root dot is dropped; a blank name
    /// is treated as unresolved.
    pub fn new(name: impl Into<String>) -> Self {
        let mut name = name.into();
        while name.ends_with(LABEL_SEPARATOR) {
            name.pop();
        }
        if name.is_empty() {
            return Self::unresolved();
        }
        let short_name = name
            .split_once(LABEL_SEPARATOR)
            .map(|(short, _)| short.to_owned())
            .unwrap_or_default();
        Self {
            name,
            short_name: Some(short_name),
        }
    }

    /// Placeholder for a caller whose lookup failed. Matches no filename.
    pub fn unresolved() -> Self {
        Self {
            name: String::new(),
            short_name: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_resolved(&self) -> bool {
        self.short_name.is_some()
    }

    /// Leading label of the name, empty when the name has no domain part
    /// (`buildbox`) or the lookup failed.
    pub fn short_name(&self) -> &str {
        self.short_name.as_deref().unwrap_or_default()
    }

    /// Whether `filename` embeds this host's short name.
    ///
    /// A resolved host without a domain part has an empty short name, which
    /// every filename contains. An unresolved caller matches nothing.
    pub fn matches_filename(&self, filename: &str) -> bool {
        match &self.short_name {
            Some(short_name) => filename.contains(short_name.as_str()),
            None => false,
        }
    }
}

impl ClientIdentity {
    /// Classify a transport-level remote host: a literal IP stays an IP
    /// identity, anything else is taken as an already-resolved host name.
    pub fn classify(remote_host: &str) -> Self {
        match remote_host.trim().parse::<IpAddr>() {
            Ok(ip) => Self::from_ip(ip),
            Err(_) => Self::Host(HostName::new(remote_host.trim())),
        }
    }

    /// Identity for a literal IP. IPv4-mapped IPv6 addresses are unmapped
    /// so they compare against IPv4 ranges.
    pub fn from_ip(ip: IpAddr) -> Self {
        Self::Ip(ip.to_canonical())
    }

    pub fn from_host_name(name: impl Into<String>) -> Self {
        Self::Host(HostName::new(name))
    }

    /// Identity used when resolution failed; denied by every protected check.
    pub fn unresolved() -> Self {
        Self::Host(HostName::unresolved())
    }

    pub fn is_literal_ip(&self) -> bool {
        matches!(self, Self::Ip(_))
    }

    /// Literal IP text or resolved host name.
    pub fn name(&self) -> String {
        match self {
            Self::Ip(ip) => ip.to_string(),
            Self::Host(host) => host.name.clone(),
        }
    }

    /// Short name used for filename matching; empty for IP identities,
    /// dotless host names and unresolved callers.
    pub fn short_name(&self) -> &str {
        match self {
            Self::Ip(_) => "",
            Self::Host(host) => host.short_name(),
        }
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip(ip) => write!(f, "{ip}"),
            Self::Host(host) if !host.is_resolved() => f.write_str("<unresolved>"),
            Self::Host(host) => f.write_str(&host.name),
        }
    }
}
