//! IP ranges for the protected-repository whitelist.
//!
//! The accepted grammar is CIDR notation (`10.0.0.0/24`, `fd00::/8`) or a
//! bare address, which denotes a single host. Anything else is rejected.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use ipnet::IpNet;

use crate::error::{PermsError, Result};

/// A contiguous block of IPv4 or IPv6 addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpRange(IpNet);

impl IpRange {
    /// Parse a range expression.
    pub fn parse(expression: &str) -> Result<Self> {
        let expr = expression.trim();
        let malformed = |reason: String| PermsError::MalformedRange {
            expression: expression.to_owned(),
            reason,
        };

        let net = if expr.contains('/') {
            expr.parse::<IpNet>()
                .map_err(|e| malformed(e.to_string()))?
                .trunc()
        } else {
            let ip = expr
                .parse::<IpAddr>()
                .map_err(|e| malformed(e.to_string()))?;
            let host_prefix = match ip {
                IpAddr::V4(_) => 32,
                IpAddr::V6(_) => 128,
            };
            IpNet::new(ip, host_prefix).map_err(|e| malformed(e.to_string()))?
        };

        Ok(Self(net))
    }

    /// Whether `ip` lies inside this range. Addresses of the other family
    /// never match.
    pub fn contains(&self, ip: &IpAddr) -> bool {
        self.0.contains(ip)
    }

    pub fn network(&self) -> IpAddr {
        self.0.network()
    }

    pub fn prefix_len(&self) -> u8 {
        self.0.prefix_len()
    }
}

impl FromStr for IpRange {
    type Err = PermsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for IpRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
