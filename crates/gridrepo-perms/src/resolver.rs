//! Reverse-DNS resolution of callers.
//!
//! [`HostResolver`] is the lookup seam; [`HickoryResolver`] talks to real
//! DNS and [`StaticResolver`] serves fixed answers for tests. The
//! [`IdentityResolver`] bounds every lookup with a timeout and turns lookup
//! failures into [`ClientIdentity::unresolved`], which no protected check
//! accepts.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::config::ResolverConfig;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::Resolver;

use crate::config::IdentityConfig;
use crate::error::{PermsError, Result};
use crate::identity::ClientIdentity;

/// Reverse lookup of peer addresses.
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// Resolve `ip` to a host name.
    ///
    /// Returns `Ok(None)` when the address has no PTR record and `Err` when
    /// the lookup itself failed.
    async fn reverse_lookup(&self, ip: IpAddr) -> Result<Option<String>>;
}

/// DNS-backed resolver.
pub struct HickoryResolver {
    resolver: Resolver<TokioConnectionProvider>,
}

impl HickoryResolver {
    /// Build from the host's resolver configuration (`/etc/resolv.conf`).
    pub fn from_system_conf() -> Result<Self> {
        let (config, opts) = hickory_resolver::system_conf::read_system_conf()
            .map_err(|e| PermsError::ResolverSetup(e.to_string()))?;
        let resolver = Resolver::builder_with_config(config, TokioConnectionProvider::default())
            .with_options(opts)
            .build();
        Ok(Self { resolver })
    }

    /// Build with an explicit upstream configuration.
    pub fn with_config(config: ResolverConfig) -> Self {
        let resolver =
            Resolver::builder_with_config(config, TokioConnectionProvider::default()).build();
        Self { resolver }
    }
}

#[async_trait]
impl HostResolver for HickoryResolver {
    async fn reverse_lookup(&self, ip: IpAddr) -> Result<Option<String>> {
        match self.resolver.reverse_lookup(ip).await {
            Ok(lookup) => Ok(lookup
                .iter()
                .next()
                .map(|ptr| ptr.to_string().trim_end_matches('.').to_owned())),
            Err(e) if e.is_no_records_found() => Ok(None),
            Err(e) => Err(PermsError::LookupFailed {
                ip,
                reason: e.to_string(),
            }),
        }
    }
}

/// Resolver with fixed answers.
#[derive(Debug, Default, Clone)]
pub struct StaticResolver {
    answers: HashMap<IpAddr, Answer>,
    delay: Option<Duration>,
}

#[derive(Debug, Clone)]
enum Answer {
    Name(String),
    Fail(String),
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer lookups of `ip` with `name`.
    pub fn with_host(mut self, ip: IpAddr, name: impl Into<String>) -> Self {
        self.answers.insert(ip, Answer::Name(name.into()));
        self
    }

    /// Fail lookups of `ip`.
    pub fn with_failure(mut self, ip: IpAddr, reason: impl Into<String>) -> Self {
        self.answers.insert(ip, Answer::Fail(reason.into()));
        self
    }

    /// Delay every answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl HostResolver for StaticResolver {
    async fn reverse_lookup(&self, ip: IpAddr) -> Result<Option<String>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.answers.get(&ip) {
            Some(Answer::Name(name)) => Ok(Some(name.clone())),
            Some(Answer::Fail(reason)) => Err(PermsError::LookupFailed {
                ip,
                reason: reason.clone(),
            }),
            None => Ok(None),
        }
    }
}

/// Derives a [`ClientIdentity`] for each web request.
#[derive(Clone)]
pub struct IdentityResolver {
    resolver: Option<Arc<dyn HostResolver>>,
    config: IdentityConfig,
}

impl IdentityResolver {
    pub fn new(resolver: Arc<dyn HostResolver>, config: IdentityConfig) -> Self {
        Self {
            resolver: Some(resolver),
            config,
        }
    }

    /// Resolver that never touches DNS: every caller is a literal IP.
    pub fn literal_ip() -> Self {
        Self {
            resolver: None,
            config: IdentityConfig::literal_ip_only(),
        }
    }

    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    /// Identify the peer at `ip`.
    ///
    /// Addresses without a PTR record stay literal IP identities. A failed
    /// or timed-out lookup yields [`ClientIdentity::unresolved`]. Dropping
    /// the returned future cancels the lookup.
    pub async fn resolve(&self, ip: IpAddr) -> ClientIdentity {
        let resolver = match &self.resolver {
            Some(resolver) if self.config.resolve_host_names => resolver,
            _ => return ClientIdentity::from_ip(ip),
        };

        match self.lookup(resolver.as_ref(), ip).await {
            Ok(Some(name)) => ClientIdentity::from_host_name(name),
            Ok(None) => ClientIdentity::from_ip(ip),
            Err(e) => {
                tracing::warn!(peer = %ip, error = %e, "identity resolution failed, treating caller as unresolved");
                ClientIdentity::unresolved()
            }
        }
    }

    async fn lookup(&self, resolver: &dyn HostResolver, ip: IpAddr) -> Result<Option<String>> {
        let timeout = self.config.lookup_timeout();
        tokio::time::timeout(timeout, resolver.reverse_lookup(ip))
            .await
            .map_err(|_| PermsError::LookupTimeout { ip, timeout })?
    }
}
