//! DNS blacklist backend.
//!
//! This module provides a probe that asks a DNSBL zone about a target by
//! resolving `d.c.b.a.<zone>` through the system resolver.
//!
//! # Protocol
//!
//! A DNSBL answers with an A record in `127.0.0.0/8` when the address is
//! listed and with NXDOMAIN when it is not. Answers in `127.255.255.0/24` are
//! error codes (for example Spamhaus refusing queries from public
//! resolvers). Anything outside `127.0.0.0/8` is not a DNSBL answer, which
//! usually means the resolver rewrites NXDOMAIN.

use crate::core::{Endpoint, Listing, Probe, ProbeError, Target};

use async_trait::async_trait;
use std::io;
use std::net::IpAddr;
use std::time::{Duration, Instant};

/// Resolver messages that mean the name does not exist.
const NOT_FOUND_MARKERS: &[&str] = &[
    "name or service not known",
    "no address associated with hostname",
    "nodename nor servname provided",
    "no such host",
    "non-existent domain",
];

/// Resolver messages that mean the lookup may succeed later.
const TEMPORARY_MARKERS: &[&str] = &[
    "temporary failure in name resolution",
    "try again",
    "temporarily unavailable",
];

/// DNS probe configuration.
#[derive(Debug, Clone)]
pub struct DnsProbeConfig {
    /// I/O timeout for one lookup.
    pub timeout: Duration,
}

impl Default for DnsProbeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
        }
    }
}

impl DnsProbeConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the lookup timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Probe that queries DNSBL zones through the system resolver.
#[derive(Debug, Clone, Default)]
pub struct DnsProbe {
    config: DnsProbeConfig,
}

impl DnsProbe {
    /// Creates a DNS probe with the given configuration.
    pub fn new(config: DnsProbeConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DnsProbeConfig {
        &self.config
    }
}

#[async_trait]
impl Probe for DnsProbe {
    fn name(&self) -> &str {
        "dns"
    }

    async fn probe(&self, target: &Target, endpoint: &Endpoint) -> Result<Listing, ProbeError> {
        let query = target.query_name(endpoint);
        let started = Instant::now();

        tracing::debug!(query = %query, "Resolving DNSBL name");

        let lookup = tokio::net::lookup_host((query.as_str(), 0));
        let result = tokio::time::timeout(self.config.timeout, lookup).await;
        match result {
            Err(_) => Err(ProbeError::timeout(&query, started.elapsed())),
            Ok(Ok(addrs)) => {
                let records: Vec<IpAddr> = addrs.map(|addr| addr.ip()).collect();
                classify_answer(&query, records)
            }
            Ok(Err(e)) => classify_resolver_error(&query, &e, started.elapsed()),
        }
    }
}

/// Interprets the records returned for a DNSBL query.
pub fn classify_answer(query: &str, mut records: Vec<IpAddr>) -> Result<Listing, ProbeError> {
    if records.is_empty() {
        return Ok(Listing::NotListed);
    }

    records.sort();
    records.dedup();

    for record in &records {
        match record {
            IpAddr::V4(addr) if addr.octets()[..3] == [127, 255, 255] => {
                return Err(ProbeError::protocol(
                    query,
                    format!("blacklist returned error code {}", addr),
                ));
            }
            IpAddr::V4(addr) if addr.is_loopback() => {}
            other => {
                return Err(ProbeError::protocol(
                    query,
                    format!("unexpected answer {}", other),
                ));
            }
        }
    }

    Ok(Listing::Listed { records })
}

/// Interprets a resolver failure.
///
/// A missing name is the normal "not listed" answer and is returned as
/// `Ok(Listing::NotListed)`.
pub fn classify_resolver_error(
    query: &str,
    error: &io::Error,
    elapsed: Duration,
) -> Result<Listing, ProbeError> {
    let message = error.to_string();
    let lowered = message.to_ascii_lowercase();

    if error.kind() == io::ErrorKind::TimedOut || lowered.contains("timed out") {
        return Err(ProbeError::timeout(query, elapsed));
    }

    if error.kind() == io::ErrorKind::NotFound
        || NOT_FOUND_MARKERS.iter().any(|m| lowered.contains(m))
    {
        return Ok(Listing::NotListed);
    }

    if matches!(
        error.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    ) || TEMPORARY_MARKERS.iter().any(|m| lowered.contains(m))
    {
        return Err(ProbeError::transient(query, message));
    }

    Err(ProbeError::protocol(query, message))
}
