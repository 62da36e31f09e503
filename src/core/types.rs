//! Core types used throughout the dnsbl-check library.
//!
//! This module defines the fundamental data structures for representing
//! check severities, per-checker verdicts, blacklist endpoints and the
//! target address being checked.

use crate::core::error::CheckError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

/// Severity of a verdict or of the overall check result.
///
/// Each severity maps to a fixed Nagios plugin exit status:
/// - `Normal` (0): the target is not listed by any checker
/// - `Degraded` (1): a checker timed out or the deadline was reached
/// - `Fatal` (2): the target is listed on at least one checker
/// - `Indeterminate` (3): malformed input or an unclassifiable failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Nothing to report.
    Normal,
    /// Something is off but the target was not found on a blacklist.
    Degraded,
    /// The target is listed.
    Fatal,
    /// The result could not be determined.
    Indeterminate,
}

impl Severity {
    /// Returns the process exit code for this severity.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Degraded => 1,
            Self::Fatal => 2,
            Self::Indeterminate => 3,
        }
    }

    /// Returns the Nagios status label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "OK",
            Self::Degraded => "WARNING",
            Self::Fatal => "CRITICAL",
            Self::Indeterminate => "UNKNOWN",
        }
    }

    /// Returns the escalation rank (higher is worse).
    ///
    /// The ranking is `Fatal > Indeterminate > Degraded > Normal`. Note that
    /// this differs from the exit code order.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Degraded => 1,
            Self::Indeterminate => 2,
            Self::Fatal => 3,
        }
    }

    /// Returns `true` if this severity ends an aggregation on arrival,
    /// i.e. it outranks waiting for more normal verdicts.
    pub fn is_decisive(&self) -> bool {
        self.rank() > Self::Normal.rank()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Degraded => write!(f, "degraded"),
            Self::Fatal => write!(f, "fatal"),
            Self::Indeterminate => write!(f, "indeterminate"),
        }
    }
}

/// The outcome of querying a single checker.
///
/// A verdict is immutable once constructed. It is produced by exactly one
/// producer task and moved through the results channel to the decision loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    severity: Severity,
    message: String,
    endpoint: Option<Endpoint>,
}

impl Verdict {
    /// Creates a new verdict.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            endpoint: None,
        }
    }

    /// Tags the verdict with the endpoint that produced it.
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Returns the severity.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the diagnostic message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the endpoint that produced this verdict, if tagged.
    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }
}

/// A DNS blacklist zone, e.g. `zen.spamhaus.org`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Endpoint(String);

impl Endpoint {
    /// Parses and normalises a zone name.
    ///
    /// Surrounding whitespace and a trailing dot are removed and the name is
    /// lower-cased.
    pub fn parse(zone: &str) -> Result<Self, CheckError> {
        let normalised = zone.trim().trim_end_matches('.').to_ascii_lowercase();

        if normalised.is_empty() {
            return Err(CheckError::invalid_endpoint(zone, "zone is empty"));
        }
        if normalised.chars().any(char::is_whitespace) {
            return Err(CheckError::invalid_endpoint(zone, "zone contains whitespace"));
        }
        if normalised.starts_with('.') || normalised.contains("..") {
            return Err(CheckError::invalid_endpoint(zone, "zone has an empty label"));
        }

        Ok(Self(normalised))
    }

    /// Returns the zone name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Endpoint {
    type Error = CheckError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Endpoint> for String {
    fn from(endpoint: Endpoint) -> Self {
        endpoint.0
    }
}

/// The IPv4 address being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target(Ipv4Addr);

impl Target {
    /// Parses a target address.
    ///
    /// Accepts dotted-quad IPv4 and IPv4-mapped IPv6 (`::ffff:a.b.c.d`).
    pub fn parse(input: &str) -> Result<Self, CheckError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CheckError::invalid_target(input, "no address given"));
        }

        match trimmed.parse::<IpAddr>() {
            Ok(IpAddr::V4(addr)) => Ok(Self(addr)),
            Ok(IpAddr::V6(addr)) => addr
                .to_ipv4_mapped()
                .map(Self)
                .ok_or_else(|| CheckError::invalid_target(input, "not an IPv4 address")),
            Err(_) => Err(CheckError::invalid_target(input, "not an IP address")),
        }
    }

    /// Returns the address.
    pub fn addr(&self) -> Ipv4Addr {
        self.0
    }

    /// Returns the address with its octets reversed, e.g. `4.3.2.1`.
    pub fn reversed(&self) -> String {
        let [a, b, c, d] = self.0.octets();
        format!("{}.{}.{}.{}", d, c, b, a)
    }

    /// Returns the DNSBL query name for the given endpoint.
    pub fn query_name(&self, endpoint: &Endpoint) -> String {
        format!("{}.{}", self.reversed(), endpoint)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a checker reported about the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// The checker does not list the target.
    NotListed,
    /// The checker lists the target with the given return records.
    Listed {
        /// Answer records returned by the checker.
        records: Vec<IpAddr>,
    },
}

impl Listing {
    /// Returns `true` if the target is listed.
    pub fn is_listed(&self) -> bool {
        matches!(self, Self::Listed { .. })
    }
}
