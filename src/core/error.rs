//! Error types for the dnsbl-check library.
//!
//! Two families exist. [`CheckError`] covers bad input and configuration
//! and is raised before any probe starts. [`ProbeError`] covers a single
//! checker's failure and is always converted into a
//! [`Verdict`](crate::core::Verdict) at the producer boundary; it never
//! propagates out of an aggregation.

use crate::core::types::Severity;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors rejected before an aggregation starts.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The target is missing or not an IPv4 address.
    #[error("invalid target '{input}': {reason}")]
    InvalidTarget {
        /// The raw input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A blacklist zone could not be parsed.
    #[error("invalid blacklist server '{zone}': {reason}")]
    InvalidEndpoint {
        /// The raw zone name.
        zone: String,
        /// Why it was rejected.
        reason: String,
    },

    /// No blacklist servers were configured.
    #[error("no blacklist servers configured")]
    NoEndpoints,

    /// The configuration file could not be read.
    #[error("failed to read config at {}: {source}", path.display())]
    ConfigRead {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be parsed.
    #[error("failed to parse config at {}: {message}", path.display())]
    ConfigParse {
        /// Path of the config file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// Invalid configuration values.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the problem.
        message: String,
    },
}

impl CheckError {
    /// Creates an `InvalidTarget` error.
    pub fn invalid_target(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates an `InvalidEndpoint` error.
    pub fn invalid_endpoint(zone: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            zone: zone.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `Configuration` error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Severity reported when this error stops a check. Always indeterminate.
    pub fn severity(&self) -> Severity {
        Severity::Indeterminate
    }
}

/// Failure of a single probe against one blacklist server.
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    /// The probe's own I/O deadline elapsed.
    #[error("lookup of {query} timed out after {elapsed:?}")]
    Timeout {
        /// The name that was queried.
        query: String,
        /// How long the lookup ran.
        elapsed: Duration,
    },

    /// A temporary failure that might succeed later.
    #[error("temporary failure resolving {query}: {message}")]
    Transient {
        /// The name that was queried.
        query: String,
        /// Resolver message.
        message: String,
    },

    /// Malformed answer, protocol error or unexpected status.
    #[error("unexpected response for {query}: {message}")]
    Protocol {
        /// The name that was queried.
        query: String,
        /// Raw error or status.
        message: String,
    },

    /// The probe panicked instead of returning.
    #[error("probe panicked: {message}")]
    Panicked {
        /// Panic payload, if it was a string.
        message: String,
    },
}

impl ProbeError {
    /// Creates a `Timeout` error.
    pub fn timeout(query: impl Into<String>, elapsed: Duration) -> Self {
        Self::Timeout {
            query: query.into(),
            elapsed,
        }
    }

    /// Creates a `Transient` error.
    pub fn transient(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transient {
            query: query.into(),
            message: message.into(),
        }
    }

    /// Creates a `Protocol` error.
    pub fn protocol(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Protocol {
            query: query.into(),
            message: message.into(),
        }
    }

    /// Returns the verdict severity this failure maps to.
    pub fn severity(&self) -> Severity {
        match self {
            Self::Timeout { .. } => Severity::Degraded,
            Self::Transient { .. } | Self::Protocol { .. } | Self::Panicked { .. } => {
                Severity::Indeterminate
            }
        }
    }

    /// Returns `true` if this is the probe's own timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// A specialized `Result` type for pre-flight checks.
pub type CheckResult<T> = Result<T, CheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_error_severity() {
        let timeout = ProbeError::timeout("2.0.0.127.bl.example.org", Duration::from_secs(5));
        assert_eq!(timeout.severity(), Severity::Degraded);
        assert!(timeout.is_timeout());

        let transient = ProbeError::transient("q", "try again");
        assert_eq!(transient.severity(), Severity::Indeterminate);

        let protocol = ProbeError::protocol("q", "SERVFAIL");
        assert_eq!(protocol.severity(), Severity::Indeterminate);
    }

    #[test]
    fn test_check_error_display() {
        let err = CheckError::invalid_target("300.1.1.1", "not an IP address");
        assert!(err.to_string().contains("300.1.1.1"));
        assert_eq!(err.severity(), Severity::Indeterminate);

        let err = CheckError::ConfigParse {
            path: PathBuf::from("/tmp/config.yaml"),
            message: "bad indent".into(),
        };
        assert!(err.to_string().contains("/tmp/config.yaml"));
    }

    #[test]
    fn test_protocol_error_keeps_raw_message() {
        let err = ProbeError::protocol("2.0.0.127.bl.example.org", "answer 10.0.0.1");
        assert!(err.to_string().contains("answer 10.0.0.1"));
    }
}
