//! Aggregation outcome.
//!
//! This module defines `Outcome`, the single overall result of a check,
//! together with the reason the decision loop stopped.

use crate::core::error::CheckError;
use crate::core::types::{Endpoint, Severity, Verdict};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Message reported when no checker lists the target.
pub const NOT_LISTED_MESSAGE: &str = "target is not listed";

/// Why the decision loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Every checker reported not listed.
    AllNormal,
    /// All producers finished and at most one verdict was never delivered.
    Drained,
    /// A non-normal verdict arrived and ended the check.
    Decisive,
    /// A listing arrived but was downgraded because fatal results are suppressed.
    Suppressed,
    /// The aggregation deadline fired first.
    Deadline,
    /// The input was rejected before any checker was queried.
    InvalidInput,
}

/// The overall result of one check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Final severity.
    pub severity: Severity,

    /// Human-readable message.
    pub message: String,

    /// Why the check stopped.
    pub resolution: Resolution,

    /// The endpoint whose verdict decided the check, if any.
    pub endpoint: Option<Endpoint>,

    /// Number of verdicts consumed by the decision loop.
    pub consumed: usize,

    /// Number of checkers that had not reported normal when the check stopped.
    pub outstanding: usize,

    /// Wall-clock time spent deciding.
    #[serde(with = "duration_serde")]
    pub elapsed: Duration,
}

impl Outcome {
    /// Creates an outcome with no consumption bookkeeping.
    pub fn new(severity: Severity, message: impl Into<String>, resolution: Resolution) -> Self {
        Self {
            severity,
            message: message.into(),
            resolution,
            endpoint: None,
            consumed: 0,
            outstanding: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Creates the outcome for every checker reporting not listed.
    pub fn not_listed(resolution: Resolution) -> Self {
        Self::new(Severity::Normal, NOT_LISTED_MESSAGE, resolution)
    }

    /// Creates the outcome for a decisive verdict.
    pub fn from_verdict(verdict: Verdict, suppress_fatal: bool) -> Self {
        let (severity, resolution) = match verdict.severity() {
            Severity::Fatal if suppress_fatal => (Severity::Degraded, Resolution::Suppressed),
            severity => (severity, Resolution::Decisive),
        };
        let endpoint = verdict.endpoint().cloned();

        Self {
            endpoint,
            ..Self::new(severity, verdict.message(), resolution)
        }
    }

    /// Creates the outcome for the deadline firing.
    pub fn deadline(outstanding: usize) -> Self {
        let noun = if outstanding == 1 { "checker" } else { "checkers" };
        Self {
            outstanding,
            ..Self::new(
                Severity::Degraded,
                format!(
                    "deadline reached with {} {} still outstanding",
                    outstanding, noun
                ),
                Resolution::Deadline,
            )
        }
    }

    /// Creates the outcome for rejected input.
    pub fn invalid_input(error: &CheckError) -> Self {
        Self::new(error.severity(), error.to_string(), Resolution::InvalidInput)
    }

    /// Records bookkeeping from the decision loop.
    pub fn with_progress(mut self, consumed: usize, outstanding: usize) -> Self {
        self.consumed = consumed;
        self.outstanding = outstanding;
        self
    }

    /// Records the elapsed time.
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// Returns the process exit code.
    pub fn exit_code(&self) -> u8 {
        self.severity.exit_code()
    }

    /// Returns `true` if the target was found on a blacklist, even if suppressed.
    pub fn is_listed(&self) -> bool {
        self.severity == Severity::Fatal || self.resolution == Resolution::Suppressed
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity.label(), self.message)
    }
}

/// Serde helper for Duration serialization.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
