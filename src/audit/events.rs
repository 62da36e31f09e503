//! Audit event types and emission functions.

use crate::core::{Outcome, Resolution, Severity, Target, Verdict};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base trait for audit events.
pub trait AuditEvent: Serialize {
    /// Returns the event type name.
    fn event_type(&self) -> &'static str;

    /// Returns the timestamp of the event.
    fn timestamp(&self) -> DateTime<Utc>;
}

/// Audit event for a resolved check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckAuditEvent {
    /// Timestamp of the event.
    pub timestamp: DateTime<Utc>,

    /// Unique check ID.
    pub check_id: String,

    /// The address that was checked.
    pub target: String,

    /// Final severity.
    pub severity: Severity,

    /// Nagios exit code.
    pub exit_code: u8,

    /// Why the check stopped.
    pub resolution: Resolution,

    /// Endpoint whose verdict decided the check.
    pub endpoint: Option<String>,

    /// Verdicts consumed before resolving.
    pub consumed: usize,

    /// Checkers still outstanding.
    pub outstanding: usize,

    /// Decision time in milliseconds.
    pub duration_ms: u64,

    /// Final message.
    pub message: String,
}

impl CheckAuditEvent {
    /// Builds the event for an outcome.
    pub fn new(check_id: &str, target: &Target, outcome: &Outcome) -> Self {
        Self {
            timestamp: Utc::now(),
            check_id: check_id.to_string(),
            target: target.to_string(),
            severity: outcome.severity,
            exit_code: outcome.exit_code(),
            resolution: outcome.resolution,
            endpoint: outcome.endpoint.as_ref().map(ToString::to_string),
            consumed: outcome.consumed,
            outstanding: outcome.outstanding,
            duration_ms: outcome.elapsed.as_millis() as u64,
            message: outcome.message.clone(),
        }
    }
}

impl AuditEvent for CheckAuditEvent {
    fn event_type(&self) -> &'static str {
        "check_resolved"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Emits an audit event for a check starting.
pub fn emit_check_started(check_id: &str, target: &Target, endpoint_count: usize) {
    tracing::info!(
        target: "dnsbl_check::audit",
        event_type = "check_started",
        check_id = %check_id,
        ip = %target,
        query_prefix = %target.reversed(),
        endpoint_count = endpoint_count,
        "Check started"
    );
}

/// Emits an audit event for a verdict consumed by the decision loop.
pub fn emit_verdict_received(check_id: &str, verdict: &Verdict, consumed: usize, pending: usize) {
    tracing::debug!(
        target: "dnsbl_check::audit",
        event_type = "verdict_received",
        check_id = %check_id,
        endpoint = ?verdict.endpoint().map(|e| e.as_str()),
        severity = %verdict.severity(),
        consumed = consumed,
        pending = pending,
        message = %verdict.message(),
        "Verdict received"
    );
}

/// Emits an audit event for a resolved check.
pub fn emit_check_resolved(event: &CheckAuditEvent) {
    tracing::info!(
        target: "dnsbl_check::audit",
        event_type = event.event_type(),
        check_id = %event.check_id,
        ip = %event.target,
        severity = %event.severity,
        exit_code = event.exit_code,
        resolution = ?event.resolution,
        endpoint = ?event.endpoint,
        consumed = event.consumed,
        outstanding = event.outstanding,
        duration_ms = event.duration_ms,
        "Check resolved"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Endpoint;

    #[test]
    fn test_check_audit_event_from_outcome() {
        let target = Target::parse("127.0.0.2").unwrap();
        let endpoint = Endpoint::parse("bl.example.org").unwrap();
        let verdict = Verdict::new(Severity::Fatal, "listed").with_endpoint(endpoint);
        let outcome = Outcome::from_verdict(verdict, false).with_progress(1, 2);

        let event = CheckAuditEvent::new("check-1", &target, &outcome);

        assert_eq!(event.event_type(), "check_resolved");
        assert_eq!(event.target, "127.0.0.2");
        assert_eq!(event.exit_code, 2);
        assert_eq!(event.endpoint.as_deref(), Some("bl.example.org"));
        assert_eq!(event.consumed, 1);
        assert_eq!(event.outstanding, 2);
    }

    #[test]
    fn test_check_audit_event_serializes() {
        let target = Target::parse("192.0.2.1").unwrap();
        let outcome = Outcome::deadline(4);
        let event = CheckAuditEvent::new("check-2", &target, &outcome);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["severity"], "degraded");
        assert_eq!(json["resolution"], "deadline");
        assert_eq!(json["outstanding"], 4);
    }
}
