//! Structured audit logging.
//!
//! This module provides functions for emitting structured audit events
//! using the `tracing` crate under the `dnsbl_check::audit` target. Events
//! can be captured by any tracing subscriber.

mod events;

pub use events::{
    emit_check_resolved, emit_check_started, emit_verdict_received, AuditEvent, CheckAuditEvent,
};
