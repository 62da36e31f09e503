//! Core types and traits for the dnsbl-check library.
//!
//! - [`types`] - `Severity`, `Verdict`, `Endpoint`, `Target`, `Listing`
//! - [`traits`] - The `Probe` trait
//! - [`error`] - Structured error types
//! - [`result`] - The aggregated `Outcome`

pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{CheckError, CheckResult, ProbeError};
pub use result::{Outcome, Resolution, NOT_LISTED_MESSAGE};
pub use traits::{ArcProbe, Probe};
pub use types::{Endpoint, Listing, Severity, Target, Verdict};
