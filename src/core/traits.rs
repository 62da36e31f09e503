//! Core traits for the dnsbl-check library.
//!
//! This module defines the `Probe` trait, the seam between the aggregation
//! core and the transport used to query a single blacklist server.

use crate::core::error::ProbeError;
use crate::core::types::{Endpoint, Listing, Target};

use async_trait::async_trait;
use std::fmt::Debug;

/// Queries one blacklist server about one target.
///
/// The aggregator treats a probe as an opaque asynchronous operation. It
/// calls [`Probe::probe`] exactly once per endpoint per check and never
/// retries.
///
/// # Implementation Notes
///
/// - Implementations must be `Send + Sync`; one probe instance is shared by
///   all producer tasks of a check.
/// - A probe owns its own I/O timeout and reports it as
///   [`ProbeError::Timeout`]. The aggregation deadline is separate.
/// - Implementations should not panic. A panic is caught by the producer and
///   reported as an indeterminate verdict.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use dnsbl_check::core::{Endpoint, Listing, Probe, ProbeError, Target};
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct AlwaysClean;
///
/// #[async_trait]
/// impl Probe for AlwaysClean {
///     fn name(&self) -> &str {
///         "always-clean"
///     }
///
///     async fn probe(
///         &self,
///         _target: &Target,
///         _endpoint: &Endpoint,
///     ) -> Result<Listing, ProbeError> {
///         Ok(Listing::NotListed)
///     }
/// }
/// ```
#[async_trait]
pub trait Probe: Send + Sync + Debug {
    /// Returns a short name for this transport, used in logs.
    fn name(&self) -> &str;

    /// Asks `endpoint` whether `target` is listed.
    ///
    /// # Errors
    ///
    /// - `Timeout` - the probe's own I/O deadline elapsed.
    /// - `Transient` - a temporary failure occurred.
    /// - `Protocol` - the answer was malformed or unexpected.
    async fn probe(&self, target: &Target, endpoint: &Endpoint) -> Result<Listing, ProbeError>;
}

/// An arc-wrapped probe for shared ownership across producer tasks.
pub type ArcProbe = std::sync::Arc<dyn Probe>;
