//! Per-endpoint verdict producers.
//!
//! A producer runs one probe and turns whatever happens into exactly one
//! [`Verdict`], including a panic inside the probe.

use crate::core::{ArcProbe, Endpoint, Listing, Probe, ProbeError, Severity, Target, Verdict};

use futures::FutureExt;
use std::any::Any;
use std::net::IpAddr;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Spawns a task that probes one endpoint and sends one verdict.
///
/// The send is allowed to fail: once the decision loop has resolved it drops
/// the receiver and late verdicts are discarded.
pub fn spawn_producer(
    probe: ArcProbe,
    target: Target,
    endpoint: Endpoint,
    results: mpsc::Sender<Verdict>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let verdict = produce_verdict(probe.as_ref(), &target, &endpoint).await;

        tracing::debug!(
            endpoint = %endpoint,
            severity = %verdict.severity(),
            "Checker reported"
        );

        if results.send(verdict).await.is_err() {
            tracing::trace!(endpoint = %endpoint, "Check already resolved, verdict dropped");
        }
    })
}

/// Probes one endpoint and maps the result to a verdict.
pub async fn produce_verdict(probe: &dyn Probe, target: &Target, endpoint: &Endpoint) -> Verdict {
    let result = AssertUnwindSafe(probe.probe(target, endpoint))
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| {
            Err(ProbeError::Panicked {
                message: panic_message(payload.as_ref()),
            })
        });

    verdict_for(target, endpoint, result)
}

/// Maps a probe result to a verdict.
///
/// - not listed is normal
/// - the probe's own timeout is degraded
/// - a listing is fatal and names the target, the endpoint and the records
/// - every other failure is indeterminate and carries the raw error
pub fn verdict_for(
    target: &Target,
    endpoint: &Endpoint,
    result: Result<Listing, ProbeError>,
) -> Verdict {
    let verdict = match result {
        Ok(Listing::NotListed) => Verdict::new(
            Severity::Normal,
            format!(
                "{} is not listed on blacklist domain {}",
                target.reversed(),
                endpoint
            ),
        ),
        Ok(Listing::Listed { records }) => Verdict::new(
            Severity::Fatal,
            format!(
                "{} is listed on the blacklist with domain {} by [{}]",
                target,
                endpoint,
                format_records(&records)
            ),
        ),
        Err(error @ ProbeError::Transient { .. }) => Verdict::new(
            Severity::Indeterminate,
            format!("a temporary failure was detected on {}: {}", endpoint, error),
        ),
        Err(error) => Verdict::new(error.severity(), format!("{}: {}", endpoint, error)),
    };

    verdict.with_endpoint(endpoint.clone())
}

fn format_records(records: &[IpAddr]) -> String {
    records
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
