//! The aggregator that fans a check out to every blacklist server.

use crate::audit::{self, CheckAuditEvent};
use crate::core::{ArcProbe, CheckError, Endpoint, Outcome, Probe, Target};
use crate::manager::deadline::Deadline;
use crate::manager::decision::DecisionLoop;
use crate::manager::producer::spawn_producer;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Configuration for the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Wall-clock budget for a whole check.
    pub deadline: Duration,

    /// Report listings as degraded instead of fatal.
    pub suppress_fatal: bool,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(30),
            suppress_fatal: false,
        }
    }
}

impl AggregatorConfig {
    /// Creates a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Enables or disables fatal suppression.
    pub fn with_suppress_fatal(mut self, suppress: bool) -> Self {
        self.suppress_fatal = suppress;
        self
    }
}

/// Builder for creating an `Aggregator`.
#[derive(Default)]
pub struct AggregatorBuilder {
    probe: Option<ArcProbe>,
    endpoints: Vec<Endpoint>,
    config: AggregatorConfig,
}

impl AggregatorBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the probe used for every endpoint.
    pub fn with_probe<P: Probe + 'static>(mut self, probe: P) -> Self {
        self.probe = Some(Arc::new(probe));
        self
    }

    /// Sets a probe wrapped in an Arc.
    pub fn with_arc_probe(mut self, probe: ArcProbe) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Adds one endpoint.
    pub fn add_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    /// Adds several endpoints.
    pub fn with_endpoints(mut self, endpoints: impl IntoIterator<Item = Endpoint>) -> Self {
        self.endpoints.extend(endpoints);
        self
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: AggregatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the aggregator.
    ///
    /// An empty endpoint list is accepted here and reported by
    /// [`Aggregator::check`] as an indeterminate outcome.
    pub fn build(self) -> Result<Aggregator, CheckError> {
        let probe = self
            .probe
            .ok_or_else(|| CheckError::configuration("a probe is required"))?;

        if self.config.deadline.is_zero() {
            return Err(CheckError::configuration("deadline must be greater than zero"));
        }

        let mut endpoints = self.endpoints;
        let before = endpoints.len();
        dedup_preserving_order(&mut endpoints);
        if endpoints.len() != before {
            tracing::debug!(
                removed = before - endpoints.len(),
                "Removed duplicate blacklist servers"
            );
        }

        Ok(Aggregator {
            probe,
            endpoints,
            config: self.config,
        })
    }
}

/// Queries every configured blacklist server in parallel and reduces their
/// verdicts to one [`Outcome`].
pub struct Aggregator {
    probe: ArcProbe,
    endpoints: Vec<Endpoint>,
    config: AggregatorConfig,
}

impl Aggregator {
    /// Creates a new builder.
    pub fn builder() -> AggregatorBuilder {
        AggregatorBuilder::new()
    }

    /// Checks a raw target string.
    ///
    /// Input that is not an IPv4 address is rejected before any probe starts.
    pub async fn check(&self, input: &str) -> Outcome {
        match Target::parse(input) {
            Ok(target) => self.check_target(target).await,
            Err(e) => {
                tracing::warn!(input = %input, error = %e, "Rejected target");
                Outcome::invalid_input(&e)
            }
        }
    }

    /// Checks a parsed target against every endpoint.
    pub async fn check_target(&self, target: Target) -> Outcome {
        if self.endpoints.is_empty() {
            let e = CheckError::NoEndpoints;
            tracing::warn!(error = %e, "Nothing to check against");
            return Outcome::invalid_input(&e);
        }

        let check_id = uuid::Uuid::new_v4().to_string();
        audit::emit_check_started(&check_id, &target, self.endpoints.len());

        // One slot per producer so no send ever waits on the consumer.
        let (tx, rx) = mpsc::channel(self.endpoints.len());
        for endpoint in &self.endpoints {
            spawn_producer(Arc::clone(&self.probe), target, endpoint.clone(), tx.clone());
        }
        drop(tx);

        let deadline = Deadline::start(self.config.deadline);

        let outcome = DecisionLoop::new(rx, deadline, self.endpoints.len())
            .with_suppress_fatal(self.config.suppress_fatal)
            .with_check_id(check_id.as_str())
            .run()
            .await;

        audit::emit_check_resolved(&CheckAuditEvent::new(&check_id, &target, &outcome));

        outcome
    }

    /// Returns the endpoints queried by each check.
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Returns the probe.
    pub fn probe(&self) -> &ArcProbe {
        &self.probe
    }
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("probe", &self.probe.name())
            .field("endpoint_count", &self.endpoints.len())
            .field("config", &self.config)
            .finish()
    }
}

fn dedup_preserving_order(endpoints: &mut Vec<Endpoint>) {
    let mut seen = std::collections::HashSet::new();
    endpoints.retain(|endpoint| seen.insert(endpoint.clone()));
}
