//! Mock probe for testing.
//!
//! This module provides a scripted probe that can be used in tests to
//! simulate blacklist answers, failures, slow servers and servers that never
//! answer, without touching the network.

use crate::core::{Endpoint, Listing, Probe, ProbeError, Target};

use async_trait::async_trait;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// What the mock does when probed.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Report the target as not listed.
    NotListed,
    /// Report the target as listed with these records.
    Listed(Vec<IpAddr>),
    /// Fail with the given error.
    Fail(ProbeError),
    /// Never answer.
    Hang,
    /// Panic inside the probe.
    Panic,
}

impl MockBehavior {
    /// A listing with the conventional `127.0.0.2` return code.
    pub fn listed() -> Self {
        Self::Listed(vec![IpAddr::V4(Ipv4Addr::new(127, 0, 0, 2))])
    }
}

#[derive(Debug, Clone)]
struct MockResponse {
    behavior: MockBehavior,
    latency: Option<Duration>,
}

/// A mock probe for testing purposes.
///
/// Responses are configured per endpoint; endpoints without a configured
/// response use the default behavior.
///
/// # Examples
///
/// ```rust
/// use dnsbl_check::backends::{MockBehavior, MockProbe};
/// use std::time::Duration;
///
/// let probe = MockProbe::new()
///     .with_response("bl.example.org", MockBehavior::listed(), Duration::from_millis(5))
///     .with_response("slow.example.org", MockBehavior::Hang, Duration::ZERO);
/// ```
#[derive(Debug)]
pub struct MockProbe {
    name: String,
    responses: HashMap<String, MockResponse>,
    default_behavior: MockBehavior,
    default_latency: Option<Duration>,
    probe_count: AtomicU64,
}

impl MockProbe {
    /// Creates a mock that reports every target as not listed.
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            responses: HashMap::new(),
            default_behavior: MockBehavior::NotListed,
            default_latency: None,
            probe_count: AtomicU64::new(0),
        }
    }

    /// Creates a mock that lists every target.
    pub fn new_listed() -> Self {
        Self::new().with_default_behavior(MockBehavior::listed())
    }

    /// Sets the name of this probe.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the behavior for endpoints without a scripted response.
    pub fn with_default_behavior(mut self, behavior: MockBehavior) -> Self {
        self.default_behavior = behavior;
        self
    }

    /// Sets the latency for endpoints without a scripted response.
    pub fn with_default_latency(mut self, latency: Duration) -> Self {
        self.default_latency = Some(latency);
        self
    }

    /// Scripts the response for one endpoint.
    ///
    /// The zone is matched after the same normalisation as [`Endpoint::parse`].
    pub fn with_response(
        mut self,
        zone: &str,
        behavior: MockBehavior,
        latency: Duration,
    ) -> Self {
        let key = zone.trim().trim_end_matches('.').to_ascii_lowercase();
        let latency = (!latency.is_zero()).then_some(latency);
        self.responses.insert(key, MockResponse { behavior, latency });
        self
    }

    /// Returns the number of probes performed.
    pub fn probe_count(&self) -> u64 {
        self.probe_count.load(Ordering::Relaxed)
    }

    fn response_for(&self, endpoint: &Endpoint) -> MockResponse {
        self.responses
            .get(endpoint.as_str())
            .cloned()
            .unwrap_or_else(|| MockResponse {
                behavior: self.default_behavior.clone(),
                latency: self.default_latency,
            })
    }
}

impl Default for MockProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Probe for MockProbe {
    fn name(&self) -> &str {
        &self.name
    }

    async fn probe(&self, target: &Target, endpoint: &Endpoint) -> Result<Listing, ProbeError> {
        self.probe_count.fetch_add(1, Ordering::Relaxed);

        let response = self.response_for(endpoint);

        if let Some(latency) = response.latency {
            tokio::time::sleep(latency).await;
        }

        match response.behavior {
            MockBehavior::NotListed => Ok(Listing::NotListed),
            MockBehavior::Listed(records) => Ok(Listing::Listed { records }),
            MockBehavior::Fail(error) => Err(error),
            MockBehavior::Hang => std::future::pending().await,
            MockBehavior::Panic => panic!(
                "mock probe scripted to panic for {}",
                target.query_name(endpoint)
            ),
        }
    }
}
