//! # dnsbl-check
//!
//! Checks an IPv4 address against many DNS blacklists in parallel and
//! reduces the answers to a single Nagios plugin result.
//!
//! ## Overview
//!
//! Every blacklist server is queried by its own task. The verdicts are
//! consumed by a single decision loop that stops at the first bad news, at
//! the deadline, or when every server has answered not listed:
//!
//! - Listed on any blacklist: `CRITICAL` (or `WARNING` when suppressed)
//! - A lookup timed out or the deadline was reached: `WARNING`
//! - A lookup failed in some other way, or the input was invalid: `UNKNOWN`
//! - Not listed anywhere: `OK`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dnsbl_check::backends::DnsProbe;
//! use dnsbl_check::{Aggregator, Endpoint};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let aggregator = Aggregator::builder()
//!         .with_probe(DnsProbe::default())
//!         .add_endpoint(Endpoint::parse("zen.spamhaus.org")?)
//!         .build()?;
//!
//!     let outcome = aggregator.check("192.0.2.1").await;
//!     println!("{}", outcome);
//!     std::process::exit(outcome.exit_code().into());
//! }
//! ```
//!
//! ## Features
//!
//! - `default` - Includes the DNS backend
//! - `dns` - Lookups through the system resolver, plus the CLI
//!
//! ## Architecture
//!
//! - **Core**: Severities, verdicts, outcomes, the probe trait and errors
//! - **Backends**: DNS and scripted mock probes
//! - **Manager**: Producers, the deadline and the decision loop
//! - **Config**: Defaults, the YAML file and command-line layering
//! - **Report**: Rendering of the result line
//! - **Audit**: Structured events for each check

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod audit;
pub mod backends;
#[cfg(feature = "dns")]
pub mod cli;
pub mod config;
pub mod core;
pub mod manager;
pub mod report;

// Re-export commonly used types at the crate root
pub use crate::core::{
    ArcProbe, CheckError, CheckResult, Endpoint, Listing, Outcome, Probe, ProbeError, Resolution,
    Severity, Target, Verdict,
};
pub use crate::config::Settings;
pub use crate::manager::{Aggregator, AggregatorBuilder, AggregatorConfig};
pub use crate::report::OutputFormat;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::backends::{MockBehavior, MockProbe};
    pub use crate::config::{Overrides, Settings};
    pub use crate::core::{
        CheckError, Endpoint, Listing, Outcome, Probe, ProbeError, Resolution, Severity, Target,
        Verdict,
    };
    pub use crate::manager::{Aggregator, AggregatorBuilder, AggregatorConfig};
    pub use crate::report::{render, OutputFormat};

    #[cfg(feature = "dns")]
    pub use crate::backends::{DnsProbe, DnsProbeConfig};
}
