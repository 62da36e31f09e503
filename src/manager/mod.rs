//! Aggregation of verdicts from many blacklist servers.
//!
//! The `Aggregator` fans a check out to one producer task per endpoint,
//! races the results against a deadline and reduces them to one outcome.

mod aggregator;
mod deadline;
mod decision;
mod producer;

pub use aggregator::{Aggregator, AggregatorBuilder, AggregatorConfig};
pub use deadline::Deadline;
pub use decision::DecisionLoop;
pub use producer::{produce_verdict, spawn_producer, verdict_for};
