//! Probe backend implementations.
//!
//! This module contains implementations of the `Probe` trait.
//!
//! ## Available Backends
//!
//! - [`mock`] - A scripted probe for testing
//! - [`dns`] - DNSBL lookups through the system resolver (requires `dns` feature)

pub mod mock;

#[cfg(feature = "dns")]
pub mod dns;

// Re-exports
pub use mock::{MockBehavior, MockProbe};

#[cfg(feature = "dns")]
pub use dns::{DnsProbe, DnsProbeConfig};
