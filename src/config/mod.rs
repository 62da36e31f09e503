//! Configuration for a check.
//!
//! Settings are layered, later layers overriding earlier ones:
//!
//! 1. Built-in defaults ([`defaults`])
//! 2. The YAML config file (`--config PATH`, or `~/.dnsbl-check.yaml`)
//! 3. Command-line flags and their environment variables
//!
//! The resulting [`Settings`] value is passed explicitly to the aggregator.

pub mod defaults;
mod loader;

pub use defaults::{
    CONFIG_FILE_NAME, DEFAULT_BLACKLIST_SERVERS, DEFAULT_PROBE_TIMEOUT, DEFAULT_TIMEOUT,
};
pub use loader::{default_config_path, discover, load_file, FileConfig};

use crate::core::{CheckError, Endpoint};
use crate::manager::AggregatorConfig;

#[cfg(feature = "dns")]
use crate::backends::DnsProbeConfig;

use std::path::PathBuf;
use std::time::Duration;

/// Values supplied on the command line. `None` leaves the lower layer alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Deadline in seconds.
    pub timeout: Option<u64>,
    /// DNS lookup timeout in seconds.
    pub probe_timeout: Option<u64>,
    /// Log verbosity.
    pub verbosity: Option<u8>,
    /// Suppress critical results.
    pub suppress_crit: Option<bool>,
    /// Blacklist zones replacing the configured list when non-empty.
    pub servers: Vec<String>,
}

/// Effective settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Blacklist zones to query.
    pub blacklist_servers: Vec<Endpoint>,
    /// Deadline for the whole check.
    pub timeout: Duration,
    /// I/O timeout for one lookup.
    pub probe_timeout: Duration,
    /// 0 = normal, 1 = debug.
    pub verbosity: u8,
    /// Report listings as warnings instead of criticals.
    pub suppress_crit: bool,
    /// Config file the settings were read from, if any.
    pub config_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            blacklist_servers: DEFAULT_BLACKLIST_SERVERS
                .iter()
                .filter_map(|zone| Endpoint::parse(zone).ok())
                .collect(),
            timeout: DEFAULT_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            verbosity: 0,
            suppress_crit: false,
            config_path: None,
        }
    }
}

impl Settings {
    /// Merges the config file and command-line overrides over the defaults.
    pub fn resolve(file: Option<&FileConfig>, overrides: &Overrides) -> Result<Self, CheckError> {
        let mut settings = Self::default();

        if let Some(file) = file {
            if let Some(servers) = &file.blacklist_servers {
                settings.blacklist_servers = parse_endpoints(servers)?;
            }
            if let Some(timeout) = file.timeout {
                settings.timeout = Duration::from_secs(timeout);
            }
            if let Some(probe_timeout) = file.probe_timeout {
                settings.probe_timeout = Duration::from_secs(probe_timeout);
            }
            if let Some(verbosity) = file.verbosity {
                settings.verbosity = verbosity;
            }
            if let Some(suppress) = file.suppress_crit {
                settings.suppress_crit = suppress;
            }
        }

        if !overrides.servers.is_empty() {
            settings.blacklist_servers = parse_endpoints(&overrides.servers)?;
        }
        if let Some(timeout) = overrides.timeout {
            settings.timeout = Duration::from_secs(timeout);
        }
        if let Some(probe_timeout) = overrides.probe_timeout {
            settings.probe_timeout = Duration::from_secs(probe_timeout);
        }
        if let Some(verbosity) = overrides.verbosity {
            settings.verbosity = verbosity;
        }
        if let Some(suppress) = overrides.suppress_crit {
            settings.suppress_crit = suppress;
        }

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), CheckError> {
        if self.timeout.is_zero() {
            return Err(CheckError::configuration("timeout must be at least 1 second"));
        }
        if self.probe_timeout.is_zero() {
            return Err(CheckError::configuration(
                "probe timeout must be at least 1 second",
            ));
        }
        Ok(())
    }

    /// Returns the aggregator configuration.
    pub fn aggregator_config(&self) -> AggregatorConfig {
        AggregatorConfig::new()
            .with_deadline(self.timeout)
            .with_suppress_fatal(self.suppress_crit)
    }

    /// Returns the DNS probe configuration.
    #[cfg(feature = "dns")]
    pub fn dns_probe_config(&self) -> DnsProbeConfig {
        DnsProbeConfig::new().with_timeout(self.probe_timeout)
    }
}

fn parse_endpoints(zones: &[String]) -> Result<Vec<Endpoint>, CheckError> {
    zones.iter().map(|zone| Endpoint::parse(zone)).collect()
}
