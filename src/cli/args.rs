//! CLI argument definitions.
//!
//! Every global option can also be set through a `DNSBL_CHECK_*`
//! environment variable.

use crate::config::Overrides;
use crate::report::OutputFormat;

use clap::builder::BoolishValueParser;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Check an IPv4 address against DNS blacklists, Nagios style.
#[derive(Debug, Parser)]
#[command(name = "dnsbl-check")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (default ~/.dnsbl-check.yaml)
    #[arg(long, global = true, env = "DNSBL_CHECK_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Seconds before the check gives up on outstanding servers
    #[arg(short, long, global = true, env = "DNSBL_CHECK_TIMEOUT", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Report listings as WARNING instead of CRITICAL
    ///
    /// `-s` alone enables it; `--suppresscrit=false` turns off a value set
    /// in the config file.
    #[arg(
        short,
        long,
        global = true,
        env = "DNSBL_CHECK_SUPPRESSCRIT",
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub suppresscrit: Option<bool>,

    /// Log verbosity: 0 = warnings only, 1 = debug
    #[arg(
        short,
        long,
        global = true,
        env = "DNSBL_CHECK_VERBOSITY",
        value_parser = clap::value_parser!(u8).range(0..=1)
    )]
    pub verbosity: Option<u8>,

    /// Seconds before a single DNS lookup is abandoned
    #[arg(long, global = true, env = "DNSBL_CHECK_PROBE_TIMEOUT", value_name = "SECS")]
    pub probe_timeout: Option<u64>,

    /// Result line format
    #[arg(long, global = true, env = "DNSBL_CHECK_OUTPUT", value_enum, default_value_t)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check an IPv4 address against the configured blacklists
    Check(CheckArgs),

    /// List the blacklist servers a check would query
    Servers,
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CheckArgs {
    /// Blacklist zone to query (repeatable, replaces the configured list)
    #[arg(long = "server", value_name = "ZONE")]
    pub servers: Vec<String>,

    /// IPv4 address to check
    pub target: Option<String>,
}

impl Cli {
    /// Collects the values given on the command line.
    pub fn overrides(&self) -> Overrides {
        let servers = match &self.command {
            Commands::Check(args) => args.servers.clone(),
            Commands::Servers => Vec::new(),
        };

        Overrides {
            timeout: self.timeout,
            probe_timeout: self.probe_timeout,
            verbosity: self.verbosity,
            suppress_crit: self.suppresscrit,
            servers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from([
            "dnsbl-check",
            "-t",
            "15",
            "-s",
            "check",
            "--server",
            "zen.spamhaus.org",
            "192.0.2.1",
        ])
        .unwrap();

        assert_eq!(cli.timeout, Some(15));
        assert_eq!(cli.suppresscrit, Some(true));
        match &cli.command {
            Commands::Check(args) => {
                assert_eq!(args.target.as_deref(), Some("192.0.2.1"));
                assert_eq!(args.servers, vec!["zen.spamhaus.org".to_string()]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["dnsbl-check", "check", "192.0.2.1", "-v", "1"]).unwrap();
        assert_eq!(cli.verbosity, Some(1));
    }

    #[test]
    fn test_verbosity_out_of_range() {
        let result = Cli::try_parse_from(["dnsbl-check", "-v", "2", "servers"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_target_is_accepted_by_parser() {
        let cli = Cli::try_parse_from(["dnsbl-check", "check"]).unwrap();
        match cli.command {
            Commands::Check(args) => assert!(args.target.is_none()),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "dnsbl-check",
            "--probe-timeout",
            "3",
            "check",
            "--server",
            "a.example",
            "--server",
            "b.example",
            "192.0.2.1",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.probe_timeout, Some(3));
        assert_eq!(overrides.servers.len(), 2);
        assert_eq!(overrides.suppress_crit, None);
        assert_eq!(overrides.timeout, None);
    }

    #[test]
    fn test_suppresscrit_can_be_turned_off() {
        let cli = Cli::try_parse_from(["dnsbl-check", "--suppresscrit=false", "servers"]).unwrap();
        assert_eq!(cli.suppresscrit, Some(false));
        assert_eq!(cli.overrides().suppress_crit, Some(false));

        let cli = Cli::try_parse_from(["dnsbl-check", "--suppresscrit=yes", "servers"]).unwrap();
        assert_eq!(cli.suppresscrit, Some(true));
    }

    #[test]
    fn test_suppresscrit_flag_does_not_take_next_word() {
        let cli = Cli::try_parse_from(["dnsbl-check", "-s", "check", "192.0.2.1"]).unwrap();
        assert_eq!(cli.suppresscrit, Some(true));
        assert!(matches!(cli.command, Commands::Check(_)));
    }

    #[test]
    fn test_output_format() {
        let cli = Cli::try_parse_from(["dnsbl-check", "--output", "json", "servers"]).unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
    }
}
