//! Command-line interface.

pub mod args;

pub use args::{CheckArgs, Cli, Commands};

use crate::backends::DnsProbe;
use crate::config::{self, Settings};
use crate::core::{ArcProbe, CheckError, Outcome, Resolution, Severity, Target};
use crate::manager::Aggregator;
use crate::report::{self, OutputFormat};

use std::sync::Arc;

/// What the binary prints and how it exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Process exit code.
    pub exit_code: u8,
    /// Lines for stdout.
    pub lines: Vec<String>,
}

impl CommandOutput {
    fn from_outcome(outcome: &Outcome, format: OutputFormat) -> Self {
        Self {
            exit_code: outcome.exit_code(),
            lines: vec![report::render(outcome, format)],
        }
    }
}

/// Loads the config file and merges it with the command line.
pub fn load_settings(cli: &Cli) -> Result<Settings, CheckError> {
    let file = config::discover(cli.config.as_deref())?;
    let mut settings =
        Settings::resolve(file.as_ref().map(|(_, config)| config), &cli.overrides())?;
    settings.config_path = file.map(|(path, _)| path);
    Ok(settings)
}

/// Runs the parsed command.
pub async fn dispatch(cli: &Cli, settings: Result<Settings, CheckError>) -> CommandOutput {
    match &cli.command {
        Commands::Check(args) => {
            let outcome = match settings {
                Ok(settings) => {
                    let probe: ArcProbe = Arc::new(DnsProbe::new(settings.dns_probe_config()));
                    run_check(args.target.as_deref(), &settings, probe).await
                }
                Err(e) => rejected(&e),
            };
            CommandOutput::from_outcome(&outcome, cli.output)
        }
        Commands::Servers => match settings {
            Ok(settings) => CommandOutput {
                exit_code: 0,
                lines: settings
                    .blacklist_servers
                    .iter()
                    .map(|endpoint| endpoint.to_string())
                    .collect(),
            },
            Err(e) => CommandOutput::from_outcome(&rejected(&e), cli.output),
        },
    }
}

/// Checks `target` against every configured server using `probe`.
///
/// The target is validated before any probe is started.
pub async fn run_check(target: Option<&str>, settings: &Settings, probe: ArcProbe) -> Outcome {
    let target = match target {
        Some(input) => match Target::parse(input) {
            Ok(target) => target,
            Err(e) => return rejected(&e),
        },
        None => return rejected(&CheckError::invalid_target("", "no target given")),
    };

    let aggregator = match Aggregator::builder()
        .with_arc_probe(probe)
        .with_endpoints(settings.blacklist_servers.iter().cloned())
        .with_config(settings.aggregator_config())
        .build()
    {
        Ok(aggregator) => aggregator,
        Err(e) => return rejected(&e),
    };

    aggregator.check_target(target).await
}

/// The result line for arguments clap could not parse.
pub fn usage_error(error: &clap::Error) -> Outcome {
    let rendered = error.render().to_string();
    let first_line = rendered
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("invalid arguments")
        .trim()
        .trim_start_matches("error: ");

    Outcome::new(
        Severity::Indeterminate,
        format!("invalid arguments: {}", first_line),
        Resolution::InvalidInput,
    )
}

fn rejected(error: &CheckError) -> Outcome {
    tracing::warn!(error = %error, "Check rejected");
    Outcome::invalid_input(error)
}
