//! dnsbl-check entry point.

use std::process::ExitCode;

use clap::Parser;
use dnsbl_check::cli::{self, Cli};
use dnsbl_check::report;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const UNKNOWN: u8 = 3;

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. Verbosity 1 sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
///
/// Logs go to stderr; stdout carries only the result line.
fn init_tracing(verbosity: u8) {
    let filter = if verbosity >= 1 {
        EnvFilter::new("dnsbl_check=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dnsbl_check=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            if !e.use_stderr() {
                // --help and --version
                return ExitCode::SUCCESS;
            }
            let outcome = cli::usage_error(&e);
            println!("{}", report::render(&outcome, Default::default()));
            return ExitCode::from(UNKNOWN);
        }
    };

    let settings = cli::load_settings(&cli);
    let verbosity = match &settings {
        Ok(settings) => settings.verbosity,
        Err(_) => cli.verbosity.unwrap_or(0),
    };
    init_tracing(verbosity);

    tracing::debug!("dnsbl-check starting with args: {:?}", cli);
    if let Ok(Some(path)) = settings.as_ref().map(|s| s.config_path.as_ref()) {
        tracing::debug!(path = %path.display(), "Loaded config file");
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            println!("UNKNOWN: failed to start async runtime: {}", e);
            return ExitCode::from(UNKNOWN);
        }
    };

    let output = runtime.block_on(cli::dispatch(&cli, settings));

    // Producers still blocked on a slow resolver must not delay the exit.
    runtime.shutdown_background();

    for line in &output.lines {
        println!("{}", line);
    }
    ExitCode::from(output.exit_code)
}
