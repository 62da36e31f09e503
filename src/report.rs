//! Rendering of a final [`Outcome`] for the monitoring system.

use crate::core::Outcome;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How the outcome line is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `LABEL: message`, the Nagios plugin convention.
    #[default]
    Nagios,
    /// The outcome as one line of JSON.
    Json,
}

/// Renders an outcome as a single line without a trailing newline.
pub fn render(outcome: &Outcome, format: OutputFormat) -> String {
    match format {
        OutputFormat::Nagios => nagios_line(outcome),
        OutputFormat::Json => match serde_json::to_string(outcome) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    "Failed to serialize outcome, falling back to plain text"
                );
                nagios_line(outcome)
            }
        },
    }
}

fn nagios_line(outcome: &Outcome) -> String {
    // Nagios reads only the first line of plugin output.
    outcome.to_string().replace(['\r', '\n'], " ")
}
