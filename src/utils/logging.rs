//! Logging configuration and subscriber setup

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::{PanZoomError, PanZoomResult};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line format
    #[default]
    Pretty,
    /// Single-line text format
    Compact,
    /// JSON format for structured logging
    Json,
}

impl FromStr for LogFormat {
    type Err = PanZoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(PanZoomError::validation(format!(
                "Unknown log format: {}. Use pretty, compact or json",
                s
            ))),
        }
    }
}

/// Build the level filter; `RUST_LOG` wins over `level` when set
pub fn build_filter(level: &str) -> PanZoomResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level)
        .map_err(|e| PanZoomError::validation(format!("Invalid log level '{}': {}", level, e)))
}

/// Install the global subscriber, writing to stderr
pub fn init_logging(level: &str, format: LogFormat) -> PanZoomResult<()> {
    let filter = build_filter(level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = match format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| PanZoomError::validation(format!("Logging already initialized: {}", e)))?;

    tracing::debug!("Logging initialized at {} ({:?})", level, format);
    Ok(())
}
