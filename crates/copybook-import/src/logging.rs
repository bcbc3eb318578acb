//! Structured logging setup.

use thiserror::Error;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text.
    Text,
    /// JSON for log aggregation.
    Json,
}

impl LogFormat {
    /// Parse from a CLI string; unrecognized values mean text.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// Tracing initialization errors.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum TracingError {
    #[error("failed to initialize tracing: {0}")]
    Init(String),
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug over
/// info.
pub fn init(verbose: bool, format: &str) -> Result<(), TracingError> {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match LogFormat::parse(format) {
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_target(true);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(json_layer)
                .try_init()
                .map_err(|e| TracingError::Init(e.to_string()))?;
        }
        LogFormat::Text => {
            let text_layer = fmt::layer().with_target(false);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(text_layer)
                .try_init()
                .map_err(|e| TracingError::Init(e.to_string()))?;
        }
    }
    Ok(())
}
