//! Tracing subscriber setup shared by every subcommand.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Default)]
pub struct LoggingOptions<'a> {
    pub verbose: bool,
    pub json: bool,
    pub log_file: Option<&'a Path>,
}

/// `RUST_LOG` wins when set; otherwise `verbose` selects debug over info.
pub fn build_filter(verbose: bool) -> EnvFilter {
    let default_level = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}={},tower_http=info,sqlx=warn",
            env!("CARGO_CRATE_NAME"),
            default_level
        ))
    })
}

pub fn init_logging(options: &LoggingOptions<'_>) -> Result<()> {
    let filter = build_filter(options.verbose);
    let builder = fmt().with_env_filter(filter).with_target(true).with_level(true);

    let outcome = match (options.log_file, options.json) {
        (Some(path), json) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let builder = builder.with_ansi(false).with_writer(Arc::new(file));
            if json {
                builder.json().try_init()
            } else {
                builder.try_init()
            }
        }
        (None, true) => builder.json().try_init(),
        (None, false) => builder.try_init(),
    };

    outcome.map_err(|e| PipelineError::Config(format!("Failed to install logger: {}", e)))
}
