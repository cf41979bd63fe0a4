//! Logging setup on top of `tracing-subscriber`
//!
//! Log lines go to stderr so `--json` command output on stdout stays clean.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::{ShortclipError, ShortclipResult};

/// Validate a level name such as `info` or `debug`
pub fn parse_level(level: &str) -> ShortclipResult<LevelFilter> {
    level
        .trim()
        .parse::<LevelFilter>()
        .map_err(|_| ShortclipError::Config {
            message: format!(
                "Unknown log level '{}', expected one of: off, error, warn, info, debug, trace",
                level
            ),
        })
}

/// Build the filter; `RUST_LOG` wins over the configured level when set
pub fn build_filter(level: &str) -> ShortclipResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => {
            let level = parse_level(level)?;
            Ok(EnvFilter::new(level.to_string()))
        }
    }
}

/// Install the global subscriber
pub fn init_logging(level: &str, json: bool) -> ShortclipResult<()> {
    let filter = build_filter(level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| ShortclipError::Config {
        message: format!("Failed to initialize logging: {}", e),
    })
}
