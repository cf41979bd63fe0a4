//! shortclip - vertical short clipper
//!
//! Cuts a window out of a local or downloaded video, center-crops it to
//! 9:16 and encodes a 1080x1920 MP4.
//!
//! # Usage
//!
//! ```bash
//! shortclip plan --duration 95.4 --width 1920 --height 1080 --start 12 --end 40
//! shortclip export --input talk.mp4 --start 01:10 --end 01:40
//! shortclip short --url https://youtu.be/abc --start 30
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use shortclip_cli::cli::Cli;
use shortclip_cli::config::ShortclipConfig;
use shortclip_cli::utils::logging;

/// Main entry point for the shortclip CLI
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The log level itself comes from the configuration
    let (mut config, source) = ShortclipConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);

    logging::init_logging(&config.logging.level, config.logging.json)?;
    source.log();
    debug!(command = ?cli.command, "starting shortclip");

    cli.run(config).await
}
