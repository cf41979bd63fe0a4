//! CLI module for shortclip
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::ShortclipConfig;

pub mod args;
pub mod commands;

/// shortclip - turn landscape videos into vertical shorts
///
/// Pick a window of a local or downloaded video; shortclip clamps it to the
/// source, center-crops to 9:16 and encodes a 1080x1920 MP4.
#[derive(Parser, Debug)]
#[command(name = "shortclip")]
#[command(about = "Cut vertical short clips out of longer videos")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./shortclip.toml when present)
    #[arg(long, global = true, env = "SHORTCLIP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level (overrides the configuration)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the trim window and crop for given source properties
    Plan(args::PlanArgs),
    /// Show duration, resolution and size of a video file
    Inspect(args::InspectArgs),
    /// Download a video into the cache directory
    Download(args::DownloadArgs),
    /// Export a vertical short from a local video
    Export(args::ExportArgs),
    /// Download a video and export a short from it
    Short(args::ShortArgs),
    /// List demo videos from the media directory
    Demos(args::DemosArgs),
}

impl Cli {
    /// Apply global flags on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut ShortclipConfig) {
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if self.json_logs {
            config.logging.json = true;
        }
    }

    /// Run the selected command
    pub async fn run(self, config: ShortclipConfig) -> Result<()> {
        match self.command {
            Commands::Plan(args) => commands::plan(args, &config),
            Commands::Inspect(args) => commands::inspect(args, &config).await,
            Commands::Download(args) => commands::download(args, &config).await,
            Commands::Export(args) => commands::export(args, config).await,
            Commands::Short(args) => commands::short(args, config).await,
            Commands::Demos(args) => commands::demos(args, &config),
        }
    }
}
