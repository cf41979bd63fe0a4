//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Source duration (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(short, long)]
    pub duration: String,

    /// Source width in pixels
    #[arg(long, allow_negative_numbers = true)]
    pub width: i64,

    /// Source height in pixels
    #[arg(long, allow_negative_numbers = true)]
    pub height: i64,

    /// Start time (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(short, long)]
    pub start: Option<String>,

    /// End time (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(short, long)]
    pub end: Option<String>,

    /// Target aspect ratio (W:H, W/H or decimal)
    #[arg(long, default_value = "9:16")]
    pub ratio: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the download command
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Video URL
    #[arg(short, long)]
    pub url: String,

    /// Download directory (default: the configured cache directory)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
}

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Start time (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(short, long)]
    pub start: Option<String>,

    /// End time (default: 30 seconds after the start)
    #[arg(short, long)]
    pub end: Option<String>,

    /// Output directory (default: the configured output directory)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Encoding preset (fast, medium, slow)
    #[arg(long)]
    pub preset: Option<String>,
}

/// Arguments for the short command
#[derive(Args, Debug)]
pub struct ShortArgs {
    /// Video URL
    #[arg(short, long)]
    pub url: String,

    /// Start time (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(short, long)]
    pub start: Option<String>,

    /// End time (default: 30 seconds after the start)
    #[arg(short, long)]
    pub end: Option<String>,

    /// Output directory (default: the configured output directory)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Encoding preset (fast, medium, slow)
    #[arg(long)]
    pub preset: Option<String>,
}

/// Arguments for the demos command
#[derive(Args, Debug)]
pub struct DemosArgs {
    /// Media directory (default: the configured media directory)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
