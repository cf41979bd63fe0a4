//! shortclip library
//!
//! Clamps a requested trim window to a source video, plans the centered
//! crop that turns it into a vertical 9:16 frame, and drives ffprobe, ffmpeg
//! and yt-dlp to produce the short.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use config::{ConfigSource, ShortclipConfig};
pub use domain::errors::{DomainError, PlanError};
pub use domain::model::{AspectRatio, CropRect, FrameSize, TimeWindow};
pub use domain::rules::{AspectCropPlanner, ExportPlanner, WindowClamp};
pub use error::{ShortclipError, ShortclipResult};
