// Domain models - Core types and data structures

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, PlanError};

/// Default shortest clip the planner accepts, in seconds
pub const DEFAULT_MIN_WINDOW_SECS: f64 = 0.5;

/// Default smallest crop side the planner accepts, in pixels
pub const DEFAULT_MIN_CROP_PX: u32 = 16;

/// Default clip length offered when the caller gives no end time
pub const DEFAULT_CLIP_SECS: f64 = 30.0;

/// Time specification with precision - represents time in seconds with fractional precision
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TimeSpec {
    pub seconds: f64,
}

impl TimeSpec {
    /// Create a new TimeSpec from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    /// Create a new TimeSpec from hours, minutes, seconds, milliseconds
    pub fn from_components(hours: u32, minutes: u32, seconds: u32, milliseconds: u32) -> Self {
        let total_seconds = hours as f64 * 3600.0
            + minutes as f64 * 60.0
            + seconds as f64
            + milliseconds as f64 / 1000.0;
        Self { seconds: total_seconds }
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    /// Parse time string in various formats
    ///
    /// Accepts plain seconds (`12.5`), `MM:SS.ms` and `HH:MM:SS.ms`.
    pub fn parse(time_str: &str) -> Result<Self, DomainError> {
        let trimmed = time_str.trim();

        if let Ok(seconds) = trimmed.parse::<f64>() {
            if !seconds.is_finite() {
                return Err(DomainError::BadArgs(format!("Time must be finite: {}", trimmed)));
            }
            if seconds < 0.0 {
                return Err(DomainError::BadArgs("Time cannot be negative".to_string()));
            }
            return Ok(Self::from_seconds(seconds));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        match parts.as_slice() {
            [minutes, seconds] => {
                let minutes = parse_whole(minutes, "minutes")?;
                let seconds = parse_fraction(seconds)?;
                Ok(Self::from_seconds(minutes as f64 * 60.0 + seconds))
            }
            [hours, minutes, seconds] => {
                let hours = parse_whole(hours, "hours")?;
                let minutes = parse_whole(minutes, "minutes")?;
                if minutes >= 60 {
                    return Err(DomainError::BadArgs("Minutes must be less than 60".to_string()));
                }
                let seconds = parse_fraction(seconds)?;
                Ok(Self::from_seconds(
                    hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds,
                ))
            }
            _ => Err(DomainError::BadArgs(format!(
                "Invalid time format '{}'. Supported formats: seconds (e.g., 123.45), MM:SS.ms (e.g., 2:30.5), HH:MM:SS.ms (e.g., 1:02:30.5)",
                trimmed
            ))),
        }
    }

    /// Format as HH:MM:SS.mmm, or MM:SS.mmm below one hour
    pub fn format_hms(&self) -> String {
        let total_ms = (self.seconds.max(0.0) * 1000.0).round() as u64;
        let hours = total_ms / 3_600_000;
        let minutes = (total_ms % 3_600_000) / 60_000;
        let seconds = (total_ms % 60_000) / 1000;
        let milliseconds = total_ms % 1000;

        if hours > 0 {
            format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, milliseconds)
        } else {
            format!("{:02}:{:02}.{:03}", minutes, seconds, milliseconds)
        }
    }
}

fn parse_whole(part: &str, unit: &str) -> Result<u32, DomainError> {
    part.trim()
        .parse::<u32>()
        .map_err(|_| DomainError::BadArgs(format!("Invalid {} format: '{}'", unit, part)))
}

fn parse_fraction(part: &str) -> Result<f64, DomainError> {
    let seconds = part
        .trim()
        .parse::<f64>()
        .map_err(|_| DomainError::BadArgs(format!("Invalid seconds format: '{}'", part)))?;
    if !(0.0..60.0).contains(&seconds) {
        return Err(DomainError::BadArgs("Seconds must be in 0..60".to_string()));
    }
    Ok(seconds)
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hms())
    }
}

impl FromStr for TimeSpec {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A validated trim window inside a source video.
///
/// Holds `0 <= start < end <= source duration`. Only
/// [`WindowClamp`](crate::domain::rules::WindowClamp) builds one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeWindow {
    start: f64,
    end: f64,
}

impl TimeWindow {
    pub(crate) fn from_clamped(start: f64, end: f64) -> Self {
        debug_assert!(start >= 0.0 && start < end);
        Self { start, end }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            TimeSpec::from_seconds(self.start),
            TimeSpec::from_seconds(self.end)
        )
    }
}

/// Pixel dimensions of a frame, both sides positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FrameSize {
    width: u32,
    height: u32,
}

impl FrameSize {
    /// Validate raw dimensions, as reported by a probe or typed by a user
    pub fn new(width: i64, height: i64) -> Result<Self, PlanError> {
        let invalid = PlanError::InvalidDimensions { width, height };
        let w = u32::try_from(width).map_err(|_| invalid.clone())?;
        let h = u32::try_from(height).map_err(|_| invalid.clone())?;
        if w == 0 || h == 0 {
            return Err(invalid);
        }
        Ok(Self { width: w, height: h })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Reduced rational aspect ratio `width:height`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AspectRatio {
    width: u32,
    height: u32,
}

impl AspectRatio {
    /// Standard portrait (9:16) for shorts and reels
    pub const PORTRAIT: AspectRatio = AspectRatio { width: 9, height: 16 };

    /// Square (1:1)
    pub const SQUARE: AspectRatio = AspectRatio { width: 1, height: 1 };

    /// Create a ratio from its two terms; the result is reduced
    pub fn new(width: i64, height: i64) -> Result<Self, PlanError> {
        let invalid = || PlanError::InvalidTargetRatio {
            ratio: format!("{}:{}", width, height),
        };
        let w = u32::try_from(width).map_err(|_| invalid())?;
        let h = u32::try_from(height).map_err(|_| invalid())?;
        if w == 0 || h == 0 {
            return Err(invalid());
        }
        let divisor = gcd(w, h);
        Ok(Self {
            width: w / divisor,
            height: h / divisor,
        })
    }

    /// Create a ratio from a decimal such as `0.5625`
    ///
    /// The decimal is snapped to a denominator of 10 000 before reducing.
    pub fn from_f64(ratio: f64) -> Result<Self, PlanError> {
        const SCALE: f64 = 10_000.0;
        let invalid = || PlanError::InvalidTargetRatio {
            ratio: ratio.to_string(),
        };
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(invalid());
        }
        let numerator = (ratio * SCALE).round();
        if numerator < 1.0 || numerator > u32::MAX as f64 {
            return Err(invalid());
        }
        Self::new(numerator as i64, SCALE as i64)
    }

    /// Ratio of the given frame
    pub fn of(size: FrameSize) -> Self {
        let divisor = gcd(size.width, size.height);
        Self {
            width: size.width / divisor,
            height: size.height / divisor,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::PORTRAIT
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for AspectRatio {
    type Err = PlanError;

    /// Parses `W:H`, `W/H` or a positive decimal
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let invalid = || PlanError::InvalidTargetRatio {
            ratio: s.to_string(),
        };

        if let Some((left, right)) = normalized.split_once([':', '/']) {
            let width = left.parse::<i64>().map_err(|_| invalid())?;
            let height = right.parse::<i64>().map_err(|_| invalid())?;
            return Self::new(width, height).map_err(|_| invalid());
        }

        let ratio = normalized.parse::<f64>().map_err(|_| invalid())?;
        Self::from_f64(ratio).map_err(|_| invalid())
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Integer crop rectangle inside a source frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropRect {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl CropRect {
    pub(crate) fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> FrameSize {
        FrameSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Check that the rectangle lies entirely inside `frame`
    pub fn fits_within(&self, frame: FrameSize) -> bool {
        self.width > 0
            && self.height > 0
            && self.x as u64 + self.width as u64 <= frame.width as u64
            && self.y as u64 + self.height as u64 <= frame.height as u64
    }

    /// Check that the rectangle covers the whole of `frame`
    pub fn is_full_frame(&self, frame: FrameSize) -> bool {
        self.x == 0 && self.y == 0 && self.width == frame.width && self.height == frame.height
    }

    /// Check the width/height ratio against `ratio`, allowing one pixel of rounding
    pub fn matches_ratio(&self, ratio: AspectRatio) -> bool {
        let lhs = self.width as u64 * ratio.height as u64;
        let rhs = self.height as u64 * ratio.width as u64;
        lhs.abs_diff(rhs) <= ratio.width.max(ratio.height) as u64
    }
}

impl fmt::Display for CropRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Crop rectangle plus the resize that follows it, if any
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CropPlan {
    pub crop: CropRect,
    pub scale: Option<FrameSize>,
}

/// Thresholds consulted by the planning rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanLimits {
    /// Shortest accepted clip, in seconds
    pub min_window_secs: f64,
    /// Smallest accepted crop side, in pixels
    pub min_crop_px: u32,
}

impl Default for PlanLimits {
    fn default() -> Self {
        Self {
            min_window_secs: DEFAULT_MIN_WINDOW_SECS,
            min_crop_px: DEFAULT_MIN_CROP_PX,
        }
    }
}

/// x264 speed/quality preset offered for exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportPreset {
    Fast,
    #[default]
    Medium,
    Slow,
}

impl ExportPreset {
    /// Parse preset from string
    pub fn parse(preset: &str) -> Result<Self, DomainError> {
        match preset.trim().to_lowercase().as_str() {
            "fast" => Ok(ExportPreset::Fast),
            "medium" => Ok(ExportPreset::Medium),
            "slow" => Ok(ExportPreset::Slow),
            other => Err(DomainError::BadArgs(format!(
                "Invalid export preset: {}. Valid presets: fast, medium, slow",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportPreset::Fast => "fast",
            ExportPreset::Medium => "medium",
            ExportPreset::Slow => "slow",
        }
    }
}

impl fmt::Display for ExportPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoding knobs for a vertical export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub width: u32,
    pub height: u32,
    pub preset: ExportPreset,
    pub audio_bitrate: String,
    pub max_threads: usize,
    pub fallback_fps: f64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            preset: ExportPreset::Medium,
            audio_bitrate: "128k".to_string(),
            max_threads: 4,
            fallback_fps: 30.0,
        }
    }
}

impl ExportSettings {
    pub fn output_size(&self) -> Result<FrameSize, PlanError> {
        FrameSize::new(self.width as i64, self.height as i64)
    }
}

/// Metadata reported by the media probe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaMetadata {
    pub path: PathBuf,
    pub format: String,
    pub duration: f64,
    /// Displayed width, after applying `rotation`
    pub width: u32,
    /// Displayed height, after applying `rotation`
    pub height: u32,
    pub fps: Option<f64>,
    /// Display rotation in degrees, normalized to `0..360`
    pub rotation: Option<i32>,
    pub file_size: u64,
}

impl MediaMetadata {
    pub fn frame_size(&self) -> Result<FrameSize, PlanError> {
        FrameSize::new(self.width as i64, self.height as i64)
    }
}

/// Everything the renderer needs to produce one short
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportPlan {
    pub input: PathBuf,
    pub output: PathBuf,
    pub window: TimeWindow,
    pub source_size: FrameSize,
    /// `None` when the source already has the target ratio
    pub crop: Option<CropRect>,
    /// `None` when the cropped frame already has the output size
    pub scale: Option<FrameSize>,
    pub fps: f64,
    pub preset: ExportPreset,
    pub audio_bitrate: String,
    pub threads: usize,
}

/// Result of a finished render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub output: PathBuf,
    pub file_size: u64,
    pub elapsed: Duration,
}

/// Metadata returned after a successful download
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadResult {
    pub path: PathBuf,
    pub title: String,
    pub duration: Option<f64>,
    pub thumbnail: Option<String>,
}

/// Phase reported by a download in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStatus {
    Downloading,
    Finished,
}

/// Progress snapshot for a download; `fraction` is always within `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DownloadProgress {
    pub status: DownloadStatus,
    pub fraction: f64,
    pub downloaded_bytes: u64,
    pub total_bytes: Option<u64>,
}
