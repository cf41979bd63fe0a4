//! Configuration loading and hierarchy management
//!
//! Precedence, highest first: CLI flags > `SHORTCLIP_*` environment
//! variables > TOML file > built-in defaults. CLI flags are applied by the
//! command layer; this module covers the rest.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::model::{ExportPreset, ExportSettings, PlanLimits};
use crate::error::{ShortclipError, ShortclipResult};
use crate::utils::logging;

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "shortclip.toml";

/// Root configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortclipConfig {
    pub paths: PathsConfig,
    pub limits: PlanLimits,
    pub export: ExportSettings,
    pub tools: ToolsConfig,
    pub logging: LoggingConfig,
}

/// Working directories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Where exported shorts are written
    pub output_dir: PathBuf,
    /// Where downloads are kept
    pub cache_dir: PathBuf,
    /// Where demo videos are looked up
    pub media_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("outputs"),
            cache_dir: PathBuf::from("cache"),
            media_dir: PathBuf::from("media"),
        }
    }
}

/// External executables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
    pub yt_dlp: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
            yt_dlp: PathBuf::from("yt-dlp"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ShortclipConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> ShortclipResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load_file(path: &Path) -> ShortclipResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ShortclipError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// Resolve the full hierarchy below the CLI.
    ///
    /// An explicit `path` must exist; the default file is optional. Runs
    /// before logging is set up, so the returned [`ConfigSource`] is logged
    /// by the caller afterwards.
    pub fn load(path: Option<&Path>) -> ShortclipResult<(Self, ConfigSource)> {
        let file = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|path| path.exists()),
        };
        let mut config = match &file {
            Some(file) => Self::load_file(file)?,
            None => Self::default(),
        };

        let env_overrides = config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok((config, ConfigSource { file, env_overrides }))
    }

    /// Apply `SHORTCLIP_*` overrides read through `lookup`; returns the keys that applied
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> ShortclipResult<Vec<&'static str>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = Vec::new();
        let mut take = |key: &'static str| {
            let value = lookup(key);
            if value.is_some() {
                applied.push(key);
            }
            value
        };

        if let Some(v) = take("SHORTCLIP_OUTPUT_DIR") {
            self.paths.output_dir = PathBuf::from(v);
        }
        if let Some(v) = take("SHORTCLIP_CACHE_DIR") {
            self.paths.cache_dir = PathBuf::from(v);
        }
        if let Some(v) = take("SHORTCLIP_MEDIA_DIR") {
            self.paths.media_dir = PathBuf::from(v);
        }
        if let Some(v) = take("SHORTCLIP_MIN_WINDOW_SECS") {
            self.limits.min_window_secs = parse_value("SHORTCLIP_MIN_WINDOW_SECS", &v)?;
        }
        if let Some(v) = take("SHORTCLIP_MIN_CROP_PX") {
            self.limits.min_crop_px = parse_value("SHORTCLIP_MIN_CROP_PX", &v)?;
        }
        if let Some(v) = take("SHORTCLIP_PRESET") {
            self.export.preset = ExportPreset::parse(&v)?;
        }
        if let Some(v) = take("SHORTCLIP_AUDIO_BITRATE") {
            self.export.audio_bitrate = v;
        }
        if let Some(v) = take("SHORTCLIP_MAX_THREADS") {
            self.export.max_threads = parse_value("SHORTCLIP_MAX_THREADS", &v)?;
        }
        if let Some(v) = take("SHORTCLIP_FFMPEG") {
            self.tools.ffmpeg = PathBuf::from(v);
        }
        if let Some(v) = take("SHORTCLIP_FFPROBE") {
            self.tools.ffprobe = PathBuf::from(v);
        }
        if let Some(v) = take("SHORTCLIP_YT_DLP") {
            self.tools.yt_dlp = PathBuf::from(v);
        }
        if let Some(v) = take("SHORTCLIP_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = take("SHORTCLIP_LOG_JSON") {
            self.logging.json = parse_value("SHORTCLIP_LOG_JSON", &v)?;
        }

        Ok(applied)
    }

    /// Reject values the planner or the encoder cannot work with
    pub fn validate(&self) -> ShortclipResult<()> {
        let invalid = |message: String| Err(ShortclipError::Config { message });

        if !self.limits.min_window_secs.is_finite() || self.limits.min_window_secs < 0.0 {
            return invalid(format!(
                "limits.min_window_secs must be a non-negative number, got {}",
                self.limits.min_window_secs
            ));
        }
        if self.limits.min_crop_px == 0 {
            return invalid("limits.min_crop_px must be at least 1".to_string());
        }
        let (width, height) = (self.export.width, self.export.height);
        if width == 0 || height == 0 || width % 2 != 0 || height % 2 != 0 {
            return invalid(format!(
                "export size must be positive and even for libx264, got {}x{}",
                width, height
            ));
        }
        if self.export.max_threads == 0 {
            return invalid("export.max_threads must be at least 1".to_string());
        }
        if !self.export.fallback_fps.is_finite() || self.export.fallback_fps <= 0.0 {
            return invalid(format!(
                "export.fallback_fps must be positive, got {}",
                self.export.fallback_fps
            ));
        }
        if self.export.audio_bitrate.trim().is_empty() {
            return invalid("export.audio_bitrate must not be empty".to_string());
        }
        logging::parse_level(&self.logging.level)?;
        Ok(())
    }
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigSource {
    /// TOML file that was read, if any
    pub file: Option<PathBuf>,
    /// `SHORTCLIP_*` variables that overrode file or default values
    pub env_overrides: Vec<&'static str>,
}

impl ConfigSource {
    /// Report the sources; call once the subscriber is installed
    pub fn log(&self) {
        match &self.file {
            Some(file) => info!("Loaded configuration from: {}", file.display()),
            None => debug!("No configuration file found, using defaults"),
        }
        for key in &self.env_overrides {
            debug!("Found environment override: {}", key);
        }
        if !self.env_overrides.is_empty() {
            info!("Applied {} environment variable overrides", self.env_overrides.len());
        }
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> ShortclipResult<T> {
    value.trim().parse().map_err(|_| ShortclipError::Config {
        message: format!("Invalid value for {}: '{}'", key, value),
    })
}
