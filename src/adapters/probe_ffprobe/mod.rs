//! FFprobe adapter for media file probing
//!
//! Runs `ffprobe` as a subprocess and maps its JSON report onto
//! [`MediaMetadata`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    binary: PathBuf,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter around the given executable
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    width: Option<i64>,
    height: Option<i64>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
    duration: Option<String>,
    #[serde(default)]
    side_data_list: Vec<FfprobeSideData>,
    tags: Option<FfprobeTags>,
}

#[derive(Debug, Deserialize)]
struct FfprobeSideData {
    rotation: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct FfprobeTags {
    rotate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    format_name: Option<String>,
    duration: Option<String>,
    size: Option<String>,
}

/// Map an `ffprobe -print_format json -show_format -show_streams` report
/// onto [`MediaMetadata`]. `fallback_size` is used when the report has no size.
pub fn parse_probe_output(
    path: &Path,
    json: &str,
    fallback_size: u64,
) -> Result<MediaMetadata, DomainError> {
    let report: FfprobeOutput = serde_json::from_str(json)
        .map_err(|e| DomainError::ProbeFail(format!("Unreadable ffprobe output: {}", e)))?;

    let video = report
        .streams
        .iter()
        .find(|stream| stream.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            DomainError::ProbeFail(format!("No video stream found in {}", path.display()))
        })?;

    let dimension = |value: Option<i64>, name: &str| -> Result<u32, DomainError> {
        value
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| DomainError::ProbeFail(format!("Video stream has no valid {}", name)))
    };
    let coded_width = dimension(video.width, "width")?;
    let coded_height = dimension(video.height, "height")?;

    // ffmpeg auto-rotates before filtering, so plan against the displayed frame
    let rotation = stream_rotation(video);
    let (width, height) = match rotation {
        Some(90) | Some(270) => (coded_height, coded_width),
        _ => (coded_width, coded_height),
    };

    let format = report.format.as_ref();
    let duration = format
        .and_then(|f| parse_seconds(f.duration.as_deref()))
        .or_else(|| parse_seconds(video.duration.as_deref()))
        .ok_or_else(|| DomainError::ProbeFail("Could not determine media duration".to_string()))?;

    let fps = video
        .avg_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .or_else(|| video.r_frame_rate.as_deref().and_then(parse_frame_rate));

    let file_size = format
        .and_then(|f| f.size.as_deref())
        .and_then(|size| size.parse::<u64>().ok())
        .unwrap_or(fallback_size);

    Ok(MediaMetadata {
        path: path.to_path_buf(),
        format: format
            .and_then(|f| f.format_name.clone())
            .unwrap_or_else(|| "unknown".to_string()),
        duration,
        width,
        height,
        fps,
        rotation,
        file_size,
    })
}

/// Display rotation from the display matrix side data, else the legacy
/// `rotate` tag, normalized to `0..360`
fn stream_rotation(stream: &FfprobeStream) -> Option<i32> {
    let degrees = stream
        .side_data_list
        .iter()
        .find_map(|side_data| side_data.rotation)
        .or_else(|| {
            stream
                .tags
                .as_ref()
                .and_then(|tags| tags.rotate.as_deref())
                .and_then(|rotate| rotate.trim().parse::<f64>().ok())
        })
        .filter(|degrees| degrees.is_finite())?;
    Some((degrees.round() as i64).rem_euclid(360) as i32)
}

fn parse_seconds(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Parse an ffprobe rate such as `30000/1001`; `0/0` means unknown
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let fps = match rate.split_once('/') {
        Some((num, den)) => {
            let num = num.trim().parse::<f64>().ok()?;
            let den = den.trim().parse::<f64>().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => rate.trim().parse::<f64>().ok()?,
    };
    (fps.is_finite() && fps > 0.0).then_some(fps)
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe(&self, path: &Path) -> Result<MediaMetadata, DomainError> {
        let fs_metadata = tokio::fs::metadata(path)
            .await
            .map_err(|_| DomainError::FileNotFound(path.display().to_string()))?;

        debug!(binary = %self.binary.display(), path = %path.display(), "running ffprobe");
        let output = Command::new(&self.binary)
            .args(["-v", "error", "-print_format", "json", "-show_format", "-show_streams"])
            .arg(path)
            .output()
            .await
            .map_err(|e| {
                DomainError::ExecFail(format!("Failed to run {}: {}", self.binary.display(), e))
            })?;

        if !output.status.success() {
            return Err(DomainError::ProbeFail(format!(
                "ffprobe exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let metadata = parse_probe_output(
            path,
            &String::from_utf8_lossy(&output.stdout),
            fs_metadata.len(),
        )?;
        info!(
            path = %path.display(),
            duration = metadata.duration,
            width = metadata.width,
            height = metadata.height,
            rotation = ?metadata.rotation,
            "probed media file"
        );
        Ok(metadata)
    }
}
