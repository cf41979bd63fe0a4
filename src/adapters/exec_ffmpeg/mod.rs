//! FFmpeg execution adapter
//!
//! Trims, crops, scales and encodes a planned export by running `ffmpeg`.
//! Output is written to a temporary file next to the destination and moved
//! into place only once the encode succeeded.

use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// FFmpeg-based execution adapter
pub struct FFmpegAdapter {
    binary: PathBuf,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter around the given executable
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

/// Video filter chain for `plan`, or `None` when the frame passes through untouched
pub fn video_filter(plan: &ExportPlan) -> Option<String> {
    let mut filters = Vec::new();
    if let Some(crop) = plan.crop {
        filters.push(format!(
            "crop={}:{}:{}:{}",
            crop.width(),
            crop.height(),
            crop.x(),
            crop.y()
        ));
    }
    if let Some(scale) = plan.scale {
        filters.push(format!("scale={}:{}:flags=lanczos", scale.width(), scale.height()));
    }
    if filters.is_empty() {
        return None;
    }
    filters.push("setsar=1".to_string());
    Some(filters.join(","))
}

/// Full ffmpeg argument list rendering `plan` into `output`
pub fn build_ffmpeg_args(plan: &ExportPlan, output: &Path) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-hide_banner".into(),
        "-loglevel".into(),
        "error".into(),
        "-y".into(),
        "-ss".into(),
        format!("{:.3}", plan.window.start()),
        "-to".into(),
        format!("{:.3}", plan.window.end()),
        "-i".into(),
        plan.input.to_string_lossy().into_owned(),
    ];

    if let Some(filter) = video_filter(plan) {
        args.push("-vf".into());
        args.push(filter);
    }

    args.extend([
        "-r".into(),
        format!("{}", plan.fps),
        "-c:v".into(),
        "libx264".into(),
        "-preset".into(),
        plan.preset.as_str().into(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        "-c:a".into(),
        "aac".into(),
        "-b:a".into(),
        plan.audio_bitrate.clone(),
        "-threads".into(),
        plan.threads.to_string(),
        "-movflags".into(),
        "+faststart".into(),
        "-f".into(),
        "mp4".into(),
        output.to_string_lossy().into_owned(),
    ]);
    args
}

#[async_trait]
impl RenderPort for FFmpegAdapter {
    async fn render(&self, plan: &ExportPlan) -> Result<RenderReport, DomainError> {
        let started = Instant::now();
        let output_dir = plan
            .output
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        tokio::fs::create_dir_all(output_dir).await.map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to create output directory {}: {}",
                output_dir.display(),
                e
            ))
        })?;

        let temp_path = tempfile::Builder::new()
            .prefix(".shortclip-")
            .suffix(".mp4")
            .tempfile_in(output_dir)
            .map_err(|e| DomainError::FsFail(format!("Failed to create temporary file: {}", e)))?
            .into_temp_path();

        let args = build_ffmpeg_args(plan, &temp_path);
        info!(
            input = %plan.input.display(),
            output = %plan.output.display(),
            window = %plan.window,
            "rendering vertical short"
        );
        debug!(?args, "ffmpeg arguments");

        let output = Command::new(&self.binary)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                DomainError::ExecFail(format!("Failed to run {}: {}", self.binary.display(), e))
            })?;

        if !output.status.success() {
            return Err(DomainError::ExecFail(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        temp_path.persist(&plan.output).map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to move render to {}: {}",
                plan.output.display(),
                e
            ))
        })?;

        let file_size = tokio::fs::metadata(&plan.output)
            .await
            .map(|m| m.len())
            .map_err(|e| DomainError::FsFail(format!("Rendered file is missing: {}", e)))?;

        Ok(RenderReport {
            output: plan.output.clone(),
            file_size,
            elapsed: started.elapsed(),
        })
    }
}
