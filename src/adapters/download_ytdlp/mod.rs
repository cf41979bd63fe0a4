//! yt-dlp download adapter
//!
//! Downloads a single video as MP4. Progress is read from a machine-readable
//! progress template; the final info JSON is printed once the file has been
//! moved into place.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

const PROGRESS_PREFIX: &str = "[progress]";

const PROGRESS_TEMPLATE: &str = "download:[progress] %(progress.status)s \
     %(progress.downloaded_bytes)s %(progress.total_bytes)s %(progress.total_bytes_estimate)s";

/// yt-dlp based download adapter
pub struct YtDlpAdapter {
    binary: PathBuf,
}

impl YtDlpAdapter {
    /// Create new yt-dlp adapter around the given executable
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

/// Command-line arguments for downloading `url` into `output_dir`
pub fn build_download_args(url: &str, output_dir: &Path) -> Vec<String> {
    vec![
        "--no-playlist".into(),
        "-f".into(),
        "bestvideo*+bestaudio/best".into(),
        "--merge-output-format".into(),
        "mp4".into(),
        "--recode-video".into(),
        "mp4".into(),
        "-o".into(),
        output_dir.join("%(id)s.%(ext)s").to_string_lossy().into_owned(),
        "--newline".into(),
        "--progress".into(),
        "--progress-template".into(),
        PROGRESS_TEMPLATE.into(),
        "--print".into(),
        "after_move:%()j".into(),
        url.into(),
    ]
}

/// Parse one line emitted through the progress template.
///
/// Returns `None` for any other line. The fraction is clamped to `0.0..=1.0`
/// and is `0.0` while the total size is unknown.
pub fn parse_progress_line(line: &str) -> Option<DownloadProgress> {
    let rest = line.trim().strip_prefix(PROGRESS_PREFIX)?;
    let mut fields = rest.split_whitespace();

    let status = match fields.next()? {
        "downloading" => DownloadStatus::Downloading,
        "finished" => DownloadStatus::Finished,
        _ => return None,
    };
    let mut number = || {
        fields
            .next()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v as u64)
    };
    let downloaded_bytes = number().unwrap_or(0);
    let total = number();
    let estimate = number();
    let total_bytes = total.or(estimate).filter(|t| *t > 0);

    let fraction = match (status, total_bytes) {
        (DownloadStatus::Finished, _) => 1.0,
        (DownloadStatus::Downloading, Some(total)) => {
            (downloaded_bytes as f64 / total as f64).clamp(0.0, 1.0)
        }
        (DownloadStatus::Downloading, None) => 0.0,
    };

    Some(DownloadProgress {
        status,
        fraction,
        downloaded_bytes,
        total_bytes,
    })
}

#[derive(Debug, Deserialize)]
struct YtDlpInfo {
    id: Option<String>,
    title: Option<String>,
    duration: Option<f64>,
    thumbnail: Option<String>,
    ext: Option<String>,
    filepath: Option<String>,
    #[serde(rename = "_filename")]
    filename: Option<String>,
}

/// Build a [`DownloadResult`] from the info JSON yt-dlp prints after moving the file
pub fn parse_download_info(json: &str, output_dir: &Path) -> Result<DownloadResult, DomainError> {
    let info: YtDlpInfo = serde_json::from_str(json)
        .map_err(|e| DomainError::DownloadFail(format!("Unreadable yt-dlp output: {}", e)))?;

    let mut path = match (&info.filepath, &info.filename, &info.id) {
        (Some(path), _, _) | (None, Some(path), _) => PathBuf::from(path),
        (None, None, Some(id)) => {
            output_dir.join(format!("{}.{}", id, info.ext.as_deref().unwrap_or("mp4")))
        }
        (None, None, None) => {
            return Err(DomainError::DownloadFail(
                "yt-dlp did not report a file path".to_string(),
            ))
        }
    };
    if let Some(ext) = &info.ext {
        if path.extension().map_or(true, |current| current != "mp4") {
            path.set_extension(ext);
        }
    }

    let title = info.title.clone().unwrap_or_else(|| {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    Ok(DownloadResult {
        path,
        title,
        duration: info.duration,
        thumbnail: info.thumbnail,
    })
}

#[async_trait]
impl DownloadPort for YtDlpAdapter {
    async fn download(
        &self,
        url: &str,
        output_dir: &Path,
        progress: Option<&ProgressCallback>,
    ) -> Result<DownloadResult, DomainError> {
        tokio::fs::create_dir_all(output_dir).await.map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to create download directory {}: {}",
                output_dir.display(),
                e
            ))
        })?;

        let args = build_download_args(url, output_dir);
        info!(url, output_dir = %output_dir.display(), "downloading video");
        debug!(?args, "yt-dlp arguments");

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                DomainError::ExecFail(format!("Failed to run {}: {}", self.binary.display(), e))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DomainError::ExecFail("yt-dlp stdout unavailable".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| DomainError::ExecFail("yt-dlp stderr unavailable".to_string()))?;

        let report = |line: &str| -> bool {
            match parse_progress_line(line) {
                Some(snapshot) => {
                    if let Some(callback) = progress {
                        callback(snapshot);
                    }
                    true
                }
                None => false,
            }
        };

        let read_stdout = async {
            let mut lines = BufReader::new(stdout).lines();
            let mut info_json = None;
            while let Some(line) = lines.next_line().await? {
                if line.trim_start().starts_with('{') {
                    info_json = Some(line);
                } else {
                    report(&line);
                }
            }
            Ok::<_, std::io::Error>(info_json)
        };
        let read_stderr = async {
            let mut lines = BufReader::new(stderr).lines();
            let mut messages = Vec::new();
            while let Some(line) = lines.next_line().await? {
                if !report(&line) && !line.trim().is_empty() {
                    messages.push(line);
                }
            }
            Ok::<_, std::io::Error>(messages)
        };

        let (info_json, messages) = tokio::join!(read_stdout, read_stderr);
        let status = child
            .wait()
            .await
            .map_err(|e| DomainError::ExecFail(format!("yt-dlp did not finish: {}", e)))?;
        let messages = messages.unwrap_or_default();

        if !status.success() {
            return Err(DomainError::DownloadFail(format!(
                "yt-dlp exited with {}: {}",
                status,
                messages.join("\n")
            )));
        }
        for message in &messages {
            warn!(message = %message, "yt-dlp");
        }

        let info_json = info_json
            .map_err(|e| DomainError::DownloadFail(format!("Failed to read yt-dlp output: {}", e)))?
            .ok_or_else(|| {
                DomainError::DownloadFail("yt-dlp did not report the downloaded video".to_string())
            })?;

        let result = parse_download_info(&info_json, output_dir)?;
        if !tokio::fs::try_exists(&result.path).await.unwrap_or(false) {
            return Err(DomainError::DownloadFail(format!(
                "The downloaded file was not found at {}",
                result.path.display()
            )));
        }

        info!(title = %result.title, path = %result.path.display(), "download complete");
        Ok(result)
    }
}
