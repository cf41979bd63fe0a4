// Inspect interactor - Orchestrates media file inspection use case

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;
use crate::utils::{format_clock, format_file_size};

/// Interactor for media file inspection use case
pub struct InspectInteractor {
    probe_port: Arc<dyn ProbePort>,
}

impl InspectInteractor {
    /// Create new inspect interactor with injected ports
    pub fn new(probe_port: Arc<dyn ProbePort>) -> Self {
        Self { probe_port }
    }

    /// Probe `input` and build a display summary
    pub async fn execute(&self, input: &Path) -> Result<InspectResponse, DomainError> {
        let metadata = self.probe_port.probe(input).await?;
        let summary = MediaSummary::from_metadata(&metadata);
        Ok(InspectResponse { metadata, summary })
    }
}

/// Human-facing view of probed metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaSummary {
    pub duration: String,
    pub resolution: String,
    pub size: String,
    pub fps: Option<String>,
}

impl MediaSummary {
    pub fn from_metadata(metadata: &MediaMetadata) -> Self {
        Self {
            duration: format_clock(metadata.duration),
            resolution: format!("{}x{}", metadata.width, metadata.height),
            size: format_file_size(metadata.file_size),
            fps: metadata.fps.map(|fps| format!("{:.2}", fps)),
        }
    }

    /// Multi-line text block for terminal output
    pub fn render_text(&self, path: &Path) -> String {
        let mut output = String::new();
        output.push_str(&format!("File:       {}\n", path.display()));
        output.push_str(&format!("Duration:   {}\n", self.duration));
        output.push_str(&format!("Resolution: {}\n", self.resolution));
        if let Some(fps) = &self.fps {
            output.push_str(&format!("Frame rate: {} fps\n", fps));
        }
        output.push_str(&format!("Size:       {}\n", self.size));
        output
    }
}

/// Response for media file inspection
#[derive(Debug, Clone, Serialize)]
pub struct InspectResponse {
    pub metadata: MediaMetadata,
    pub summary: MediaSummary,
}
