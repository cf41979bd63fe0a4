// Ports - Interface definitions (contracts)

use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Callback receiving download progress snapshots
pub type ProgressCallback = dyn Fn(DownloadProgress) + Send + Sync;

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Probe a local media file for duration, frame size and rate
    async fn probe(&self, path: &Path) -> Result<MediaMetadata, DomainError>;
}

/// Port for trimming, cropping and encoding a planned export
#[async_trait]
pub trait RenderPort: Send + Sync {
    /// Render `plan` to `plan.output`
    async fn render(&self, plan: &ExportPlan) -> Result<RenderReport, DomainError>;
}

/// Port for fetching remote videos
#[async_trait]
pub trait DownloadPort: Send + Sync {
    /// Download `url` as MP4 into `output_dir`
    async fn download(
        &self,
        url: &str,
        output_dir: &Path,
        progress: Option<&ProgressCallback>,
    ) -> Result<DownloadResult, DomainError>;
}
