// Short interactor - Download a remote video, then export a short from it

use std::path::PathBuf;
use std::sync::Arc;

use crate::app::download_interactor::DownloadInteractor;
use crate::app::export_interactor::{ExportInteractor, ExportRequest, ExportResponse};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

pub struct ShortInteractor {
    download: Arc<DownloadInteractor>,
    export: Arc<ExportInteractor>,
}

impl ShortInteractor {
    pub fn new(download: Arc<DownloadInteractor>, export: Arc<ExportInteractor>) -> Self {
        Self { download, export }
    }

    pub async fn execute(
        &self,
        request: ShortRequest,
        progress: Option<&ProgressCallback>,
    ) -> Result<ShortResponse, DomainError> {
        let source = self
            .download
            .execute(&request.url, &request.cache_dir, progress)
            .await?;

        let export = self
            .export
            .execute(
                ExportRequest::new(source.path.clone(), request.output_dir)
                    .with_window(request.start, request.end),
            )
            .await?;

        Ok(ShortResponse { source, export })
    }
}

/// Request for the download-then-export flow
#[derive(Debug, Clone)]
pub struct ShortRequest {
    pub url: String,
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub cache_dir: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ShortResponse {
    pub source: DownloadResult,
    pub export: ExportResponse,
}
