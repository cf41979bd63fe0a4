// Export interactor - Orchestrates the probe, plan and render use case

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Interactor turning a local video into a vertical short
pub struct ExportInteractor {
    probe_port: Arc<dyn ProbePort>,
    render_port: Arc<dyn RenderPort>,
    planner: ExportPlanner,
}

impl ExportInteractor {
    /// Create new export interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        render_port: Arc<dyn RenderPort>,
        planner: ExportPlanner,
    ) -> Self {
        Self {
            probe_port,
            render_port,
            planner,
        }
    }

    /// Probe the source, plan the window and crop, then render
    pub async fn execute(&self, request: ExportRequest) -> Result<ExportResponse, DomainError> {
        let planned = self.plan(&request).await?;
        let report = self.render_port.render(&planned.plan).await?;

        info!(
            output = %report.output.display(),
            file_size = report.file_size,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "export finished"
        );

        Ok(ExportResponse {
            metadata: planned.metadata,
            plan: planned.plan,
            report,
        })
    }

    /// Probe and plan without rendering
    pub async fn plan(&self, request: &ExportRequest) -> Result<PlannedExport, DomainError> {
        if request.input.as_os_str().is_empty() {
            return Err(DomainError::BadArgs("No input video given".to_string()));
        }

        let metadata = self.probe_port.probe(&request.input).await?;
        let plan = self.planner.plan(
            &metadata,
            request.start.unwrap_or(0.0),
            request.end,
            &request.output_dir,
        )?;

        info!(
            input = %plan.input.display(),
            window = %plan.window,
            crop = ?plan.crop.map(|c| c.to_string()),
            "planned export"
        );
        Ok(PlannedExport { metadata, plan })
    }
}

/// Request for exporting one short
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub input: PathBuf,
    /// Defaults to the start of the source
    pub start: Option<f64>,
    /// Defaults to the standard clip length after `start`
    pub end: Option<f64>,
    pub output_dir: PathBuf,
}

impl ExportRequest {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            start: None,
            end: None,
            output_dir: output_dir.into(),
        }
    }

    pub fn with_window(mut self, start: Option<f64>, end: Option<f64>) -> Self {
        self.start = start;
        self.end = end;
        self
    }
}

/// Probe result together with the plan derived from it
#[derive(Debug, Clone)]
pub struct PlannedExport {
    pub metadata: MediaMetadata,
    pub plan: ExportPlan,
}

/// Response from a finished export
#[derive(Debug, Clone)]
pub struct ExportResponse {
    pub metadata: MediaMetadata,
    pub plan: ExportPlan,
    pub report: RenderReport,
}
