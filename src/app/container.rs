use std::sync::Arc;

use crate::adapters::{FFmpegAdapter, FFprobeAdapter, YtDlpAdapter};
use crate::app::{
    download_interactor::DownloadInteractor, export_interactor::ExportInteractor,
    inspect_interactor::InspectInteractor, short_interactor::ShortInteractor,
};
use crate::config::ShortclipConfig;
use crate::domain::rules::ExportPlanner;
use crate::ports::{DownloadPort, ProbePort, RenderPort};

pub trait AppContainer: Send + Sync {
    fn export_interactor(&self) -> Arc<ExportInteractor>;
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
    fn download_interactor(&self) -> Arc<DownloadInteractor>;
    fn short_interactor(&self) -> Arc<ShortInteractor>;
}

pub struct DefaultAppContainer {
    export_interactor: Arc<ExportInteractor>,
    inspect_interactor: Arc<InspectInteractor>,
    download_interactor: Arc<DownloadInteractor>,
    short_interactor: Arc<ShortInteractor>,
}

impl DefaultAppContainer {
    /// Wire the subprocess adapters named in `config`
    pub fn from_config(config: &ShortclipConfig) -> Self {
        let probe_port: Arc<dyn ProbePort> = Arc::new(FFprobeAdapter::new(&config.tools.ffprobe));
        let render_port: Arc<dyn RenderPort> = Arc::new(FFmpegAdapter::new(&config.tools.ffmpeg));
        let download_port: Arc<dyn DownloadPort> = Arc::new(YtDlpAdapter::new(&config.tools.yt_dlp));
        Self::with_ports(config, probe_port, render_port, download_port)
    }

    /// Wire arbitrary port implementations
    pub fn with_ports(
        config: &ShortclipConfig,
        probe_port: Arc<dyn ProbePort>,
        render_port: Arc<dyn RenderPort>,
        download_port: Arc<dyn DownloadPort>,
    ) -> Self {
        let planner = ExportPlanner::new(&config.limits, config.export.clone());

        let export_interactor = Arc::new(ExportInteractor::new(
            Arc::clone(&probe_port),
            render_port,
            planner,
        ));
        let inspect_interactor = Arc::new(InspectInteractor::new(probe_port));
        let download_interactor = Arc::new(DownloadInteractor::new(download_port));
        let short_interactor = Arc::new(ShortInteractor::new(
            Arc::clone(&download_interactor),
            Arc::clone(&export_interactor),
        ));

        Self {
            export_interactor,
            inspect_interactor,
            download_interactor,
            short_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn export_interactor(&self) -> Arc<ExportInteractor> {
        Arc::clone(&self.export_interactor)
    }

    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }

    fn download_interactor(&self) -> Arc<DownloadInteractor> {
        Arc::clone(&self.download_interactor)
    }

    fn short_interactor(&self) -> Arc<ShortInteractor> {
        Arc::clone(&self.short_interactor)
    }
}
