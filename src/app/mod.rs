// Application layer - Use case interactors

pub mod container;
pub mod download_interactor;
pub mod export_interactor;
pub mod inspect_interactor;
pub mod short_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use download_interactor::DownloadInteractor;
pub use export_interactor::{ExportInteractor, ExportRequest, ExportResponse};
pub use inspect_interactor::{InspectInteractor, InspectResponse, MediaSummary};
pub use short_interactor::{ShortInteractor, ShortRequest, ShortResponse};
