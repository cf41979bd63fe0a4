// Download interactor - Fetches a remote video into the cache

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Interactor for the download use case
pub struct DownloadInteractor {
    download_port: Arc<dyn DownloadPort>,
}

impl DownloadInteractor {
    /// Create new download interactor with injected ports
    pub fn new(download_port: Arc<dyn DownloadPort>) -> Self {
        Self { download_port }
    }

    /// Download `url` into `output_dir`, reporting progress to `progress`
    pub async fn execute(
        &self,
        url: &str,
        output_dir: &Path,
        progress: Option<&ProgressCallback>,
    ) -> Result<DownloadResult, DomainError> {
        let url = validate_url(url)?;
        let result = self.download_port.download(url, output_dir, progress).await?;
        info!(title = %result.title, duration = ?result.duration, "video ready");
        Ok(result)
    }
}

/// Accept only non-empty http(s) URLs
pub fn validate_url(url: &str) -> Result<&str, DomainError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(DomainError::BadArgs("Please enter a video URL".to_string()));
    }
    let lower = url.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return Err(DomainError::BadArgs(format!(
            "Unsupported URL '{}': expected http:// or https://",
            url
        )));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert_eq!(
            validate_url("  https://www.youtube.com/watch?v=abc ").unwrap(),
            "https://www.youtube.com/watch?v=abc"
        );
        assert!(validate_url("HTTP://example.com/v.mp4").is_ok());
        assert!(matches!(validate_url("   "), Err(DomainError::BadArgs(_))));
        assert!(matches!(validate_url("ftp://host/v"), Err(DomainError::BadArgs(_))));
    }
}
