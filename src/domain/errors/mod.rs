// Domain errors - Error types for the domain layer

use std::fmt;

use thiserror::Error;

/// Rejections produced by the pure planning rules.
///
/// Every variant is a rejected-input signal for a single request; none of
/// them is fatal to the process and none is worth retrying.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    /// Source duration is zero, negative or not finite
    #[error("source duration must be positive, got {duration}")]
    InvalidSource { duration: f64 },

    /// A requested bound is NaN
    #[error("requested {bound} time is not a number")]
    InvalidTimestamp { bound: &'static str },

    /// Clamped window collapsed to zero or negative length
    #[error("clip window is empty after clamping to the source ({start:.3}s..{end:.3}s)")]
    EmptyWindow { start: f64, end: f64 },

    /// Clamped window is positive but shorter than the configured minimum
    #[error("clip window of {duration:.3}s is shorter than the minimum of {minimum:.3}s")]
    WindowTooShort { duration: f64, minimum: f64 },

    /// Frame width or height is not positive
    #[error("frame dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    /// Target aspect ratio is not positive
    #[error("target aspect ratio must be positive, got {ratio}")]
    InvalidTargetRatio { ratio: String },

    /// Computed crop falls below the configured minimum side length
    #[error("crop of {width}x{height} is smaller than the minimum of {minimum}px")]
    CropTooSmall { width: u32, height: u32, minimum: u32 },
}

/// Domain-specific error types
#[derive(Debug, Clone)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// File not found
    FileNotFound(String),
    /// Media probing failed
    ProbeFail(String),
    /// External tool execution failed
    ExecFail(String),
    /// Video download failed
    DownloadFail(String),
    /// File system operation failed
    FsFail(String),
    /// Planning rules rejected the request
    Plan(PlanError),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::FileNotFound(msg) => write!(f, "File not found: {}", msg),
            DomainError::ProbeFail(msg) => write!(f, "Probe failed: {}", msg),
            DomainError::ExecFail(msg) => write!(f, "Execution failed: {}", msg),
            DomainError::DownloadFail(msg) => write!(f, "Download failed: {}", msg),
            DomainError::FsFail(msg) => write!(f, "File system error: {}", msg),
            DomainError::Plan(err) => write!(f, "Invalid clip: {}", err),
        }
    }
}

impl std::error::Error for DomainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DomainError::Plan(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PlanError> for DomainError {
    fn from(err: PlanError) -> Self {
        DomainError::Plan(err)
    }
}
