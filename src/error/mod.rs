//! Error handling module for shortclip

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for shortclip operations outside the domain layer
#[derive(Error, Debug)]
pub enum ShortclipError {
    /// Configuration could not be loaded or is inconsistent
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Configuration file is not valid TOML
    #[error("Failed to parse configuration file: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error raised by a port or a planning rule
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Result type alias for shortclip operations
pub type ShortclipResult<T> = std::result::Result<T, ShortclipError>;
