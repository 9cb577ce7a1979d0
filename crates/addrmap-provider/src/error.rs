//! Provider error types.

use std::path::PathBuf;

/// Errors that can occur while fetching map data.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The remote provider could not be reached or answered non-200.
    #[error("map provider unavailable for '{map}': {detail}")]
    Unavailable { map: String, detail: String },

    /// The provider answered, but the body is not a descriptor list.
    #[error("map '{map}' returned malformed data: {detail}")]
    Decode { map: String, detail: String },

    /// A local map file does not exist.
    #[error("map file not found: {}", path.display())]
    MissingMap { path: PathBuf },

    /// HTTP client construction error.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
