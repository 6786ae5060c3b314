//! Error types for pyforge-registry

use thiserror::Error;

/// Result type alias using pyforge-registry's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Registry error types
#[derive(Error, Debug)]
pub enum Error {
    /// The registry definitively does not know the package
    #[error("Package not found on registry: {package}")]
    NotFound { package: String },

    /// The registry answered with an unexpected status
    #[error("Registry returned status {status} for {package}")]
    Unavailable { package: String, status: u16 },

    /// Transport-level failure (network, TLS, timeout, bad URL)
    #[error("Registry request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("Failed to parse registry response: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error proves the package does not exist, as opposed
    /// to the registry being unreachable or broken
    pub fn is_definitive_miss(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
