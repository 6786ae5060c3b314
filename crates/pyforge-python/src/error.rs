//! Error types for pyforge-python

use thiserror::Error;

/// Result type alias using pyforge-python's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Toolchain error types
#[derive(Error, Debug)]
pub enum Error {
    /// Environment creation failed
    #[error("Failed to provision environment: {reason}")]
    Provision { reason: String },

    /// Conda was requested but is not on PATH
    #[error("conda is not available on this system")]
    CondaUnavailable,

    /// No version manager is available to install an interpreter
    #[error("No Python version manager available to install {version}")]
    NoVersionManager { version: String },

    /// An external command exited non-zero or could not be spawned
    #[error("Command failed: {command}: {reason}")]
    CommandFailed { command: String, reason: String },

    /// An external command exceeded its time limit
    #[error("Command timed out after {seconds}s: {command}")]
    Timeout { command: String, seconds: u64 },

    /// Git URL rejected by the host whitelist
    #[error("Invalid git repository URL: {url}")]
    InvalidGitUrl { url: String },

    /// JSON output from an external tool could not be parsed
    #[error("Failed to parse tool output: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a provision error
    pub fn provision(reason: impl Into<String>) -> Self {
        Self::Provision {
            reason: reason.into(),
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            reason: reason.into(),
        }
    }
}
