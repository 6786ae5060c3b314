//! Error types for pyforge-projects

use thiserror::Error;

/// Result type alias using pyforge-projects's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Project scaffolding error types
#[derive(Error, Debug)]
pub enum Error {
    /// Target directory could not be created. Fatal; nothing else runs.
    #[error("Failed to create project directory {path}: {reason}")]
    DirectoryCreate { path: String, reason: String },

    /// Requested template does not exist. Fatal; nothing else runs.
    #[error("Template not found: '{template}' (available: {available})")]
    TemplateNotFound { template: String, available: String },

    /// Embedded template catalog is malformed
    #[error("Failed to parse template catalog: {0}")]
    Catalog(#[from] serde_yaml_ng::Error),

    /// Git command not found on PATH
    #[error("Git command not found. Please ensure git is installed and in PATH")]
    GitNotFound,

    /// A git subcommand failed
    #[error("Git operation failed: {message}")]
    GitOperation { message: String },

    /// Environment provisioning failed
    #[error(transparent)]
    Python(#[from] pyforge_python::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a directory creation error
    pub fn directory_create(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DirectoryCreate {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a template not found error
    pub fn template_not_found(template: impl Into<String>, available: impl Into<String>) -> Self {
        Self::TemplateNotFound {
            template: template.into(),
            available: available.into(),
        }
    }

    /// Create a git operation error
    pub fn git_operation(message: impl Into<String>) -> Self {
        Self::GitOperation {
            message: message.into(),
        }
    }
}
