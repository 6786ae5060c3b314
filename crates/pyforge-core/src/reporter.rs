//! Progress reporting interface.
//!
//! Components that do long-running work receive a `&dyn Reporter` instead
//! of printing to a shared console. The CLI installs a styled
//! implementation; tests use [`NullReporter`].

/// Emits user-facing progress while a pipeline runs
pub trait Reporter: Send + Sync {
    /// A top-level pipeline stage ("Creating virtual environment...")
    fn step(&self, message: &str);

    /// A sub-item within the current stage ("installing requests")
    fn detail(&self, message: &str);

    /// A completed stage or artifact
    fn success(&self, message: &str);

    /// A recoverable problem the user should know about
    fn warn(&self, message: &str);
}

/// Reporter that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn step(&self, _message: &str) {}
    fn detail(&self, _message: &str) {}
    fn success(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
}
