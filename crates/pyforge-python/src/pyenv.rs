//! pyenv capability.
//!
//! Same shape as the conda capability: probe once, then best-effort
//! queries against the per-user version manager.

use std::sync::LazyLock;

use camino::Utf8PathBuf;
use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::process::{self, LIST_TIMEOUT, PROBE_TIMEOUT};

static BARE_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("bare version regex is valid"));

/// Handle to a working pyenv installation
#[derive(Debug, Clone)]
pub struct PyenvCli;

impl PyenvCli {
    /// Probe for pyenv. Returns None when missing or unresponsive.
    pub async fn detect() -> Option<Self> {
        which::which("pyenv").ok()?;
        let output = process::run("pyenv", &["--version"], None, Some(PROBE_TIMEOUT))
            .await
            .ok()?;
        output.status.success().then_some(Self)
    }

    /// Installed interpreter versions, bare `X.Y.Z` entries only
    pub async fn versions(&self) -> Vec<String> {
        let output = match process::run("pyenv", &["versions", "--bare"], None, Some(LIST_TIMEOUT))
            .await
        {
            Ok(output) if output.status.success() => output,
            Ok(output) => {
                debug!("pyenv versions failed: {}", process::stderr_str(&output));
                return Vec::new();
            }
            Err(err) => {
                debug!("pyenv versions unavailable: {err}");
                return Vec::new();
            }
        };

        process::stdout_str(&output)
            .lines()
            .map(str::trim)
            .filter(|line| BARE_VERSION_RE.is_match(line))
            .map(str::to_string)
            .collect()
    }

    /// Interpreter executable for an installed version, when present
    pub async fn python_executable(&self, version: &str) -> Option<Utf8PathBuf> {
        let output = process::run("pyenv", &["prefix", version], None, Some(PROBE_TIMEOUT))
            .await
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let prefix = Utf8PathBuf::from(process::stdout_str(&output));
        let python = prefix.join("bin/python");
        python.exists().then_some(python)
    }

    /// Install an interpreter version. Unbounded: pyenv compiles from
    /// source.
    pub async fn install(&self, version: &str) -> Result<()> {
        let output = process::run("pyenv", &["install", version], None, None).await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(Error::command_failed(
                format!("pyenv install {version}"),
                process::failure_reason(&output),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_version_filter() {
        assert!(BARE_VERSION_RE.is_match("3.11.7"));
        assert!(BARE_VERSION_RE.is_match("3.8.18"));
        assert!(!BARE_VERSION_RE.is_match("3.11"));
        assert!(!BARE_VERSION_RE.is_match("system"));
        assert!(!BARE_VERSION_RE.is_match("3.12.0b4"));
        assert!(!BARE_VERSION_RE.is_match("miniconda3-latest"));
    }
}
