//! Subprocess helpers shared by the toolchain modules.
//!
//! Everything runs sequentially through `tokio::process::Command`.
//! Network-facing and version-manager commands get an explicit timeout;
//! local environment creation runs unbounded (OS default only).

use std::process::Output;
use std::time::Duration;

use camino::Utf8Path;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::error::{Error, Result};

/// Timeout for cheap availability and version probes
pub(crate) const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for version-manager listing commands
pub(crate) const LIST_TIMEOUT: Duration = Duration::from_secs(10);

/// Run a command to completion, capturing output.
///
/// `limit: None` means no timeout beyond the OS default.
pub(crate) async fn run(
    program: &str,
    args: &[&str],
    cwd: Option<&Utf8Path>,
    limit: Option<Duration>,
) -> Result<Output> {
    debug!("running: {} {}", program, args.join(" "));

    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let command_line = || format!("{} {}", program, args.join(" "));

    match limit {
        Some(limit) => match timeout(limit, cmd.output()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(err)) => Err(Error::command_failed(command_line(), err.to_string())),
            Err(_) => Err(Error::Timeout {
                command: command_line(),
                seconds: limit.as_secs(),
            }),
        },
        None => cmd
            .output()
            .await
            .map_err(|err| Error::command_failed(command_line(), err.to_string())),
    }
}

/// Stdout as trimmed UTF-8 (lossy)
pub(crate) fn stdout_str(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Stderr as trimmed UTF-8 (lossy)
pub(crate) fn stderr_str(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

/// Stderr if non-empty, otherwise a generic exit-status message
pub(crate) fn failure_reason(output: &Output) -> String {
    let stderr = stderr_str(output);
    if stderr.is_empty() {
        format!("exited with {}", output.status)
    } else {
        stderr
    }
}
