//! Repository initialization.
//!
//! Shells out to the system `git`: init, a local identity if none is
//! configured globally, `add .`, and an initial commit. Callers decide
//! whether a failure matters; the creation pipeline logs and swallows it.

use std::process::Output;

use camino::Utf8Path;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{Error, Result};

const DEFAULT_USER_NAME: &str = "Pyforge User";
const DEFAULT_USER_EMAIL: &str = "pyforge@localhost";
const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";

/// Initialize a git repository in the project directory and commit the
/// generated tree.
pub async fn init_repository(path: &Utf8Path) -> Result<()> {
    if which::which("git").is_err() {
        return Err(Error::GitNotFound);
    }

    if path.join(".git").exists() {
        debug!("git repository already exists at {path}");
    } else {
        run_git(path, &["init"]).await?;
    }

    ensure_identity(path).await?;

    run_git(path, &["add", "."]).await?;
    run_git(path, &["commit", "-m", INITIAL_COMMIT_MESSAGE]).await?;

    info!("initialized git repository at {path}");
    Ok(())
}

/// Configure a local identity only when none is available; a global or
/// system-level identity is left alone.
async fn ensure_identity(path: &Utf8Path) -> Result<()> {
    let output = git_output(path, &["config", "user.name"]).await?;
    let configured = output.status.success()
        && !String::from_utf8_lossy(&output.stdout).trim().is_empty();

    if !configured {
        debug!("no git identity configured, setting a local default");
        run_git(path, &["config", "user.name", DEFAULT_USER_NAME]).await?;
        run_git(path, &["config", "user.email", DEFAULT_USER_EMAIL]).await?;
    }

    Ok(())
}

/// Run git, requiring success
async fn run_git(path: &Utf8Path, args: &[&str]) -> Result<Output> {
    let output = git_output(path, args).await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::git_operation(format!(
            "git {} failed: {}",
            args.join(" "),
            stderr.trim()
        )));
    }
    Ok(output)
}

/// Run git, capturing output regardless of exit status
async fn git_output(path: &Utf8Path, args: &[&str]) -> Result<Output> {
    debug!("running: git {} (in {path})", args.join(" "));
    Command::new("git")
        .current_dir(path)
        .args(args)
        .output()
        .await
        .map_err(|err| Error::git_operation(format!("could not run git: {err}")))
}
