//! Conda capability.
//!
//! Probed once at discovery time; all conda interaction goes through the
//! resulting [`CondaCli`] handle. Absence of conda is not an error.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use tracing::debug;

use crate::discovery::interpreter_version;
use crate::error::{Error, Result};
use crate::process::{self, LIST_TIMEOUT, PROBE_TIMEOUT};

/// A named conda environment
#[derive(Debug, Clone)]
pub struct CondaEnv {
    pub name: String,
    pub path: Utf8PathBuf,
    /// Version of the environment's interpreter, probed by running it
    pub python_version: Option<String>,
}

#[derive(Deserialize)]
struct CondaEnvList {
    #[serde(default)]
    envs: Vec<String>,
}

/// Handle to a working conda installation
#[derive(Debug, Clone)]
pub struct CondaCli;

impl CondaCli {
    /// Probe for conda. Returns None when the binary is missing or does
    /// not answer `--version` in time.
    pub async fn detect() -> Option<Self> {
        which::which("conda").ok()?;
        let output = process::run("conda", &["--version"], None, Some(PROBE_TIMEOUT))
            .await
            .ok()?;
        output.status.success().then_some(Self)
    }

    /// List environments with their interpreter versions.
    ///
    /// Best-effort: any failure yields an empty list.
    pub async fn environments(&self) -> Vec<CondaEnv> {
        let output = match process::run("conda", &["env", "list", "--json"], None, Some(LIST_TIMEOUT)).await
        {
            Ok(output) if output.status.success() => output,
            Ok(output) => {
                debug!("conda env list failed: {}", process::stderr_str(&output));
                return Vec::new();
            }
            Err(err) => {
                debug!("conda env list unavailable: {err}");
                return Vec::new();
            }
        };

        let listing: CondaEnvList = match serde_json::from_slice(&output.stdout) {
            Ok(listing) => listing,
            Err(err) => {
                debug!("could not parse conda env list output: {err}");
                return Vec::new();
            }
        };

        let mut envs = Vec::new();
        for raw_path in listing.envs {
            let path = Utf8PathBuf::from(raw_path);
            let Some(name) = path.file_name().map(str::to_string) else {
                continue;
            };
            let python = env_python_path(&path);
            let python_version = match &python {
                Some(python) => interpreter_version(python).await,
                None => None,
            };
            envs.push(CondaEnv {
                name,
                path,
                python_version,
            });
        }
        envs
    }

    /// Create a new environment with a pinned interpreter version.
    /// Runs unbounded: solver runs can legitimately take minutes.
    pub async fn create_env(&self, name: &str, python_version: &str) -> Result<()> {
        let version_arg = format!("python={python_version}");
        let output = process::run(
            "conda",
            &["create", "-n", name, &version_arg, "-y"],
            None,
            None,
        )
        .await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(Error::provision(format!(
                "conda create for '{name}' failed: {}",
                process::failure_reason(&output)
            )))
        }
    }

    /// Interpreter executable for a named environment, when the
    /// environment exists and carries one.
    pub async fn env_python(&self, name: &str) -> Option<Utf8PathBuf> {
        self.environments()
            .await
            .into_iter()
            .find(|env| env.name == name)
            .and_then(|env| env_python_path(&env.path))
    }

    /// Install an interpreter version into the base environment
    pub async fn install_python(&self, version: &str) -> Result<()> {
        let version_arg = format!("python={version}");
        let output = process::run("conda", &["install", &version_arg, "-y"], None, None).await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(Error::command_failed(
                format!("conda install {version_arg}"),
                process::failure_reason(&output),
            ))
        }
    }
}

/// Platform-dependent interpreter location inside an environment directory
fn env_python_path(env_path: &Utf8Path) -> Option<Utf8PathBuf> {
    let candidates = if cfg!(windows) {
        [env_path.join("Scripts/python.exe"), env_path.join("python.exe")]
    } else {
        [env_path.join("bin/python"), env_path.join("bin/python3")]
    };
    candidates.into_iter().find(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_list_parsing() {
        let raw = r#"{"envs": ["/home/user/miniconda3", "/home/user/miniconda3/envs/ml"]}"#;
        let listing: CondaEnvList = serde_json::from_str(raw).unwrap();
        assert_eq!(listing.envs.len(), 2);
        assert!(listing.envs[1].ends_with("ml"));
    }

    #[test]
    fn test_env_list_parsing_missing_key() {
        let listing: CondaEnvList = serde_json::from_str("{}").unwrap();
        assert!(listing.envs.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_env_python_path_prefers_existing() {
        let temp = tempfile::TempDir::new().unwrap();
        let env_path = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        assert_eq!(env_python_path(&env_path), None);

        std::fs::create_dir_all(env_path.join("bin")).unwrap();
        std::fs::write(env_path.join("bin/python"), "").unwrap();
        assert_eq!(
            env_python_path(&env_path),
            Some(env_path.join("bin/python"))
        );
    }
}
