//! Environment provisioning for new projects.
//!
//! Two variants selected by the project spec: a project-local virtual
//! environment under `.venv/`, or a named conda environment outside the
//! project. Both end by resolving the environment's installer executable;
//! a missing installer is a soft failure carried in the descriptor, not an
//! error.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

use pyforge_core::reporter::Reporter;
use pyforge_core::types::{EnvKind, EnvironmentDescriptor, EnvironmentKind, ProjectSpec};

use crate::discovery::PythonDiscovery;
use crate::error::{Error, Result};
use crate::pip;
use crate::process;

/// Fallback interpreter version pinned into new conda environments when
/// the user did not choose one
const DEFAULT_CONDA_PYTHON: &str = "3.11";

/// Provision the environment requested by the project spec.
///
/// Must not be called for `EnvKind::None`.
pub async fn provision(
    spec: &ProjectSpec,
    project_path: &Utf8Path,
    discovery: &PythonDiscovery,
    reporter: &dyn Reporter,
) -> Result<EnvironmentDescriptor> {
    match spec.env {
        EnvKind::Venv => create_venv(spec, project_path, discovery, reporter).await,
        EnvKind::Conda => setup_conda(spec, project_path, discovery, reporter).await,
        EnvKind::None => Err(Error::provision("no environment kind requested")),
    }
}

/// Create (or reuse) `<project>/.venv`.
///
/// Idempotent: an existing directory is accepted as-is. The check does not
/// verify the environment actually works; that gap is accepted and
/// documented.
async fn create_venv(
    spec: &ProjectSpec,
    project_path: &Utf8Path,
    discovery: &PythonDiscovery,
    reporter: &dyn Reporter,
) -> Result<EnvironmentDescriptor> {
    let venv_path = project_path.join(".venv");

    if venv_path.exists() {
        // Existing directory is trusted as-is; see DESIGN.md
        reporter.success("virtual environment already exists");
    } else {
        let python = match &spec.python {
            Some(install) => discovery.resolve_executable(&install.selection).await,
            None => match discovery.current().await.and_then(|i| i.executable) {
                Some(executable) => executable,
                None => {
                    return Err(Error::provision(
                        "no Python interpreter found on PATH to create the environment with",
                    ))
                }
            },
        };

        reporter.detail(&format!("creating {venv_path} with {python}"));
        let output = process::run(
            python.as_str(),
            &["-m", "venv", venv_path.as_str()],
            None,
            None,
        )
        .await?;

        if !output.status.success() {
            return Err(Error::provision(format!(
                "venv creation failed: {}",
                process::failure_reason(&output)
            )));
        }
        if !venv_path.exists() {
            return Err(Error::provision(format!(
                "venv directory was not created at {venv_path}"
            )));
        }
        info!("virtual environment created at {venv_path}");
    }

    let version = match &spec.python {
        Some(install) => install.version.clone(),
        None => discovery
            .current_version()
            .await
            .unwrap_or_else(|| "unknown".to_string()),
    };

    let pip = pip::venv_pip_path(&venv_path);
    if pip.is_none() {
        let tried = pip::pip_candidates(&venv_path)
            .iter()
            .map(|path| path.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        reporter.warn(&format!(
            "no pip executable found in the environment (tried: {tried}); dependency installation will be skipped"
        ));
    }

    let python = match venv_python_path(&venv_path) {
        Some(python) => python,
        None => {
            discovery
                .current()
                .await
                .and_then(|install| install.executable)
                .unwrap_or_else(|| Utf8PathBuf::from("python3"))
        }
    };

    Ok(EnvironmentDescriptor {
        version,
        kind: EnvironmentKind::Venv,
        locator: venv_path.to_string(),
        python,
        pip,
    })
}

/// Create (or reuse) the named conda environment for the project and drop
/// an activation helper into the project directory.
async fn setup_conda(
    spec: &ProjectSpec,
    project_path: &Utf8Path,
    discovery: &PythonDiscovery,
    reporter: &dyn Reporter,
) -> Result<EnvironmentDescriptor> {
    let Some(conda) = discovery.conda() else {
        return Err(Error::CondaUnavailable);
    };

    let env_name = spec.effective_conda_env();
    let requested_version = spec
        .python
        .as_ref()
        .map(|install| install.version.clone())
        .unwrap_or_else(|| DEFAULT_CONDA_PYTHON.to_string());

    let existing = conda
        .environments()
        .await
        .into_iter()
        .find(|env| env.name == env_name);

    let version = match &existing {
        Some(env) => {
            reporter.success(&format!("using existing conda environment: {env_name}"));
            env.python_version.clone().unwrap_or(requested_version)
        }
        None => {
            reporter.detail(&format!(
                "creating conda environment '{env_name}' with Python {requested_version}"
            ));
            conda.create_env(&env_name, &requested_version).await?;
            requested_version
        }
    };

    write_activation_script(project_path, &env_name)?;
    reporter.success("created conda activation script");

    let python = match conda.env_python(&env_name).await {
        Some(python) => python,
        None => {
            debug!("interpreter for conda env '{env_name}' not found on disk");
            Utf8PathBuf::from("python3")
        }
    };
    let pip = python
        .parent()
        .map(|bin| {
            if cfg!(windows) {
                bin.join("pip.exe")
            } else {
                bin.join("pip")
            }
        })
        .filter(|pip| pip.exists());

    Ok(EnvironmentDescriptor {
        version,
        kind: EnvironmentKind::Conda,
        locator: env_name,
        python,
        pip,
    })
}

/// Interpreter inside a virtual environment, when present
fn venv_python_path(venv: &Utf8Path) -> Option<Utf8PathBuf> {
    let candidates = if cfg!(windows) {
        [venv.join("Scripts/python.exe"), venv.join("Scripts/python3.exe")]
    } else {
        [venv.join("bin/python"), venv.join("bin/python3")]
    };
    candidates.into_iter().find(|path| path.exists())
}

/// Shell helper that activates the project's conda environment
fn write_activation_script(project_path: &Utf8Path, env_name: &str) -> Result<()> {
    let (file_name, content) = if cfg!(windows) {
        (
            "activate.bat",
            format!("@echo off\r\nconda activate {env_name}\r\n"),
        )
    } else {
        (
            "activate.sh",
            format!("#!/bin/bash\nconda activate {env_name}\n"),
        )
    };

    let script_path = project_path.join(file_name);
    std::fs::write(&script_path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(&script_path)?.permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&script_path, perms)?;
    }

    Ok(())
}
