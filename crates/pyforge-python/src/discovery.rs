//! Interpreter and environment discovery.
//!
//! Merges interpreters from four independent, best-effort sources into one
//! de-duplicated list: the current `python3` on PATH, other system
//! interpreters, conda environments, and pyenv versions. The probing order
//! is the priority order: the first source to report a version owns it.

use std::collections::HashSet;
use std::sync::LazyLock;

use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use tracing::debug;

use pyforge_core::types::{InterpreterSelection, PythonInstall};

use crate::conda::CondaCli;
use crate::error::{Error, Result};
use crate::process::{self, PROBE_TIMEOUT};
use crate::pyenv::PyenvCli;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Python (\d+\.\d+\.\d+)").expect("version regex is valid"));

/// Executable names probed for system interpreters, newest first
const SYSTEM_PYTHON_NAMES: &[&str] = &[
    "python3.13",
    "python3.12",
    "python3.11",
    "python3.10",
    "python3.9",
    "python3.8",
];

/// Executable names tried for the current interpreter
const CURRENT_PYTHON_NAMES: &[&str] = &["python3", "python"];

/// Curated recent releases offered for installation. A static list by
/// design: a live query against every installable source is out of scope.
const INSTALLABLE_VERSIONS: &[&str] = &[
    "3.13.1", "3.13.0", "3.12.8", "3.12.7", "3.11.11", "3.11.9", "3.10.16", "3.10.14", "3.9.21",
    "3.9.19", "3.8.18",
];

/// How to install a new interpreter version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMethod {
    Auto,
    Conda,
    Pyenv,
}

/// An interpreter version offered for installation, with the manager that
/// would install it
#[derive(Debug, Clone)]
pub struct InstallablePython {
    pub version: String,
    pub method: InstallMethod,
}

/// Environments reachable from the host, outside any project
#[derive(Debug, Clone, Default)]
pub struct EnvironmentSurvey {
    /// Named conda environments
    pub conda: Vec<String>,
    /// Virtual environment directories found in conventional locations
    pub venvs: Vec<Utf8PathBuf>,
}

/// Discovery entry point. Holds the probe-once tool capabilities.
pub struct PythonDiscovery {
    conda: Option<CondaCli>,
    pyenv: Option<PyenvCli>,
}

impl PythonDiscovery {
    /// Probe for the optional version managers once
    pub async fn probe() -> Self {
        let conda = CondaCli::detect().await;
        let pyenv = PyenvCli::detect().await;
        debug!(
            conda = conda.is_some(),
            pyenv = pyenv.is_some(),
            "probed version managers"
        );
        Self { conda, pyenv }
    }

    /// Discovery with no version managers, for tests and offline paths
    pub fn without_managers() -> Self {
        Self {
            conda: None,
            pyenv: None,
        }
    }

    pub fn conda(&self) -> Option<&CondaCli> {
        self.conda.as_ref()
    }

    pub fn pyenv(&self) -> Option<&PyenvCli> {
        self.pyenv.as_ref()
    }

    /// The `python3` (or `python`) found first on PATH
    pub async fn current(&self) -> Option<PythonInstall> {
        for name in CURRENT_PYTHON_NAMES {
            let Ok(path) = which::which(name) else {
                continue;
            };
            let Ok(path) = Utf8PathBuf::from_path_buf(path) else {
                continue;
            };
            if let Some(version) = interpreter_version(&path).await {
                return Some(PythonInstall {
                    version,
                    selection: InterpreterSelection::Current,
                    executable: Some(path),
                });
            }
        }
        None
    }

    /// Version of the current interpreter, when one exists
    pub async fn current_version(&self) -> Option<String> {
        self.current().await.map(|install| install.version)
    }

    /// All interpreters reachable from the host, de-duplicated by version
    /// string. Source order is fixed: current > system > conda > pyenv.
    pub async fn available(&self) -> Vec<PythonInstall> {
        let current: Vec<PythonInstall> = self.current().await.into_iter().collect();
        let groups = vec![
            current,
            self.system_installs().await,
            self.conda_installs().await,
            self.pyenv_installs().await,
        ];
        merge_installs(groups)
    }

    async fn system_installs(&self) -> Vec<PythonInstall> {
        let mut installs = Vec::new();
        for name in SYSTEM_PYTHON_NAMES {
            let Ok(path) = which::which(name) else {
                continue;
            };
            let Ok(path) = Utf8PathBuf::from_path_buf(path) else {
                continue;
            };
            if let Some(version) = interpreter_version(&path).await {
                installs.push(PythonInstall {
                    version,
                    selection: InterpreterSelection::System { path: path.clone() },
                    executable: Some(path),
                });
            }
        }
        installs
    }

    async fn conda_installs(&self) -> Vec<PythonInstall> {
        let Some(conda) = &self.conda else {
            return Vec::new();
        };
        conda
            .environments()
            .await
            .into_iter()
            .filter_map(|env| {
                let version = env.python_version?;
                let executable = if cfg!(windows) {
                    env.path.join("Scripts/python.exe")
                } else {
                    env.path.join("bin/python")
                };
                Some(PythonInstall {
                    version,
                    selection: InterpreterSelection::Conda { env: env.name },
                    executable: Some(executable),
                })
            })
            .collect()
    }

    async fn pyenv_installs(&self) -> Vec<PythonInstall> {
        let Some(pyenv) = &self.pyenv else {
            return Vec::new();
        };
        pyenv
            .versions()
            .await
            .into_iter()
            .map(|version| PythonInstall {
                selection: InterpreterSelection::Pyenv {
                    version: version.clone(),
                },
                version,
                executable: None,
            })
            .collect()
    }

    /// Interpreter versions that can be installed, per available manager
    pub fn installable_versions(&self) -> Vec<InstallablePython> {
        let mut installable = Vec::new();
        if self.conda.is_some() {
            installable.extend(INSTALLABLE_VERSIONS.iter().map(|version| InstallablePython {
                version: (*version).to_string(),
                method: InstallMethod::Conda,
            }));
        }
        if self.pyenv.is_some() {
            installable.extend(INSTALLABLE_VERSIONS.iter().map(|version| InstallablePython {
                version: (*version).to_string(),
                method: InstallMethod::Pyenv,
            }));
        }
        installable
    }

    /// Install an interpreter version via the selected manager.
    /// `Auto` prefers conda, then pyenv.
    pub async fn install_version(&self, version: &str, method: InstallMethod) -> Result<()> {
        match method {
            InstallMethod::Conda => match &self.conda {
                Some(conda) => conda.install_python(version).await,
                None => Err(Error::CondaUnavailable),
            },
            InstallMethod::Pyenv => match &self.pyenv {
                Some(pyenv) => pyenv.install(version).await,
                None => Err(Error::NoVersionManager {
                    version: version.to_string(),
                }),
            },
            InstallMethod::Auto => {
                if let Some(conda) = &self.conda {
                    conda.install_python(version).await
                } else if let Some(pyenv) = &self.pyenv {
                    pyenv.install(version).await
                } else {
                    Err(Error::NoVersionManager {
                        version: version.to_string(),
                    })
                }
            }
        }
    }

    /// Resolve a selection to a concrete interpreter executable.
    ///
    /// Never fails: any lookup miss falls back to the current interpreter,
    /// and ultimately to the literal `python3`.
    pub async fn resolve_executable(&self, selection: &InterpreterSelection) -> Utf8PathBuf {
        match selection {
            InterpreterSelection::Current => {}
            InterpreterSelection::System { path } => {
                if path.exists() {
                    return path.clone();
                }
            }
            InterpreterSelection::Conda { env } => {
                if let Some(conda) = &self.conda {
                    if let Some(python) = conda.env_python(env).await {
                        return python;
                    }
                }
            }
            InterpreterSelection::Pyenv { version } => {
                if let Some(pyenv) = &self.pyenv {
                    if let Some(python) = pyenv.python_executable(version).await {
                        return python;
                    }
                }
            }
        }

        match self.current().await.and_then(|install| install.executable) {
            Some(path) => path,
            None => Utf8PathBuf::from("python3"),
        }
    }

    /// Survey of existing environments in conventional locations
    pub async fn survey_environments(&self) -> EnvironmentSurvey {
        let mut survey = EnvironmentSurvey::default();

        if let Some(conda) = &self.conda {
            survey.conda = conda
                .environments()
                .await
                .into_iter()
                .map(|env| env.name)
                .collect();
        }

        for location in venv_locations() {
            if !location.is_dir() {
                continue;
            }
            if matches!(location.file_name(), Some(".venv") | Some("venv")) {
                survey.venvs.push(location);
            } else {
                // A container directory such as ~/.virtualenvs
                let Ok(entries) = location.read_dir_utf8() else {
                    continue;
                };
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.is_dir() && path.join("pyvenv.cfg").exists() {
                        survey.venvs.push(path.to_path_buf());
                    }
                }
            }
        }

        survey
    }
}

/// Conventional locations checked for existing virtual environments
fn venv_locations() -> Vec<Utf8PathBuf> {
    let mut locations = Vec::new();
    if let Some(home) = dirs::home_dir().and_then(|home| Utf8PathBuf::from_path_buf(home).ok()) {
        locations.push(home.join(".virtualenvs"));
    }
    if let Ok(cwd) = std::env::current_dir() {
        if let Ok(cwd) = Utf8PathBuf::from_path_buf(cwd) {
            locations.push(cwd.join(".venv"));
            locations.push(cwd.join("venv"));
        }
    }
    locations
}

/// Run an interpreter with `--version` and extract `X.Y.Z`
pub(crate) async fn interpreter_version(python: &Utf8Path) -> Option<String> {
    let output = process::run(python.as_str(), &["--version"], None, Some(PROBE_TIMEOUT))
        .await
        .ok()?;
    if !output.status.success() {
        return None;
    }
    // Old interpreters print the version to stderr
    let text = if output.stdout.is_empty() {
        process::stderr_str(&output)
    } else {
        process::stdout_str(&output)
    };
    VERSION_RE
        .captures(&text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

/// Merge discovery groups, keeping the first entry seen for each version
/// string. Group order carries the source priority.
fn merge_installs(groups: Vec<Vec<PythonInstall>>) -> Vec<PythonInstall> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::new();
    for group in groups {
        for install in group {
            if seen.insert(install.version.clone()) {
                merged.push(install);
            }
        }
    }
    merged
}
