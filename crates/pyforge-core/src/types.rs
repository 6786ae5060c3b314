//! Shared type definitions for project creation and package management.

use std::fmt;

use camino::Utf8PathBuf;
use serde::Serialize;

/// Kind of interpreter environment to provision for a new project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvKind {
    /// No managed environment
    None,
    /// Project-local virtual environment under `.venv/`
    Venv,
    /// Named conda environment managed outside the project directory
    Conda,
}

/// Everything needed to create a project. Built by the CLI layer and
/// treated as immutable once orchestration starts.
#[derive(Debug, Clone)]
pub struct ProjectSpec {
    /// Project name as given by the user (may contain spaces)
    pub name: String,
    /// Absolute parent directory the project is created under
    pub parent_dir: Utf8PathBuf,
    /// Template identifier (e.g. "basic", "fastapi")
    pub template: String,
    /// Interpreter resolved by discovery, or None for the current one
    pub python: Option<PythonInstall>,
    /// Human-readable project description
    pub description: String,
    /// Additional packages to install on top of the template's dependencies
    pub packages: Vec<String>,
    /// Development-only packages
    pub dev_packages: Vec<String>,
    /// Environment kind to provision
    pub env: EnvKind,
    /// Explicit conda environment name (defaults to `<name_snake>_env`)
    pub conda_env_name: Option<String>,
    /// Initialize a git repository and create an initial commit
    pub init_git: bool,
    /// Write a `.env` file from the template's environment variables
    pub write_env_file: bool,
}

impl ProjectSpec {
    /// The resolved project directory. Created once; every generated
    /// artifact is a child of it.
    pub fn project_path(&self) -> Utf8PathBuf {
        self.parent_dir.join(&self.name)
    }

    /// Conda environment name to use: the explicit one, or a default
    /// derived from the project name.
    pub fn effective_conda_env(&self) -> String {
        self.conda_env_name
            .clone()
            .unwrap_or_else(|| format!("{}_env", snake_name(&self.name)))
    }
}

/// Lowercased identifier form of a project name: `-` and spaces become `_`.
pub fn snake_name(name: &str) -> String {
    name.to_lowercase().replace(['-', ' '], "_")
}

/// Title-cased display form of a project name: `-` and `_` become spaces,
/// each word capitalized.
pub fn title_name(name: &str) -> String {
    name.replace(['-', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Where an interpreter comes from. Carried through from discovery so the
/// executable can be resolved without re-parsing display labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpreterSelection {
    /// The `python3` found first on PATH
    Current,
    /// Another interpreter installed on the system
    System { path: Utf8PathBuf },
    /// Interpreter belonging to a named conda environment
    Conda { env: String },
    /// Version managed by pyenv
    Pyenv { version: String },
}

/// A discovered Python interpreter
#[derive(Debug, Clone)]
pub struct PythonInstall {
    /// Version string, e.g. "3.11.7"
    pub version: String,
    /// Source the interpreter was discovered from
    pub selection: InterpreterSelection,
    /// Executable path when known up front
    pub executable: Option<Utf8PathBuf>,
}

impl fmt::Display for PythonInstall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.selection {
            InterpreterSelection::Current => write!(f, "{} (current)", self.version),
            InterpreterSelection::System { path } => {
                write!(f, "{} (system: {})", self.version, path)
            }
            InterpreterSelection::Conda { env } => write!(f, "{} (conda: {})", self.version, env),
            InterpreterSelection::Pyenv { .. } => write!(f, "{} (pyenv)", self.version),
        }
    }
}

/// Kind of a provisioned or discovered environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentKind {
    System,
    Venv,
    Conda,
    Pyenv,
}

impl fmt::Display for EnvironmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EnvironmentKind::System => "system",
            EnvironmentKind::Venv => "venv",
            EnvironmentKind::Conda => "conda",
            EnvironmentKind::Pyenv => "pyenv",
        };
        f.write_str(name)
    }
}

/// A usable interpreter environment, produced by provisioning or discovery.
/// Not persisted anywhere.
#[derive(Debug, Clone)]
pub struct EnvironmentDescriptor {
    /// Interpreter version string
    pub version: String,
    /// Where the environment lives
    pub kind: EnvironmentKind,
    /// Filesystem path for venvs, environment name for conda
    pub locator: String,
    /// Interpreter executable
    pub python: Utf8PathBuf,
    /// Package installer executable. None means provisioning succeeded but
    /// no working installer was found; dependency installation must be
    /// skipped and reported, not crashed on.
    pub pip: Option<Utf8PathBuf>,
}

/// Target environment for install/uninstall/list operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageScope {
    /// Whatever `pip` resolves to in the current process environment
    Current,
    /// The system interpreter's site-packages
    Global,
    /// A virtual environment directory
    Venv { path: Utf8PathBuf },
    /// A named conda environment
    Conda { env: String },
}

impl fmt::Display for PackageScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageScope::Current => f.write_str("current environment"),
            PackageScope::Global => f.write_str("global"),
            PackageScope::Venv { path } => write!(f, "venv: {path}"),
            PackageScope::Conda { env } => write!(f, "conda: {env}"),
        }
    }
}

/// Installation options. Every recognized flag is explicit; there is no
/// pass-through option bag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// `--upgrade`
    pub upgrade: bool,
    /// `--force-reinstall --no-deps`
    pub force_reinstall: bool,
    /// `-e`
    pub editable: bool,
    /// Treat identifiers as git repository URLs
    pub from_git: bool,
    /// Append an `[all]` extras qualifier to unqualified identifiers
    pub include_extras: bool,
}

/// A single package that failed to install or uninstall
#[derive(Debug, Clone)]
pub struct PackageFailure {
    pub package: String,
    pub reason: String,
}

/// Per-package outcome of a batch operation. Every input package lands in
/// exactly one of the two buckets.
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    succeeded: Vec<String>,
    failed: Vec<PackageFailure>,
}

impl InstallReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, package: impl Into<String>) {
        self.succeeded.push(package.into());
    }

    pub fn record_failure(&mut self, package: impl Into<String>, reason: impl Into<String>) {
        self.failed.push(PackageFailure {
            package: package.into(),
            reason: reason.into(),
        });
    }

    pub fn succeeded(&self) -> &[String] {
        &self.succeeded
    }

    pub fn failed(&self) -> &[PackageFailure] {
        &self.failed
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// An installed package as reported by the installer's structured listing
#[derive(Debug, Clone, Serialize)]
pub struct InstalledPackage {
    pub name: String,
    pub version: String,
    /// Latest available version, filled in when an outdated query ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}
