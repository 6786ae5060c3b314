//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Pyforge - Python project scaffolding and environment management
#[derive(Parser, Debug)]
#[command(name = "pyforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new Python project
    Create(CreateArgs),

    /// Package management (search, install, update)
    #[command(subcommand)]
    Package(PackageCommands),

    /// Python interpreter and environment management
    #[command(subcommand)]
    Python(PythonCommands),

    /// Project template management
    #[command(subcommand)]
    Templates(TemplateCommands),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Project name
    pub name: String,

    /// Project template
    #[arg(short, long, default_value = "basic")]
    pub template: String,

    /// Parent directory for the project
    #[arg(short = 'd', long = "dir", default_value = ".")]
    pub directory: Utf8PathBuf,

    /// Python version to use (e.g. 3.11)
    #[arg(short, long)]
    pub python: Option<String>,

    /// Project description
    #[arg(long)]
    pub description: Option<String>,

    /// Additional package to install (repeatable)
    #[arg(long = "package", value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// Development package to install (repeatable)
    #[arg(long = "dev", value_name = "PACKAGE")]
    pub dev_packages: Vec<String>,

    /// Skip virtual environment creation
    #[arg(long)]
    pub no_venv: bool,

    /// Use a conda environment instead of a venv
    #[arg(long, conflicts_with = "no_venv")]
    pub conda: bool,

    /// Name for the conda environment
    #[arg(long, requires = "conda")]
    pub conda_env: Option<String>,

    /// Skip git repository initialization
    #[arg(long)]
    pub no_git: bool,

    /// Skip .env file generation
    #[arg(long)]
    pub no_env_file: bool,
}

#[derive(Subcommand, Debug)]
pub enum PackageCommands {
    /// Search for packages on PyPI
    Search(SearchArgs),

    /// Install packages
    Install(InstallArgs),

    /// Uninstall packages
    Uninstall(UninstallArgs),

    /// List installed packages
    List(ListArgs),

    /// Update packages to their latest versions
    Update(UpdateArgs),

    /// Show details for an installed package
    Info(InfoArgs),

    /// List published versions of a package
    Versions(VersionsArgs),
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Package name or keyword
    pub query: String,

    /// Number of results to show
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Package names or git URLs
    #[arg(required = true)]
    pub packages: Vec<String>,

    /// Install into the system interpreter
    #[arg(short = 'g', long = "global")]
    pub global: bool,

    /// Target environment (name, conda:NAME, or venv:PATH)
    #[arg(short = 'e', long = "env")]
    pub environment: Option<String>,

    /// Treat identifiers as git repositories
    #[arg(long)]
    pub git: bool,

    /// Install in editable mode
    #[arg(long)]
    pub editable: bool,

    /// Upgrade if already installed
    #[arg(short = 'U', long)]
    pub upgrade: bool,

    /// Force reinstallation
    #[arg(long)]
    pub force: bool,

    /// Include all optional extras
    #[arg(long)]
    pub extras: bool,
}

#[derive(Args, Debug)]
pub struct UninstallArgs {
    /// Package names
    #[arg(required = true)]
    pub packages: Vec<String>,

    /// Uninstall from the system interpreter
    #[arg(short = 'g', long = "global")]
    pub global: bool,

    /// Target environment (name, conda:NAME, or venv:PATH)
    #[arg(short = 'e', long = "env")]
    pub environment: Option<String>,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// List packages in the system interpreter
    #[arg(short = 'g', long = "global")]
    pub global: bool,

    /// Target environment (name, conda:NAME, or venv:PATH)
    #[arg(short = 'e', long = "env")]
    pub environment: Option<String>,

    /// Include the latest available version for each package
    #[arg(long)]
    pub outdated: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Packages to update
    #[arg(required = true)]
    pub packages: Vec<String>,

    /// Update in the system interpreter
    #[arg(short = 'g', long = "global")]
    pub global: bool,

    /// Target environment (name, conda:NAME, or venv:PATH)
    #[arg(short = 'e', long = "env")]
    pub environment: Option<String>,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Package name
    pub package: String,

    /// Target environment (name, conda:NAME, or venv:PATH)
    #[arg(short = 'e', long = "env")]
    pub environment: Option<String>,
}

#[derive(Args, Debug)]
pub struct VersionsArgs {
    /// Package name
    pub package: String,

    /// Number of versions to show
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum PythonCommands {
    /// List Python interpreters reachable from this host
    List(PythonListArgs),

    /// Install a Python version via conda or pyenv
    Install(PythonInstallArgs),

    /// List existing conda environments and virtualenvs
    Envs,
}

#[derive(Args, Debug)]
pub struct PythonListArgs {
    /// Show versions that can be installed instead
    #[arg(long)]
    pub installable: bool,
}

#[derive(Args, Debug)]
#[command(disable_version_flag = true)]
pub struct PythonInstallArgs {
    /// Version to install (e.g. 3.12.8)
    pub version: String,

    /// Installation method
    #[arg(long, value_enum, default_value = "auto")]
    pub method: InstallMethodArg,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstallMethodArg {
    Auto,
    Conda,
    Pyenv,
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommands {
    /// List available project templates
    List,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
