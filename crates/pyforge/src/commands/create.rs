//! `pyforge create` command handler

use anyhow::{Context, Result};
use camino::Utf8PathBuf;

use pyforge_core::types::{EnvKind, ProjectSpec, PythonInstall};
use pyforge_projects::{CreationSummary, ProjectCreator, TemplateCatalog};
use pyforge_python::PythonDiscovery;
use pyforge_registry::RegistryClient;

use crate::cli::CreateArgs;
use crate::output;

/// Create a new project from a template
pub async fn run(args: CreateArgs) -> Result<()> {
    output::header("Create New Project");

    let discovery = PythonDiscovery::probe().await;
    let python = resolve_python(&discovery, args.python.as_deref()).await;

    let env = if args.conda {
        EnvKind::Conda
    } else if args.no_venv {
        EnvKind::None
    } else {
        EnvKind::Venv
    };

    let spec = ProjectSpec {
        name: args.name.clone(),
        parent_dir: absolute_dir(&args.directory)?,
        template: args.template,
        python,
        description: args
            .description
            .unwrap_or_else(|| "A Python project created with pyforge".to_string()),
        packages: args.packages,
        dev_packages: args.dev_packages,
        env,
        conda_env_name: args.conda_env,
        init_git: !args.no_git,
        write_env_file: !args.no_env_file,
    };

    output::kv("Project name", &spec.name);
    output::kv("Template", &spec.template);
    output::kv("Location", spec.project_path().as_str());
    println!();

    warn_about_unknown_packages(&spec).await;

    let catalog = TemplateCatalog::embedded().context("failed to load template catalog")?;
    let reporter = output::ConsoleReporter;
    let summary = ProjectCreator::new(&spec, &discovery, &catalog, &reporter)
        .create()
        .await?;

    print_summary(&summary);
    Ok(())
}

/// Resolve a requested version string against discovery. Falls back to the
/// current interpreter with a warning when nothing matches.
async fn resolve_python(
    discovery: &PythonDiscovery,
    requested: Option<&str>,
) -> Option<PythonInstall> {
    let requested = requested?;
    let available = discovery.available().await;
    let matched = available.into_iter().find(|install| {
        install.version == requested || install.version.starts_with(&format!("{requested}."))
    });

    if matched.is_none() {
        output::warning(&format!(
            "Python {requested} was not found on this system; using the current interpreter"
        ));
    }
    matched
}

/// Check additional packages against the registry up front. Unknown
/// packages only warn; the installer produces the authoritative error.
async fn warn_about_unknown_packages(spec: &ProjectSpec) {
    let mut all: Vec<String> = spec.packages.clone();
    all.extend(spec.dev_packages.iter().cloned());
    if all.is_empty() {
        return;
    }

    let registry = RegistryClient::new();
    let (_, invalid) = registry.validate(&all).await;
    if !invalid.is_empty() {
        output::warning(&format!(
            "Not found on PyPI (continuing anyway): {}",
            invalid.join(", ")
        ));
    }
}

/// Resolve the parent directory to an absolute path without requiring it
/// to exist yet
fn absolute_dir(directory: &Utf8PathBuf) -> Result<Utf8PathBuf> {
    if directory.is_absolute() {
        return Ok(directory.clone());
    }
    let cwd = std::env::current_dir().context("could not determine current directory")?;
    let cwd = Utf8PathBuf::from_path_buf(cwd)
        .map_err(|path| anyhow::anyhow!("current directory is not UTF-8: {}", path.display()))?;
    Ok(cwd.join(directory))
}

/// Final structured summary: every artifact, every failed package with its
/// reason, and the repository outcome.
fn print_summary(summary: &CreationSummary) {
    output::header("Summary");
    output::kv("Location", summary.project_path.as_str());

    if !summary.created_files.is_empty() {
        output::kv("Files", &summary.created_files.join(", "));
    }

    if let Some(environment) = &summary.environment {
        output::kv(
            "Environment",
            &format!("{} ({}) at {}", environment.version, environment.kind, environment.locator),
        );
        if environment.pip.is_none() {
            output::warning("No package installer was found in the environment");
        }
    }

    for (label, report) in [
        ("Dependencies", &summary.install),
        ("Dev dependencies", &summary.dev_install),
    ] {
        if let Some(report) = report {
            output::kv(
                label,
                &format!("{}/{} installed", report.succeeded().len(), report.total()),
            );
            for failure in report.failed() {
                output::warning(&format!("  {} failed: {}", failure.package, failure.reason));
            }
        }
    }

    match summary.git_initialized {
        Some(true) => output::kv("Git", "initialized with initial commit"),
        Some(false) => output::kv("Git", "initialization failed (see warnings)"),
        None => {}
    }

    for warning in &summary.warnings {
        output::warning(warning);
    }

    println!();
    output::success("Project created");
}
