//! `pyforge package` command handlers

use anyhow::{bail, Context, Result};
use camino::Utf8PathBuf;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use pyforge_core::types::{InstallOptions, InstallReport, PackageScope};
use pyforge_python::PipClient;
use pyforge_registry::RegistryClient;

use crate::cli::{
    InfoArgs, InstallArgs, ListArgs, OutputFormat, PackageCommands, SearchArgs, UninstallArgs,
    UpdateArgs, VersionsArgs,
};
use crate::output;

pub async fn run(command: PackageCommands) -> Result<()> {
    match command {
        PackageCommands::Search(args) => search(args).await,
        PackageCommands::Install(args) => install(args).await,
        PackageCommands::Uninstall(args) => uninstall(args).await,
        PackageCommands::List(args) => list(args).await,
        PackageCommands::Update(args) => update(args).await,
        PackageCommands::Info(args) => info(args).await,
        PackageCommands::Versions(args) => versions(args).await,
    }
}

/// Map `--global` and `--env` to a scope. `conda:`/`venv:` prefixes are
/// explicit; a path-looking value means a venv, anything else a conda
/// environment name.
fn resolve_scope(global: bool, environment: Option<&str>) -> PackageScope {
    match environment {
        Some(env) => {
            if let Some(name) = env.strip_prefix("conda:") {
                PackageScope::Conda {
                    env: name.to_string(),
                }
            } else if let Some(path) = env.strip_prefix("venv:") {
                PackageScope::Venv {
                    path: Utf8PathBuf::from(path),
                }
            } else if env.contains('/') || env.contains('\\') {
                PackageScope::Venv {
                    path: Utf8PathBuf::from(env),
                }
            } else {
                PackageScope::Conda {
                    env: env.to_string(),
                }
            }
        }
        None if global => PackageScope::Global,
        None => PackageScope::Current,
    }
}

#[derive(Tabled)]
struct SearchRow {
    #[tabled(rename = "Package")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Description")]
    description: String,
}

async fn search(args: SearchArgs) -> Result<()> {
    let spinner = output::spinner(&format!("Searching for '{}'...", args.query));
    let registry = RegistryClient::new();
    let results = registry.search(&args.query, args.limit).await;
    spinner.finish_and_clear();

    if results.is_empty() {
        output::info(&format!("No packages found for '{}'", args.query));
        return Ok(());
    }

    let rows: Vec<SearchRow> = results
        .into_iter()
        .map(|package| SearchRow {
            name: package.name,
            version: package.version,
            description: package.description,
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::sharp()));
    Ok(())
}

async fn install(args: InstallArgs) -> Result<()> {
    let scope = resolve_scope(args.global, args.environment.as_deref());
    let options = InstallOptions {
        upgrade: args.upgrade,
        force_reinstall: args.force,
        editable: args.editable,
        from_git: args.git,
        include_extras: args.extras,
    };

    output::info(&format!(
        "Installing {} package(s) into {scope}",
        args.packages.len()
    ));

    let client = PipClient::new(scope);
    let report = client
        .install(&args.packages, &options, &output::ConsoleReporter)
        .await;

    finish_batch("installed", &report)
}

async fn uninstall(args: UninstallArgs) -> Result<()> {
    if !args.yes {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!("Uninstall {}?", args.packages.join(", ")))
            .default(false)
            .interact()
            .context("could not read confirmation")?;
        if !confirmed {
            output::info("Aborted");
            return Ok(());
        }
    }

    let scope = resolve_scope(args.global, args.environment.as_deref());
    let client = PipClient::new(scope);
    let report = client
        .uninstall(&args.packages, &output::ConsoleReporter)
        .await;

    finish_batch("uninstalled", &report)
}

async fn update(args: UpdateArgs) -> Result<()> {
    let scope = resolve_scope(args.global, args.environment.as_deref());

    output::info(&format!(
        "Updating {} package(s) in {scope}",
        args.packages.len()
    ));

    let client = PipClient::new(scope);
    let report = client.update(&args.packages, &output::ConsoleReporter).await;

    finish_batch("updated", &report)
}

#[derive(Tabled)]
struct ListRow {
    #[tabled(rename = "Package")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Latest")]
    latest: String,
}

async fn list(args: ListArgs) -> Result<()> {
    let scope = resolve_scope(args.global, args.environment.as_deref());
    let client = PipClient::new(scope);
    let packages = client
        .list(args.outdated)
        .await
        .context("failed to list packages")?;

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&packages)?);
        }
        OutputFormat::Table => {
            if packages.is_empty() {
                output::info("No packages installed");
                return Ok(());
            }
            let rows: Vec<ListRow> = packages
                .into_iter()
                .map(|package| ListRow {
                    latest: package.latest.unwrap_or_else(|| "-".to_string()),
                    name: package.name,
                    version: package.version,
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::sharp()));
        }
    }
    Ok(())
}

async fn info(args: InfoArgs) -> Result<()> {
    let scope = resolve_scope(false, args.environment.as_deref());
    let client = PipClient::new(scope);

    match client.show(&args.package).await? {
        Some(details) => {
            output::header(&args.package);
            for (key, value) in &details {
                output::kv(key, value);
            }
        }
        None => {
            output::warning(&format!("'{}' is not installed", args.package));
            output::info(&format!(
                "Try 'pyforge package search {}' to find it on PyPI",
                args.package
            ));
        }
    }
    Ok(())
}

async fn versions(args: VersionsArgs) -> Result<()> {
    let spinner = output::spinner(&format!("Fetching versions for '{}'...", args.package));
    let registry = RegistryClient::new();
    let versions = registry.versions(&args.package, args.limit).await;
    spinner.finish_and_clear();

    output::header(&format!("{} versions", args.package));
    for version in versions {
        println!("  {version}");
    }
    Ok(())
}

/// Print the batch result and fail the command when any package failed
fn finish_batch(verb: &str, report: &InstallReport) -> Result<()> {
    println!();
    output::info(&format!(
        "{}/{} package(s) {verb}",
        report.succeeded().len(),
        report.total()
    ));

    if !report.all_succeeded() {
        for failure in report.failed() {
            output::error(&format!("{}: {}", failure.package, failure.reason));
        }
        bail!("{} package(s) failed", report.failed().len());
    }
    Ok(())
}
