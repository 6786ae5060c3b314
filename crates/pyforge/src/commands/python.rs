//! `pyforge python` command handlers

use anyhow::Result;

use pyforge_python::{InstallMethod, PythonDiscovery};

use crate::cli::{InstallMethodArg, PythonCommands, PythonInstallArgs, PythonListArgs};
use crate::output;

pub async fn run(command: PythonCommands) -> Result<()> {
    match command {
        PythonCommands::List(args) => list(args).await,
        PythonCommands::Install(args) => install(args).await,
        PythonCommands::Envs => envs().await,
    }
}

async fn list(args: PythonListArgs) -> Result<()> {
    let spinner = output::spinner("Probing Python installations...");
    let discovery = PythonDiscovery::probe().await;

    if args.installable {
        let installable = discovery.installable_versions();
        spinner.finish_and_clear();

        if installable.is_empty() {
            output::warning("No version manager (conda or pyenv) available for installation");
            return Ok(());
        }

        output::header("Installable Python versions");
        for candidate in installable {
            let method = match candidate.method {
                InstallMethod::Conda => "conda",
                InstallMethod::Pyenv => "pyenv",
                InstallMethod::Auto => "auto",
            };
            println!("  {} (via {method})", candidate.version);
        }
        return Ok(());
    }

    let available = discovery.available().await;
    spinner.finish_and_clear();

    if available.is_empty() {
        output::warning("No Python interpreter found on this system");
        return Ok(());
    }

    output::header("Available Python versions");
    for install in available {
        println!("  {install}");
    }
    Ok(())
}

async fn install(args: PythonInstallArgs) -> Result<()> {
    let discovery = PythonDiscovery::probe().await;
    let method = match args.method {
        InstallMethodArg::Auto => InstallMethod::Auto,
        InstallMethodArg::Conda => InstallMethod::Conda,
        InstallMethodArg::Pyenv => InstallMethod::Pyenv,
    };

    let spinner = output::spinner(&format!("Installing Python {}...", args.version));
    let result = discovery.install_version(&args.version, method).await;
    spinner.finish_and_clear();

    result?;
    output::success(&format!("Python {} installed", args.version));
    Ok(())
}

async fn envs() -> Result<()> {
    let spinner = output::spinner("Surveying environments...");
    let discovery = PythonDiscovery::probe().await;
    let survey = discovery.survey_environments().await;
    spinner.finish_and_clear();

    output::header("Conda environments");
    if survey.conda.is_empty() {
        println!("  (none)");
    }
    for name in &survey.conda {
        println!("  {name}");
    }

    output::header("Virtual environments");
    if survey.venvs.is_empty() {
        println!("  (none)");
    }
    for path in &survey.venvs {
        println!("  {path}");
    }
    Ok(())
}
