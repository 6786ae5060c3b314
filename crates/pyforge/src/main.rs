//! Pyforge CLI - Python project scaffolding and environment management
//!
//! This is the main entry point for the pyforge command-line interface.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI args
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose, cli.quiet);

    // Run command
    match cli.command {
        Commands::Create(args) => commands::create::run(args).await,
        Commands::Package(cmd) => commands::package::run(cmd).await,
        Commands::Python(cmd) => commands::python::run(cmd).await,
        Commands::Templates(cmd) => commands::templates::run(cmd),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            // Library tracing stays quiet by default; the reporter carries
            // user-facing progress. -v/-vv opt into diagnostics.
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
