//! `pyforge templates` command handlers

use anyhow::{Context, Result};

use pyforge_projects::TemplateCatalog;

use crate::cli::TemplateCommands;
use crate::output;

pub fn run(command: TemplateCommands) -> Result<()> {
    match command {
        TemplateCommands::List => list(),
    }
}

fn list() -> Result<()> {
    let catalog = TemplateCatalog::embedded().context("failed to load template catalog")?;

    output::header("Available templates");
    for (name, template) in catalog.iter() {
        output::kv(name, &template.description);
        if !template.dependencies.is_empty() {
            println!("      dependencies: {}", template.dependencies.join(", "));
        }
    }
    Ok(())
}
