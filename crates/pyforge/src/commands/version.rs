//! Version information

use anyhow::Result;

use crate::output;

pub fn run() -> Result<()> {
    output::header("Pyforge");
    output::kv("version", env!("CARGO_PKG_VERSION"));
    output::kv("description", env!("CARGO_PKG_DESCRIPTION"));
    Ok(())
}
