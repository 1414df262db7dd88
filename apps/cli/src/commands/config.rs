//! Config command implementation.

use anyhow::{Context, Result};
use colored::Colorize;
use kiln_core::LaunchConfig;
use std::path::Path;

pub fn execute(config_path: Option<&Path>) -> Result<()> {
    let config = LaunchConfig::load(config_path).context("Failed to load configuration")?;
    let rendered = toml::to_string_pretty(&config).context("Failed to render configuration")?;

    println!();
    println!("{}", "Effective configuration".bold().cyan());
    println!();
    println!("{rendered}");
    Ok(())
}
