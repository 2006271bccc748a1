//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting wfmerge defaults.

use crate::config::Config;
use anyhow::Result;
use std::path::PathBuf;

/// Handle the configure command
///
/// # Arguments
/// * `data_dir` - Optional default data directory
/// * `output` - Optional default output file
/// * `show` - If true, show current configuration
pub fn handle(data_dir: Option<PathBuf>, output: Option<PathBuf>, show: bool) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if apply(&mut config, data_dir, output) {
        config.save()?;
        show_config(&config);
    } else {
        show_usage();
    }

    Ok(())
}

/// Store any supplied values. Returns whether anything changed.
fn apply(config: &mut Config, data_dir: Option<PathBuf>, output: Option<PathBuf>) -> bool {
    let changed = data_dir.is_some() || output.is_some();
    if let Some(dir) = data_dir {
        config.data_dir = Some(dir);
    }
    if let Some(path) = output {
        config.output = Some(path);
    }
    changed
}

/// Display current configuration
fn show_config(config: &Config) {
    match &config.data_dir {
        Some(dir) => println!("Data directory: {}", dir.display()),
        None => println!("No data directory configured (using ./data)"),
    }
    match &config.output {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("No output configured (using <data dir>/merged_warframe.json)"),
    }

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: wfmerge configure --data-dir DIR [--output FILE]");
    println!("   or: wfmerge configure --show");
    println!();
    println!("Note: WFMERGE_DATA_DIR overrides the configured data directory.");
}
