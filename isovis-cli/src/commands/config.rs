//! Config command implementation - print or write isovis.toml

use anyhow::Result;
use std::path::PathBuf;

use crate::config::Config;

pub fn execute(config: &Config, example: bool, out: Option<PathBuf>) -> Result<()> {
    match out {
        Some(path) => {
            let config = if example { Config::default() } else { config.clone() };
            config.save_to_file(&path)?;
            log::info!("Configuration written to: {}", path.display());
        }
        None if example => print!("{}", Config::example_toml()?),
        None => print!("{}", config.to_toml()?),
    }

    Ok(())
}
