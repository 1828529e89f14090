//! Configuration handling for the isovis CLI
//!
//! Supports loading configuration from isovis.toml files with CLI argument overrides.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use isovis_core::LayoutOptions;

use crate::error::CliError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub axis: AxisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisConfig {
    /// Screen width of the gene axis in pixels
    #[serde(default = "default_plot_width")]
    pub plot_width: f64,

    /// Compress introns while keeping exon proportions
    #[serde(default = "default_true")]
    pub shrink_introns: bool,

    /// Genomic coordinates increase from left to right
    #[serde(default = "default_true")]
    pub ascending: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON output
    #[serde(default = "default_true")]
    pub pretty: bool,
}

// Default value functions
fn default_plot_width() -> f64 { isovis_core::axis::DEFAULT_PLOT_WIDTH }
fn default_true() -> bool { true }

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            plot_width: default_plot_width(),
            shrink_introns: true,
            ascending: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                // Try to find isovis.toml in current directory
                let default_path = PathBuf::from("isovis.toml");
                if default_path.exists() {
                    log::info!("Loading configuration from: isovis.toml");
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|err| {
            CliError::config(format!("Failed to read {}: {}", path.display(), err))
        })?;

        let config: Config = toml::from_str(&content).map_err(|err| {
            CliError::config(format!("Failed to parse {}: {}", path.display(), err))
        })?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;

        std::fs::write(path, content).map_err(|err| {
            CliError::io(format!("Failed to write {}: {}", path.display(), err))
        })?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self).map_err(CliError::from)?)
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        Self::default().to_toml()
    }

    /// Layout options from the `[axis]` section, before CLI overrides.
    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            plot_width: self.axis.plot_width,
            zoom: None,
            shrink_introns: self.axis.shrink_introns,
            ascending: self.axis.ascending,
        }
    }
}
