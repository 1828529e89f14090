//! Command implementations for the isovis CLI

pub mod config;
pub mod junctions;
pub mod layout;
pub mod protein;

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use isovis_core::{io::parse_record_file, IsoformSet};

use crate::error::CliError;

/// Read a record file into an isoform set in default display order.
pub(crate) fn load_isoforms(input: &Path) -> Result<IsoformSet> {
    if !input.exists() {
        return Err(CliError::file_not_found(input.to_path_buf()).into());
    }

    let isoforms = parse_record_file(input)
        .map_err(|e| CliError::parse(input.display().to_string(), format!("{:#}", e)))?;
    log::info!("Loaded {} isoforms from {}", isoforms.len(), input.display());

    Ok(IsoformSet::new(isoforms))
}

/// Write `value` as JSON to `out`, or to stdout when no path is given.
pub(crate) fn write_json<T: Serialize>(value: &T, out: Option<&PathBuf>, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialize output")?;

    match out {
        Some(path) => {
            std::fs::write(path, json + "\n").map_err(|err| {
                CliError::io(format!("Failed to write output file {}: {}", path.display(), err))
            })?;
            log::info!("Output written to: {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
