//! Layout command implementation - position a gene's isoforms on a screen axis

use anyhow::Result;
use std::path::PathBuf;

use isovis_core::io::{LevelParser, SiteParser};
use isovis_core::{GeneLayout, GenomicPos, LayoutOptions};

use crate::config::Config;
use crate::error::CliError;

/// Flags that override the `[axis]` config section.
#[derive(Debug, Default)]
pub struct AxisFlags {
    pub width: Option<f64>,
    pub zoom: Option<String>,
    pub no_shrink: bool,
    pub descending: bool,
}

/// RNA modification inputs drawn along with the gene.
#[derive(Debug, Default)]
pub struct SiteInputs {
    pub sites: Option<PathBuf>,
    pub gene: Option<String>,
    pub levels: Option<PathBuf>,
}

pub fn execute(
    config: &Config,
    input: PathBuf,
    out: Option<PathBuf>,
    flags: AxisFlags,
    site_inputs: SiteInputs,
) -> Result<()> {
    log::info!("Building layout for {}", input.display());

    let options = resolve_options(
        config,
        flags.width,
        flags.zoom.as_deref(),
        flags.no_shrink,
        flags.descending,
    )?;
    let isoforms = super::load_isoforms(&input)?;

    let layout = GeneLayout::build(&isoforms.visible_cloned(), &options);
    let layout = attach_sites(layout, &site_inputs)?;
    if !layout.diagnostics.is_empty() {
        log::warn!("Layout finished with {} diagnostics", layout.diagnostics.len());
    }

    super::write_json(&layout.report(), out.as_ref(), config.output.pretty)
}

/// Load modification sites, and their levels, onto the layout.
pub(crate) fn attach_sites(layout: GeneLayout, inputs: &SiteInputs) -> Result<GeneLayout> {
    let Some(bed) = &inputs.sites else {
        if inputs.levels.is_some() {
            return Err(CliError::validation("--levels needs a --sites file").into());
        }
        return Ok(layout);
    };
    if !bed.exists() {
        return Err(CliError::file_not_found(bed.clone()).into());
    }

    let sites = SiteParser::parse_file(bed, inputs.gene.as_deref())
        .map_err(|e| CliError::parse(bed.display().to_string(), format!("{:#}", e)))?;
    let mut layout = layout.with_modification_sites(&sites);

    if let Some(table) = &inputs.levels {
        let gene = inputs
            .gene
            .as_deref()
            .ok_or_else(|| CliError::validation("--levels needs --gene to select rows"))?;
        if !table.exists() {
            return Err(CliError::file_not_found(table.clone()).into());
        }
        let levels = LevelParser::parse_file(table, gene, &sites)
            .map_err(|e| CliError::parse(table.display().to_string(), format!("{:#}", e)))?;
        layout = layout.with_site_levels(levels);
    }

    Ok(layout)
}

/// Configuration values overridden by whichever flags were given.
pub(crate) fn resolve_options(
    config: &Config,
    width: Option<f64>,
    zoom: Option<&str>,
    no_shrink: bool,
    descending: bool,
) -> Result<LayoutOptions, CliError> {
    let mut options = config.layout_options();

    if let Some(width) = width {
        options.plot_width = width;
    }
    if !(options.plot_width > 0.0 && options.plot_width.is_finite()) {
        return Err(CliError::validation(format!(
            "Plot width must be positive, got {}",
            options.plot_width
        )));
    }

    if let Some(zoom) = zoom {
        options.zoom = Some(parse_zoom(zoom)?);
    }
    if no_shrink {
        options.shrink_introns = false;
    }
    if descending {
        options.ascending = false;
    }

    Ok(options)
}

/// Parse a `START-END` zoom window.
pub(crate) fn parse_zoom(zoom: &str) -> Result<(GenomicPos, GenomicPos), CliError> {
    let invalid = || CliError::validation(format!("Invalid zoom window '{}' (expected START-END)", zoom));

    let (start, end) = zoom.trim().split_once('-').ok_or_else(invalid)?;
    let start = start.trim().replace(',', "").parse::<GenomicPos>().map_err(|_| invalid())?;
    let end = end.trim().replace(',', "").parse::<GenomicPos>().map_err(|_| invalid())?;

    Ok((start, end))
}
