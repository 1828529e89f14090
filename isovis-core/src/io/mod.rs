//! Input files for isovis
//!
//! Isoform records and protein annotations arrive as JSON, modification sites
//! as BED and their levels as CSV/TSV tables. Any of them may be gzip-compressed.

pub mod record;
pub mod sites;

pub use record::{IsoformRecord, RecordError, RecordParser};
pub use sites::{LevelParser, SiteError, SiteParser};

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::isoform::Isoform;
use crate::protein::ProteinAnnotations;

/// Parse an isoform record file (`.json` or `.json.gz`).
pub fn parse_record_file<P: AsRef<Path>>(path: P) -> Result<Vec<Isoform>> {
    RecordParser::parse_file(path)
}

/// Parse a protein annotation file: `{"length": N, "features": [...]}`.
pub fn parse_protein_file<P: AsRef<Path>>(path: P) -> Result<ProteinAnnotations> {
    let reader = open_maybe_gz(&path)?;
    let annotations: ProteinAnnotations = serde_json::from_reader(reader)
        .with_context(|| format!("Invalid protein annotations in {}", path.as_ref().display()))?;
    log::debug!(
        "Read {} protein features over {} residues",
        annotations.features.len(),
        annotations.length
    );
    Ok(annotations)
}

fn open_maybe_gz<P: AsRef<Path>>(path: P) -> Result<BufReader<Box<dyn Read>>> {
    let file = File::open(&path).with_context(|| format!("Failed to open {}", path.as_ref().display()))?;
    let reader: Box<dyn Read> = if path.as_ref().to_string_lossy().ends_with(".gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(BufReader::new(reader))
}
