//! Normalized isoform records in JSON.
//!
//! Annotation ingestion upstream reduces GTF/GFF/BED input to one record per
//! transcript:
//!
//! ```json
//! {"id": "ENST00000335137.4", "strand": "+", "chromosome": "chr1",
//!  "exon_ranges": [[65419, 65433], [65520, 65573]], "coding_range": [65565, 65573]}
//! ```
//!
//! A file holds either a bare array of records or `{"isoforms": [...]}`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::isoform::Isoform;
use crate::types::{GenomicPos, Interval, Strand};

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Isoform record has an empty id")]
    EmptyId,
    #[error("Invalid strand for {id}: {strand:?} (expected \"+\" or \"-\")")]
    InvalidStrand { id: String, strand: String },
    #[error("Isoform {0} has no exons")]
    NoExons(String),
    #[error("Invalid exon in {id}: start {start} is after end {end}")]
    InvalidExon { id: String, start: GenomicPos, end: GenomicPos },
    #[error("Invalid coding range in {id}: start {start} is after end {end}")]
    InvalidCodingRange { id: String, start: GenomicPos, end: GenomicPos },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One transcript as it arrives from annotation ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsoformRecord {
    pub id: String,
    pub strand: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chromosome: Option<String>,
    pub exon_ranges: Vec<[GenomicPos; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coding_range: Option<[GenomicPos; 2]>,
    /// Explicit coding exons; take precedence over `coding_range`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coding_exons: Option<Vec<[GenomicPos; 2]>>,
}

/// Drop a version suffix: `ENST0001.3` becomes `ENST0001`.
pub fn strip_version(id: &str) -> &str {
    id.split('.').next().unwrap_or(id).trim()
}

impl IsoformRecord {
    pub fn into_isoform(self) -> Result<Isoform, RecordError> {
        let id = strip_version(&self.id).to_string();
        if id.is_empty() {
            return Err(RecordError::EmptyId);
        }

        let strand = Strand::from_symbol(&self.strand).ok_or_else(|| RecordError::InvalidStrand {
            id: id.clone(),
            strand: self.strand.clone(),
        })?;

        if self.exon_ranges.is_empty() {
            return Err(RecordError::NoExons(id));
        }
        let exons = Self::checked_intervals(&id, &self.exon_ranges)?;

        let mut isoform = Isoform::new(id.clone(), strand, exons);
        if let Some(chromosome) = self.chromosome {
            isoform = isoform.with_chromosome(chromosome);
        }

        if let Some(coding_exons) = &self.coding_exons {
            isoform = isoform.with_coding_exons(Self::checked_intervals(&id, coding_exons)?);
        } else if let Some([start, end]) = self.coding_range {
            if start > end {
                return Err(RecordError::InvalidCodingRange { id, start, end });
            }
            isoform = isoform.with_coding_range(Interval::new(start, end));
        }

        Ok(isoform)
    }

    fn checked_intervals(id: &str, ranges: &[[GenomicPos; 2]]) -> Result<Vec<Interval>, RecordError> {
        ranges
            .iter()
            .map(|&[start, end]| {
                if start > end {
                    Err(RecordError::InvalidExon {
                        id: id.to_string(),
                        start,
                        end,
                    })
                } else {
                    Ok(Interval::new(start, end))
                }
            })
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordDocument {
    List(Vec<IsoformRecord>),
    Wrapped { isoforms: Vec<IsoformRecord> },
}

impl RecordDocument {
    fn into_records(self) -> Vec<IsoformRecord> {
        match self {
            RecordDocument::List(records) | RecordDocument::Wrapped { isoforms: records } => records,
        }
    }
}

/// Reader for normalized isoform record files.
pub struct RecordParser;

impl RecordParser {
    /// Parse and validate a JSON document of records.
    pub fn parse_str(json: &str) -> Result<Vec<Isoform>, RecordError> {
        let document: RecordDocument = serde_json::from_str(json)?;
        document
            .into_records()
            .into_iter()
            .map(IsoformRecord::into_isoform)
            .collect()
    }

    /// Parse records from any reader, naming the failing record on error.
    pub fn parse_reader<R: Read>(reader: R) -> Result<Vec<Isoform>> {
        let document: RecordDocument =
            serde_json::from_reader(reader).context("Isoform records are not valid JSON")?;

        let mut isoforms = Vec::new();
        for (index, record) in document.into_records().into_iter().enumerate() {
            match record.into_isoform() {
                Ok(isoform) => isoforms.push(isoform),
                Err(e) => return Err(anyhow!("Error parsing record {}: {}", index + 1, e)),
            }
        }

        log::debug!("Parsed {} isoform records", isoforms.len());
        Ok(isoforms)
    }

    /// Parse a record file, decompressing `.gz` input.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<Isoform>> {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open {}", path.as_ref().display()))?;
        let path_str = path.as_ref().to_string_lossy();

        if path_str.ends_with(".gz") {
            Self::parse_reader(BufReader::new(GzDecoder::new(file)))
        } else {
            Self::parse_reader(BufReader::new(file))
        }
    }
}
