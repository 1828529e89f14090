//! RNA modification sites from BED files and their levels from CSV/TSV tables.
//!
//! A BED line marks one site, `chrom start end gene ...`, as a 0-based
//! half-open interval of length 1; the gene id sits in the name column. Level
//! tables carry a header with a `location` column (0-based site), a `gene_id`
//! column and one column per sample.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;

use super::open_maybe_gz;
use super::record::strip_version;
use crate::sites::{ModificationSites, SiteLevels};
use crate::types::GenomicPos;

/// Column counts of BED4 to BED9 and BED12.
const BED_COLUMNS: [usize; 7] = [4, 5, 6, 7, 8, 9, 12];

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("BED line has {0} columns; expected BED4 to BED9 or BED12")]
    InvalidColumnCount(usize),
    #[error("Invalid BED coordinate: {0:?}")]
    InvalidCoordinate(String),
    #[error("BED interval {start}..{end} is not a single nucleotide")]
    NotASite { start: GenomicPos, end: GenomicPos },
    #[error("BED line has an empty gene id")]
    EmptyGene,
    #[error("Level table header has {0} columns; at least 3 are needed")]
    TooFewColumns(usize),
    #[error("Level table has no {0} column")]
    MissingColumn(&'static str),
    #[error("Unknown level table format for {0} (expected .csv, .tsv or .txt)")]
    UnknownLevelFormat(String),
}

/// One BED site, converted to a 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedSite {
    pub gene: String,
    pub position: GenomicPos,
}

impl BedSite {
    pub fn from_record(record: &StringRecord) -> Result<Self, SiteError> {
        if !BED_COLUMNS.contains(&record.len()) {
            return Err(SiteError::InvalidColumnCount(record.len()));
        }

        let start = parse_coordinate(&record[1])?;
        let end = parse_coordinate(&record[2])?;
        if start + 1 != end {
            return Err(SiteError::NotASite { start, end });
        }

        let gene = strip_version(&record[3]);
        if gene.is_empty() {
            return Err(SiteError::EmptyGene);
        }

        Ok(Self {
            gene: gene.to_string(),
            position: end,
        })
    }
}

fn parse_coordinate(field: &str) -> Result<GenomicPos, SiteError> {
    field
        .trim()
        .parse()
        .map_err(|_| SiteError::InvalidCoordinate(field.to_string()))
}

/// Reader for modification site BED files.
pub struct SiteParser;

impl SiteParser {
    /// Collect the sites of `gene`, or of every gene when `None`.
    ///
    /// The first data line fixes the column count. Later lines with another
    /// column count, or that are not single-nucleotide sites, are skipped.
    pub fn parse_reader<R: Read>(reader: R, gene: Option<&str>) -> Result<ModificationSites> {
        let wanted = gene.map(strip_version);
        let mut bed = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut sites = ModificationSites::new(wanted.unwrap_or_default());
        let mut columns = None;
        let mut skipped = 0usize;

        for (index, result) in bed.records().enumerate() {
            let record = result.with_context(|| format!("Error reading BED line {}", index + 1))?;
            let line = record.position().map_or(index as u64 + 1, |pos| pos.line());

            let expected = *columns.get_or_insert(record.len());
            if record.len() != expected {
                log::debug!("Skipping BED line {}: {} columns, expected {}", line, record.len(), expected);
                skipped += 1;
                continue;
            }

            match BedSite::from_record(&record) {
                Ok(site) => {
                    if wanted.map_or(true, |gene| gene == site.gene) {
                        sites.insert(site.position);
                    }
                }
                Err(err @ SiteError::InvalidColumnCount(_)) => {
                    return Err(err).with_context(|| format!("Error parsing BED line {}", line));
                }
                Err(err) => {
                    log::debug!("Skipping BED line {}: {}", line, err);
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            log::warn!("Skipped {} invalid BED lines", skipped);
        }
        if sites.is_empty() {
            log::warn!("No RNA modification sites found for {}", wanted.unwrap_or("any gene"));
        } else {
            log::debug!("Read {} RNA modification sites", sites.len());
        }

        Ok(sites)
    }

    pub fn parse_file<P: AsRef<Path>>(path: P, gene: Option<&str>) -> Result<ModificationSites> {
        let reader = open_maybe_gz(&path)?;
        Self::parse_reader(reader, gene)
            .with_context(|| format!("Failed to parse BED file: {}", path.as_ref().display()))
    }
}

/// Positions of the key columns in a level table header.
struct LevelColumns {
    location: usize,
    gene_id: usize,
}

impl LevelColumns {
    fn from_header(header: &StringRecord) -> Result<Self, SiteError> {
        if header.len() < 3 {
            return Err(SiteError::TooFewColumns(header.len()));
        }
        let find = |name: &'static str| {
            header
                .iter()
                .position(|column| column.eq_ignore_ascii_case(name))
                .ok_or(SiteError::MissingColumn(name))
        };
        Ok(Self {
            location: find("location")?,
            gene_id: find("gene_id")?,
        })
    }

    fn is_key(&self, column: usize) -> bool {
        column == self.location || column == self.gene_id
    }
}

/// Reader for per-sample modification level tables.
pub struct LevelParser;

impl LevelParser {
    /// Levels of `gene` at the given sites. Rows for other genes or sites are
    /// ignored, as are values that are not finite numbers.
    pub fn parse_reader<R: Read>(
        reader: R,
        delimiter: u8,
        gene: &str,
        sites: &ModificationSites,
    ) -> Result<SiteLevels> {
        let wanted = strip_version(gene);
        let mut table = ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let header = table.headers().context("Failed to read level table header")?.clone();
        let columns = LevelColumns::from_header(&header)?;
        let samples = header
            .iter()
            .enumerate()
            .filter(|(i, _)| !columns.is_key(*i))
            .map(|(_, name)| name.to_string())
            .collect();
        let mut levels = SiteLevels::new(wanted, samples);

        for (index, result) in table.records().enumerate() {
            let record = result.with_context(|| format!("Error reading level row {}", index + 1))?;
            if record.len() != header.len() || strip_version(&record[columns.gene_id]) != wanted {
                continue;
            }

            // Locations are 0-based like BED starts.
            let Ok(location) = record[columns.location].parse::<GenomicPos>() else {
                continue;
            };
            let site = location + 1;
            if !sites.contains(site) {
                continue;
            }

            for (i, (sample, field)) in header.iter().zip(record.iter()).enumerate() {
                if columns.is_key(i) {
                    continue;
                }
                match field.parse::<f64>() {
                    Ok(value) if value.is_finite() => levels.record(site, sample, value),
                    _ => log::debug!("Ignoring level {:?} for {} at {}", field, sample, site),
                }
            }
        }

        if levels.is_empty() {
            log::warn!("No modification levels found for the sites of {}", wanted);
        }

        Ok(levels)
    }

    /// Parse a `.csv` (comma) or `.tsv`/`.txt` (tab) level table, optionally gzipped.
    pub fn parse_file<P: AsRef<Path>>(path: P, gene: &str, sites: &ModificationSites) -> Result<SiteLevels> {
        let name = path.as_ref().to_string_lossy();
        let name = name.strip_suffix(".gz").unwrap_or(&name);
        let delimiter = if name.ends_with(".csv") {
            b','
        } else if name.ends_with(".tsv") || name.ends_with(".txt") {
            b'\t'
        } else {
            return Err(SiteError::UnknownLevelFormat(name.to_string()).into());
        };

        let reader = open_maybe_gz(&path)?;
        Self::parse_reader(reader, delimiter, gene, sites)
            .with_context(|| format!("Failed to parse level table: {}", path.as_ref().display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BED: &str = "\
# modification sites
chr1\t119\t120\tENSG01.4\t0\t+
chr1\t149\t150\tENSG01.4\t0\t+
chr1\t119\t120\tENSG01\t0\t+
chr1\t200\t205\tENSG01\t0\t+
chr1\t299\t300\tENSG02\t0\t+
chr1\t399\t400\t.\t0\t+
chr1\t499\t500\tENSG01

chr1\tx\t10\tENSG01\t0\t+
";

    #[test]
    fn test_bed_sites_for_one_gene() {
        let sites = SiteParser::parse_reader(BED.as_bytes(), Some("ENSG01.7")).unwrap();
        assert_eq!(sites.gene(), "ENSG01");
        assert_eq!(sites.positions(), &[120, 150]);
    }

    #[test]
    fn test_bed_sites_for_every_gene() {
        let sites = SiteParser::parse_reader(BED.as_bytes(), None).unwrap();
        assert_eq!(sites.positions(), &[120, 150, 300]);
    }

    #[test]
    fn test_bed_site_validation() {
        let record = StringRecord::from(vec!["chr1", "9", "10", "ENSG01.2"]);
        assert_eq!(
            BedSite::from_record(&record).unwrap(),
            BedSite {
                gene: "ENSG01".to_string(),
                position: 10
            }
        );

        let wide = StringRecord::from(vec!["chr1", "9", "12", "ENSG01"]);
        assert!(matches!(BedSite::from_record(&wide), Err(SiteError::NotASite { start: 9, end: 12 })));

        let unnamed = StringRecord::from(vec!["chr1", "9", "10", ".3"]);
        assert!(matches!(BedSite::from_record(&unnamed), Err(SiteError::EmptyGene)));
    }

    #[test]
    fn test_bed3_is_rejected() {
        let err = SiteParser::parse_reader("chr1\t9\t10\n".as_bytes(), None).unwrap_err();
        assert!(format!("{:#}", err).contains("BED4 to BED9 or BED12"));
    }

    #[test]
    fn test_levels_for_known_sites() {
        let sites = ModificationSites::from_positions("ENSG01", vec![120, 150]);
        let table = "\
location,gene_id,liver,brain
119,ENSG01.4,0.25,0
149,\"ENSG01\",0.75,n/a
119,ENSG01,0.9,0.9
299,ENSG01,1.0,1.0
149,ENSG02,1.0,1.0
149,ENSG01
";
        let levels = LevelParser::parse_reader(table.as_bytes(), b',', "ENSG01", &sites).unwrap();

        assert_eq!(levels.samples(), &["liver".to_string(), "brain".to_string()]);
        assert_eq!(levels.sites().collect::<Vec<_>>(), vec![120, 150]);
        assert_eq!(levels.level(120, "liver"), Some(0.25));
        assert_eq!(levels.level(120, "brain"), Some(0.0));
        assert_eq!(levels.level(150, "liver"), Some(0.75));
        assert_eq!(levels.level(150, "brain"), None);
        assert_eq!(levels.average(), Some(0.5));
    }

    #[test]
    fn test_level_header_needs_key_columns() {
        let sites = ModificationSites::new("ENSG01");
        let err = LevelParser::parse_reader("site\tgene_id\tliver\n".as_bytes(), b'\t', "ENSG01", &sites)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SiteError>(),
            Some(SiteError::MissingColumn("location"))
        ));
    }

    #[test]
    fn test_level_file_extension_picks_delimiter() {
        let sites = ModificationSites::from_positions("ENSG01", vec![10]);
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "Location\tGene_ID\tliver\n9\tENSG01\t0.4").unwrap();

        let levels = LevelParser::parse_file(file.path(), "ENSG01", &sites).unwrap();
        assert_eq!(levels.level(10, "liver"), Some(0.4));

        let other = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let err = LevelParser::parse_file(other.path(), "ENSG01", &sites).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SiteError>(),
            Some(SiteError::UnknownLevelFormat(_))
        ));
    }
}
