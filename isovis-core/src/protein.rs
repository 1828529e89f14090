//! Protein annotations and their projection onto the genome.
//!
//! A residue maps to three coding nucleotides, the coding sequence maps onto
//! the coding exons in translation order, and the genome maps onto the screen
//! through a [`BaseAxis`].

use serde::{Deserialize, Serialize};

use crate::axis::BaseAxis;
use crate::isoform::Isoform;
use crate::scale::LinearScale;
use crate::types::{GenomicPos, Interval, Strand};

/// Coding-sequence span `[first, last]` of a 1-based residue.
pub fn protein_to_cds(residue: GenomicPos) -> [GenomicPos; 2] {
    [3 * (residue - 1), 3 * residue - 1]
}

/// Coding-sequence to genome control points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CdsMap {
    domain: Vec<f64>,
    range: Vec<f64>,
    strand: Option<Strand>,
}

impl CdsMap {
    /// Walk coding exons 5' to 3', giving each exon the CDS span
    /// `(cum, cum + len)` before advancing past it.
    pub fn from_coding_exons(exons: &[Interval], strand: Strand) -> Self {
        let mut exons: Vec<Interval> = exons.iter().map(Interval::normalized).collect();
        exons.sort_by_key(|exon| (exon.start, exon.end));
        if !strand.is_forward() {
            exons.reverse();
        }

        let mut domain = Vec::with_capacity(exons.len() * 2);
        let mut range = Vec::with_capacity(exons.len() * 2);
        let mut cds_position: GenomicPos = 0;

        for exon in exons {
            let (first, last) = if strand.is_forward() {
                (exon.start, exon.end)
            } else {
                (exon.end, exon.start)
            };
            let exon_length = exon.length();
            domain.push(cds_position as f64);
            cds_position += exon_length;
            domain.push(cds_position as f64);
            cds_position += 1;
            range.push(first as f64);
            range.push(last as f64);
        }

        Self {
            domain,
            range,
            strand: Some(strand),
        }
    }

    pub fn from_isoform(isoform: &Isoform) -> Self {
        Self::from_coding_exons(isoform.coding_exons(), isoform.strand())
    }

    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }

    pub fn strand(&self) -> Option<Strand> {
        self.strand
    }

    /// CDS control points.
    pub fn domain(&self) -> &[f64] {
        &self.domain
    }

    /// Genome control points matching [`CdsMap::domain`].
    pub fn range(&self) -> &[f64] {
        &self.range
    }

    /// Genome coordinate of a CDS position; `None` without coding exons.
    pub fn to_genome(&self, cds_position: f64) -> Option<f64> {
        let scale = LinearScale::new(self.domain.clone(), self.range.clone()).ok()?;
        Some(scale.apply(cds_position))
    }

    /// Genome coordinates of the first and last nucleotide of a residue.
    pub fn protein_to_genome(&self, residue: GenomicPos) -> Option<(f64, f64)> {
        let [first, last] = protein_to_cds(residue);
        Some((self.to_genome(first as f64)?, self.to_genome(last as f64)?))
    }
}

/// Screen pixels of the first and last nucleotide of a residue.
pub fn protein_to_screen(axis: &BaseAxis, cds_map: &CdsMap, residue: GenomicPos) -> Option<(f64, f64)> {
    let (first, last) = cds_map.protein_to_genome(residue)?;
    Some((axis.scale(first), axis.scale(last)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Domain,
    Motif,
}

impl FeatureKind {
    /// Domains are drawn with rounded ends, motifs with square ones.
    pub fn default_style(&self) -> FeatureStyle {
        match self {
            FeatureKind::Domain => FeatureStyle::Curved,
            FeatureKind::Motif => FeatureStyle::Straight,
        }
    }
}

/// How a feature's end is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureStyle {
    Straight,
    Curved,
}

/// A domain or motif over residues `start..=end`.
///
/// Styles left out of a JSON record fall back to the kind's default style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FeatureRecord")]
pub struct ProteinFeature {
    pub kind: FeatureKind,
    pub start: GenomicPos,
    pub end: GenomicPos,
    pub start_style: FeatureStyle,
    pub end_style: FeatureStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// Coordinates as reported by the annotation source. Swapped, not
    /// mirrored, when the feature is reversed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_range: Option<[GenomicPos; 2]>,
}

#[derive(Deserialize)]
struct FeatureRecord {
    kind: FeatureKind,
    start: GenomicPos,
    end: GenomicPos,
    #[serde(default)]
    start_style: Option<FeatureStyle>,
    #[serde(default)]
    end_style: Option<FeatureStyle>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    database: Option<String>,
    #[serde(default)]
    source_range: Option<[GenomicPos; 2]>,
}

impl From<FeatureRecord> for ProteinFeature {
    fn from(record: FeatureRecord) -> Self {
        let style = record.kind.default_style();
        Self {
            kind: record.kind,
            start: record.start,
            end: record.end,
            start_style: record.start_style.unwrap_or(style),
            end_style: record.end_style.unwrap_or(style),
            label: record.label,
            database: record.database,
            source_range: record.source_range,
        }
    }
}

impl ProteinFeature {
    pub fn new(kind: FeatureKind, start: GenomicPos, end: GenomicPos) -> Self {
        let style = kind.default_style();
        Self {
            kind,
            start,
            end,
            start_style: style,
            end_style: style,
            label: None,
            database: None,
            source_range: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn source_range(&self) -> [GenomicPos; 2] {
        self.source_range.unwrap_or([self.start, self.end])
    }

    /// The same feature read from the other end of a protein of `length`.
    pub fn mirrored(&self, length: GenomicPos) -> Self {
        let [source_start, source_end] = self.source_range();
        Self {
            start: length - self.end,
            end: length - self.start,
            start_style: self.end_style,
            end_style: self.start_style,
            source_range: Some([source_end, source_start]),
            ..self.clone()
        }
    }
}

/// A feature placed on the genome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappedFeature {
    /// Position in [`ProteinAnnotations::features`].
    pub index: usize,
    pub kind: FeatureKind,
    pub genome_start: f64,
    pub genome_end: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProteinAnnotations {
    /// Protein length in residues.
    pub length: GenomicPos,
    #[serde(default)]
    pub features: Vec<ProteinFeature>,
}

impl ProteinAnnotations {
    pub fn new(length: GenomicPos, features: Vec<ProteinFeature>) -> Self {
        Self { length, features }
    }

    pub fn domains(&self) -> impl Iterator<Item = &ProteinFeature> {
        self.features.iter().filter(|f| f.kind == FeatureKind::Domain)
    }

    pub fn motifs(&self) -> impl Iterator<Item = &ProteinFeature> {
        self.features.iter().filter(|f| f.kind == FeatureKind::Motif)
    }

    /// Every feature mirrored end-for-end, for drawing against a reversed axis.
    pub fn reversed(&self) -> Self {
        Self {
            length: self.length,
            features: self.features.iter().map(|f| f.mirrored(self.length)).collect(),
        }
    }

    /// Genome coordinates of each feature's first and last residue.
    ///
    /// Empty when the map has no coding exons.
    pub fn genome_map(&self, cds_map: &CdsMap) -> Vec<MappedFeature> {
        if cds_map.is_empty() {
            log::warn!("No coding exons, {} protein features left unmapped", self.features.len());
            return Vec::new();
        }

        self.features
            .iter()
            .enumerate()
            .filter_map(|(index, feature)| {
                let [cds_start, _] = protein_to_cds(feature.start);
                let [_, cds_end] = protein_to_cds(feature.end);
                Some(MappedFeature {
                    index,
                    kind: feature.kind,
                    genome_start: cds_map.to_genome(cds_start as f64)?,
                    genome_end: cds_map.to_genome(cds_end as f64)?,
                })
            })
            .collect()
    }
}
