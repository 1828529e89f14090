//! Isoform records and the display-ordered isoform set.

use serde::Serialize;
use thiserror::Error;

use crate::types::{GenomicPos, Interval, Strand};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IsoformError {
    #[error("Display order refers to isoform {index} but only {count} isoforms are loaded")]
    IndexOutOfBounds { index: usize, count: usize },
    #[error("Display order lists isoform {0} more than once")]
    DuplicateIndex(usize),
}

/// One transcript: its exons, strand and optional coding exons.
///
/// Exons are kept sorted by genomic start. The value is immutable once built;
/// derived views (display order, coding exons) never rewrite the exon list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Isoform {
    id: String,
    strand: Strand,
    chromosome: Option<String>,
    exon_ranges: Vec<Interval>,
    coding_exons: Vec<Interval>,
}

impl Isoform {
    pub fn new(id: impl Into<String>, strand: Strand, mut exon_ranges: Vec<Interval>) -> Self {
        exon_ranges.sort_by_key(|exon| (exon.start, exon.end));
        Self {
            id: id.into(),
            strand,
            chromosome: None,
            exon_ranges,
            coding_exons: Vec::new(),
        }
    }

    pub fn with_chromosome(mut self, chromosome: impl Into<String>) -> Self {
        self.chromosome = Some(chromosome.into());
        self
    }

    /// Attach coding exons directly. They are stored in ascending genomic order.
    pub fn with_coding_exons(mut self, mut coding_exons: Vec<Interval>) -> Self {
        coding_exons.sort_by_key(|exon| (exon.start, exon.end));
        self.coding_exons = coding_exons;
        self
    }

    /// Derive coding exons by intersecting a coding range with every exon.
    pub fn with_coding_range(mut self, coding_range: Interval) -> Self {
        let coding_range = coding_range.normalized();
        self.coding_exons = self
            .exon_ranges
            .iter()
            .filter_map(|exon| coding_range.intersection(exon))
            .collect();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn chromosome(&self) -> Option<&str> {
        self.chromosome.as_deref()
    }

    pub fn exon_ranges(&self) -> &[Interval] {
        &self.exon_ranges
    }

    pub fn exon_count(&self) -> usize {
        self.exon_ranges.len()
    }

    /// Coding exons in ascending genomic order.
    pub fn coding_exons(&self) -> &[Interval] {
        &self.coding_exons
    }

    /// Coding exons in translation order (descending on the reverse strand).
    pub fn coding_exons_in_translation_order(&self) -> Vec<Interval> {
        let mut exons = self.coding_exons.clone();
        if !self.strand.is_forward() {
            exons.reverse();
        }
        exons
    }

    /// 5' end of the transcript.
    pub fn start(&self) -> Option<GenomicPos> {
        let first = self.exon_ranges.first()?;
        let last = self.exon_ranges.last()?;
        Some(if self.strand.is_forward() { first.start } else { last.end })
    }

    /// 3' end of the transcript.
    pub fn end(&self) -> Option<GenomicPos> {
        let first = self.exon_ranges.first()?;
        let last = self.exon_ranges.last()?;
        Some(if self.strand.is_forward() { last.end } else { first.start })
    }

    /// Genomic extent in ascending order.
    pub fn span(&self) -> Option<Interval> {
        Some(Interval::new(self.start()?, self.end()?).normalized())
    }

    pub fn length(&self) -> GenomicPos {
        self.span().map(|span| span.length()).unwrap_or(0)
    }

    /// Gaps between consecutive exons, in genomic order.
    pub fn junctions(&self) -> impl Iterator<Item = Interval> + '_ {
        self.exon_ranges
            .windows(2)
            .map(|pair| Interval::new(pair[0].end, pair[1].start))
    }

    /// The outermost exon at the 5' end (needs at least two exons to be a splice donor).
    pub fn first_exon(&self) -> Option<Interval> {
        if self.strand.is_forward() {
            self.exon_ranges.first().copied()
        } else {
            self.exon_ranges.last().copied()
        }
    }

    /// Transcripts with a stable Ensembl accession.
    pub fn is_known(&self) -> bool {
        is_known_transcript(&self.id)
    }
}

pub fn is_known_transcript(id: &str) -> bool {
    id.starts_with("ENS")
}

/// Order transcript ids so known accessions come first, keeping relative order otherwise.
pub fn prioritise_known_transcripts<S: AsRef<str>>(ids: &[S]) -> Vec<usize> {
    let known = (0..ids.len()).filter(|&i| is_known_transcript(ids[i].as_ref()));
    let novel = (0..ids.len()).filter(|&i| !is_known_transcript(ids[i].as_ref()));
    known.chain(novel).collect()
}

/// Canonical isoform storage plus a display order over it.
///
/// The display order is a list of indices into the canonical vector, so
/// reordering or hiding isoforms never copies or mutates interval data.
#[derive(Debug, Clone, Default)]
pub struct IsoformSet {
    isoforms: Vec<Isoform>,
    order: Vec<usize>,
}

impl IsoformSet {
    pub fn new(isoforms: Vec<Isoform>) -> Self {
        let ids: Vec<&str> = isoforms.iter().map(|isoform| isoform.id()).collect();
        let order = prioritise_known_transcripts(&ids);
        Self { isoforms, order }
    }

    /// Every loaded isoform in load order.
    pub fn all(&self) -> &[Isoform] {
        &self.isoforms
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Isoforms in display order.
    pub fn visible(&self) -> Vec<&Isoform> {
        self.order.iter().map(|&i| &self.isoforms[i]).collect()
    }

    /// Owned copies of the visible isoforms, for algorithms taking a slice.
    pub fn visible_cloned(&self) -> Vec<Isoform> {
        self.order.iter().map(|&i| self.isoforms[i].clone()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Isoform> {
        self.isoforms.iter().find(|isoform| isoform.id() == id)
    }

    /// Swap the isoform at display position `pos` with the one above it.
    pub fn move_up(&mut self, pos: usize) -> bool {
        if pos == 0 || pos >= self.order.len() {
            return false;
        }
        self.order.swap(pos - 1, pos);
        true
    }

    /// Swap the isoform at display position `pos` with the one below it.
    pub fn move_down(&mut self, pos: usize) -> bool {
        if pos + 1 >= self.order.len() {
            return false;
        }
        self.order.swap(pos, pos + 1);
        true
    }

    /// Remove the isoform at display position `pos` from view.
    pub fn hide(&mut self, pos: usize) -> Option<&Isoform> {
        if pos >= self.order.len() {
            return None;
        }
        let index = self.order.remove(pos);
        Some(&self.isoforms[index])
    }

    /// Replace the display order. Indices must be unique and in bounds.
    pub fn set_order(&mut self, order: Vec<usize>) -> Result<(), IsoformError> {
        let mut seen = vec![false; self.isoforms.len()];
        for &index in &order {
            if index >= self.isoforms.len() {
                return Err(IsoformError::IndexOutOfBounds {
                    index,
                    count: self.isoforms.len(),
                });
            }
            if seen[index] {
                return Err(IsoformError::DuplicateIndex(index));
            }
            seen[index] = true;
        }
        self.order = order;
        Ok(())
    }

    /// Restore the default order with every isoform visible.
    pub fn reset(&mut self) {
        let ids: Vec<&str> = self.isoforms.iter().map(|isoform| isoform.id()).collect();
        self.order = prioritise_known_transcripts(&ids);
    }
}
