//! RNA modification sites and their per-sample levels.
//!
//! Sites are single nucleotides in 1-based genomic coordinates.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::axis::BaseAxis;
use crate::types::{GenomicPos, Interval};

/// Sorted, duplicate-free modification sites of one gene.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModificationSites {
    gene: String,
    positions: Vec<GenomicPos>,
}

impl ModificationSites {
    pub fn new(gene: impl Into<String>) -> Self {
        Self {
            gene: gene.into(),
            positions: Vec::new(),
        }
    }

    pub fn from_positions(gene: impl Into<String>, mut positions: Vec<GenomicPos>) -> Self {
        positions.sort_unstable();
        positions.dedup();
        Self {
            gene: gene.into(),
            positions,
        }
    }

    /// Add a site, returning `false` if it was already present.
    pub fn insert(&mut self, position: GenomicPos) -> bool {
        match self.positions.binary_search(&position) {
            Ok(_) => false,
            Err(at) => {
                self.positions.insert(at, position);
                true
            }
        }
    }

    pub fn gene(&self) -> &str {
        &self.gene
    }

    pub fn positions(&self) -> &[GenomicPos] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, position: GenomicPos) -> bool {
        self.positions.binary_search(&position).is_ok()
    }

    /// Sites inside the closed window `start..=end`, in either orientation.
    pub fn within(&self, start: GenomicPos, end: GenomicPos) -> Self {
        let window = Interval::new(start, end).normalized();
        Self {
            gene: self.gene.clone(),
            positions: self
                .positions
                .iter()
                .copied()
                .filter(|&position| window.covers(position))
                .collect(),
        }
    }

    /// Screen x of every site, in genomic order.
    pub fn screen_positions(&self, axis: &BaseAxis) -> Vec<f64> {
        self.positions
            .iter()
            .map(|&position| axis.scale(position as f64))
            .collect()
    }
}

/// Modification levels per site and sample.
///
/// The first value seen for a site and sample is kept. The average runs over
/// non-zero values only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SiteLevels {
    gene: String,
    samples: Vec<String>,
    levels: BTreeMap<GenomicPos, BTreeMap<String, f64>>,
    min: Option<f64>,
    max: Option<f64>,
    #[serde(skip)]
    nonzero_sum: f64,
    #[serde(skip)]
    nonzero_count: usize,
}

impl SiteLevels {
    pub fn new(gene: impl Into<String>, samples: Vec<String>) -> Self {
        Self {
            gene: gene.into(),
            samples,
            ..Self::default()
        }
    }

    pub fn record(&mut self, site: GenomicPos, sample: &str, value: f64) {
        let per_sample = self.levels.entry(site).or_default();
        if per_sample.contains_key(sample) {
            return;
        }
        per_sample.insert(sample.to_string(), value);

        if value != 0.0 {
            self.nonzero_sum += value;
            self.nonzero_count += 1;
        }
        self.min = Some(self.min.map_or(value, |min| min.min(value)));
        self.max = Some(self.max.map_or(value, |max| max.max(value)));
    }

    pub fn gene(&self) -> &str {
        &self.gene
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn sites(&self) -> impl Iterator<Item = GenomicPos> + '_ {
        self.levels.keys().copied()
    }

    pub fn level(&self, site: GenomicPos, sample: &str) -> Option<f64> {
        self.levels.get(&site)?.get(sample).copied()
    }

    pub fn site_levels(&self, site: GenomicPos) -> Option<&BTreeMap<String, f64>> {
        self.levels.get(&site)
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// Mean of the non-zero levels; `None` before any level is recorded.
    pub fn average(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(self.nonzero_sum / self.nonzero_count.max(1) as f64)
    }
}
