//! Splice junction classification.
//!
//! Every gap between consecutive exons of any isoform is a splice region. A
//! region is constitutive when it is used by every isoform, or when none of the
//! alternative-splicing patterns below can explain its absence from the
//! isoforms that lack it:
//!
//! 1. present in all isoforms: constitutive, no further checks
//! 2. 5' splice site falls inside an exon of some isoform (alternative 5' site)
//! 3. an internal exon starts inside the region (skipped exon)
//! 4. another region shares the 5' site but not the 3' site (alternative 3' site)
//! 5. region only comes from first exons, and that first exon overlaps a
//!    different first exon with another splice end (alternative first exon)
//! 6. some isoform spans the region without using it

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::isoform::Isoform;
use crate::types::{GenomicPos, Interval, IntervalSet};

/// An intron gap and whether it is constitutive across the isoform set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpliceRegion {
    pub start: GenomicPos,
    pub end: GenomicPos,
    pub is_constitutive: bool,
}

impl SpliceRegion {
    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }

    /// `other` lies within this region (shared endpoints included).
    pub fn contains(&self, other: &SpliceRegion) -> bool {
        self.start <= other.start && self.end >= other.end
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpliceClassification {
    /// One entry per distinct region, in the order regions were first seen.
    pub regions: Vec<SpliceRegion>,
    pub has_constitutive: bool,
}

impl SpliceClassification {
    pub fn constitutive(&self) -> impl Iterator<Item = &SpliceRegion> {
        self.regions.iter().filter(|region| region.is_constitutive)
    }

    pub fn alternative(&self) -> impl Iterator<Item = &SpliceRegion> {
        self.regions.iter().filter(|region| !region.is_constitutive)
    }
}

/// Bookkeeping gathered in one pass over every isoform.
struct RegionCatalog {
    regions: IntervalSet,
    counts: HashMap<Interval, usize>,
    from_first_exon: IntervalSet,
    from_other_exon: IntervalSet,
    first_exon_boundaries: IntervalSet,
}

impl RegionCatalog {
    fn build(isoforms: &[Isoform], forward: bool) -> Self {
        let mut catalog = RegionCatalog {
            regions: IntervalSet::new(),
            counts: HashMap::new(),
            from_first_exon: IntervalSet::new(),
            from_other_exon: IntervalSet::new(),
            first_exon_boundaries: IntervalSet::new(),
        };

        for isoform in isoforms {
            let n = isoform.exon_count();
            if n < 2 {
                continue;
            }

            for (i, region) in isoform.junctions().enumerate() {
                catalog.regions.insert(region);
                *catalog.counts.entry(region).or_insert(0) += 1;

                let from_first = if forward { i == 0 } else { i == n - 2 };
                if from_first {
                    catalog.from_first_exon.insert(region);
                } else {
                    catalog.from_other_exon.insert(region);
                }
            }

            if let Some(boundary) = isoform.first_exon() {
                catalog.first_exon_boundaries.insert(boundary);
            }
        }

        catalog
    }
}

/// Classify every splice region of an isoform set as constitutive or alternative.
///
/// The strand of the first isoform decides which end of a region is its 5'
/// splice site. An empty set, or a set of single-exon isoforms, produces no
/// regions.
pub fn classify_splice_regions(isoforms: &[Isoform]) -> SpliceClassification {
    let Some(first) = isoforms.first() else {
        return SpliceClassification::default();
    };
    let forward = first.strand().is_forward();
    let catalog = RegionCatalog::build(isoforms, forward);

    let mut alternative = IntervalSet::new();
    let mut constitutive = IntervalSet::new();

    for region in &catalog.regions {
        if alternative.contains(region) || constitutive.contains(region) {
            continue;
        }

        if catalog.counts.get(region).copied().unwrap_or(0) == isoforms.len() {
            constitutive.insert(*region);
            continue;
        }

        if splice_site_varies(region, isoforms, forward) {
            alternative.insert(*region);
            continue;
        }

        let competing = competing_acceptors(region, &catalog.regions, forward);
        if !competing.is_empty() {
            for other in competing {
                alternative.insert(other);
            }
            alternative.insert(*region);
            continue;
        }

        let first_exon_only =
            catalog.from_first_exon.contains(region) && !catalog.from_other_exon.contains(region);
        let is_constitutive = if first_exon_only {
            !first_exon_is_ambiguous(region, &catalog.first_exon_boundaries, forward)
        } else {
            spanning_isoforms_use(region, isoforms)
        };

        if is_constitutive {
            constitutive.insert(*region);
        } else {
            alternative.insert(*region);
        }
    }

    let regions: Vec<SpliceRegion> = catalog
        .regions
        .iter()
        .map(|region| SpliceRegion {
            start: region.start,
            end: region.end,
            is_constitutive: !alternative.contains(region),
        })
        .collect();
    let has_constitutive = regions.iter().any(|region| region.is_constitutive);

    log::debug!(
        "Classified {} splice regions across {} isoforms ({} alternative)",
        regions.len(),
        isoforms.len(),
        alternative.len()
    );

    SpliceClassification {
        regions,
        has_constitutive,
    }
}

/// Checks 2 and 3: the 5' site sits inside an exon, or an internal exon starts
/// inside the region.
fn splice_site_varies(region: &Interval, isoforms: &[Isoform], forward: bool) -> bool {
    let five_prime = if forward { region.start } else { region.end };

    for isoform in isoforms {
        let exons = isoform.exon_ranges();
        let last = exons.len().saturating_sub(1);

        for (i, exon) in exons.iter().enumerate() {
            if exon.strictly_contains(five_prime) {
                return true;
            }

            let (exon_start, internal) = if forward {
                (exon.start, i != 0)
            } else {
                (exon.end, i != last)
            };
            if internal && region.strictly_contains(exon_start) {
                return true;
            }
        }
    }

    false
}

/// Check 4: other regions with the same 5' site but a different 3' site.
fn competing_acceptors(region: &Interval, regions: &IntervalSet, forward: bool) -> Vec<Interval> {
    regions
        .iter()
        .filter(|other| *other != region)
        .filter(|other| {
            if forward {
                other.start == region.start && other.end != region.end
            } else {
                other.end == region.end && other.start != region.start
            }
        })
        .copied()
        .collect()
}

/// Check 5: a first exon that could have produced this region overlaps a
/// different first exon that splices at another position.
fn first_exon_is_ambiguous(region: &Interval, boundaries: &IntervalSet, forward: bool) -> bool {
    let candidates = boundaries.iter().filter(|boundary| {
        if forward {
            boundary.end == region.start
        } else {
            boundary.start == region.end
        }
    });

    for candidate in candidates {
        for other in boundaries {
            if other == candidate {
                continue;
            }

            let same_splice_end = if forward {
                candidate.end == other.end
            } else {
                candidate.start == other.start
            };
            if same_splice_end {
                continue;
            }

            if candidate.intersection(other).is_some() {
                return true;
            }
        }
    }

    false
}

/// Check 6: every isoform spanning the whole region must contain it as a junction.
fn spanning_isoforms_use(region: &Interval, isoforms: &[Isoform]) -> bool {
    isoforms.iter().all(|isoform| {
        let spans_region = isoform
            .span()
            .and_then(|span| span.intersection(region))
            .is_some_and(|overlap| overlap == *region);

        !spans_region || isoform.junctions().any(|junction| junction == *region)
    })
}
