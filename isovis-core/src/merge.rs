//! Metagene construction: the union of exon intervals across an isoform set.

use crate::isoform::Isoform;
use crate::types::{Interval, IntervalSet};

/// Merge the exons of every isoform into a sorted, disjoint metagene.
///
/// Only strictly overlapping exons are unioned; exons that merely touch stay
/// separate. An empty isoform list (or isoforms without exons) yields an empty
/// metagene, which callers treat as insufficient data.
pub fn merge_ranges(isoforms: &[Isoform]) -> Vec<Interval> {
    let exons: Vec<Interval> = isoforms
        .iter()
        .flat_map(|isoform| isoform.exon_ranges().iter().copied())
        .collect();

    let merged = merge_intervals(&exons);
    log::debug!(
        "Merged {} exons from {} isoforms into {} metagene ranges",
        exons.len(),
        isoforms.len(),
        merged.len()
    );
    merged
}

/// Merge an arbitrary interval list with the same rules as [`merge_ranges`].
pub fn merge_intervals(intervals: &[Interval]) -> Vec<Interval> {
    let distinct: IntervalSet = intervals.iter().copied().collect();

    let mut accumulated: Vec<Interval> = Vec::with_capacity(distinct.len());
    for &interval in &distinct {
        let mut current = interval;
        let mut i = 0;
        // A union can grow into entries already scanned, so rescan from the top.
        while i < accumulated.len() {
            match accumulated[i].union(&current) {
                Some(joined) => {
                    accumulated.remove(i);
                    current = joined;
                    i = 0;
                }
                None => i += 1,
            }
        }
        accumulated.push(current);
    }

    let mut merged: Vec<Interval> = accumulated
        .into_iter()
        .collect::<IntervalSet>()
        .into_vec();
    merged.sort_by_key(|interval| interval.start);
    merged
}
