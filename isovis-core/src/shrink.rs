//! Intron shrinkage: a piecewise-linear axis that compresses intronic space.
//!
//! Each shown exon keeps a width proportional to its length relative to the
//! average shown exon, every intron gets the same small width, and the whole
//! layout fills the requested target width.

use serde::{Deserialize, Serialize};

use crate::scale::LinearScale;
use crate::types::{GenomicPos, Interval};

/// Share of the non-exonic width handed to each intron.
pub const INTRON_SHARE: f64 = 0.25;

/// Control points of a shrunk axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShrunkAxis {
    /// Genomic control points in ascending order.
    pub domain: Vec<f64>,
    /// Axis positions matching `domain`.
    pub range: Vec<f64>,
    /// Total axis width after shrinking.
    pub width: f64,
    /// Width given to every intron gap.
    pub intron_width: f64,
    /// Number of intron gaps, including unshown space at either window edge.
    pub intron_count: usize,
    /// Metagene intervals clipped to the zoom window.
    pub shown: Vec<Interval>,
}

impl ShrunkAxis {
    pub fn scale(&self) -> LinearScale {
        // The builder always emits two points per shown interval.
        LinearScale::new(self.domain.clone(), self.range.clone())
            .unwrap_or_else(|_| LinearScale::identity([0.0, self.width]))
    }
}

/// Clip metagene intervals to the zoom window, dropping what falls outside.
pub fn shown_ranges(metagene: &[Interval], zoom_start: GenomicPos, zoom_end: GenomicPos) -> Vec<Interval> {
    let mut ranges: Vec<Interval> = metagene.iter().map(|range| range.normalized()).collect();
    ranges.sort_by_key(|range| range.start);

    let window = Interval::new(zoom_start, zoom_end).normalized();
    let mut shown = Vec::with_capacity(ranges.len());

    for range in ranges {
        let start_shown = window.covers(range.start);
        let end_shown = window.covers(range.end);

        let clipped = match (start_shown, end_shown) {
            (true, true) => range,
            (false, true) => Interval::new(window.start, range.end),
            (true, false) => Interval::new(range.start, window.end),
            (false, false) => {
                if range.covers(window.start) && range.covers(window.end) {
                    window
                } else {
                    continue;
                }
            }
        };

        if !clipped.is_empty() {
            shown.push(clipped);
        }
    }

    shown
}

/// Build the shrunk axis for a metagene seen through a zoom window.
///
/// Returns `None` when no metagene interval is visible; callers keep their raw
/// axis in that case.
pub fn build_shrunk_axis(
    metagene: &[Interval],
    zoom_start: GenomicPos,
    zoom_end: GenomicPos,
    target_width: f64,
) -> Option<ShrunkAxis> {
    let shown = shown_ranges(metagene, zoom_start, zoom_end);
    let (first, last) = (*shown.first()?, *shown.last()?);
    let window = Interval::new(zoom_start, zoom_end).normalized();

    let shown_count = shown.len();
    let has_leading = first.start > window.start;
    let has_trailing = last.end < window.end;
    let intron_count = shown_count - 1 + usize::from(has_leading) + usize::from(has_trailing);

    let total_exon_length: f64 = shown.iter().map(|range| range.length() as f64).sum();
    // Clamped at 0 when the exons alone exceed the target, so control points
    // never run backwards; the exons then share the whole target width.
    let intron_width = if intron_count > 0 {
        ((target_width - total_exon_length) / intron_count as f64 * INTRON_SHARE).max(0.0)
    } else {
        0.0
    };
    let avg_exon_width = (target_width - intron_count as f64 * intron_width) / shown_count as f64;
    let exon_width = LinearScale::linear(
        [0.0, total_exon_length / shown_count as f64],
        [0.0, avg_exon_width],
    );

    let mut domain = Vec::with_capacity(2 * shown_count + 2);
    let mut range = Vec::with_capacity(2 * shown_count + 2);
    let mut cursor = 0.0;

    if has_leading {
        domain.push(window.start as f64);
        range.push(cursor);
        cursor += intron_width;
    }

    for interval in &shown {
        domain.push(interval.start as f64);
        domain.push(interval.end as f64);
        range.push(cursor);
        cursor += exon_width.apply(interval.length() as f64);
        range.push(cursor);
        cursor += intron_width;
    }

    if has_trailing {
        domain.push(window.end as f64);
        range.push(cursor);
    } else {
        cursor -= intron_width;
    }

    log::debug!(
        "Shrunk {} exonic ranges and {} introns (intron width {:.2}) into width {:.2}",
        shown_count,
        intron_count,
        intron_width,
        cursor
    );

    Some(ShrunkAxis {
        domain,
        range,
        width: cursor,
        intron_width,
        intron_count,
        shown,
    })
}
