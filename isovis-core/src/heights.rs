//! Relative arc heights for splice regions.
//!
//! A region nested inside many others is drawn low, a region enclosing many
//! others is drawn high: `(under + 1) / (over + under + 1)`, where `under`
//! counts the other regions it contains and `over` the other regions containing
//! it.

use crate::splice::SpliceRegion;

/// Height reported for regions that are not drawn as arcs.
pub const NOT_DRAWN: f64 = -1.0;

/// Heights for alternative regions only; constitutive regions get [`NOT_DRAWN`].
pub fn relative_heights(regions: &[SpliceRegion]) -> Vec<f64> {
    let alternative: Vec<&SpliceRegion> = regions.iter().filter(|r| !r.is_constitutive).collect();

    regions
        .iter()
        .map(|region| {
            if region.is_constitutive {
                NOT_DRAWN
            } else {
                nesting_height(region, alternative.iter().copied())
            }
        })
        .collect()
}

/// Heights for every region, constitutive ones included.
pub fn relative_heights_all(regions: &[SpliceRegion]) -> Vec<f64> {
    regions
        .iter()
        .map(|region| nesting_height(region, regions.iter()))
        .collect()
}

fn nesting_height<'a>(region: &SpliceRegion, others: impl Iterator<Item = &'a SpliceRegion>) -> f64 {
    // Both start at -1: the region always contains and is contained by itself.
    let mut num_under: i64 = -1;
    let mut num_over: i64 = -1;

    for other in others {
        if region.contains(other) {
            num_under += 1;
        }
        if other.contains(region) {
            num_over += 1;
        }
    }

    (num_under + 1) as f64 / (num_over + num_under + 1) as f64
}
