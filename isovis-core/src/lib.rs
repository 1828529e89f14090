//! isovis Core Library
//!
//! Metagene merging, splice junction classification, intron shrinkage and the
//! genome/protein to screen coordinate chain for gene isoform plots, with
//! protein features and RNA modification sites projected onto the gene.

pub mod types;
pub mod isoform;
pub mod merge;
pub mod splice;
pub mod heights;
pub mod scale;
pub mod shrink;
pub mod axis;
pub mod protein;
pub mod sites;
pub mod layout;
pub mod io;

// Re-export commonly used types and functions
pub use types::{GenomicPos, Interval, IntervalSet, Strand};
pub use isoform::{Isoform, IsoformError, IsoformSet};
pub use merge::{merge_intervals, merge_ranges};
pub use splice::{classify_splice_regions, SpliceClassification, SpliceRegion};
pub use heights::{relative_heights, relative_heights_all, NOT_DRAWN};
pub use scale::{LinearScale, ScaleError};
pub use shrink::{build_shrunk_axis, ShrunkAxis};
pub use axis::{create_base_axis, BaseAxis, GenomeCoords};
pub use protein::{protein_to_cds, protein_to_screen, CdsMap, ProteinAnnotations, ProteinFeature};
pub use sites::{ModificationSites, SiteLevels};
pub use layout::{Diagnostic, GeneLayout, LayoutOptions, LayoutReport};
pub use io::{LevelParser, RecordError, RecordParser, SiteError, SiteParser};

/// Version information for the isovis core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
