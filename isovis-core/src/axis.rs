//! The gene axis: genome -> intermediate axis -> screen.
//!
//! Two genome-to-axis mappings are kept side by side, the raw one and the
//! intron-shrunk one, so switching between them never recomputes the metagene
//! or the shrinkage. Orientation is handled entirely by the axis-to-screen
//! step.

use serde::Serialize;

use crate::scale::LinearScale;
use crate::shrink::{build_shrunk_axis, ShrunkAxis};
use crate::types::{GenomicPos, Interval, Strand};

/// Plot width used when the caller does not choose one.
pub const DEFAULT_PLOT_WIDTH: f64 = 400.0;

/// Screen width an axis starts with before [`BaseAxis::set_plot_width`].
pub const INITIAL_PLOT_WIDTH: f64 = 700.0;

/// Genomic extent of an axis, oriented 5' to 3'.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenomeCoords {
    pub start: GenomicPos,
    pub end: GenomicPos,
    pub width: f64,
    pub strand: Strand,
}

#[derive(Debug, Clone)]
pub struct BaseAxis {
    start: GenomicPos,
    end: GenomicPos,
    strand: Strand,
    merged_ranges: Vec<Interval>,
    width: f64,
    plot_width: f64,
    shrink: bool,
    ascending: bool,
    base_domain: [f64; 2],
    base_range: [f64; 2],
    shrunk: Option<ShrunkAxis>,
    screen_range: [f64; 2],
    protein_domain: Option<[f64; 2]>,
    gene_to_axis: LinearScale,
    axis_to_screen: LinearScale,
    protein_to_axis: Option<LinearScale>,
}

impl BaseAxis {
    /// Raw (unshrunk) axis over `start..end` with the initial plot width.
    ///
    /// `start` and `end` are the 5' and 3' ends of the shown window, so on the
    /// reverse strand `start > end`.
    pub fn new(start: GenomicPos, end: GenomicPos, strand: Strand, merged_ranges: Vec<Interval>) -> Self {
        let base_domain = Self::ordered_domain(start, end);
        let width = (end - start).abs() as f64;
        let base_range = [0.0, width];
        let screen_range = [0.0, INITIAL_PLOT_WIDTH];

        Self {
            start,
            end,
            strand,
            merged_ranges,
            width,
            plot_width: INITIAL_PLOT_WIDTH,
            shrink: false,
            ascending: true,
            base_domain,
            base_range,
            shrunk: None,
            screen_range,
            protein_domain: None,
            gene_to_axis: LinearScale::linear(base_domain, base_range),
            axis_to_screen: LinearScale::linear([0.0, width], screen_range),
            protein_to_axis: None,
        }
    }

    fn ordered_domain(start: GenomicPos, end: GenomicPos) -> [f64; 2] {
        [start.min(end) as f64, start.max(end) as f64]
    }

    pub fn is_normalized(&self) -> bool {
        self.shrink
    }

    pub fn is_ascending(&self) -> bool {
        self.ascending
    }

    pub fn plot_width(&self) -> f64 {
        self.plot_width
    }

    /// Width of the intermediate axis currently in use.
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn merged_ranges(&self) -> &[Interval] {
        &self.merged_ranges
    }

    /// Shrinkage control points, if any metagene interval is in view.
    pub fn shrunk(&self) -> Option<&ShrunkAxis> {
        self.shrunk.as_ref()
    }

    /// Control points of the genome-to-axis mapping currently in use.
    pub fn active_domain(&self) -> &[f64] {
        self.gene_to_axis.domain()
    }

    pub fn active_range(&self) -> &[f64] {
        self.gene_to_axis.range()
    }

    /// Genome coordinate to screen pixel.
    pub fn scale(&self, x: f64) -> f64 {
        self.axis_to_screen.apply(self.gene_to_axis.apply(x))
    }

    /// Protein coordinate to screen pixel, once a protein domain has been set.
    pub fn protein_scale(&self, x: f64) -> Option<f64> {
        let protein_to_axis = self.protein_to_axis.as_ref()?;
        Some(self.axis_to_screen.apply(protein_to_axis.apply(x)))
    }

    /// Map `[first, last]` protein coordinates across the raw axis width.
    ///
    /// On a reversed axis the domain is flipped so the protein reads in the
    /// same direction as the screen at the time it is set.
    pub fn set_protein_domain(&mut self, domain: [f64; 2]) {
        let domain = if self.ascending { domain } else { [domain[1], domain[0]] };
        self.protein_domain = Some(domain);
        self.protein_to_axis = Some(LinearScale::linear(domain, self.base_range));
    }

    pub fn set_plot_width(&mut self, width: f64) {
        self.plot_width = width;
        self.screen_range = if self.ascending { [0.0, width] } else { [width, 0.0] };
        self.update_scale();
    }

    /// Compute the shrunk control points for the current window and metagene.
    pub fn calculate_shrinkage(&mut self) {
        let target_width = self.base_range[1];
        self.shrunk = build_shrunk_axis(&self.merged_ranges, self.start, self.end, target_width);
        if self.shrunk.is_none() {
            log::debug!(
                "No metagene range within {}..{}, keeping the raw axis",
                self.start,
                self.end
            );
            self.shrink = false;
        }
        self.update_scale();
    }

    pub fn toggle_normalization(&mut self) {
        self.normalize_introns(!self.shrink);
    }

    /// Switch between shrunk (`true`) and raw (`false`) introns.
    ///
    /// Requesting shrinkage without shrunk control points leaves the raw axis
    /// in place.
    pub fn normalize_introns(&mut self, shrink: bool) {
        self.shrink = shrink && self.shrunk.is_some();
        self.update_scale();
    }

    /// Flip the reading direction of the screen axis.
    pub fn reverse(&mut self) {
        self.ascending = !self.ascending;
        self.screen_range = [self.screen_range[1], self.screen_range[0]];
        self.update_scale();
    }

    /// Move the axis to a new window, recomputing shrinkage but keeping the
    /// shrink mode, orientation and plot width.
    pub fn zoom(&mut self, start: GenomicPos, end: GenomicPos) {
        self.start = start;
        self.end = end;
        self.base_domain = Self::ordered_domain(start, end);
        self.base_range = [0.0, (end - start).abs() as f64];
        let shrink = self.shrink;
        self.calculate_shrinkage();
        self.normalize_introns(shrink);
        if let Some(domain) = self.protein_domain {
            self.protein_to_axis = Some(LinearScale::linear(domain, self.base_range));
        }
    }

    fn update_scale(&mut self) {
        match (&self.shrunk, self.shrink) {
            (Some(shrunk), true) => {
                self.gene_to_axis = shrunk.scale();
                self.width = shrunk.width;
            }
            _ => {
                self.gene_to_axis = LinearScale::linear(self.base_domain, self.base_range);
                self.width = self.base_range[1];
            }
        }
        self.axis_to_screen = LinearScale::linear([0.0, self.width], self.screen_range);
    }

    pub fn genome_coords(&self) -> GenomeCoords {
        GenomeCoords {
            start: self.start,
            end: self.end,
            width: self.width,
            strand: self.strand,
        }
    }

    /// Window ends in screen order (left end first).
    pub fn endpoints(&self) -> [GenomicPos; 2] {
        let (left, right) = if self.strand.is_forward() {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        };
        let (low, high) = (left.min(right), left.max(right));
        if self.ascending {
            [low, high]
        } else {
            [high, low]
        }
    }

    /// Metagene ranges in screen pixels, each as `[left, right]`.
    pub fn screen_ranges(&self) -> Vec<[f64; 2]> {
        self.merged_ranges
            .iter()
            .map(|range| {
                let a = self.scale(range.start as f64);
                let b = self.scale(range.end as f64);
                [a.min(b), a.max(b)]
            })
            .collect()
    }
}

/// Build an axis with shrinkage computed, introns shrunk and the plot width set.
pub fn create_base_axis(
    start: GenomicPos,
    end: GenomicPos,
    strand: Strand,
    merged_ranges: Vec<Interval>,
    plot_width: f64,
) -> BaseAxis {
    let mut axis = BaseAxis::new(start, end, strand, merged_ranges);
    axis.calculate_shrinkage();
    axis.normalize_introns(true);
    axis.set_plot_width(plot_width);
    axis
}
