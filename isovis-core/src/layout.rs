//! One-call pipeline from isoforms to a positioned gene model.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::axis::{create_base_axis, BaseAxis, GenomeCoords, DEFAULT_PLOT_WIDTH};
use crate::heights::{relative_heights, relative_heights_all};
use crate::isoform::Isoform;
use crate::merge::merge_ranges;
use crate::sites::{ModificationSites, SiteLevels};
use crate::splice::{classify_splice_regions, SpliceClassification};
use crate::types::{GenomicPos, Interval, Strand};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    pub plot_width: f64,
    /// Window to show as `(start, end)`; the whole gene when `None`.
    pub zoom: Option<(GenomicPos, GenomicPos)>,
    pub shrink_introns: bool,
    pub ascending: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            plot_width: DEFAULT_PLOT_WIDTH,
            zoom: None,
            shrink_introns: true,
            ascending: true,
        }
    }
}

/// Conditions worth reporting that still produce a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    EmptyIsoformSet,
    EmptyIsoform { id: String },
    MixedStrands { forward: usize, reverse: usize },
    NoSpliceRegions,
    ShrinkageUnavailable { start: GenomicPos, end: GenomicPos },
    NoModificationSites { gene: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::EmptyIsoformSet => write!(f, "No isoforms to lay out"),
            Diagnostic::EmptyIsoform { id } => write!(f, "Isoform {} has no exons", id),
            Diagnostic::MixedStrands { forward, reverse } => write!(
                f,
                "Isoforms disagree on strand ({} forward, {} reverse); using the first isoform's",
                forward, reverse
            ),
            Diagnostic::NoSpliceRegions => write!(f, "No splice junctions: every isoform has a single exon"),
            Diagnostic::ShrinkageUnavailable { start, end } => write!(
                f,
                "No exonic range within {}..{}, introns left unshrunk",
                start, end
            ),
            Diagnostic::NoModificationSites { gene } => {
                write!(f, "No RNA modification sites of {} in view", gene)
            }
        }
    }
}

/// Everything a renderer needs for one gene.
#[derive(Debug, Clone)]
pub struct GeneLayout {
    pub isoforms: Vec<Isoform>,
    pub metagene: Vec<Interval>,
    pub splice: SpliceClassification,
    /// Heights over alternative regions, parallel to `splice.regions`.
    pub heights: Vec<f64>,
    /// Heights over every region, parallel to `splice.regions`.
    pub heights_all: Vec<f64>,
    pub strand: Strand,
    /// 5' end of the gene.
    pub start: GenomicPos,
    /// 3' end of the gene.
    pub end: GenomicPos,
    pub axis: BaseAxis,
    /// Sites inside the axis window.
    pub modification_sites: ModificationSites,
    pub site_levels: Option<SiteLevels>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GeneLayout {
    pub fn build(isoforms: &[Isoform], options: &LayoutOptions) -> Self {
        let mut diagnostics = Vec::new();

        if isoforms.is_empty() {
            diagnostics.push(Diagnostic::EmptyIsoformSet);
        }
        for isoform in isoforms.iter().filter(|isoform| isoform.exon_count() == 0) {
            diagnostics.push(Diagnostic::EmptyIsoform {
                id: isoform.id().to_string(),
            });
        }

        let strand = isoforms.first().map(Isoform::strand).unwrap_or(Strand::Forward);
        let forward = isoforms.iter().filter(|isoform| isoform.strand().is_forward()).count();
        let reverse = isoforms.len() - forward;
        if forward > 0 && reverse > 0 {
            diagnostics.push(Diagnostic::MixedStrands { forward, reverse });
        }

        let metagene = merge_ranges(isoforms);
        let splice = classify_splice_regions(isoforms);
        if !isoforms.is_empty() && splice.regions.is_empty() {
            diagnostics.push(Diagnostic::NoSpliceRegions);
        }
        let heights = relative_heights(&splice.regions);
        let heights_all = relative_heights_all(&splice.regions);

        let (low, high) = match (metagene.first(), metagene.last()) {
            (Some(first), Some(last)) => (first.start, last.end),
            _ => (0, 0),
        };
        let (start, end) = if strand.is_forward() { (low, high) } else { (high, low) };
        let (zoom_start, zoom_end) = options.zoom.unwrap_or((start, end));

        let mut axis = create_base_axis(zoom_start, zoom_end, strand, metagene.clone(), options.plot_width);
        if !options.shrink_introns {
            axis.normalize_introns(false);
        } else if !axis.is_normalized() && !metagene.is_empty() {
            diagnostics.push(Diagnostic::ShrinkageUnavailable {
                start: zoom_start,
                end: zoom_end,
            });
        }
        if !options.ascending {
            axis.reverse();
        }

        for diagnostic in &diagnostics {
            log::warn!("{}", diagnostic);
        }
        log::info!(
            "Laid out {} isoforms: {} metagene ranges, {} splice regions",
            isoforms.len(),
            metagene.len(),
            splice.regions.len()
        );

        Self {
            isoforms: isoforms.to_vec(),
            metagene,
            splice,
            heights,
            heights_all,
            strand,
            start,
            end,
            axis,
            modification_sites: ModificationSites::default(),
            site_levels: None,
            diagnostics,
        }
    }

    /// Attach modification sites, keeping the ones inside the axis window.
    pub fn with_modification_sites(mut self, sites: &ModificationSites) -> Self {
        let coords = self.axis.genome_coords();
        self.modification_sites = sites.within(coords.start, coords.end);

        if self.modification_sites.is_empty() {
            let diagnostic = Diagnostic::NoModificationSites {
                gene: sites.gene().to_string(),
            };
            log::warn!("{}", diagnostic);
            self.diagnostics.push(diagnostic);
        } else {
            log::info!(
                "{} of {} modification sites in view",
                self.modification_sites.len(),
                sites.len()
            );
        }
        self
    }

    pub fn with_site_levels(mut self, levels: SiteLevels) -> Self {
        self.site_levels = Some(levels);
        self
    }

    /// Screen pixels of one isoform's exons, each as `[left, right]`.
    pub fn exon_pixels(&self, isoform: &Isoform) -> Vec<[f64; 2]> {
        isoform
            .exon_ranges()
            .iter()
            .map(|exon| {
                let a = self.axis.scale(exon.start as f64);
                let b = self.axis.scale(exon.end as f64);
                [a.min(b), a.max(b)]
            })
            .collect()
    }

    pub fn report(&self) -> LayoutReport {
        let regions = self
            .splice
            .regions
            .iter()
            .zip(self.heights.iter().zip(&self.heights_all))
            .map(|(region, (&height, &height_all))| {
                let a = self.axis.scale(region.start as f64);
                let b = self.axis.scale(region.end as f64);
                RegionReport {
                    start: region.start,
                    end: region.end,
                    is_constitutive: region.is_constitutive,
                    height,
                    height_all,
                    pixels: [a.min(b), a.max(b)],
                }
            })
            .collect();

        let isoforms = self
            .isoforms
            .iter()
            .map(|isoform| IsoformRow {
                id: isoform.id().to_string(),
                strand: isoform.strand(),
                exons: isoform.exon_ranges().to_vec(),
                pixels: self.exon_pixels(isoform),
            })
            .collect();

        let modification_sites = self
            .modification_sites
            .positions()
            .iter()
            .zip(self.modification_sites.screen_positions(&self.axis))
            .map(|(&position, pixel)| SiteReport {
                position,
                pixel,
                levels: self
                    .site_levels
                    .as_ref()
                    .and_then(|levels| levels.site_levels(position))
                    .cloned(),
            })
            .collect();

        LayoutReport {
            gene: self.axis.genome_coords(),
            endpoints: self.axis.endpoints(),
            plot_width: self.axis.plot_width(),
            axis_width: self.axis.width(),
            normalized: self.axis.is_normalized(),
            ascending: self.axis.is_ascending(),
            metagene: self.metagene.clone(),
            metagene_pixels: self.axis.screen_ranges(),
            has_constitutive: self.splice.has_constitutive,
            regions,
            isoforms,
            modification_sites,
            diagnostics: self.diagnostics.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionReport {
    pub start: GenomicPos,
    pub end: GenomicPos,
    pub is_constitutive: bool,
    pub height: f64,
    pub height_all: f64,
    pub pixels: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IsoformRow {
    pub id: String,
    pub strand: Strand,
    pub exons: Vec<Interval>,
    pub pixels: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteReport {
    pub position: GenomicPos,
    pub pixel: f64,
    /// Level per sample, when a level table was attached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub levels: Option<BTreeMap<String, f64>>,
}

/// Serializable summary of a [`GeneLayout`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutReport {
    pub gene: GenomeCoords,
    pub endpoints: [GenomicPos; 2],
    pub plot_width: f64,
    pub axis_width: f64,
    pub normalized: bool,
    pub ascending: bool,
    pub metagene: Vec<Interval>,
    pub metagene_pixels: Vec<[f64; 2]>,
    pub has_constitutive: bool,
    pub regions: Vec<RegionReport>,
    pub isoforms: Vec<IsoformRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modification_sites: Vec<SiteReport>,
    pub diagnostics: Vec<Diagnostic>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: i64, end: i64) -> Interval {
        Interval::new(start, end)
    }

    fn skipping_pair() -> Vec<Isoform> {
        vec![
            Isoform::new("ENST01", Strand::Forward, vec![iv(100, 200), iv(300, 400), iv(500, 600)]),
            Isoform::new("ENST02", Strand::Forward, vec![iv(100, 200), iv(500, 600)]),
        ]
    }

    #[test]
    fn test_default_options() {
        let options = LayoutOptions::default();
        assert_eq!(options.plot_width, 400.0);
        assert!(options.shrink_introns);
        assert!(options.ascending);
        assert_eq!(options.zoom, None);
    }

    #[test]
    fn test_exon_skipping_layout() {
        let layout = GeneLayout::build(&skipping_pair(), &LayoutOptions::default());
        assert!(layout.diagnostics.is_empty());
        assert_eq!(layout.metagene, vec![iv(100, 200), iv(300, 400), iv(500, 600)]);
        assert_eq!((layout.start, layout.end), (100, 600));
        assert_eq!(layout.splice.regions.len(), 3);
        assert!(layout.splice.regions.iter().all(|r| !r.is_constitutive));
        assert!(layout.axis.is_normalized());
        assert!((layout.axis.scale(600.0) - 400.0).abs() < 1e-9);

        let report = layout.report();
        assert_eq!(report.regions.len(), 3);
        assert_eq!(report.isoforms.len(), 2);
        assert_eq!(report.isoforms[1].pixels.len(), 2);
    }

    #[test]
    fn test_empty_input_reports_diagnostic() {
        let layout = GeneLayout::build(&[], &LayoutOptions::default());
        assert_eq!(layout.diagnostics, vec![Diagnostic::EmptyIsoformSet]);
        assert!(layout.metagene.is_empty());
        assert!(layout.splice.regions.is_empty());
        assert!(layout.report().metagene_pixels.is_empty());
    }

    #[test]
    fn test_single_exon_has_no_regions() {
        let isoforms = vec![Isoform::new("A", Strand::Forward, vec![iv(100, 200)])];
        let layout = GeneLayout::build(&isoforms, &LayoutOptions::default());
        assert_eq!(layout.metagene, vec![iv(100, 200)]);
        assert_eq!(layout.diagnostics, vec![Diagnostic::NoSpliceRegions]);
        assert!(!layout.splice.has_constitutive);
    }

    #[test]
    fn test_mixed_strands_are_reported() {
        let isoforms = vec![
            Isoform::new("A", Strand::Reverse, vec![iv(100, 200), iv(300, 400)]),
            Isoform::new("B", Strand::Forward, vec![iv(100, 200), iv(300, 400)]),
        ];
        let layout = GeneLayout::build(&isoforms, &LayoutOptions::default());
        assert_eq!(layout.strand, Strand::Reverse);
        assert_eq!((layout.start, layout.end), (400, 100));
        assert!(layout
            .diagnostics
            .contains(&Diagnostic::MixedStrands { forward: 1, reverse: 1 }));
    }

    #[test]
    fn test_zoom_between_exons_keeps_raw_axis() {
        let options = LayoutOptions {
            zoom: Some((210, 290)),
            ..LayoutOptions::default()
        };
        let layout = GeneLayout::build(&skipping_pair(), &options);
        assert!(!layout.axis.is_normalized());
        assert!(layout
            .diagnostics
            .contains(&Diagnostic::ShrinkageUnavailable { start: 210, end: 290 }));
    }

    #[test]
    fn test_descending_unshrunk_layout() {
        let options = LayoutOptions {
            shrink_introns: false,
            ascending: false,
            plot_width: 500.0,
            ..LayoutOptions::default()
        };
        let layout = GeneLayout::build(&skipping_pair(), &options);
        assert!(!layout.axis.is_normalized());
        assert!(!layout.axis.is_ascending());
        assert!((layout.axis.scale(100.0) - 500.0).abs() < 1e-9);
        assert!((layout.axis.scale(350.0) - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_modification_sites_in_view() {
        let sites = ModificationSites::from_positions("ENSG01", vec![50, 150, 350, 650]);
        let mut levels = SiteLevels::new("ENSG01", vec!["liver".to_string()]);
        levels.record(150, "liver", 0.4);

        let layout = GeneLayout::build(&skipping_pair(), &LayoutOptions::default())
            .with_modification_sites(&sites)
            .with_site_levels(levels);
        assert_eq!(layout.modification_sites.positions(), &[150, 350]);

        let report = layout.report();
        assert_eq!(report.modification_sites.len(), 2);
        assert_eq!(report.modification_sites[0].pixel, layout.axis.scale(150.0));
        assert!(report.modification_sites[0].pixel < report.modification_sites[1].pixel);
        assert_eq!(
            report.modification_sites[0].levels.as_ref().and_then(|l| l.get("liver")),
            Some(&0.4)
        );
        assert_eq!(report.modification_sites[1].levels, None);
    }

    #[test]
    fn test_modification_sites_on_reversed_axis() {
        let options = LayoutOptions {
            ascending: false,
            ..LayoutOptions::default()
        };
        let sites = ModificationSites::from_positions("ENSG01", vec![150, 350]);
        let layout = GeneLayout::build(&skipping_pair(), &options).with_modification_sites(&sites);

        let report = layout.report();
        assert!(report.modification_sites[0].pixel > report.modification_sites[1].pixel);

        let forward = GeneLayout::build(&skipping_pair(), &LayoutOptions::default());
        for site in &report.modification_sites {
            let mirrored = 400.0 - forward.axis.scale(site.position as f64);
            assert!((site.pixel - mirrored).abs() < 1e-9);
        }
    }

    #[test]
    fn test_reverse_strand_window_keeps_sites() {
        let isoforms: Vec<Isoform> = skipping_pair()
            .into_iter()
            .map(|isoform| Isoform::new(isoform.id(), Strand::Reverse, isoform.exon_ranges().to_vec()))
            .collect();
        let sites = ModificationSites::from_positions("ENSG01", vec![99, 100, 600, 601]);

        let layout = GeneLayout::build(&isoforms, &LayoutOptions::default()).with_modification_sites(&sites);
        assert_eq!((layout.start, layout.end), (600, 100));
        assert_eq!(layout.modification_sites.positions(), &[100, 600]);
    }

    #[test]
    fn test_no_sites_in_view_is_reported() {
        let sites = ModificationSites::from_positions("ENSG01", vec![5000]);
        let layout = GeneLayout::build(&skipping_pair(), &LayoutOptions::default()).with_modification_sites(&sites);
        assert!(layout.modification_sites.is_empty());
        assert!(layout.diagnostics.contains(&Diagnostic::NoModificationSites {
            gene: "ENSG01".to_string()
        }));
        assert!(layout.report().modification_sites.is_empty());
    }

    #[test]
    fn test_report_serializes() {
        let report = GeneLayout::build(&skipping_pair(), &LayoutOptions::default()).report();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["metagene"][0], serde_json::json!([100, 200]));
        assert_eq!(json["gene"]["strand"], "+");
        assert_eq!(json["regions"][0]["is_constitutive"], false);
    }
}
