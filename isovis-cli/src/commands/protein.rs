//! Protein command implementation - project protein features onto the gene axis

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use isovis_core::io::{parse_protein_file, record::strip_version};
use isovis_core::protein::{FeatureKind, FeatureStyle};
use isovis_core::{CdsMap, GeneLayout, GenomicPos, Isoform, LayoutOptions, ProteinAnnotations};

use crate::config::Config;
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct ProteinReport {
    pub isoform: String,
    pub length: GenomicPos,
    pub features: Vec<FeatureReport>,
}

#[derive(Debug, Serialize)]
pub struct FeatureReport {
    pub kind: FeatureKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub start: GenomicPos,
    pub end: GenomicPos,
    pub genome: [f64; 2],
    /// Gene-axis pixels of the feature's genomic span.
    pub screen: [f64; 2],
    /// Protein-track pixels, drawn 5' to 3' along the gene.
    pub track: [f64; 2],
    pub start_style: FeatureStyle,
    pub end_style: FeatureStyle,
}

pub fn execute(
    config: &Config,
    input: PathBuf,
    isoform_id: String,
    features: PathBuf,
    width: Option<f64>,
    out: Option<PathBuf>,
) -> Result<()> {
    let options = super::layout::resolve_options(config, width, None, false, false)?;
    let isoforms = super::load_isoforms(&input)?;

    if !features.exists() {
        return Err(CliError::file_not_found(features).into());
    }
    let annotations = parse_protein_file(&features)?;

    let report = project(&isoforms.visible_cloned(), &isoform_id, &annotations, &options)?;
    log::info!("Projected {} features onto {}", report.features.len(), report.isoform);

    super::write_json(&report, out.as_ref(), config.output.pretty)
}

pub(crate) fn project(
    isoforms: &[Isoform],
    isoform_id: &str,
    annotations: &ProteinAnnotations,
    options: &LayoutOptions,
) -> Result<ProteinReport, CliError> {
    let wanted = strip_version(isoform_id);
    let isoform = isoforms
        .iter()
        .find(|isoform| isoform.id() == wanted)
        .ok_or_else(|| CliError::isoform_not_found(wanted))?;

    let cds_map = CdsMap::from_isoform(isoform);
    if cds_map.is_empty() {
        return Err(CliError::validation(format!(
            "Isoform {} has no coding range",
            isoform.id()
        )));
    }

    let mut layout = GeneLayout::build(isoforms, options);
    layout.axis.set_protein_domain([0.0, annotations.length as f64]);

    // Reverse-strand proteins run right to left along an ascending gene axis.
    let track_features = if isoform.strand().is_forward() {
        annotations.clone()
    } else {
        annotations.reversed()
    };

    let features = annotations
        .genome_map(&cds_map)
        .into_iter()
        .map(|mapped| {
            let feature = &annotations.features[mapped.index];
            let drawn = &track_features.features[mapped.index];
            let a = layout.axis.scale(mapped.genome_start);
            let b = layout.axis.scale(mapped.genome_end);
            let track = [
                layout.axis.protein_scale(drawn.start as f64).unwrap_or(0.0),
                layout.axis.protein_scale(drawn.end as f64).unwrap_or(0.0),
            ];
            FeatureReport {
                kind: feature.kind,
                label: feature.label.clone(),
                start: feature.start,
                end: feature.end,
                genome: [mapped.genome_start, mapped.genome_end],
                screen: [a.min(b), a.max(b)],
                track,
                start_style: drawn.start_style,
                end_style: drawn.end_style,
            }
        })
        .collect();

    Ok(ProteinReport {
        isoform: isoform.id().to_string(),
        length: annotations.length,
        features,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use isovis_core::protein::ProteinFeature;
    use isovis_core::{Interval, Strand};

    fn coding_isoform(strand: Strand) -> Isoform {
        Isoform::new("ENST0001", strand, vec![Interval::new(100, 199), Interval::new(300, 399)])
            .with_coding_range(Interval::new(100, 399))
    }

    fn annotations() -> ProteinAnnotations {
        ProteinAnnotations::new(
            60,
            vec![ProteinFeature::new(FeatureKind::Domain, 1, 10).with_label("PF00069")],
        )
    }

    #[test]
    fn test_forward_projection() {
        let report = project(
            &[coding_isoform(Strand::Forward)],
            "ENST0001.2",
            &annotations(),
            &LayoutOptions::default(),
        )
        .unwrap();

        assert_eq!(report.isoform, "ENST0001");
        let feature = &report.features[0];
        assert_eq!(feature.genome, [100.0, 129.0]);
        assert!(feature.screen[0] < feature.screen[1]);
        assert!(feature.track[0] < feature.track[1]);
        assert_eq!(feature.label.as_deref(), Some("PF00069"));
    }

    #[test]
    fn test_reverse_strand_track_is_mirrored() {
        let report = project(
            &[coding_isoform(Strand::Reverse)],
            "ENST0001",
            &annotations(),
            &LayoutOptions::default(),
        )
        .unwrap();

        let feature = &report.features[0];
        assert_eq!(feature.genome, [399.0, 370.0]);
        // Residues 1..10 of 60 sit at the right-hand end of the track.
        assert!(feature.track[0] > 300.0);
    }

    #[test]
    fn test_unknown_isoform() {
        let err = project(
            &[coding_isoform(Strand::Forward)],
            "ENST9999",
            &annotations(),
            &LayoutOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::IsoformNotFound { .. }));
    }

    #[test]
    fn test_non_coding_isoform() {
        let isoform = Isoform::new("T", Strand::Forward, vec![Interval::new(1, 50)]);
        let err = project(&[isoform], "T", &annotations(), &LayoutOptions::default()).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }
}
