use isovis_core::io::{parse_record_file, SiteParser};
use isovis_core::protein::{FeatureKind, ProteinFeature};
use isovis_core::{
    build_shrunk_axis, classify_splice_regions, create_base_axis, merge_ranges, relative_heights, CdsMap,
    Diagnostic, GeneLayout, Interval, Isoform, IsoformSet, LayoutOptions, ProteinAnnotations, Strand,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn iv(start: i64, end: i64) -> Interval {
    Interval::new(start, end)
}

fn write_records(json: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("create temp records");
    write!(f, "{}", json).unwrap();
    f
}

#[test]
fn three_exon_gene_with_skipped_exon() {
    let isoforms = vec![
        Isoform::new("A", Strand::Forward, vec![iv(100, 200), iv(300, 400), iv(500, 600)]),
        Isoform::new("B", Strand::Forward, vec![iv(100, 200), iv(500, 600)]),
    ];

    assert_eq!(merge_ranges(&isoforms), vec![iv(100, 200), iv(300, 400), iv(500, 600)]);

    let classification = classify_splice_regions(&isoforms);
    let keys: Vec<(i64, i64, bool)> = classification
        .regions
        .iter()
        .map(|r| (r.start, r.end, r.is_constitutive))
        .collect();
    assert_eq!(keys, vec![(200, 300, false), (400, 500, false), (200, 500, false)]);
    assert!(!classification.has_constitutive);

    // The skipping junction encloses both inclusion junctions.
    let heights = relative_heights(&classification.regions);
    assert_eq!(heights, vec![0.5, 0.5, 1.0]);
}

#[test]
fn single_isoform_single_exon() {
    let isoforms = vec![Isoform::new("solo", Strand::Forward, vec![iv(1000, 1500)])];

    let metagene = merge_ranges(&isoforms);
    assert_eq!(metagene, vec![iv(1000, 1500)]);
    assert!(classify_splice_regions(&isoforms).regions.is_empty());

    let shrunk = build_shrunk_axis(&metagene, 1000, 1500, 500.0).unwrap();
    assert_eq!(shrunk.domain, vec![1000.0, 1500.0]);
    assert_eq!(shrunk.range, vec![0.0, 500.0]);
    assert_eq!(shrunk.intron_width, 0.0);
}

#[test]
fn layout_from_record_file() {
    let records = write_records(
        r#"{"isoforms": [
            {"id": "novel_7", "strand": "-", "exon_ranges": [[100, 200], [500, 600]]},
            {"id": "ENST00000001.2", "strand": "-", "exon_ranges": [[100, 200], [300, 400], [500, 600]],
             "coding_range": [150, 550]}
        ]}"#,
    );

    let isoforms = parse_record_file(records.path()).expect("parse records");
    let set = IsoformSet::new(isoforms);
    // Known transcripts are listed first.
    assert_eq!(set.visible()[0].id(), "ENST00000001");

    let layout = GeneLayout::build(&set.visible_cloned(), &LayoutOptions::default());
    assert_eq!(layout.strand, Strand::Reverse);
    assert_eq!((layout.start, layout.end), (600, 100));
    assert!(layout.diagnostics.is_empty());

    let report = layout.report();
    assert_eq!(report.metagene.len(), 3);
    assert_eq!(report.regions.len(), 3);
    for [left, right] in &report.metagene_pixels {
        assert!(left <= right);
        assert!(*left >= -1e-9 && *right <= 400.0 + 1e-9);
    }
}

#[test]
fn protein_domains_land_on_coding_exons() {
    let isoform = Isoform::new("T", Strand::Forward, vec![iv(100, 199), iv(300, 399)])
        .with_coding_range(iv(150, 350));
    let cds = CdsMap::from_isoform(&isoform);
    assert!(!cds.is_empty());

    let annotations = ProteinAnnotations::new(
        30,
        vec![ProteinFeature::new(FeatureKind::Domain, 1, 20).with_database("pfam")],
    );
    let mapped = annotations.genome_map(&cds);
    assert_eq!(mapped.len(), 1);
    assert_eq!(mapped[0].genome_start, 150.0);
    // 60 coding nucleotides: 50 in the first exon, the rest in the second.
    assert_eq!(mapped[0].genome_end, 309.0);

    let axis = create_base_axis(100, 399, Strand::Forward, merge_ranges(&[isoform]), 400.0);
    let left = axis.scale(mapped[0].genome_start);
    let right = axis.scale(mapped[0].genome_end);
    assert!(left < right);
}

#[test]
fn empty_record_list_is_not_fatal() {
    let records = write_records("[]");
    let isoforms = parse_record_file(records.path()).expect("parse empty list");
    let layout = GeneLayout::build(&isoforms, &LayoutOptions::default());
    assert_eq!(layout.diagnostics, vec![Diagnostic::EmptyIsoformSet]);
    assert!(layout.heights.is_empty());
}

#[test]
fn modification_sites_from_bed_on_reverse_gene() {
    let records = write_records(
        r#"[{"id": "ENST01.1", "strand": "-", "exon_ranges": [[1000, 1100], [1500, 1600]]},
            {"id": "ENST02.1", "strand": "-", "exon_ranges": [[1000, 1100], [1400, 1600]]}]"#,
    );
    let mut bed = NamedTempFile::new().expect("create temp bed");
    write!(
        bed,
        "chr2\t1049\t1050\tENSG09.3\t0\t-\n\
         chr2\t1549\t1550\tENSG09.3\t0\t-\n\
         chr2\t1549\t1550\tENSG09.3\t0\t-\n\
         chr2\t1449\t1450\tENSG10.1\t0\t-\n\
         chr2\t5000\t5001\tENSG09.3\t0\t-\n"
    )
    .unwrap();

    let isoforms = parse_record_file(records.path()).unwrap();
    let sites = SiteParser::parse_file(bed.path(), Some("ENSG09")).unwrap();
    assert_eq!(sites.positions(), &[1050, 1550, 5001]);

    let layout = GeneLayout::build(&isoforms, &LayoutOptions::default()).with_modification_sites(&sites);
    assert_eq!(layout.modification_sites.positions(), &[1050, 1550]);

    let report = layout.report();
    let pixels: Vec<f64> = report.modification_sites.iter().map(|site| site.pixel).collect();
    assert_eq!(pixels, sites.within(1600, 1000).screen_positions(&layout.axis));
    assert!(pixels.iter().all(|x| (0.0..=400.0).contains(x)));
}
