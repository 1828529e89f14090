use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use isovis_core::{
    build_shrunk_axis, classify_splice_regions, merge_ranges, GeneLayout, Interval, Isoform, LayoutOptions,
    Strand,
};

/// A gene with `exon_count` exons and one isoform skipping each internal exon.
fn generate_isoforms(exon_count: usize) -> Vec<Isoform> {
    let exons: Vec<Interval> = (0..exon_count as i64)
        .map(|i| Interval::new(10_000 + i * 1_000, 10_150 + i * 1_000))
        .collect();

    let mut isoforms = vec![Isoform::new("full", Strand::Forward, exons.clone())];
    for skip in 1..exon_count.saturating_sub(1) {
        let mut skipped = exons.clone();
        skipped.remove(skip);
        isoforms.push(Isoform::new(format!("skip_{}", skip), Strand::Forward, skipped));
    }
    isoforms
}

fn bench_merge(c: &mut Criterion) {
    let isoforms = generate_isoforms(50);

    c.bench_function("merge_50_exons", |b| {
        b.iter(|| black_box(merge_ranges(black_box(&isoforms))))
    });
}

fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify_splice_regions");

    for exon_count in [10usize, 25, 50].iter() {
        let isoforms = generate_isoforms(*exon_count);
        group.bench_with_input(BenchmarkId::from_parameter(exon_count), &isoforms, |b, isoforms| {
            b.iter(|| black_box(classify_splice_regions(black_box(isoforms))))
        });
    }

    group.finish();
}

fn bench_shrinkage(c: &mut Criterion) {
    let isoforms = generate_isoforms(50);
    let metagene = merge_ranges(&isoforms);

    c.bench_function("shrink_50_exons", |b| {
        b.iter(|| black_box(build_shrunk_axis(black_box(&metagene), 9_500, 60_000, 50_500.0)))
    });
}

fn bench_full_layout(c: &mut Criterion) {
    let isoforms = generate_isoforms(25);
    let options = LayoutOptions::default();

    c.bench_function("layout_25_exons", |b| {
        b.iter(|| black_box(GeneLayout::build(black_box(&isoforms), &options).report()))
    });
}

criterion_group!(
    benches,
    bench_merge,
    bench_classification,
    bench_shrinkage,
    bench_full_layout
);
criterion_main!(benches);
