//! Benchmarks for link-back resolution and training-data export.
//!
//! ```bash
//! cargo bench --bench linkback
//! ```

use annolink::learn::{Example, ExampleGatherer, NoFeatureNormalizer};
use annolink::linkback::{candidate_annotations, LinkBackResolver, TokenSegmenter};
use annolink::{Annotation, EntityId, FeaturePack, FeatureSchema, TieOrder};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const QUERY: &str = "neil armstrong first man on the moon apollo 11 landing site";

/// Deterministic pseudo-scores in [0, 1).
fn score(i: usize) -> f64 {
    ((i * 7919) % 1000) as f64 / 1000.0
}

fn bench_resolve(c: &mut Criterion) {
    let entities: Vec<EntityId> = (0..8).map(EntityId).collect();
    let segmenter = TokenSegmenter::new();
    let annotations = candidate_annotations(QUERY, &entities, &segmenter);
    let candidates: Vec<(Annotation, f64)> = annotations
        .into_iter()
        .enumerate()
        .map(|(i, a)| (a, score(i)))
        .collect();

    let mut group = c.benchmark_group("resolve");
    for threshold in [0.0, 0.5, 0.9] {
        let resolver = LinkBackResolver::new(threshold);
        group.bench_with_input(
            BenchmarkId::from_parameter(threshold),
            &candidates,
            |b, cands| b.iter(|| resolver.resolve(black_box(cands.clone()))),
        );
    }
    group.finish();
}

fn gatherer(groups: usize, per_group: usize, dim: usize) -> ExampleGatherer<(), ()> {
    let schema = FeatureSchema::numbered("bench", dim);
    let mut g = ExampleGatherer::new();
    for q in 0..groups {
        let examples = (0..per_group)
            .map(|e| {
                let values: Vec<f64> = (0..dim).map(|d| score(q * 31 + e * 17 + d)).collect();
                Example::new(
                    FeaturePack::from_dense(schema.clone(), &values).unwrap(),
                    score(q + e),
                )
            })
            .collect();
        g.add_examples(examples).unwrap();
    }
    g
}

fn bench_export(c: &mut Criterion) {
    let g = gatherer(200, 20, 30);
    let norm = NoFeatureNormalizer::new();

    let mut group = c.benchmark_group("export");
    group.bench_function("pointwise", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(1 << 20);
            g.write_pointwise(&mut out, &norm, None).unwrap();
            black_box(out)
        })
    });
    group.bench_function("ranking", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(1 << 20);
            g.write_ranking(&mut out, &norm, TieOrder::default()).unwrap();
            black_box(out)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_export);
criterion_main!(benches);
