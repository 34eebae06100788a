//! Scoring and end-to-end generation throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nac_engine::{validate, Scorer};
use nac_model::EngineConfig;
use nac_test_utils::{engine_with, enterprise_context, large_catalog};

fn bench_scorer(c: &mut Criterion) {
    let catalog = large_catalog(500);
    let context = validate(&enterprise_context()).unwrap();
    let scorer = Scorer::new(&EngineConfig::default());

    let mut group = c.benchmark_group("scorer");
    group.throughput(Throughput::Elements(catalog.len() as u64));
    group.bench_function("score_500", |b| {
        b.iter(|| {
            for template in catalog.templates() {
                black_box(scorer.score(&context, template));
            }
        });
    });
    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    let context = enterprise_context();
    let mut group = c.benchmark_group("generate");

    for size in [16usize, 128, 1024] {
        let catalog = large_catalog(size);
        group.throughput(Throughput::Elements(size as u64));

        let sequential = engine_with(
            catalog.clone(),
            EngineConfig::default().with_parallel_threshold(usize::MAX),
        );
        group.bench_with_input(BenchmarkId::new("sequential", size), &context, |b, ctx| {
            b.iter(|| black_box(sequential.generate(ctx).unwrap()));
        });

        let parallel = engine_with(catalog, EngineConfig::default().with_parallel_threshold(0));
        group.bench_with_input(BenchmarkId::new("parallel", size), &context, |b, ctx| {
            b.iter(|| black_box(parallel.generate(ctx).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scorer, bench_generate);
criterion_main!(benches);
