use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use rand_core::RngCore;
use strong_core::{FixedEntropy, StrongRand, StrongSource, chacha_from_source, new_source};

fn bench_draws(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw");
    let source = new_source();
    group.bench_function("uint64-os", |b| b.iter(|| black_box(source.uint64())));
    group.bench_function("int63-os", |b| b.iter(|| black_box(source.int63())));

    let fixed = StrongSource::with_entropy(FixedEntropy::new([0x5A; 8]));
    group.bench_function("uint64-fixed", |b| b.iter(|| black_box(fixed.uint64())));

    let mut buf = [0u8; 4096];
    group.bench_function("fill-4k-os", |b| {
        b.iter(|| {
            source.fill(&mut buf);
            black_box(&buf);
        })
    });
    group.finish();
}

fn bench_generators(c: &mut Criterion) {
    let mut group = c.benchmark_group("generator");
    let mut rng = StrongRand::from_source();
    group.bench_function("float64-os", |b| b.iter(|| black_box(rng.float64())));
    group.bench_function("norm-os", |b| b.iter(|| black_box(rng.norm_float64())));

    let source = new_source();
    let mut chacha = chacha_from_source(&source);
    group.bench_function("uint64-chacha", |b| b.iter(|| black_box(chacha.next_u64())));
    group.bench_function("key-chacha", |b| {
        b.iter(|| black_box(chacha_from_source(&source)))
    });
    group.finish();
}

criterion_group!(benches, bench_draws, bench_generators);
criterion_main!(benches);
