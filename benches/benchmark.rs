// Ranking benchmarks over synthetic catalogs
use animatch::{EmbeddedItem, EmbeddingField, Ranker, Vector, WeightSet};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;

// Roughly the shape of the BERT exports: wide description, narrow categorical fields
const FIELD_DIMS: [(EmbeddingField, usize); 5] = [
    (EmbeddingField::Description, 384),
    (EmbeddingField::Genres, 128),
    (EmbeddingField::Demographic, 32),
    (EmbeddingField::Rating, 16),
    (EmbeddingField::Themes, 128),
];

fn generate_random_vector(rng: &mut impl Rng, dim: usize) -> Vec<f32> {
    (0..dim).map(|_| rng.random_range(-1.0f32..1.0f32)).collect()
}

fn generate_catalog(size: usize) -> Vec<EmbeddedItem> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..size as u64)
        .map(|id| {
            let mut item = EmbeddedItem::new(id, format!("anime {}", id));
            for (field, dim) in FIELD_DIMS {
                item = item.with_field(field, generate_random_vector(&mut rng, dim));
            }
            item
        })
        .collect()
}

fn benchmark_cosine(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let mut group = c.benchmark_group("cosine");

    for dim in [16, 128, 384, 768].iter() {
        let a = Vector::new(generate_random_vector(&mut rng, *dim));
        let b = Vector::new(generate_random_vector(&mut rng, *dim));
        group.bench_with_input(BenchmarkId::from_parameter(dim), dim, |bench, _| {
            bench.iter(|| black_box(a.cosine_similarity(black_box(&b)).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");

    for size in [1_000, 10_000].iter() {
        let catalog = generate_catalog(*size);

        let serial = Ranker::new(WeightSet::default())
            .unwrap()
            .with_parallel_threshold(usize::MAX);
        group.bench_with_input(BenchmarkId::new("serial", size), size, |b, _| {
            b.iter(|| black_box(serial.rank(&[0, 1, 2], &catalog, 30).unwrap()));
        });

        let parallel = Ranker::new(WeightSet::default())
            .unwrap()
            .with_parallel_threshold(0);
        group.bench_with_input(BenchmarkId::new("parallel", size), size, |b, _| {
            b.iter(|| black_box(parallel.rank(&[0, 1, 2], &catalog, 30).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_cosine, benchmark_rank);
criterion_main!(benches);
