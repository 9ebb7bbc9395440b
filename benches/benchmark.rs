// Ranking benchmarks: brute-force cosine top-K at a few store sizes
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use networth_core::{estimate, rank, Profile, ProfileStore, Vector, DEFAULT_EMBEDDING_DIM};
use rand::Rng;

fn generate_random_vector(dim: usize) -> Vector {
    let mut rng = rand::rng();
    let data: Vec<f32> = (0..dim).map(|_| rng.random_range(-1.0f32..1.0f32)).collect();
    Vector::new(data)
}

fn generate_store(size: usize, dim: usize) -> ProfileStore {
    let profiles = (0..size)
        .map(|i| {
            Profile::new(
                format!("subject {}", i),
                (i as f64 + 1.0) * 1_000_000.0,
                format!("./images/{}.jpg", i),
                generate_random_vector(dim),
            )
        })
        .collect();
    ProfileStore::new(profiles).unwrap()
}

fn benchmark_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");
    let query = generate_random_vector(DEFAULT_EMBEDDING_DIM);

    for size in [5, 1_000, 10_000].iter() {
        let store = generate_store(*size, DEFAULT_EMBEDDING_DIM);
        group.bench_with_input(BenchmarkId::new("top3", size), size, |b, _| {
            b.iter(|| {
                let matches = rank(black_box(&query), &store, None, 3).unwrap();
                black_box(matches);
            });
        });
    }

    group.finish();
}

fn benchmark_rank_and_estimate(c: &mut Criterion) {
    let store = generate_store(5, DEFAULT_EMBEDDING_DIM);
    let query = generate_random_vector(DEFAULT_EMBEDDING_DIM);

    c.bench_function("rank_and_estimate_5_profiles", |b| {
        b.iter(|| {
            let matches = rank(black_box(&query), &store, Some(0.0), 3).unwrap();
            black_box(estimate(&matches));
        });
    });
}

fn benchmark_cosine(c: &mut Criterion) {
    let a = generate_random_vector(DEFAULT_EMBEDDING_DIM);
    let b_vec = generate_random_vector(DEFAULT_EMBEDDING_DIM);

    c.bench_function("cosine_768", |b| {
        b.iter(|| black_box(a.cosine_similarity(black_box(&b_vec))));
    });
}

criterion_group!(benches, benchmark_rank, benchmark_rank_and_estimate, benchmark_cosine);
criterion_main!(benches);
