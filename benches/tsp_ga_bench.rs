//! Criterion benchmarks for the TSP genetic algorithm.
//!
//! Uses pseudo-random points over Europe so results do not depend on any
//! dataset file.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use u_tsp_ga::distance::DistanceMatrix;
use u_tsp_ga::ga::{GaConfig, GaEngine, GaRunner, Selection};
use u_tsp_ga::geo::Point;
use u_tsp_ga::random::create_rng;

fn random_points(n: usize) -> Vec<Point> {
    let mut rng = create_rng(7);
    (0..n)
        .map(|i| {
            Point::new(
                format!("p{i}"),
                rng.random_range(36.0..60.0),
                rng.random_range(-10.0..30.0),
            )
        })
        .collect()
}

fn bench_distance_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance_matrix");
    group.sample_size(10);

    for &n in &[50usize, 200, 500] {
        let points = random_points(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &points, |b, p| {
            b.iter(|| black_box(DistanceMatrix::new(black_box(p.clone())).unwrap()))
        });
    }
    group.finish();
}

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga_generation");
    group.sample_size(10);

    let distances = DistanceMatrix::new(random_points(100)).unwrap();
    for selection in Selection::all() {
        let config = GaConfig::default()
            .with_pop_size(500)
            .with_k_parents(50)
            .with_selection(selection)
            .with_mutation_gene_change_percent(0.05)
            .with_iter_stop(0)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::from_parameter(selection),
            &config,
            |b, cfg| {
                let mut engine = GaEngine::from_config(cfg.clone(), &distances).unwrap();
                engine.initialize().unwrap();
                b.iter(|| {
                    engine.evaluate_fitness().unwrap();
                    engine.advance_generation().unwrap();
                })
            },
        );
    }
    group.finish();
}

fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga_run");
    group.sample_size(10);

    for (n, pop, gen) in [(20usize, 100usize, 50usize), (50, 200, 30), (100, 300, 20)] {
        let distances = DistanceMatrix::new(random_points(n)).unwrap();
        let config = GaConfig::default()
            .with_pop_size(pop)
            .with_k_parents(pop / 10)
            .with_generations(gen)
            .with_show_only_changes(true)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::new(format!("n{n}_p{pop}_g{gen}"), n),
            &(distances, config),
            |b, (d, c)| b.iter(|| black_box(GaRunner::run(black_box(d), black_box(c)).unwrap())),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_distance_matrix, bench_generation, bench_run);
criterion_main!(benches);
