use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use transposim_sim::evolution::{FitnessConfig, LoadFitness};
use transposim_sim::simulation::{SimulationBuilder, run_replicates};
use transposim_sim::storage::GenerationStats;

fn builder(pop_size: usize, generations: usize) -> SimulationBuilder {
    SimulationBuilder::new()
        .population_size(pop_size)
        .generations(generations)
        .sites_per_chromosome(31)
        .initial_elements(10)
        .transposition(0.01, 0.05)
        .loss_rate(0.005)
        .map_distance(90.0)
}

fn bench_simulation_init(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_init");

    for &pop_size in &[10usize, 100, 1000] {
        group.bench_with_input(
            BenchmarkId::new("random_population", pop_size),
            &pop_size,
            |b, &n| b.iter(|| black_box(builder(black_box(n), 10).build().unwrap())),
        );
    }

    group.finish();
}

fn bench_simulation_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_step");
    let pop_size = 100;

    group.throughput(Throughput::Elements(pop_size as u64));

    group.bench_function("step_neutral", |b| {
        b.iter_batched(
            || builder(pop_size, 10).build().unwrap(),
            |mut sim| {
                sim.step().unwrap();
                black_box(sim)
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.bench_function("step_selection", |b| {
        b.iter_batched(
            || {
                builder(pop_size, 10)
                    .fitness(FitnessConfig::new(LoadFitness::new(0.001, 1.5).unwrap()))
                    .build()
                    .unwrap()
            },
            |mut sim| {
                sim.step().unwrap();
                black_box(sim)
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_simulation_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_run");
    let pop_size = 100;
    let generations = 20;

    group.throughput(Throughput::Elements((pop_size * generations) as u64));

    group.bench_with_input(
        BenchmarkId::new("run_full", generations),
        &generations,
        |b, &gens| {
            b.iter_batched(
                || builder(pop_size, gens).build().unwrap(),
                |mut sim| {
                    let mut rows: Vec<GenerationStats> = Vec::new();
                    sim.run(&mut rows).unwrap();
                    black_box(rows)
                },
                criterion::BatchSize::SmallInput,
            )
        },
    );

    for &independent in &[false, true] {
        let config = builder(pop_size, 10)
            .replicates(8)
            .independent_streams(independent)
            .build_configuration()
            .unwrap();
        let label = if independent { "independent" } else { "shared" };
        group.bench_function(BenchmarkId::new("replicates", label), |b| {
            b.iter(|| {
                let mut rows: Vec<GenerationStats> = Vec::new();
                run_replicates(black_box(&config), &mut rows).unwrap();
                black_box(rows)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_simulation_init,
    bench_simulation_step,
    bench_simulation_run
);
criterion_main!(benches);
