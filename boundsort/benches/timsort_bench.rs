use boundsort::{BoundsFormat, PathOption, TimSort, TimSortBuilder};
use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, {criterion_group, criterion_main},
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Per-configuration settings
struct Config {
    sorter: TimSort,
    name: &'static str,
}

fn configs() -> Vec<Config> {
    let build = |bounds, path| {
        TimSortBuilder::new()
            .bounds(bounds)
            .path(path)
            .build()
            .unwrap()
    };
    vec![
        Config {
            sorter: build(BoundsFormat::default(), PathOption::ClassicOnly),
            name: "classic",
        },
        Config {
            sorter: build(BoundsFormat::default(), PathOption::TryBounded),
            name: "try-bounded",
        },
        Config {
            sorter: build(BoundsFormat::Precise, PathOption::BoundedOnly),
            name: "bounded",
        },
    ]
}

fn different_sizes(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let configs = configs();
    let mut group = c.benchmark_group("timsort");
    for size in [64_usize, 1024, 8192, 65536] {
        let input: Vec<i32> = (0..size).map(|_| rng.random()).collect();
        group.throughput(Throughput::Elements(size as u64));

        for config in &configs {
            group.bench_with_input(BenchmarkId::new(config.name, size), &input, |b, input| {
                b.iter_batched_ref(
                    || input.clone(),
                    |array| config.sorter.sort(array).unwrap(),
                    BatchSize::SmallInput,
                )
            });
        }

        // Standard library's stable sort, for comparison
        group.bench_with_input(BenchmarkId::new("std", size), &input, |b, input| {
            b.iter_batched_ref(|| input.clone(), |array| array.sort(), BatchSize::SmallInput)
        });
    }
    group.finish();
}

criterion_group!(benches, different_sizes);
criterion_main!(benches);
