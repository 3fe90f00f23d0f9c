//! Criterion benchmarks comparing every kernel variant on the same inputs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use vecadd_kernels::KernelSet;

fn random_vector(rng: &mut rand::rngs::StdRng, len: usize) -> Vec<i32> {
    (0..len).map(|_| rng.random::<i32>()).collect()
}

fn bench_vector_add(c: &mut Criterion) {
    let kernels = KernelSet::detect();
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);

    let mut group = c.benchmark_group("vector_add_i32");

    for len in [4 * 1024, 64 * 1024, 1024 * 1024] {
        let a = random_vector(&mut rng, len);
        let b = random_vector(&mut rng, len);
        let mut out = vec![0i32; len];

        group.throughput(Throughput::Elements(len as u64));

        for kernel in kernels.iter() {
            group.bench_with_input(BenchmarkId::new(kernel.name(), len), &len, |bench, _| {
                bench.iter(|| kernel.apply(black_box(&mut out), black_box(&a), black_box(&b)));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_vector_add);
criterion_main!(benches);
