//! Throughput benchmarks for engine operations

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rulechart_bench::common::TOGGLE;
use rulechart_bench::fixtures;

fn bench_sequential_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential_dispatch");

    for num_events in [100u64, 1000, 10000] {
        group.throughput(Throughput::Elements(num_events));
        group.bench_with_input(
            BenchmarkId::new("ring_64", num_events),
            &num_events,
            |b, &num_events| {
                let mut machine = fixtures::ring::<64>(64).expect("ring fixture");
                b.iter(|| {
                    for _ in 0..num_events {
                        let _ = black_box(machine.handle(TOGGLE));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_lookup_by_state_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup_by_state_count");
    group.throughput(Throughput::Elements(1));

    for num_states in [8u16, 64, 256] {
        group.bench_with_input(
            BenchmarkId::new("ring", num_states),
            &num_states,
            |b, &num_states| {
                let mut machine = fixtures::ring::<256>(num_states).expect("ring fixture");
                b.iter(|| machine.handle(TOGGLE));
            },
        );
    }

    group.finish();
}

fn bench_finalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("finalize");

    for num_states in [10u16, 50, 100] {
        group.bench_with_input(
            BenchmarkId::new("ring", num_states),
            &num_states,
            |b, &num_states| {
                b.iter(|| fixtures::ring::<128>(black_box(num_states)).expect("ring fixture"));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_sequential_dispatch,
    bench_lookup_by_state_count,
    bench_finalize
);
criterion_main!(benches);
