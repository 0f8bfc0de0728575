//! Benchmarks for the self-sorting list:
//! - push throughput with sort workers running
//! - lock-coupled iteration while workers reorder the chain
//! - lock-coupled list vs. the single-mutex baseline, push then sort to quiescence
//!
//! Run with: cargo bench --package chainsort-core --bench self_sorting_list_benchmark

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chainsort_core::CoarseSortedList;
use chainsort_core::IterableCollection;
use chainsort_core::SelfSortingList;
use chainsort_core::SortConfig;

const PUSHES_PER_ITER: usize = 1_000;

fn busy_config(workers: usize) -> SortConfig {
    SortConfig::default()
        .with_workers(workers)
        .with_idle_interval(Duration::from_millis(1))
        .with_swap_backoff(Duration::ZERO)
}

fn scrambled(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{:08}", (i * 7919) % count)).collect()
}

// ============================================================================
// Push
// ============================================================================

fn push_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("push");

    for workers in [1, 4] {
        group.bench_with_input(
            BenchmarkId::new("single_writer", workers),
            &workers,
            |b, &workers| {
                let values = scrambled(PUSHES_PER_ITER);
                b.iter(|| {
                    let list = SelfSortingList::new(busy_config(workers)).unwrap();
                    for value in &values {
                        list.push(black_box(value.clone()));
                    }
                    list.shutdown();
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("four_writers", workers),
            &workers,
            |b, &workers| {
                b.iter(|| {
                    let list = Arc::new(SelfSortingList::new(busy_config(workers)).unwrap());
                    let handles: Vec<_> = (0..4)
                        .map(|t| {
                            let list = Arc::clone(&list);
                            thread::spawn(move || {
                                for i in 0..PUSHES_PER_ITER / 4 {
                                    list.push(format!("{t}-{i:06}"));
                                }
                            })
                        })
                        .collect();
                    for handle in handles {
                        handle.join().unwrap();
                    }
                    list.shutdown();
                });
            },
        );
    }

    group.finish();
}

// ============================================================================
// Iterate
// ============================================================================

fn iterate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate");

    for workers in [1, 4] {
        let list = SelfSortingList::new(busy_config(workers)).unwrap();
        for value in scrambled(2_000) {
            list.push(value);
        }

        group.bench_with_input(BenchmarkId::new("while_sorting", workers), &list, |b, list| {
            b.iter(|| black_box(list.iter().count()));
        });
    }

    // Idle workers: iteration cost without lock contention.
    let idle = SelfSortingList::new(SortConfig::default()).unwrap();
    for value in scrambled(2_000) {
        idle.push(value);
    }
    group.bench_function("idle_workers", |b| {
        b.iter(|| black_box(idle.iter().count()));
    });

    group.finish();
}

// ============================================================================
// Lock-coupled vs. coarse baseline
// ============================================================================

const SORT_TIMEOUT: Duration = Duration::from_secs(60);

fn wait_for(mut settled: impl FnMut() -> bool) {
    let deadline = Instant::now() + SORT_TIMEOUT;
    while !settled() {
        assert!(Instant::now() < deadline, "list did not converge");
        thread::sleep(Duration::from_micros(200));
    }
}

fn baseline_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_then_sort");
    group.sample_size(10);

    let values = scrambled(300);

    for workers in [1, 4] {
        group.bench_with_input(
            BenchmarkId::new("lock_coupled", workers),
            &workers,
            |b, &workers| {
                b.iter(|| {
                    let list = SelfSortingList::new(busy_config(workers)).unwrap();
                    for value in &values {
                        list.push(value.clone());
                    }
                    wait_for(|| list.is_sorted_snapshot());
                    black_box(list.swap_count())
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("coarse_mutex", workers),
            &workers,
            |b, &workers| {
                b.iter(|| {
                    let list = CoarseSortedList::new(busy_config(workers)).unwrap();
                    for value in &values {
                        list.push(value.clone());
                    }
                    wait_for(|| list.is_sorted_snapshot());
                    black_box(list.swap_count())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, push_benchmark, iterate_benchmark, baseline_benchmark);
criterion_main!(benches);
