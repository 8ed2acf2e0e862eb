//! Benchmarks for job claiming
//!
//! Measures the claim critical section alone and under contention from
//! several threads draining the same queue.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::thread;
use transforge::dispatch::JobQueue;
use transforge_common::JobDescriptor;

const JOBS: usize = 10_000;

fn make_queue() -> JobQueue {
    (0..JOBS)
        .map(|i| JobDescriptor::new(format!("/media/clip{i}.mov"), "/tmp/out", "mp4"))
        .collect()
}

fn bench_single_thread(c: &mut Criterion) {
    let mut group = c.benchmark_group("claim_single_thread");
    group.throughput(Throughput::Elements(JOBS as u64));
    group.bench_function("drain", |b| {
        b.iter_with_setup(make_queue, |queue| {
            while let Some((job, index)) = queue.claim() {
                black_box((job, index));
            }
        })
    });
    group.finish();
}

fn bench_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("claim_contended");
    group.throughput(Throughput::Elements(JOBS as u64));

    for workers in [2usize, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            b.iter_with_setup(
                || Arc::new(make_queue()),
                |queue| {
                    let handles: Vec<_> = (0..workers)
                        .map(|_| {
                            let queue = Arc::clone(&queue);
                            thread::spawn(move || {
                                let mut claimed = 0usize;
                                while queue.claim().is_some() {
                                    claimed += 1;
                                }
                                claimed
                            })
                        })
                        .collect();
                    let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
                    assert_eq!(total, JOBS);
                },
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_thread, bench_contended);
criterion_main!(benches);
