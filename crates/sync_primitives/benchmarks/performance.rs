use std::sync::atomic::Ordering;
use std::sync::Mutex;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rng, Rng};
use sync_primitives::{AtomicTaggedPtr, Guarded, IdVec, TaggedPtr};

fn guarded_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("guarded");
    group.bench_function("with_write", |b| {
        let guarded = Guarded::new(0u64);
        b.iter(|| guarded.with_write(|v| *v = black_box(*v) + 1));
    });
    group.bench_function("std_mutex", |b| {
        let mutex = Mutex::new(0u64);
        b.iter(|| {
            let mut v = mutex.lock().unwrap();
            *v = black_box(*v) + 1;
        });
    });
    group.finish();
}

fn id_vec_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("id_vec_get");
    for size in [10, 100, 1000] {
        let vec: IdVec<u64> = (0..size).collect();
        let mut rng = rng();
        group.bench_with_input(BenchmarkId::from_parameter(size), &vec, |b, vec| {
            b.iter(|| vec.get(black_box(rng.random_range(0..size))))
        });
    }
    group.finish();
}

fn tagged_benchmark(c: &mut Criterion) {
    let mut target = 0u64;
    let ptr = &mut target as *mut u64;
    let mut group = c.benchmark_group("tagged");
    group.bench_function("cas_bump", |b| {
        let cell = AtomicTaggedPtr::new(TaggedPtr::new(ptr, 0u16));
        b.iter(|| loop {
            let current = cell.load(Ordering::Acquire);
            let bumped = current.with_tag(current.tag().wrapping_add(1));
            if cell
                .compare_exchange_weak(current, bumped, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                break;
            }
        });
    });
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = guarded_benchmark, id_vec_benchmark, tagged_benchmark
);
criterion_main!(benches);
