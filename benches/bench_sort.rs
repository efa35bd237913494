use criterion::{criterion_group, criterion_main, Criterion, Throughput};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use simd_qsort::{select, sort, SimdSortable, TotalOrder};

#[inline(never)]
pub fn standard_sort_slice<T: TotalOrder + Copy + Clone>(slice: &[T]) -> Vec<T> {
    let mut data = slice.to_vec();
    data.sort_unstable_by_key(TotalOrder::to_total_order);
    data
}

#[inline(never)]
pub fn simd_sort_slice<T: SimdSortable>(slice: &[T]) -> Vec<T> {
    let mut data = slice.to_vec();
    sort(&mut data);
    data
}

#[inline(never)]
pub fn standard_select_slice<T: TotalOrder + Copy + Clone>(slice: &[T], k: usize) -> Vec<T> {
    let mut data = slice.to_vec();
    data.select_nth_unstable_by_key(k, TotalOrder::to_total_order);
    data
}

#[inline(never)]
pub fn simd_select_slice<T: SimdSortable>(slice: &[T], k: usize) -> Vec<T> {
    let mut data = slice.to_vec();
    let _ = select(&mut data, k, false);
    data
}

const BATCH_SIZE: usize = 1_000_000;

pub fn bench_sort(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);

    let integers = (0..BATCH_SIZE)
        .map(|_| rng.gen_range(0..u64::MAX) as i64)
        .collect::<Vec<i64>>();

    let small_integers = (0..BATCH_SIZE)
        .map(|_| rng.gen_range(0..10_000_i64))
        .collect::<Vec<i64>>();

    let integers_32 = (0..BATCH_SIZE).map(|_| rng.gen()).collect::<Vec<u32>>();

    let floats = (0..BATCH_SIZE)
        .map(|_| rng.gen_range(-1e9..1e9))
        .collect::<Vec<f64>>();

    {
        let mut group = c.benchmark_group("integers");
        group.throughput(Throughput::Bytes((BATCH_SIZE * size_of::<i64>()) as u64));

        group
            .bench_function("standard", |b| b.iter(|| standard_sort_slice(&integers)))
            .bench_function("simd_qsort", |b| b.iter(|| simd_sort_slice(&integers)));
    }

    {
        let mut group = c.benchmark_group("small_integers");
        group.throughput(Throughput::Bytes((BATCH_SIZE * size_of::<i64>()) as u64));

        group
            .bench_function("standard", |b| b.iter(|| standard_sort_slice(&small_integers)))
            .bench_function("simd_qsort", |b| b.iter(|| simd_sort_slice(&small_integers)));
    }

    {
        let mut group = c.benchmark_group("integers_32");
        group.throughput(Throughput::Bytes((BATCH_SIZE * size_of::<u32>()) as u64));

        group
            .bench_function("standard", |b| b.iter(|| standard_sort_slice(&integers_32)))
            .bench_function("simd_qsort", |b| b.iter(|| simd_sort_slice(&integers_32)));
    }

    {
        let mut group = c.benchmark_group("floats");
        group.throughput(Throughput::Bytes((BATCH_SIZE * size_of::<f64>()) as u64));

        group
            .bench_function("standard", |b| b.iter(|| standard_sort_slice(&floats)))
            .bench_function("simd_qsort", |b| b.iter(|| simd_sort_slice(&floats)));
    }

    {
        let mut group = c.benchmark_group("select_median");
        group.throughput(Throughput::Bytes((BATCH_SIZE * size_of::<i64>()) as u64));

        group
            .bench_function("standard", |b| b.iter(|| standard_select_slice(&integers, BATCH_SIZE / 2)))
            .bench_function("simd_qsort", |b| b.iter(|| simd_select_slice(&integers, BATCH_SIZE / 2)));
    }
}

criterion_group!(benches, bench_sort);
criterion_main!(benches);
