use half::f16;
use rand::prelude::StdRng;
use rand::{Rng, SeedableRng};
use simd_qsort::{has_nan, partial_sort, select, sort, SimdSortable, SortKey, TotalOrder};

const BATCH_SIZE: usize = 100_000;

/// Sorts with the scalar reference, NaNs dropped.
fn reference<T: SimdSortable>(values: &[T]) -> Vec<T> {
    let mut expected: Vec<T> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    expected.sort_unstable_by_key(TotalOrder::to_total_order);
    expected
}

fn check_sort<T: SimdSortable>(values: &[T]) {
    let expected = reference(values);
    let nan_count = values.len() - expected.len();

    let mut actual = values.to_vec();
    sort(&mut actual);

    let end = actual.len() - nan_count;
    assert!(actual[..end].iter().zip(&expected).all(|(a, b)| a == b));
    assert!(actual[end..].iter().all(|v| v.is_nan()));
}

fn check_select<T: SimdSortable>(values: &[T], k: usize) {
    let expected = reference(values);

    let mut actual = values.to_vec();
    select(&mut actual, k, has_nan(values)).unwrap();

    if k < expected.len() {
        assert!(actual[k] == expected[k]);
        assert!(actual[..k].iter().all(|v| *v <= actual[k]));
        assert!(actual[k + 1..].iter().all(|v| v.is_nan() || *v >= actual[k]));
    } else {
        assert!(actual[k].is_nan());
    }
}

fn check_partial_sort<T: SimdSortable>(values: &[T], k: usize) {
    let expected = reference(values);

    let mut actual = values.to_vec();
    partial_sort(&mut actual, k, has_nan(values)).unwrap();

    let sorted = k.min(expected.len());
    assert!(actual[..sorted].iter().zip(&expected).all(|(a, b)| a == b));
    assert!(actual[sorted..k].iter().all(|v| v.is_nan()));
}

fn check_all<T: SimdSortable>(values: &[T]) {
    check_sort(values);
    for k in [0, 1, values.len() / 3, values.len() / 2, values.len() - 1] {
        check_select(values, k);
    }
    for k in [1, 10, 1000, values.len() / 2, values.len()] {
        check_partial_sort(values, k);
    }
}

#[test]
fn integers_64() {
    let mut rng = StdRng::seed_from_u64(42);
    let integers = (0..BATCH_SIZE).map(|_| rng.gen()).collect::<Vec<i64>>();
    check_all(&integers);
    let unsigned = (0..BATCH_SIZE).map(|_| rng.gen()).collect::<Vec<u64>>();
    check_all(&unsigned);
}

#[test]
fn integers_32() {
    let mut rng = StdRng::seed_from_u64(42);
    let integers = (0..BATCH_SIZE).map(|_| rng.gen()).collect::<Vec<i32>>();
    check_all(&integers);
    let unsigned = (0..BATCH_SIZE).map(|_| rng.gen()).collect::<Vec<u32>>();
    check_all(&unsigned);
}

#[test]
fn integers_16() {
    let mut rng = StdRng::seed_from_u64(42);
    let integers = (0..BATCH_SIZE).map(|_| rng.gen()).collect::<Vec<i16>>();
    check_all(&integers);
    let unsigned = (0..BATCH_SIZE).map(|_| rng.gen()).collect::<Vec<u16>>();
    check_all(&unsigned);
}

#[test]
fn small_integers() {
    let mut rng = StdRng::seed_from_u64(42);
    let integers = (0..BATCH_SIZE).map(|_| rng.gen_range(0..100_i64)).collect::<Vec<i64>>();
    check_all(&integers);
}

#[test]
fn floats_from_bits() {
    // random bit patterns include NaNs of both signs, infinities and subnormals
    let mut rng = StdRng::seed_from_u64(42);
    let doubles = (0..BATCH_SIZE).map(|_| f64::from_bits(rng.gen())).collect::<Vec<f64>>();
    check_all(&doubles);
    let floats = (0..BATCH_SIZE).map(|_| f32::from_bits(rng.gen())).collect::<Vec<f32>>();
    check_all(&floats);
    let halves = (0..BATCH_SIZE).map(|_| f16::from_bits(rng.gen())).collect::<Vec<f16>>();
    assert!(has_nan(&halves));
    check_all(&halves);
}

#[test]
fn floats_with_duplicates() {
    let mut rng = StdRng::seed_from_u64(42);
    let doubles = (0..BATCH_SIZE)
        .map(|_| rng.gen_range(0..100) as f64 / 4.0)
        .collect::<Vec<f64>>();
    check_all(&doubles);
}

#[test]
fn every_small_length() {
    let mut rng = StdRng::seed_from_u64(42);
    for len in 1..600 {
        let integers = (0..len).map(|_| rng.gen_range(-50..50)).collect::<Vec<i32>>();
        check_sort(&integers);
        check_select(&integers, len / 2);
        let doubles = (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect::<Vec<f64>>();
        check_sort(&doubles);
    }
}

#[test]
fn adversarial_shapes() {
    let len = BATCH_SIZE as i32;
    let sorted: Vec<i32> = (0..len).collect();
    let reversed: Vec<i32> = (0..len).rev().collect();
    let all_equal = vec![7_i32; BATCH_SIZE];
    let few_unique: Vec<i32> = (0..len).map(|i| (i * 7919) % 3).collect();
    let organ_pipe: Vec<i32> = (0..len).map(|i| i.min(len - 1 - i)).collect();
    let sawtooth: Vec<i32> = (0..len).map(|i| i % 1000).collect();
    let mostly_min: Vec<i32> = (0..len).map(|i| if i % 1000 == 0 { 1 } else { 0 }).collect();

    for shape in [sorted, reversed, all_equal, few_unique, organ_pipe, sawtooth, mostly_min] {
        check_all(&shape);
    }

    let doubles: Vec<f64> = (0..BATCH_SIZE).rev().map(|i| i as f64).collect();
    check_all(&doubles);
}

#[test]
fn sort_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut floats = (0..BATCH_SIZE).map(|_| f32::from_bits(rng.gen())).collect::<Vec<f32>>();
    sort(&mut floats);
    let once: Vec<u32> = floats.iter().map(|v| v.to_bits()).collect();
    sort(&mut floats);
    let twice: Vec<u32> = floats.iter().map(|v| v.to_bits()).collect();
    assert_eq!(once, twice);
}

#[test]
fn scenario_sort_small() {
    let mut values = vec![5, 2, 9, 1, 5, 6, 2, 4, 3, 8];
    sort(&mut values);
    assert_eq!(values, vec![1, 2, 2, 3, 4, 5, 5, 6, 8, 9]);
}

#[test]
fn scenario_all_equal() {
    let mut values = vec![7; 8];
    sort(&mut values);
    assert_eq!(values, vec![7; 8]);
}

#[test]
fn scenario_reverse_256() {
    let mut values: Vec<i32> = (0..256).rev().collect();
    sort(&mut values);
    assert_eq!(values, (0..256).collect::<Vec<i32>>());
}

#[test]
fn scenario_floats_with_nan_and_zeros() {
    let mut values = vec![3.0_f32, f32::NAN, 1.0, -0.0, 0.0, f32::NAN, 2.0];
    sort(&mut values);
    assert_eq!(values[..5], [0.0, 0.0, 1.0, 2.0, 3.0]);
    assert!(values[5].is_nan() && values[6].is_nan());
}

#[test]
fn scenario_select() {
    let mut values = vec![4, 1, 3, 2, 5];
    select(&mut values, 2, false).unwrap();
    assert_eq!(values[2], 3);
    let mut low = values[..2].to_vec();
    low.sort_unstable();
    assert_eq!(low, vec![1, 2]);
    let mut high = values[3..].to_vec();
    high.sort_unstable();
    assert_eq!(high, vec![4, 5]);
}

#[test]
fn scenario_partial_sort() {
    let mut values = vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0];
    partial_sort(&mut values, 3, false).unwrap();
    assert_eq!(values[..3], [0, 1, 2]);
    let mut rest = values[3..].to_vec();
    rest.sort_unstable();
    assert_eq!(rest, (3..10).collect::<Vec<_>>());
}
