// Partition kernels: keys < pivot first, keys >= pivot after, split index returned.
// Equal keys must go right or the drivers' `pivot != smallest` skip stops making progress.

use crate::vtype::{max_key, min_key, VecType};
use crate::{MAX_UNROLL, PARTITION_BUFFER_LEN};

/// Peels keys off the front with scalar compares until `[left, right)` holds whole registers.
#[inline]
fn align_to_lanes<V: VecType>(
    arr: &mut [V::Key],
    pivot: V::Key,
    smallest: &mut V::Key,
    biggest: &mut V::Key,
) -> (usize, usize) {
    let (mut left, mut right) = (0, arr.len());
    while (right - left) % V::LANES != 0 {
        let key = arr[left];
        *smallest = min_key(*smallest, key);
        *biggest = max_key(*biggest, key);
        if key >= pivot {
            right -= 1;
            arr.swap(left, right);
        } else {
            left += 1;
        }
    }
    (left, right)
}

/// Writes the lanes of `curr` below the pivot at `l_store` and the rest just below `r_store`.
///
/// Returns the number of lanes `>= pivot`.
#[inline(always)]
fn partition_vec<V: VecType>(
    arr: &mut [V::Key],
    l_store: usize,
    r_store: usize,
    curr: V::Reg,
    pivot_vec: V::Reg,
    min_vec: &mut V::Reg,
    max_vec: &mut V::Reg,
) -> usize {
    let ge_mask = V::ge(curr, pivot_vec);
    let amount_ge_pivot = V::popcount(ge_mask);
    V::mask_compressstoreu(&mut arr[l_store..], V::knot(ge_mask), curr);
    V::mask_compressstoreu(&mut arr[r_store - amount_ge_pivot..], ge_mask, curr);
    *min_vec = V::min(curr, *min_vec);
    *max_vec = V::max(curr, *max_vec);
    amount_ge_pivot
}

/// Partitions all of `arr` one register at a time.
pub(crate) fn partition<V: VecType>(
    arr: &mut [V::Key],
    pivot: V::Key,
    smallest: &mut V::Key,
    biggest: &mut V::Key,
) -> usize {
    let (mut left, mut right) = align_to_lanes::<V>(arr, pivot, smallest, biggest);
    if left == right {
        return left;
    }

    let lanes = V::LANES;
    let pivot_vec = V::set1(pivot);
    let mut min_vec = V::set1(*smallest);
    let mut max_vec = V::set1(*biggest);

    if right - left == lanes {
        let curr = V::loadu(&arr[left..]);
        let amount_ge_pivot = partition_vec::<V>(arr, left, right, curr, pivot_vec, &mut min_vec, &mut max_vec);
        *smallest = V::reducemin(min_vec);
        *biggest = V::reducemax(max_vec);
        return right - amount_ge_pivot;
    }

    // The outermost registers are partitioned last; their slots are the initial free space.
    let vec_left = V::loadu(&arr[left..]);
    let vec_right = V::loadu(&arr[right - lanes..]);

    // [start, l_store) is < pivot and [l_store + unpartitioned, end) is >= pivot
    let mut l_store = left;
    let mut unpartitioned = right - left;
    left += lanes;
    right -= lanes;

    while left < right {
        // load from whichever side has fewer free slots
        let curr = if l_store + unpartitioned - right < left - l_store {
            right -= lanes;
            V::loadu(&arr[right..])
        } else {
            let curr = V::loadu(&arr[left..]);
            left += lanes;
            curr
        };
        let amount_ge_pivot =
            partition_vec::<V>(arr, l_store, l_store + unpartitioned, curr, pivot_vec, &mut min_vec, &mut max_vec);
        l_store += lanes - amount_ge_pivot;
        unpartitioned -= lanes;
    }

    for curr in [vec_left, vec_right] {
        let amount_ge_pivot =
            partition_vec::<V>(arr, l_store, l_store + unpartitioned, curr, pivot_vec, &mut min_vec, &mut max_vec);
        l_store += lanes - amount_ge_pivot;
        unpartitioned -= lanes;
    }

    *smallest = V::reducemin(min_vec);
    *biggest = V::reducemax(max_vec);
    l_store
}

/// Partitions `arr` `V::UNROLL` registers at a time.
///
/// Windows shorter than two groups go through [`partition`]. Registers left over after dividing
/// the window into groups are partitioned first through a stack buffer.
pub(crate) fn partition_unrolled<V: VecType>(
    arr: &mut [V::Key],
    pivot: V::Key,
    smallest: &mut V::Key,
    biggest: &mut V::Key,
) -> usize {
    let unroll = V::UNROLL;
    let lanes = V::LANES;
    debug_assert!(unroll <= MAX_UNROLL);
    if unroll == 0 || arr.len() < 2 * unroll * lanes {
        return partition::<V>(arr, pivot, smallest, biggest);
    }

    let (left, right) = align_to_lanes::<V>(arr, pivot, smallest, biggest);
    let pivot_vec = V::set1(pivot);
    let mut min_vec = V::set1(*smallest);
    let mut max_vec = V::set1(*biggest);

    let leftover = ((right - left) / lanes) % unroll;
    debug_assert!(leftover * lanes <= PARTITION_BUFFER_LEN);
    let mut buffer = [V::type_max(); PARTITION_BUFFER_LEN];
    let mut buffered = 0;
    let mut left_store = left;
    for i in 0..leftover {
        let curr = V::loadu(&arr[left + i * lanes..]);
        let ge_mask = V::ge(curr, pivot_vec);
        let amount_ge_pivot = V::popcount(ge_mask);
        V::mask_compressstoreu(&mut arr[left_store..], V::knot(ge_mask), curr);
        V::mask_compressstoreu(&mut buffer[buffered..], ge_mask, curr);
        left_store += lanes - amount_ge_pivot;
        buffered += amount_ge_pivot;
        min_vec = V::min(curr, min_vec);
        max_vec = V::max(curr, max_vec);
    }
    // the buffered keys take over the tail, whose keys fill the gap left by the preamble
    arr.copy_within(right - buffered..right, left_store);
    arr[right - buffered..right].copy_from_slice(&buffer[..buffered]);

    let (mut left, mut right) = (left_store, right - buffered);
    let block = unroll * lanes;
    // at least 2·U registers were aligned and only regs % U went to the preamble
    debug_assert!(right - left >= 2 * block);

    let mut vec_left = [pivot_vec; MAX_UNROLL];
    let mut vec_right = [pivot_vec; MAX_UNROLL];
    for (i, (vl, vr)) in vec_left.iter_mut().zip(vec_right.iter_mut()).take(unroll).enumerate() {
        *vl = V::loadu(&arr[left + i * lanes..]);
        *vr = V::loadu(&arr[right - block + i * lanes..]);
    }

    let mut l_store = left;
    let mut unpartitioned = right - left;
    left += block;
    right -= block;

    let mut curr = [pivot_vec; MAX_UNROLL];
    while left < right {
        let start = if l_store + unpartitioned - right < left - l_store {
            right -= block;
            right
        } else {
            left += block;
            left - block
        };
        for (i, reg) in curr[..unroll].iter_mut().enumerate() {
            *reg = V::loadu(&arr[start + i * lanes..]);
        }
        for reg in &curr[..unroll] {
            let amount_ge_pivot =
                partition_vec::<V>(arr, l_store, l_store + unpartitioned, *reg, pivot_vec, &mut min_vec, &mut max_vec);
            l_store += lanes - amount_ge_pivot;
            unpartitioned -= lanes;
        }
    }

    for reg in vec_left[..unroll].iter().chain(&vec_right[..unroll]) {
        let amount_ge_pivot =
            partition_vec::<V>(arr, l_store, l_store + unpartitioned, *reg, pivot_vec, &mut min_vec, &mut max_vec);
        l_store += lanes - amount_ge_pivot;
        unpartitioned -= lanes;
    }

    *smallest = V::reducemin(min_vec);
    *biggest = V::reducemax(max_vec);
    l_store
}

#[allow(clippy::too_many_arguments)]
#[inline(always)]
fn partition_vec_kv<V: VecType, W: VecType<OpMask = V::OpMask>>(
    keys: &mut [V::Key],
    indexes: &mut [W::Key],
    l_store: usize,
    r_store: usize,
    key_reg: V::Reg,
    index_reg: W::Reg,
    pivot_vec: V::Reg,
    min_vec: &mut V::Reg,
    max_vec: &mut V::Reg,
) -> usize {
    let ge_mask = V::ge(key_reg, pivot_vec);
    let lt_mask = V::knot(ge_mask);
    let amount_ge_pivot = V::popcount(ge_mask);
    V::mask_compressstoreu(&mut keys[l_store..], lt_mask, key_reg);
    W::mask_compressstoreu(&mut indexes[l_store..], lt_mask, index_reg);
    V::mask_compressstoreu(&mut keys[r_store - amount_ge_pivot..], ge_mask, key_reg);
    W::mask_compressstoreu(&mut indexes[r_store - amount_ge_pivot..], ge_mask, index_reg);
    *min_vec = V::min(key_reg, *min_vec);
    *max_vec = V::max(key_reg, *max_vec);
    amount_ge_pivot
}

/// Partitions `keys` like [`partition`], applying the same permutation to `indexes`.
///
/// Both packs must have the same lane count and the slices the same length.
pub(crate) fn partition_kv<V: VecType, W: VecType<OpMask = V::OpMask>>(
    keys: &mut [V::Key],
    indexes: &mut [W::Key],
    pivot: V::Key,
    smallest: &mut V::Key,
    biggest: &mut V::Key,
) -> usize {
    debug_assert_eq!(V::LANES, W::LANES);
    debug_assert_eq!(keys.len(), indexes.len());
    let lanes = V::LANES;

    let (mut left, mut right) = (0, keys.len());
    while (right - left) % lanes != 0 {
        let key = keys[left];
        *smallest = min_key(*smallest, key);
        *biggest = max_key(*biggest, key);
        if key >= pivot {
            right -= 1;
            keys.swap(left, right);
            indexes.swap(left, right);
        } else {
            left += 1;
        }
    }
    if left == right {
        return left;
    }

    let pivot_vec = V::set1(pivot);
    let mut min_vec = V::set1(*smallest);
    let mut max_vec = V::set1(*biggest);

    let key_left = V::loadu(&keys[left..]);
    let index_left = W::loadu(&indexes[left..]);
    if right - left == lanes {
        let amount_ge_pivot = partition_vec_kv::<V, W>(
            keys, indexes, left, right, key_left, index_left, pivot_vec, &mut min_vec, &mut max_vec,
        );
        *smallest = V::reducemin(min_vec);
        *biggest = V::reducemax(max_vec);
        return right - amount_ge_pivot;
    }
    let key_right = V::loadu(&keys[right - lanes..]);
    let index_right = W::loadu(&indexes[right - lanes..]);

    let mut l_store = left;
    let mut unpartitioned = right - left;
    left += lanes;
    right -= lanes;

    while left < right {
        let start = if l_store + unpartitioned - right < left - l_store {
            right -= lanes;
            right
        } else {
            left += lanes;
            left - lanes
        };
        let key_reg = V::loadu(&keys[start..]);
        let index_reg = W::loadu(&indexes[start..]);
        let amount_ge_pivot = partition_vec_kv::<V, W>(
            keys,
            indexes,
            l_store,
            l_store + unpartitioned,
            key_reg,
            index_reg,
            pivot_vec,
            &mut min_vec,
            &mut max_vec,
        );
        l_store += lanes - amount_ge_pivot;
        unpartitioned -= lanes;
    }

    for (key_reg, index_reg) in [(key_left, index_left), (key_right, index_right)] {
        let amount_ge_pivot = partition_vec_kv::<V, W>(
            keys,
            indexes,
            l_store,
            l_store + unpartitioned,
            key_reg,
            index_reg,
            pivot_vec,
            &mut min_vec,
            &mut max_vec,
        );
        l_store += lanes - amount_ge_pivot;
        unpartitioned -= lanes;
    }

    *smallest = V::reducemin(min_vec);
    *biggest = V::reducemax(max_vec);
    l_store
}
