// Hybrid quicksort over SIMD packs, after the AVX-512 quicksort of x86-simd-sort.
// See https://arxiv.org/abs/2205.05982
// and https://github.com/intel/x86-simd-sort

use log::{debug, trace};

use crate::error::{Result, SortError};
use crate::key::{IndexType, SimdSortable};
use crate::nan::{move_nans_to_end, replace_inf_with_nan, replace_nan_with_inf};
use crate::network::sort_n;
use crate::partition::{partition_kv, partition_unrolled};
use crate::pivot::{get_pivot, get_pivot_blocks};
use crate::total_order::TotalOrder;
use crate::vtype::VecType;

/// Recursion budget for a range of `len > 1` keys.
#[inline]
fn depth_budget(len: usize) -> u32 {
    2 * len.ilog2()
}

fn qsort_<V: VecType>(arr: &mut [V::Key], max_iters: u32) {
    if max_iters == 0 {
        debug!("depth budget exhausted, falling back to scalar sort of {} keys", arr.len());
        arr.sort_unstable_by_key(TotalOrder::to_total_order);
        return;
    }
    if arr.len() <= V::NETWORK_THRESHOLD {
        sort_n::<V>(arr);
        return;
    }

    let pivot = get_pivot_blocks::<V>(arr);
    let mut smallest = V::type_max();
    let mut biggest = V::type_min();
    let p = partition_unrolled::<V>(arr, pivot, &mut smallest, &mut biggest);

    let (left, right) = arr.split_at_mut(p);
    if pivot != smallest {
        qsort_::<V>(left, max_iters - 1);
    }
    if pivot != biggest {
        qsort_::<V>(right, max_iters - 1);
    }
}

fn qselect_<V: VecType>(arr: &mut [V::Key], pos: usize, max_iters: u32) {
    if max_iters == 0 {
        debug!("depth budget exhausted, falling back to scalar select in {} keys", arr.len());
        arr.select_nth_unstable_by_key(pos, TotalOrder::to_total_order);
        return;
    }
    if arr.len() <= V::NETWORK_THRESHOLD {
        sort_n::<V>(arr);
        return;
    }

    let pivot = get_pivot::<V>(arr);
    let mut smallest = V::type_max();
    let mut biggest = V::type_min();
    let p = partition_unrolled::<V>(arr, pivot, &mut smallest, &mut biggest);

    let (left, right) = arr.split_at_mut(p);
    if pivot != smallest && pos < p {
        qselect_::<V>(left, pos, max_iters - 1);
    } else if pivot != biggest && pos >= p {
        qselect_::<V>(right, pos - p, max_iters - 1);
    }
}

/// Sorts `arr` in non-decreasing order.
///
/// For floats every NaN ends up at the tail; NaN payloads and the relative order of `-0.0`
/// and `+0.0` are not preserved.
pub fn sort<T: SimdSortable>(arr: &mut [T]) {
    if arr.len() <= 1 {
        return;
    }

    if T::IS_FLOAT {
        let nan_count = replace_nan_with_inf::<T::Vtype>(arr);
        trace!("sorting {} keys, {} NaN", arr.len(), nan_count);
        qsort_::<T::Vtype>(arr, depth_budget(arr.len()));
        replace_inf_with_nan(arr, nan_count);
    } else {
        trace!("sorting {} keys", arr.len());
        qsort_::<T::Vtype>(arr, depth_budget(arr.len()));
    }
}

/// Moves the key of rank `k` to `arr[k]`, with no larger key before it and no smaller key
/// after it.
///
/// Pass `hasnan = true` when a float slice may hold NaNs; they are then ranked above every
/// other key. With `hasnan = false` a slice holding NaNs ends up in an unspecified order.
pub fn select<T: SimdSortable>(arr: &mut [T], k: usize, hasnan: bool) -> Result<()> {
    let len = arr.len();
    if k >= len {
        return Err(SortError::IndexOutOfBounds { index: k, len });
    }

    let end = if T::IS_FLOAT && hasnan {
        move_nans_to_end(arr)
    } else {
        len
    };
    trace!("selecting rank {} of {} keys, {} NaN", k, len, len - end);

    if k < end && end > 1 {
        qselect_::<T::Vtype>(&mut arr[..end], k, depth_budget(end));
    }
    Ok(())
}

/// Sorts the `k` smallest keys into `arr[..k]`; the rest of `arr` is left in any order.
pub fn partial_sort<T: SimdSortable>(arr: &mut [T], k: usize, hasnan: bool) -> Result<()> {
    let len = arr.len();
    if k > len {
        return Err(SortError::IndexOutOfBounds { index: k, len });
    }
    if k == 0 {
        return Ok(());
    }

    select(arr, k - 1, hasnan)?;
    sort(&mut arr[..k - 1]);
    Ok(())
}

/// Partitions `keys` around `pivot`, moving each entry of `indexes` along with its key.
///
/// Returns `p` such that `keys[..p] < pivot <= keys[p..]`. Keys must not be NaN.
pub fn key_value_partition<K, I>(keys: &mut [K], indexes: &mut [I], pivot: K) -> Result<usize>
where
    K: SimdSortable,
    I: IndexType,
    I::Vtype: VecType<OpMask = <K::Vtype as VecType>::OpMask>,
{
    if keys.len() != indexes.len() {
        return Err(SortError::LengthMismatch {
            keys: keys.len(),
            indexes: indexes.len(),
        });
    }
    let key_lanes = <K::Vtype as VecType>::LANES;
    let index_lanes = <I::Vtype as VecType>::LANES;
    if key_lanes != index_lanes {
        return Err(SortError::LaneMismatch { key_lanes, index_lanes });
    }

    let mut smallest = K::MAX;
    let mut biggest = K::MIN;
    Ok(partition_kv::<K::Vtype, I::Vtype>(keys, indexes, pivot, &mut smallest, &mut biggest))
}
