use crate::key::{SimdSortable, SortKey, FPCLASS_NAN};
use crate::vtype::VecType;

/// Loads one chunk of at most `LANES` keys, padding the tail with `type_max`.
#[inline(always)]
fn load_chunk<V: VecType>(chunk: &[V::Key]) -> V::Reg {
    if chunk.len() == V::LANES {
        V::loadu(chunk)
    } else {
        V::maskz_loadu(V::get_partial_loadmask(chunk.len()), chunk)
    }
}

/// Overwrites every NaN with `type_max` (+∞) and returns how many there were.
pub(crate) fn replace_nan_with_inf<V: VecType>(arr: &mut [V::Key]) -> usize {
    let mut nan_count = 0;
    for chunk in arr.chunks_mut(V::LANES) {
        let nan_mask = V::fpclass::<FPCLASS_NAN>(load_chunk::<V>(chunk));
        nan_count += V::popcount(nan_mask);
        V::mask_storeu(chunk, nan_mask, V::zmm_max());
    }
    nan_count
}

/// Writes a quiet NaN over the last `nan_count` keys of a sorted slice.
pub(crate) fn replace_inf_with_nan<T: SortKey>(arr: &mut [T], nan_count: usize) {
    for slot in arr.iter_mut().rev().take(nan_count) {
        *slot = T::quiet_nan();
    }
}

/// Moves every NaN behind the other keys and returns the number of keys that are not NaN.
pub(crate) fn move_nans_to_end<T: SortKey>(arr: &mut [T]) -> usize {
    let mut end = arr.len();
    let mut i = 0;
    while i < end {
        if arr[i].is_nan() {
            end -= 1;
            arr.swap(i, end);
        } else {
            i += 1;
        }
    }
    end
}

/// Returns whether `arr` holds a NaN. Always `false` for integer keys.
///
/// Useful for picking the `hasnan` flag of [`crate::select`] and [`crate::partial_sort`].
pub fn has_nan<T: SimdSortable>(arr: &[T]) -> bool {
    if !T::IS_FLOAT {
        return false;
    }
    arr.chunks(<T::Vtype as VecType>::LANES).any(|chunk| {
        let nan_mask = <T::Vtype as VecType>::fpclass::<FPCLASS_NAN>(load_chunk::<T::Vtype>(chunk));
        <T::Vtype as VecType>::popcount(nan_mask) != 0
    })
}
