use crate::total_order::TotalOrder;
use crate::vtype::VecType;
use crate::MAX_LANES;

// below this the block sampler costs more than it saves
const BLOCK_SAMPLER_MIN_LEN: usize = 1024;

/// Median of `LANES` keys sampled at an even stride across `arr`.
///
/// `arr` must be longer than `LANES`; the drivers only sample ranges above the network
/// threshold.
pub(crate) fn get_pivot<V: VecType>(arr: &[V::Key]) -> V::Key {
    let lanes = V::LANES;
    debug_assert!(arr.len() > lanes);
    let stride = (arr.len() - 1) / lanes;

    let mut samples = [V::type_max(); MAX_LANES];
    for (i, sample) in samples[..lanes].iter_mut().enumerate() {
        *sample = arr[stride * (i + 1)];
    }

    match lanes {
        8 | 16 | 32 => {
            let sorted = V::sort_vec(V::loadu(&samples));
            middle_lane::<V>(sorted)
        }
        _ => {
            let samples = &mut samples[..lanes];
            samples.sort_unstable_by_key(TotalOrder::to_total_order);
            samples[lanes / 2]
        }
    }
}

/// Median of the lane-wise medians of five registers spread across `arr`.
///
/// Falls back to [`get_pivot`] for ranges of up to 1024 keys.
pub(crate) fn get_pivot_blocks<V: VecType>(arr: &[V::Key]) -> V::Key {
    if arr.len() <= BLOCK_SAMPLER_MIN_LEN {
        return get_pivot::<V>(arr);
    }

    let delta = (arr.len() - 1 - V::LANES) / 5;
    let mut regs: [V::Reg; 5] = std::array::from_fn(|i| V::loadu(&arr[delta * i..]));

    // optimal 5-input sorting network, applied lane-wise
    for (a, b) in [(0, 3), (1, 4), (0, 2), (1, 3), (0, 1), (2, 4), (1, 2), (3, 4), (2, 3)] {
        let (lo, hi) = (regs[a], regs[b]);
        regs[a] = V::min(lo, hi);
        regs[b] = V::max(lo, hi);
    }

    middle_lane::<V>(V::sort_vec(regs[2]))
}

#[inline]
fn middle_lane<V: VecType>(reg: V::Reg) -> V::Key {
    let mut lanes = [V::type_max(); MAX_LANES];
    V::storeu(&mut lanes, reg);
    lanes[V::LANES / 2]
}
