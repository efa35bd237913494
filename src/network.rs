use crate::vtype::{coex, VecType};
use crate::MAX_NETWORK_REGS;

/// Sorts `arr` (at most `V::NETWORK_THRESHOLD` keys) with a bitonic network over registers.
///
/// The keys are loaded into a power-of-two number of registers with the tail padded by
/// `type_max`, so the padding sorts to the end and is never stored back.
pub(crate) fn sort_n<V: VecType>(arr: &mut [V::Key]) {
    let n = arr.len();
    debug_assert!(n <= V::NETWORK_THRESHOLD);
    if n <= 1 {
        return;
    }

    let num_regs = n.div_ceil(V::LANES).next_power_of_two();
    debug_assert!(num_regs <= MAX_NETWORK_REGS);
    let mut storage = [V::zmm_max(); MAX_NETWORK_REGS];
    let regs = &mut storage[..num_regs];

    for (reg, chunk) in regs.iter_mut().zip(arr.chunks(V::LANES)) {
        *reg = if chunk.len() == V::LANES {
            V::loadu(chunk)
        } else {
            V::maskz_loadu(V::get_partial_loadmask(chunk.len()), chunk)
        };
    }
    for reg in regs.iter_mut() {
        *reg = V::sort_vec(*reg);
    }

    // Merge sorted runs of `width` registers pairwise until one run remains.
    let mut width = 1;
    while width < num_regs {
        for block in regs.chunks_mut(2 * width) {
            let (lo, hi) = block.split_at_mut(width);
            hi.reverse();
            for (a, b) in lo.iter_mut().zip(hi.iter_mut()) {
                *b = V::reverse(*b);
                coex::<V>(a, b);
            }
            for half in block.chunks_mut(width) {
                merge_bitonic_regs::<V>(half);
            }
        }
        width *= 2;
    }

    for (chunk, reg) in arr.chunks_mut(V::LANES).zip(regs.iter()) {
        if chunk.len() == V::LANES {
            V::storeu(chunk, *reg);
        } else {
            V::mask_storeu(chunk, V::get_partial_loadmask(chunk.len()), *reg);
        }
    }
}

/// Sorts a power-of-two run of registers that together hold a bitonic sequence.
fn merge_bitonic_regs<V: VecType>(regs: &mut [V::Reg]) {
    let mut dist = regs.len() / 2;
    while dist > 0 {
        for block in regs.chunks_mut(2 * dist) {
            let (lo, hi) = block.split_at_mut(dist);
            for (a, b) in lo.iter_mut().zip(hi.iter_mut()) {
                coex::<V>(a, b);
            }
        }
        dist /= 2;
    }
    for reg in regs.iter_mut() {
        *reg = V::bitonic_merge_vec(*reg);
    }
}
