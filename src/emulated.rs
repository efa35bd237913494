use std::marker::PhantomData;

use crate::key::SortKey;
use crate::vtype::{max_key, min_key, takes_max, VecType};

/// Portable pack: a register is `[T; N]` and an opmask is a `u64` with one bit per lane.
///
/// `N` must be a power of two no larger than 64. Used for every key type on targets without
/// AVX-512, and for 16-bit keys everywhere.
#[derive(Debug, Clone, Copy)]
pub struct Emulated<T, const N: usize>(PhantomData<T>);

impl<T: SortKey, const N: usize> Emulated<T, N> {
    const FULL_MASK: u64 = if N == 64 { u64::MAX } else { (1 << N) - 1 };

    #[inline(always)]
    fn lane(mask: u64, i: usize) -> bool {
        mask & (1 << i) != 0
    }

    #[inline(always)]
    fn network_step(reg: &mut [T; N], k: usize, j: usize) {
        for i in 0..N {
            let partner = i ^ j;
            if partner > i {
                let (lo, hi) = (min_key(reg[i], reg[partner]), max_key(reg[i], reg[partner]));
                if takes_max(i, j, k) {
                    (reg[i], reg[partner]) = (hi, lo);
                } else {
                    (reg[i], reg[partner]) = (lo, hi);
                }
            }
        }
    }
}

impl<T: SortKey, const N: usize> VecType for Emulated<T, N> {
    type Key = T;
    type Reg = [T; N];
    type OpMask = u64;

    const LANES: usize = N;
    const NETWORK_THRESHOLD: usize = if N >= 8 { 128 } else { 16 * N };
    const UNROLL: usize = if N >= 8 { 64 / N } else { 8 };

    #[inline(always)]
    fn loadu(src: &[T]) -> [T; N] {
        let mut reg = [T::MAX; N];
        reg.copy_from_slice(&src[..N]);
        reg
    }

    #[inline(always)]
    fn storeu(dst: &mut [T], reg: [T; N]) {
        dst[..N].copy_from_slice(&reg);
    }

    #[inline(always)]
    fn maskz_loadu(mask: u64, src: &[T]) -> [T; N] {
        let mut reg = [T::MAX; N];
        for (i, lane) in reg.iter_mut().enumerate() {
            if Self::lane(mask, i) {
                *lane = src[i];
            }
        }
        reg
    }

    #[inline(always)]
    fn mask_storeu(dst: &mut [T], mask: u64, reg: [T; N]) {
        for (i, value) in reg.into_iter().enumerate() {
            if Self::lane(mask, i) {
                dst[i] = value;
            }
        }
    }

    #[inline(always)]
    fn mask_compressstoreu(dst: &mut [T], mask: u64, reg: [T; N]) {
        debug_assert!(dst.len() >= Self::popcount(mask));
        let selected = reg.into_iter().enumerate().filter(|(i, _)| Self::lane(mask, *i));
        for (slot, (_, value)) in dst.iter_mut().zip(selected) {
            *slot = value;
        }
    }

    #[inline(always)]
    fn min(a: [T; N], b: [T; N]) -> [T; N] {
        std::array::from_fn(|i| min_key(a[i], b[i]))
    }

    #[inline(always)]
    fn max(a: [T; N], b: [T; N]) -> [T; N] {
        std::array::from_fn(|i| max_key(a[i], b[i]))
    }

    #[inline(always)]
    fn ge(a: [T; N], b: [T; N]) -> u64 {
        (0..N).filter(|&i| a[i] >= b[i]).fold(0, |mask, i| mask | (1 << i))
    }

    #[inline(always)]
    fn eq(a: [T; N], b: [T; N]) -> u64 {
        (0..N).filter(|&i| a[i] == b[i]).fold(0, |mask, i| mask | (1 << i))
    }

    #[inline(always)]
    fn knot(mask: u64) -> u64 {
        !mask & Self::FULL_MASK
    }

    #[inline(always)]
    fn popcount(mask: u64) -> usize {
        mask.count_ones() as usize
    }

    #[inline(always)]
    fn set1(value: T) -> [T; N] {
        [value; N]
    }

    #[inline(always)]
    fn reducemin(reg: [T; N]) -> T {
        reg.into_iter().fold(T::MAX, min_key)
    }

    #[inline(always)]
    fn reducemax(reg: [T; N]) -> T {
        reg.into_iter().fold(T::MIN, max_key)
    }

    #[inline(always)]
    fn fpclass<const IMM: i32>(reg: [T; N]) -> u64 {
        (0..N).filter(|&i| reg[i].fpclass(IMM)).fold(0, |mask, i| mask | (1 << i))
    }

    #[inline(always)]
    fn get_partial_loadmask(n: usize) -> u64 {
        debug_assert!(n < N);
        (1 << n) - 1
    }

    fn sort_vec(mut reg: [T; N]) -> [T; N] {
        let mut k = 2;
        while k <= N {
            let mut j = k / 2;
            while j > 0 {
                Self::network_step(&mut reg, k, j);
                j /= 2;
            }
            k *= 2;
        }
        reg
    }

    #[inline(always)]
    fn reverse(mut reg: [T; N]) -> [T; N] {
        reg.reverse();
        reg
    }

    fn bitonic_merge_vec(mut reg: [T; N]) -> [T; N] {
        let mut j = N / 2;
        while j > 0 {
            Self::network_step(&mut reg, 0, j);
            j /= 2;
        }
        reg
    }
}
