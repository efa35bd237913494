// The register pack every algorithm in this crate is written against, one impl per register type.

use std::fmt::Debug;

use crate::key::SortKey;

pub trait VecType {
    type Key: SortKey;
    type Reg: Copy;
    type OpMask: Copy + Eq + Debug;

    const LANES: usize;
    /// Largest subrange handed to the bitonic network instead of being partitioned.
    const NETWORK_THRESHOLD: usize;
    /// Registers partitioned per loop iteration; zero disables the unrolled kernel.
    const UNROLL: usize;

    #[inline(always)]
    fn type_max() -> Self::Key {
        Self::Key::MAX
    }

    #[inline(always)]
    fn type_min() -> Self::Key {
        Self::Key::MIN
    }

    #[inline(always)]
    fn zmm_max() -> Self::Reg {
        Self::set1(Self::type_max())
    }

    fn loadu(src: &[Self::Key]) -> Self::Reg;
    fn storeu(dst: &mut [Self::Key], reg: Self::Reg);
    /// Lanes outside `mask` read as `type_max`. `src` may be shorter than `LANES` as long as
    /// every lane in `mask` is in bounds; the native packs panic otherwise.
    fn maskz_loadu(mask: Self::OpMask, src: &[Self::Key]) -> Self::Reg;
    fn mask_storeu(dst: &mut [Self::Key], mask: Self::OpMask, reg: Self::Reg);
    /// Writes the lanes selected by `mask` contiguously to the front of `dst`.
    fn mask_compressstoreu(dst: &mut [Self::Key], mask: Self::OpMask, reg: Self::Reg);

    fn min(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn max(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    fn ge(a: Self::Reg, b: Self::Reg) -> Self::OpMask;
    fn eq(a: Self::Reg, b: Self::Reg) -> Self::OpMask;
    fn knot(mask: Self::OpMask) -> Self::OpMask;
    fn popcount(mask: Self::OpMask) -> usize;

    fn set1(value: Self::Key) -> Self::Reg;

    fn reducemin(reg: Self::Reg) -> Self::Key;
    fn reducemax(reg: Self::Reg) -> Self::Key;

    /// Lanes in any of the `vfpclass` categories selected by `IMM`. Always empty for integers.
    fn fpclass<const IMM: i32>(reg: Self::Reg) -> Self::OpMask;

    /// Mask with the low `n` lanes set, `n < LANES`.
    fn get_partial_loadmask(n: usize) -> Self::OpMask;

    fn sort_vec(reg: Self::Reg) -> Self::Reg;
    fn reverse(reg: Self::Reg) -> Self::Reg;
    /// Sorts a register whose lanes form a bitonic sequence.
    fn bitonic_merge_vec(reg: Self::Reg) -> Self::Reg;
}

/// COEX: compare and exchange two registers lane-wise.
#[inline(always)]
pub(crate) fn coex<V: VecType>(a: &mut V::Reg, b: &mut V::Reg) {
    let temp = *a;
    *a = V::min(*a, *b);
    *b = V::max(temp, *b);
}

/// Whether lane `i` keeps the larger key in the bitonic step comparing lanes `j` apart inside
/// blocks of `k` lanes. Blocks alternate direction; pass `k = 0` for an all-ascending step.
#[inline(always)]
pub(crate) const fn takes_max(i: usize, j: usize, k: usize) -> bool {
    (i & j != 0) != (i & k != 0)
}

// Scalar min/max pairing that always returns both inputs, even when they are unordered.
#[inline(always)]
pub(crate) fn min_key<T: PartialOrd>(a: T, b: T) -> T {
    if b < a {
        b
    } else {
        a
    }
}

#[inline(always)]
pub(crate) fn max_key<T: PartialOrd>(a: T, b: T) -> T {
    if b < a {
        a
    } else {
        b
    }
}
