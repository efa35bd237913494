// Native AVX-512 packs for 32 and 64-bit keys, compiled under the `has_avx512` cfg from build.rs.
// Every raw pointer comes from a slice bounds checked against the lanes it touches.

use std::arch::x86_64::*;

use crate::vtype::{takes_max, VecType};

#[inline(always)]
unsafe fn cmpge_pd(a: __m512d, b: __m512d) -> __mmask8 {
    _mm512_cmp_pd_mask::<_CMP_GE_OQ>(a, b)
}

#[inline(always)]
unsafe fn cmpeq_pd(a: __m512d, b: __m512d) -> __mmask8 {
    _mm512_cmp_pd_mask::<_CMP_EQ_OQ>(a, b)
}

#[inline(always)]
unsafe fn cmpge_ps(a: __m512, b: __m512) -> __mmask16 {
    _mm512_cmp_ps_mask::<_CMP_GE_OQ>(a, b)
}

#[inline(always)]
unsafe fn cmpeq_ps(a: __m512, b: __m512) -> __mmask16 {
    _mm512_cmp_ps_mask::<_CMP_EQ_OQ>(a, b)
}

#[inline(always)]
unsafe fn fpclass_pd<const IMM: i32>(reg: __m512d) -> __mmask8 {
    _mm512_fpclass_pd_mask::<IMM>(reg)
}

#[inline(always)]
unsafe fn fpclass_ps<const IMM: i32>(reg: __m512) -> __mmask16 {
    _mm512_fpclass_ps_mask::<IMM>(reg)
}

// integers never match a float class
#[inline(always)]
unsafe fn fpclass_epi64<const IMM: i32>(_reg: __m512i) -> __mmask8 {
    0
}

#[inline(always)]
unsafe fn fpclass_epi32<const IMM: i32>(_reg: __m512i) -> __mmask16 {
    0
}

macro_rules! zmm_vector {
    (
        $(#[$attr:meta])*
        $name:ident {
            key: $key:ty,
            lane: $lane:ty,
            index: $index:ty,
            reg: $reg:ty,
            mask: $mask:ty,
            lanes: $lanes:literal,
            unroll: $unroll:literal,
            loadu: $loadu:ident,
            storeu: $storeu:ident,
            mask_loadu: $mask_loadu:ident,
            mask_storeu: $mask_storeu:ident,
            compressstoreu: $compressstoreu:ident,
            min: $min:ident,
            max: $max:ident,
            ge: $ge:ident,
            eq: $eq:ident,
            set1: $set1:ident,
            reduce_min: $reduce_min:ident,
            reduce_max: $reduce_max:ident,
            permutexvar: $permutexvar:ident,
            mask_mov: $mask_mov:ident,
            fpclass: $fpclass:ident,
            sort_steps: [$(($sk:literal, $sj:literal)),* $(,)?],
            merge_steps: [$($mj:literal),* $(,)?] $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl $name {
            const REVERSE_INDEX: [$index; $lanes] = {
                let mut idx = [0 as $index; $lanes];
                let mut i = 0;
                while i < $lanes {
                    idx[i] = ($lanes - 1 - i) as $index;
                    i += 1;
                }
                idx
            };

            const fn partner_index(j: usize) -> [$index; $lanes] {
                let mut idx = [0 as $index; $lanes];
                let mut i = 0;
                while i < $lanes {
                    idx[i] = (i ^ j) as $index;
                    i += 1;
                }
                idx
            }

            const fn max_lanes(k: usize, j: usize) -> $mask {
                let mut mask: $mask = 0;
                let mut i = 0;
                while i < $lanes {
                    if takes_max(i, j, k) {
                        mask |= 1 << i;
                    }
                    i += 1;
                }
                mask
            }

            #[inline(always)]
            fn load_index(idx: &[$index; $lanes]) -> __m512i {
                unsafe { _mm512_loadu_si512(idx.as_ptr().cast()) }
            }

            // one compare-exchange stage of the network, tables built at compile time
            #[inline(always)]
            fn network_step<const K: usize, const J: usize>(reg: $reg) -> $reg {
                let partner_index = const { Self::partner_index(J) };
                let max_lanes = const { Self::max_lanes(K, J) };
                unsafe {
                    let partner = $permutexvar(Self::load_index(&partner_index), reg);
                    $mask_mov($min(reg, partner), max_lanes, $max(reg, partner))
                }
            }

            // every selected lane must lie inside the slice
            #[inline(always)]
            fn mask_fits(mask: $mask, len: usize) -> bool {
                (<$mask>::BITS - mask.leading_zeros()) as usize <= len
            }
        }

        impl VecType for $name {
            type Key = $key;
            type Reg = $reg;
            type OpMask = $mask;

            const LANES: usize = $lanes;
            const NETWORK_THRESHOLD: usize = 128;
            const UNROLL: usize = $unroll;

            #[inline(always)]
            fn loadu(src: &[$key]) -> $reg {
                let src = &src[..$lanes];
                unsafe { $loadu(src.as_ptr().cast()) }
            }

            #[inline(always)]
            fn storeu(dst: &mut [$key], reg: $reg) {
                let dst = &mut dst[..$lanes];
                unsafe { $storeu(dst.as_mut_ptr().cast(), reg) }
            }

            #[inline(always)]
            fn maskz_loadu(mask: $mask, src: &[$key]) -> $reg {
                assert!(Self::mask_fits(mask, src.len()));
                unsafe { $mask_loadu(Self::zmm_max(), mask, src.as_ptr().cast()) }
            }

            #[inline(always)]
            fn mask_storeu(dst: &mut [$key], mask: $mask, reg: $reg) {
                assert!(Self::mask_fits(mask, dst.len()));
                unsafe { $mask_storeu(dst.as_mut_ptr().cast(), mask, reg) }
            }

            #[inline(always)]
            fn mask_compressstoreu(dst: &mut [$key], mask: $mask, reg: $reg) {
                let dst = &mut dst[..Self::popcount(mask)];
                unsafe { $compressstoreu(dst.as_mut_ptr().cast(), mask, reg) }
            }

            #[inline(always)]
            fn min(a: $reg, b: $reg) -> $reg {
                unsafe { $min(a, b) }
            }

            #[inline(always)]
            fn max(a: $reg, b: $reg) -> $reg {
                unsafe { $max(a, b) }
            }

            #[inline(always)]
            fn ge(a: $reg, b: $reg) -> $mask {
                unsafe { $ge(a, b) }
            }

            #[inline(always)]
            fn eq(a: $reg, b: $reg) -> $mask {
                unsafe { $eq(a, b) }
            }

            #[inline(always)]
            fn knot(mask: $mask) -> $mask {
                !mask
            }

            #[inline(always)]
            fn popcount(mask: $mask) -> usize {
                mask.count_ones() as usize
            }

            #[inline(always)]
            fn set1(value: $key) -> $reg {
                unsafe { $set1(value as $lane) }
            }

            #[inline(always)]
            fn reducemin(reg: $reg) -> $key {
                unsafe { $reduce_min(reg) as $key }
            }

            #[inline(always)]
            fn reducemax(reg: $reg) -> $key {
                unsafe { $reduce_max(reg) as $key }
            }

            #[inline(always)]
            fn fpclass<const IMM: i32>(reg: $reg) -> $mask {
                unsafe { $fpclass::<IMM>(reg) }
            }

            #[inline(always)]
            fn get_partial_loadmask(n: usize) -> $mask {
                debug_assert!(n < $lanes);
                ((1_u32 << n) - 1) as $mask
            }

            fn sort_vec(mut reg: $reg) -> $reg {
                $(reg = Self::network_step::<$sk, $sj>(reg);)*
                reg
            }

            #[inline(always)]
            fn reverse(reg: $reg) -> $reg {
                unsafe { $permutexvar(Self::load_index(&Self::REVERSE_INDEX), reg) }
            }

            fn bitonic_merge_vec(mut reg: $reg) -> $reg {
                $(reg = Self::network_step::<0, $mj>(reg);)*
                reg
            }
        }
    };
}

zmm_vector! {
    ZmmI64 {
        key: i64,
        lane: i64,
        index: i64,
        reg: __m512i,
        mask: __mmask8,
        lanes: 8,
        unroll: 8,
        loadu: _mm512_loadu_si512,
        storeu: _mm512_storeu_si512,
        mask_loadu: _mm512_mask_loadu_epi64,
        mask_storeu: _mm512_mask_storeu_epi64,
        compressstoreu: _mm512_mask_compressstoreu_epi64,
        min: _mm512_min_epi64,
        max: _mm512_max_epi64,
        ge: _mm512_cmpge_epi64_mask,
        eq: _mm512_cmpeq_epi64_mask,
        set1: _mm512_set1_epi64,
        reduce_min: _mm512_reduce_min_epi64,
        reduce_max: _mm512_reduce_max_epi64,
        permutexvar: _mm512_permutexvar_epi64,
        mask_mov: _mm512_mask_mov_epi64,
        fpclass: fpclass_epi64,
        sort_steps: [(2, 1), (4, 2), (4, 1), (8, 4), (8, 2), (8, 1)],
        merge_steps: [4, 2, 1],
    }
}

zmm_vector! {
    ZmmU64 {
        key: u64,
        lane: i64,
        index: i64,
        reg: __m512i,
        mask: __mmask8,
        lanes: 8,
        unroll: 8,
        loadu: _mm512_loadu_si512,
        storeu: _mm512_storeu_si512,
        mask_loadu: _mm512_mask_loadu_epi64,
        mask_storeu: _mm512_mask_storeu_epi64,
        compressstoreu: _mm512_mask_compressstoreu_epi64,
        min: _mm512_min_epu64,
        max: _mm512_max_epu64,
        ge: _mm512_cmpge_epu64_mask,
        eq: _mm512_cmpeq_epi64_mask,
        set1: _mm512_set1_epi64,
        reduce_min: _mm512_reduce_min_epu64,
        reduce_max: _mm512_reduce_max_epu64,
        permutexvar: _mm512_permutexvar_epi64,
        mask_mov: _mm512_mask_mov_epi64,
        fpclass: fpclass_epi64,
        sort_steps: [(2, 1), (4, 2), (4, 1), (8, 4), (8, 2), (8, 1)],
        merge_steps: [4, 2, 1],
    }
}

zmm_vector! {
    ZmmF64 {
        key: f64,
        lane: f64,
        index: i64,
        reg: __m512d,
        mask: __mmask8,
        lanes: 8,
        unroll: 8,
        loadu: _mm512_loadu_pd,
        storeu: _mm512_storeu_pd,
        mask_loadu: _mm512_mask_loadu_pd,
        mask_storeu: _mm512_mask_storeu_pd,
        compressstoreu: _mm512_mask_compressstoreu_pd,
        min: _mm512_min_pd,
        max: _mm512_max_pd,
        ge: cmpge_pd,
        eq: cmpeq_pd,
        set1: _mm512_set1_pd,
        reduce_min: _mm512_reduce_min_pd,
        reduce_max: _mm512_reduce_max_pd,
        permutexvar: _mm512_permutexvar_pd,
        mask_mov: _mm512_mask_mov_pd,
        fpclass: fpclass_pd,
        sort_steps: [(2, 1), (4, 2), (4, 1), (8, 4), (8, 2), (8, 1)],
        merge_steps: [4, 2, 1],
    }
}

zmm_vector! {
    ZmmI32 {
        key: i32,
        lane: i32,
        index: i32,
        reg: __m512i,
        mask: __mmask16,
        lanes: 16,
        unroll: 4,
        loadu: _mm512_loadu_si512,
        storeu: _mm512_storeu_si512,
        mask_loadu: _mm512_mask_loadu_epi32,
        mask_storeu: _mm512_mask_storeu_epi32,
        compressstoreu: _mm512_mask_compressstoreu_epi32,
        min: _mm512_min_epi32,
        max: _mm512_max_epi32,
        ge: _mm512_cmpge_epi32_mask,
        eq: _mm512_cmpeq_epi32_mask,
        set1: _mm512_set1_epi32,
        reduce_min: _mm512_reduce_min_epi32,
        reduce_max: _mm512_reduce_max_epi32,
        permutexvar: _mm512_permutexvar_epi32,
        mask_mov: _mm512_mask_mov_epi32,
        fpclass: fpclass_epi32,
        sort_steps: [
            (2, 1), (4, 2), (4, 1), (8, 4), (8, 2), (8, 1),
            (16, 8), (16, 4), (16, 2), (16, 1),
        ],
        merge_steps: [8, 4, 2, 1],
    }
}

zmm_vector! {
    ZmmU32 {
        key: u32,
        lane: i32,
        index: i32,
        reg: __m512i,
        mask: __mmask16,
        lanes: 16,
        unroll: 4,
        loadu: _mm512_loadu_si512,
        storeu: _mm512_storeu_si512,
        mask_loadu: _mm512_mask_loadu_epi32,
        mask_storeu: _mm512_mask_storeu_epi32,
        compressstoreu: _mm512_mask_compressstoreu_epi32,
        min: _mm512_min_epu32,
        max: _mm512_max_epu32,
        ge: _mm512_cmpge_epu32_mask,
        eq: _mm512_cmpeq_epi32_mask,
        set1: _mm512_set1_epi32,
        reduce_min: _mm512_reduce_min_epu32,
        reduce_max: _mm512_reduce_max_epu32,
        permutexvar: _mm512_permutexvar_epi32,
        mask_mov: _mm512_mask_mov_epi32,
        fpclass: fpclass_epi32,
        sort_steps: [
            (2, 1), (4, 2), (4, 1), (8, 4), (8, 2), (8, 1),
            (16, 8), (16, 4), (16, 2), (16, 1),
        ],
        merge_steps: [8, 4, 2, 1],
    }
}

zmm_vector! {
    ZmmF32 {
        key: f32,
        lane: f32,
        index: i32,
        reg: __m512,
        mask: __mmask16,
        lanes: 16,
        unroll: 4,
        loadu: _mm512_loadu_ps,
        storeu: _mm512_storeu_ps,
        mask_loadu: _mm512_mask_loadu_ps,
        mask_storeu: _mm512_mask_storeu_ps,
        compressstoreu: _mm512_mask_compressstoreu_ps,
        min: _mm512_min_ps,
        max: _mm512_max_ps,
        ge: cmpge_ps,
        eq: cmpeq_ps,
        set1: _mm512_set1_ps,
        reduce_min: _mm512_reduce_min_ps,
        reduce_max: _mm512_reduce_max_ps,
        permutexvar: _mm512_permutexvar_ps,
        mask_mov: _mm512_mask_mov_ps,
        fpclass: fpclass_ps,
        sort_steps: [
            (2, 1), (4, 2), (4, 1), (8, 4), (8, 2), (8, 1),
            (16, 8), (16, 4), (16, 2), (16, 1),
        ],
        merge_steps: [8, 4, 2, 1],
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::emulated::Emulated;
    use crate::key::FPCLASS_NAN;

    fn to_lanes<V: VecType>(reg: V::Reg) -> Vec<V::Key> {
        let mut out = vec![V::type_max(); V::LANES];
        V::storeu(&mut out, reg);
        out
    }

    #[test]
    fn test_sort_vec_matches_emulated() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let keys: Vec<i64> = (0..8).map(|_| rng.gen_range(-50..50)).collect();
            let native = to_lanes::<ZmmI64>(ZmmI64::sort_vec(ZmmI64::loadu(&keys)));
            let emulated = Emulated::<i64, 8>::sort_vec(Emulated::<i64, 8>::loadu(&keys));
            assert_eq!(native, emulated.to_vec());

            let keys: Vec<u32> = (0..16).map(|_| rng.gen()).collect();
            let native = to_lanes::<ZmmU32>(ZmmU32::sort_vec(ZmmU32::loadu(&keys)));
            let emulated = Emulated::<u32, 16>::sort_vec(Emulated::<u32, 16>::loadu(&keys));
            assert_eq!(native, emulated.to_vec());
        }
    }

    #[test]
    fn test_network_tables() {
        assert_eq!(ZmmI64::max_lanes(2, 1), 0b0110_0110);
        assert_eq!(ZmmI64::max_lanes(4, 2), 0b0011_1100);
        assert_eq!(ZmmI64::max_lanes(0, 4), 0b1111_0000);
        assert_eq!(ZmmI32::max_lanes(16, 8), 0xff00);
        assert_eq!(ZmmI64::partner_index(1), [1, 0, 3, 2, 5, 4, 7, 6]);
        assert_eq!(ZmmF32::REVERSE_INDEX, std::array::from_fn(|i| 15 - i as i32));
    }

    #[test]
    fn test_reverse_and_merge_match_emulated() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let mut keys: Vec<f64> = (0..8).map(|_| rng.gen_range(-1.0..1.0)).collect();
            keys[..4].sort_by(f64::total_cmp);
            keys[4..].sort_by(|a, b| b.total_cmp(a));
            let native = to_lanes::<ZmmF64>(ZmmF64::bitonic_merge_vec(ZmmF64::loadu(&keys)));
            let emulated = Emulated::<f64, 8>::bitonic_merge_vec(Emulated::<f64, 8>::loadu(&keys));
            assert_eq!(native, emulated.to_vec());
            assert!(native.is_sorted());

            let keys: Vec<i32> = (0..16).map(|_| rng.gen()).collect();
            let native = to_lanes::<ZmmI32>(ZmmI32::reverse(ZmmI32::loadu(&keys)));
            let emulated = Emulated::<i32, 16>::reverse(Emulated::<i32, 16>::loadu(&keys));
            assert_eq!(native, emulated.to_vec());
            assert_eq!(native, keys.iter().rev().copied().collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_compressstoreu_matches_emulated() {
        let keys: Vec<f32> = (0..16).map(|i| i as f32 * 0.5).collect();
        let mask = 0b0110_0000_1001_0011;
        let mut native = vec![-1.0_f32; 16];
        let mut emulated = vec![-1.0_f32; 16];
        ZmmF32::mask_compressstoreu(&mut native, mask, ZmmF32::loadu(&keys));
        Emulated::<f32, 16>::mask_compressstoreu(&mut emulated, mask as u64, Emulated::<f32, 16>::loadu(&keys));
        assert_eq!(native, emulated);
    }

    #[test]
    #[should_panic]
    fn test_maskz_loadu_rejects_lanes_past_slice() {
        let keys = [1_i64, 2, 3];
        ZmmI64::maskz_loadu(0b1111, &keys);
    }

    #[test]
    #[should_panic]
    fn test_mask_storeu_rejects_lanes_past_slice() {
        let mut keys = [0.0_f32; 4];
        ZmmF32::mask_storeu(&mut keys, 0b1_0000, ZmmF32::set1(1.0));
    }

    #[test]
    fn test_unsigned_compare() {
        let a = ZmmU64::set1(u64::MAX);
        let b = ZmmU64::set1(1);
        assert_eq!(ZmmU64::ge(a, b), 0xff);
        assert_eq!(ZmmU64::reducemin(ZmmU64::min(a, b)), 1);
        assert_eq!(ZmmU64::reducemax(ZmmU64::max(a, b)), u64::MAX);
    }

    #[test]
    fn test_maskz_loadu_and_fpclass() {
        let keys = [1.0, f64::NAN, 3.0];
        let reg = ZmmF64::maskz_loadu(ZmmF64::get_partial_loadmask(3), &keys);
        assert_eq!(ZmmF64::fpclass::<FPCLASS_NAN>(reg), 0b010);
        let lanes = to_lanes::<ZmmF64>(reg);
        assert!(lanes[3..].iter().all(|v| *v == f64::INFINITY));
        assert_eq!(ZmmI32::fpclass::<FPCLASS_NAN>(ZmmI32::set1(-1)), 0);
    }
}
