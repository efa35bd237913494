use std::fmt::Debug;
use std::num::FpCategory;

use half::f16;

use crate::emulated::Emulated;
use crate::vtype::VecType;
use crate::TotalOrder;

// vfpclass category bits
pub const FPCLASS_QNAN: i32 = 0x01;
pub const FPCLASS_POS_ZERO: i32 = 0x02;
pub const FPCLASS_NEG_ZERO: i32 = 0x04;
pub const FPCLASS_POS_INF: i32 = 0x08;
pub const FPCLASS_NEG_INF: i32 = 0x10;
pub const FPCLASS_DENORMAL: i32 = 0x20;
pub const FPCLASS_NEG_FINITE: i32 = 0x40;
pub const FPCLASS_SNAN: i32 = 0x80;
pub const FPCLASS_NAN: i32 = FPCLASS_QNAN | FPCLASS_SNAN;

/// A fixed-width primitive key.
///
/// `MAX` and `MIN` are the padding sentinels used by the packs: the numeric extremes for
/// integers and the infinities for floats.
pub trait SortKey: Copy + PartialOrd + Debug + TotalOrder + Send + Sync {
    const MAX: Self;
    const MIN: Self;
    const IS_FLOAT: bool;

    fn is_nan(self) -> bool;

    /// The value written back over the tail of a sorted float slice, once per replaced NaN.
    fn quiet_nan() -> Self;

    /// Whether the key falls in any of the `vfpclass` categories selected by `imm`.
    fn fpclass(self, imm: i32) -> bool;
}

/// A key with a SIMD capability pack.
pub trait SimdSortable: SortKey {
    type Vtype: VecType<Key = Self>;
}

/// Keys that may ride along with another key array in [`crate::key_value_partition`].
pub trait IndexType: SimdSortable {}

#[inline]
fn classify(imm: i32, category: FpCategory, negative: bool, quiet: bool) -> bool {
    let class = match category {
        FpCategory::Nan if quiet => FPCLASS_QNAN,
        FpCategory::Nan => FPCLASS_SNAN,
        FpCategory::Zero if negative => FPCLASS_NEG_ZERO,
        FpCategory::Zero => FPCLASS_POS_ZERO,
        FpCategory::Infinite if negative => FPCLASS_NEG_INF,
        FpCategory::Infinite => FPCLASS_POS_INF,
        FpCategory::Subnormal if negative => FPCLASS_DENORMAL | FPCLASS_NEG_FINITE,
        FpCategory::Subnormal => FPCLASS_DENORMAL,
        FpCategory::Normal if negative => FPCLASS_NEG_FINITE,
        FpCategory::Normal => 0,
    };
    imm & class != 0
}

macro_rules! int_key {
    ($($t:ty),*) => {$(
        impl SortKey for $t {
            const MAX: Self = <$t>::MAX;
            const MIN: Self = <$t>::MIN;
            const IS_FLOAT: bool = false;

            #[inline(always)]
            fn is_nan(self) -> bool {
                false
            }

            #[inline(always)]
            fn quiet_nan() -> Self {
                Self::MAX
            }

            #[inline(always)]
            fn fpclass(self, _imm: i32) -> bool {
                false
            }
        }
    )*};
}

int_key!(i16, u16, i32, u32, i64, u64);

impl SortKey for f64 {
    const MAX: Self = f64::INFINITY;
    const MIN: Self = f64::NEG_INFINITY;
    const IS_FLOAT: bool = true;

    #[inline(always)]
    fn is_nan(self) -> bool {
        f64::is_nan(self)
    }

    #[inline(always)]
    fn quiet_nan() -> Self {
        f64::NAN
    }

    #[inline]
    fn fpclass(self, imm: i32) -> bool {
        let quiet = self.to_bits() & (1 << 51) != 0;
        classify(imm, self.classify(), self.is_sign_negative(), quiet)
    }
}

impl SortKey for f32 {
    const MAX: Self = f32::INFINITY;
    const MIN: Self = f32::NEG_INFINITY;
    const IS_FLOAT: bool = true;

    #[inline(always)]
    fn is_nan(self) -> bool {
        f32::is_nan(self)
    }

    #[inline(always)]
    fn quiet_nan() -> Self {
        f32::NAN
    }

    #[inline]
    fn fpclass(self, imm: i32) -> bool {
        let quiet = self.to_bits() & (1 << 22) != 0;
        classify(imm, self.classify(), self.is_sign_negative(), quiet)
    }
}

// Half precision sentinels are the bit patterns 0x7c00 and 0xfc00.
impl SortKey for f16 {
    const MAX: Self = f16::from_bits(0x7c00);
    const MIN: Self = f16::from_bits(0xfc00);
    const IS_FLOAT: bool = true;

    #[inline(always)]
    fn is_nan(self) -> bool {
        f16::is_nan(self)
    }

    #[inline(always)]
    fn quiet_nan() -> Self {
        f16::from_bits(0xffff)
    }

    #[inline]
    fn fpclass(self, imm: i32) -> bool {
        let quiet = self.to_bits() & (1 << 9) != 0;
        classify(imm, self.classify(), self.is_sign_negative(), quiet)
    }
}

macro_rules! simd_sortable {
    ($t:ty, $lanes:literal) => {
        impl SimdSortable for $t {
            type Vtype = Emulated<$t, $lanes>;
        }
    };
    ($t:ty, $lanes:literal, $native:ident) => {
        impl SimdSortable for $t {
            #[cfg(has_avx512)]
            type Vtype = crate::avx512::$native;
            #[cfg(not(has_avx512))]
            type Vtype = Emulated<$t, $lanes>;
        }
    };
}

simd_sortable!(i16, 32);
simd_sortable!(u16, 32);
simd_sortable!(f16, 32);
simd_sortable!(i32, 16, ZmmI32);
simd_sortable!(u32, 16, ZmmU32);
simd_sortable!(f32, 16, ZmmF32);
simd_sortable!(i64, 8, ZmmI64);
simd_sortable!(u64, 8, ZmmU64);
simd_sortable!(f64, 8, ZmmF64);

impl IndexType for i32 {}
impl IndexType for u32 {}
impl IndexType for i64 {}
impl IndexType for u64 {}
