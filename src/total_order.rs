use half::f16;

/// Maps a key to an unsigned integer whose natural order is a total order over the key type.
///
/// Floats follow `total_cmp`: `-NaN < -inf < ... < -0.0 < +0.0 < ... < +inf < +NaN`.
pub trait TotalOrder: 'static {
    fn to_total_order(&self) -> u64;
}

impl TotalOrder for f64 {
    #[inline(always)]
    fn to_total_order(&self) -> u64 {
        // see f64::total_cmp
        let bits = self.to_bits();
        (bits ^ ((bits as i64 >> 63) as u64 >> 1)) ^ (1 << 63)
    }
}

impl TotalOrder for f32 {
    #[inline(always)]
    fn to_total_order(&self) -> u64 {
        // see f32::total_cmp
        let bits = self.to_bits();
        ((bits ^ ((bits as i32 >> 31) as u32 >> 1)) ^ (1 << 31)) as u64
    }
}

impl TotalOrder for f16 {
    #[inline(always)]
    fn to_total_order(&self) -> u64 {
        let bits = self.to_bits();
        ((bits ^ ((bits as i16 >> 15) as u16 >> 1)) ^ (1 << 15)) as u64
    }
}

impl TotalOrder for u64 {
    #[inline(always)]
    fn to_total_order(&self) -> u64 {
        *self
    }
}

impl TotalOrder for u32 {
    #[inline(always)]
    fn to_total_order(&self) -> u64 {
        *self as u64
    }
}

impl TotalOrder for u16 {
    #[inline(always)]
    fn to_total_order(&self) -> u64 {
        *self as u64
    }
}

impl TotalOrder for i64 {
    #[inline(always)]
    fn to_total_order(&self) -> u64 {
        (*self as u64) ^ (1 << 63)
    }
}

impl TotalOrder for i32 {
    #[inline(always)]
    fn to_total_order(&self) -> u64 {
        (*self as u32 ^ (1 << 31)) as u64
    }
}

impl TotalOrder for i16 {
    #[inline(always)]
    fn to_total_order(&self) -> u64 {
        (*self as u16 ^ (1 << 15)) as u64
    }
}
