#[cfg(has_avx512)]
mod avx512;
mod emulated;
mod error;
mod key;
mod nan;
mod network;
mod partition;
mod pivot;
mod sort;
mod total_order;
mod vtype;

#[cfg(has_avx512)]
pub use avx512::*;
pub use emulated::Emulated;
pub use error::*;
pub use key::*;
pub use nan::has_nan;
pub use sort::*;
pub use total_order::*;
pub use vtype::VecType;

// Stack buffers are sized for the widest pack so no hot path allocates.
// 64 lanes covers Emulated<_, 64>, the widest portable register.
pub(crate) const MAX_LANES: usize = 64;
// 8 registers per iteration, used by the 64-bit packs
pub(crate) const MAX_UNROLL: usize = 8;
// 128 keys over 8 lanes, or 16·N keys over N lanes for the narrow portable packs
pub(crate) const MAX_NETWORK_REGS: usize = 16;
// holds the ≥ pivot lanes of at most UNROLL - 1 leftover registers
pub(crate) const PARTITION_BUFFER_LEN: usize = 64;
