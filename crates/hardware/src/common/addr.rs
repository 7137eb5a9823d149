//! Address helpers and access origin.
//!
//! Addresses are plain 64-bit byte addresses. Differences between two
//! addresses (strides) are signed and computed with wrapping two's-complement
//! arithmetic, so traces near either end of the address space never overflow.

use serde::Serialize;

/// A byte address in the simulated address space.
pub type Addr = u64;

/// Aligns `addr` down to the start of its cache line.
///
/// Uses an ordinary remainder rather than a mask so that line sizes which are
/// not powers of two behave exactly like the arithmetic definition
/// `addr - (addr mod line_bytes)`.
///
/// # Arguments
///
/// * `addr` - The address to align.
/// * `line_bytes` - Line size in bytes; must be non-zero.
#[inline]
pub const fn line_align(addr: Addr, line_bytes: u64) -> Addr {
    addr - (addr % line_bytes)
}

/// Returns the signed distance from `from` to `to`.
#[inline]
pub const fn stride(from: Addr, to: Addr) -> i64 {
    to.wrapping_sub(from) as i64
}

/// Applies a signed stride to `addr`, wrapping at the ends of the address space.
#[inline]
pub const fn offset(addr: Addr, stride: i64) -> Addr {
    addr.wrapping_add_signed(stride)
}

/// Origin of a cache lookup.
///
/// The origin travels unchanged through every level a lookup visits and
/// selects which eviction counter a miss is charged to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessOrigin {
    /// An address read by the traced program.
    Demand,
    /// A speculative address produced by a prefetch policy.
    Prefetch,
}

impl AccessOrigin {
    /// Returns `true` for prefetch traffic.
    #[inline]
    pub const fn is_prefetch(self) -> bool {
        matches!(self, Self::Prefetch)
    }
}
