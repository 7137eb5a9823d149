//! Simulated memory-side hardware.
//!
//! This module contains the cache hierarchy (lines, sets, levels and the
//! level chain) and the prefetch policies that feed speculative lookups into it.

/// Hardware units (cache hierarchy, prefetch policies).
pub mod units;

pub use self::units::cache::Hierarchy;
