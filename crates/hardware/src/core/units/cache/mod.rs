//! Set-Associative Cache Hierarchy.
//!
//! This module implements a functional, tag-only cache model. It tracks which
//! line addresses are resident in each level and counts evictions; it never
//! stores data, dirty state or write-back traffic.
//!
//! A [`CacheLevel`] is an array of FIFO [`CacheSet`]s. The [`Hierarchy`] owns
//! the levels in order and walks them on each lookup until one hits or the
//! last one misses and the lookup falls through to memory.

/// Level chain and lookup results.
pub mod hierarchy;

/// Lines and FIFO sets.
pub mod set;

pub use self::hierarchy::{AccessResult, Hierarchy};
pub use self::set::{CacheSet, Line};

use tracing::trace;

use crate::common::addr::{AccessOrigin, Addr, line_align};
use crate::config::LevelConfig;

/// One level of the cache hierarchy.
///
/// Lines are tagged with their line-aligned address and mapped to a set by
/// `tag mod num_sets`. The modulo is an integer remainder, not a mask, so set
/// counts that are not powers of two are supported.
#[derive(Clone, Debug)]
pub struct CacheLevel {
    /// Hit latency in cycles.
    pub latency: u64,
    sets: Vec<CacheSet>,
    line_bytes: u64,
    demand_evictions: u64,
    prefetch_evictions: u64,
}

impl CacheLevel {
    /// Creates an empty level from its configuration.
    ///
    /// The configuration must already have passed
    /// [`LevelConfig::validate`]; a geometry with zero sets is rounded up to one.
    ///
    /// # Arguments
    ///
    /// * `config` - Capacity, line size, associativity, element width and latency.
    /// * `strict_cold_lines` - Create placeholder lines that never match.
    pub fn new(config: &LevelConfig, strict_cold_lines: bool) -> Self {
        let num_sets = config.num_sets().max(1) as usize;
        let ways = config.ways as usize;

        Self {
            latency: config.latency,
            sets: vec![CacheSet::new(ways, strict_cold_lines); num_sets],
            line_bytes: config.line_bytes().max(1),
            demand_evictions: 0,
            prefetch_evictions: 0,
        }
    }

    /// Line-aligned tag of `addr`.
    #[inline]
    pub const fn tag(&self, addr: Addr) -> u64 {
        line_align(addr, self.line_bytes)
    }

    /// Set that `addr` maps to.
    #[inline]
    pub fn set_index(&self, addr: Addr) -> usize {
        (self.tag(addr) % self.sets.len() as u64) as usize
    }

    /// Probes this level only, installing the line on a miss.
    ///
    /// A miss is charged to the demand or prefetch eviction counter according
    /// to `origin`. Forwarding to slower levels is the caller's job.
    ///
    /// # Returns
    ///
    /// `true` if the line was resident.
    pub fn lookup(&mut self, addr: Addr, origin: AccessOrigin) -> bool {
        let tag = self.tag(addr);
        let index = self.set_index(addr);
        let hit = self.sets[index].probe(tag);

        if !hit {
            match origin {
                AccessOrigin::Demand => self.demand_evictions += 1,
                AccessOrigin::Prefetch => self.prefetch_evictions += 1,
            }
        }
        trace!(addr, tag, set = index, hit, ?origin, "cache lookup");
        hit
    }

    /// Returns `true` if the line holding `addr` is resident, without side effects.
    pub fn contains(&self, addr: Addr) -> bool {
        self.sets[self.set_index(addr)].contains(self.tag(addr))
    }

    /// Misses caused by demand lookups.
    pub const fn demand_evictions(&self) -> u64 {
        self.demand_evictions
    }

    /// Misses caused by prefetch lookups.
    pub const fn prefetch_evictions(&self) -> u64 {
        self.prefetch_evictions
    }

    /// Number of sets.
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    /// Line size in bytes.
    pub const fn line_bytes(&self) -> u64 {
        self.line_bytes
    }

    /// All sets, indexed by set number.
    pub fn sets(&self) -> &[CacheSet] {
        &self.sets
    }
}
