//! Cache level chain.
//!
//! The hierarchy owns its levels in order, fastest first. A lookup entering at
//! level `i` probes `i`, then `i + 1` on a miss, and so on; a miss in the last
//! level is a terminal miss charged the memory latency. Each visited level
//! installs the line and counts an eviction when it misses.

use serde::Serialize;
use tracing::info;

use super::CacheLevel;
use crate::common::addr::{AccessOrigin, Addr};
use crate::config::Config;

/// Outcome of one lookup through the hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AccessResult {
    /// Whether some level held the line.
    pub hit: bool,
    /// Hit latency of the level that held the line, or the memory latency on
    /// a terminal miss. Never a sum over the levels visited.
    pub latency: u64,
    /// 0-based index of the level that held the line; `None` on a terminal miss.
    pub level: Option<usize>,
}

/// An ordered chain of cache levels backed by memory.
#[derive(Clone, Debug)]
pub struct Hierarchy {
    levels: Vec<CacheLevel>,
    memory_latency: u64,
}

impl Hierarchy {
    /// Builds every level described by `config`.
    ///
    /// The configuration is expected to be validated; see [`Config::validate`].
    pub fn new(config: &Config) -> Self {
        let levels: Vec<CacheLevel> = config
            .levels
            .iter()
            .map(|level| CacheLevel::new(level, config.strict_cold_lines))
            .collect();

        for (i, level) in levels.iter().enumerate() {
            info!(
                level = i + 1,
                sets = level.num_sets(),
                line_bytes = level.line_bytes(),
                latency = level.latency,
                "built cache level"
            );
        }

        Self {
            levels,
            memory_latency: config.memory_latency,
        }
    }

    /// Looks up `addr` starting at level `start`.
    ///
    /// Levels `start..` are probed in order until one hits. Levels before
    /// `start` are never touched, which is how prefetches are injected into a
    /// lower level. `origin` is passed unchanged to every level visited.
    ///
    /// An out-of-range `start` visits no level and reports a terminal miss.
    pub fn access(&mut self, start: usize, addr: Addr, origin: AccessOrigin) -> AccessResult {
        for (index, level) in self.levels.iter_mut().enumerate().skip(start) {
            if level.lookup(addr, origin) {
                return AccessResult {
                    hit: true,
                    latency: level.latency,
                    level: Some(index),
                };
            }
        }

        AccessResult {
            hit: false,
            latency: self.memory_latency,
            level: None,
        }
    }

    /// Levels, fastest first.
    pub fn levels(&self) -> &[CacheLevel] {
        &self.levels
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns `true` if the hierarchy has no levels.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Latency charged for a terminal miss.
    pub const fn memory_latency(&self) -> u64 {
        self.memory_latency
    }
}
