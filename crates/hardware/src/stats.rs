//! Simulation statistics collection and reporting.
//!
//! This module tracks the results of a replay. It provides:
//! 1. **Totals:** Demand accesses, hits, misses and simulated cycles.
//! 2. **Per level:** Hits, accesses, and demand/prefetch eviction counts.
//! 3. **Rates:** Hit, miss and eviction rates, refused for levels with no accesses.
//! 4. **Report:** The plain-text report layout and a serializable view for JSON output.
//!
//! Prefetch lookups never touch the demand figures; they only show up as
//! prefetch evictions and in `prefetches_issued`.

use serde::Serialize;

use crate::common::error::ReportError;
use crate::core::units::cache::Hierarchy;

/// Counters for one cache level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LevelStats {
    /// Demand lookups credited as hits at this level.
    pub hits: u64,
    /// Demand lookups that reached this level.
    pub accesses: u64,
    /// Misses at this level caused by demand lookups.
    pub demand_evictions: u64,
    /// Misses at this level caused by prefetch lookups.
    pub prefetch_evictions: u64,
}

impl LevelStats {
    /// Demand lookups that reached this level and did not hit here.
    pub const fn misses(&self) -> u64 {
        self.accesses.saturating_sub(self.hits)
    }

    fn rate(&self, level: usize, numerator: u64) -> Result<f64, ReportError> {
        if self.accesses == 0 {
            return Err(ReportError::ZeroAccesses { level });
        }
        Ok(numerator as f64 / self.accesses as f64)
    }

    /// Fraction of accesses that hit at this level.
    ///
    /// # Arguments
    ///
    /// * `level` - 1-based level number, reported in the error.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::ZeroAccesses`] if the level saw no accesses.
    pub fn hit_rate(&self, level: usize) -> Result<f64, ReportError> {
        self.rate(level, self.hits)
    }

    /// Fraction of accesses that missed at this level.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::ZeroAccesses`] if the level saw no accesses.
    pub fn miss_rate(&self, level: usize) -> Result<f64, ReportError> {
        self.rate(level, self.misses())
    }

    /// Demand evictions per access at this level.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::ZeroAccesses`] if the level saw no accesses.
    pub fn eviction_rate(&self, level: usize) -> Result<f64, ReportError> {
        self.rate(level, self.demand_evictions)
    }
}

/// Simulation statistics for a whole run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    /// Demand addresses replayed.
    pub accesses: u64,
    /// Demand lookups that hit in some level.
    pub hits: u64,
    /// Demand lookups that fell through to memory.
    pub misses: u64,
    /// Sum of the latency returned by every demand lookup.
    pub cycles: u64,
    /// Prefetch lookups injected into the fetch level.
    pub prefetches_issued: u64,
    /// Per-level counters, fastest level first.
    pub levels: Vec<LevelStats>,
}

impl SimStats {
    /// Creates zeroed statistics for a hierarchy of `levels` levels.
    pub fn new(levels: usize) -> Self {
        Self {
            levels: vec![LevelStats::default(); levels],
            ..Self::default()
        }
    }

    /// Records one demand lookup.
    ///
    /// Every level from the first up to and including `credited` has its
    /// access count incremented, and `credited` is charged the hit. When no
    /// level is credited (a terminal miss) every level counts an access.
    ///
    /// # Arguments
    ///
    /// * `hit` - Whether the lookup hit anywhere.
    /// * `latency` - Latency returned by the lookup.
    /// * `credited` - 0-based level credited with the hit.
    pub fn record_demand(&mut self, hit: bool, latency: u64, credited: Option<usize>) {
        self.accesses += 1;
        self.cycles += latency;
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }

        for (index, level) in self.levels.iter_mut().enumerate() {
            level.accesses += 1;
            if credited == Some(index) {
                level.hits += 1;
                break;
            }
        }
    }

    /// Records one injected prefetch lookup.
    pub fn record_prefetch(&mut self) {
        self.prefetches_issued += 1;
    }

    /// Copies the eviction counters held by the cache levels.
    pub fn sync_evictions(&mut self, hierarchy: &Hierarchy) {
        for (stats, level) in self.levels.iter_mut().zip(hierarchy.levels()) {
            stats.demand_evictions = level.demand_evictions();
            stats.prefetch_evictions = level.prefetch_evictions();
        }
    }
}

/// A finished run, ready to render.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SimReport<'a> {
    /// Name printed in the report banner.
    pub run_name: &'a str,
    /// 0-based fetch level whose prefetch evictions are shown, if prefetching ran.
    pub prefetch_level: Option<usize>,
    /// Run statistics.
    pub stats: &'a SimStats,
}

impl SimReport<'_> {
    /// Renders the plain-text report.
    ///
    /// Each level prints hits, accesses, evictions (and prefetch evictions for
    /// the fetch level) followed by hit, miss and eviction rates as
    /// percentages; the totals follow.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::ZeroAccesses`] for the first level with no accesses.
    pub fn render(&self) -> Result<String, ReportError> {
        let mut out = format!("========\n{}\n========\n", self.run_name);

        for (index, level) in self.stats.levels.iter().enumerate() {
            let n = index + 1;
            out.push_str(&format!("l{n} Hits\t\t{}\n", level.hits));
            out.push_str(&format!("l{n} Accesses\t{}\n", level.accesses));
            out.push_str(&format!("l{n} Evicts\t{}\n", level.demand_evictions));
            if self.prefetch_level == Some(index) {
                out.push_str(&format!(
                    "l{n} Prefetch Evicts\t{}\n",
                    level.prefetch_evictions
                ));
            }
            out.push_str(&format!("l{n} Hit Rate\t{}\n", percent(level.hit_rate(n)?)));
            out.push_str(&format!("l{n} Miss Rate\t{}\n", percent(level.miss_rate(n)?)));
            out.push_str(&format!(
                "l{n} Evict Rate\t{}\n\n",
                percent(level.eviction_rate(n)?)
            ));
        }

        out.push_str(&format!("Total Accesses\t{}\n", self.stats.accesses));
        out.push_str(&format!("Total Hits\t{}\n", self.stats.hits));
        out.push_str(&format!("Total Misses\t{}\n", self.stats.misses));
        out.push_str(&format!("Total Cycles\t{}\n", self.stats.cycles));
        Ok(out)
    }
}

fn percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}
