//! Replay driver.
//!
//! The simulator owns the hierarchy, the demand history and the optional
//! prefetch policy, and retires one address at a time in trace order:
//! 1. **Demand:** Append to history, look up from level 1, add the latency to
//!    the cycle count, and credit the level that hit.
//! 2. **Prefetch:** Ask the policy for a prediction and look it up from the
//!    fetch level as prefetch traffic, which only moves prefetch eviction
//!    counters.

use tracing::{debug, info};

use crate::common::addr::{AccessOrigin, Addr};
use crate::common::error::{ConfigError, SimError};
use crate::config::{Config, HitAttribution};
use crate::core::units::cache::{AccessResult, Hierarchy};
use crate::core::units::prefetch::{self, PrefetchPolicy};
use crate::sim::history::AddressHistory;
use crate::stats::SimStats;

/// Prefetcher bound to the level it feeds.
#[derive(Debug)]
struct Prefetch {
    policy: Box<dyn PrefetchPolicy>,
    level: usize,
}

/// Top-level simulator: hierarchy, demand history, prefetcher and counters.
#[derive(Debug)]
pub struct Simulator {
    hierarchy: Hierarchy,
    history: AddressHistory,
    prefetch: Option<Prefetch>,
    attribution: HitAttribution,
    level_latencies: Vec<u64>,
    stats: SimStats,
}

impl Simulator {
    /// Creates a simulator using the prefetch policy selected in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the configuration does not validate.
    pub fn new(config: &Config) -> Result<Self, SimError> {
        config.validate()?;
        let policy = prefetch::from_config(config);
        Self::build(config, policy)
    }

    /// Creates a simulator driven by a caller-supplied prefetch policy.
    ///
    /// The policy replaces whatever `config.prefetch` selects.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the configuration does not validate or
    /// has no fetch level.
    pub fn with_policy(config: &Config, policy: Box<dyn PrefetchPolicy>) -> Result<Self, SimError> {
        config.validate()?;
        Self::build(config, Some(policy))
    }

    fn build(config: &Config, policy: Option<Box<dyn PrefetchPolicy>>) -> Result<Self, SimError> {
        let prefetch = match policy {
            Some(policy) => {
                let level = config
                    .fetch_level_index()
                    .ok_or(ConfigError::MissingFetchLevel)?;
                info!(
                    policy = policy.name(),
                    fetch_level = level + 1,
                    "prefetching enabled"
                );
                Some(Prefetch { policy, level })
            }
            None => None,
        };

        Ok(Self {
            hierarchy: Hierarchy::new(config),
            history: AddressHistory::new(),
            prefetch,
            attribution: config.hit_attribution,
            level_latencies: config.levels.iter().map(|level| level.latency).collect(),
            stats: SimStats::new(config.levels.len()),
        })
    }

    /// Retires one demand address.
    ///
    /// # Returns
    ///
    /// The demand lookup's result. The prefetch lookup that may follow it is
    /// not reported.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Prefetch`] if the prefetch policy fails.
    pub fn step(&mut self, addr: Addr) -> Result<AccessResult, SimError> {
        self.history.push(addr);

        let result = self.hierarchy.access(0, addr, AccessOrigin::Demand);
        let credited = self.credited_level(&result);
        self.stats.record_demand(result.hit, result.latency, credited);

        if let Some(prefetch) = &self.prefetch {
            let predicted = prefetch.policy.predict(self.history.as_slice())?;
            let outcome = self
                .hierarchy
                .access(prefetch.level, predicted, AccessOrigin::Prefetch);
            self.stats.record_prefetch();
            debug!(
                addr,
                predicted,
                hit = outcome.hit,
                "injected prefetch"
            );
        }

        Ok(result)
    }

    /// Replays every address in `addrs`, in order.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error from `addrs` or from [`Simulator::step`].
    pub fn run<I, E>(&mut self, addrs: I) -> Result<(), SimError>
    where
        I: IntoIterator<Item = Result<Addr, E>>,
        SimError: From<E>,
    {
        for addr in addrs {
            let _ = self.step(addr?)?;
        }
        info!(
            accesses = self.stats.accesses,
            hits = self.stats.hits,
            misses = self.stats.misses,
            cycles = self.stats.cycles,
            "replay finished"
        );
        Ok(())
    }

    /// Replays an in-memory address stream.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`Simulator::step`].
    pub fn run_addresses(&mut self, addrs: &[Addr]) -> Result<(), SimError> {
        self.run(addrs.iter().copied().map(Ok::<_, SimError>))
    }

    fn credited_level(&self, result: &AccessResult) -> Option<usize> {
        if !result.hit {
            return None;
        }
        match self.attribution {
            HitAttribution::ResolvedLevel => result.level,
            HitAttribution::LatencyMatch => self
                .level_latencies
                .iter()
                .position(|&latency| latency == result.latency),
        }
    }

    /// Statistics so far, with eviction counters copied from the hierarchy.
    pub fn stats(&self) -> SimStats {
        let mut stats = self.stats.clone();
        stats.sync_evictions(&self.hierarchy);
        stats
    }

    /// The cache hierarchy.
    pub const fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// The demand history buffer.
    pub const fn history(&self) -> &AddressHistory {
        &self.history
    }

    /// 0-based fetch level, when prefetching is enabled.
    pub fn prefetch_level(&self) -> Option<usize> {
        self.prefetch.as_ref().map(|prefetch| prefetch.level)
    }

    /// Name of the active prefetch policy.
    pub fn prefetch_policy(&self) -> Option<&'static str> {
        self.prefetch.as_ref().map(|prefetch| prefetch.policy.name())
    }
}
