//! Prefetch policies.
//!
//! A prefetch policy looks at the demand addresses seen so far and predicts
//! one address to fetch next. The simulation driver injects the prediction
//! into the configured fetch level as a prefetch-flagged lookup.
//!
//! Policies are pure functions of the history slice they are given: they hold
//! configuration only, never state learned from earlier calls. The same
//! history always yields the same prediction, so policies can be swapped and
//! tested in isolation.

/// Common-stride policy (most frequent recent stride).
pub mod common_stride;

/// Next-line policy (line following the last address).
pub mod next_line;

pub use self::common_stride::{CommonStridePrefetcher, STRIDE_WINDOW, StrideTally};
pub use self::next_line::NextLinePrefetcher;

use std::fmt;

use crate::common::addr::Addr;
use crate::common::error::PrefetchError;
use crate::config::{Config, LevelConfig, PrefetchPolicyKind};

/// Trait for prefetch policies.
pub trait PrefetchPolicy: fmt::Debug + Send + Sync {
    /// Name of the policy, used in logs and run names.
    fn name(&self) -> &'static str;

    /// Predicts the next address from the demand history.
    ///
    /// # Arguments
    ///
    /// * `history` - Demand addresses, oldest first. The last element is the
    ///   access that just completed.
    ///
    /// # Errors
    ///
    /// Returns [`PrefetchError::EmptyHistory`] when `history` is empty.
    fn predict(&self, history: &[Addr]) -> Result<Addr, PrefetchError>;
}

/// Builds the policy selected by `config.prefetch`.
///
/// Returns `None` when prefetching is disabled. The next-line policy uses the
/// line size of the fetch level (level 1 if none is configured).
pub fn from_config(config: &Config) -> Option<Box<dyn PrefetchPolicy>> {
    match config.prefetch.policy {
        PrefetchPolicyKind::None => None,
        PrefetchPolicyKind::CommonStride => Some(Box::new(CommonStridePrefetcher::new(
            config.prefetch.stride_selection,
        ))),
        PrefetchPolicyKind::NextLine => {
            let level = config.fetch_level_index().unwrap_or(0);
            let line_bytes = config
                .levels
                .get(level)
                .map_or(1, LevelConfig::line_bytes);
            Some(Box::new(NextLinePrefetcher::new(line_bytes)))
        }
    }
}
