//! Next-Line Prefetcher.
//!
//! Predicts the start of the cache line that follows the most recent demand
//! address. Useful as a baseline against the common-stride policy on
//! sequential traces.

use super::PrefetchPolicy;
use crate::common::addr::{Addr, line_align};
use crate::common::error::PrefetchError;

/// Next-Line Prefetcher configuration.
#[derive(Clone, Copy, Debug)]
pub struct NextLinePrefetcher {
    /// Size of a cache line in bytes.
    line_bytes: u64,
}

impl NextLinePrefetcher {
    /// Creates a new Next-Line prefetcher.
    ///
    /// # Arguments
    ///
    /// * `line_bytes` - The size of a cache line in bytes. Zero is treated as one.
    pub fn new(line_bytes: u64) -> Self {
        Self {
            line_bytes: line_bytes.max(1),
        }
    }
}

impl PrefetchPolicy for NextLinePrefetcher {
    fn name(&self) -> &'static str {
        "next-line"
    }

    fn predict(&self, history: &[Addr]) -> Result<Addr, PrefetchError> {
        let last = history
            .last()
            .copied()
            .ok_or(PrefetchError::EmptyHistory(self.name()))?;
        Ok(line_align(last, self.line_bytes).wrapping_add(self.line_bytes))
    }
}
