//! Common-Stride Prefetcher.
//!
//! Predicts the next address from the most frequent stride among the recent
//! demand history:
//!
//! 1. Take the last [`STRIDE_WINDOW`] addresses (fewer if the history is shorter).
//! 2. Compute the differences between neighbouring addresses and drop zeros.
//! 3. Pick the difference that occurs most often. Ties go to the larger
//!    absolute stride; remaining ties go to the stride seen first.
//! 4. Predict `last + stride`. With no non-zero difference, predict `last`.
//!
//! [`StrideSelection::OccurrenceCount`] replaces the stride in step 4 with its
//! occurrence count, so `[10, 20, 30, 40]` predicts 43 rather than 50.
//!
//! # Performance
//!
//! - **Time Complexity:** O(W * D) where W is the window and D the number of distinct strides.
//! - **Space Complexity:** O(D).

use super::PrefetchPolicy;
use crate::common::addr::{Addr, offset, stride};
use crate::common::error::PrefetchError;
use crate::config::StrideSelection;

/// Number of most recent addresses examined for strides.
pub const STRIDE_WINDOW: usize = 100;

/// Common-Stride Prefetcher configuration.
#[derive(Clone, Copy, Debug)]
pub struct CommonStridePrefetcher {
    /// Quantity added to the last address.
    selection: StrideSelection,
    /// Number of trailing history entries examined.
    window: usize,
}

/// A stride and how often it occurred in the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrideTally {
    /// Signed difference between neighbouring addresses.
    pub stride: i64,
    /// Occurrences within the window.
    pub count: usize,
}

impl StrideTally {
    const fn outranks(&self, other: &Self) -> bool {
        self.count > other.count
            || (self.count == other.count
                && self.stride.unsigned_abs() > other.stride.unsigned_abs())
    }
}

impl CommonStridePrefetcher {
    /// Creates a prefetcher examining the last [`STRIDE_WINDOW`] addresses.
    pub fn new(selection: StrideSelection) -> Self {
        Self::with_window(selection, STRIDE_WINDOW)
    }

    /// Creates a prefetcher with a custom window. A window below 1 is raised to 1.
    pub fn with_window(selection: StrideSelection, window: usize) -> Self {
        Self {
            selection,
            window: window.max(1),
        }
    }

    /// Finds the most common non-zero stride in `addrs`.
    ///
    /// Returns `None` when `addrs` has fewer than two entries or every
    /// neighbouring pair is equal.
    pub fn most_common_stride(addrs: &[Addr]) -> Option<StrideTally> {
        // First-occurrence order decides ties that count and magnitude leave open.
        let mut tallies: Vec<StrideTally> = Vec::new();
        for pair in addrs.windows(2) {
            let delta = stride(pair[0], pair[1]);
            if delta == 0 {
                continue;
            }
            match tallies.iter_mut().find(|tally| tally.stride == delta) {
                Some(tally) => tally.count += 1,
                None => tallies.push(StrideTally {
                    stride: delta,
                    count: 1,
                }),
            }
        }

        tallies.into_iter().fold(None, |best, tally| match best {
            Some(current) if !tally.outranks(&current) => Some(current),
            _ => Some(tally),
        })
    }
}

impl PrefetchPolicy for CommonStridePrefetcher {
    fn name(&self) -> &'static str {
        "common-stride"
    }

    fn predict(&self, history: &[Addr]) -> Result<Addr, PrefetchError> {
        let begin = history.len().saturating_sub(self.window);
        let window = &history[begin..];
        let last = window
            .last()
            .copied()
            .ok_or(PrefetchError::EmptyHistory(self.name()))?;

        let prediction = match Self::most_common_stride(window) {
            Some(tally) => match self.selection {
                StrideSelection::Stride => offset(last, tally.stride),
                StrideSelection::OccurrenceCount => last.wrapping_add(tally.count as u64),
            },
            None => last,
        };
        Ok(prediction)
    }
}
