//! Demand address history.
//!
//! The driver appends every demand address and hands the buffer to the
//! prefetch policy. Policies only look at the most recent
//! [`STRIDE_WINDOW`](crate::core::units::prefetch::STRIDE_WINDOW) entries, so
//! once the buffer reaches [`COMPACT_AT`] entries it is cut back to the newest
//! [`RETAIN`] entries instead of growing for the whole trace.

use tracing::debug;

use crate::common::addr::Addr;

/// Buffer length that triggers compaction.
pub const COMPACT_AT: usize = 5000;

/// Entries kept after compaction. Must exceed the prefetch window.
pub const RETAIN: usize = 101;

/// Compacting buffer of demand addresses, oldest first.
#[derive(Clone, Debug)]
pub struct AddressHistory {
    addrs: Vec<Addr>,
    compact_at: usize,
    retain: usize,
    total: u64,
}

impl Default for AddressHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressHistory {
    /// Creates an empty history with the default thresholds.
    pub fn new() -> Self {
        Self::with_limits(COMPACT_AT, RETAIN)
    }

    /// Creates an empty history with custom thresholds.
    ///
    /// `retain` is clamped to at least 1 and `compact_at` to more than `retain`.
    pub fn with_limits(compact_at: usize, retain: usize) -> Self {
        let retain = retain.max(1);
        let compact_at = compact_at.max(retain + 1);
        Self {
            addrs: Vec::with_capacity(compact_at),
            compact_at,
            retain,
            total: 0,
        }
    }

    /// Appends a demand address, compacting if the buffer is full.
    pub fn push(&mut self, addr: Addr) {
        self.addrs.push(addr);
        self.total += 1;

        if self.addrs.len() >= self.compact_at {
            let cut = self.addrs.len() - self.retain;
            self.addrs.copy_within(cut.., 0);
            self.addrs.truncate(self.retain);
            debug!(
                retained = self.retain,
                total = self.total,
                "compacted address history"
            );
        }
    }

    /// Buffered addresses, oldest first; the last entry is the newest.
    pub fn as_slice(&self) -> &[Addr] {
        &self.addrs
    }

    /// Most recent address.
    pub fn last(&self) -> Option<Addr> {
        self.addrs.last().copied()
    }

    /// Number of buffered addresses.
    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    /// Returns `true` if nothing has been pushed.
    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }

    /// Addresses pushed over the history's lifetime, including compacted ones.
    pub const fn total(&self) -> u64 {
        self.total
    }
}
