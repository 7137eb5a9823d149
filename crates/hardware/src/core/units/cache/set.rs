//! Cache Set with First-In, First-Out replacement.
//!
//! A set holds exactly `ways` lines ordered from oldest inserted (index 0) to
//! newest inserted (last index). Probing and replacement are one operation:
//! a probe that misses shifts every line one slot toward the front, discards
//! the line at index 0 and installs the probed tag at the back.
//!
//! Hits never reorder the set, so this is insertion-order FIFO and not LRU.
//!
//! # Performance
//!
//! - **Time Complexity:** `probe()` is O(W) where W is the associativity.
//! - **Space Complexity:** O(W) per set.

/// A single tag slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Line {
    /// Line-aligned address held by this slot.
    pub tag: u64,
    /// Whether the slot can match a probe.
    pub valid: bool,
}

impl Line {
    /// Placeholder line installed when a set is created.
    ///
    /// With `strict` unset the placeholder is a valid line tagged 0, so a probe
    /// for address 0 hits it before anything was ever installed. With `strict`
    /// set the placeholder never matches.
    pub const fn placeholder(strict: bool) -> Self {
        Self {
            tag: 0,
            valid: !strict,
        }
    }

    /// Returns `true` if this slot holds `tag`.
    #[inline]
    pub const fn holds(&self, tag: u64) -> bool {
        self.valid && self.tag == tag
    }
}

/// One associative set.
#[derive(Clone, Debug)]
pub struct CacheSet {
    lines: Vec<Line>,
}

impl CacheSet {
    /// Creates a set of `ways` placeholder lines.
    ///
    /// # Arguments
    ///
    /// * `ways` - Associativity; the number of lines is fixed for the set's lifetime.
    /// * `strict_cold_lines` - Create placeholders that never match (see [`Line::placeholder`]).
    pub fn new(ways: usize, strict_cold_lines: bool) -> Self {
        Self {
            lines: vec![Line::placeholder(strict_cold_lines); ways],
        }
    }

    /// Tests for `tag`, installing it on a miss.
    ///
    /// # Returns
    ///
    /// `true` on a hit (the set is unchanged). `false` on a miss, after the
    /// oldest line has been dropped and `tag` appended as the newest line.
    pub fn probe(&mut self, tag: u64) -> bool {
        if self.contains(tag) {
            return true;
        }
        if self.lines.is_empty() {
            return false;
        }

        self.lines.rotate_left(1);
        if let Some(newest) = self.lines.last_mut() {
            *newest = Line { tag, valid: true };
        }
        false
    }

    /// Returns `true` if `tag` is resident, without installing it.
    pub fn contains(&self, tag: u64) -> bool {
        self.lines.iter().any(|line| line.holds(tag))
    }

    /// Lines from oldest to newest.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Number of lines (the associativity).
    pub fn ways(&self) -> usize {
        self.lines.len()
    }
}
