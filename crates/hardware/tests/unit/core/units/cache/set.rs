//! FIFO Set Tests.
//!
//! Verifies insertion-order replacement, that hits leave the set untouched,
//! and how placeholder lines behave with and without strict cold lines.

use pretty_assertions::assert_eq;

use cachesim_core::core::units::cache::{CacheSet, Line};

fn tags(set: &CacheSet) -> Vec<u64> {
    set.lines().iter().map(|line| line.tag).collect()
}

// ══════════════════════════════════════════════════════════
// 1. Replacement order
// ══════════════════════════════════════════════════════════

#[test]
fn miss_appends_newest_and_drops_oldest() {
    let mut set = CacheSet::new(3, true);
    assert!(!set.probe(10));
    assert!(!set.probe(20));
    assert!(!set.probe(30));
    assert_eq!(tags(&set), vec![10, 20, 30]);

    assert!(!set.probe(40));
    assert_eq!(tags(&set), vec![20, 30, 40]);
    assert!(!set.contains(10));
}

/// A hit on the oldest line does not protect it: this is FIFO, not LRU.
#[test]
fn hit_does_not_reorder() {
    let mut set = CacheSet::new(2, true);
    set.probe(10);
    set.probe(20);

    assert!(set.probe(10));
    assert_eq!(tags(&set), vec![10, 20]);

    assert!(!set.probe(30));
    assert_eq!(tags(&set), vec![20, 30]);
    assert!(!set.probe(10));
}

#[test]
fn line_count_is_fixed() {
    let mut set = CacheSet::new(4, false);
    for tag in (0..100).map(|i| i * 8) {
        set.probe(tag);
        assert_eq!(set.lines().len(), 4);
    }
    assert_eq!(set.ways(), 4);
    assert_eq!(tags(&set), vec![768, 776, 784, 792]);
}

#[test]
fn contains_has_no_side_effects() {
    let mut set = CacheSet::new(2, true);
    set.probe(4);
    let before = set.lines().to_vec();

    assert!(set.contains(4));
    assert!(!set.contains(8));
    assert_eq!(set.lines(), before.as_slice());
}

// ══════════════════════════════════════════════════════════
// 2. Placeholder lines
// ══════════════════════════════════════════════════════════

/// Placeholders are valid lines tagged 0, so address 0 hits on a cold set.
#[test]
fn cold_set_matches_tag_zero_by_default() {
    let mut set = CacheSet::new(2, false);
    assert_eq!(set.lines(), &[Line { tag: 0, valid: true }; 2]);
    assert!(set.probe(0));
    assert_eq!(set.lines(), &[Line { tag: 0, valid: true }; 2]);
}

/// The tag-0 collision lasts only while a placeholder survives.
#[test]
fn placeholder_collision_ends_when_pushed_out() {
    let mut set = CacheSet::new(2, false);
    assert!(!set.probe(8));
    assert!(set.probe(0));
    assert!(!set.probe(12));
    assert_eq!(tags(&set), vec![8, 12]);
    assert!(!set.probe(0));
}

#[test]
fn strict_cold_set_misses_tag_zero() {
    let mut set = CacheSet::new(2, true);
    assert!(!set.contains(0));
    assert!(!set.probe(0));
    assert_eq!(
        set.lines(),
        &[
            Line {
                tag: 0,
                valid: false
            },
            Line { tag: 0, valid: true },
        ]
    );
    assert!(set.probe(0));
}

#[test]
fn placeholder_validity_follows_strictness() {
    assert!(Line::placeholder(false).holds(0));
    assert!(!Line::placeholder(true).holds(0));
    assert!(!Line::placeholder(false).holds(4));
}
