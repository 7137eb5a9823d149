//! Hierarchy Tests.
//!
//! Verifies the level chain: lookups fall through on a miss, hit latency is
//! the hitting level's own latency, terminal misses cost the memory latency,
//! and lookups entering below level 1 leave level 1 alone.

use pretty_assertions::assert_eq;

use cachesim_core::common::addr::AccessOrigin;
use cachesim_core::core::units::cache::{AccessResult, Hierarchy};

use crate::common::two_levels;

const MISS: AccessResult = AccessResult {
    hit: false,
    latency: 100,
    level: None,
};

#[test]
fn builds_levels_in_order() {
    let hierarchy = Hierarchy::new(&two_levels(true));
    assert_eq!(hierarchy.len(), 2);
    assert!(!hierarchy.is_empty());
    assert_eq!(hierarchy.memory_latency(), 100);
    assert_eq!(hierarchy.levels()[0].num_sets(), 4);
    assert_eq!(hierarchy.levels()[1].num_sets(), 8);
}

#[test]
fn terminal_miss_installs_in_every_level() {
    let mut hierarchy = Hierarchy::new(&two_levels(true));

    assert_eq!(hierarchy.access(0, 40, AccessOrigin::Demand), MISS);
    assert!(hierarchy.levels()[0].contains(40));
    assert!(hierarchy.levels()[1].contains(40));
    assert_eq!(hierarchy.levels()[0].demand_evictions(), 1);
    assert_eq!(hierarchy.levels()[1].demand_evictions(), 1);
}

#[test]
fn first_level_hit_stops_the_walk() {
    let mut hierarchy = Hierarchy::new(&two_levels(true));
    hierarchy.access(0, 40, AccessOrigin::Demand);

    assert_eq!(
        hierarchy.access(0, 41, AccessOrigin::Demand),
        AccessResult {
            hit: true,
            latency: 1,
            level: Some(0),
        }
    );
    assert_eq!(hierarchy.levels()[1].demand_evictions(), 1);
}

/// 40, 56 and 72 all map to set 0 of both levels. Level 1 holds two of them,
/// level 2 holds all three, so the fourth lookup of 40 hits in level 2.
#[test]
fn second_level_hit_reports_its_own_latency() {
    let mut hierarchy = Hierarchy::new(&two_levels(true));
    for addr in [40, 40, 56, 72] {
        hierarchy.access(0, addr, AccessOrigin::Demand);
    }

    assert_eq!(
        hierarchy.access(0, 40, AccessOrigin::Demand),
        AccessResult {
            hit: true,
            latency: 10,
            level: Some(1),
        }
    );
    assert_eq!(hierarchy.levels()[0].demand_evictions(), 4);
    assert_eq!(hierarchy.levels()[1].demand_evictions(), 3);
}

#[test]
fn lookup_entering_at_level_two_skips_level_one() {
    let mut hierarchy = Hierarchy::new(&two_levels(true));

    assert_eq!(hierarchy.access(1, 200, AccessOrigin::Prefetch), MISS);
    assert!(!hierarchy.levels()[0].contains(200));
    assert!(hierarchy.levels()[1].contains(200));
    assert_eq!(hierarchy.levels()[0].prefetch_evictions(), 0);
    assert_eq!(hierarchy.levels()[1].prefetch_evictions(), 1);
    assert_eq!(hierarchy.levels()[1].demand_evictions(), 0);

    // A later demand lookup misses level 1 and finds the prefetched line.
    assert_eq!(
        hierarchy.access(0, 200, AccessOrigin::Demand).level,
        Some(1)
    );
}

#[test]
fn out_of_range_start_is_a_terminal_miss() {
    let mut hierarchy = Hierarchy::new(&two_levels(true));
    assert_eq!(hierarchy.access(5, 40, AccessOrigin::Demand), MISS);
    assert!(
        hierarchy
            .levels()
            .iter()
            .all(|level| level.demand_evictions() == 0)
    );
}
