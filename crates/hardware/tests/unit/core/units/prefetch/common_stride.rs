//! Common-Stride Prefetcher Tests.
//!
//! Verifies stride counting over the recent window, the tie-break order
//! (count, then magnitude, then first occurrence), both prediction variants,
//! and the empty-history contract.

use cachesim_core::common::addr::Addr;
use cachesim_core::common::error::PrefetchError;
use cachesim_core::config::StrideSelection;
use cachesim_core::core::units::prefetch::{
    CommonStridePrefetcher, PrefetchPolicy, STRIDE_WINDOW, StrideTally,
};

fn predict(history: &[Addr]) -> Addr {
    CommonStridePrefetcher::new(StrideSelection::Stride)
        .predict(history)
        .unwrap()
}

// ══════════════════════════════════════════════════════════
// 1. Stride prediction
// ══════════════════════════════════════════════════════════

#[test]
fn constant_stride_predicts_next_element() {
    assert_eq!(predict(&[10, 20, 30, 40]), 50);
}

#[test]
fn negative_stride_walks_downward() {
    assert_eq!(predict(&[100, 90, 80]), 70);
}

#[test]
fn repeated_address_predicts_itself() {
    assert_eq!(predict(&[5, 5, 5]), 5);
}

#[test]
fn single_entry_predicts_itself() {
    assert_eq!(predict(&[7]), 7);
}

#[test]
fn zero_differences_are_ignored() {
    // 0 0 8 8 16 16: only +8 counts.
    assert_eq!(predict(&[0, 0, 8, 8, 16, 16]), 24);
}

// ══════════════════════════════════════════════════════════
// 2. Tie-breaks
// ══════════════════════════════════════════════════════════

#[test]
fn frequency_beats_magnitude() {
    assert_eq!(predict(&[0, 1, 2, 3, 100]), 101);
}

#[test]
fn equal_counts_prefer_larger_magnitude() {
    // Strides +10 and +30 once each; +30 wins although seen second.
    assert_eq!(predict(&[0, 10, 10, 40]), 70);
    assert_eq!(
        CommonStridePrefetcher::most_common_stride(&[0, 10, 10, 40]),
        Some(StrideTally {
            stride: 30,
            count: 1
        })
    );
}

#[test]
fn equal_count_and_magnitude_prefer_first_seen() {
    // +10 then -10.
    assert_eq!(predict(&[0, 10, 0]), 10);
    // -10 then +10.
    assert_eq!(predict(&[10, 0, 10]), 0);
}

#[test]
fn most_common_stride_is_none_without_movement() {
    assert_eq!(CommonStridePrefetcher::most_common_stride(&[]), None);
    assert_eq!(CommonStridePrefetcher::most_common_stride(&[3]), None);
    assert_eq!(CommonStridePrefetcher::most_common_stride(&[3, 3, 3]), None);
}

// ══════════════════════════════════════════════════════════
// 3. Window
// ══════════════════════════════════════════════════════════

/// 200 addresses 1000 apart followed by 100 addresses 3 apart.
fn two_phase_history() -> Vec<Addr> {
    let slow: Vec<Addr> = (0..200).map(|i| i * 1000).collect();
    let base = slow[slow.len() - 1];
    let fast = (1..=100).map(|i| base + i * 3);
    slow.into_iter().chain(fast).collect()
}

#[test]
fn only_the_recent_window_is_examined() {
    let history = two_phase_history();
    let last = history[history.len() - 1];
    assert_eq!(STRIDE_WINDOW, 100);
    assert_eq!(predict(&history), last + 3);
}

#[test]
fn wider_window_sees_older_strides() {
    let history = two_phase_history();
    let last = history[history.len() - 1];
    let wide = CommonStridePrefetcher::with_window(StrideSelection::Stride, 1000);
    assert_eq!(wide.predict(&history).unwrap(), last + 1000);
}

// ══════════════════════════════════════════════════════════
// 4. Occurrence-count variant
// ══════════════════════════════════════════════════════════

#[test]
fn occurrence_count_adds_the_count() {
    let policy = CommonStridePrefetcher::new(StrideSelection::OccurrenceCount);
    assert_eq!(policy.predict(&[10, 20, 30, 40]).unwrap(), 43);
    assert_eq!(policy.predict(&[5, 5, 5]).unwrap(), 5);
    // Count is positive even for a negative stride.
    assert_eq!(policy.predict(&[100, 90, 80]).unwrap(), 82);
}

// ══════════════════════════════════════════════════════════
// 5. Contract
// ══════════════════════════════════════════════════════════

#[test]
fn empty_history_is_an_error() {
    let policy = CommonStridePrefetcher::new(StrideSelection::Stride);
    assert_eq!(
        policy.predict(&[]),
        Err(PrefetchError::EmptyHistory("common-stride"))
    );
}

#[test]
fn prediction_is_a_pure_function_of_history() {
    let policy = CommonStridePrefetcher::new(StrideSelection::Stride);
    let history = [64, 128, 256, 320, 384];
    let first = policy.predict(&history).unwrap();
    assert_eq!(policy.predict(&history).unwrap(), first);
    assert_eq!(first, 448);
}
