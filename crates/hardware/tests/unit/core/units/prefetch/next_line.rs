//! Next-Line Prefetcher Tests.

use cachesim_core::common::error::PrefetchError;
use cachesim_core::core::units::prefetch::{NextLinePrefetcher, PrefetchPolicy};

#[test]
fn predicts_start_of_following_line() {
    let policy = NextLinePrefetcher::new(64);
    assert_eq!(policy.predict(&[100]).unwrap(), 128);
    assert_eq!(policy.predict(&[128]).unwrap(), 192);
    assert_eq!(policy.predict(&[0, 4096, 191]).unwrap(), 192);
}

#[test]
fn zero_line_size_is_treated_as_one_byte() {
    let policy = NextLinePrefetcher::new(0);
    assert_eq!(policy.predict(&[41]).unwrap(), 42);
}

#[test]
fn empty_history_is_an_error() {
    let policy = NextLinePrefetcher::new(64);
    assert_eq!(policy.name(), "next-line");
    assert_eq!(
        policy.predict(&[]),
        Err(PrefetchError::EmptyHistory("next-line"))
    );
}
