//! Hardware units.
//!
//! This module contains the set-associative cache hierarchy and the prefetch
//! policies that predict the next demand address.

/// Cache hierarchy implementation (lines, FIFO sets, levels, level chain).
pub mod cache;

/// Prefetch policy contract and implementations (common-stride, next-line).
pub mod prefetch;
