//! Multi-level cache hierarchy simulator library.
//!
//! This crate replays a stream of memory read addresses through a configurable
//! chain of set-associative caches and reports per-level statistics:
//! 1. **Cache:** Tag-only lines, FIFO sets, cache levels and the hierarchy chain.
//! 2. **Prefetch:** The `PrefetchPolicy` contract plus common-stride and next-line policies.
//! 3. **Simulation:** Address history, trace ingestion, and the replay driver.
//! 4. **Configuration:** Descriptor and structured JSON loading with validation.
//! 5. **Statistics:** Demand/prefetch accounting, rates, and report rendering.

/// Common types (addresses, access origin, errors).
pub mod common;
/// Simulator configuration (defaults, level geometry, prefetch selection).
pub mod config;
/// Cache and prefetch hardware units.
pub mod core;
/// Trace ingestion, address history, and the replay driver.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; load with `Config::from_path` or `Config::from_json_str`.
pub use crate::config::Config;
/// Cache hierarchy; built from a `Config`.
pub use crate::core::units::cache::Hierarchy;
/// Replay driver; owns the hierarchy, history and optional prefetcher.
pub use crate::sim::Simulator;
/// Aggregated run statistics.
pub use crate::stats::SimStats;
