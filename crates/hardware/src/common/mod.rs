//! Common utilities and types shared by the cache simulator.
//!
//! This module provides:
//! 1. **Address helpers:** Line alignment and signed address differences.
//! 2. **Access origin:** Distinguishes demand traffic from prefetch traffic.
//! 3. **Error handling:** Configuration, trace, prefetch and report errors.

/// Address helpers and the access origin flag.
pub mod addr;

/// Error types for every fallible stage of a run.
pub mod error;

pub use addr::{AccessOrigin, Addr};
pub use error::{ConfigError, PrefetchError, ReportError, SimError, TraceError};
