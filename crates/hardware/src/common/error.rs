//! Error definitions.
//!
//! Every failure in a run is fatal; there is no retryable class. This module provides:
//! 1. **Configuration errors:** Raised while loading and validating the hierarchy description.
//! 2. **Trace errors:** Raised while reading the memory trace.
//! 3. **Prefetch errors:** Raised when a prefetch policy breaks its contract.
//! 4. **Report errors:** Raised when a rate would divide by zero.
//!
//! Level numbers in messages are 1-based, matching the report labels (`l1`, `l2`, ...).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Invalid or incomplete hierarchy configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The descriptor contains no records at all.
    #[error("configuration descriptor is empty")]
    Empty,

    /// Record 0 does not carry `nlevels`.
    #[error("configuration record 0 is missing the level count `nlevels`")]
    MissingLevelCount,

    /// The hierarchy has no levels.
    #[error("a cache hierarchy needs at least one level")]
    NoLevels,

    /// Fewer level records than `nlevels` announced.
    #[error("configuration declares {declared} levels but only {found} level records are present")]
    MissingLevelRecord {
        /// Level count declared in record 0.
        declared: usize,
        /// Level records actually present.
        found: usize,
    },

    /// A required per-level field is absent.
    #[error("level {level}: required field `{field}` is missing")]
    MissingField {
        /// 1-based level number.
        level: usize,
        /// Descriptor field name.
        field: &'static str,
    },

    /// A geometry field is zero.
    #[error("level {level}: `{field}` must be greater than zero")]
    ZeroField {
        /// 1-based level number.
        level: usize,
        /// Descriptor field name.
        field: &'static str,
    },

    /// `ways * linesize * wordsize` does not fit in 64 bits.
    #[error("level {level}: set size `setsize * linesize * wordsize` overflows 64 bits")]
    GeometryOverflow {
        /// 1-based level number.
        level: usize,
    },

    /// The geometry leaves no room for a single set.
    #[error(
        "level {level}: {size_bytes} bytes cannot hold one set of {ways} ways x {line_bytes}-byte lines"
    )]
    ZeroSets {
        /// 1-based level number.
        level: usize,
        /// Configured capacity.
        size_bytes: u64,
        /// Configured associativity.
        ways: u64,
        /// Line size in bytes (`line_size * word_size`).
        line_bytes: u64,
    },

    /// The last level does not define the memory latency.
    #[error("the last level must define the memory latency `memlatency`")]
    MissingMemoryLatency,

    /// The fetch level is needed but absent.
    #[error("prefetching is enabled but no `fetch_level` is configured")]
    MissingFetchLevel,

    /// The fetch level does not name an existing level.
    #[error("fetch level {fetch_level} is out of range for a {levels}-level hierarchy")]
    FetchLevelOutOfRange {
        /// Configured 1-based fetch level.
        fetch_level: usize,
        /// Number of levels in the hierarchy.
        levels: usize,
    },

    /// The configuration file could not be read.
    #[error("failed to read configuration {}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The configuration is not valid JSON or has the wrong shape.
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure while reading a memory trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace could not be read.
    #[error("failed to read memory trace")]
    Io(#[from] io::Error),

    /// A read record could not be decoded.
    #[error("trace line {line}: {reason}")]
    Malformed {
        /// 1-based line number in the trace.
        line: usize,
        /// What was wrong with the record.
        reason: String,
    },
}

/// Violation of the prefetch policy contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrefetchError {
    /// No policy is registered under the requested name.
    #[error("unknown prefetch policy `{0}`")]
    UnknownPolicy(String),

    /// The policy was asked to predict from an empty history.
    #[error("prefetch policy `{0}` was called with an empty address history")]
    EmptyHistory(&'static str),
}

/// Failure while deriving report figures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    /// A rate was requested for a level that saw no accesses.
    #[error("level {level} recorded zero accesses; its rates are undefined")]
    ZeroAccesses {
        /// 1-based level number.
        level: usize,
    },
}

/// Any fatal error raised by a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    /// Configuration problem.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Trace problem.
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// Prefetch policy problem.
    #[error(transparent)]
    Prefetch(#[from] PrefetchError),

    /// Reporting problem.
    #[error(transparent)]
    Report(#[from] ReportError),
}
