//! Configuration system for the cache simulator.
//!
//! This module defines the structures used to parameterize a run. It provides:
//! 1. **Defaults:** Baseline geometry and latencies for a single-level hierarchy.
//! 2. **Structures:** Per-level geometry, prefetch selection, and the root `Config`.
//! 3. **Enums:** Hit attribution mode, prefetch policy kind, and stride selection.
//! 4. **Loading:** Two accepted JSON shapes, detected from the top-level value.
//!
//! The *descriptor* shape is an array of records. Record 0 carries `nlevels`,
//! records `1..=nlevels` carry `cachesize`, `linesize`, `setsize`, `wordsize`
//! and `latency`, the last level record carries `memlatency`, and the final
//! record carries the 1-based `fetch_level`. The *structured* shape is an
//! object that deserializes directly into [`Config`].

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::common::error::{ConfigError, PrefetchError};

/// Default configuration constants for the simulator.
mod defaults {
    /// Default cache capacity in bytes (32 KiB).
    pub const SIZE_BYTES: u64 = 32 * 1024;

    /// Default line size in elements.
    pub const LINE_SIZE: u64 = 64;

    /// Default associativity.
    pub const WAYS: u64 = 8;

    /// Default element width in bytes.
    ///
    /// With one byte per element the line size is directly in bytes.
    pub const WORD_SIZE: u64 = 1;

    /// Default hit latency in cycles.
    pub const LATENCY: u64 = 4;

    /// Default latency of a miss that falls through to memory.
    pub const MEMORY_LATENCY: u64 = 100;
}

/// How a demand hit is credited to a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HitAttribution {
    /// Credit the level that the lookup reports as having produced the hit.
    #[default]
    ResolvedLevel,
    /// Credit the first level whose configured latency equals the returned latency.
    ///
    /// Ambiguous when two levels share a latency; kept for comparison with
    /// reports produced by latency-matching tools.
    LatencyMatch,
}

/// Prefetch policy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrefetchPolicyKind {
    /// No prefetching.
    #[default]
    None,
    /// Predicts the most common recent stride.
    #[serde(alias = "prefetch_commonStride")]
    CommonStride,
    /// Predicts the line following the last address.
    NextLine,
}

impl PrefetchPolicyKind {
    /// Name used on the command line and in run names.
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::CommonStride => "common-stride",
            Self::NextLine => "next-line",
        }
    }
}

impl fmt::Display for PrefetchPolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PrefetchPolicyKind {
    type Err = PrefetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "common-stride" | "prefetch_commonStride" => Ok(Self::CommonStride),
            "next-line" => Ok(Self::NextLine),
            other => Err(PrefetchError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Which quantity the common-stride policy adds to the last address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrideSelection {
    /// Add the most frequent stride itself.
    #[default]
    Stride,
    /// Add the occurrence count of the most frequent stride.
    ///
    /// Matches reports from stride tools that return the count instead of
    /// the stride value.
    OccurrenceCount,
}

/// Prefetcher configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct PrefetchConfig {
    /// Policy to run after each demand access.
    #[serde(default)]
    pub policy: PrefetchPolicyKind,

    /// Prediction variant used by the common-stride policy.
    #[serde(default)]
    pub stride_selection: StrideSelection,
}

impl PrefetchConfig {
    /// Returns `true` when a policy is selected.
    pub fn is_enabled(&self) -> bool {
        self.policy != PrefetchPolicyKind::None
    }
}

/// Geometry and timing of one cache level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct LevelConfig {
    /// Total capacity in bytes
    pub size_bytes: u64,

    /// Line size in elements
    pub line_size: u64,

    /// Associativity (lines per set)
    pub ways: u64,

    /// Element width in bytes
    #[serde(default = "LevelConfig::default_word_size")]
    pub word_size: u64,

    /// Hit latency in cycles
    pub latency: u64,
}

impl LevelConfig {
    /// Returns the default element width.
    fn default_word_size() -> u64 {
        defaults::WORD_SIZE
    }

    /// Line size in bytes, saturating at `u64::MAX`.
    ///
    /// [`LevelConfig::validate`] rejects geometries where this saturates.
    pub const fn line_bytes(&self) -> u64 {
        self.line_size.saturating_mul(self.word_size)
    }

    /// Bytes in one set, or `None` if `ways * line_size * word_size` overflows.
    pub const fn checked_set_bytes(&self) -> Option<u64> {
        match self.line_size.checked_mul(self.word_size) {
            Some(line_bytes) => self.ways.checked_mul(line_bytes),
            None => None,
        }
    }

    /// Number of sets, `floor(size / (ways * line_bytes))`.
    ///
    /// Returns 0 when any divisor field is zero or the set size overflows;
    /// [`LevelConfig::validate`] rejects both cases.
    pub const fn num_sets(&self) -> u64 {
        match self.checked_set_bytes() {
            Some(0) | None => 0,
            Some(set_bytes) => self.size_bytes / set_bytes,
        }
    }

    /// Checks that the geometry yields at least one set.
    ///
    /// # Arguments
    ///
    /// * `level` - 1-based level number used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroField`] for a zero line size, element width
    /// or associativity, [`ConfigError::GeometryOverflow`] when the set size
    /// does not fit in 64 bits, and [`ConfigError::ZeroSets`] when the
    /// capacity is smaller than one set.
    pub fn validate(&self, level: usize) -> Result<(), ConfigError> {
        if self.line_size == 0 {
            return Err(ConfigError::ZeroField {
                level,
                field: "linesize",
            });
        }
        if self.word_size == 0 {
            return Err(ConfigError::ZeroField {
                level,
                field: "wordsize",
            });
        }
        if self.ways == 0 {
            return Err(ConfigError::ZeroField {
                level,
                field: "setsize",
            });
        }
        if self.checked_set_bytes().is_none() {
            return Err(ConfigError::GeometryOverflow { level });
        }
        if self.num_sets() == 0 {
            return Err(ConfigError::ZeroSets {
                level,
                size_bytes: self.size_bytes,
                ways: self.ways,
                line_bytes: self.line_bytes(),
            });
        }
        Ok(())
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            size_bytes: defaults::SIZE_BYTES,
            line_size: defaults::LINE_SIZE,
            ways: defaults::WAYS,
            word_size: defaults::WORD_SIZE,
            latency: defaults::LATENCY,
        }
    }
}

/// Root configuration structure.
///
/// # Examples
///
/// Loading the record-array descriptor:
///
/// ```
/// use cachesim_core::config::Config;
///
/// let json = r#"[
///     { "nlevels": 2 },
///     { "cachesize": 32768, "linesize": 64, "setsize": 4, "wordsize": 1, "latency": 4 },
///     { "cachesize": 262144, "linesize": 64, "setsize": 8, "wordsize": 1, "latency": 12,
///       "memlatency": 200, "fetch_level": 2 }
/// ]"#;
///
/// let config = Config::from_json_str(json).unwrap();
/// assert_eq!(config.levels.len(), 2);
/// assert_eq!(config.levels[0].num_sets(), 128);
/// assert_eq!(config.memory_latency, 200);
/// assert_eq!(config.fetch_level, Some(2));
/// ```
///
/// Loading the structured form:
///
/// ```
/// use cachesim_core::config::{Config, PrefetchPolicyKind, StrideSelection};
///
/// let json = r#"{
///     "levels": [ { "size_bytes": 32, "line_size": 4, "ways": 2, "latency": 1 } ],
///     "memory_latency": 100,
///     "fetch_level": 1,
///     "prefetch": { "policy": "common-stride", "stride_selection": "occurrence_count" }
/// }"#;
///
/// let config = Config::from_json_str(json).unwrap();
/// assert_eq!(config.levels[0].word_size, 1);
/// assert_eq!(config.prefetch.policy, PrefetchPolicyKind::CommonStride);
/// assert_eq!(config.prefetch.stride_selection, StrideSelection::OccurrenceCount);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Cache levels, fastest first
    pub levels: Vec<LevelConfig>,

    /// Latency charged when the last level misses
    pub memory_latency: u64,

    /// 1-based level that prefetched addresses are injected into
    #[serde(default)]
    pub fetch_level: Option<usize>,

    /// How demand hits are credited to levels
    #[serde(default)]
    pub hit_attribution: HitAttribution,

    /// Create placeholder lines invalid instead of valid with tag 0
    #[serde(default)]
    pub strict_cold_lines: bool,

    /// Prefetcher selection
    #[serde(default)]
    pub prefetch: PrefetchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            levels: vec![LevelConfig::default()],
            memory_latency: defaults::MEMORY_LATENCY,
            fetch_level: None,
            hit_attribution: HitAttribution::default(),
            strict_cold_lines: false,
            prefetch: PrefetchConfig::default(),
        }
    }
}

/// One record of the array descriptor. Every field is optional at parse time;
/// presence is checked per record role.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DescriptorRecord {
    nlevels: Option<usize>,
    cachesize: Option<u64>,
    linesize: Option<u64>,
    setsize: Option<u64>,
    wordsize: Option<u64>,
    latency: Option<u64>,
    memlatency: Option<u64>,
    fetch_level: Option<usize>,
}

impl DescriptorRecord {
    fn level(&self, level: usize) -> Result<LevelConfig, ConfigError> {
        let field = |value: Option<u64>, field: &'static str| {
            value.ok_or(ConfigError::MissingField { level, field })
        };
        Ok(LevelConfig {
            size_bytes: field(self.cachesize, "cachesize")?,
            line_size: field(self.linesize, "linesize")?,
            ways: field(self.setsize, "setsize")?,
            word_size: field(self.wordsize, "wordsize")?,
            latency: field(self.latency, "latency")?,
        })
    }
}

impl Config {
    /// Parses either JSON shape and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and any validation
    /// error from [`Config::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let config = if value.is_array() {
            let records: Vec<DescriptorRecord> = serde_json::from_value(value)?;
            Self::from_descriptor(&records)?
        } else {
            serde_json::from_value(value)?
        };
        config.validate()?;
        info!(
            levels = config.levels.len(),
            memory_latency = config.memory_latency,
            fetch_level = ?config.fetch_level,
            "loaded cache configuration"
        );
        Ok(config)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`Config::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    fn from_descriptor(records: &[DescriptorRecord]) -> Result<Self, ConfigError> {
        let header = records.first().ok_or(ConfigError::Empty)?;
        let declared = header.nlevels.ok_or(ConfigError::MissingLevelCount)?;
        if declared == 0 {
            return Err(ConfigError::NoLevels);
        }
        let found = records.len() - 1;
        if found < declared {
            return Err(ConfigError::MissingLevelRecord { declared, found });
        }

        let levels = records[1..=declared]
            .iter()
            .enumerate()
            .map(|(i, record)| record.level(i + 1))
            .collect::<Result<Vec<_>, _>>()?;
        let memory_latency = records[declared]
            .memlatency
            .ok_or(ConfigError::MissingMemoryLatency)?;
        let fetch_level = records.last().and_then(|record| record.fetch_level);

        Ok(Self {
            levels,
            memory_latency,
            fetch_level,
            ..Self::default()
        })
    }

    /// Validates level geometry and the fetch level.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoLevels`] for an empty hierarchy, the first
    /// per-level geometry error, [`ConfigError::FetchLevelOutOfRange`] for a
    /// fetch level outside `1..=levels`, and [`ConfigError::MissingFetchLevel`]
    /// when a prefetch policy is selected without a fetch level.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        for (i, level) in self.levels.iter().enumerate() {
            level.validate(i + 1)?;
        }
        if let Some(fetch_level) = self.fetch_level {
            if fetch_level == 0 || fetch_level > self.levels.len() {
                return Err(ConfigError::FetchLevelOutOfRange {
                    fetch_level,
                    levels: self.levels.len(),
                });
            }
        } else if self.prefetch.is_enabled() {
            return Err(ConfigError::MissingFetchLevel);
        }
        Ok(())
    }

    /// 0-based index of the fetch level, if one is configured.
    pub fn fetch_level_index(&self) -> Option<usize> {
        self.fetch_level.map(|level| level.saturating_sub(1))
    }

    /// Size in bytes of the pieces over-sized trace reads are split into:
    /// the line size of the first level.
    pub fn chunk_bytes(&self) -> u64 {
        self.levels.first().map_or(1, LevelConfig::line_bytes)
    }
}
