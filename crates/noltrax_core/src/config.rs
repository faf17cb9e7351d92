//! # Analysis Configuration
//!
//! The few knobs of the analytics engine that legitimately vary between
//! producers. Everything else (stability thresholds, confidence weights,
//! prompt triggers) is a fixed constant of its module.
//!
//! ## Usage
//!
//! ```rust
//! use noltrax_core::config::{AnalysisConfig, BucketPolicy};
//!
//! // Fixed 5-minute buckets, y runs goal to goal
//! let config = AnalysisConfig::default();
//! assert_eq!(config.density, BucketPolicy::FixedWidth { minutes: 5 });
//!
//! // Deprecated 10-bucket scheme of the first data viewer
//! let legacy = AnalysisConfig::legacy();
//! assert_eq!(legacy.density, BucketPolicy::LegacyCount { buckets: 10 });
//! ```
//!
//! ## Environment Variables
//!
//! - `NOLTRAX_BUCKET_POLICY`: `fixed`, `fixed:<minutes>`, `legacy`, `legacy:<buckets>`
//! - `NOLTRAX_LENGTH_AXIS`: `x` or `y`

use crate::error::{AnalysisError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

/// Default bucket width of the fixed-width density policy.
pub const DEFAULT_BUCKET_MINUTES: u32 = 5;

/// Bucket count of the legacy density policy.
pub const LEGACY_BUCKET_COUNT: u32 = 10;

/// Largest bucket count the legacy density policy accepts.
pub const MAX_LEGACY_BUCKETS: u32 = 1_000;

/// How the temporal density binner partitions the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BucketPolicy {
    /// Buckets of a fixed real-time width; count follows the data.
    FixedWidth { minutes: u32 },
    /// Deprecated: a fixed number of buckets stretched over the observed range.
    LegacyCount { buckets: u32 },
}

impl Default for BucketPolicy {
    fn default() -> Self {
        BucketPolicy::FixedWidth {
            minutes: DEFAULT_BUCKET_MINUTES,
        }
    }
}

impl FromStr for BucketPolicy {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_ascii_lowercase();
        let (kind, arg) = match s.split_once(':') {
            Some((kind, arg)) => (kind.to_string(), Some(arg.to_string())),
            None => (s.clone(), None),
        };

        let parse_arg = |default: u32| -> Result<u32> {
            match &arg {
                None => Ok(default),
                Some(raw) => match raw.trim().parse::<u32>() {
                    Ok(0) | Err(_) => Err(AnalysisError::Config(format!(
                        "bucket policy argument must be a positive integer, got '{}'",
                        raw
                    ))),
                    Ok(v) => Ok(v),
                },
            }
        };

        let policy = match kind.as_str() {
            "fixed" => BucketPolicy::FixedWidth {
                minutes: parse_arg(DEFAULT_BUCKET_MINUTES)?,
            },
            "legacy" => BucketPolicy::LegacyCount {
                buckets: parse_arg(LEGACY_BUCKET_COUNT)?,
            },
            other => {
                return Err(AnalysisError::Config(format!(
                    "unknown bucket policy '{}'",
                    other
                )))
            }
        };
        policy.validate()?;
        Ok(policy)
    }
}

impl BucketPolicy {
    /// Rejects policies that cannot partition a timeline or would produce
    /// an unbounded number of buckets.
    pub fn validate(&self) -> Result<()> {
        match *self {
            BucketPolicy::FixedWidth { minutes: 0 } => Err(AnalysisError::Config(
                "fixed bucket width must be at least one minute".to_string(),
            )),
            BucketPolicy::LegacyCount { buckets: 0 } => Err(AnalysisError::Config(
                "legacy bucket count must be at least one".to_string(),
            )),
            BucketPolicy::LegacyCount { buckets } if buckets > MAX_LEGACY_BUCKETS => {
                Err(AnalysisError::Config(format!(
                    "legacy bucket count must be at most {}, got {}",
                    MAX_LEGACY_BUCKETS, buckets
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Which pitch coordinate runs goal to goal.
///
/// The pitch board stores percentages in `[0, 100]` on both axes. With
/// `LengthAxis::Y` the defending goal sits at `y = 0` and the width bands
/// read left/centre/right along `x`. With `LengthAxis::X` the roles swap
/// and the width bands read upper/centre/lower along `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LengthAxis {
    X,
    #[default]
    Y,
}

impl FromStr for LengthAxis {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(LengthAxis::X),
            "y" => Ok(LengthAxis::Y),
            other => Err(AnalysisError::Config(format!(
                "length axis must be 'x' or 'y', got '{}'",
                other
            ))),
        }
    }
}

/// Complete analysis configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisConfig {
    /// Temporal density bucketing
    #[serde(default)]
    pub density: BucketPolicy,
    /// Pitch orientation used by the formation detector
    #[serde(default)]
    pub length_axis: LengthAxis,
}

impl AnalysisConfig {
    /// Current defaults (fixed 5-minute buckets, y as length axis).
    pub fn standard() -> Self {
        Self::default()
    }

    /// Reproduces the first data viewer's 10-bucket density chart.
    pub fn legacy() -> Self {
        Self {
            density: BucketPolicy::LegacyCount {
                buckets: LEGACY_BUCKET_COUNT,
            },
            ..Self::default()
        }
    }

    pub fn with_bucket_policy(mut self, policy: BucketPolicy) -> Self {
        self.density = policy;
        self
    }

    pub fn with_length_axis(mut self, axis: LengthAxis) -> Self {
        self.length_axis = axis;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.density.validate()
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `NOLTRAX_*` overrides on top of the defaults.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env_or_default() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup("NOLTRAX_BUCKET_POLICY") {
            match raw.parse::<BucketPolicy>() {
                Ok(policy) => config.density = policy,
                Err(e) => tracing::warn!("ignoring NOLTRAX_BUCKET_POLICY: {}", e),
            }
        }

        if let Some(raw) = lookup("NOLTRAX_LENGTH_AXIS") {
            match raw.parse::<LengthAxis>() {
                Ok(axis) => config.length_axis = axis,
                Err(e) => tracing::warn!("ignoring NOLTRAX_LENGTH_AXIS: {}", e),
            }
        }

        config
    }
}
