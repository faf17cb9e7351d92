//! # Action Rhythm
//!
//! Measures how evenly actions are spread in time.
//!
//! ## Algorithm
//! 1. Keep timed events, stable-sort by elapsed time
//! 2. Intervals between consecutive events (seconds, never negative)
//! 3. Mean, population variance (÷N), standard deviation
//! 4. Coefficient of variation `cv = 100 * sd / mean`
//!
//! | cv | Stability |
//! |----|-----------|
//! | `< 30` | Stable rhythm |
//! | `30 ..< 60` | Moderate fluctuation |
//! | `>= 60` | Highly irregular rhythm |

use crate::models::{timed_seconds, Event};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coefficient of variation below which a rhythm is stable.
pub const STABLE_CV_BELOW: f64 = 30.0;

/// Coefficient of variation from which a rhythm is highly irregular.
pub const IRREGULAR_CV_FROM: f64 = 60.0;

/// Minimum number of timed events needed to measure a rhythm.
pub const MIN_TIMED_EVENTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Stability {
    Stable,
    ModerateFluctuation,
    HighlyIrregular,
    /// Fewer than two timed events
    InsufficientData,
    /// Every event logged at the same instant (mean interval of zero)
    Degenerate,
}

impl Stability {
    /// Classify a coefficient of variation (percent).
    pub fn from_cv(cv: f64) -> Self {
        if cv < STABLE_CV_BELOW {
            Stability::Stable
        } else if cv < IRREGULAR_CV_FROM {
            Stability::ModerateFluctuation
        } else {
            Stability::HighlyIrregular
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stability::Stable => "Stable rhythm",
            Stability::ModerateFluctuation => "Moderate fluctuation",
            Stability::HighlyIrregular => "Highly irregular rhythm",
            Stability::InsufficientData => "Insufficient data",
            Stability::Degenerate => "Degenerate rhythm",
        }
    }

    /// A cv-based class was computed.
    pub fn is_classified(&self) -> bool {
        matches!(
            self,
            Stability::Stable | Stability::ModerateFluctuation | Stability::HighlyIrregular
        )
    }
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inter-event interval statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RhythmProfile {
    /// Seconds between consecutive events in chronological order
    pub intervals: Vec<u32>,
    pub mean_interval_seconds: Option<f64>,
    pub std_dev_seconds: Option<f64>,
    /// Percent; `None` when the mean interval is zero or data is missing
    pub coefficient_of_variation: Option<f64>,
    pub stability: Stability,
}

impl RhythmProfile {
    fn insufficient() -> Self {
        Self {
            intervals: Vec::new(),
            mean_interval_seconds: None,
            std_dev_seconds: None,
            coefficient_of_variation: None,
            stability: Stability::InsufficientData,
        }
    }
}

/// Chronological intervals between timed events.
pub fn intervals(events: &[Event]) -> Vec<u32> {
    let mut times = timed_seconds(events);
    times.sort_unstable();
    times.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Mean and population standard deviation.
fn mean_and_std_dev(values: &[u32]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|&v| (v as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}

/// Analyze the rhythm of a timeline.
pub fn analyze_rhythm(events: &[Event]) -> RhythmProfile {
    let timed = events.iter().filter(|e| e.is_timed()).count();
    if timed < MIN_TIMED_EVENTS {
        return RhythmProfile::insufficient();
    }

    let intervals = intervals(events);
    let (mean, std_dev) = mean_and_std_dev(&intervals);

    if mean <= 0.0 {
        return RhythmProfile {
            intervals,
            mean_interval_seconds: Some(0.0),
            std_dev_seconds: Some(0.0),
            coefficient_of_variation: None,
            stability: Stability::Degenerate,
        };
    }

    let cv = 100.0 * std_dev / mean;

    RhythmProfile {
        intervals,
        mean_interval_seconds: Some(mean),
        std_dev_seconds: Some(std_dev),
        coefficient_of_variation: Some(cv),
        stability: Stability::from_cv(cv),
    }
}
