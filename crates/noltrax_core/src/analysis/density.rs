//! # Temporal Density
//!
//! Partitions the observed match range into buckets and counts timed
//! events per bucket.
//!
//! ## Policies
//! - `FixedWidth { minutes }` (default): buckets of `minutes` real minutes
//!   from kick-off; the bucket count follows the data
//!   (`max_minute / minutes + 1`). Matches of different logged length stay
//!   comparable bucket for bucket.
//! - `LegacyCount { buckets }`: exactly `buckets` buckets of
//!   `ceil(max_time / buckets)` seconds. Kept for reproducing old charts.
//!
//! Times past [`MAX_EVENT_SECONDS`] are skipped and the legacy bucket count
//! is capped at [`MAX_LEGACY_BUCKETS`], so the bin count stays bounded.

use crate::config::{BucketPolicy, MAX_LEGACY_BUCKETS};
use crate::models::{timed_seconds, Event, MAX_EVENT_SECONDS};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One time bucket: `[start_seconds, end_seconds)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DensityBin {
    pub start_seconds: u32,
    pub end_seconds: u32,
    /// Whole minute the bucket starts in
    pub start_minute: u32,
    pub count: usize,
}

impl DensityBin {
    fn new(start_seconds: u32, end_seconds: u32) -> Self {
        Self {
            start_seconds,
            end_seconds,
            start_minute: start_seconds / 60,
            count: 0,
        }
    }

    /// `"10-15 min"` on minute boundaries, `"01:30-03:00"` otherwise.
    pub fn period_label(&self) -> String {
        if self.start_seconds % 60 == 0 && self.end_seconds % 60 == 0 {
            format!("{}-{} min", self.start_seconds / 60, self.end_seconds / 60)
        } else {
            format!(
                "{:02}:{:02}-{:02}:{:02}",
                self.start_seconds / 60,
                self.start_seconds % 60,
                self.end_seconds / 60,
                self.end_seconds % 60
            )
        }
    }
}

/// Event density across the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DensityProfile {
    pub policy: BucketPolicy,
    /// Latest timed event, `None` when nothing is timed
    pub max_time_seconds: Option<u32>,
    /// Buckets in chronological order
    pub bins: Vec<DensityBin>,
    /// Busiest bucket, earliest on ties
    pub peak: Option<DensityBin>,
}

impl DensityProfile {
    fn insufficient(policy: BucketPolicy) -> Self {
        Self {
            policy,
            max_time_seconds: None,
            bins: Vec::new(),
            peak: None,
        }
    }

    /// No timed events were available.
    pub fn is_insufficient(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn peak_period_label(&self) -> Option<String> {
        self.peak.as_ref().map(DensityBin::period_label)
    }

    /// Bucket `(start_minute, count)` pairs.
    pub fn series(&self) -> Vec<(u32, usize)> {
        self.bins.iter().map(|b| (b.start_minute, b.count)).collect()
    }
}

/// Bin the timed events of a timeline.
pub fn bin_events(events: &[Event], policy: BucketPolicy) -> DensityProfile {
    let mut times = timed_seconds(events);
    let before = times.len();
    times.retain(|t| *t <= MAX_EVENT_SECONDS);
    if times.len() < before {
        warn!(skipped = before - times.len(), "event times past the match bound ignored");
    }

    let Some(max_time) = times.iter().copied().max() else {
        return DensityProfile::insufficient(policy);
    };

    let (width, bucket_count) = match policy {
        BucketPolicy::FixedWidth { minutes } => {
            let width = minutes.max(1).saturating_mul(60);
            (width, max_time / width + 1)
        }
        BucketPolicy::LegacyCount { buckets } => {
            let buckets = buckets.clamp(1, MAX_LEGACY_BUCKETS);
            (max_time.div_ceil(buckets).max(1), buckets)
        }
    };

    let mut bins: Vec<DensityBin> = (0..bucket_count)
        .map(|i| {
            let start = i.saturating_mul(width);
            DensityBin::new(start, start.saturating_add(width))
        })
        .collect();

    for t in times {
        let index = (t / width).min(bucket_count - 1) as usize;
        bins[index].count += 1;
    }

    let mut peak: Option<DensityBin> = None;
    for bin in &bins {
        if peak.map_or(true, |p| bin.count > p.count) {
            peak = Some(*bin);
        }
    }

    DensityProfile {
        policy,
        max_time_seconds: Some(max_time),
        bins,
        peak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FIVE_MIN: BucketPolicy = BucketPolicy::FixedWidth { minutes: 5 };

    fn at_minutes(minutes: &[u32]) -> Vec<Event> {
        minutes
            .iter()
            .map(|m| Event::from_minute_second("Pass", *m, 0))
            .collect()
    }

    #[test]
    fn test_empty_is_insufficient() {
        let profile = bin_events(&[], FIVE_MIN);
        assert!(profile.is_insufficient());
        assert_eq!(profile.peak, None);
        assert_eq!(profile.peak_period_label(), None);

        // Untimed events do not count either
        let profile = bin_events(&[Event::untimed("Pass")], FIVE_MIN);
        assert!(profile.is_insufficient());
    }

    #[test]
    fn test_fixed_width_bins() {
        let profile = bin_events(&at_minutes(&[0, 3, 4, 7, 12, 12]), FIVE_MIN);
        assert_eq!(profile.series(), vec![(0, 3), (5, 1), (10, 2)]);
        assert_eq!(profile.peak_period_label().as_deref(), Some("0-5 min"));
        assert_eq!(profile.max_time_seconds, Some(720));
    }

    #[test]
    fn test_fixed_width_includes_empty_bins() {
        let profile = bin_events(&at_minutes(&[2, 21]), FIVE_MIN);
        assert_eq!(profile.series(), vec![(0, 1), (5, 0), (10, 0), (15, 0), (20, 1)]);
        // Tie between first and last bucket resolves to the earliest
        assert_eq!(profile.peak.unwrap().start_minute, 0);
    }

    #[test]
    fn test_boundary_minute_starts_next_bin() {
        let profile = bin_events(&at_minutes(&[5]), FIVE_MIN);
        assert_eq!(profile.series(), vec![(0, 0), (5, 1)]);
        assert_eq!(profile.peak_period_label().as_deref(), Some("5-10 min"));
    }

    #[test]
    fn test_single_event_at_kickoff() {
        let profile = bin_events(&[Event::new("Pass", Some(0))], FIVE_MIN);
        assert_eq!(profile.series(), vec![(0, 1)]);
    }

    #[test]
    fn test_legacy_ten_buckets() {
        let events: Vec<Event> = [0u32, 50, 99, 100]
            .iter()
            .map(|t| Event::new("Pass", Some(*t)))
            .collect();
        let profile = bin_events(&events, BucketPolicy::LegacyCount { buckets: 10 });
        assert_eq!(profile.bins.len(), 10);
        // size = ceil(100 / 10) = 10 seconds; t=100 is clamped into the last bucket
        assert_eq!(profile.bins[0].count, 1);
        assert_eq!(profile.bins[5].count, 1);
        assert_eq!(profile.bins[9].count, 2);
        assert_eq!(profile.peak.unwrap().start_seconds, 90);
        assert_eq!(profile.peak_period_label().as_deref(), Some("01:30-01:40"));
    }

    #[test]
    fn test_legacy_zero_range() {
        let profile = bin_events(
            &[Event::new("Pass", Some(0)), Event::new("Shot", Some(0))],
            BucketPolicy::LegacyCount { buckets: 10 },
        );
        assert_eq!(profile.bins.len(), 10);
        assert_eq!(profile.bins[0].count, 2);
    }

    #[test]
    fn test_stray_time_does_not_stretch_bins() {
        // Built directly, bypassing the bound applied by Event::new
        let stray = Event {
            time: Some(600_000_000),
            ..Event::new("Pass", None)
        };
        let events = vec![Event::new("Pass", Some(12)), stray];

        let profile = bin_events(&events, FIVE_MIN);
        assert_eq!(profile.bins.len(), 1);
        assert_eq!(profile.max_time_seconds, Some(12));

        let profile = bin_events(&events, BucketPolicy::LegacyCount { buckets: u32::MAX });
        assert_eq!(profile.bins.len(), MAX_LEGACY_BUCKETS as usize);
    }

    #[test]
    fn test_fixed_width_bin_count_is_bounded() {
        let events = vec![Event::new("Pass", Some(MAX_EVENT_SECONDS))];
        let profile = bin_events(&events, BucketPolicy::FixedWidth { minutes: 1 });
        assert_eq!(profile.bins.len(), (MAX_EVENT_SECONDS / 60 + 1) as usize);
    }

    proptest! {
        /// Property: every timed event lands in exactly one bucket
        #[test]
        fn prop_bins_conserve_events(times in prop::collection::vec(0u32..6000, 1..80), width in 1u32..15) {
            let events: Vec<Event> = times.iter().map(|t| Event::new("Pass", Some(*t))).collect();
            let profile = bin_events(&events, BucketPolicy::FixedWidth { minutes: width });
            let total: usize = profile.bins.iter().map(|b| b.count).sum();
            prop_assert_eq!(total, times.len());

            let max_minute = times.iter().max().unwrap() / 60;
            prop_assert_eq!(profile.bins.len() as u32, max_minute / width + 1);
        }
    }
}
