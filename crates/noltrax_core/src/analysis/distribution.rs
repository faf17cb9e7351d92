//! # Action Distribution
//!
//! Tallies events by action label, by match minute and by team.
//!
//! Ties are resolved deterministically: the dominant action is the
//! lexicographically smallest label among those with the highest count,
//! and the peak minute is the earliest among the busiest minutes.

use crate::models::Event;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The most frequent action and its share of all events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DominantAction {
    pub action: String,
    pub count: usize,
    /// `round(100 * count / total)`, always in `0..=100`
    pub percentage: u8,
}

/// Busiest single minute of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MinuteCount {
    pub minute: u32,
    pub count: usize,
}

/// Label and time tallies over a timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Distribution {
    /// Events per action label
    pub counts: BTreeMap<String, usize>,
    /// All events, timed or not
    pub total: usize,
    /// Number of distinct labels
    pub variety: usize,
    pub dominant: Option<DominantAction>,
    /// Busiest minute among timed events
    pub peak_minute: Option<MinuteCount>,
    /// Events per team side, for events that carry one
    pub by_team: BTreeMap<String, usize>,
}

impl Distribution {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Labels sorted by descending count, ties alphabetical.
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> =
            self.counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

/// Rounded integer percentage of `part` in `total`; `0` when `total` is 0.
pub fn percentage(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (100.0 * part as f64 / total as f64).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Aggregate a timeline.
pub fn aggregate(events: &[Event]) -> Distribution {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut minutes: BTreeMap<u32, usize> = BTreeMap::new();
    let mut by_team: BTreeMap<String, usize> = BTreeMap::new();

    for event in events {
        *counts.entry(event.action.clone()).or_insert(0) += 1;
        if let Some(minute) = event.minute() {
            *minutes.entry(minute).or_insert(0) += 1;
        }
        if let Some(team) = event.team {
            *by_team.entry(team.as_str().to_string()).or_insert(0) += 1;
        }
    }

    let total = events.len();

    // BTreeMap iterates in label order, so a strict `>` keeps the smallest label on ties
    let dominant = strict_max(counts.iter().map(|(k, v)| (k, *v))).map(|(action, count)| {
        DominantAction {
            action: action.clone(),
            count,
            percentage: percentage(count, total),
        }
    });

    let peak_minute = strict_max(minutes.iter().map(|(m, c)| (*m, *c)))
        .map(|(minute, count)| MinuteCount { minute, count });

    Distribution {
        variety: counts.len(),
        counts,
        total,
        dominant,
        peak_minute,
        by_team,
    }
}

/// First entry with the strictly greatest count.
fn strict_max<K>(entries: impl Iterator<Item = (K, usize)>) -> Option<(K, usize)> {
    let mut best: Option<(K, usize)> = None;
    for (key, count) in entries {
        let better = match &best {
            Some((_, best_count)) => count > *best_count,
            None => true,
        };
        if better {
            best = Some((key, count));
        }
    }
    best
}
