//! # Match Session
//!
//! The root object an analyst saves and later loads for analysis.

use super::event::Event;
use super::pitch::PitchBoard;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shown wherever a metadata field is absent.
pub const PLACEHOLDER: &str = "N/A";

/// Descriptive match fields. Pass-through only; blank values are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MatchMetadata {
    pub match_name: Option<String>,
    pub match_date: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub analyzed_team: Option<String>,
    pub analyst: Option<String>,
}

fn or_placeholder(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or(PLACEHOLDER)
}

impl MatchMetadata {
    /// Both the match name and the date were filled in.
    pub fn is_identified(&self) -> bool {
        self.match_name.is_some() && self.match_date.is_some()
    }

    pub fn display_match_name(&self) -> &str {
        or_placeholder(&self.match_name)
    }

    pub fn display_match_date(&self) -> &str {
        or_placeholder(&self.match_date)
    }

    pub fn display_home_team(&self) -> &str {
        or_placeholder(&self.home_team)
    }

    pub fn display_away_team(&self) -> &str {
        or_placeholder(&self.away_team)
    }

    /// Analyzed team, falling back to the home team.
    pub fn display_analyzed_team(&self) -> &str {
        self.analyzed_team
            .as_deref()
            .or(self.home_team.as_deref())
            .unwrap_or(PLACEHOLDER)
    }

    pub fn display_analyst(&self) -> &str {
        or_placeholder(&self.analyst)
    }
}

/// A squad sheet entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SquadMember {
    pub number: String,
    pub name: String,
    pub position: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Squad {
    #[serde(default)]
    pub starters: Vec<SquadMember>,
    #[serde(default)]
    pub substitutes: Vec<SquadMember>,
}

impl Squad {
    pub fn is_empty(&self) -> bool {
        self.starters.is_empty() && self.substitutes.is_empty()
    }
}

/// Free-text strategy notes keyed by field name (`competeNotes`, ...).
pub type StrategyNotes = BTreeMap<String, String>;

/// Ball possession clock kept by the live tracker, in whole seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Possession {
    pub home_seconds: u32,
    pub away_seconds: u32,
}

impl Possession {
    pub fn total_seconds(&self) -> u64 {
        u64::from(self.home_seconds) + u64::from(self.away_seconds)
    }

    fn share(&self, seconds: u32) -> Option<f64> {
        let total = self.total_seconds();
        if total == 0 {
            return None;
        }
        Some((1000.0 * seconds as f64 / total as f64).round() / 10.0)
    }

    /// Home share in percent (one decimal), `None` when no time was clocked.
    pub fn home_percent(&self) -> Option<f64> {
        self.share(self.home_seconds)
    }

    pub fn away_percent(&self) -> Option<f64> {
        self.share(self.away_seconds)
    }
}

/// A complete, normalized analysis session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Session {
    #[serde(default)]
    pub metadata: MatchMetadata,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub pitch: PitchBoard,
    #[serde(default)]
    pub squad: Squad,
    #[serde(default)]
    pub strategy_notes: StrategyNotes,
    /// Tracker possession clock, when the producer kept one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possession: Option<Possession>,
}

impl Session {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    pub fn timed_event_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_timed()).count()
    }

    /// Length in characters of the longest strategy note.
    pub fn longest_note_len(&self) -> usize {
        self.strategy_notes
            .values()
            .map(|n| n.chars().count())
            .max()
            .unwrap_or(0)
    }
}
