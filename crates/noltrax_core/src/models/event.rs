//! # Timeline Events
//!
//! A tagged occurrence during a match. Time is elapsed seconds since
//! kick-off; `None` means the producer did not record a usable time, and
//! such events only take part in label-based aggregation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label used when a record carries no usable action name.
pub const UNKNOWN_ACTION: &str = "Unknown";

/// Latest elapsed time accepted for an event (four hours). Later times are
/// treated as unknown so that one stray record cannot stretch the timeline.
pub const MAX_EVENT_SECONDS: u32 = 4 * 60 * 60;

/// Which team an event was logged for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamSide::Home => "home",
            TeamSide::Away => "away",
        }
    }

    /// Parse the tracker's `team` field (`"home"` / `"away"`, any case).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "home" => Some(TeamSide::Home),
            "away" => Some(TeamSide::Away),
            _ => None,
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single canonical timeline event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Event {
    /// Action label, never blank
    pub action: String,
    /// Elapsed seconds, `None` when unknown
    pub time: Option<u32>,
    /// Free-text analyst note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Team the event was logged for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamSide>,
}

impl Event {
    /// Event with a known elapsed time. Blank labels become [`UNKNOWN_ACTION`];
    /// times past [`MAX_EVENT_SECONDS`] become `None`.
    pub fn new(action: impl Into<String>, time: Option<u32>) -> Self {
        let action = action.into();
        let action = if action.trim().is_empty() {
            UNKNOWN_ACTION.to_string()
        } else {
            action
        };
        Self {
            action,
            time: time.filter(|t| *t <= MAX_EVENT_SECONDS),
            note: None,
            team: None,
        }
    }

    pub fn untimed(action: impl Into<String>) -> Self {
        Self::new(action, None)
    }

    /// Event from the minute/second representation (`time = minute*60 + second`).
    ///
    /// A `second` outside `[0, 60)` or an overflowing minute gives an untimed event.
    pub fn from_minute_second(action: impl Into<String>, minute: u32, second: u32) -> Self {
        let time = if second < 60 {
            minute.checked_mul(60).and_then(|m| m.checked_add(second))
        } else {
            None
        };
        Self::new(action, time)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_team(mut self, team: TeamSide) -> Self {
        self.team = Some(team);
        self
    }

    pub fn is_timed(&self) -> bool {
        self.time.is_some()
    }

    /// Whole minute of the match this event falls in.
    pub fn minute(&self) -> Option<u32> {
        self.time.map(|t| t / 60)
    }

    /// Second within the minute.
    pub fn second(&self) -> Option<u32> {
        self.time.map(|t| t % 60)
    }

    /// `MM:SS` clock string as shown by the tracker, or `--:--`.
    pub fn clock(&self) -> String {
        match (self.minute(), self.second()) {
            (Some(m), Some(s)) => format!("{:02}:{:02}", m, s),
            _ => "--:--".to_string(),
        }
    }
}

/// Elapsed seconds of all timed events, in logged order.
pub fn timed_seconds(events: &[Event]) -> Vec<u32> {
    events.iter().filter_map(|e| e.time).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minute_second_conversion() {
        let e = Event::from_minute_second("Pass", 12, 34);
        assert_eq!(e.time, Some(754));
        assert_eq!(e.minute(), Some(12));
        assert_eq!(e.second(), Some(34));
        assert_eq!(e.clock(), "12:34");
    }

    #[test]
    fn test_minute_second_out_of_range() {
        assert_eq!(Event::from_minute_second("Pass", 10, 60).time, None);
        assert_eq!(Event::from_minute_second("Pass", u32::MAX, 59).time, None);
        assert_eq!(Event::from_minute_second("Pass", 100_000_000, 0).time, None);
        assert!(!Event::from_minute_second("Pass", u32::MAX / 60, 0).is_timed());
    }

    #[test]
    fn test_time_beyond_bound_is_unknown() {
        assert_eq!(Event::new("Pass", Some(MAX_EVENT_SECONDS)).time, Some(MAX_EVENT_SECONDS));
        assert_eq!(Event::new("Pass", Some(MAX_EVENT_SECONDS + 1)).time, None);
        assert_eq!(Event::new("Pass", Some(4_000_000_000)).time, None);
        assert_eq!(Event::from_minute_second("Pass", 240, 0).time, Some(MAX_EVENT_SECONDS));
        assert_eq!(Event::from_minute_second("Pass", 240, 1).time, None);
    }

    #[test]
    fn test_blank_label_defaults_to_unknown() {
        assert_eq!(Event::untimed("   ").action, UNKNOWN_ACTION);
        assert_eq!(Event::untimed("").clock(), "--:--");
    }

    #[test]
    fn test_team_side_parse() {
        assert_eq!(TeamSide::parse("HOME"), Some(TeamSide::Home));
        assert_eq!(TeamSide::parse(" away"), Some(TeamSide::Away));
        assert_eq!(TeamSide::parse("neutral"), None);
    }

    #[test]
    fn test_timed_seconds_skips_unknown() {
        let events = vec![
            Event::new("Pass", Some(30)),
            Event::untimed("Shot"),
            Event::new("Tackle", Some(10)),
        ];
        assert_eq!(timed_seconds(&events), vec![30, 10]);
    }
}
