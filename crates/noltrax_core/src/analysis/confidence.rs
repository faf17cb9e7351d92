//! # Data Confidence
//!
//! Additive completeness score over a session. This is a heuristic for how
//! much weight the report deserves, not a statistical confidence interval.
//!
//! | Signal | Points |
//! |--------|--------|
//! | >= 20 logged events | 30 (else 10) |
//! | >= 10 tokens on the first-half board | 20 |
//! | >= 10 tokens on the second-half board | 20 |
//! | Match name and date present | 10 |
//! | Any strategy note longer than 10 characters | 20 |

use crate::analysis::formation::MIN_LINEUP;
use crate::models::Session;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Events needed for full logging credit.
pub const WELL_LOGGED_EVENTS: usize = 20;

/// A note must be longer than this many characters to count.
pub const MEANINGFUL_NOTE_CHARS: usize = 10;

const LOGGING_FULL_POINTS: u8 = 30;
const LOGGING_PARTIAL_POINTS: u8 = 10;
const HALF_BOARD_POINTS: u8 = 20;
const METADATA_POINTS: u8 = 10;
const NOTES_POINTS: u8 = 20;

const HIGH_FROM: u8 = 75;
const MEDIUM_FROM: u8 = 45;

pub const LIMITED_LOGGING: &str = "Limited event logging (< 20 actions recorded)";
pub const MINIMAL_NOTES: &str = "Minimal analyst notes provided";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn from_score(score: u8) -> Self {
        if score >= HIGH_FROM {
            ConfidenceLevel::High
        } else if score >= MEDIUM_FROM {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn rationale(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => {
                "Comprehensive data coverage with detailed logging and formation analysis."
            }
            ConfidenceLevel::Medium => {
                "Adequate data for general insights, though some areas lack depth."
            }
            ConfidenceLevel::Low => {
                "Limited data restricts interpretation accuracy. Additional logging recommended."
            }
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfidenceLevel::Low => write!(f, "Low"),
            ConfidenceLevel::Medium => write!(f, "Medium"),
            ConfidenceLevel::High => write!(f, "High"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConfidenceAssessment {
    /// 0-100
    pub score: u8,
    pub level: ConfidenceLevel,
    pub rationale: String,
    /// Triggered limitations in evaluation order
    pub limitations: Vec<String>,
}

/// Score the completeness of a session.
pub fn assess_confidence(session: &Session) -> ConfidenceAssessment {
    let mut score: u8 = 0;
    let mut limitations = Vec::new();

    if session.events.len() >= WELL_LOGGED_EVENTS {
        score += LOGGING_FULL_POINTS;
    } else {
        score += LOGGING_PARTIAL_POINTS;
        limitations.push(LIMITED_LOGGING.to_string());
    }

    for (half, snapshot) in session.pitch.halves() {
        if snapshot.player_count() >= MIN_LINEUP {
            score += HALF_BOARD_POINTS;
        } else {
            limitations.push(format!("Incomplete formation data for {}", half));
        }
    }

    if session.metadata.is_identified() {
        score += METADATA_POINTS;
    }

    if session.longest_note_len() > MEANINGFUL_NOTE_CHARS {
        score += NOTES_POINTS;
    } else {
        limitations.push(MINIMAL_NOTES.to_string());
    }

    let level = ConfidenceLevel::from_score(score);

    ConfidenceAssessment {
        score,
        level,
        rationale: level.rationale().to_string(),
        limitations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, MatchMetadata, PitchSnapshot, PlayerPosition};

    fn board(players: usize) -> PitchSnapshot {
        PitchSnapshot::new(
            (0..players)
                .map(|i| PlayerPosition::new(i.to_string(), 50.0, 9.0 * i as f64))
                .collect(),
        )
    }

    fn session(events: usize, first: usize, second: usize) -> Session {
        let mut s = Session::new((0..events).map(|i| Event::new("Pass", Some(i as u32))).collect());
        s.pitch.first_half = board(first);
        s.pitch.second_half = board(second);
        s
    }

    fn identified() -> MatchMetadata {
        MatchMetadata {
            match_name: Some("Cup final".to_string()),
            match_date: Some("2024-06-01".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_session_without_notes() {
        let mut s = session(25, 11, 11);
        s.metadata = identified();

        let c = assess_confidence(&s);
        assert_eq!(c.score, 80);
        assert_eq!(c.level, ConfidenceLevel::High);
        assert_eq!(c.limitations, vec![MINIMAL_NOTES.to_string()]);
    }

    #[test]
    fn test_complete_session_with_notes() {
        let mut s = session(25, 11, 11);
        s.metadata = identified();
        s.strategy_notes
            .insert("controlNotes".to_string(), "Build through the pivot".to_string());

        let c = assess_confidence(&s);
        assert_eq!(c.score, 100);
        assert_eq!(c.level, ConfidenceLevel::High);
        assert!(c.limitations.is_empty());
    }

    #[test]
    fn test_sparse_session() {
        let s = session(5, 11, 4);

        let c = assess_confidence(&s);
        assert_eq!(c.score, 30);
        assert_eq!(c.level, ConfidenceLevel::Low);
        assert_eq!(
            c.limitations,
            vec![
                LIMITED_LOGGING.to_string(),
                "Incomplete formation data for second half".to_string(),
                MINIMAL_NOTES.to_string(),
            ]
        );
        assert_eq!(c.rationale, ConfidenceLevel::Low.rationale());
    }

    #[test]
    fn test_empty_session() {
        let c = assess_confidence(&Session::default());
        assert_eq!(c.score, 10);
        assert_eq!(c.level, ConfidenceLevel::Low);
        assert_eq!(c.limitations.len(), 4);
    }

    #[test]
    fn test_metadata_needs_name_and_date() {
        let mut s = session(20, 10, 10);
        s.metadata.match_name = Some("Friendly".to_string());
        assert_eq!(assess_confidence(&s).score, 70);
        s.metadata.match_date = Some("2024-01-01".to_string());
        assert_eq!(assess_confidence(&s).score, 80);
    }

    #[test]
    fn test_note_length_is_strict() {
        let mut s = session(0, 0, 0);
        s.strategy_notes
            .insert("competeNotes".to_string(), "ten chars!".to_string());
        assert!(assess_confidence(&s).limitations.contains(&MINIMAL_NOTES.to_string()));

        s.strategy_notes
            .insert("conceptsNotes".to_string(), "eleven char".to_string());
        assert!(!assess_confidence(&s).limitations.contains(&MINIMAL_NOTES.to_string()));
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(ConfidenceLevel::from_score(75), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(74), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(45), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(44), ConfidenceLevel::Low);
    }
}
