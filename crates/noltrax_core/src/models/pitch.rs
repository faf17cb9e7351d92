//! # Pitch Board
//!
//! Player tokens are stored as percentages of the pitch (`0..=100` on both
//! axes). Arrows live in canvas pixel space and are carried through
//! untouched; no analytics read them.

use crate::config::LengthAxis;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Upper bound of the percentage coordinate system.
pub const PITCH_EXTENT: f64 = 100.0;

fn clamp_percent(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, PITCH_EXTENT)
    }
}

/// A player token on the pitch board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlayerPosition {
    /// Shirt number as entered on the board (may be non-numeric)
    pub jersey_number: String,
    /// Horizontal percentage coordinate
    pub x: f64,
    /// Vertical percentage coordinate
    pub y: f64,
}

impl PlayerPosition {
    /// Coordinates are clamped into `[0, 100]`; NaN becomes 0.
    pub fn new(jersey_number: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            jersey_number: jersey_number.into(),
            x: clamp_percent(x),
            y: clamp_percent(y),
        }
    }

    /// Coordinate along the goal-to-goal axis.
    pub fn along(&self, axis: LengthAxis) -> f64 {
        match axis {
            LengthAxis::X => self.x,
            LengthAxis::Y => self.y,
        }
    }

    /// Coordinate across the pitch (the other axis).
    pub fn across(&self, axis: LengthAxis) -> f64 {
        match axis {
            LengthAxis::X => self.y,
            LengthAxis::Y => self.x,
        }
    }
}

/// A drawn tactical arrow, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TacticalArrow {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
}

/// One half's board: players plus arrows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PitchSnapshot {
    #[serde(default)]
    pub players: Vec<PlayerPosition>,
    #[serde(default)]
    pub arrows: Vec<TacticalArrow>,
}

impl PitchSnapshot {
    pub fn new(players: Vec<PlayerPosition>) -> Self {
        Self {
            players,
            arrows: Vec::new(),
        }
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// Both halves of the pitch board (`pitch1` / `pitch2` in session files).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PitchBoard {
    #[serde(default)]
    pub first_half: PitchSnapshot,
    #[serde(default)]
    pub second_half: PitchSnapshot,
}

impl PitchBoard {
    /// Halves paired with their display names.
    pub fn halves(&self) -> [(&'static str, &PitchSnapshot); 2] {
        [
            ("first half", &self.first_half),
            ("second half", &self.second_half),
        ]
    }
}
