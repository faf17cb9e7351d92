//! # Formation Detection
//!
//! Reads a shape off one half's pitch board.
//!
//! ## Algorithm
//! 1. Fewer than 10 tokens: incomplete lineup, no shape
//! 2. Stable-sort tokens along the length axis; the deepest one is the goalkeeper
//! 3. Count outfield tokens in the fixed pitch thirds (`< 33`, `33..66`, `>= 66`)
//! 4. Look the (defense, midfield, attack) triple up in the known patterns,
//!    falling back to the literal `D-M-A` label
//!
//! Occupation bias uses the same three bands across the width axis and
//! includes every token.

use crate::config::LengthAxis;
use crate::models::{PitchBoard, PitchSnapshot, PlayerPosition};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fewest tokens for which a shape is read.
pub const MIN_LINEUP: usize = 10;

/// End of the defensive third (percent of pitch length).
pub const DEFENSIVE_THIRD_END: f64 = 33.0;

/// Start of the attacking third (percent of pitch length).
pub const ATTACKING_THIRD_START: f64 = 66.0;

/// How many more players a flank needs than the centre to count as emphasis.
pub const SIDE_EMPHASIS_MARGIN: usize = 2;

/// Line counts with a conventional name.
const KNOWN_PATTERNS: [((usize, usize, usize), &str); 8] = [
    ((4, 3, 3), "4-3-3"),
    ((4, 4, 2), "4-4-2"),
    ((4, 2, 4), "4-2-3-1"),
    ((3, 5, 2), "3-5-2"),
    ((3, 4, 3), "3-4-3"),
    ((5, 3, 2), "5-3-2"),
    ((2, 4, 4), "2-4-4"),
    ((3, 3, 4), "3-3-4"),
];

/// Token counts per band: `[0, 33)`, `[33, 66)`, `[66, 100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BandCounts {
    pub low: usize,
    pub centre: usize,
    pub high: usize,
}

impl BandCounts {
    pub fn tally(values: impl Iterator<Item = f64>) -> Self {
        let mut counts = Self::default();
        for v in values {
            if v < DEFENSIVE_THIRD_END {
                counts.low += 1;
            } else if v < ATTACKING_THIRD_START {
                counts.centre += 1;
            } else {
                counts.high += 1;
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.low + self.centre + self.high
    }
}

/// Shape read from one pitch board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormationShape {
    /// No tokens were placed
    NoData,
    /// Too few tokens to read a shape
    IncompleteLineup { players: usize },
    Detected {
        defense: usize,
        midfield: usize,
        attack: usize,
        label: String,
    },
}

impl FormationShape {
    pub fn from_lines(defense: usize, midfield: usize, attack: usize) -> Self {
        let label = KNOWN_PATTERNS
            .iter()
            .find(|(lines, _)| *lines == (defense, midfield, attack))
            .map(|(_, name)| name.to_string())
            .unwrap_or_else(|| format!("{}-{}-{}", defense, midfield, attack));

        FormationShape::Detected {
            defense,
            midfield,
            attack,
            label,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            FormationShape::NoData => "No data",
            FormationShape::IncompleteLineup { .. } => "Incomplete lineup",
            FormationShape::Detected { label, .. } => label,
        }
    }

    pub fn is_detected(&self) -> bool {
        matches!(self, FormationShape::Detected { .. })
    }

    pub fn has_data(&self) -> bool {
        !matches!(self, FormationShape::NoData)
    }
}

impl fmt::Display for FormationShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where the tokens concentrate across the pitch width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Occupation {
    LeftSided,
    RightSided,
    UpperSided,
    LowerSided,
    Central,
    Balanced,
}

impl Occupation {
    pub fn label(&self) -> &'static str {
        match self {
            Occupation::LeftSided => "Left-sided emphasis",
            Occupation::RightSided => "Right-sided emphasis",
            Occupation::UpperSided => "Upper-sided emphasis",
            Occupation::LowerSided => "Lower-sided emphasis",
            Occupation::Central => "Central dominance",
            Occupation::Balanced => "Balanced occupation",
        }
    }

    /// `(favoured, neglected)` flank names for a side emphasis.
    pub fn flanks(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Occupation::LeftSided => Some(("left", "right")),
            Occupation::RightSided => Some(("right", "left")),
            Occupation::UpperSided => Some(("upper", "lower")),
            Occupation::LowerSided => Some(("lower", "upper")),
            Occupation::Central | Occupation::Balanced => None,
        }
    }

    pub fn is_side_emphasis(&self) -> bool {
        self.flanks().is_some()
    }
}

impl fmt::Display for Occupation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Structural reading of one half.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SnapshotShape {
    pub player_count: usize,
    pub shape: FormationShape,
    pub occupation: Occupation,
    /// Token counts across the width axis
    pub width_bands: BandCounts,
}

/// Both halves of the pitch board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StructuralAnalysis {
    pub first_half: SnapshotShape,
    pub second_half: SnapshotShape,
}

impl StructuralAnalysis {
    /// `(from, to)` labels when both halves have a shape and they differ.
    pub fn formation_change(&self) -> Option<(&str, &str)> {
        let (first, second) = (&self.first_half.shape, &self.second_half.shape);
        if first.has_data() && second.has_data() && first.label() != second.label() {
            Some((first.label(), second.label()))
        } else {
            None
        }
    }

    /// Second-half pattern differs from a detected first-half pattern.
    pub fn detected_transition(&self) -> Option<&str> {
        let (first, second) = (&self.first_half.shape, &self.second_half.shape);
        if first.is_detected() && second.is_detected() && first.label() != second.label() {
            Some(second.label())
        } else {
            None
        }
    }
}

/// Read the formation from a set of tokens.
pub fn detect_formation(players: &[PlayerPosition], axis: LengthAxis) -> FormationShape {
    if players.is_empty() {
        return FormationShape::NoData;
    }
    if players.len() < MIN_LINEUP {
        return FormationShape::IncompleteLineup {
            players: players.len(),
        };
    }

    let mut depths: Vec<f64> = players.iter().map(|p| p.along(axis)).collect();
    depths.sort_by(|a, b| a.total_cmp(b));

    // Deepest token is the goalkeeper
    let lines = BandCounts::tally(depths.into_iter().skip(1));
    FormationShape::from_lines(lines.low, lines.centre, lines.high)
}

/// Classify width occupation.
pub fn detect_occupation(players: &[PlayerPosition], axis: LengthAxis) -> Occupation {
    if players.is_empty() {
        return Occupation::Balanced;
    }

    let bands = BandCounts::tally(players.iter().map(|p| p.across(axis)));
    occupation_from_bands(&bands, axis)
}

fn occupation_from_bands(bands: &BandCounts, axis: LengthAxis) -> Occupation {
    let max = bands.low.max(bands.centre).max(bands.high);
    let (low_side, high_side) = match axis {
        LengthAxis::Y => (Occupation::LeftSided, Occupation::RightSided),
        LengthAxis::X => (Occupation::UpperSided, Occupation::LowerSided),
    };

    if bands.low == max && bands.low > bands.centre + SIDE_EMPHASIS_MARGIN {
        low_side
    } else if bands.high == max && bands.high > bands.centre + SIDE_EMPHASIS_MARGIN {
        high_side
    } else if bands.centre == max {
        Occupation::Central
    } else {
        Occupation::Balanced
    }
}

/// Full structural reading of one half.
pub fn analyze_snapshot(snapshot: &PitchSnapshot, axis: LengthAxis) -> SnapshotShape {
    let players = &snapshot.players;
    let width_bands = BandCounts::tally(players.iter().map(|p| p.across(axis)));

    SnapshotShape {
        player_count: players.len(),
        shape: detect_formation(players, axis),
        occupation: if players.is_empty() {
            Occupation::Balanced
        } else {
            occupation_from_bands(&width_bands, axis)
        },
        width_bands,
    }
}

pub fn analyze_structure(board: &PitchBoard, axis: LengthAxis) -> StructuralAnalysis {
    StructuralAnalysis {
        first_half: analyze_snapshot(&board.first_half, axis),
        second_half: analyze_snapshot(&board.second_half, axis),
    }
}
