//! # Session Data Model
//!
//! Canonical shapes produced by the normalizer and consumed by the
//! analytics. Everything here is plain owned data; the analytics only ever
//! borrow it.
//!
//! - `event` - Tagged timeline events
//! - `pitch` - Pitch board snapshots (player tokens, arrows)
//! - `session` - Match metadata, squad, notes and the session root

pub mod event;
pub mod pitch;
pub mod session;

pub use event::{timed_seconds, Event, TeamSide, MAX_EVENT_SECONDS, UNKNOWN_ACTION};
pub use pitch::{PitchBoard, PitchSnapshot, PlayerPosition, TacticalArrow, PITCH_EXTENT};
pub use session::{
    MatchMetadata, Possession, Session, Squad, SquadMember, StrategyNotes, PLACEHOLDER,
};
