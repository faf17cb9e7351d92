//! # noltrax_core - Match Timeline Analytics
//!
//! Loads a tagged football session (event timeline, pitch-board tokens,
//! match metadata, analyst notes) from loosely structured JSON and derives
//! a deterministic report from it.
//!
//! ## Features
//! - Tolerant normalization of five producer layouts; malformed input never fails
//! - Action distribution, temporal density and rhythm stability
//! - Formation shape and lateral occupation per half
//! - Data confidence score, summary narrative and coaching prompts
//! - JSON Schema for the serialized result
//!
//! ```
//! use noltrax_core::{analyze_session_json, AnalysisConfig};
//!
//! let json = r#"{"events": [{"action": "Pass", "time": 12}, {"action": "Shot", "time": 95}]}"#;
//! let result = analyze_session_json(json, &AnalysisConfig::default()).unwrap();
//! assert_eq!(result.total_events, 2);
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;

pub use analysis::{
    analysis_result_schema, analyze, analyze_session_json, analyze_value, AnalysisResult,
};
pub use config::{AnalysisConfig, BucketPolicy, LengthAxis};
pub use error::{AnalysisError, Result};
pub use models::{
    Event, MatchMetadata, PitchBoard, PitchSnapshot, PlayerPosition, Possession, Session, Squad,
    SquadMember, TeamSide,
};
pub use normalize::{normalize_event, normalize_events, normalize_session, InputSchema};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version of the serialized result layout
pub const SCHEMA_VERSION: u8 = 1;
