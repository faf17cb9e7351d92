//! # Analysis Module
//!
//! Derived analytics over a normalized [`Session`].
//!
//! ## Submodules
//!
//! - `distribution` - Action counts, dominant action, per-minute and per-team tallies
//! - `density` - Time buckets and peak period
//! - `rhythm` - Inter-event intervals and stability class
//! - `formation` - Shape and lateral occupation per pitch-board half
//! - `confidence` - Completeness score and limitations
//! - `narrative` - Summary paragraph and coaching prompts
//!
//! Every component is a pure function of its inputs. [`analyze`] runs them
//! in dependency order and recomputes everything on each call.

pub mod confidence;
pub mod density;
pub mod distribution;
pub mod formation;
pub mod narrative;
pub mod rhythm;

pub use confidence::{assess_confidence, ConfidenceAssessment, ConfidenceLevel};
pub use density::{bin_events, DensityBin, DensityProfile};
pub use distribution::{aggregate, DominantAction, Distribution, MinuteCount};
pub use formation::{
    analyze_snapshot, analyze_structure, detect_formation, detect_occupation, FormationShape,
    Occupation, SnapshotShape, StructuralAnalysis,
};
pub use narrative::{
    coaching_prompts, synthesize, CoachingPrompt, NarrativeInputs, PromptCategory,
};
pub use rhythm::{analyze_rhythm, RhythmProfile, Stability};

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::models::Session;
use crate::normalize::normalize_session;
use schemars::schema::RootSchema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Everything derived from one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResult {
    pub total_events: usize,
    /// Events with a usable time
    pub timed_events: usize,
    pub distribution: Distribution,
    pub density: DensityProfile,
    pub rhythm: RhythmProfile,
    pub structure: StructuralAnalysis,
    pub confidence: ConfidenceAssessment,
    pub narrative: String,
    /// Reflection prompt always last
    pub coaching_prompts: Vec<CoachingPrompt>,
}

/// Run the full analysis pipeline.
pub fn analyze(session: &Session, config: &AnalysisConfig) -> AnalysisResult {
    let events = &session.events;

    let distribution = aggregate(events);
    let density = bin_events(events, config.density);
    let rhythm = analyze_rhythm(events);
    let structure = analyze_structure(&session.pitch, config.length_axis);
    let confidence = assess_confidence(session);

    let inputs = NarrativeInputs {
        distribution: &distribution,
        density: &density,
        rhythm: &rhythm,
        structure: &structure,
    };
    let narrative = synthesize(&inputs);
    let coaching_prompts = coaching_prompts(&inputs);

    info!(
        total = distribution.total,
        variety = distribution.variety,
        stability = %rhythm.stability,
        confidence = confidence.score,
        "session analyzed"
    );

    AnalysisResult {
        total_events: distribution.total,
        timed_events: session.timed_event_count(),
        distribution,
        density,
        rhythm,
        structure,
        confidence,
        narrative,
        coaching_prompts,
    }
}

/// Normalize a decoded document and analyze it.
pub fn analyze_value(root: &Value, config: &AnalysisConfig) -> AnalysisResult {
    analyze(&normalize_session(root), config)
}

/// Analyze session JSON text.
///
/// Fails only when the text is not JSON; any JSON value is analyzable.
pub fn analyze_session_json(json: &str, config: &AnalysisConfig) -> Result<AnalysisResult> {
    let root: Value = serde_json::from_str(json)?;
    Ok(analyze_value(&root, config))
}

/// JSON Schema of [`AnalysisResult`].
pub fn analysis_result_schema() -> RootSchema {
    schemars::schema_for!(AnalysisResult)
}
