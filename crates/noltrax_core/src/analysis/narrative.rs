//! # Narrative Synthesis
//!
//! Fixed-rule text assembly over the other components' outputs: a summary
//! paragraph and up to five reflective coaching prompts.
//!
//! ## Prompt triggers (in priority order)
//! 1. Side emphasis on the first-half board
//! 2. Shape changed between halves
//! 3. Dominant action mentions pressing
//! 4. Fewer than 4 distinct actions over more than 15 events
//! 5. Peak bucket opens before minute 15 or after minute 75
//! 6. Highly irregular rhythm
//!
//! At most four triggered prompts are kept; the reflection prompt always
//! closes the list.

use crate::analysis::density::DensityProfile;
use crate::analysis::distribution::Distribution;
use crate::analysis::formation::{Occupation, StructuralAnalysis};
use crate::analysis::rhythm::{RhythmProfile, Stability};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_COACHING_PROMPTS: usize = 5;

const COORDINATED_VOLUME_ABOVE: usize = 30;
const LIMITED_VOLUME_BELOW: usize = 15;
const NARROW_VARIETY_BELOW: usize = 4;
const NARROW_VARIETY_VOLUME_ABOVE: usize = 15;
const EARLY_PEAK_BEFORE_MINUTE: u32 = 15;
const LATE_PEAK_AFTER_MINUTE: u32 = 75;

pub const REFLECTION_PROMPT: &str = "Based on this analysis, which tactical element (structure, behavior, or timing) requires the most immediate adjustment for future matches?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum PromptCategory {
    Structural,
    Behavioral,
    Temporal,
    Rhythm,
    Reflection,
}

impl fmt::Display for PromptCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            PromptCategory::Structural => "Structural",
            PromptCategory::Behavioral => "Behavioral",
            PromptCategory::Temporal => "Temporal",
            PromptCategory::Rhythm => "Rhythm",
            PromptCategory::Reflection => "Reflection",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CoachingPrompt {
    pub category: PromptCategory,
    pub text: String,
}

impl CoachingPrompt {
    fn new(category: PromptCategory, text: impl Into<String>) -> Self {
        Self {
            category,
            text: text.into(),
        }
    }
}

/// Component outputs the narrative is written from.
#[derive(Debug, Clone, Copy)]
pub struct NarrativeInputs<'a> {
    pub distribution: &'a Distribution,
    pub density: &'a DensityProfile,
    pub rhythm: &'a RhythmProfile,
    pub structure: &'a StructuralAnalysis,
}

/// Compose the summary paragraph.
pub fn synthesize(inputs: &NarrativeInputs) -> String {
    let mut text = String::new();

    let first = &inputs.structure.first_half;
    if first.shape.is_detected() {
        text.push_str(&format!("The team deployed a {} formation", first.shape.label()));
        if first.occupation != Occupation::Balanced {
            text.push_str(&format!(" with {}", first.occupation.label().to_lowercase()));
        }
        if let Some(next) = inputs.structure.detected_transition() {
            text.push_str(&format!(", transitioning to a {} in the second half", next));
        }
        text.push_str(". ");
    }

    let distribution = inputs.distribution;
    if let Some(dominant) = &distribution.dominant {
        text.push_str(&format!(
            "Behaviorally, the team prioritized {} actions ({}%), recording {} total actions across {} distinct categories. ",
            dominant.action.to_lowercase(),
            dominant.percentage,
            distribution.total,
            distribution.variety
        ));
    }

    if let Some(period) = inputs.density.peak_period_label() {
        text.push_str(&format!(
            "Match activity peaked during the {} period, indicating heightened intensity during this phase. ",
            period
        ));
    }

    let rhythm = inputs.rhythm;
    match rhythm.mean_interval_seconds {
        Some(mean) if rhythm.stability.is_classified() => {
            text.push_str(&format!(
                "The team's action rhythm exhibited {}, with an average interval of {:.1} seconds between recorded events. ",
                rhythm.stability.label().to_lowercase(),
                mean
            ));
        }
        _ => {}
    }

    text.push_str("Collectively, these patterns suggest ");
    let total = distribution.total;
    if total > COORDINATED_VOLUME_ABOVE && rhythm.stability == Stability::Stable {
        text.push_str("a well-coordinated and consistent approach to the match.");
    } else if total < LIMITED_VOLUME_BELOW {
        text.push_str("limited on-ball activity or selective event logging.");
    } else {
        text.push_str("a dynamic tactical approach with varied action execution.");
    }

    text
}

/// Select the coaching prompts.
pub fn coaching_prompts(inputs: &NarrativeInputs) -> Vec<CoachingPrompt> {
    let mut prompts = Vec::new();
    let structure = inputs.structure;
    let distribution = inputs.distribution;

    if structure.first_half.shape.has_data() {
        if let Some((_, neglected)) = structure.first_half.occupation.flanks() {
            prompts.push(CoachingPrompt::new(
                PromptCategory::Structural,
                format!(
                    "Why was the {} flank underutilized despite the formation allowing width on both sides?",
                    neglected
                ),
            ));
        }

        if let Some((from, to)) = structure.formation_change() {
            prompts.push(CoachingPrompt::new(
                PromptCategory::Structural,
                format!(
                    "What triggered the tactical shift from {} to {}? Was it reactive or pre-planned?",
                    from, to
                ),
            ));
        }
    }

    if let Some(dominant) = &distribution.dominant {
        if dominant.action.to_lowercase().contains("press") {
            prompts.push(CoachingPrompt::new(
                PromptCategory::Behavioral,
                "Was the pressing intensity sustainable throughout the match, or did it lead to defensive vulnerabilities in later phases?",
            ));
        }

        if distribution.variety < NARROW_VARIETY_BELOW
            && distribution.total > NARROW_VARIETY_VOLUME_ABOVE
        {
            prompts.push(CoachingPrompt::new(
                PromptCategory::Behavioral,
                "The limited action variety suggests a narrow tactical focus. Was this intentional specialization or reactive simplification?",
            ));
        }
    }

    if let Some(peak) = &inputs.density.peak {
        if peak.start_minute < EARLY_PEAK_BEFORE_MINUTE {
            prompts.push(CoachingPrompt::new(
                PromptCategory::Temporal,
                format!(
                    "Early match intensity peaked in the opening {} minutes. Did this reflect a proactive game plan or opponent vulnerability?",
                    peak.end_seconds.div_ceil(60)
                ),
            ));
        } else if peak.start_minute > LATE_PEAK_AFTER_MINUTE {
            prompts.push(CoachingPrompt::new(
                PromptCategory::Temporal,
                format!(
                    "The late surge in activity ({}+ minutes) suggests either a comeback attempt or defensive pressure. Which scenario occurred?",
                    peak.start_minute
                ),
            ));
        }
    }

    if inputs.rhythm.stability == Stability::HighlyIrregular {
        prompts.push(CoachingPrompt::new(
            PromptCategory::Rhythm,
            "The highly irregular action rhythm indicates reactive rather than controlled play. What factors disrupted the team's intended tempo?",
        ));
    }

    prompts.truncate(MAX_COACHING_PROMPTS - 1);
    prompts.push(CoachingPrompt::new(
        PromptCategory::Reflection,
        REFLECTION_PROMPT,
    ));
    prompts
}
