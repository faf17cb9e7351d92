//! noltrax CLI library
//!
//! Session file → normalized session → analysis envelope (JSON),
//! plain-text report, or timeline CSV.

use anyhow::{Context, Result};
use noltrax_core::analysis::SnapshotShape;
use noltrax_core::models::PLACEHOLDER;
use noltrax_core::{
    analyze, normalize_session, AnalysisConfig, AnalysisResult, BucketPolicy, LengthAxis, Session,
    SquadMember, SCHEMA_VERSION,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Analysis output as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisEnvelope {
    /// Layout version of `result`
    pub schema_version: u8,
    /// Creation time (RFC3339)
    pub generated_at: String,
    /// SHA256 of the raw session file (hex)
    pub session_digest: String,
    pub result: AnalysisResult,
}

/// A session file after normalization.
#[derive(Debug, Clone)]
pub struct LoadedSession {
    pub session: Session,
    pub digest: String,
}

/// Command-line overrides applied on top of the base configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigOverrides {
    pub legacy_buckets: bool,
    pub bucket_minutes: Option<u32>,
    pub length_axis: Option<LengthAxis>,
}

/// SHA256 of `bytes` as lowercase hex.
pub fn session_digest(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Read and normalize a session file.
///
/// The file must be JSON; anything inside it is normalized leniently.
pub fn load_session(path: &Path) -> Result<LoadedSession> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read session file: {}", path.display()))?;
    let root: serde_json::Value = serde_json::from_slice(&bytes)
        .with_context(|| format!("Failed to parse session JSON: {}", path.display()))?;

    let session = normalize_session(&root);
    debug!(path = %path.display(), events = session.events.len(), "session loaded");

    Ok(LoadedSession {
        session,
        digest: session_digest(&bytes),
    })
}

/// Base config from a file (or the environment), then command-line overrides.
pub fn resolve_config(file: Option<&Path>, overrides: ConfigOverrides) -> Result<AnalysisConfig> {
    let mut config = match file {
        Some(path) => AnalysisConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => AnalysisConfig::from_env_or_default(),
    };

    if overrides.legacy_buckets {
        config = config.with_bucket_policy(AnalysisConfig::legacy().density);
    }
    if let Some(minutes) = overrides.bucket_minutes {
        config = config.with_bucket_policy(BucketPolicy::FixedWidth { minutes });
    }
    if let Some(axis) = overrides.length_axis {
        config = config.with_length_axis(axis);
    }

    config.validate().context("Invalid analysis configuration")?;
    Ok(config)
}

/// Analyze a loaded session and wrap the result.
pub fn build_envelope(loaded: &LoadedSession, config: &AnalysisConfig) -> AnalysisEnvelope {
    AnalysisEnvelope {
        schema_version: SCHEMA_VERSION,
        generated_at: chrono::Utc::now().to_rfc3339(),
        session_digest: loaded.digest.clone(),
        result: analyze(&loaded.session, config),
    }
}

/// Write an envelope as pretty JSON, creating parent directories.
pub fn write_envelope(path: &Path, envelope: &AnalysisEnvelope) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(envelope).context("Failed to serialize analysis")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write analysis: {}", path.display()))?;
    info!(path = %path.display(), "analysis written");
    Ok(())
}

/// One CSV line per timeline event.
#[derive(Debug, Serialize)]
struct TimelineRow<'a> {
    index: usize,
    minute: Option<u32>,
    second: Option<u32>,
    time_seconds: Option<u32>,
    team: Option<&'static str>,
    action: &'a str,
    note: Option<&'a str>,
}

/// Export the timeline in logged order. Returns the number of rows.
pub fn write_timeline_csv(session: &Session, path: &Path) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    for (index, event) in session.events.iter().enumerate() {
        writer
            .serialize(TimelineRow {
                index: index + 1,
                minute: event.minute(),
                second: event.second(),
                time_seconds: event.time,
                team: event.team.map(|t| t.as_str()),
                action: &event.action,
                note: event.note.as_deref(),
            })
            .context("Failed to write CSV row")?;
    }

    writer.flush().context("Failed to flush CSV file")?;
    Ok(session.events.len())
}

fn write_members(out: &mut String, title: &str, members: &[SquadMember]) {
    let _ = writeln!(out, "{}:", title);
    if members.is_empty() {
        let _ = writeln!(out, "  No data");
    }
    for m in members {
        let _ = writeln!(out, "  {:>3}  {:<4} {}", m.number, m.position, m.name);
    }
}

fn write_half(out: &mut String, title: &str, half: &SnapshotShape) {
    let _ = writeln!(
        out,
        "  {:<12} {} ({} players), {}",
        title,
        half.shape.label(),
        half.player_count,
        half.occupation.label()
    );
}

/// Plain-text report of a session and its analysis.
pub fn render_report(session: &Session, result: &AnalysisResult) -> String {
    let meta = &session.metadata;
    let mut out = String::new();

    let _ = writeln!(out, "MATCH ANALYSIS REPORT");
    let _ = writeln!(out, "=====================");
    let _ = writeln!(out, "Match:         {}", meta.display_match_name());
    let _ = writeln!(out, "Date:          {}", meta.display_match_date());
    let _ = writeln!(
        out,
        "Teams:         {} vs {}",
        meta.display_home_team(),
        meta.display_away_team()
    );
    let _ = writeln!(out, "Analyzed team: {}", meta.display_analyzed_team());
    let _ = writeln!(out, "Analyst:       {}", meta.display_analyst());

    if !session.squad.is_empty() {
        let _ = writeln!(out, "\nSQUAD");
        write_members(&mut out, "Starting XI", &session.squad.starters);
        write_members(&mut out, "Substitutes", &session.squad.substitutes);
    }

    let distribution = &result.distribution;
    let _ = writeln!(out, "\nSTATISTICS");
    let _ = writeln!(
        out,
        "  Total events: {} ({} timed)",
        result.total_events, result.timed_events
    );
    match &distribution.dominant {
        Some(d) => {
            let _ = writeln!(out, "  Dominant:     {} ({}%)", d.action, d.percentage);
        }
        None => {
            let _ = writeln!(out, "  Dominant:     {}", PLACEHOLDER);
        }
    }
    let _ = writeln!(
        out,
        "  Peak period:  {}",
        result
            .density
            .peak_period_label()
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    );
    if let Some(peak) = &distribution.peak_minute {
        let _ = writeln!(out, "  Peak minute:  {}' ({} events)", peak.minute, peak.count);
    }
    let _ = writeln!(out, "  Rhythm:       {}", result.rhythm.stability);
    for (team, count) in &distribution.by_team {
        let _ = writeln!(out, "  {:<13} {}", format!("{}:", team), count);
    }
    if let Some(possession) = &session.possession {
        if let (Some(home), Some(away)) = (possession.home_percent(), possession.away_percent()) {
            let _ = writeln!(
                out,
                "  Possession:   home {:.1}% ({:02}:{:02}), away {:.1}% ({:02}:{:02})",
                home,
                possession.home_seconds / 60,
                possession.home_seconds % 60,
                away,
                possession.away_seconds / 60,
                possession.away_seconds % 60
            );
        }
    }
    if !distribution.is_empty() {
        let _ = writeln!(out, "  Breakdown:");
        for (action, count) in distribution.ranked() {
            let _ = writeln!(out, "    {:<20} {:>4}", action, count);
        }
    }

    let _ = writeln!(out, "\nSTRUCTURE");
    write_half(&mut out, "First half:", &result.structure.first_half);
    write_half(&mut out, "Second half:", &result.structure.second_half);

    let confidence = &result.confidence;
    let _ = writeln!(out, "\nCONFIDENCE");
    let _ = writeln!(
        out,
        "  {} ({}/100): {}",
        confidence.level, confidence.score, confidence.rationale
    );
    for limitation in &confidence.limitations {
        let _ = writeln!(out, "  - {}", limitation);
    }

    let _ = writeln!(out, "\nNARRATIVE");
    let _ = writeln!(out, "  {}", result.narrative);

    let _ = writeln!(out, "\nCOACHING PROMPTS");
    for (i, prompt) in result.coaching_prompts.iter().enumerate() {
        let _ = writeln!(out, "  {}. [{}] {}", i + 1, prompt.category, prompt.text);
    }

    if !session.strategy_notes.is_empty() {
        let _ = writeln!(out, "\nNOTES");
        for (field, note) in &session.strategy_notes {
            let _ = writeln!(out, "  {}: {}", field, note);
        }
    }

    out
}
