//! # Session Normalizer
//!
//! Turns an arbitrary decoded session document into a canonical
//! [`Session`]. Normalization never fails: missing or wrongly-typed
//! containers become empty defaults and unusable fields become `None`.
//!
//! ## Known producer layouts
//!
//! | Schema | Root keys | Event fields |
//! |--------|-----------|--------------|
//! | `MatchExport` | `meta`, `timeline`, `pitchData`, `squad`, `strategyNotes` | `actionType`, `minute` + `second` |
//! | `DataExport` | `metadata`, `events` | `action` / `label`, `time` |
//! | `TrackerLog` | `meta`, `eventLog`, `possession` | `type` (camelCase stat key), `time`, `team`, `timestamp` |
//! | `ZoneLog` | `match_info`, `events`, `players` | `action_type`, `"MM:SS"` string `minute` |
//! | `Legacy` | `info`, `events` | `action`, `minute` |
//!
//! The detected schema decides which container alias is tried first; the
//! other aliases are still accepted so that hand-edited files load.

use crate::models::{
    Event, MatchMetadata, PitchBoard, PitchSnapshot, PlayerPosition, Possession, Session, Squad,
    SquadMember, StrategyNotes, TacticalArrow, TeamSide,
};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Event fields that may carry the action label, in priority order.
const ACTION_KEYS: [&str; 6] = ["action", "actionType", "action_type", "label", "type", "tag"];

const NOTE_KEYS: [&str; 2] = ["note", "notes"];
const PITCH_KEYS: [&str; 2] = ["pitchData", "strategyBoard"];
const STARTER_KEYS: [&str; 2] = ["starters", "startingXI"];
const SUBSTITUTE_KEYS: [&str; 3] = ["substitutes", "subs", "bench"];
const JERSEY_KEYS: [&str; 3] = ["number", "jerseyNumber", "jersey"];

/// The producer layouts a session document may follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSchema {
    /// Match tagging tool export (`meta` / `timeline` / `pitchData`)
    MatchExport,
    /// Data viewer export (`metadata` / `events`)
    DataExport,
    /// Live stats tracker export (`meta` / `eventLog`)
    TrackerLog,
    /// First viewer format (`info` / `events`)
    Legacy,
    /// Zone tagging tool export (`match_info` / `events` / `players`)
    ZoneLog,
    /// Nothing recognizable; every container defaults
    Unknown,
}

impl InputSchema {
    /// Classify a document by its root keys.
    pub fn detect(root: &Value) -> Self {
        let Some(obj) = root.as_object() else {
            return InputSchema::Unknown;
        };

        if obj.contains_key("timeline") || obj.contains_key("pitchData") {
            InputSchema::MatchExport
        } else if obj.contains_key("eventLog") {
            InputSchema::TrackerLog
        } else if obj.contains_key("match_info") {
            InputSchema::ZoneLog
        } else if obj.contains_key("info") {
            InputSchema::Legacy
        } else if obj.contains_key("events") || obj.contains_key("metadata") {
            InputSchema::DataExport
        } else {
            InputSchema::Unknown
        }
    }

    fn meta_keys(&self) -> &'static [&'static str] {
        match self {
            InputSchema::DataExport => &["metadata", "meta", "info", "match_info"],
            InputSchema::Legacy => &["info", "meta", "metadata", "match_info"],
            InputSchema::ZoneLog => &["match_info", "meta", "metadata", "info"],
            InputSchema::MatchExport | InputSchema::TrackerLog | InputSchema::Unknown => {
                &["meta", "metadata", "info", "match_info"]
            }
        }
    }

    fn event_keys(&self) -> &'static [&'static str] {
        match self {
            InputSchema::MatchExport => &["timeline", "events", "eventLog"],
            InputSchema::TrackerLog => &["eventLog", "events", "timeline"],
            InputSchema::DataExport
            | InputSchema::Legacy
            | InputSchema::ZoneLog
            | InputSchema::Unknown => &["events", "timeline", "eventLog"],
        }
    }

    /// The tracker logs camelCase stat keys (`keyPasses`) instead of labels.
    fn humanize_labels(&self) -> bool {
        matches!(self, InputSchema::TrackerLog)
    }
}

/// Normalize a full session document.
pub fn normalize_session(root: &Value) -> Session {
    let schema = InputSchema::detect(root);
    let Some(obj) = root.as_object() else {
        warn!("session document is not an object; using an empty session");
        return Session::default();
    };
    debug!(?schema, "normalizing session");

    let metadata = match first_present(obj, schema.meta_keys()) {
        Some(Value::Object(meta)) => normalize_metadata(meta),
        Some(_) => {
            warn!("metadata is not an object; using placeholders");
            MatchMetadata::default()
        }
        None => MatchMetadata::default(),
    };

    let events = match first_present(obj, schema.event_keys()) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| normalize_event(item, schema.humanize_labels()))
            .collect(),
        Some(_) => {
            warn!("event container is not a list; treating timeline as empty");
            Vec::new()
        }
        None => Vec::new(),
    };

    let pitch = match first_present(obj, &PITCH_KEYS) {
        Some(Value::Object(board)) => normalize_board(board),
        Some(_) => {
            warn!("pitch data is not an object; using empty snapshots");
            PitchBoard::default()
        }
        None => PitchBoard::default(),
    };

    // The zone tagging tool keeps its roster as a flat `players` list
    let squad = match obj.get("squad") {
        Some(Value::Object(squad)) => normalize_squad(squad),
        _ => Squad {
            starters: squad_members(obj.get("players")),
            substitutes: Vec::new(),
        },
    };

    let possession = match obj.get("possession") {
        Some(Value::Object(split)) => normalize_possession(split),
        _ => None,
    };

    let strategy_notes = match obj.get("strategyNotes") {
        Some(Value::Object(notes)) => normalize_notes(notes),
        _ => StrategyNotes::new(),
    };

    debug!(
        events = events.len(),
        first_half_players = pitch.first_half.player_count(),
        second_half_players = pitch.second_half.player_count(),
        "session normalized"
    );

    Session {
        metadata,
        events,
        pitch,
        squad,
        strategy_notes,
        possession,
    }
}

/// Normalize a bare list of event records. Anything but a list is empty.
pub fn normalize_events(value: &Value) -> Vec<Event> {
    match value {
        Value::Array(items) => items.iter().map(|item| normalize_event(item, false)).collect(),
        _ => Vec::new(),
    }
}

/// Normalize one event record. Unusable records still yield an
/// `"Unknown"` untimed event so that they count towards the totals.
pub fn normalize_event(value: &Value, humanize: bool) -> Event {
    let obj = match value {
        Value::Object(obj) => obj,
        Value::String(label) => return Event::untimed(label.trim()),
        _ => {
            debug!("event record is not an object");
            return Event::untimed("");
        }
    };

    let action = ACTION_KEYS
        .iter()
        .find_map(|key| non_blank_str(obj.get(*key)))
        .map(|label| {
            if humanize {
                humanize_stat_key(label).to_string()
            } else {
                label.to_string()
            }
        })
        .unwrap_or_default();

    let mut event = Event::new(action, event_time(obj));

    if let Some(note) = NOTE_KEYS.iter().find_map(|key| non_blank_str(obj.get(*key))) {
        event = event.with_note(note);
    }
    if let Some(team) = obj.get("team").and_then(Value::as_str).and_then(TeamSide::parse) {
        event = event.with_team(team);
    }

    event
}

/// Resolve the elapsed time of an event record.
///
/// Order: numeric `time`, then a `"MM:SS"` `minute` string, then numeric
/// `minute` (+ optional `second`), then a `"MM:SS"` `timestamp` string.
fn event_time(obj: &Map<String, Value>) -> Option<u32> {
    if let Some(t) = obj.get("time").and_then(whole_seconds) {
        return Some(t);
    }

    if let Some(t) = obj.get("minute").and_then(Value::as_str).and_then(parse_clock) {
        return Some(t);
    }

    if let Some(minute) = obj.get("minute").and_then(whole_seconds) {
        let second = match obj.get("second") {
            None | Some(Value::Null) => 0,
            Some(raw) => match whole_seconds(raw) {
                Some(s) if s < 60 => s,
                _ => {
                    debug!(minute, "second outside [0, 60); time unknown");
                    return None;
                }
            },
        };
        return minute.checked_mul(60).and_then(|m| m.checked_add(second));
    }

    obj.get("timestamp")
        .and_then(Value::as_str)
        .and_then(parse_clock)
}

/// A non-negative, finite JSON number floored to whole seconds.
fn whole_seconds(value: &Value) -> Option<u32> {
    let n = value.as_f64()?;
    if !n.is_finite() || n < 0.0 || n > u32::MAX as f64 {
        return None;
    }
    Some(n.floor() as u32)
}

/// Parse a `MM:SS` clock string.
fn parse_clock(raw: &str) -> Option<u32> {
    let (m, s) = raw.trim().split_once(':')?;
    if !m.chars().all(|c| c.is_ascii_digit()) || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let minutes: u32 = m.parse().ok()?;
    let seconds: u32 = s.parse().ok()?;
    if seconds >= 60 {
        return None;
    }
    minutes.checked_mul(60)?.checked_add(seconds)
}

/// Display name of a tracker stat key.
pub fn humanize_stat_key(key: &str) -> &str {
    match key {
        "passes" => "Pass",
        "shots" => "Shot",
        "goals" => "Goal",
        "tackles" => "Tackle",
        "interceptions" => "Interception",
        "corners" => "Corner",
        "fouls" => "Foul",
        "dribbles" => "Dribble",
        "keyPasses" => "Key Pass",
        "longBalls" => "Long Ball",
        "crosses" => "Cross",
        "offsides" => "Offside",
        other => other,
    }
}

fn normalize_metadata(meta: &Map<String, Value>) -> MatchMetadata {
    let field = |keys: &[&str]| {
        keys.iter()
            .find_map(|key| non_blank_str(meta.get(*key)))
            .map(str::to_string)
    };

    MatchMetadata {
        match_name: field(&["matchName", "match_name"]),
        match_date: field(&["matchDate", "date", "match_date"]),
        home_team: field(&["homeTeam", "home"]),
        away_team: field(&["awayTeam", "away"]),
        analyzed_team: field(&["analyzedTeam", "teamAnalyzed"]),
        analyst: field(&["analyst", "analystName"]),
    }
}

fn normalize_board(board: &Map<String, Value>) -> PitchBoard {
    PitchBoard {
        first_half: board.get("pitch1").map(normalize_snapshot).unwrap_or_default(),
        second_half: board.get("pitch2").map(normalize_snapshot).unwrap_or_default(),
    }
}

fn normalize_snapshot(value: &Value) -> PitchSnapshot {
    let Some(obj) = value.as_object() else {
        return PitchSnapshot::default();
    };

    let players = array_items(obj.get("players"))
        .filter_map(|p| {
            let p = p.as_object()?;
            let x = finite_number(p.get("x"))?;
            let y = finite_number(p.get("y"))?;
            let number = JERSEY_KEYS
                .iter()
                .find_map(|key| scalar_string(p.get(*key)))
                .unwrap_or_default();
            Some(PlayerPosition::new(number, x, y))
        })
        .collect();

    let arrows = array_items(obj.get("arrows"))
        .filter_map(|a| {
            let a = a.as_object()?;
            Some(TacticalArrow {
                start_x: finite_number(a.get("startX"))?,
                start_y: finite_number(a.get("startY"))?,
                end_x: finite_number(a.get("endX"))?,
                end_y: finite_number(a.get("endY"))?,
            })
        })
        .collect();

    PitchSnapshot { players, arrows }
}

fn normalize_squad(squad: &Map<String, Value>) -> Squad {
    Squad {
        starters: squad_members(first_present(squad, &STARTER_KEYS)),
        substitutes: squad_members(first_present(squad, &SUBSTITUTE_KEYS)),
    }
}

fn squad_members(list: Option<&Value>) -> Vec<SquadMember> {
    array_items(list)
        .filter_map(|m| {
            let m = m.as_object()?;
            // Empty rows of the squad form carry no number
            let number = scalar_string(m.get("number"))?;
            Some(SquadMember {
                number,
                name: non_blank_str(m.get("name")).unwrap_or_default().to_string(),
                position: non_blank_str(m.get("position")).unwrap_or_default().to_string(),
            })
        })
        .collect()
}

/// Tracker possession clock. Both sides must be present.
fn normalize_possession(split: &Map<String, Value>) -> Option<Possession> {
    let home_seconds = split.get("homeSeconds").and_then(whole_seconds);
    let away_seconds = split.get("awaySeconds").and_then(whole_seconds);
    match (home_seconds, away_seconds) {
        (Some(home_seconds), Some(away_seconds)) => Some(Possession {
            home_seconds,
            away_seconds,
        }),
        _ => {
            debug!("possession split without both clocks; ignored");
            None
        }
    }
}

fn normalize_notes(notes: &Map<String, Value>) -> StrategyNotes {
    notes
        .iter()
        .filter_map(|(key, value)| value.as_str().map(|text| (key.clone(), text.to_string())))
        .collect()
}

fn first_present<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| !value.is_null())
}

fn array_items(value: Option<&Value>) -> impl Iterator<Item = &Value> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter())
        .into_iter()
        .flatten()
}

fn non_blank_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Strings and numbers rendered as text (`7` rather than `7.0`).
fn scalar_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.to_string(),
        }),
        _ => None,
    }
}

fn finite_number(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64).filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNKNOWN_ACTION;
    use serde_json::json;

    #[test]
    fn test_detect_schemas() {
        assert_eq!(
            InputSchema::detect(&json!({"meta": {}, "timeline": []})),
            InputSchema::MatchExport
        );
        assert_eq!(
            InputSchema::detect(&json!({"metadata": {}, "events": []})),
            InputSchema::DataExport
        );
        assert_eq!(
            InputSchema::detect(&json!({"meta": {}, "eventLog": []})),
            InputSchema::TrackerLog
        );
        assert_eq!(
            InputSchema::detect(&json!({"info": {}, "events": []})),
            InputSchema::Legacy
        );
        assert_eq!(
            InputSchema::detect(&json!({"match_info": {}, "events": [], "players": []})),
            InputSchema::ZoneLog
        );
        assert_eq!(InputSchema::detect(&json!([1, 2])), InputSchema::Unknown);
    }

    #[test]
    fn test_action_fallback_chain() {
        let e = normalize_event(&json!({"label": "Cross", "time": 12}), false);
        assert_eq!(e.action, "Cross");

        let e = normalize_event(&json!({"action": "  ", "label": "Cross"}), false);
        assert_eq!(e.action, "Cross");

        let e = normalize_event(&json!({"actionType": "Pressing", "minute": 3, "second": 5}), false);
        assert_eq!(e.action, "Pressing");
        assert_eq!(e.time, Some(185));

        let e = normalize_event(&json!({"time": 4}), false);
        assert_eq!(e.action, UNKNOWN_ACTION);
    }

    #[test]
    fn test_time_coercion() {
        assert_eq!(normalize_event(&json!({"time": 61.9}), false).time, Some(61));
        assert_eq!(normalize_event(&json!({"time": -3}), false).time, None);
        assert_eq!(normalize_event(&json!({"time": "12"}), false).time, None);
        assert_eq!(normalize_event(&json!({"minute": 2}), false).time, Some(120));
        assert_eq!(
            normalize_event(&json!({"minute": 2, "second": 75}), false).time,
            None
        );
        assert_eq!(
            normalize_event(&json!({"timestamp": "07:30"}), false).time,
            Some(450)
        );
        assert_eq!(
            normalize_event(&json!({"timestamp": "10:23:45 AM"}), false).time,
            None
        );
        assert_eq!(
            normalize_event(&json!({"minute": "12:30", "second": 40}), false).time,
            Some(750)
        );
        assert_eq!(normalize_event(&json!({"minute": "late"}), false).time, None);
        // Past the four-hour bound a clock reading is a tagging error
        assert_eq!(normalize_event(&json!({"time": 600_000_000}), false).time, None);
        assert_eq!(normalize_event(&json!({"minute": "300:00"}), false).time, None);
    }

    #[test]
    fn test_tracker_labels_and_team() {
        let e = normalize_event(
            &json!({"team": "away", "type": "keyPasses", "timestamp": "01:05", "time": 65}),
            true,
        );
        assert_eq!(e.action, "Key Pass");
        assert_eq!(e.team, Some(TeamSide::Away));
        assert_eq!(e.time, Some(65));
    }

    #[test]
    fn test_non_object_records_still_count() {
        let events = normalize_events(&json!(["Shot", 42, null, {"action": "Pass"}]));
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].action, "Shot");
        assert_eq!(events[1].action, UNKNOWN_ACTION);
        assert_eq!(events[2].action, UNKNOWN_ACTION);
        assert!(events.iter().all(|e| e.time.is_none()));
    }

    #[test]
    fn test_malformed_containers_default() {
        let session = normalize_session(&json!({
            "meta": "oops",
            "timeline": {"not": "a list"},
            "pitchData": 7,
            "squad": [],
            "strategyNotes": "none"
        }));
        assert_eq!(session, Session::default());

        assert_eq!(normalize_session(&json!(null)), Session::default());
        assert_eq!(normalize_session(&json!("text")), Session::default());
    }

    #[test]
    fn test_full_match_export() {
        let session = normalize_session(&json!({
            "meta": {
                "matchName": "Derby",
                "matchDate": "2024-03-01",
                "homeTeam": "Home FC",
                "awayTeam": " ",
                "analyst": "Rin"
            },
            "timeline": [
                {"actionType": "Pass", "minute": 1, "second": 10, "note": "switch of play"},
                {"actionType": "Shot", "minute": 2, "second": 0}
            ],
            "pitchData": {
                "pitch1": {
                    "players": [{"number": 1, "x": 50, "y": 4}, {"number": "10", "x": 55.5, "y": 70}],
                    "arrows": [{"startX": 10, "startY": 20, "endX": 30, "endY": 40}, {"startX": 1}]
                }
            },
            "squad": {
                "startingXI": [{"number": 1, "name": "Keeper", "position": "GK"}, {"number": "", "name": "blank"}],
                "substitutes": [{"number": 12, "name": "Sub", "position": "DF"}]
            },
            "strategyNotes": {"compete": true, "competeNotes": "Win second balls in midfield"}
        }));

        assert_eq!(session.metadata.match_name.as_deref(), Some("Derby"));
        assert_eq!(session.metadata.away_team, None);
        assert_eq!(session.metadata.display_analyzed_team(), "Home FC");
        assert_eq!(session.events.len(), 2);
        assert_eq!(session.events[0].time, Some(70));
        assert_eq!(session.events[0].note.as_deref(), Some("switch of play"));
        assert_eq!(session.pitch.first_half.players.len(), 2);
        assert_eq!(session.pitch.first_half.players[0].jersey_number, "1");
        assert_eq!(session.pitch.first_half.arrows.len(), 1);
        assert!(session.pitch.second_half.is_empty());
        assert_eq!(session.squad.starters.len(), 1);
        assert_eq!(session.squad.substitutes[0].number, "12");
        assert_eq!(session.strategy_notes.len(), 1);
    }

    #[test]
    fn test_zone_log_export() {
        let session = normalize_session(&json!({
            "match_info": {
                "matchName": "Cup Tie",
                "date": "2024-04-12",
                "homeTeam": "Home FC",
                "awayTeam": "Away FC",
                "teamAnalyzed": "Away FC",
                "analystName": "Rin"
            },
            "players": [
                {"number": 7, "name": "Winger", "position": "RW"},
                {"number": "", "name": "Unnumbered"}
            ],
            "events": [
                {
                    "timestamp": "2024-04-12T19:12:30.000Z",
                    "minute": "12:30",
                    "player_number": 7,
                    "action_type": "Cross",
                    "outcome": "success",
                    "zone_id": 14
                },
                {"timestamp": "2024-04-12T19:40:05.000Z", "minute": "40:05", "action_type": "Shot"},
                {"timestamp": "2024-04-12T19:41:00.000Z", "action_type": "Tackle"}
            ],
            "possession": {"total_time": "45:00", "percentage": 52}
        }));

        assert_eq!(
            session.events.iter().map(|e| e.action.as_str()).collect::<Vec<_>>(),
            vec!["Cross", "Shot", "Tackle"]
        );
        assert_eq!(session.events[0].time, Some(750));
        assert_eq!(session.events[1].time, Some(2405));
        assert_eq!(session.events[2].time, None);
        assert_eq!(session.metadata.match_date.as_deref(), Some("2024-04-12"));
        assert_eq!(session.metadata.analyzed_team.as_deref(), Some("Away FC"));
        assert_eq!(session.metadata.analyst.as_deref(), Some("Rin"));
        assert_eq!(session.squad.starters.len(), 1);
        assert_eq!(session.squad.starters[0].number, "7");
        assert_eq!(session.squad.starters[0].position, "RW");
        assert_eq!(session.possession, None);
    }

    #[test]
    fn test_tracker_possession_clock() {
        let session = normalize_session(&json!({
            "meta": {"homeTeam": "Home FC"},
            "eventLog": [],
            "possession": {"homeSeconds": 1650, "awaySeconds": 1350, "homePercent": 55, "awayPercent": 45}
        }));
        let possession = session.possession.unwrap();
        assert_eq!(possession.home_seconds, 1650);
        assert_eq!(possession.home_percent(), Some(55.0));

        let partial = normalize_session(&json!({"eventLog": [], "possession": {"homeSeconds": 30}}));
        assert_eq!(partial.possession, None);
    }

    #[test]
    fn test_data_export_prefers_metadata_key() {
        let session = normalize_session(&json!({
            "metadata": {"matchName": "From metadata", "date": "2024-05-05"},
            "meta": {"matchName": "From meta"},
            "events": [{"action": "Pass", "time": 3}]
        }));
        assert_eq!(session.metadata.match_name.as_deref(), Some("From metadata"));
        assert_eq!(session.metadata.match_date.as_deref(), Some("2024-05-05"));
    }

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("00:00"), Some(0));
        assert_eq!(parse_clock("90:59"), Some(5459));
        assert_eq!(parse_clock("1:60"), None);
        assert_eq!(parse_clock("-1:10"), None);
        assert_eq!(parse_clock("abc"), None);
    }
}
