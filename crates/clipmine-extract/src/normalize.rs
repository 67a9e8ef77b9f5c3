//! Field normalization.
//!
//! Models drift between `title`/`Title`, `start`/`startTime`/`start_seconds`
//! and between numeric seconds and `MM:SS` strings. An explicit alias table
//! maps every variant onto one canonical shape.

use clipmine_models::time_to_seconds;
use serde_json::Value;

use crate::error::RecordDrop;
use crate::repair::ClipDraft;

// Aliases are compared after lowercasing and removing `_`, `-` and spaces.
// Earlier entries win when a draft carries several.
const TITLE_ALIASES: &[&str] = &["title", "cliptitle", "name", "headline"];
const DESCRIPTION_ALIASES: &[&str] = &["description", "desc", "summary", "caption"];
const TAGS_ALIASES: &[&str] = &["tags", "hashtags", "keywords", "labels"];
const START_ALIASES: &[&str] = &[
    "start",
    "starttime",
    "startseconds",
    "startsec",
    "startoffset",
    "startoffsetseconds",
    "starttimestamp",
    "begin",
    "from",
];
const END_ALIASES: &[&str] = &[
    "end",
    "endtime",
    "endseconds",
    "endsec",
    "endoffset",
    "endoffsetseconds",
    "endtimestamp",
    "finish",
    "to",
];
const DURATION_ALIASES: &[&str] = &["duration", "durationseconds", "length"];

/// A record with canonical fields and whole-second bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedClip {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub start_offset_seconds: u32,
    pub end_offset_seconds: u32,
}

impl NormalizedClip {
    /// Signed length; negative or zero for inverted intervals.
    pub fn duration_secs(&self) -> i64 {
        i64::from(self.end_offset_seconds) - i64::from(self.start_offset_seconds)
    }
}

/// Normalize every draft, keeping per-record failures in place.
pub fn normalize_drafts(drafts: &[ClipDraft]) -> Vec<Result<NormalizedClip, RecordDrop>> {
    drafts.iter().map(normalize_draft).collect()
}

/// Normalize one draft.
pub fn normalize_draft(draft: &ClipDraft) -> Result<NormalizedClip, RecordDrop> {
    let start = lookup(draft, START_ALIASES)
        .ok_or(RecordDrop::MissingTime("start"))
        .and_then(|v| parse_time_value("start", v))?;

    let end = match lookup(draft, END_ALIASES) {
        Some(v) => parse_time_value("end", v)?,
        None => {
            let duration = lookup(draft, DURATION_ALIASES)
                .ok_or(RecordDrop::MissingTime("end"))
                .and_then(|v| parse_time_value("duration", v))?;
            start.saturating_add(duration)
        }
    };

    Ok(NormalizedClip {
        title: text_field(draft, TITLE_ALIASES),
        description: text_field(draft, DESCRIPTION_ALIASES),
        tags: tags_field(draft),
        start_offset_seconds: start,
        end_offset_seconds: end,
    })
}

/// Convert a numeric or textual time to whole seconds (fractions floored).
pub fn parse_time_value(field: &'static str, value: &Value) -> Result<u32, RecordDrop> {
    let invalid = |reason: &str| RecordDrop::InvalidTime {
        field,
        value: value.to_string(),
        reason: reason.to_string(),
    };

    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| invalid("not representable"))
            .and_then(|secs| whole_seconds(secs).ok_or_else(|| invalid("out of range"))),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(secs) = s.parse::<f64>() {
                return whole_seconds(secs).ok_or_else(|| invalid("out of range"));
            }
            if s.contains(':') {
                return time_to_seconds(s).map_err(|e| invalid(&e.to_string()));
            }
            Err(invalid("expected seconds or MM:SS / HH:MM:SS"))
        }
        _ => Err(invalid("expected number or string")),
    }
}

fn whole_seconds(secs: f64) -> Option<u32> {
    (secs.is_finite() && secs >= 0.0 && secs <= f64::from(u32::MAX)).then(|| secs.floor() as u32)
}

fn canonical_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

fn lookup<'a>(draft: &'a ClipDraft, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|alias| {
        draft
            .iter()
            .find(|(key, value)| canonical_key(key) == *alias && !value.is_null())
            .map(|(_, value)| value)
    })
}

fn text_field(draft: &ClipDraft, aliases: &[&str]) -> String {
    match lookup(draft, aliases) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn tags_field(draft: &ClipDraft) -> Vec<String> {
    match lookup(draft, TAGS_ALIASES) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
