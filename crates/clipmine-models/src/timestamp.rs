//! Timestamp parsing and formatting utilities.
//!
//! Clip boundaries arrive from the model as `MM:SS`, `HH:MM:SS` or bare
//! seconds. Everything downstream works in whole seconds.

use thiserror::Error;

/// Parse a timestamp string to whole seconds.
///
/// Supports formats:
/// - `HH:MM:SS` (minutes and seconds below 60)
/// - `MM:SS` (seconds below 60, minutes unbounded)
/// - `SS` (bare seconds)
///
/// A fractional part on the last component is accepted and floored.
///
/// # Examples
/// ```
/// use clipmine_models::timestamp::time_to_seconds;
/// assert_eq!(time_to_seconds("01:30:00").unwrap(), 5400);
/// assert_eq!(time_to_seconds("05:30").unwrap(), 330);
/// assert_eq!(time_to_seconds("90").unwrap(), 90);
/// ```
pub fn time_to_seconds(ts: &str) -> Result<u32, TimestampError> {
    let ts = ts.trim();
    if ts.is_empty() {
        return Err(TimestampError::Empty);
    }

    let parts: Vec<&str> = ts.split(':').collect();
    match parts.as_slice() {
        [secs] => parse_seconds(secs),
        [mins, secs] => {
            let minutes = parse_component("minutes", mins)?;
            let seconds = parse_seconds(secs)?;
            if seconds >= 60 {
                return Err(TimestampError::OutOfRange("seconds", secs.to_string()));
            }
            checked_total(&[(minutes, 60), (seconds, 1)], ts)
        }
        [hours, mins, secs] => {
            let hours = parse_component("hours", hours)?;
            let minutes = parse_component("minutes", mins)?;
            let seconds = parse_seconds(secs)?;
            if minutes >= 60 {
                return Err(TimestampError::OutOfRange("minutes", mins.to_string()));
            }
            if seconds >= 60 {
                return Err(TimestampError::OutOfRange("seconds", secs.to_string()));
            }
            checked_total(&[(hours, 3600), (minutes, 60), (seconds, 1)], ts)
        }
        _ => Err(TimestampError::InvalidFormat(ts.to_string())),
    }
}

/// Format seconds as `MM:SS`, or `HH:MM:SS` once an hour is reached.
///
/// This is the canonical form: `seconds_to_time(time_to_seconds(t))`
/// reproduces any zero-padded `t` in that form.
pub fn seconds_to_time(total_secs: u32) -> String {
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

/// Format seconds as `HH:MM:SS`, always including hours.
pub fn format_hms(total_secs: f64) -> String {
    let total = total_secs.max(0.0).floor() as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

fn parse_component(name: &'static str, raw: &str) -> Result<u32, TimestampError> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(TimestampError::InvalidValue(name, raw.to_string()));
    }
    raw.parse()
        .map_err(|_| TimestampError::OutOfRange(name, raw.to_string()))
}

fn parse_seconds(raw: &str) -> Result<u32, TimestampError> {
    let raw = raw.trim();
    match raw.split_once('.') {
        Some((whole, frac)) => {
            if frac.is_empty() || !frac.chars().all(|c| c.is_ascii_digit()) {
                return Err(TimestampError::InvalidValue("seconds", raw.to_string()));
            }
            parse_component("seconds", whole)
        }
        None => parse_component("seconds", raw),
    }
}

fn checked_total(parts: &[(u32, u32)], ts: &str) -> Result<u32, TimestampError> {
    parts
        .iter()
        .try_fold(0u32, |acc, &(value, scale)| {
            value.checked_mul(scale).and_then(|v| acc.checked_add(v))
        })
        .ok_or_else(|| TimestampError::OutOfRange("timestamp", ts.to_string()))
}

/// Timestamp parsing error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("Timestamp cannot be empty")]
    Empty,

    #[error("Invalid {0} value: {1}")]
    InvalidValue(&'static str, String),

    #[error("{0} out of range: {1}")]
    OutOfRange(&'static str, String),

    #[error("Invalid timestamp format '{0}'. Use HH:MM:SS, MM:SS, or seconds")]
    InvalidFormat(String),
}
