//! Transcript models supplied by caption sources.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::timestamp::format_hms;

/// One timestamped caption unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSegment {
    pub text: String,
    pub start_offset_seconds: f64,
    pub duration_seconds: f64,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, start_offset_seconds: f64, duration_seconds: f64) -> Self {
        Self {
            text: text.into(),
            start_offset_seconds,
            duration_seconds,
        }
    }

    /// Offset at which this segment stops.
    pub fn end_offset_seconds(&self) -> f64 {
        self.start_offset_seconds + self.duration_seconds
    }
}

/// Full transcript for one media item.
///
/// Segments are ordered by start offset; they may overlap or leave gaps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    pub segments: Vec<TranscriptSegment>,

    /// Total media duration in seconds, when the source knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration_seconds: Option<f64>,
}

impl Transcript {
    pub fn new(segments: Vec<TranscriptSegment>, total_duration_seconds: Option<f64>) -> Self {
        Self {
            segments,
            total_duration_seconds,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Render as `[HH:MM:SS] text` lines for prompting.
    pub fn to_prompt_text(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            let text = segment.text.trim();
            if text.is_empty() {
                continue;
            }
            out.push_str(&format!(
                "[{}] {}\n",
                format_hms(segment.start_offset_seconds),
                text
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_end_offset() {
        let seg = TranscriptSegment::new("hello", 10.5, 2.25);
        assert!((seg.end_offset_seconds() - 12.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_prompt_text_skips_blank_segments() {
        let transcript = Transcript::new(
            vec![
                TranscriptSegment::new("Welcome back", 0.0, 2.0),
                TranscriptSegment::new("   ", 2.0, 1.0),
                TranscriptSegment::new("today we build a boat", 3661.4, 3.0),
            ],
            Some(3700.0),
        );

        assert_eq!(
            transcript.to_prompt_text(),
            "[00:00:00] Welcome back\n[01:01:01] today we build a boat\n"
        );
    }

    #[test]
    fn test_deserializes_camel_case() {
        let seg: TranscriptSegment = serde_json::from_str(
            r#"{"text":"hi","startOffsetSeconds":1.0,"durationSeconds":0.5}"#,
        )
        .unwrap();
        assert_eq!(seg.text, "hi");
        assert_eq!(seg.duration_seconds, 0.5);
    }
}
