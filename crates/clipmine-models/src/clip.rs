//! Clip record models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::timestamp::seconds_to_time;

/// Transcript value for clips that no caption segment overlaps.
pub const TRANSCRIPT_NOT_FOUND: &str = "Transcript not available for this clip";

/// Longest title (in characters) a clip may carry.
pub const MAX_TITLE_CHARS: usize = 70;

/// A validated highlight clip.
///
/// Built once by the extraction pipeline and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClipRecord {
    /// Clip title (1..=70 characters)
    pub title: String,

    /// Social caption / summary
    pub description: String,

    /// Ordered tags as returned by the model
    pub tags: Vec<String>,

    /// Start offset into the source media
    pub start_offset_seconds: u32,

    /// End offset into the source media (exclusive, always > start)
    pub end_offset_seconds: u32,

    /// Text spoken during the clip, or [`TRANSCRIPT_NOT_FOUND`]
    pub transcript: String,
}

impl ClipRecord {
    /// Clip length in seconds.
    pub fn duration_secs(&self) -> u32 {
        self.end_offset_seconds
            .saturating_sub(self.start_offset_seconds)
    }

    /// Whether transcript alignment found any overlapping speech.
    pub fn has_transcript(&self) -> bool {
        self.transcript != TRANSCRIPT_NOT_FOUND
    }

    /// Build the request payload understood by the trimming service.
    pub fn to_trim_request(&self, video_id: impl Into<String>) -> TrimRequest {
        TrimRequest {
            video_id: video_id.into(),
            start_time: seconds_to_time(self.start_offset_seconds),
            end_time: seconds_to_time(self.end_offset_seconds),
            title: self.title.clone(),
        }
    }
}

/// Payload for the external clip trimming service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrimRequest {
    pub video_id: String,
    pub start_time: String,
    pub end_time: String,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClipRecord {
        ClipRecord {
            title: "The big reveal".to_string(),
            description: "Watch till the end".to_string(),
            tags: vec!["reveal".to_string()],
            start_offset_seconds: 65,
            end_offset_seconds: 3700,
            transcript: TRANSCRIPT_NOT_FOUND.to_string(),
        }
    }

    #[test]
    fn test_duration_and_transcript_flag() {
        let clip = sample();
        assert_eq!(clip.duration_secs(), 3635);
        assert!(!clip.has_transcript());
    }

    #[test]
    fn test_trim_request_formats_times() {
        let req = sample().to_trim_request("abc123");
        assert_eq!(req.start_time, "01:05");
        assert_eq!(req.end_time, "01:01:40");

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["videoId"], "abc123");
        assert_eq!(json["startTime"], "01:05");
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["startOffsetSeconds"], 65);
        assert_eq!(json["endOffsetSeconds"], 3700);
        assert!(json["transcript"].is_string());
    }
}
