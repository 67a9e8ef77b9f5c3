//! Prompt construction for clip generation.

use clipmine_models::{GenerationPolicy, Transcript};
use schemars::JsonSchema;
use serde::Serialize;

use crate::backend::GenerationRequest;

pub const DEFAULT_INSTRUCTIONS: &str = "You are an expert short-form video editor. \
Find the most engaging, self-contained moments in this video that would work as standalone clips.";

/// Shape the model is asked to return, one entry per clip.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClipSuggestion {
    /// Short, catchy title
    pub title: String,
    /// Social media caption
    pub description: String,
    /// Topic tags without '#'
    pub tags: Vec<String>,
    /// Start timestamp, "HH:MM:SS" or "MM:SS"
    pub start_time: String,
    /// End timestamp, "HH:MM:SS" or "MM:SS"
    pub end_time: String,
}

/// JSON schema of the expected response array.
pub fn response_shape_hint() -> String {
    let schema = schemars::schema_for!(Vec<ClipSuggestion>);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

/// Build the prompt text for one invocation.
pub fn build_prompt(instructions: &str, policy: &GenerationPolicy, transcript: &Transcript) -> String {
    let shape = response_shape_hint();
    let transcript_text = transcript.to_prompt_text();
    let max_clips = policy.max_clip_count;
    let min_secs = policy.min_duration_seconds;
    let max_secs = policy.max_duration_seconds;

    format!(
        r#"{instructions}

IMPORTANT: You must strictly follow this output format.
Return ONLY a JSON array of clip objects matching this JSON schema:
{shape}

Here is the TRANSCRIPT of the video with timestamps.
Use these timestamps for the "startTime" and "endTime" fields.

TRANSCRIPT:
{transcript_text}
Additional instructions:
- Return ONLY the JSON array and nothing else.
- Return at most {max_clips} clips.
- Each clip must be between {min_secs} and {max_secs} seconds long.
- Ensure all timestamps are in "HH:MM:SS" or "MM:SS" format.
- Clips must start and end within the transcript.
"#
    )
}

/// Build the backend request for one invocation.
pub fn build_request(
    instructions: &str,
    policy: &GenerationPolicy,
    transcript: &Transcript,
) -> GenerationRequest {
    GenerationRequest::json(build_prompt(instructions, policy, transcript))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipmine_models::TranscriptSegment;

    #[test]
    fn test_shape_hint_names_fields() {
        let hint = response_shape_hint();
        assert!(hint.contains("\"startTime\""));
        assert!(hint.contains("\"endTime\""));
        assert!(hint.contains("\"tags\""));
        assert!(hint.contains("array"));
    }

    #[test]
    fn test_prompt_carries_policy_and_transcript() {
        let transcript = Transcript::new(
            vec![TranscriptSegment::new("the big reveal", 3725.0, 4.0)],
            None,
        );
        let request = build_request(DEFAULT_INSTRUCTIONS, &GenerationPolicy::new(4, 20, 45), &transcript);

        assert_eq!(request.response_mime_type, "application/json");
        assert!(request.prompt.starts_with(DEFAULT_INSTRUCTIONS));
        assert!(request.prompt.contains("at most 4 clips"));
        assert!(request.prompt.contains("between 20 and 45 seconds"));
        assert!(request.prompt.contains("[01:02:05] the big reveal"));
    }
}
