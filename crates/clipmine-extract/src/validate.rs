//! Policy validation.

use clipmine_models::{GenerationPolicy, MAX_TITLE_CHARS};
use tracing::debug;

use crate::error::{ExtractError, ExtractResult, RecordDrop};
use crate::normalize::NormalizedClip;

/// Media end may overshoot the reported duration by this much.
const MEDIA_END_TOLERANCE_SECS: f64 = 1.0;

/// Records that passed validation, plus what was dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyReport {
    /// Accepted records in original order, at most `max_clip_count`
    pub accepted: Vec<NormalizedClip>,
    /// Normalization and policy drops, in input order
    pub dropped: Vec<RecordDrop>,
    /// Valid records cut by the count ceiling
    pub truncated: usize,
}

/// Apply the policy to a normalized batch.
///
/// Individual failures are dropped; the batch only fails when nothing
/// survives. Excess records are cut from the end, preserving order.
pub fn enforce_policy(
    records: Vec<Result<NormalizedClip, RecordDrop>>,
    policy: &GenerationPolicy,
    media_duration_secs: Option<f64>,
) -> ExtractResult<PolicyReport> {
    let mut accepted = Vec::new();
    let mut dropped = Vec::new();

    for (index, record) in records.into_iter().enumerate() {
        match record.and_then(|clip| check_record(clip, policy, media_duration_secs)) {
            Ok(clip) => accepted.push(clip),
            Err(reason) => {
                debug!(index, reason = %reason, "Dropping clip record");
                dropped.push(reason);
            }
        }
    }

    if accepted.is_empty() {
        return Err(ExtractError::BatchEmptyAfterValidation {
            dropped: dropped.len(),
        });
    }

    let max = policy.max_clip_count as usize;
    let truncated = accepted.len().saturating_sub(max);
    accepted.truncate(max);

    Ok(PolicyReport {
        accepted,
        dropped,
        truncated,
    })
}

/// Check one record; overlong titles are shortened rather than rejected.
pub fn check_record(
    mut clip: NormalizedClip,
    policy: &GenerationPolicy,
    media_duration_secs: Option<f64>,
) -> Result<NormalizedClip, RecordDrop> {
    let start = clip.start_offset_seconds;
    let end = clip.end_offset_seconds;

    if end <= start {
        return Err(RecordDrop::NonPositiveInterval { start, end });
    }

    let duration = end - start;
    if !policy.accepts_duration(duration) {
        return Err(RecordDrop::DurationOutOfBounds {
            duration,
            min: policy.min_duration_seconds,
            max: policy.max_duration_seconds,
        });
    }

    if let Some(media) = media_duration_secs {
        if f64::from(end) > media + MEDIA_END_TOLERANCE_SECS {
            return Err(RecordDrop::EndBeyondMedia { end, media });
        }
    }

    clip.title = clip_title(&clip.title);
    if clip.title.is_empty() {
        return Err(RecordDrop::EmptyTitle);
    }

    Ok(clip)
}

fn clip_title(title: &str) -> String {
    let title = title.trim();
    if title.chars().count() <= MAX_TITLE_CHARS {
        return title.to_string();
    }
    title
        .chars()
        .take(MAX_TITLE_CHARS)
        .collect::<String>()
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(title: &str, start: u32, end: u32) -> NormalizedClip {
        NormalizedClip {
            title: title.to_string(),
            description: String::new(),
            tags: Vec::new(),
            start_offset_seconds: start,
            end_offset_seconds: end,
        }
    }

    fn policy() -> GenerationPolicy {
        GenerationPolicy::new(3, 15, 60)
    }

    #[test]
    fn test_duration_bounds_inclusive() {
        assert!(check_record(clip("A", 0, 15), &policy(), None).is_ok());
        assert!(check_record(clip("A", 100, 160), &policy(), None).is_ok());
        assert_eq!(
            check_record(clip("A", 0, 14), &policy(), None).unwrap_err(),
            RecordDrop::DurationOutOfBounds { duration: 14, min: 15, max: 60 }
        );
        assert!(check_record(clip("A", 100, 161), &policy(), None).is_err());
    }

    #[test]
    fn test_inverted_and_empty_interval() {
        assert_eq!(
            check_record(clip("A", 40, 40), &policy(), None).unwrap_err(),
            RecordDrop::NonPositiveInterval { start: 40, end: 40 }
        );
        assert!(check_record(clip("A", 50, 20), &policy(), None).is_err());
    }

    #[test]
    fn test_empty_title_rejected() {
        assert_eq!(
            check_record(clip("   ", 0, 30), &policy(), None).unwrap_err(),
            RecordDrop::EmptyTitle
        );
    }

    #[test]
    fn test_long_title_truncated() {
        let long = "é".repeat(80);
        let checked = check_record(clip(&long, 0, 30), &policy(), None).unwrap();
        assert_eq!(checked.title.chars().count(), MAX_TITLE_CHARS);
    }

    #[test]
    fn test_media_duration_bound() {
        assert!(check_record(clip("A", 100, 131), &policy(), Some(130.0)).is_ok());
        assert!(matches!(
            check_record(clip("A", 100, 132), &policy(), Some(130.0)),
            Err(RecordDrop::EndBeyondMedia { end: 132, .. })
        ));
    }

    #[test]
    fn test_drops_and_stable_truncation() {
        let records = vec![
            Ok(clip("A", 0, 30)),
            Ok(clip("bad", 0, 5)),
            Err(RecordDrop::MissingTime("start")),
            Ok(clip("B", 40, 80)),
            Ok(clip("C", 90, 120)),
            Ok(clip("D", 130, 160)),
        ];
        let report = enforce_policy(records, &policy(), None).unwrap();

        let titles: Vec<&str> = report.accepted.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
        assert_eq!(report.dropped.len(), 2);
        assert_eq!(report.truncated, 1);
    }

    #[test]
    fn test_all_dropped_is_batch_failure() {
        let records = vec![Ok(clip("A", 0, 5)), Err(RecordDrop::EmptyTitle)];
        assert_eq!(
            enforce_policy(records, &policy(), None).unwrap_err(),
            ExtractError::BatchEmptyAfterValidation { dropped: 2 }
        );
        assert_eq!(
            enforce_policy(Vec::new(), &policy(), None).unwrap_err(),
            ExtractError::BatchEmptyAfterValidation { dropped: 0 }
        );
    }
}
