//! Transcript alignment.
//!
//! Each clip rescans the full segment list; clip intervals are neither
//! sorted nor disjoint, so no cursor is shared between clips.

use clipmine_models::{ClipRecord, TranscriptSegment, TRANSCRIPT_NOT_FOUND};

use crate::normalize::NormalizedClip;

/// Half-open overlap: touching at a boundary does not count.
pub fn overlaps(segment: &TranscriptSegment, start_secs: u32, end_secs: u32) -> bool {
    segment.start_offset_seconds < f64::from(end_secs)
        && segment.end_offset_seconds() > f64::from(start_secs)
}

/// Joined text of every segment overlapping `[start, end)`, in segment
/// order, or the not-found sentinel.
pub fn transcript_for_interval(
    segments: &[TranscriptSegment],
    start_secs: u32,
    end_secs: u32,
) -> String {
    let text = segments
        .iter()
        .filter(|segment| overlaps(segment, start_secs, end_secs))
        .map(|segment| segment.text.trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() {
        TRANSCRIPT_NOT_FOUND.to_string()
    } else {
        text
    }
}

/// Attach transcript text to validated clips.
pub fn align_clips(clips: Vec<NormalizedClip>, segments: &[TranscriptSegment]) -> Vec<ClipRecord> {
    clips
        .into_iter()
        .map(|clip| {
            let transcript =
                transcript_for_interval(segments, clip.start_offset_seconds, clip.end_offset_seconds);
            ClipRecord {
                title: clip.title,
                description: clip.description,
                tags: clip.tags,
                start_offset_seconds: clip.start_offset_seconds,
                end_offset_seconds: clip.end_offset_seconds,
                transcript,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments() -> Vec<TranscriptSegment> {
        vec![
            TranscriptSegment::new("before", 0.0, 10.0),
            TranscriptSegment::new(" opening line ", 8.0, 4.0),
            TranscriptSegment::new("middle", 15.0, 5.0),
            TranscriptSegment::new("at the end", 30.0, 5.0),
        ]
    }

    #[test]
    fn test_boundary_segments_excluded() {
        // "before" ends exactly at 10; "at the end" starts exactly at 30.
        assert_eq!(
            transcript_for_interval(&segments(), 10, 30),
            "opening line middle"
        );
    }

    #[test]
    fn test_partial_overlap_included() {
        assert_eq!(transcript_for_interval(&segments(), 9, 16), "before opening line middle");
    }

    #[test]
    fn test_no_overlap_uses_sentinel() {
        assert_eq!(transcript_for_interval(&segments(), 40, 70), TRANSCRIPT_NOT_FOUND);
        assert_eq!(transcript_for_interval(&[], 0, 10), TRANSCRIPT_NOT_FOUND);
    }

    #[test]
    fn test_overlapping_clips_each_rescan() {
        let clips = vec![
            NormalizedClip {
                title: "Late".to_string(),
                description: String::new(),
                tags: Vec::new(),
                start_offset_seconds: 14,
                end_offset_seconds: 40,
            },
            NormalizedClip {
                title: "Early".to_string(),
                description: String::new(),
                tags: Vec::new(),
                start_offset_seconds: 0,
                end_offset_seconds: 20,
            },
        ];

        let records = align_clips(clips, &segments());
        assert_eq!(records[0].transcript, "middle at the end");
        assert_eq!(records[1].transcript, "before opening line middle");
    }
}
