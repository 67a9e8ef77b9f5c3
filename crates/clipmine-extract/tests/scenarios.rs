//! End-to-end extraction scenarios over realistic model responses.

use clipmine_extract::{extract_clips, ExtractError, RepairStep};
use clipmine_models::{GenerationPolicy, Transcript, TranscriptSegment, TRANSCRIPT_NOT_FOUND};

fn policy() -> GenerationPolicy {
    GenerationPolicy::new(5, 15, 60)
}

fn transcript() -> Transcript {
    Transcript::new(
        vec![
            TranscriptSegment::new("welcome to the show", 0.0, 5.0),
            TranscriptSegment::new("so here is the hook", 5.0, 10.0),
            TranscriptSegment::new("and nobody expected", 62.0, 8.0),
            TranscriptSegment::new("this turn of events", 70.0, 6.0),
            TranscriptSegment::new("thanks for watching", 135.0, 10.0),
        ],
        Some(300.0),
    )
}

#[test]
fn test_well_formed_array_loses_nothing() {
    let raw = r#"[
        {"title": "Hook", "description": "Opening", "tags": ["a", "b"], "start": 5, "end": 35},
        {"title": "Twist", "description": "Middle", "tags": [], "start": 60, "end": 100},
        {"title": "Outro", "description": "End", "tags": ["c"], "start": 130, "end": 160}
    ]"#;

    let extraction = extract_clips(raw, &policy(), &transcript()).unwrap();
    assert_eq!(extraction.step, RepairStep::AsIs);
    assert!(extraction.dropped.is_empty());

    let clips = extraction.clips;
    assert_eq!(clips.len(), 3);
    assert_eq!(clips[0].title, "Hook");
    assert_eq!(clips[0].description, "Opening");
    assert_eq!(clips[0].tags, vec!["a", "b"]);
    assert_eq!((clips[0].start_offset_seconds, clips[0].end_offset_seconds), (5, 35));
    assert_eq!((clips[1].start_offset_seconds, clips[1].end_offset_seconds), (60, 100));
    assert_eq!(clips[2].tags, vec!["c"]);
}

#[test]
fn test_fenced_single_quoted_with_trailing_comma() {
    let raw = "```json
[
  {'title': 'Opening hook', 'description': 'Strong start', 'tags': ['intro'], 'start': '00:05', 'end': '00:35'},
  {'title': 'The twist', 'description': \"It's wild\", 'tags': [], 'start': '01:00', 'end': '01:45'},
  {'title': 'Closing', 'description': 'Wrap up', 'tags': ['outro',], 'start': '02:10', 'end': '02:50'},
]
```";

    let extraction = extract_clips(raw, &policy(), &transcript()).unwrap();
    assert_eq!(extraction.step, RepairStep::FixCommas);

    let clips = extraction.clips;
    assert_eq!(clips.len(), 3);
    assert_eq!(clips[1].description, "It's wild");
    assert_eq!(clips[2].tags, vec!["outro"]);
    assert_eq!(clips[0].transcript, "so here is the hook");
    assert_eq!(clips[1].transcript, "and nobody expected this turn of events");
    assert_eq!(clips[2].transcript, "thanks for watching");
    assert!(clips.iter().all(|c| c.has_transcript()));
}

#[test]
fn test_decoy_example_array_is_skipped() {
    let raw = r#"Your output should look like: [{"title": "Example", "start": 0, "end": 30}]

Here are the highlights I found:
[{"title": "Real one", "start": 5, "end": 40}, {"title": "Real two", "start": 60, "end": 90}]"#;

    let clips = extract_clips(raw, &policy(), &transcript()).unwrap().clips;
    let titles: Vec<&str> = clips.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Real one", "Real two"]);
}

#[test]
fn test_truncated_response_keeps_complete_prefix() {
    let raw = r#"[{"title": "First", "startTime": "00:05", "endTime": "00:35"},
{"title": "Second", "startTime": "01:00", "endTime": "01:40"},
{"title": "Third", "startTime": "02:10", "endTi"#;

    let extraction = extract_clips(raw, &policy(), &transcript()).unwrap();
    assert!(extraction.truncated_span);
    assert_eq!(extraction.clips.len(), 2);
    assert_eq!(extraction.clips[1].title, "Second");
}

#[test]
fn test_partial_batch_drops_bad_records() {
    let raw = r#"[
        {"Title": "Good", "Start": "00:00", "End": "00:20"},
        {"Title": "", "Start": "00:30", "End": "00:50"},
        {"Title": "Too long", "Start": "00:00", "End": "05:00"},
        {"Title": "Unparseable", "Start": "soon", "End": "later"}
    ]"#;

    let extraction = extract_clips(raw, &policy(), &transcript()).unwrap();
    assert_eq!(extraction.clips.len(), 1);
    assert_eq!(extraction.dropped.len(), 3);
}

#[test]
fn test_count_ceiling_is_stable() {
    let raw = r#"[
        {"title": "1", "start": 0, "end": 20},
        {"title": "2", "start": 200, "end": 220},
        {"title": "3", "start": 100, "end": 120}
    ]"#;
    let clips = extract_clips(raw, &GenerationPolicy::new(2, 15, 60), &transcript())
        .unwrap()
        .clips;
    let titles: Vec<&str> = clips.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["1", "2"]);
    assert_eq!(clips[1].transcript, TRANSCRIPT_NOT_FOUND);
}

#[test]
fn test_duration_boundaries() {
    let raw = r#"[
        {"title": "min", "start": 0, "end": 15},
        {"title": "max", "start": 100, "end": 160},
        {"title": "under", "start": 0, "end": 14},
        {"title": "over", "start": 100, "end": 161}
    ]"#;
    let clips = extract_clips(raw, &policy(), &transcript()).unwrap().clips;
    let titles: Vec<&str> = clips.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["min", "max"]);
}

#[test]
fn test_no_brackets_means_no_candidate() {
    let err = extract_clips(
        "I'm sorry, I couldn't find any highlights in this video.",
        &policy(),
        &transcript(),
    )
    .unwrap_err();
    assert_eq!(err, ExtractError::NoCandidateFound);
}

#[test]
fn test_unclosed_bracket_in_prose_before_answer() {
    let raw = r#"Clips [see notes below:
[{"title": "Hook", "start": 5, "end": 35}, {"title": "Twist", "start": 60, "end": 100}]"#;

    let extraction = extract_clips(raw, &policy(), &transcript()).unwrap();
    let titles: Vec<&str> = extraction.clips.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Hook", "Twist"]);
    assert_eq!(extraction.candidates_tried, 2);
}

#[test]
fn test_raw_newlines_and_tabs_inside_strings() {
    let raw = "[{\"title\": \"Big\treveal\", \"description\": \"line one\nline two\", \"start\": 5, \"end\": 35}]";

    let extraction = extract_clips(raw, &policy(), &transcript()).unwrap();
    assert_eq!(extraction.step, RepairStep::StripMarkup);
    assert_eq!(extraction.clips[0].title, "Big\treveal");
    assert_eq!(extraction.clips[0].description, "line one\nline two");
}
