//! Candidate span location.
//!
//! Model output may wrap the answer in prose, include an example array
//! before the real one, or stop mid-array. The locator finds every
//! top-level `[...]` run and orders them longest first; the complete
//! intended array is usually the longest.

use std::collections::HashSet;

use crate::error::{ExtractError, ExtractResult};

/// A bracket-delimited substring that may encode the clip array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSpan {
    /// Span text, including the outer brackets
    pub text: String,
    /// Byte offset of the opening bracket in the unfenced response
    pub offset: usize,
    /// True when the closing bracket was synthesized after the last
    /// complete element of an unterminated array
    pub truncated: bool,
}

impl CandidateSpan {
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Find candidate arrays in a raw response, longest first.
///
/// Equal-length candidates are ordered by position, later first.
pub fn locate_candidates(raw: &str) -> ExtractResult<Vec<CandidateSpan>> {
    let text = strip_wrapping_fences(raw);

    let mut spans = scan_top_level_arrays(text);
    if spans.is_empty() {
        spans.extend(first_to_last_bracket(text));
    }
    if spans.is_empty() {
        return Err(ExtractError::NoCandidateFound);
    }

    let mut seen = HashSet::new();
    spans.retain(|span| seen.insert(span.text.clone()));
    spans.sort_by(|a, b| b.len().cmp(&a.len()).then(b.offset.cmp(&a.offset)));

    Ok(spans)
}

/// Remove a leading ```` ```lang ```` line and a trailing ```` ``` ````.
pub fn strip_wrapping_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        text = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Scan for top-level arrays, honoring quoted strings.
///
/// An array left open at end of input yields a truncated candidate ending
/// after its last complete element, when it has one. Its interior is then
/// rescanned, so an unmatched `[` in prose does not hide the balanced
/// arrays after it.
fn scan_top_level_arrays(text: &str) -> Vec<CandidateSpan> {
    let mut spans = Vec::new();
    let mut stack: Vec<char> = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut prev_significant = ' ';
    let mut start = 0usize;
    let mut last_complete: Option<usize> = None;

    for (i, c) in text.char_indices() {
        if stack.is_empty() {
            if c == '[' {
                stack.push('[');
                start = i;
                last_complete = None;
                prev_significant = '[';
            }
            continue;
        }

        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
                prev_significant = c;
            }
            continue;
        }

        match c {
            '"' => quote = Some('"'),
            // Apostrophes only open a string where a value or key may start.
            '\'' if matches!(prev_significant, '[' | '{' | ',' | ':') => quote = Some('\''),
            '[' | '{' => stack.push(c),
            ']' | '}' => {
                let open = if c == ']' { '[' } else { '{' };
                let Some(pos) = stack.iter().rposition(|&o| o == open) else {
                    continue;
                };
                stack.truncate(pos);
                let end = i + c.len_utf8();
                if stack.is_empty() {
                    spans.push(CandidateSpan {
                        text: text[start..end].to_string(),
                        offset: start,
                        truncated: false,
                    });
                } else if stack.len() == 1 {
                    last_complete = Some(end);
                }
            }
            _ => {}
        }

        if !c.is_whitespace() {
            prev_significant = c;
        }
    }

    if !stack.is_empty() {
        if let Some(end) = last_complete {
            spans.push(CandidateSpan {
                text: format!("{}]", &text[start..end]),
                offset: start,
                truncated: true,
            });
        }

        let inner = start + 1;
        spans.extend(
            scan_top_level_arrays(&text[inner..])
                .into_iter()
                .map(|span| CandidateSpan {
                    offset: span.offset + inner,
                    ..span
                }),
        );
    }

    spans
}

/// Degenerate fallback: first `[` through last `]`.
fn first_to_last_bracket(text: &str) -> Option<CandidateSpan> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| CandidateSpan {
        text: text[start..=end].to_string(),
        offset: start,
        truncated: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_array_in_prose() {
        let raw = r#"Sure! Here are your clips: [{"title": "A"}] Hope this helps."#;
        let spans = locate_candidates(raw).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, r#"[{"title": "A"}]"#);
        assert!(!spans[0].truncated);
    }

    #[test]
    fn test_longest_candidate_first() {
        let raw = r#"Example: [{"title": "x"}]
Answer: [{"title": "First"}, {"title": "Second"}]"#;
        let spans = locate_candidates(raw).unwrap();
        assert_eq!(spans.len(), 2);
        assert!(spans[0].text.contains("Second"));
        assert!(spans[1].text.contains("\"x\""));
    }

    #[test]
    fn test_equal_length_prefers_later() {
        let raw = r#"[{"t": 1}] then [{"t": 2}]"#;
        let spans = locate_candidates(raw).unwrap();
        assert_eq!(spans[0].text, r#"[{"t": 2}]"#);
    }

    #[test]
    fn test_duplicates_removed() {
        let raw = r#"[{"t": 1}] again [{"t": 1}]"#;
        assert_eq!(locate_candidates(raw).unwrap().len(), 1);
    }

    #[test]
    fn test_brackets_inside_strings_ignored() {
        let raw = r#"[{"title": "Why ] matters", "tags": ["a", "b"]}]"#;
        let spans = locate_candidates(raw).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, raw);
    }

    #[test]
    fn test_single_quoted_strings_and_apostrophes() {
        let raw = "Here's the list: [{'title': 'Don]t stop'}]";
        let spans = locate_candidates(raw).unwrap();
        assert_eq!(spans[0].text, "[{'title': 'Don]t stop'}]");
    }

    #[test]
    fn test_fenced_response() {
        let raw = "```json\n[{\"title\": \"A\"}]\n```";
        let spans = locate_candidates(raw).unwrap();
        assert_eq!(spans[0].text, "[{\"title\": \"A\"}]");
    }

    #[test]
    fn test_truncated_array_yields_complete_prefix() {
        let raw = r#"[{"title": "A", "tags": ["x"]}, {"title": "B"}, {"title": "C", "sta"#;
        let spans = locate_candidates(raw).unwrap();
        assert_eq!(spans[0].text, r#"[{"title": "A", "tags": ["x"]}, {"title": "B"}]"#);
        assert!(spans[0].truncated);
    }

    #[test]
    fn test_unclosed_bracket_in_prose_does_not_hide_array() {
        let raw = "Clips [see notes below:\n[{\"title\": \"A\"}, {\"title\": \"B\"}]";
        let spans = locate_candidates(raw).unwrap();

        let real = r#"[{"title": "A"}, {"title": "B"}]"#;
        let found = spans.iter().find(|s| s.text == real).unwrap();
        assert!(!found.truncated);
        assert_eq!(found.offset, raw.find("[{").unwrap());
    }

    #[test]
    fn test_rescan_inside_truncated_array() {
        let raw = r#"[{"title": "A", "tags": ["x"]}, {"title": "B", "sta"#;
        let spans = locate_candidates(raw).unwrap();
        assert_eq!(spans[0].text, r#"[{"title": "A", "tags": ["x"]}]"#);
        assert!(spans[0].truncated);
        assert!(spans.iter().any(|s| s.text == r#"["x"]"#));
    }

    #[test]
    fn test_truncated_without_complete_element() {
        let raw = r#"[{"title": "A", "sta"#;
        assert_eq!(
            locate_candidates(raw).unwrap_err(),
            ExtractError::NoCandidateFound
        );
    }

    #[test]
    fn test_no_brackets() {
        assert_eq!(
            locate_candidates("I could not find any highlights.").unwrap_err(),
            ExtractError::NoCandidateFound
        );
    }

    #[test]
    fn test_first_to_last_fallback() {
        // The unbalanced quote swallows the closing bracket during scanning.
        let raw = r#"[{"title": "A}]"#;
        let spans = locate_candidates(raw).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, raw);
    }

    #[test]
    fn test_strip_wrapping_fences() {
        assert_eq!(strip_wrapping_fences("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_wrapping_fences("```[1]```"), "[1]");
        assert_eq!(strip_wrapping_fences("  [1]  "), "[1]");
    }
}
