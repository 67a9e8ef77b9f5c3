//! Structural repair ladder.
//!
//! Each rung rewrites the text produced by the previous rung and the
//! result is parsed strictly as an array of JSON objects. The first
//! successful parse wins. Rules are independent functions so each can be
//! exercised on its own.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ExtractError, ExtractResult};
use crate::locator::CandidateSpan;

/// A parsed, not yet normalized record.
pub type ClipDraft = Map<String, Value>;

static FENCE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[A-Za-z0-9_-]*").expect("valid fence regex"));

/// Rungs of the repair ladder, cheapest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepairStep {
    /// Parse the span untouched
    AsIs,
    /// Drop fence markers and stray control characters, escape raw
    /// newlines and tabs inside strings
    StripMarkup,
    /// Convert single quotes, quote bare keys, map Python literals
    NormalizeQuotes,
    /// Remove trailing commas, insert missing separators
    FixCommas,
}

impl RepairStep {
    pub const LADDER: [RepairStep; 4] = [
        RepairStep::AsIs,
        RepairStep::StripMarkup,
        RepairStep::NormalizeQuotes,
        RepairStep::FixCommas,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RepairStep::AsIs => "as_is",
            RepairStep::StripMarkup => "strip_markup",
            RepairStep::NormalizeQuotes => "normalize_quotes",
            RepairStep::FixCommas => "fix_commas",
        }
    }

    /// Apply this rung's rewrite.
    pub fn apply(&self, text: &str) -> String {
        match self {
            RepairStep::AsIs => text.to_string(),
            RepairStep::StripMarkup => strip_markup(text),
            RepairStep::NormalizeQuotes => normalize_quotes(text),
            RepairStep::FixCommas => fix_commas(text),
        }
    }
}

impl std::fmt::Display for RepairStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one parse attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Parsed(Vec<ClipDraft>),
    Unparsed { error: String },
}

/// Drafts recovered from a span and the rung that recovered them.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairedSpan {
    pub drafts: Vec<ClipDraft>,
    pub step: RepairStep,
}

/// Run the ladder over one candidate span.
pub fn repair_span(span: &CandidateSpan) -> ExtractResult<RepairedSpan> {
    let mut text = span.text.clone();

    for step in RepairStep::LADDER {
        text = step.apply(&text);
        match parse_drafts(&text) {
            StepOutcome::Parsed(drafts) => {
                debug!(step = %step, records = drafts.len(), "Candidate span parsed");
                return Ok(RepairedSpan { drafts, step });
            }
            StepOutcome::Unparsed { error } => {
                debug!(step = %step, error = %error, "Repair step did not yield valid JSON");
            }
        }
    }

    Err(ExtractError::SpanUnrepairable { length: span.len() })
}

/// Strict parse as an array of objects.
pub fn parse_drafts(text: &str) -> StepOutcome {
    match serde_json::from_str::<Vec<ClipDraft>>(text) {
        Ok(drafts) => StepOutcome::Parsed(drafts),
        Err(e) => StepOutcome::Unparsed {
            error: e.to_string(),
        },
    }
}

/// Remove code-fence markers, control characters and invisible marks
/// between string literals, and escape raw control characters inside
/// double-quoted strings. String contents are otherwise left alone.
pub fn strip_markup(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 16);
    let mut between = String::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '"' {
            push_structural(&between, &mut out);
            between.clear();
            i = copy_escaping_controls(&chars, i, &mut out);
        } else {
            between.push(chars[i]);
            i += 1;
        }
    }
    push_structural(&between, &mut out);

    out.trim().to_string()
}

fn push_structural(run: &str, out: &mut String) {
    out.extend(
        FENCE_MARKER
            .replace_all(run, "")
            .chars()
            .filter(|&c| !is_stray_mark(c)),
    );
}

/// Control characters other than layout whitespace, BOM and zero-width space.
fn is_stray_mark(c: char) -> bool {
    (c.is_control() && !matches!(c, '\n' | '\r' | '\t')) || matches!(c, '\u{feff}' | '\u{200b}')
}

/// Push one string-literal character, escaping raw layout whitespace.
fn push_string_char(c: char, out: &mut String) {
    match c {
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        c if is_stray_mark(c) => {}
        c => out.push(c),
    }
}

/// Like [`copy_double_quoted`], but escapes raw control characters.
/// A backslash that escapes nothing printable is dropped.
fn copy_escaping_controls(chars: &[char], start: usize, out: &mut String) -> usize {
    out.push('"');
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => match chars.get(i + 1) {
                Some(&next) if !next.is_control() => {
                    out.push('\\');
                    out.push(next);
                    i += 2;
                }
                _ => i += 1,
            },
            '"' => {
                out.push('"');
                return i + 1;
            }
            c => {
                push_string_char(c, out);
                i += 1;
            }
        }
    }
    i
}

/// Rewrite single-quoted strings as double-quoted, quote bare object
/// keys, and map `True`/`False`/`None` to JSON literals.
///
/// Double-quoted strings are copied untouched, so apostrophes inside them
/// survive. Inside a single-quoted string, a quote only closes it when the
/// next significant character could follow a value.
pub fn normalize_quotes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 16);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '"' {
            i = copy_double_quoted(&chars, i, &mut out);
        } else if c == '\'' && opens_value(&out) {
            i = convert_single_quoted(&chars, i, &mut out);
        } else if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            let is_key = next_significant(&chars, i) == Some(':')
                && matches!(last_significant(&out), Some('{') | Some(','));

            if is_key {
                out.push('"');
                out.push_str(&word);
                out.push('"');
            } else {
                out.push_str(match word.as_str() {
                    "True" => "true",
                    "False" => "false",
                    "None" => "null",
                    _ => &word,
                });
            }
        } else {
            out.push(c);
            i += 1;
        }
    }

    out
}

/// Drop commas before a closing bracket, collapse doubled commas, and
/// insert commas between adjacent values that lack one.
pub fn fix_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 16);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' => {
                i = copy_double_quoted(&chars, i, &mut out);
                if next_significant(&chars, i) == Some('"') {
                    out.push(',');
                }
            }
            ',' => {
                if !matches!(
                    next_significant(&chars, i + 1),
                    Some(']') | Some('}') | Some(',')
                ) {
                    out.push(',');
                }
                i += 1;
            }
            '}' | ']' => {
                out.push(c);
                i += 1;
                if matches!(
                    next_significant(&chars, i),
                    Some('"') | Some('{') | Some('[')
                ) {
                    out.push(',');
                }
            }
            d if d.is_ascii_digit() => {
                out.push(d);
                i += 1;
                if next_significant(&chars, i) == Some('"') {
                    out.push(',');
                }
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Copy a double-quoted string starting at `start`; returns the index
/// after its closing quote.
fn copy_double_quoted(chars: &[char], start: usize, out: &mut String) -> usize {
    out.push('"');
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i];
        out.push(c);
        match c {
            '\\' => {
                if let Some(&next) = chars.get(i + 1) {
                    out.push(next);
                }
                i += 2;
            }
            '"' => return i + 1,
            _ => i += 1,
        }
    }
    i
}

fn convert_single_quoted(chars: &[char], start: usize, out: &mut String) -> usize {
    out.push('"');
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' if chars.get(i + 1) == Some(&'\'') => {
                out.push('\'');
                i += 2;
            }
            '\\' => {
                out.push('\\');
                if let Some(&next) = chars.get(i + 1) {
                    out.push(next);
                }
                i += 2;
            }
            '"' => {
                out.push_str("\\\"");
                i += 1;
            }
            '\'' if closes_value(chars, i + 1) => {
                out.push('"');
                return i + 1;
            }
            c => {
                push_string_char(c, out);
                i += 1;
            }
        }
    }
    i
}

fn opens_value(out: &str) -> bool {
    matches!(
        last_significant(out),
        None | Some('[') | Some('{') | Some(',') | Some(':')
    )
}

fn closes_value(chars: &[char], from: usize) -> bool {
    matches!(
        next_significant(chars, from),
        None | Some(',') | Some('}') | Some(']') | Some(':')
    )
}

fn next_significant(chars: &[char], from: usize) -> Option<char> {
    chars.iter().skip(from).copied().find(|c| !c.is_whitespace())
}

fn last_significant(out: &str) -> Option<char> {
    out.chars().rev().find(|c| !c.is_whitespace())
}
