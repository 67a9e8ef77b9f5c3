//! Single-response extraction pipeline.

use clipmine_models::{ClipRecord, GenerationPolicy, Transcript};
use tracing::{debug, warn};

use crate::align::align_clips;
use crate::error::{ExtractError, ExtractResult, RecordDrop};
use crate::locator::locate_candidates;
use crate::normalize::normalize_drafts;
use crate::repair::{repair_span, RepairStep};
use crate::validate::enforce_policy;

/// Clips recovered from one raw response.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub clips: Vec<ClipRecord>,
    /// Ladder rung that made the winning span parse
    pub step: RepairStep,
    /// Candidates tried, including the winner
    pub candidates_tried: usize,
    /// Whether the winning span was a truncated prefix
    pub truncated_span: bool,
    /// Records dropped from the winning span
    pub dropped: Vec<RecordDrop>,
}

/// Run locate → repair → normalize → validate → align over one response.
///
/// Candidates are tried longest first; per-span failures move on to the
/// next candidate. When every candidate fails, a batch emptied by
/// validation is reported in preference to unparseable spans.
pub fn extract_clips(
    raw: &str,
    policy: &GenerationPolicy,
    transcript: &Transcript,
) -> ExtractResult<Extraction> {
    let candidates = locate_candidates(raw)?;
    let mut emptied: Option<ExtractError> = None;

    for (index, span) in candidates.iter().enumerate() {
        let repaired = match repair_span(span) {
            Ok(repaired) => repaired,
            Err(e) => {
                debug!(candidate = index, length = span.len(), "{}", e);
                continue;
            }
        };

        let normalized = normalize_drafts(&repaired.drafts);
        match enforce_policy(normalized, policy, transcript.total_duration_seconds) {
            Ok(report) => {
                if !report.dropped.is_empty() || report.truncated > 0 {
                    debug!(
                        dropped = report.dropped.len(),
                        truncated = report.truncated,
                        "Records removed by validation"
                    );
                }
                return Ok(Extraction {
                    clips: align_clips(report.accepted, &transcript.segments),
                    step: repaired.step,
                    candidates_tried: index + 1,
                    truncated_span: span.truncated,
                    dropped: report.dropped,
                });
            }
            Err(e) => {
                warn!(candidate = index, "{}", e);
                emptied = Some(e);
            }
        }
    }

    Err(emptied.unwrap_or(ExtractError::NoUsableCandidate {
        candidates: candidates.len(),
    }))
}
