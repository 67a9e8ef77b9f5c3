//! Extraction metrics.
//!
//! Counters are no-ops until the embedding process installs a recorder.

use metrics::counter;

pub const ATTEMPTS_TOTAL: &str = "clipmine_attempts_total";
pub const REPAIR_STEPS_TOTAL: &str = "clipmine_repair_steps_total";
pub const RECORDS_DROPPED_TOTAL: &str = "clipmine_records_dropped_total";
pub const INVOCATIONS_TOTAL: &str = "clipmine_invocations_total";

/// Record one generation attempt.
///
/// `outcome` is `success`, `backend_error` or an extraction error kind.
pub fn record_attempt(outcome: &str) {
    counter!(ATTEMPTS_TOTAL, "outcome" => outcome.to_string()).increment(1);
}

/// Record the repair step that made a span parse.
pub fn record_repair_step(step: &str) {
    counter!(REPAIR_STEPS_TOTAL, "step" => step.to_string()).increment(1);
}

pub fn record_dropped(count: usize) {
    if count > 0 {
        counter!(RECORDS_DROPPED_TOTAL).increment(count as u64);
    }
}

/// Record a finished invocation (`success`, `failure` or `cancelled`).
pub fn record_invocation(outcome: &str) {
    counter!(INVOCATIONS_TOTAL, "outcome" => outcome.to_string()).increment(1);
}
