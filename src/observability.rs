use std::time::Duration;

use crate::model::ConflictResult;

// Recording goes through the `metrics` facade; installing an exporter is up
// to the host application.

/// Counter: booking validations. Labels: outcome (`clear`, `warning`, `blocked`).
pub const VALIDATIONS_TOTAL: &str = "schedcheck_validations_total";

/// Counter: conflicts reported. Labels: kind, severity.
pub const CONFLICTS_TOTAL: &str = "schedcheck_conflicts_total";

/// Histogram: validation latency in seconds.
pub const VALIDATION_DURATION_SECONDS: &str = "schedcheck_validation_duration_seconds";

/// Counter: room allocation attempts. Labels: outcome (`allocated`, `none`).
pub const ALLOCATIONS_TOTAL: &str = "schedcheck_allocations_total";

/// Short label for the overall outcome of a validation.
pub fn outcome_label(result: &ConflictResult) -> &'static str {
    if result.has_conflict {
        "blocked"
    } else if result.conflicts.is_empty() {
        "clear"
    } else {
        "warning"
    }
}

pub fn record_validation(result: &ConflictResult, elapsed: Duration) {
    metrics::counter!(VALIDATIONS_TOTAL, "outcome" => outcome_label(result)).increment(1);
    for c in &result.conflicts {
        metrics::counter!(
            CONFLICTS_TOTAL,
            "kind" => c.kind.as_str(),
            "severity" => c.severity.as_str()
        )
        .increment(1);
    }
    metrics::histogram!(VALIDATION_DURATION_SECONDS).record(elapsed.as_secs_f64());
}

pub fn record_allocation(found: bool) {
    let outcome = if found { "allocated" } else { "none" };
    metrics::counter!(ALLOCATIONS_TOTAL, "outcome" => outcome).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Conflict, ConflictKind};

    #[test]
    fn outcome_labels() {
        let mut r = ConflictResult::clear();
        assert_eq!(outcome_label(&r), "clear");
        r.push(Conflict::warning(ConflictKind::Capacity, "nearly full"));
        assert_eq!(outcome_label(&r), "warning");
        r.push(Conflict::error(ConflictKind::Room, "taken"));
        assert_eq!(outcome_label(&r), "blocked");
    }

    #[test]
    fn recording_without_recorder_is_a_noop() {
        record_validation(&ConflictResult::clear(), Duration::from_millis(1));
        record_allocation(false);
    }
}
