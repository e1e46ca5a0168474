//! Per-source attempt tracking for lookup diagnostics.

use std::time::Duration;

use serde::Serialize;

use crate::errors::SourceFailure;
use crate::models::SourceId;

/// Why a source was not called.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The source does not cover the court of the number.
    CourtNotCovered,
}

/// What happened when a source was tried.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "detail")]
pub enum AttemptOutcome {
    Matched,
    NotFound,
    Skipped(SkipReason),
    Failed(String),
}

/// Record of a single source attempt during a lookup.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceAttempt {
    pub source_id: SourceId,
    pub outcome: AttemptOutcome,
    #[serde(with = "millis")]
    pub elapsed: Duration,
}

/// Ordered list of source attempts for one lookup.
#[derive(Clone, Debug, Default, Serialize)]
pub struct LookupDiagnostics {
    pub attempts: Vec<SourceAttempt>,
}

impl LookupDiagnostics {
    pub fn new() -> Self {
        Self {
            attempts: Vec::new(),
        }
    }

    pub fn record(&mut self, source_id: SourceId, outcome: AttemptOutcome, elapsed: Duration) {
        self.attempts.push(SourceAttempt {
            source_id,
            outcome,
            elapsed,
        });
    }

    pub fn record_skip(&mut self, source_id: SourceId, reason: SkipReason) {
        self.record(source_id, AttemptOutcome::Skipped(reason), Duration::ZERO);
    }

    /// Summary for logging/debugging.
    pub fn summary(&self) -> String {
        self.attempts
            .iter()
            .map(|a| match &a.outcome {
                AttemptOutcome::Matched => format!("{}: MATCHED", a.source_id),
                AttemptOutcome::NotFound => format!("{}: NOT_FOUND", a.source_id),
                AttemptOutcome::Skipped(reason) => {
                    format!("{}: SKIPPED ({:?})", a.source_id, reason)
                }
                AttemptOutcome::Failed(err) => format!("{}: ERROR ({})", a.source_id, err),
            })
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    pub fn matched_source(&self) -> Option<&SourceId> {
        self.attempts
            .iter()
            .find(|a| a.outcome == AttemptOutcome::Matched)
            .map(|a| &a.source_id)
    }

    /// Sources that were actually called, in call order.
    pub fn called(&self) -> Vec<&SourceId> {
        self.attempts
            .iter()
            .filter(|a| !matches!(a.outcome, AttemptOutcome::Skipped(_)))
            .map(|a| &a.source_id)
            .collect()
    }

    pub fn failures(&self) -> Vec<SourceFailure> {
        self.attempts
            .iter()
            .filter_map(|a| match &a.outcome {
                AttemptOutcome::Failed(message) => Some(SourceFailure {
                    source_id: a.source_id.to_string(),
                    message: message.clone(),
                }),
                _ => None,
            })
            .collect()
    }
}

mod millis {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::*;

    #[test]
    fn test_diagnostics_summary() {
        let mut diag = LookupDiagnostics::new();
        diag.record_skip(Cow::Borrowed("SCRAPE_TRT2"), SkipReason::CourtNotCovered);
        diag.record(
            Cow::Borrowed("DATAJUD"),
            AttemptOutcome::Failed("Timeout: DATAJUD".to_string()),
            Duration::from_millis(15),
        );
        diag.record(Cow::Borrowed("PORTAL"), AttemptOutcome::Matched, Duration::ZERO);

        let summary = diag.summary();
        assert!(summary.contains("SCRAPE_TRT2: SKIPPED"));
        assert!(summary.contains("DATAJUD: ERROR (Timeout: DATAJUD)"));
        assert!(summary.contains("PORTAL: MATCHED"));
        assert_eq!(diag.matched_source().map(|s| s.as_ref()), Some("PORTAL"));
        assert_eq!(diag.called().len(), 2);
    }

    #[test]
    fn test_failures_list() {
        let mut diag = LookupDiagnostics::new();
        diag.record(Cow::Borrowed("A"), AttemptOutcome::NotFound, Duration::ZERO);
        diag.record(
            Cow::Borrowed("B"),
            AttemptOutcome::Failed("HTTP 500 from B".to_string()),
            Duration::ZERO,
        );

        let failures = diag.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].source_id, "B");
        assert!(diag.matched_source().is_none());
    }
}
