//! First-match-wins lookup over an ordered list of sources.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::errors::LookupError;
use crate::models::{Case, CaseNumber, SourceId};
use crate::normalizer;
use crate::source::CaseSource;

use super::diagnostics::{AttemptOutcome, LookupDiagnostics, SkipReason};

/// Anything that can turn a case number into a canonical case.
#[async_trait]
pub trait CaseLookup: Send + Sync {
    async fn resolve(&self, input: &str) -> Result<Case, LookupError>;
}

/// Tries sources strictly in order and returns the first match.
///
/// A source failure is logged and recorded, never fatal. Sources after the
/// first match are not called. When nothing matched, the result is
/// [`LookupError::NotFound`] if every called source answered "not found"
/// and [`LookupError::AllSourcesFailed`] if any of them failed.
pub struct CaseResolver {
    sources: Vec<Arc<dyn CaseSource>>,
}

impl CaseResolver {
    pub fn new(sources: Vec<Arc<dyn CaseSource>>) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &[Arc<dyn CaseSource>] {
        &self.sources
    }

    pub async fn resolve_with_diagnostics(
        &self,
        input: &str,
    ) -> (Result<Case, LookupError>, LookupDiagnostics) {
        let mut diagnostics = LookupDiagnostics::new();

        let number = match CaseNumber::parse(input) {
            Ok(number) => number,
            Err(e) => {
                debug!("Rejected case number '{}': {}", input, e);
                return (Err(e), diagnostics);
            }
        };

        for source in &self.sources {
            let source_id: SourceId = Cow::Borrowed(source.id());

            if !source.supports(&number) {
                diagnostics.record_skip(source_id, SkipReason::CourtNotCovered);
                continue;
            }

            debug!("Looking up {} in source '{}'", number, source_id);
            let started = Instant::now();

            match source.lookup(&number).await {
                Ok(Some(record)) => match normalizer::normalize(&number, &record) {
                    Ok(case) => {
                        diagnostics.record(source_id, AttemptOutcome::Matched, started.elapsed());
                        info!(
                            "Resolved {} from {} payload. Diagnostics: {}",
                            number,
                            record.payload.family(),
                            diagnostics.summary()
                        );
                        return (Ok(case), diagnostics);
                    }
                    Err(e) => {
                        warn!("Source '{}' returned an unusable record: {}", source_id, e);
                        diagnostics.record(
                            source_id,
                            AttemptOutcome::Failed(e.to_string()),
                            started.elapsed(),
                        );
                    }
                },
                Ok(None) => {
                    diagnostics.record(source_id, AttemptOutcome::NotFound, started.elapsed());
                }
                Err(e) => {
                    warn!("Source '{}' failed for {}: {}", source_id, number, e);
                    diagnostics.record(
                        source_id,
                        AttemptOutcome::Failed(e.to_string()),
                        started.elapsed(),
                    );
                }
            }
        }

        let failures = diagnostics.failures();
        let case_number = number.formatted();
        let error = if failures.is_empty() {
            info!("Case {} not found. Diagnostics: {}", case_number, diagnostics.summary());
            LookupError::NotFound { case_number }
        } else {
            warn!("All sources failed. Diagnostics: {}", diagnostics.summary());
            LookupError::AllSourcesFailed {
                case_number,
                failures,
            }
        };

        (Err(error), diagnostics)
    }
}

#[async_trait]
impl CaseLookup for CaseResolver {
    async fn resolve(&self, input: &str) -> Result<Case, LookupError> {
        self.resolve_with_diagnostics(input).await.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SourceError;
    use crate::models::{CaseCategory, CaseStatus, RawPayload, RawRecord};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    enum Behavior {
        NotFound,
        Fail,
        Registry(serde_json::Value),
        Html(&'static str),
    }

    struct MockSource {
        id: &'static str,
        behavior: Behavior,
        supports: bool,
        call_count: AtomicUsize,
        call_log: Option<Arc<Mutex<Vec<&'static str>>>>,
    }

    impl MockSource {
        fn new(id: &'static str, behavior: Behavior) -> Self {
            Self {
                id,
                behavior,
                supports: true,
                call_count: AtomicUsize::new(0),
                call_log: None,
            }
        }

        fn logging(mut self, log: &Arc<Mutex<Vec<&'static str>>>) -> Self {
            self.call_log = Some(Arc::clone(log));
            self
        }

        fn unsupported(mut self) -> Self {
            self.supports = false;
            self
        }

        fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CaseSource for MockSource {
        fn id(&self) -> &'static str {
            self.id
        }

        fn supports(&self, _number: &CaseNumber) -> bool {
            self.supports
        }

        async fn lookup(&self, _number: &CaseNumber) -> Result<Option<RawRecord>, SourceError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if let Some(log) = &self.call_log {
                log.lock().unwrap().push(self.id);
            }

            match &self.behavior {
                Behavior::NotFound => Ok(None),
                Behavior::Fail => Err(SourceError::Transport {
                    source_id: self.id.to_string(),
                    message: "Mock failure".to_string(),
                }),
                Behavior::Registry(doc) => {
                    Ok(Some(RawRecord::new(self.id, RawPayload::Registry(doc.clone()))))
                }
                Behavior::Html(body) => Ok(Some(RawRecord::new(
                    self.id,
                    RawPayload::Html {
                        court: "TJSP".to_string(),
                        url: "https://example.test".to_string(),
                        body: body.to_string(),
                    },
                ))),
            }
        }
    }

    const NUMBER: &str = "1017593-56.2022.8.26.0001";

    fn as_sources(mocks: &[Arc<MockSource>]) -> Vec<Arc<dyn CaseSource>> {
        mocks
            .iter()
            .map(|m| Arc::clone(m) as Arc<dyn CaseSource>)
            .collect()
    }

    #[tokio::test]
    async fn test_official_registry_happy_path() {
        let official = Arc::new(MockSource::new(
            "DATAJUD",
            Behavior::Registry(json!({
                "numeroProcesso": "10175935620228260001",
                "classe": { "codigo": 1200, "nome": "Procedimento Comum Cível" },
                "situacao": "Em andamento"
            })),
        ));
        let resolver = CaseResolver::new(as_sources(&[official.clone()]));

        let case = resolver.resolve(NUMBER).await.unwrap();

        assert_eq!(case.category, CaseCategory::Civil);
        assert_eq!(case.status, CaseStatus::Active);
        assert_eq!(case.case_number, NUMBER);
        assert_eq!(case.source.as_deref(), Some("DATAJUD"));
        assert_eq!(official.calls(), 1);
    }

    #[tokio::test]
    async fn test_first_match_wins_and_later_sources_are_not_called() {
        let first = Arc::new(MockSource::new("FIRST", Behavior::NotFound));
        let second = Arc::new(MockSource::new("SECOND", Behavior::Fail));
        let third = Arc::new(MockSource::new(
            "THIRD",
            Behavior::Registry(json!({ "classe": { "codigo": 2100 } })),
        ));
        let fourth = Arc::new(MockSource::new(
            "FOURTH",
            Behavior::Registry(json!({ "classe": { "codigo": 1100 } })),
        ));
        let resolver = CaseResolver::new(as_sources(&[
            first.clone(),
            second.clone(),
            third.clone(),
            fourth.clone(),
        ]));

        let (result, diagnostics) = resolver.resolve_with_diagnostics(NUMBER).await;
        let case = result.unwrap();

        assert_eq!(case.category, CaseCategory::Criminal);
        assert_eq!(case.source.as_deref(), Some("THIRD"));
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 1);
        assert_eq!(third.calls(), 1);
        assert_eq!(fourth.calls(), 0);
        assert_eq!(diagnostics.matched_source().map(|s| s.as_ref()), Some("THIRD"));
    }

    #[tokio::test]
    async fn test_exhaustion_without_failures_is_not_found() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mocks: Vec<Arc<MockSource>> = ["A", "B", "C"]
            .into_iter()
            .map(|id| Arc::new(MockSource::new(id, Behavior::NotFound).logging(&log)))
            .collect();
        let resolver = CaseResolver::new(as_sources(&mocks));

        let err = resolver.resolve(NUMBER).await.unwrap_err();

        assert_eq!(
            err,
            LookupError::NotFound {
                case_number: NUMBER.to_string()
            }
        );
        assert!(mocks.iter().all(|m| m.calls() == 1));
        assert_eq!(*log.lock().unwrap(), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_exhaustion_with_failures_reports_them() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let a = Arc::new(MockSource::new("A", Behavior::Fail).logging(&log));
        let b = Arc::new(MockSource::new("B", Behavior::NotFound).logging(&log));
        let c = Arc::new(MockSource::new("C", Behavior::Fail).logging(&log));
        let resolver = CaseResolver::new(as_sources(&[a.clone(), b.clone(), c.clone()]));

        let err = resolver.resolve(NUMBER).await.unwrap_err();

        match err {
            LookupError::AllSourcesFailed { failures, .. } => {
                let ids: Vec<_> = failures.iter().map(|f| f.source_id.as_str()).collect();
                assert_eq!(ids, vec!["A", "C"]);
            }
            other => panic!("expected AllSourcesFailed, got {:?}", other),
        }
        assert_eq!(*log.lock().unwrap(), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_invalid_format_calls_nothing() {
        let source = Arc::new(MockSource::new("A", Behavior::NotFound));
        let resolver = CaseResolver::new(as_sources(&[source.clone()]));

        let err = resolver.resolve("123.456-7").await.unwrap_err();

        assert!(matches!(err, LookupError::InvalidFormat { .. }));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_unusable_record_falls_through() {
        let scraper = Arc::new(MockSource::new("SCRAPE", Behavior::Html("<p>Manutenção</p>")));
        let fallback = Arc::new(MockSource::new(
            "FALLBACK",
            Behavior::Registry(json!({ "situacao": "Suspenso" })),
        ));
        let resolver = CaseResolver::new(as_sources(&[scraper.clone(), fallback.clone()]));

        let (result, diagnostics) = resolver.resolve_with_diagnostics(NUMBER).await;

        assert_eq!(result.unwrap().status, CaseStatus::Suspended);
        assert_eq!(diagnostics.failures().len(), 1);
        assert_eq!(diagnostics.failures()[0].source_id, "SCRAPE");
    }

    #[tokio::test]
    async fn test_unsupported_sources_are_skipped() {
        let skipped = Arc::new(MockSource::new("OTHER_COURT", Behavior::Fail).unsupported());
        let resolver = CaseResolver::new(as_sources(&[skipped.clone()]));

        let (result, diagnostics) = resolver.resolve_with_diagnostics(NUMBER).await;

        assert!(matches!(result, Err(LookupError::NotFound { .. })));
        assert_eq!(skipped.calls(), 0);
        assert!(diagnostics.called().is_empty());
    }
}
