#[cfg(test)]
mod tests {
    use crate::errors::Error;
    use crate::events::{DomainEvent, MockDomainEventSink};
    use crate::monitoring::{
        CheckOutcome, MonitoringService, MonitoringServiceTrait, NewWatch, WatchStatus,
        WatchedCase,
    };
    use crate::storage::{load_collection, BlobStore, MemoryBlobStore};
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use jurisdesk_court_data::{Case, CaseLookup, Client, LookupError, Movement};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const NUMBER: &str = "1017593-56.2022.8.26.0001";

    /// Lookup returning whatever the test put in `next`.
    struct ScriptedLookup {
        next: Mutex<std::result::Result<Case, LookupError>>,
        calls: AtomicUsize,
    }

    impl ScriptedLookup {
        fn new(result: std::result::Result<Case, LookupError>) -> Self {
            Self {
                next: Mutex::new(result),
                calls: AtomicUsize::new(0),
            }
        }

        fn set(&self, result: std::result::Result<Case, LookupError>) {
            *self.next.lock().unwrap() = result;
        }
    }

    #[async_trait]
    impl CaseLookup for ScriptedLookup {
        async fn resolve(&self, _input: &str) -> std::result::Result<Case, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.next.lock().unwrap().clone()
        }
    }

    fn movement(day: u32, kind: &str, description: &str) -> Movement {
        Movement::new(
            Utc.with_ymd_and_hms(2024, 3, day, 10, 0, 0).unwrap(),
            kind,
            description,
            "Court",
        )
    }

    fn case_with(movements: Vec<Movement>) -> Case {
        let mut case = Case::new(NUMBER);
        case.court = "TJSP".to_string();
        case.last_activity_date = movements.iter().map(|m| m.timestamp).max();
        case.activity_log = movements;
        case
    }

    fn request() -> NewWatch {
        NewWatch {
            case_number: NUMBER.to_string(),
            client: Client {
                name: "Maria Santos".to_string(),
                ..Client::default()
            },
            responsible_attorney: "Ana Costa".to_string(),
            interval_minutes: 30,
        }
    }

    struct Fixture {
        service: MonitoringService,
        lookup: Arc<ScriptedLookup>,
        sink: MockDomainEventSink,
        store: Arc<MemoryBlobStore>,
    }

    fn fixture(initial: std::result::Result<Case, LookupError>) -> Fixture {
        let store = Arc::new(MemoryBlobStore::new());
        let lookup = Arc::new(ScriptedLookup::new(initial));
        let sink = MockDomainEventSink::new();
        let service = MonitoringService::load(
            store.clone() as Arc<dyn BlobStore>,
            lookup.clone(),
            Arc::new(sink.clone()),
        )
        .unwrap();
        Fixture {
            service,
            lookup,
            sink,
            store,
        }
    }

    #[tokio::test]
    async fn test_watch_records_known_movements() {
        let f = fixture(Ok(case_with(vec![movement(1, "Distribution", "Filed")])));

        let watched = f.service.watch(request()).await.unwrap();

        assert_eq!(watched.id, "monitor-10175935620228260001");
        assert_eq!(watched.court, "TJSP");
        assert_eq!(watched.status, WatchStatus::Watching);
        assert_eq!(watched.known_movements.len(), 1);
        assert_eq!(
            watched.next_check_at - watched.last_checked_at,
            Duration::minutes(30)
        );

        let stored: Vec<WatchedCase> = load_collection(f.store.as_ref(), "monitoring").unwrap();
        assert_eq!(stored, vec![watched]);
    }

    #[tokio::test]
    async fn test_watch_requires_a_resolvable_case() {
        let f = fixture(Err(LookupError::NotFound {
            case_number: NUMBER.to_string(),
        }));

        let err = f.service.watch(request()).await.unwrap_err();
        assert!(matches!(err, Error::Lookup(LookupError::NotFound { .. })));
        assert!(f.service.list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_watch_twice_is_rejected_without_lookup() {
        let f = fixture(Ok(case_with(vec![])));
        f.service.watch(request()).await.unwrap();

        let mut again = request();
        again.case_number = "10175935620228260001".to_string();
        let err = f.service.watch(again).await.unwrap_err();

        assert!(matches!(err, Error::ConstraintViolation(_)));
        assert_eq!(f.lookup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_check_reports_new_movements() {
        let first = movement(1, "Distribution", "Filed");
        let f = fixture(Ok(case_with(vec![first.clone()])));
        f.service.watch(request()).await.unwrap();

        // Same movement under a fresh id is not new.
        let mut same = first.clone();
        same.id = "regenerated".to_string();
        let hearing = movement(5, "Hearing", "Hearing scheduled");
        f.lookup.set(Ok(case_with(vec![same, hearing.clone()])));

        let outcome = f.service.check(NUMBER).await.unwrap();
        match &outcome {
            CheckOutcome::Changed {
                new_movements,
                last_activity_date,
                ..
            } => {
                assert_eq!(new_movements, &vec![hearing.clone()]);
                assert_eq!(*last_activity_date, Some(hearing.timestamp));
            }
            other => panic!("expected Changed, got {:?}", other),
        }
        assert_eq!(
            f.sink.events(),
            vec![DomainEvent::monitored_case_changed(
                NUMBER.to_string(),
                vec!["Hearing - Hearing scheduled".to_string()],
                Some(hearing.timestamp),
            )]
        );

        // Nothing new the second time.
        let outcome = f.service.check(NUMBER).await.unwrap();
        assert_eq!(
            outcome,
            CheckOutcome::Unchanged {
                case_number: NUMBER.to_string()
            }
        );
        assert_eq!(f.sink.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_check_marks_error_and_recovers() {
        let f = fixture(Ok(case_with(vec![])));
        f.service.watch(request()).await.unwrap();

        f.lookup.set(Err(LookupError::AllSourcesFailed {
            case_number: NUMBER.to_string(),
            failures: vec![],
        }));
        let outcome = f.service.check(NUMBER).await.unwrap();
        assert!(matches!(outcome, CheckOutcome::Failed { .. }));

        let watched = f.service.get(NUMBER).unwrap();
        assert_eq!(watched.status, WatchStatus::Error);
        assert!(watched.last_error.is_some());
        assert!(matches!(
            f.sink.events().last(),
            Some(DomainEvent::MonitoringFailed { .. })
        ));
        assert_eq!(f.service.stats().unwrap().with_error, 1);

        f.lookup.set(Ok(case_with(vec![])));
        f.service.check(NUMBER).await.unwrap();
        let watched = f.service.get(NUMBER).unwrap();
        assert_eq!(watched.status, WatchStatus::Watching);
        assert_eq!(watched.last_error, None);
    }

    #[tokio::test]
    async fn test_check_due_skips_paused_and_not_yet_due() {
        let f = fixture(Ok(case_with(vec![])));
        let watched = f.service.watch(request()).await.unwrap();

        let before_due = watched.next_check_at - Duration::minutes(1);
        assert!(f.service.check_due(before_due).await.unwrap().is_empty());

        f.service.pause(NUMBER).await.unwrap();
        let later = watched.next_check_at + Duration::minutes(1);
        assert!(f.service.check_due(later).await.unwrap().is_empty());
        assert_eq!(f.service.stats().unwrap().paused, 1);

        f.service.resume(NUMBER).await.unwrap();
        let outcomes = f.service.check_due(later).await.unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].case_number(), NUMBER);
        assert_eq!(f.lookup.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_stop_removes_entry() {
        let f = fixture(Ok(case_with(vec![])));
        f.service.watch(request()).await.unwrap();

        f.service.stop(NUMBER).await.unwrap();
        assert!(f.service.list().unwrap().is_empty());
        assert!(matches!(
            f.service.stop(NUMBER).await.unwrap_err(),
            Error::NotFound(_)
        ));
        assert!(matches!(
            f.service.check(NUMBER).await.unwrap_err(),
            Error::NotFound(_)
        ));
    }
}
