#[cfg(test)]
mod tests {
    use crate::cases::{
        BlobCaseRepository, CaseFilter, CaseRepositoryTrait, CaseService, CaseServiceTrait,
        CaseUpdate, NewCase, NewMovement,
    };
    use crate::errors::{Error, Result, ValidationError};
    use crate::events::{DomainEvent, MockDomainEventSink};
    use crate::storage::{load_collection, BlobStore, MemoryBlobStore};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use jurisdesk_court_data::{
        Case, CaseCategory, CaseLookup, CaseStatus, Client, LookupError, Movement,
    };
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // --- Mock lookup ---
    struct MockLookup {
        result: std::result::Result<Case, LookupError>,
        calls: AtomicUsize,
    }

    impl MockLookup {
        fn found(case: Case) -> Self {
            Self {
                result: Ok(case),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(err: LookupError) -> Self {
            Self {
                result: Err(err),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CaseLookup for MockLookup {
        async fn resolve(&self, _input: &str) -> std::result::Result<Case, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    struct Fixture {
        service: CaseService,
        store: Arc<MemoryBlobStore>,
        sink: MockDomainEventSink,
        lookup: Arc<MockLookup>,
    }

    fn fixture_with(lookup: MockLookup) -> Fixture {
        let store = Arc::new(MemoryBlobStore::new());
        let repository =
            Arc::new(BlobCaseRepository::load(store.clone() as Arc<dyn BlobStore>).unwrap());
        let sink = MockDomainEventSink::new();
        let lookup = Arc::new(lookup);
        let service = CaseService::new(repository, lookup.clone(), Arc::new(sink.clone()));
        Fixture {
            service,
            store,
            sink,
            lookup,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(MockLookup::failing(LookupError::NotFound {
            case_number: String::new(),
        }))
    }

    fn new_case(number: &str, client: &str, tax_id: &str) -> NewCase {
        NewCase {
            case_number: number.to_string(),
            category: CaseCategory::Labor,
            subject: Some("Horas extras".to_string()),
            claim_value: Some(dec!(25000)),
            client: Client {
                name: client.to_string(),
                tax_id: tax_id.to_string(),
                email: None,
                phone: None,
            },
            responsible_attorney: "Ana Costa".to_string(),
            ..NewCase::default()
        }
    }

    #[tokio::test]
    async fn test_create_case_starts_with_registration_movement() {
        let f = fixture();
        let case = f
            .service
            .create_case(new_case("10001234520238260100", "Maria Santos", "529.982.247-25"))
            .await
            .unwrap();

        assert_eq!(case.case_number, "1000123-45.2023.8.26.0100");
        assert_eq!(case.activity_log.len(), 1);
        assert_eq!(case.activity_log[0].kind, "Distribution");
        assert!(case.filing_date.is_some());
        assert_eq!(case.last_activity_date, case.filing_date);
        assert_eq!(f.sink.events(), vec![DomainEvent::cases_changed(vec![case.id.clone()])]);

        let stored: Vec<Case> = load_collection(f.store.as_ref(), "cases").unwrap();
        assert_eq!(stored, vec![case]);
    }

    #[tokio::test]
    async fn test_create_case_rejects_bad_tax_id_and_duplicates() {
        let f = fixture();

        let err = f
            .service
            .create_case(new_case("1000123-45.2023.8.26.0100", "Maria", "123.456.789-00"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidTaxId(_))
        ));

        f.service
            .create_case(new_case("1000123-45.2023.8.26.0100", "Maria", ""))
            .await
            .unwrap();
        let err = f
            .service
            .create_case(new_case("10001234520238260100", "Other", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_create_case_requires_client_name() {
        let f = fixture();
        let err = f
            .service
            .create_case(new_case("1000123-45.2023.8.26.0100", "  ", ""))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingField(ref field)) if field == "client.name"
        ));
    }

    #[tokio::test]
    async fn test_import_case_stores_resolved_record() {
        let mut found = Case::new("1017593-56.2022.8.26.0001");
        found.source = Some("DATAJUD".to_string());
        let f = fixture_with(MockLookup::found(found.clone()));

        let case = f
            .service
            .import_case("1017593-56.2022.8.26.0001")
            .await
            .unwrap();
        assert_eq!(case.id, found.id);
        assert_eq!(f.service.list_cases().unwrap().len(), 1);
        assert_eq!(
            f.sink.events(),
            vec![DomainEvent::case_imported(
                found.id.clone(),
                found.case_number.clone(),
                Some("DATAJUD".to_string())
            )]
        );

        // Second import is rejected before any lookup happens.
        let err = f
            .service
            .import_case("10175935620228260001")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));
        assert_eq!(f.lookup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_import_case_surfaces_lookup_errors() {
        let f = fixture();

        let err = f.service.import_case("12345").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Lookup(LookupError::InvalidFormat { .. })
        ));
        assert_eq!(f.lookup.calls.load(Ordering::SeqCst), 0);

        let err = f
            .service
            .import_case("1017593-56.2022.8.26.0001")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Lookup(LookupError::NotFound { .. })));
        assert!(f.service.list_cases().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let f = fixture();
        let case = f
            .service
            .create_case(new_case("1000123-45.2023.8.26.0100", "Maria Santos", ""))
            .await
            .unwrap();

        let updated = f
            .service
            .update_case(
                &case.id,
                CaseUpdate {
                    status: Some(CaseStatus::Suspended),
                    notes: Some("Awaiting expert report".to_string()),
                    ..CaseUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, CaseStatus::Suspended);
        assert_eq!(updated.category, CaseCategory::Labor);
        assert_eq!(updated.notes.as_deref(), Some("Awaiting expert report"));
        assert!(updated.last_activity_date >= case.last_activity_date);

        f.service.delete_case(&case.id).await.unwrap();
        assert!(matches!(
            f.service.get_case(&case.id),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            f.service.delete_case(&case.id).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_add_movement_appends() {
        let f = fixture();
        let case = f
            .service
            .create_case(new_case("1000123-45.2023.8.26.0100", "Maria Santos", ""))
            .await
            .unwrap();

        let at = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let movement = f
            .service
            .add_movement(
                &case.id,
                NewMovement {
                    timestamp: Some(at),
                    kind: "Hearing".to_string(),
                    description: "Conciliation hearing scheduled".to_string(),
                    actor: "Ana Costa".to_string(),
                },
            )
            .await
            .unwrap();

        let stored = f.service.get_case(&case.id).unwrap();
        assert_eq!(stored.activity_log.len(), 2);
        assert_eq!(stored.activity_log[1], movement);
        assert_eq!(movement.timestamp, at);

        let err = f
            .service
            .add_movement(
                &case.id,
                NewMovement {
                    timestamp: None,
                    kind: "Hearing".to_string(),
                    description: " ".to_string(),
                    actor: String::new(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_filter_and_summary() -> Result<()> {
        let f = fixture();
        f.service
            .create_case(new_case("1000123-45.2023.8.26.0100", "Maria Santos", "529.982.247-25"))
            .await?;
        let mut civil = new_case("2000456-11.2022.8.19.0001", "Empresa ABC Ltda", "11.222.333/0001-81");
        civil.category = CaseCategory::Civil;
        civil.subject = Some("Indenização".to_string());
        civil.claim_value = Some(dec!(1000.50));
        f.service.create_case(civil).await?;

        let by_name = f.service.filter_cases(&CaseFilter {
            search: Some("maria".to_string()),
            ..CaseFilter::default()
        })?;
        assert_eq!(by_name.len(), 1);

        let by_digits = f.service.filter_cases(&CaseFilter {
            search: Some("20004561120228190001".to_string()),
            ..CaseFilter::default()
        })?;
        assert_eq!(by_digits.len(), 1);
        assert_eq!(by_digits[0].client.name, "Empresa ABC Ltda");

        let by_tax_id = f.service.filter_cases(&CaseFilter {
            search: Some("11.222.333".to_string()),
            category: Some(CaseCategory::Civil),
            status: Some(CaseStatus::Active),
        })?;
        assert_eq!(by_tax_id.len(), 1);

        let summary = f.service.summary()?;
        assert_eq!(summary.total_cases, 2);
        assert_eq!(summary.total_claim_value, dec!(26000.50));
        assert_eq!(summary.by_status[0].count, 2);
        let labor = summary
            .by_category
            .iter()
            .find(|c| c.category == CaseCategory::Labor)
            .unwrap();
        assert_eq!(labor.count, 1);
        assert_eq!(summary.recent_movements.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_repository_reloads_persisted_cases() {
        let store: Arc<dyn BlobStore> = Arc::new(MemoryBlobStore::new());
        let repository = BlobCaseRepository::load(store.clone()).unwrap();
        let mut case = Case::new("1017593-56.2022.8.26.0001");
        case.activity_log.push(Movement::new(
            Utc::now(),
            "Movement 26",
            "Distribuído",
            "Sistema",
        ));
        repository.insert(case.clone()).await.unwrap();

        let reloaded = BlobCaseRepository::load(store).unwrap();
        assert_eq!(reloaded.get_by_id(&case.id).unwrap(), case);
        assert!(reloaded
            .find_by_number_digits("10175935620228260001")
            .unwrap()
            .is_some());
    }
}
