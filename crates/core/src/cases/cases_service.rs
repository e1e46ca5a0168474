use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};

use super::cases_model::{CaseFilter, CaseSummary, CaseUpdate, NewCase, NewMovement};
use super::cases_traits::{CaseRepositoryTrait, CaseServiceTrait};
use crate::constants::RECENT_MOVEMENTS_LIMIT;
use crate::errors::{Error, Result, ValidationError};
use crate::events::{DomainEvent, DomainEventSink};
use crate::utils::tax_id::is_valid_tax_id;
use jurisdesk_court_data::{strip_separators, Case, CaseLookup, CaseNumber, Movement};

/// Kind of the movement every manually registered case starts with.
const REGISTRATION_KIND: &str = "Distribution";

/// Service for managing cases
pub struct CaseService {
    repository: Arc<dyn CaseRepositoryTrait>,
    lookup: Arc<dyn CaseLookup>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl CaseService {
    pub fn new(
        repository: Arc<dyn CaseRepositoryTrait>,
        lookup: Arc<dyn CaseLookup>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            repository,
            lookup,
            event_sink,
        }
    }

    fn ensure_unique_number(&self, number: &str) -> Result<()> {
        let digits = strip_separators(number);
        if let Some(existing) = self.repository.find_by_number_digits(&digits)? {
            return Err(Error::ConstraintViolation(format!(
                "Case {} is already registered",
                existing.case_number
            )));
        }
        Ok(())
    }
}

fn validate_new_case(new_case: &NewCase) -> Result<()> {
    if new_case.case_number.trim().is_empty() {
        return Err(ValidationError::MissingField("caseNumber".to_string()).into());
    }
    if new_case.client.name.trim().is_empty() {
        return Err(ValidationError::MissingField("client.name".to_string()).into());
    }
    let tax_id = new_case.client.tax_id.trim();
    if !tax_id.is_empty() && !is_valid_tax_id(tax_id) {
        return Err(ValidationError::InvalidTaxId(tax_id.to_string()).into());
    }
    if new_case.claim_value.is_some_and(|v| v.is_sign_negative()) {
        return Err(ValidationError::InvalidInput("Claim value cannot be negative".to_string()).into());
    }
    Ok(())
}

#[async_trait]
impl CaseServiceTrait for CaseService {
    fn get_case(&self, case_id: &str) -> Result<Case> {
        self.repository.get_by_id(case_id)
    }

    fn list_cases(&self) -> Result<Vec<Case>> {
        self.repository.list()
    }

    fn filter_cases(&self, filter: &CaseFilter) -> Result<Vec<Case>> {
        Ok(self
            .repository
            .list()?
            .into_iter()
            .filter(|c| filter.matches(c))
            .collect())
    }

    fn summary(&self) -> Result<CaseSummary> {
        let cases = self.repository.list()?;
        Ok(CaseSummary::from_cases(&cases, RECENT_MOVEMENTS_LIMIT))
    }

    async fn create_case(&self, new_case: NewCase) -> Result<Case> {
        validate_new_case(&new_case)?;

        let input = new_case.case_number.trim();
        let number = CaseNumber::parse(input)
            .map(|n| n.formatted())
            .unwrap_or_else(|_| input.to_string());
        self.ensure_unique_number(&number)?;

        let now = Utc::now();
        let mut case = Case::new(number);
        case.category = new_case.category;
        case.status = new_case.status;
        case.subject = new_case.subject;
        case.court_class = new_case.court_class;
        case.claim_value = new_case.claim_value;
        case.client = new_case.client;
        case.responsible_attorney = new_case.responsible_attorney;
        case.court = new_case.court;
        case.division = new_case.division;
        case.parties = new_case.parties;
        case.notes = new_case.notes;
        case.filing_date = Some(now);
        case.last_activity_date = Some(now);
        case.activity_log.push(Movement::new(
            now,
            REGISTRATION_KIND,
            "Case registered in the system",
            "System",
        ));

        let case = self.repository.insert(case).await?;
        debug!("Created case {} ({})", case.id, case.case_number);
        self.event_sink
            .emit(DomainEvent::cases_changed(vec![case.id.clone()]));
        Ok(case)
    }

    async fn import_case(&self, case_number: &str) -> Result<Case> {
        let number = CaseNumber::parse(case_number)?;
        self.ensure_unique_number(number.digits())?;

        let case = self.lookup.resolve(case_number).await?;
        let case = self.repository.insert(case).await?;
        info!(
            "Imported case {} from {}",
            case.case_number,
            case.source.as_deref().unwrap_or("unknown source")
        );
        self.event_sink.emit(DomainEvent::case_imported(
            case.id.clone(),
            case.case_number.clone(),
            case.source.clone(),
        ));
        Ok(case)
    }

    async fn update_case(&self, case_id: &str, update: CaseUpdate) -> Result<Case> {
        if let Some(client) = &update.client {
            let tax_id = client.tax_id.trim();
            if !tax_id.is_empty() && !is_valid_tax_id(tax_id) {
                return Err(ValidationError::InvalidTaxId(tax_id.to_string()).into());
            }
        }

        let mut case = self.repository.get_by_id(case_id)?;
        update.apply_to(&mut case);
        case.last_activity_date = Some(Utc::now());

        let case = self.repository.update(case).await?;
        self.event_sink
            .emit(DomainEvent::cases_changed(vec![case.id.clone()]));
        Ok(case)
    }

    async fn delete_case(&self, case_id: &str) -> Result<()> {
        if self.repository.delete(case_id).await? == 0 {
            return Err(Error::NotFound(format!("Case {}", case_id)));
        }
        self.event_sink
            .emit(DomainEvent::cases_changed(vec![case_id.to_string()]));
        Ok(())
    }

    async fn add_movement(&self, case_id: &str, movement: NewMovement) -> Result<Movement> {
        if movement.kind.trim().is_empty() {
            return Err(ValidationError::MissingField("kind".to_string()).into());
        }
        if movement.description.trim().is_empty() {
            return Err(ValidationError::MissingField("description".to_string()).into());
        }

        let mut case = self.repository.get_by_id(case_id)?;
        let now = Utc::now();
        let created = Movement::new(
            movement.timestamp.unwrap_or(now),
            movement.kind.trim(),
            movement.description.trim(),
            movement.actor,
        );
        case.activity_log.push(created.clone());
        case.last_activity_date = Some(now);

        self.repository.update(case).await?;
        self.event_sink
            .emit(DomainEvent::cases_changed(vec![case_id.to_string()]));
        Ok(created)
    }
}
