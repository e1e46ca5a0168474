use async_trait::async_trait;

use super::cases_model::{CaseFilter, CaseSummary, CaseUpdate, NewCase, NewMovement};
use crate::errors::Result;
use jurisdesk_court_data::{Case, Movement};

/// Trait for case repository operations
#[async_trait]
pub trait CaseRepositoryTrait: Send + Sync {
    fn list(&self) -> Result<Vec<Case>>;
    fn get_by_id(&self, case_id: &str) -> Result<Case>;
    /// Finds a case whose number has the same digits as `digits`.
    fn find_by_number_digits(&self, digits: &str) -> Result<Option<Case>>;
    async fn insert(&self, case: Case) -> Result<Case>;
    async fn update(&self, case: Case) -> Result<Case>;
    async fn delete(&self, case_id: &str) -> Result<usize>;
}

/// Trait for case service operations
#[async_trait]
pub trait CaseServiceTrait: Send + Sync {
    fn get_case(&self, case_id: &str) -> Result<Case>;
    fn list_cases(&self) -> Result<Vec<Case>>;
    fn filter_cases(&self, filter: &CaseFilter) -> Result<Vec<Case>>;
    fn summary(&self) -> Result<CaseSummary>;
    async fn create_case(&self, new_case: NewCase) -> Result<Case>;
    /// Looks the number up in the court sources and stores the result.
    async fn import_case(&self, case_number: &str) -> Result<Case>;
    async fn update_case(&self, case_id: &str, update: CaseUpdate) -> Result<Case>;
    async fn delete_case(&self, case_id: &str) -> Result<()>;
    async fn add_movement(&self, case_id: &str, movement: NewMovement) -> Result<Movement>;
}
