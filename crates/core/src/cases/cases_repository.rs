use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::cases_traits::CaseRepositoryTrait;
use crate::constants::CASES_KEY;
use crate::errors::{Error, Result};
use crate::storage::{load_collection, save_collection, BlobStore};
use jurisdesk_court_data::{strip_separators, Case};

/// Case repository over the `cases` blob.
///
/// Reads are served from memory. Every write persists the whole collection
/// before the in-memory copy is replaced, one write at a time.
pub struct BlobCaseRepository {
    store: Arc<dyn BlobStore>,
    cases: RwLock<Vec<Case>>,
    write_lock: Mutex<()>,
}

impl BlobCaseRepository {
    /// Loads the persisted collection.
    pub fn load(store: Arc<dyn BlobStore>) -> Result<Self> {
        let cases = load_collection(store.as_ref(), CASES_KEY)?;
        Ok(Self {
            store,
            cases: RwLock::new(cases),
            write_lock: Mutex::new(()),
        })
    }

    fn snapshot(&self) -> Result<Vec<Case>> {
        self.cases
            .read()
            .map(|cases| cases.clone())
            .map_err(|_| Error::Repository("Case collection lock poisoned".to_string()))
    }

    async fn commit(&self, cases: Vec<Case>) -> Result<()> {
        save_collection(self.store.as_ref(), CASES_KEY, &cases).await?;
        let mut guard = self
            .cases
            .write()
            .map_err(|_| Error::Repository("Case collection lock poisoned".to_string()))?;
        *guard = cases;
        Ok(())
    }
}

#[async_trait]
impl CaseRepositoryTrait for BlobCaseRepository {
    fn list(&self) -> Result<Vec<Case>> {
        self.snapshot()
    }

    fn get_by_id(&self, case_id: &str) -> Result<Case> {
        self.snapshot()?
            .into_iter()
            .find(|c| c.id == case_id)
            .ok_or_else(|| Error::NotFound(format!("Case {}", case_id)))
    }

    fn find_by_number_digits(&self, digits: &str) -> Result<Option<Case>> {
        Ok(self
            .snapshot()?
            .into_iter()
            .find(|c| strip_separators(&c.case_number) == digits))
    }

    async fn insert(&self, case: Case) -> Result<Case> {
        let _guard = self.write_lock.lock().await;
        let mut cases = self.snapshot()?;
        if cases.iter().any(|c| c.id == case.id) {
            return Err(Error::ConstraintViolation(format!(
                "Case {} already exists",
                case.id
            )));
        }
        cases.push(case.clone());
        self.commit(cases).await?;
        Ok(case)
    }

    async fn update(&self, case: Case) -> Result<Case> {
        let _guard = self.write_lock.lock().await;
        let mut cases = self.snapshot()?;
        let slot = cases
            .iter_mut()
            .find(|c| c.id == case.id)
            .ok_or_else(|| Error::NotFound(format!("Case {}", case.id)))?;
        *slot = case.clone();
        self.commit(cases).await?;
        Ok(case)
    }

    async fn delete(&self, case_id: &str) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let mut cases = self.snapshot()?;
        let before = cases.len();
        cases.retain(|c| c.id != case_id);
        let removed = before - cases.len();
        if removed > 0 {
            self.commit(cases).await?;
        }
        Ok(removed)
    }
}
