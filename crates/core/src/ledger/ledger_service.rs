use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use super::ledger_errors::LedgerError;
use super::ledger_model::{
    BulkPayment, Expense, ExpenseStatus, Fee, FeeStatus, Ledger, NewExpense, NewFee, NewPayment,
    Payment,
};
use super::ledger_store::LedgerStore;
use super::ledger_traits::LedgerServiceTrait;
use super::report::{build_report, overdue_ledgers, FinancialReport};
use crate::cases::CaseRepositoryTrait;
use crate::constants::LEDGERS_KEY;
use crate::errors::{Error, Result, ValidationError};
use crate::events::{DomainEvent, DomainEventSink};
use crate::storage::{load_collection, save_collection, BlobStore};

/// Service for managing case ledgers.
///
/// Wraps a [`LedgerStore`] and writes the whole collection to the `ledgers`
/// blob after every mutation. A mutation whose write fails is rolled back,
/// so memory never holds entries the blob does not.
pub struct LedgerService {
    store: LedgerStore,
    blobs: Arc<dyn BlobStore>,
    cases: Arc<dyn CaseRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
    write_lock: Mutex<()>,
}

impl LedgerService {
    /// Builds the service from the ledgers persisted in `blobs`.
    pub fn load(
        blobs: Arc<dyn BlobStore>,
        cases: Arc<dyn CaseRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Result<Self> {
        let ledgers: Vec<Ledger> = load_collection(blobs.as_ref(), LEDGERS_KEY)?;
        debug!("Loaded {} ledger(s)", ledgers.len());
        Ok(Self {
            store: LedgerStore::from_ledgers(ledgers),
            blobs,
            cases,
            event_sink,
            write_lock: Mutex::new(()),
        })
    }

    /// Runs `apply` against the store and persists the result.
    ///
    /// `apply` returns its value with the ids of the changed ledgers; nothing
    /// is written when that list is empty. Writers are serialized, and a
    /// failed write restores the ledgers as they were before `apply`.
    async fn write<T, F>(&self, apply: F) -> Result<T>
    where
        T: Send,
        F: FnOnce() -> Result<(T, Vec<String>)> + Send,
    {
        let guard = self.write_lock.lock().await;
        let before = self.store.snapshot();
        let (value, changed) = apply()?;
        if changed.is_empty() {
            return Ok(value);
        }

        let snapshot = self.store.snapshot();
        if let Err(e) = save_collection(self.blobs.as_ref(), LEDGERS_KEY, &snapshot).await {
            warn!("Failed to persist ledgers, rolling back: {}", e);
            self.store.restore(before);
            return Err(e);
        }
        drop(guard);

        self.event_sink.emit(DomainEvent::ledgers_changed(changed));
        Ok(value)
    }

    /// Creates the ledger of `case_id` on first use.
    fn ensure_ledger(&self, case_id: &str) -> Result<()> {
        if self.store.get_ledger(case_id).is_some() {
            return Ok(());
        }
        let case = self.cases.get_by_id(case_id)?;
        let claim = case.claim_value.unwrap_or(Decimal::ZERO);
        match self.store.create_ledger(case_id, claim) {
            // Created concurrently by another caller.
            Ok(_) | Err(LedgerError::AlreadyExists(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn owner_of(kind: &str, entry_id: &str, owner: Option<String>) -> Result<String> {
    owner.ok_or_else(|| Error::NotFound(format!("{} {}", kind, entry_id)))
}

#[async_trait]
impl LedgerServiceTrait for LedgerService {
    fn get_ledger(&self, case_id: &str) -> Result<Ledger> {
        self.store
            .get_ledger(case_id)
            .ok_or_else(|| LedgerError::LedgerNotFound(case_id.to_string()).into())
    }

    fn list_ledgers(&self) -> Vec<Ledger> {
        self.store.list_ledgers()
    }

    fn report(&self, start: NaiveDate, end: NaiveDate) -> Result<FinancialReport> {
        if start > end {
            return Err(ValidationError::InvalidInput(format!(
                "Report period starts after it ends ({} > {})",
                start, end
            ))
            .into());
        }

        let mut report = build_report(&self.store.list_ledgers(), start, end);
        for row in report.rows.iter_mut() {
            if let Ok(case) = self.cases.get_by_id(&row.case_id) {
                row.case_number = Some(case.case_number);
                row.client_name = Some(case.client.name);
            }
        }
        Ok(report)
    }

    fn overdue(&self, today: NaiveDate) -> Vec<Ledger> {
        overdue_ledgers(&self.store.list_ledgers(), today)
    }

    async fn create_ledger(&self, case_id: &str, claim_value: Option<Decimal>) -> Result<Ledger> {
        let case = self.cases.get_by_id(case_id)?;
        let claim = claim_value.or(case.claim_value).unwrap_or(Decimal::ZERO);
        let ledger = self
            .write(|| Ok((self.store.create_ledger(case_id, claim)?, vec![case_id.to_string()])))
            .await?;
        info!("Opened ledger for case {}", case.case_number);
        Ok(ledger)
    }

    async fn update_claim_value(&self, case_id: &str, claim_value: Decimal) -> Result<Ledger> {
        self.write(|| {
            let ledger = self.store.update_claim_value(case_id, claim_value)?;
            Ok((ledger, vec![case_id.to_string()]))
        })
        .await
    }

    async fn delete_ledger(&self, case_id: &str) -> Result<bool> {
        self.write(|| {
            let deleted = self.store.delete_ledger(case_id);
            let changed = if deleted { vec![case_id.to_string()] } else { Vec::new() };
            Ok((deleted, changed))
        })
        .await
    }

    async fn add_fee(&self, case_id: &str, fee: NewFee) -> Result<Fee> {
        self.write(|| {
            self.ensure_ledger(case_id)?;
            let fee = self.store.add_fee(case_id, fee)?;
            Ok((fee, vec![case_id.to_string()]))
        })
        .await
    }

    async fn add_expense(&self, case_id: &str, expense: NewExpense) -> Result<Expense> {
        self.write(|| {
            self.ensure_ledger(case_id)?;
            let expense = self.store.add_expense(case_id, expense)?;
            Ok((expense, vec![case_id.to_string()]))
        })
        .await
    }

    async fn add_payment(&self, case_id: &str, payment: NewPayment) -> Result<Payment> {
        if payment.amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(
                "Payment amount must be positive".to_string(),
            )
            .into());
        }
        self.write(|| {
            self.ensure_ledger(case_id)?;
            let payment = self.store.add_payment(case_id, payment)?;
            Ok((payment, vec![case_id.to_string()]))
        })
        .await
    }

    async fn remove_fee(&self, entry_id: &str) -> Result<String> {
        self.write(|| {
            let case_id = owner_of("Fee", entry_id, self.store.remove_fee(entry_id))?;
            Ok((case_id.clone(), vec![case_id]))
        })
        .await
    }

    async fn remove_expense(&self, entry_id: &str) -> Result<String> {
        self.write(|| {
            let case_id = owner_of("Expense", entry_id, self.store.remove_expense(entry_id))?;
            Ok((case_id.clone(), vec![case_id]))
        })
        .await
    }

    async fn remove_payment(&self, entry_id: &str) -> Result<String> {
        self.write(|| {
            let case_id = owner_of("Payment", entry_id, self.store.remove_payment(entry_id))?;
            Ok((case_id.clone(), vec![case_id]))
        })
        .await
    }

    async fn update_fee_status(
        &self,
        case_id: &str,
        entry_id: &str,
        status: FeeStatus,
    ) -> Result<Fee> {
        self.write(|| {
            let fee = self.store.update_fee_status(case_id, entry_id, status)?;
            Ok((fee, vec![case_id.to_string()]))
        })
        .await
    }

    async fn update_expense_status(
        &self,
        case_id: &str,
        entry_id: &str,
        status: ExpenseStatus,
    ) -> Result<Expense> {
        self.write(|| {
            let expense = self.store.update_expense_status(case_id, entry_id, status)?;
            Ok((expense, vec![case_id.to_string()]))
        })
        .await
    }

    async fn bulk_settle(
        &self,
        case_ids: &[String],
        paid_date: NaiveDate,
    ) -> Result<Vec<BulkPayment>> {
        let created = self
            .write(|| {
                let created = self.store.bulk_settle(case_ids, paid_date);
                let changed = created.iter().map(|p| p.case_id.clone()).collect();
                Ok((created, changed))
            })
            .await?;
        info!(
            "Bulk settle over {} case(s) created {} payment(s)",
            case_ids.len(),
            created.len()
        );
        Ok(created)
    }

    async fn bulk_partial_payment(
        &self,
        case_ids: &[String],
        amount: Decimal,
        paid_date: NaiveDate,
    ) -> Result<Vec<BulkPayment>> {
        let created = self
            .write(|| {
                let created = self.store.bulk_partial_payment(case_ids, amount, paid_date)?;
                let changed = created.iter().map(|p| p.case_id.clone()).collect();
                Ok((created, changed))
            })
            .await?;
        info!(
            "Bulk partial payment of {} over {} case(s) created {} payment(s)",
            amount,
            case_ids.len(),
            created.len()
        );
        Ok(created)
    }
}
