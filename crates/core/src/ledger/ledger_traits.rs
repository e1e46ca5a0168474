use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::ledger_model::{
    BulkPayment, Expense, ExpenseStatus, Fee, FeeStatus, Ledger, NewExpense, NewFee, NewPayment,
    Payment,
};
use super::report::FinancialReport;
use crate::errors::Result;

/// Trait for ledger service operations
#[async_trait]
pub trait LedgerServiceTrait: Send + Sync {
    fn get_ledger(&self, case_id: &str) -> Result<Ledger>;
    fn list_ledgers(&self) -> Vec<Ledger>;
    fn report(&self, start: NaiveDate, end: NaiveDate) -> Result<FinancialReport>;
    fn overdue(&self, today: NaiveDate) -> Vec<Ledger>;

    /// Creates the ledger of an existing case. The claim value defaults to
    /// the case's own.
    async fn create_ledger(&self, case_id: &str, claim_value: Option<Decimal>) -> Result<Ledger>;
    async fn update_claim_value(&self, case_id: &str, claim_value: Decimal) -> Result<Ledger>;
    async fn delete_ledger(&self, case_id: &str) -> Result<bool>;

    async fn add_fee(&self, case_id: &str, fee: NewFee) -> Result<Fee>;
    async fn add_expense(&self, case_id: &str, expense: NewExpense) -> Result<Expense>;
    async fn add_payment(&self, case_id: &str, payment: NewPayment) -> Result<Payment>;

    /// Removes an entry by id, wherever it lives. Returns the owning case id.
    async fn remove_fee(&self, entry_id: &str) -> Result<String>;
    async fn remove_expense(&self, entry_id: &str) -> Result<String>;
    async fn remove_payment(&self, entry_id: &str) -> Result<String>;

    async fn update_fee_status(&self, case_id: &str, entry_id: &str, status: FeeStatus)
        -> Result<Fee>;
    async fn update_expense_status(
        &self,
        case_id: &str,
        entry_id: &str,
        status: ExpenseStatus,
    ) -> Result<Expense>;

    async fn bulk_settle(&self, case_ids: &[String], paid_date: NaiveDate)
        -> Result<Vec<BulkPayment>>;
    async fn bulk_partial_payment(
        &self,
        case_ids: &[String],
        amount: Decimal,
        paid_date: NaiveDate,
    ) -> Result<Vec<BulkPayment>>;
}
