//! In-memory ledger collection.
//!
//! One mutex guards every ledger. Each operation mutates and recomputes
//! under the same guard, so callers never observe stale balances and
//! concurrent bulk operations apply one after the other.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{NaiveDate, Utc};
use log::debug;
use rust_decimal::Decimal;

use super::calculator::{percentage_fee_amount, recompute};
use super::ledger_errors::LedgerError;
use super::ledger_model::{
    BulkPayment, Expense, ExpenseStatus, Fee, FeeKind, FeeStatus, Ledger, NewExpense, NewFee,
    NewPayment, Payment, PaymentKind, PaymentMethod,
};

type StoreResult<T> = std::result::Result<T, LedgerError>;

#[derive(Default)]
pub struct LedgerStore {
    ledgers: Mutex<Vec<Ledger>>,
}

fn new_entry_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn ensure_non_negative(what: &str, amount: Decimal) -> StoreResult<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(LedgerError::InvalidAmount(format!(
            "{} cannot be negative",
            what
        )));
    }
    Ok(())
}

fn find_mut<'a>(ledgers: &'a mut [Ledger], case_id: &str) -> StoreResult<&'a mut Ledger> {
    ledgers
        .iter_mut()
        .find(|l| l.case_id == case_id)
        .ok_or_else(|| LedgerError::LedgerNotFound(case_id.to_string()))
}

fn touch(ledger: &mut Ledger) {
    recompute(ledger);
    ledger.updated_at = Utc::now();
}

/// Keeps the first occurrence of every id.
fn dedup_ids(case_ids: &[String]) -> Vec<&str> {
    let mut seen = Vec::with_capacity(case_ids.len());
    for id in case_ids {
        if !seen.contains(&id.as_str()) {
            seen.push(id.as_str());
        }
    }
    seen
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `ledgers`, with derived fields recomputed.
    pub fn from_ledgers(ledgers: Vec<Ledger>) -> Self {
        let store = Self::new();
        store.restore(ledgers);
        store
    }

    fn guard(&self) -> MutexGuard<'_, Vec<Ledger>> {
        // Every mutation recomputes before releasing the guard, so the data
        // behind a poisoned lock is still consistent.
        self.ledgers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create_ledger(&self, case_id: &str, claim_value: Decimal) -> StoreResult<Ledger> {
        ensure_non_negative("Claim value", claim_value)?;
        let mut ledgers = self.guard();
        if ledgers.iter().any(|l| l.case_id == case_id) {
            return Err(LedgerError::AlreadyExists(case_id.to_string()));
        }
        let mut ledger = Ledger::new(case_id, claim_value);
        recompute(&mut ledger);
        ledgers.push(ledger.clone());
        debug!("Created ledger for case {}", case_id);
        Ok(ledger)
    }

    pub fn get_ledger(&self, case_id: &str) -> Option<Ledger> {
        self.guard().iter().find(|l| l.case_id == case_id).cloned()
    }

    pub fn list_ledgers(&self) -> Vec<Ledger> {
        self.guard().clone()
    }

    pub fn delete_ledger(&self, case_id: &str) -> bool {
        let mut ledgers = self.guard();
        let before = ledgers.len();
        ledgers.retain(|l| l.case_id != case_id);
        ledgers.len() != before
    }

    /// Changes the claim value. Stored percentage fee amounts are kept.
    pub fn update_claim_value(&self, case_id: &str, claim_value: Decimal) -> StoreResult<Ledger> {
        ensure_non_negative("Claim value", claim_value)?;
        let mut ledgers = self.guard();
        let ledger = find_mut(&mut ledgers, case_id)?;
        ledger.claim_value = claim_value;
        touch(ledger);
        Ok(ledger.clone())
    }

    pub fn add_fee(&self, case_id: &str, new_fee: NewFee) -> StoreResult<Fee> {
        let mut ledgers = self.guard();
        let ledger = find_mut(&mut ledgers, case_id)?;

        let amount = match new_fee.kind {
            FeeKind::Percentage => {
                let percentage = new_fee.percentage.ok_or_else(|| {
                    LedgerError::InvalidAmount("Percentage fees need a percentage".to_string())
                })?;
                ensure_non_negative("Percentage", percentage)?;
                percentage_fee_amount(ledger.claim_value, percentage).ok_or_else(|| {
                    LedgerError::InvalidAmount("Percentage fee amount overflows".to_string())
                })?
            }
            _ => new_fee.amount.ok_or_else(|| {
                LedgerError::InvalidAmount("Fee amount is required".to_string())
            })?,
        };
        ensure_non_negative("Fee amount", amount)?;

        let fee = Fee {
            id: new_entry_id(),
            kind: new_fee.kind,
            description: new_fee.description,
            amount,
            percentage: match new_fee.kind {
                FeeKind::Percentage => new_fee.percentage,
                _ => None,
            },
            contracted_date: new_fee.contracted_date,
            due_date: new_fee.due_date,
            status: new_fee.status,
        };
        ledger.fees.push(fee.clone());
        touch(ledger);
        Ok(fee)
    }

    pub fn add_expense(&self, case_id: &str, new_expense: NewExpense) -> StoreResult<Expense> {
        ensure_non_negative("Expense amount", new_expense.amount)?;
        let mut ledgers = self.guard();
        let ledger = find_mut(&mut ledgers, case_id)?;

        let expense = Expense {
            id: new_entry_id(),
            kind: new_expense.kind,
            description: new_expense.description,
            amount: new_expense.amount,
            date: new_expense.date,
            reimbursable: new_expense.reimbursable,
            status: new_expense.status,
        };
        ledger.expenses.push(expense.clone());
        touch(ledger);
        Ok(expense)
    }

    pub fn add_payment(&self, case_id: &str, new_payment: NewPayment) -> StoreResult<Payment> {
        ensure_non_negative("Payment amount", new_payment.amount)?;
        let mut ledgers = self.guard();
        let ledger = find_mut(&mut ledgers, case_id)?;

        let payment = Payment {
            id: new_entry_id(),
            kind: new_payment.kind,
            description: new_payment.description,
            amount: new_payment.amount,
            paid_date: new_payment.paid_date,
            method: new_payment.method,
            notes: new_payment.notes,
        };
        ledger.payments.push(payment.clone());
        touch(ledger);
        Ok(payment)
    }

    /// Removes the fee with `entry_id` from whichever ledger holds it.
    /// Returns the case id of that ledger, `None` when no ledger does.
    pub fn remove_fee(&self, entry_id: &str) -> Option<String> {
        self.remove_entry(|ledger| {
            let index = ledger.fees.iter().position(|f| f.id == entry_id)?;
            ledger.fees.remove(index);
            Some(())
        })
    }

    pub fn remove_expense(&self, entry_id: &str) -> Option<String> {
        self.remove_entry(|ledger| {
            let index = ledger.expenses.iter().position(|e| e.id == entry_id)?;
            ledger.expenses.remove(index);
            Some(())
        })
    }

    pub fn remove_payment(&self, entry_id: &str) -> Option<String> {
        self.remove_entry(|ledger| {
            let index = ledger.payments.iter().position(|p| p.id == entry_id)?;
            ledger.payments.remove(index);
            Some(())
        })
    }

    fn remove_entry<F>(&self, mut remove: F) -> Option<String>
    where
        F: FnMut(&mut Ledger) -> Option<()>,
    {
        let mut ledgers = self.guard();
        for ledger in ledgers.iter_mut() {
            if remove(ledger).is_some() {
                touch(ledger);
                return Some(ledger.case_id.clone());
            }
        }
        None
    }

    pub fn update_fee_status(
        &self,
        case_id: &str,
        entry_id: &str,
        status: FeeStatus,
    ) -> StoreResult<Fee> {
        let mut ledgers = self.guard();
        let ledger = find_mut(&mut ledgers, case_id)?;
        let fee = ledger
            .fees
            .iter_mut()
            .find(|f| f.id == entry_id)
            .ok_or_else(|| LedgerError::EntryNotFound {
                case_id: case_id.to_string(),
                entry_id: entry_id.to_string(),
            })?;
        fee.status = status;
        let fee = fee.clone();
        touch(ledger);
        Ok(fee)
    }

    pub fn update_expense_status(
        &self,
        case_id: &str,
        entry_id: &str,
        status: ExpenseStatus,
    ) -> StoreResult<Expense> {
        let mut ledgers = self.guard();
        let ledger = find_mut(&mut ledgers, case_id)?;
        let expense = ledger
            .expenses
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| LedgerError::EntryNotFound {
                case_id: case_id.to_string(),
                entry_id: entry_id.to_string(),
            })?;
        expense.status = status;
        let expense = expense.clone();
        touch(ledger);
        Ok(expense)
    }

    /// Appends a payment of the full receivable balance to every listed
    /// ledger that still has one. Unknown ids are skipped.
    pub fn bulk_settle(&self, case_ids: &[String], paid_date: NaiveDate) -> Vec<BulkPayment> {
        self.bulk_pay(
            case_ids,
            |ledger| Some((ledger.receivable_balance, "Full settlement")),
            paid_date,
        )
    }

    /// Appends a payment of `amount` to every listed ledger that still has a
    /// receivable balance. Unknown ids are skipped.
    pub fn bulk_partial_payment(
        &self,
        case_ids: &[String],
        amount: Decimal,
        paid_date: NaiveDate,
    ) -> StoreResult<Vec<BulkPayment>> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(
                "Partial payment amount must be positive".to_string(),
            ));
        }
        Ok(self.bulk_pay(case_ids, |_| Some((amount, "Partial payment")), paid_date))
    }

    fn bulk_pay<F>(
        &self,
        case_ids: &[String],
        amount_for: F,
        paid_date: NaiveDate,
    ) -> Vec<BulkPayment>
    where
        F: Fn(&Ledger) -> Option<(Decimal, &'static str)>,
    {
        let mut ledgers = self.guard();
        let mut created = Vec::new();

        for case_id in dedup_ids(case_ids) {
            let Some(ledger) = ledgers.iter_mut().find(|l| l.case_id == case_id) else {
                debug!("Bulk payment skipped unknown case {}", case_id);
                continue;
            };
            if ledger.receivable_balance <= Decimal::ZERO {
                continue;
            }
            let Some((amount, description)) = amount_for(ledger) else {
                continue;
            };

            let payment = Payment {
                id: new_entry_id(),
                kind: PaymentKind::FeePayment,
                description: description.to_string(),
                amount,
                paid_date,
                method: PaymentMethod::WireTransfer,
                notes: None,
            };
            ledger.payments.push(payment.clone());
            touch(ledger);
            created.push(BulkPayment {
                case_id: case_id.to_string(),
                payment,
            });
        }

        created
    }

    /// Copy of every ledger, for persistence.
    pub fn snapshot(&self) -> Vec<Ledger> {
        self.list_ledgers()
    }

    /// Replaces every ledger and recomputes the derived fields.
    pub fn restore(&self, mut ledgers: Vec<Ledger>) {
        for ledger in ledgers.iter_mut() {
            recompute(ledger);
        }
        *self.guard() = ledgers;
    }
}
