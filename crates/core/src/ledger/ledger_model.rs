//! Ledger domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeKind {
    Contractual,
    Successor,
    Arbitrated,
    Fixed,
    /// Amount derived from the claim value when the fee is created
    Percentage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeStatus {
    #[default]
    Pending,
    Paid,
    Partial,
    Overdue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseKind {
    CourtCosts,
    ExpertFees,
    Documents,
    Mail,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    #[default]
    Pending,
    Paid,
    Reimbursed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    FeePayment,
    ExpensePayment,
    Advance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    WireTransfer,
    Check,
    Card,
    InstantTransfer,
}

/// Derived from the balances, never set directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialStatus {
    Open,
    PartiallyPaid,
    #[default]
    Settled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fee {
    pub id: String,
    pub kind: FeeKind,
    pub description: String,
    pub amount: Decimal,
    pub percentage: Option<Decimal>,
    pub contracted_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub status: FeeStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub kind: ExpenseKind,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub reimbursable: bool,
    pub status: ExpenseStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub kind: PaymentKind,
    pub description: String,
    pub amount: Decimal,
    pub paid_date: NaiveDate,
    pub method: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Fees, expenses and payments of one case.
///
/// `receivable_balance`, `payable_balance` and `financial_status` are
/// recomputed from the three collections after every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    pub id: String,
    pub case_id: String,
    pub claim_value: Decimal,
    pub fees: Vec<Fee>,
    pub expenses: Vec<Expense>,
    pub payments: Vec<Payment>,
    pub receivable_balance: Decimal,
    pub payable_balance: Decimal,
    pub financial_status: FinancialStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ledger {
    pub fn new(case_id: impl Into<String>, claim_value: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            case_id: case_id.into(),
            claim_value,
            fees: Vec::new(),
            expenses: Vec::new(),
            payments: Vec::new(),
            receivable_balance: Decimal::ZERO,
            payable_balance: Decimal::ZERO,
            financial_status: FinancialStatus::Settled,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn total_fees(&self) -> Decimal {
        self.fees.iter().map(|f| f.amount).sum()
    }

    pub fn total_expenses(&self) -> Decimal {
        self.expenses.iter().map(|e| e.amount).sum()
    }

    pub fn total_payments(&self) -> Decimal {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// Contracted date of the first fee, used to place the ledger in a
    /// reporting period.
    pub fn reference_date(&self) -> Option<NaiveDate> {
        self.fees.first().map(|f| f.contracted_date)
    }
}

/// Input model for a fee.
///
/// Percentage fees carry `percentage` and get their amount from the claim
/// value; every other kind carries `amount`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFee {
    pub kind: FeeKind,
    pub description: String,
    pub amount: Option<Decimal>,
    pub percentage: Option<Decimal>,
    pub contracted_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: FeeStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub kind: ExpenseKind,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub reimbursable: bool,
    #[serde(default)]
    pub status: ExpenseStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub kind: PaymentKind,
    pub description: String,
    pub amount: Decimal,
    pub paid_date: NaiveDate,
    pub method: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Payment appended by a bulk operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkPayment {
    pub case_id: String,
    pub payment: Payment,
}
