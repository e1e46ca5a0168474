//! Ledger module - fees, expenses and payments of each case.
//!
//! The balances and the financial status of a ledger are always derived
//! from its entries; see [`calculator`].

pub mod calculator;
mod ledger_errors;
mod ledger_model;
mod ledger_service;
mod ledger_store;
mod ledger_traits;
pub mod report;


pub use calculator::{
    compute_balances, derive_status, percentage_fee_amount, recompute, LedgerBalances,
};
pub use ledger_errors::LedgerError;
pub use ledger_model::{
    BulkPayment, Expense, ExpenseKind, ExpenseStatus, Fee, FeeKind, FeeStatus, FinancialStatus,
    Ledger, NewExpense, NewFee, NewPayment, Payment, PaymentKind, PaymentMethod,
};
pub use ledger_service::LedgerService;
pub use ledger_store::LedgerStore;
pub use ledger_traits::LedgerServiceTrait;
pub use report::{build_report, overdue_ledgers, FinancialReport, ReportRow};
