use thiserror::Error;

/// Ledger store contract violations. Surfaced to the caller, never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("No ledger for case {0}")]
    LedgerNotFound(String),

    #[error("Ledger for case {0} already exists")]
    AlreadyExists(String),

    #[error("Entry {entry_id} not found in the ledger of case {case_id}")]
    EntryNotFound { case_id: String, entry_id: String },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}
