//! JurisDesk Core - Domain entities, services, and traits.
//!
//! This crate contains the case-management logic of JurisDesk: cases,
//! their ledgers, and the monitoring of case numbers. It is
//! database-agnostic; collections are persisted through the
//! [`storage::BlobStore`] trait, implemented by the `storage-sqlite` crate.

pub mod cases;
pub mod constants;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod monitoring;
pub mod storage;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
