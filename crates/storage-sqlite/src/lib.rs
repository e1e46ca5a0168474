//! SQLite storage implementation for JurisDesk.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the [`BlobStore`](jurisdesk_core::storage::BlobStore) trait defined in
//! `jurisdesk-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The blob table holding one JSON document per collection
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The core crate is database-agnostic and works with traits.
//!
//! ```text
//!          core (domain)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod blobs;
pub mod db;
pub mod errors;
pub mod schema;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, run_migrations, DbConnection, DbPool, WriteHandle};

pub use blobs::SqliteBlobStore;

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from jurisdesk-core for convenience
pub use jurisdesk_core::errors::{DatabaseError, Error, Result};
