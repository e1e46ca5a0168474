//! Blob storage: one JSON document per collection key.

mod model;
mod repository;

pub use model::BlobDB;
pub use repository::SqliteBlobStore;
