//! Whole-collection persistence.
//!
//! Every collection (cases, ledgers, monitoring, ...) is stored as one JSON
//! blob under a fixed key; see [`crate::constants`]. There is no partial or
//! query access.

mod blob_traits;
mod memory;

pub use blob_traits::{load_collection, save_collection, BlobStore};
pub use memory::MemoryBlobStore;
