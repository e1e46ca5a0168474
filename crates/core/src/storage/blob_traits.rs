use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::Result;

/// Key-value store holding one JSON document per key.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Returns the blob stored under `key`, if any.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the blob stored under `key`.
    async fn save(&self, key: &str, json: String) -> Result<()>;

    /// Removes the blob under `key`. Returns whether one was present.
    async fn remove(&self, key: &str) -> Result<bool>;
}

/// Reads a whole collection. A missing key is an empty collection.
pub fn load_collection<T: DeserializeOwned>(store: &dyn BlobStore, key: &str) -> Result<Vec<T>> {
    match store.load(key)? {
        Some(json) if !json.trim().is_empty() => Ok(serde_json::from_str(&json)?),
        _ => Ok(Vec::new()),
    }
}

/// Writes a whole collection, replacing the previous blob.
pub async fn save_collection<T: Serialize + Sync>(
    store: &dyn BlobStore,
    key: &str,
    items: &[T],
) -> Result<()> {
    let json = serde_json::to_string(items)?;
    store.save(key, json).await
}
