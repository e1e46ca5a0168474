use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::BlobStore;
use crate::errors::{Error, Result};

/// In-process blob store, for tests and ephemeral deployments.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        self.blobs
            .read()
            .map(|blobs| blobs.keys().cloned().collect())
            .unwrap_or_default()
    }
}

fn poisoned() -> Error {
    Error::Unexpected("Blob store lock poisoned".to_string())
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let blobs = self.blobs.read().map_err(|_| poisoned())?;
        Ok(blobs.get(key).cloned())
    }

    async fn save(&self, key: &str, json: String) -> Result<()> {
        let mut blobs = self.blobs.write().map_err(|_| poisoned())?;
        blobs.insert(key.to_string(), json);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let mut blobs = self.blobs.write().map_err(|_| poisoned())?;
        Ok(blobs.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{load_collection, save_collection};

    #[tokio::test]
    async fn test_missing_key_is_empty_collection() {
        let store = MemoryBlobStore::new();
        let items: Vec<String> = load_collection(&store, "cases").unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_collection_round_trip() {
        let store = MemoryBlobStore::new();
        save_collection(&store, "ledgers", &["a".to_string(), "b".to_string()])
            .await
            .unwrap();

        let items: Vec<String> = load_collection(&store, "ledgers").unwrap();
        assert_eq!(items, vec!["a", "b"]);
        assert_eq!(store.keys(), vec!["ledgers".to_string()]);

        assert!(store.remove("ledgers").await.unwrap());
        assert!(!store.remove("ledgers").await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_blob_is_an_error() {
        let store = MemoryBlobStore::new();
        store.save("cases", "{not json".to_string()).await.unwrap();
        let result: Result<Vec<String>> = load_collection(&store, "cases");
        assert!(matches!(result, Err(Error::Serialization(_))));
    }
}
