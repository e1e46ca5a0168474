use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use log::debug;
use std::sync::Arc;

use super::model::BlobDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::blobs::dsl::*;
use jurisdesk_core::errors::Result;
use jurisdesk_core::storage::BlobStore;

/// [`BlobStore`] over the `blobs` table.
///
/// Reads use a pooled connection; writes go through the writer actor.
pub struct SqliteBlobStore {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SqliteBlobStore {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SqliteBlobStore { pool, writer }
    }

    /// Keys currently stored, sorted.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        let stored = blobs
            .select(blob_key)
            .order(blob_key.asc())
            .load::<String>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(stored)
    }
}

#[async_trait]
impl BlobStore for SqliteBlobStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;
        let value = blobs
            .filter(blob_key.eq(key))
            .select(blob_value)
            .first::<String>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(value)
    }

    async fn save(&self, key: &str, json: String) -> Result<()> {
        let row = BlobDB {
            blob_key: key.to_string(),
            blob_value: json,
            updated_at: Utc::now().naive_utc(),
        };
        debug!("Saving blob '{}' ({} bytes)", row.blob_key, row.blob_value.len());
        self.writer
            .exec(move |conn| {
                diesel::replace_into(blobs)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let key = key.to_string();
        self.writer
            .exec(move |conn| {
                let deleted = diesel::delete(blobs.filter(blob_key.eq(&key)))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(deleted > 0)
            })
            .await
    }
}
