//! Database model for stored blobs.

use chrono::NaiveDateTime;
use diesel::prelude::*;

#[derive(Queryable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::blobs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BlobDB {
    pub blob_key: String,
    pub blob_value: String,
    pub updated_at: NaiveDateTime,
}
