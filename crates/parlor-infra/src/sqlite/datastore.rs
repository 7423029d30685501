//! SQLite datastore implementation.
//!
//! Implements `Datastore` from `parlor-core` over a single schema-less
//! `records` table: one row per entity, properties stored as a JSON object
//! of text values. Sorted queries order by the `created_at` property via
//! `json_extract`; RFC 3339 text sorts chronologically.

use std::collections::BTreeMap;

use sqlx::Row;

use parlor_core::datastore::{Datastore, Record, RecordKind, SortDirection};
use parlor_types::error::DatastoreError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `Datastore`.
pub struct SqliteDatastore {
    pool: DatabasePool,
}

impl SqliteDatastore {
    /// Create a new datastore backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn backend(e: impl std::fmt::Display) -> DatastoreError {
    DatastoreError::Backend(e.to_string())
}

impl Datastore for SqliteDatastore {
    async fn query(
        &self,
        kind: RecordKind,
        sort: Option<SortDirection>,
    ) -> Result<Vec<Record>, DatastoreError> {
        let sql = match sort {
            None => "SELECT key, props FROM records WHERE kind = ?",
            Some(SortDirection::Ascending) => {
                "SELECT key, props FROM records WHERE kind = ? \
                 ORDER BY json_extract(props, '$.created_at') ASC"
            }
            Some(SortDirection::Descending) => {
                "SELECT key, props FROM records WHERE kind = ? \
                 ORDER BY json_extract(props, '$.created_at') DESC"
            }
        };

        let rows = sqlx::query(sql)
            .bind(kind.as_str())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(backend)?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let key: String = row.try_get("key").map_err(backend)?;
            let props_json: String = row.try_get("props").map_err(backend)?;
            let props: BTreeMap<String, String> = serde_json::from_str(&props_json)
                .map_err(|e| backend(format!("corrupt props for {kind}/{key}: {e}")))?;
            records.push(Record { kind, key, props });
        }

        Ok(records)
    }

    async fn put(&self, record: &Record) -> Result<(), DatastoreError> {
        let props_json = serde_json::to_string(&record.props).map_err(backend)?;

        sqlx::query(
            r#"INSERT INTO records (kind, key, props)
               VALUES (?, ?, ?)
               ON CONFLICT (kind, key) DO UPDATE SET props = excluded.props"#,
        )
        .bind(record.kind.as_str())
        .bind(&record.key)
        .bind(&props_json)
        .execute(&self.pool.writer)
        .await
        .map_err(backend)?;

        Ok(())
    }
}
