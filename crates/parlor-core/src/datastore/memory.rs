//! In-process datastore backend.
//!
//! Holds records in a map guarded by a `RwLock`. Used as the injectable
//! stand-in for the SQLite backend in tests, and for ephemeral runs where
//! durability does not matter. Put failure can be injected so callers can
//! exercise write-through error paths.

use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use parlor_types::error::DatastoreError;

use super::{CREATED_AT, Datastore, Record, RecordKind, SortDirection};

/// Map-backed [`Datastore`] implementation.
#[derive(Default)]
pub struct MemoryDatastore {
    records: RwLock<BTreeMap<(RecordKind, String), Record>>,
    fail_puts: AtomicBool,
}

impl MemoryDatastore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every `put` fails with a backend error until cleared.
    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    /// Fetch one record by kind and key. Test helper.
    pub fn get(&self, kind: RecordKind, key: &str) -> Option<Record> {
        self.records
            .read()
            .expect("datastore lock poisoned")
            .get(&(kind, key.to_string()))
            .cloned()
    }

    /// Number of records of `kind`. Test helper.
    pub fn count(&self, kind: RecordKind) -> usize {
        self.records
            .read()
            .expect("datastore lock poisoned")
            .keys()
            .filter(|(k, _)| *k == kind)
            .count()
    }
}

impl Datastore for MemoryDatastore {
    async fn query(
        &self,
        kind: RecordKind,
        sort: Option<SortDirection>,
    ) -> Result<Vec<Record>, DatastoreError> {
        let mut out: Vec<Record> = self
            .records
            .read()
            .expect("datastore lock poisoned")
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|(_, record)| record.clone())
            .collect();

        if let Some(direction) = sort {
            // RFC 3339 text sorts chronologically; records missing the
            // property sort first rather than failing the query.
            out.sort_by(|a, b| {
                let ka = a.props.get(CREATED_AT);
                let kb = b.props.get(CREATED_AT);
                match direction {
                    SortDirection::Ascending => ka.cmp(&kb),
                    SortDirection::Descending => kb.cmp(&ka),
                }
            });
        }

        Ok(out)
    }

    async fn put(&self, record: &Record) -> Result<(), DatastoreError> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(DatastoreError::Backend("injected put failure".to_string()));
        }

        self.records
            .write()
            .expect("datastore lock poisoned")
            .insert((record.kind, record.key.clone()), record.clone());
        Ok(())
    }
}
