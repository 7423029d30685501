//! Persistence agent: the sole translator between typed entities and the
//! datastore's record format.
//!
//! [`PersistentDataStore`] wraps a [`Datastore`] backend and exposes two
//! operations: a bulk load per entity type (used once at startup to
//! hydrate the in-memory stores) and a per-entity write-through (used on
//! every create/update). Entity codecs live in [`codec`] as
//! [`Persistable`] implementations.

pub mod codec;

use parlor_types::error::PersistError;

use crate::datastore::{Datastore, Record, RecordKind, SortDirection};

/// An entity type that can be stored as a kind-tagged record.
///
/// Implementations declare their record kind, the sort direction applied
/// when bulk-loading, and the deterministic encode/decode pair.
pub trait Persistable: Sized + Clone + Send + Sync {
    const KIND: RecordKind;

    /// Sort direction for bulk load: ascending creation time for every
    /// entity type except activities, which load newest first.
    const SORT: SortDirection;

    /// Encode into a record keyed by the entity id.
    fn to_record(&self) -> Record;

    /// Decode from a record; any missing or malformed property is a
    /// field-level error.
    fn from_record(record: &Record) -> Result<Self, parlor_types::error::RecordError>;
}

/// The persistence agent.
///
/// All calls block until the backend acknowledges. A decode failure for
/// any single record aborts the entire load -- the process must not serve
/// from a partially hydrated store.
pub struct PersistentDataStore<D: Datastore> {
    datastore: D,
}

impl<D: Datastore> PersistentDataStore<D> {
    pub fn new(datastore: D) -> Self {
        Self { datastore }
    }

    /// Load every entity of type `T`, sorted per `T::SORT`.
    pub async fn load_all<T: Persistable>(&self) -> Result<Vec<T>, PersistError> {
        let records = self.datastore.query(T::KIND, Some(T::SORT)).await?;

        let mut entities = Vec::with_capacity(records.len());
        for record in &records {
            let entity = T::from_record(record).map_err(|source| PersistError::Decode {
                kind: T::KIND.to_string(),
                key: record.key.clone(),
                source,
            })?;
            entities.push(entity);
        }

        tracing::debug!(kind = %T::KIND, count = entities.len(), "loaded entities");
        Ok(entities)
    }

    /// Mirror one entity to durable storage, replacing any prior record
    /// with the same key.
    pub async fn write_through<T: Persistable>(&self, entity: &T) -> Result<(), PersistError> {
        let record = entity.to_record();
        tracing::trace!(kind = %T::KIND, key = %record.key, "write-through");
        self.datastore.put(&record).await?;
        Ok(())
    }
}
