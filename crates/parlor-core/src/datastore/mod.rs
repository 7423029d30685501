//! Datastore port: the record format and the trait the storage backend
//! implements.
//!
//! The backing store is deliberately schema-less: every entity becomes a
//! kind-tagged [`Record`] keyed by its id, with one text property per
//! attribute. The [`Datastore`] trait is the swappable boundary -- the
//! SQLite adapter in `parlor-infra` implements it for real deployments,
//! and [`MemoryDatastore`] stands in for tests and ephemeral runs.

pub mod memory;

pub use memory::MemoryDatastore;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use parlor_types::error::{DatastoreError, RecordError};

/// Property name every record uses for its creation timestamp.
///
/// The datastore sorts type-scoped queries by this property, so encoders
/// must always set it (RFC 3339 text sorts chronologically).
pub const CREATED_AT: &str = "created_at";

/// The record kinds the datastore holds, one per entity type.
///
/// Tags are stable wire values: they name the record "table" in the
/// backing store and must never change once data exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordKind {
    User,
    Conversation,
    Group,
    Message,
    Profile,
    Activity,
}

impl RecordKind {
    /// All kinds, in hydration order.
    pub const ALL: [RecordKind; 6] = [
        RecordKind::User,
        RecordKind::Profile,
        RecordKind::Conversation,
        RecordKind::Group,
        RecordKind::Message,
        RecordKind::Activity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::User => "chat-users",
            RecordKind::Conversation => "chat-conversations",
            RecordKind::Group => "chat-groups",
            RecordKind::Message => "chat-messages",
            RecordKind::Profile => "chat-profiles",
            RecordKind::Activity => "chat-activities",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat-users" => Ok(RecordKind::User),
            "chat-conversations" => Ok(RecordKind::Conversation),
            "chat-groups" => Ok(RecordKind::Group),
            "chat-messages" => Ok(RecordKind::Message),
            "chat-profiles" => Ok(RecordKind::Profile),
            "chat-activities" => Ok(RecordKind::Activity),
            other => Err(format!("unknown record kind: '{other}'")),
        }
    }
}

/// Sort direction for type-scoped queries, applied to [`CREATED_AT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A schema-less record: a kind tag, a key, and text properties.
///
/// Encoding contract (deterministic in both directions):
/// - ids are UUID strings,
/// - timestamps are RFC 3339 text,
/// - enums are stable lowercase tags,
/// - id sets are JSON arrays of UUID strings in sorted order,
/// - counters are decimal integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub kind: RecordKind,
    /// Entity id as text; unique within the kind.
    pub key: String,
    pub props: BTreeMap<String, String>,
}

impl Record {
    pub fn new(kind: RecordKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
            props: BTreeMap::new(),
        }
    }

    /// Set a property, builder style.
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.props.insert(name.to_string(), value.into());
        self
    }

    /// Set an id-set property as a sorted JSON array of UUID strings.
    pub fn with_uuid_set(self, name: &str, ids: &BTreeSet<Uuid>) -> Self {
        let strings: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        // BTreeSet iteration is already sorted; serialization is deterministic.
        let json = serde_json::to_string(&strings).unwrap_or_else(|_| "[]".to_string());
        self.with(name, json)
    }

    /// Raw text property.
    pub fn text(&self, name: &str) -> Result<&str, RecordError> {
        self.props
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| RecordError::MissingProperty(name.to_string()))
    }

    pub fn uuid(&self, name: &str) -> Result<Uuid, RecordError> {
        Uuid::parse_str(self.text(name)?).map_err(|e| RecordError::invalid(name, e))
    }

    pub fn timestamp(&self, name: &str) -> Result<DateTime<Utc>, RecordError> {
        DateTime::parse_from_rfc3339(self.text(name)?)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| RecordError::invalid(name, e))
    }

    pub fn int(&self, name: &str) -> Result<i64, RecordError> {
        self.text(name)?
            .parse()
            .map_err(|e| RecordError::invalid(name, e))
    }

    pub fn flag(&self, name: &str) -> Result<bool, RecordError> {
        match self.text(name)? {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(RecordError::invalid(name, format!("not a flag: '{other}'"))),
        }
    }

    /// Decode an enum property via its `FromStr` tag parser.
    pub fn tag<T>(&self, name: &str) -> Result<T, RecordError>
    where
        T: FromStr<Err = String>,
    {
        self.text(name)?.parse().map_err(|e| RecordError::invalid(name, e))
    }

    /// Decode an id-set property (JSON array of UUID strings).
    pub fn uuid_set(&self, name: &str) -> Result<BTreeSet<Uuid>, RecordError> {
        let strings: Vec<String> =
            serde_json::from_str(self.text(name)?).map_err(|e| RecordError::invalid(name, e))?;
        strings
            .iter()
            .map(|s| Uuid::parse_str(s).map_err(|e| RecordError::invalid(name, e)))
            .collect()
    }
}

/// The boundary to the backing datastore.
///
/// Implementations live in `parlor-infra` (SQLite) and in
/// [`memory::MemoryDatastore`]. Both operations block the caller until
/// the backend acknowledges; there is no cancellation or retry here.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait Datastore: Send + Sync {
    /// Fetch every record of `kind`, optionally sorted by creation time.
    fn query(
        &self,
        kind: RecordKind,
        sort: Option<SortDirection>,
    ) -> impl std::future::Future<Output = Result<Vec<Record>, DatastoreError>> + Send;

    /// Durably store one record, replacing any prior record with the
    /// same kind and key.
    fn put(
        &self,
        record: &Record,
    ) -> impl std::future::Future<Output = Result<(), DatastoreError>> + Send;
}

/// Shared handles to a datastore are themselves datastores. Lets tests
/// and callers keep a handle to a backend after handing it to the
/// persistence agent.
impl<D: Datastore> Datastore for std::sync::Arc<D> {
    async fn query(
        &self,
        kind: RecordKind,
        sort: Option<SortDirection>,
    ) -> Result<Vec<Record>, DatastoreError> {
        (**self).query(kind, sort).await
    }

    async fn put(&self, record: &Record) -> Result<(), DatastoreError> {
        (**self).put(record).await
    }
}
