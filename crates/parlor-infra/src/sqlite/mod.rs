//! SQLite storage layer.
//!
//! A schema-less datastore backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod datastore;
pub mod pool;

pub use datastore::SqliteDatastore;
pub use pool::DatabasePool;
