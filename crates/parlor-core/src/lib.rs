//! Store layer and persistence agent for Parlor.
//!
//! This crate defines the datastore "port" (the [`datastore::Datastore`]
//! trait and its schema-less record format) that the infrastructure layer
//! implements, the persistence agent that translates typed entities to and
//! from records, and the per-entity in-memory stores hydrated at startup.
//! It depends only on `parlor-types` -- never on `parlor-infra` or any
//! database/IO crate.

pub mod datastore;
pub mod persist;
pub mod store;
