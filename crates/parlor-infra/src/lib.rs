//! Infrastructure layer for Parlor.
//!
//! Contains the adapter implementations behind the ports defined in
//! `parlor-core`: the SQLite-backed datastore, configuration loading,
//! and argon2 password hashing.

pub mod config;
pub mod crypto;
pub mod sqlite;
