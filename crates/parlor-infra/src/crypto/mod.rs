//! Cryptographic operations: argon2 password hashing.

pub mod password;
