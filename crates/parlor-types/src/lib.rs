//! Shared domain types for Parlor.
//!
//! This crate contains the entity records that make up the chat data model:
//! User, Conversation, Group, Message, Profile, Activity, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod activity;
pub mod config;
pub mod conversation;
pub mod error;
pub mod group;
pub mod message;
pub mod profile;
pub mod user;
