//! Activity feed entries: an append-only record of notable actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// What kind of entity an activity entry is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    User,
    Conversation,
    Group,
    Message,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityKind::User => write!(f, "user"),
            ActivityKind::Conversation => write!(f, "conversation"),
            ActivityKind::Group => write!(f, "group"),
            ActivityKind::Message => write!(f, "message"),
        }
    }
}

impl FromStr for ActivityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(ActivityKind::User),
            "conversation" => Ok(ActivityKind::Conversation),
            "group" => Ok(ActivityKind::Group),
            "message" => Ok(ActivityKind::Message),
            other => Err(format!("invalid activity kind: '{other}'")),
        }
    }
}

/// One entry in the activity feed.
///
/// Entries are append-only: created when a notable action happens
/// (user registered, conversation created, message posted) and never
/// mutated or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub kind: ActivityKind,
    /// Id of the user who performed the action.
    pub owner_id: Uuid,
    /// Id of the entity the action produced.
    pub subject_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Activity {
    /// Record that `owner_id` produced the entity `subject_id`.
    pub fn new(kind: ActivityKind, owner_id: Uuid, subject_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind,
            owner_id,
            subject_id,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for kind in [
            ActivityKind::User,
            ActivityKind::Conversation,
            ActivityKind::Group,
            ActivityKind::Message,
        ] {
            let s = kind.to_string();
            let parsed: ActivityKind = s.parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn test_invalid_kind_rejected() {
        assert!("vote".parse::<ActivityKind>().is_err());
    }
}
