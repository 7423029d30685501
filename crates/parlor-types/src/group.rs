use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::collections::BTreeSet;

/// A private group conversation.
///
/// Same shape as a public conversation but lives in a disjoint namespace:
/// a group title may collide with a conversation title, never with
/// another group's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    /// Ids of users who are members. Sorted set so encoding is deterministic.
    pub members: BTreeSet<Uuid>,
}

impl Group {
    /// Create a new group owned by `owner_id`, with the owner as the
    /// only initial member.
    pub fn new(owner_id: Uuid, title: impl Into<String>) -> Self {
        let mut members = BTreeSet::new();
        members.insert(owner_id);
        Self {
            id: Uuid::now_v7(),
            owner_id,
            title: title.into(),
            created_at: Utc::now(),
            members,
        }
    }

    pub fn is_member(&self, user_id: &Uuid) -> bool {
        self.members.contains(user_id)
    }

    pub fn add_member(&mut self, user_id: Uuid) {
        self.members.insert(user_id);
    }

    pub fn remove_member(&mut self, user_id: &Uuid) {
        self.members.remove(user_id);
    }
}
