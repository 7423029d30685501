//! Conversation entity: a chat room with members, a visibility scope,
//! a validity window, and a vote tally.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// What a conversation accepts: text messages, images, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationKind {
    Text,
    Image,
    Hybrid,
}

impl fmt::Display for ConversationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationKind::Text => write!(f, "text"),
            ConversationKind::Image => write!(f, "image"),
            ConversationKind::Hybrid => write!(f, "hybrid"),
        }
    }
}

impl FromStr for ConversationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ConversationKind::Text),
            "image" => Ok(ConversationKind::Image),
            "hybrid" => Ok(ConversationKind::Hybrid),
            other => Err(format!("invalid conversation kind: '{other}'")),
        }
    }
}

impl Default for ConversationKind {
    fn default() -> Self {
        ConversationKind::Text
    }
}

/// Who can see a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Group,
    Direct,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Group => write!(f, "group"),
            Visibility::Direct => write!(f, "direct"),
        }
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "group" => Ok(Visibility::Group),
            "direct" => Ok(Visibility::Direct),
            other => Err(format!("invalid visibility: '{other}'")),
        }
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Visibility::Public
    }
}

/// A conversation (chat room) created by a user.
///
/// Conversations are never deleted. Each one carries a validity window:
/// past `expires_at` the conversation reads as inactive, but its record
/// and messages remain.
///
/// Titles are unique among conversations; uniqueness is the caller's
/// responsibility via `ConversationStore::is_title_taken` before insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    /// Ids of users who are members. Sorted set so encoding is deterministic.
    pub members: BTreeSet<Uuid>,
    pub kind: ConversationKind,
    pub visibility: Visibility,
    /// Instant the validity window elapses; computed at creation.
    pub expires_at: DateTime<Utc>,
    /// Net vote tally. Changes only through `upvote`/`downvote`.
    pub total_points: i64,
    /// Ids of users whose vote is currently counted.
    pub voters: BTreeSet<Uuid>,
}

impl Conversation {
    /// Create a new conversation owned by `owner_id`, valid for
    /// `valid_for` from now. The owner starts as the only member.
    pub fn new(
        owner_id: Uuid,
        title: impl Into<String>,
        description: impl Into<String>,
        kind: ConversationKind,
        visibility: Visibility,
        valid_for: Duration,
    ) -> Self {
        let created_at = Utc::now();
        let mut members = BTreeSet::new();
        members.insert(owner_id);
        Self {
            id: Uuid::now_v7(),
            owner_id,
            title: title.into(),
            description: description.into(),
            created_at,
            members,
            kind,
            visibility,
            expires_at: created_at + valid_for,
            total_points: 0,
            voters: BTreeSet::new(),
        }
    }

    /// Whether the conversation's validity window is still open at `now`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Time left before the conversation goes inactive. Negative once expired.
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Duration {
        self.expires_at - now
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

    /// Count a vote from `voter_id`. Each voter counts at most once;
    /// returns false if the vote was already counted.
    pub fn upvote(&mut self, voter_id: Uuid) -> bool {
        if self.voters.insert(voter_id) {
            self.total_points += 1;
            true
        } else {
            false
        }
    }

    /// Retract a previously counted vote from `voter_id`.
    /// Returns false if no vote from that voter was counted.
    pub fn downvote(&mut self, voter_id: &Uuid) -> bool {
        if self.voters.remove(voter_id) {
            self.total_points -= 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Conversation {
        Conversation::new(
            Uuid::now_v7(),
            "general",
            "the default room",
            ConversationKind::Text,
            Visibility::Public,
            Duration::hours(24),
        )
    }

    #[test]
    fn test_owner_is_initial_member() {
        let conv = sample();
        assert!(conv.is_member(&conv.owner_id));
        assert_eq!(conv.members.len(), 1);
    }

    #[test]
    fn test_active_within_window() {
        let conv = sample();
        assert!(conv.is_active(conv.created_at + Duration::hours(1)));
        assert!(!conv.is_active(conv.created_at + Duration::hours(25)));
    }

    #[test]
    fn test_expiry_boundary_is_inactive() {
        let conv = sample();
        assert!(!conv.is_active(conv.expires_at));
    }

    #[test]
    fn test_one_vote_per_voter() {
        let mut conv = sample();
        let voter = Uuid::now_v7();
        assert!(conv.upvote(voter));
        assert!(!conv.upvote(voter));
        assert_eq!(conv.total_points, 1);
    }

    #[test]
    fn test_downvote_retracts() {
        let mut conv = sample();
        let voter = Uuid::now_v7();
        conv.upvote(voter);
        assert!(conv.downvote(&voter));
        assert_eq!(conv.total_points, 0);
        // Nothing left to retract
        assert!(!conv.downvote(&voter));
        assert_eq!(conv.total_points, 0);
    }

    #[test]
    fn test_kind_roundtrip() {
        for kind in [
            ConversationKind::Text,
            ConversationKind::Image,
            ConversationKind::Hybrid,
        ] {
            let s = kind.to_string();
            let parsed: ConversationKind = s.parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn test_visibility_roundtrip() {
        for vis in [Visibility::Public, Visibility::Group, Visibility::Direct] {
            let s = vis.to_string();
            let parsed: Visibility = s.parse().unwrap();
            assert_eq!(vis, parsed);
        }
    }

    #[test]
    fn test_invalid_tags_rejected() {
        assert!("secret".parse::<Visibility>().is_err());
        assert!("video".parse::<ConversationKind>().is_err());
    }
}
