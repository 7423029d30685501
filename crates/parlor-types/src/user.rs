use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user of the chat application.
///
/// The id is assigned once at registration and never changes. Usernames
/// are unique application-wide; uniqueness is enforced by the caller
/// probing `UserStore::is_registered` before insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Id of this user's one-to-one [`Profile`](crate::profile::Profile).
    pub profile_id: Uuid,
    pub username: String,
    /// Argon2 hash of the password, never the plaintext.
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new non-admin user with a fresh UUID v7 id.
    ///
    /// `profile_id` references the profile record created alongside the
    /// user at registration time.
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>, profile_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            profile_id,
            username: username.into(),
            password_hash: password_hash.into(),
            is_admin: false,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_not_admin() {
        let user = User::new("alice", "$argon2id$...", Uuid::now_v7());
        assert!(!user.is_admin);
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn test_new_user_ids_are_distinct() {
        let profile_id = Uuid::now_v7();
        let user = User::new("alice", "hash", profile_id);
        assert_ne!(user.id, user.profile_id);
        assert_eq!(user.profile_id, profile_id);
    }
}
