use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's profile: free-text bio shown on their profile page.
///
/// One profile per user; the user record carries the profile id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub bio: String,
}

impl Profile {
    /// Create a new profile with an empty bio.
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            created_at: Utc::now(),
            bio: String::new(),
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile_has_empty_bio() {
        let profile = Profile::new();
        assert!(profile.bio.is_empty());
    }
}
