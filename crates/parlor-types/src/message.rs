use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single message posted to a conversation.
///
/// Messages are immutable after creation: no field changes once the
/// record exists, and the store exposes no update path for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new message in `conversation_id` authored by `author_id`.
    pub fn new(conversation_id: Uuid, author_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            conversation_id,
            author_id,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_fields() {
        let conv = Uuid::now_v7();
        let author = Uuid::now_v7();
        let msg = Message::new(conv, author, "hello");
        assert_eq!(msg.conversation_id, conv);
        assert_eq!(msg.author_id, author);
        assert_eq!(msg.content, "hello");
    }
}
