//! Conversation store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use parlor_types::conversation::Conversation;
use parlor_types::error::PersistError;

use crate::datastore::Datastore;
use crate::persist::PersistentDataStore;

/// In-memory working set of all conversations.
///
/// Titles are unique among conversations; enforcement is the caller's
/// job via [`ConversationStore::is_title_taken`] before `add`. The probe
/// and the insert are separate operations, so two racing creates with the
/// same title can both pass the probe.
pub struct ConversationStore<D: Datastore> {
    agent: Arc<PersistentDataStore<D>>,
    inner: RwLock<Inner>,
}

struct Inner {
    conversations: Vec<Conversation>,
    by_id: HashMap<Uuid, usize>,
    by_title: HashMap<String, usize>,
}

impl<D: Datastore> ConversationStore<D> {
    pub(crate) fn new(
        agent: Arc<PersistentDataStore<D>>,
        conversations: Vec<Conversation>,
    ) -> Self {
        let mut by_id = HashMap::with_capacity(conversations.len());
        let mut by_title = HashMap::with_capacity(conversations.len());
        for (index, conv) in conversations.iter().enumerate() {
            by_id.insert(conv.id, index);
            by_title.insert(conv.title.clone(), index);
        }
        Self {
            agent,
            inner: RwLock::new(Inner { conversations, by_id, by_title }),
        }
    }

    pub fn get_by_id(&self, id: &Uuid) -> Option<Conversation> {
        let inner = self.read();
        inner.by_id.get(id).map(|&i| inner.conversations[i].clone())
    }

    /// Exact, case-sensitive title lookup.
    pub fn get_by_title(&self, title: &str) -> Option<Conversation> {
        let inner = self.read();
        inner.by_title.get(title).map(|&i| inner.conversations[i].clone())
    }

    pub fn is_title_taken(&self, title: &str) -> bool {
        self.read().by_title.contains_key(title)
    }

    /// The full working set in creation-time order.
    pub fn all(&self) -> Vec<Conversation> {
        self.read().conversations.clone()
    }

    /// Create a new conversation. Persists first; memory is only touched
    /// once the durable write succeeds.
    pub async fn add(&self, conversation: Conversation) -> Result<(), PersistError> {
        self.agent.write_through(&conversation).await?;

        let mut inner = self.write();
        let index = inner.conversations.len();
        inner.by_id.insert(conversation.id, index);
        inner.by_title.insert(conversation.title.clone(), index);
        inner.conversations.push(conversation);
        Ok(())
    }

    /// Persist a modified conversation (membership, votes, title) and
    /// replace the in-memory copy.
    pub async fn update(&self, conversation: Conversation) -> Result<(), PersistError> {
        self.agent.write_through(&conversation).await?;

        let mut inner = self.write();
        if let Some(&index) = inner.by_id.get(&conversation.id) {
            let old_title = inner.conversations[index].title.clone();
            if old_title != conversation.title {
                inner.by_title.remove(&old_title);
                inner.by_title.insert(conversation.title.clone(), index);
            }
            inner.conversations[index] = conversation;
        }
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().expect("conversation store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().expect("conversation store lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastore::{MemoryDatastore, RecordKind};
    use chrono::Duration;
    use parlor_types::conversation::{ConversationKind, Visibility};

    fn store_with_handle() -> (
        ConversationStore<Arc<MemoryDatastore>>,
        Arc<MemoryDatastore>,
    ) {
        let datastore = Arc::new(MemoryDatastore::new());
        let agent = Arc::new(PersistentDataStore::new(Arc::clone(&datastore)));
        (ConversationStore::new(agent, Vec::new()), datastore)
    }

    fn conversation(title: &str) -> Conversation {
        Conversation::new(
            Uuid::now_v7(),
            title,
            "",
            ConversationKind::Text,
            Visibility::Public,
            Duration::hours(24),
        )
    }

    #[tokio::test]
    async fn test_add_then_lookup() {
        let (store, datastore) = store_with_handle();
        let conv = conversation("general");
        store.add(conv.clone()).await.unwrap();

        assert_eq!(store.get_by_id(&conv.id), Some(conv.clone()));
        assert_eq!(store.get_by_title("general"), Some(conv));
        assert_eq!(datastore.count(RecordKind::Conversation), 1);
    }

    #[tokio::test]
    async fn test_duplicate_title_detectable_before_second_insert() {
        let (store, _) = store_with_handle();
        assert!(!store.is_title_taken("general"));
        store.add(conversation("general")).await.unwrap();
        // A second create attempt must probe and see the collision.
        assert!(store.is_title_taken("general"));
    }

    #[tokio::test]
    async fn test_title_probe_is_case_sensitive() {
        let (store, _) = store_with_handle();
        store.add(conversation("general")).await.unwrap();
        assert!(!store.is_title_taken("General"));
    }

    #[tokio::test]
    async fn test_vote_update_persists() {
        let (store, datastore) = store_with_handle();
        let mut conv = conversation("general");
        store.add(conv.clone()).await.unwrap();

        let voter = Uuid::now_v7();
        assert!(conv.upvote(voter));
        store.update(conv.clone()).await.unwrap();

        assert_eq!(store.get_by_id(&conv.id).unwrap().total_points, 1);
        let record = datastore
            .get(RecordKind::Conversation, &conv.id.to_string())
            .unwrap();
        assert_eq!(record.text("total_points").unwrap(), "1");
    }

    #[tokio::test]
    async fn test_failed_put_leaves_store_unchanged() {
        let (store, datastore) = store_with_handle();
        datastore.fail_puts(true);
        assert!(store.add(conversation("general")).await.is_err());
        assert!(!store.is_title_taken("general"));
        assert!(store.all().is_empty());
    }
}
