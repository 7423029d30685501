//! Message store. Messages are immutable, so there is no update path.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use parlor_types::error::PersistError;
use parlor_types::message::Message;

use crate::datastore::Datastore;
use crate::persist::PersistentDataStore;

/// In-memory working set of all messages, across every conversation.
pub struct MessageStore<D: Datastore> {
    agent: Arc<PersistentDataStore<D>>,
    inner: RwLock<Inner>,
}

struct Inner {
    messages: Vec<Message>,
    by_id: HashMap<Uuid, usize>,
}

impl<D: Datastore> MessageStore<D> {
    pub(crate) fn new(agent: Arc<PersistentDataStore<D>>, messages: Vec<Message>) -> Self {
        let mut by_id = HashMap::with_capacity(messages.len());
        for (index, message) in messages.iter().enumerate() {
            by_id.insert(message.id, index);
        }
        Self {
            agent,
            inner: RwLock::new(Inner { messages, by_id }),
        }
    }

    pub fn get_by_id(&self, id: &Uuid) -> Option<Message> {
        let inner = self.read();
        inner.by_id.get(id).map(|&i| inner.messages[i].clone())
    }

    /// Every message in one conversation, in creation-time order.
    pub fn in_conversation(&self, conversation_id: &Uuid) -> Vec<Message> {
        self.read()
            .messages
            .iter()
            .filter(|m| m.conversation_id == *conversation_id)
            .cloned()
            .collect()
    }

    /// The full working set in creation-time order.
    pub fn all(&self) -> Vec<Message> {
        self.read().messages.clone()
    }

    /// Post a message. Persists first; memory is only touched once the
    /// durable write succeeds.
    pub async fn add(&self, message: Message) -> Result<(), PersistError> {
        self.agent.write_through(&message).await?;

        let mut inner = self.write();
        let index = inner.messages.len();
        inner.by_id.insert(message.id, index);
        inner.messages.push(message);
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().expect("message store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().expect("message store lock poisoned")
    }
}
