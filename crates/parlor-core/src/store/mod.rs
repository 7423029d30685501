//! In-memory entity stores, one per entity type.
//!
//! Each store is the sole in-process owner of the authoritative working
//! set for its entity type: an ordered collection (creation-time order as
//! loaded) plus id/name index maps kept in lockstep on insert. Every
//! mutation is mirrored to durable storage through the persistence agent
//! *before* the in-memory state changes, so a failed write leaves the
//! store consistent with the backing datastore.
//!
//! [`StoreContext`] replaces the singleton pattern: it is constructed once
//! at process start, hydrates every store from the datastore, and is then
//! passed explicitly to whatever calls into the store layer. Not-found
//! lookups return `None`, never an error.

pub mod activity;
pub mod conversation;
pub mod group;
pub mod message;
pub mod profile;
pub mod user;

pub use activity::ActivityStore;
pub use conversation::ConversationStore;
pub use group::GroupStore;
pub use message::MessageStore;
pub use profile::ProfileStore;
pub use user::UserStore;

use std::sync::Arc;

use parlor_types::activity::Activity;
use parlor_types::conversation::Conversation;
use parlor_types::error::PersistError;
use parlor_types::group::Group;
use parlor_types::message::Message;
use parlor_types::profile::Profile;
use parlor_types::user::User;

use crate::datastore::Datastore;
use crate::persist::PersistentDataStore;

/// All six stores, hydrated and ready to serve.
pub struct StoreContext<D: Datastore> {
    pub users: UserStore<D>,
    pub profiles: ProfileStore<D>,
    pub conversations: ConversationStore<D>,
    pub groups: GroupStore<D>,
    pub messages: MessageStore<D>,
    pub activities: ActivityStore<D>,
}

impl<D: Datastore> StoreContext<D> {
    /// Bulk-load every entity type and build the stores.
    ///
    /// This must complete before the first store operation is served;
    /// any load failure is fatal to startup.
    pub async fn hydrate(datastore: D) -> Result<Self, PersistError> {
        let agent = Arc::new(PersistentDataStore::new(datastore));

        let users = agent.load_all::<User>().await?;
        let profiles = agent.load_all::<Profile>().await?;
        let conversations = agent.load_all::<Conversation>().await?;
        let groups = agent.load_all::<Group>().await?;
        let messages = agent.load_all::<Message>().await?;
        let activities = agent.load_all::<Activity>().await?;

        tracing::info!(
            users = users.len(),
            profiles = profiles.len(),
            conversations = conversations.len(),
            groups = groups.len(),
            messages = messages.len(),
            activities = activities.len(),
            "stores hydrated"
        );

        Ok(Self {
            users: UserStore::new(Arc::clone(&agent), users),
            profiles: ProfileStore::new(Arc::clone(&agent), profiles),
            conversations: ConversationStore::new(Arc::clone(&agent), conversations),
            groups: GroupStore::new(Arc::clone(&agent), groups),
            messages: MessageStore::new(Arc::clone(&agent), messages),
            activities: ActivityStore::new(agent, activities),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastore::MemoryDatastore;
    use crate::persist::Persistable;
    use chrono::{Duration, Utc};
    use parlor_types::activity::ActivityKind;
    use parlor_types::conversation::{ConversationKind, Visibility};
    use uuid::Uuid;

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
    async fn test_hydrate_empty_datastore() {
        let stores = StoreContext::hydrate(MemoryDatastore::new()).await.unwrap();
        assert!(stores.users.all().is_empty());
        assert!(stores.conversations.all().is_empty());
        assert!(stores.activities.all().is_empty());
    }

    #[tokio::test]
    async fn test_hydrate_orders_conversations_ascending() {
        let datastore = Arc::new(MemoryDatastore::new());

        let mut older = conversation("older");
        older.created_at = Utc::now() - Duration::minutes(10);
        let newer = conversation("newer");

        datastore.put(&newer.to_record()).await.unwrap();
        datastore.put(&older.to_record()).await.unwrap();

        let stores = StoreContext::hydrate(Arc::clone(&datastore)).await.unwrap();
        let all = stores.conversations.all();
        assert_eq!(all[0].title, "older");
        assert_eq!(all[1].title, "newer");
    }

    #[tokio::test]
    async fn test_hydrate_orders_activities_descending() {
        let datastore = Arc::new(MemoryDatastore::new());

        let owner = Uuid::now_v7();
        let mut first = Activity::new(ActivityKind::Conversation, owner, Uuid::now_v7());
        first.created_at = Utc::now() - Duration::minutes(1);
        let second = Activity::new(ActivityKind::Message, owner, Uuid::now_v7());

        datastore.put(&first.to_record()).await.unwrap();
        datastore.put(&second.to_record()).await.unwrap();

        let stores = StoreContext::hydrate(Arc::clone(&datastore)).await.unwrap();
        let feed = stores.activities.all();
        // Added CONVERSATION then MESSAGE; the feed reads MESSAGE first.
        assert_eq!(feed[0].kind, ActivityKind::Message);
        assert_eq!(feed[1].kind, ActivityKind::Conversation);
    }

    #[tokio::test]
    async fn test_hydrate_fails_on_bad_record() {
        let datastore = Arc::new(MemoryDatastore::new());
        let bad = crate::datastore::Record::new(crate::datastore::RecordKind::User, "garbage")
            .with(crate::datastore::CREATED_AT, Utc::now().to_rfc3339());
        datastore.put(&bad).await.unwrap();

        assert!(StoreContext::hydrate(Arc::clone(&datastore)).await.is_err());
    }
}
