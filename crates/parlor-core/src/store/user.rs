//! User store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use parlor_types::error::PersistError;
use parlor_types::user::User;

use crate::datastore::Datastore;
use crate::persist::PersistentDataStore;

/// In-memory working set of all users, backed by write-through persistence.
pub struct UserStore<D: Datastore> {
    agent: Arc<PersistentDataStore<D>>,
    inner: RwLock<Inner>,
}

struct Inner {
    users: Vec<User>,
    by_id: HashMap<Uuid, usize>,
    by_name: HashMap<String, usize>,
}

impl<D: Datastore> UserStore<D> {
    /// Build the store from the hydration load. Index maps are rebuilt
    /// here and kept in lockstep by `add`/`update`.
    pub(crate) fn new(agent: Arc<PersistentDataStore<D>>, users: Vec<User>) -> Self {
        let mut by_id = HashMap::with_capacity(users.len());
        let mut by_name = HashMap::with_capacity(users.len());
        for (index, user) in users.iter().enumerate() {
            by_id.insert(user.id, index);
            by_name.insert(user.username.clone(), index);
        }
        Self {
            agent,
            inner: RwLock::new(Inner { users, by_id, by_name }),
        }
    }

    pub fn get_by_id(&self, id: &Uuid) -> Option<User> {
        let inner = self.read();
        inner.by_id.get(id).map(|&i| inner.users[i].clone())
    }

    /// Exact, case-sensitive username lookup.
    pub fn get_by_username(&self, username: &str) -> Option<User> {
        let inner = self.read();
        inner.by_name.get(username).map(|&i| inner.users[i].clone())
    }

    /// True iff some stored user has exactly this username. Callers probe
    /// this before `add`; two racing registrations can still both pass.
    pub fn is_registered(&self, username: &str) -> bool {
        self.read().by_name.contains_key(username)
    }

    /// The full working set in creation-time order.
    pub fn all(&self) -> Vec<User> {
        self.read().users.clone()
    }

    /// Register a new user. Persists first; the in-memory set is only
    /// touched once the durable write succeeds.
    pub async fn add(&self, user: User) -> Result<(), PersistError> {
        self.agent.write_through(&user).await?;

        let mut inner = self.write();
        let index = inner.users.len();
        inner.by_id.insert(user.id, index);
        inner.by_name.insert(user.username.clone(), index);
        inner.users.push(user);
        Ok(())
    }

    /// Persist a modified user and replace the in-memory copy.
    ///
    /// Ids never change; a changed username re-keys the name index.
    pub async fn update(&self, user: User) -> Result<(), PersistError> {
        self.agent.write_through(&user).await?;

        let mut inner = self.write();
        if let Some(&index) = inner.by_id.get(&user.id) {
            let old_name = inner.users[index].username.clone();
            if old_name != user.username {
                inner.by_name.remove(&old_name);
                inner.by_name.insert(user.username.clone(), index);
            }
            inner.users[index] = user;
        }
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().expect("user store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().expect("user store lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastore::{MemoryDatastore, RecordKind};
    use crate::persist::Persistable;

    fn store_with_handle() -> (UserStore<Arc<MemoryDatastore>>, Arc<MemoryDatastore>) {
        let datastore = Arc::new(MemoryDatastore::new());
        let agent = Arc::new(PersistentDataStore::new(Arc::clone(&datastore)));
        (UserStore::new(agent, Vec::new()), datastore)
    }

    #[tokio::test]
    async fn test_add_then_get_by_id() {
        let (store, _) = store_with_handle();
        let user = User::new("alice", "hash", Uuid::now_v7());
        store.add(user.clone()).await.unwrap();
        assert_eq!(store.get_by_id(&user.id), Some(user));
    }

    #[tokio::test]
    async fn test_registered_user_found_unregistered_absent() {
        let (store, _) = store_with_handle();
        let alice = User::new("alice", "hash", Uuid::now_v7());
        let profile_id = alice.profile_id;
        store.add(alice).await.unwrap();

        let found = store.get_by_username("alice").unwrap();
        assert_eq!(found.username, "alice");
        assert_eq!(found.profile_id, profile_id);
        assert!(store.get_by_username("bob").is_none());
    }

    #[tokio::test]
    async fn test_add_writes_exactly_one_record() {
        let (store, datastore) = store_with_handle();
        let user = User::new("alice", "hash", Uuid::now_v7());
        store.add(user.clone()).await.unwrap();

        assert_eq!(datastore.count(RecordKind::User), 1);
        let record = datastore.get(RecordKind::User, &user.id.to_string()).unwrap();
        assert_eq!(record, user.to_record());
    }

    #[tokio::test]
    async fn test_is_registered_exact_match_only() {
        let (store, _) = store_with_handle();
        store
            .add(User::new("alice", "hash", Uuid::now_v7()))
            .await
            .unwrap();
        assert!(store.is_registered("alice"));
        assert!(!store.is_registered("Alice"));
        assert!(!store.is_registered("alic"));
    }

    #[tokio::test]
    async fn test_failed_put_leaves_store_unchanged() {
        let (store, datastore) = store_with_handle();
        datastore.fail_puts(true);

        let user = User::new("alice", "hash", Uuid::now_v7());
        assert!(store.add(user.clone()).await.is_err());
        assert!(store.get_by_id(&user.id).is_none());
        assert!(!store.is_registered("alice"));
    }

    #[tokio::test]
    async fn test_update_replaces_copy_and_rekeys_name() {
        let (store, datastore) = store_with_handle();
        let mut user = User::new("alice", "hash", Uuid::now_v7());
        store.add(user.clone()).await.unwrap();

        user.username = "alice2".to_string();
        user.is_admin = true;
        store.update(user.clone()).await.unwrap();

        assert!(store.get_by_username("alice").is_none());
        assert_eq!(store.get_by_username("alice2"), Some(user.clone()));
        assert!(store.get_by_id(&user.id).unwrap().is_admin);
        // Still one durable record, now with the new fields
        assert_eq!(datastore.count(RecordKind::User), 1);
    }
}
