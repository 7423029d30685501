//! Group store. Same shape as the conversation store but a disjoint
//! namespace: a group title may collide with a conversation title.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use parlor_types::error::PersistError;
use parlor_types::group::Group;

use crate::datastore::Datastore;
use crate::persist::PersistentDataStore;

/// In-memory working set of all private group conversations.
pub struct GroupStore<D: Datastore> {
    agent: Arc<PersistentDataStore<D>>,
    inner: RwLock<Inner>,
}

struct Inner {
    groups: Vec<Group>,
    by_id: HashMap<Uuid, usize>,
    by_title: HashMap<String, usize>,
}

impl<D: Datastore> GroupStore<D> {
    pub(crate) fn new(agent: Arc<PersistentDataStore<D>>, groups: Vec<Group>) -> Self {
        let mut by_id = HashMap::with_capacity(groups.len());
        let mut by_title = HashMap::with_capacity(groups.len());
        for (index, group) in groups.iter().enumerate() {
            by_id.insert(group.id, index);
            by_title.insert(group.title.clone(), index);
        }
        Self {
            agent,
            inner: RwLock::new(Inner { groups, by_id, by_title }),
        }
    }

    pub fn get_by_id(&self, id: &Uuid) -> Option<Group> {
        let inner = self.read();
        inner.by_id.get(id).map(|&i| inner.groups[i].clone())
    }

    pub fn get_by_title(&self, title: &str) -> Option<Group> {
        let inner = self.read();
        inner.by_title.get(title).map(|&i| inner.groups[i].clone())
    }

    pub fn is_title_taken(&self, title: &str) -> bool {
        self.read().by_title.contains_key(title)
    }

    pub fn all(&self) -> Vec<Group> {
        self.read().groups.clone()
    }

    pub async fn add(&self, group: Group) -> Result<(), PersistError> {
        self.agent.write_through(&group).await?;

        let mut inner = self.write();
        let index = inner.groups.len();
        inner.by_id.insert(group.id, index);
        inner.by_title.insert(group.title.clone(), index);
        inner.groups.push(group);
        Ok(())
    }

    /// Persist a modified group (typically membership) and replace the
    /// in-memory copy.
    pub async fn update(&self, group: Group) -> Result<(), PersistError> {
        self.agent.write_through(&group).await?;

        let mut inner = self.write();
        if let Some(&index) = inner.by_id.get(&group.id) {
            let old_title = inner.groups[index].title.clone();
            if old_title != group.title {
                inner.by_title.remove(&old_title);
                inner.by_title.insert(group.title.clone(), index);
            }
            inner.groups[index] = group;
        }
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().expect("group store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().expect("group store lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastore::{MemoryDatastore, RecordKind};

    fn store_with_handle() -> (GroupStore<Arc<MemoryDatastore>>, Arc<MemoryDatastore>) {
        let datastore = Arc::new(MemoryDatastore::new());
        let agent = Arc::new(PersistentDataStore::new(Arc::clone(&datastore)));
        (GroupStore::new(agent, Vec::new()), datastore)
    }

    #[tokio::test]
    async fn test_add_then_lookup() {
        let (store, datastore) = store_with_handle();
        let group = Group::new(Uuid::now_v7(), "study hall");
        store.add(group.clone()).await.unwrap();

        assert_eq!(store.get_by_title("study hall"), Some(group));
        assert_eq!(datastore.count(RecordKind::Group), 1);
    }

    #[tokio::test]
    async fn test_membership_update_persists() {
        let (store, datastore) = store_with_handle();
        let mut group = Group::new(Uuid::now_v7(), "study hall");
        store.add(group.clone()).await.unwrap();

        let newcomer = Uuid::now_v7();
        group.add_member(newcomer);
        store.update(group.clone()).await.unwrap();

        assert!(store.get_by_id(&group.id).unwrap().is_member(&newcomer));
        let record = datastore.get(RecordKind::Group, &group.id.to_string()).unwrap();
        assert_eq!(record.uuid_set("members").unwrap(), group.members);
    }

    #[tokio::test]
    async fn test_title_uniqueness_probe() {
        let (store, _) = store_with_handle();
        store.add(Group::new(Uuid::now_v7(), "study hall")).await.unwrap();
        assert!(store.is_title_taken("study hall"));
        assert!(!store.is_title_taken("lounge"));
    }
}
