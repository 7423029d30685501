//! Profile store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use parlor_types::error::PersistError;
use parlor_types::profile::Profile;

use crate::datastore::Datastore;
use crate::persist::PersistentDataStore;

/// In-memory working set of all profiles. Profiles have no name, so the
/// only lookup is by id (the user record carries the profile id).
pub struct ProfileStore<D: Datastore> {
    agent: Arc<PersistentDataStore<D>>,
    inner: RwLock<Inner>,
}

struct Inner {
    profiles: Vec<Profile>,
    by_id: HashMap<Uuid, usize>,
}

impl<D: Datastore> ProfileStore<D> {
    pub(crate) fn new(agent: Arc<PersistentDataStore<D>>, profiles: Vec<Profile>) -> Self {
        let mut by_id = HashMap::with_capacity(profiles.len());
        for (index, profile) in profiles.iter().enumerate() {
            by_id.insert(profile.id, index);
        }
        Self {
            agent,
            inner: RwLock::new(Inner { profiles, by_id }),
        }
    }

    pub fn get_by_id(&self, id: &Uuid) -> Option<Profile> {
        let inner = self.read();
        inner.by_id.get(id).map(|&i| inner.profiles[i].clone())
    }

    pub fn all(&self) -> Vec<Profile> {
        self.read().profiles.clone()
    }

    pub async fn add(&self, profile: Profile) -> Result<(), PersistError> {
        self.agent.write_through(&profile).await?;

        let mut inner = self.write();
        let index = inner.profiles.len();
        inner.by_id.insert(profile.id, index);
        inner.profiles.push(profile);
        Ok(())
    }

    /// Persist an edited profile (bio) and replace the in-memory copy.
    pub async fn update(&self, profile: Profile) -> Result<(), PersistError> {
        self.agent.write_through(&profile).await?;

        let mut inner = self.write();
        if let Some(&index) = inner.by_id.get(&profile.id) {
            inner.profiles[index] = profile;
        }
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().expect("profile store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().expect("profile store lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastore::{MemoryDatastore, RecordKind};

    fn store_with_handle() -> (ProfileStore<Arc<MemoryDatastore>>, Arc<MemoryDatastore>) {
        let datastore = Arc::new(MemoryDatastore::new());
        let agent = Arc::new(PersistentDataStore::new(Arc::clone(&datastore)));
        (ProfileStore::new(agent, Vec::new()), datastore)
    }

    #[tokio::test]
    async fn test_add_then_get() {
        let (store, _) = store_with_handle();
        let profile = Profile::new();
        store.add(profile.clone()).await.unwrap();
        assert_eq!(store.get_by_id(&profile.id), Some(profile));
    }

    #[tokio::test]
    async fn test_bio_edit_persists() {
        let (store, datastore) = store_with_handle();
        let mut profile = Profile::new();
        store.add(profile.clone()).await.unwrap();

        profile.bio = "likes birds".to_string();
        store.update(profile.clone()).await.unwrap();

        assert_eq!(store.get_by_id(&profile.id).unwrap().bio, "likes birds");
        let record = datastore
            .get(RecordKind::Profile, &profile.id.to_string())
            .unwrap();
        assert_eq!(record.text("bio").unwrap(), "likes birds");
    }
}
