//! Activity store: the append-only feed.
//!
//! Activities are created through the explicit path only -- whatever
//! performs a notable action appends exactly one entry here. There is no
//! deduplication, no retention limit, and no query API beyond the full
//! feed; ordering is newest first.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use parlor_types::activity::Activity;
use parlor_types::error::PersistError;

use crate::datastore::Datastore;
use crate::persist::PersistentDataStore;

/// In-memory activity feed, newest first.
pub struct ActivityStore<D: Datastore> {
    agent: Arc<PersistentDataStore<D>>,
    // Descending creation time: hydration loads newest first and `add`
    // prepends, so the invariant holds across both paths.
    feed: RwLock<Vec<Activity>>,
}

impl<D: Datastore> ActivityStore<D> {
    pub(crate) fn new(agent: Arc<PersistentDataStore<D>>, feed: Vec<Activity>) -> Self {
        Self {
            agent,
            feed: RwLock::new(feed),
        }
    }

    /// The full feed, newest first.
    pub fn all(&self) -> Vec<Activity> {
        self.read().clone()
    }

    /// Append an entry. Persists first; memory is only touched once the
    /// durable write succeeds.
    pub async fn add(&self, activity: Activity) -> Result<(), PersistError> {
        self.agent.write_through(&activity).await?;
        self.write().insert(0, activity);
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Activity>> {
        self.feed.read().expect("activity store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Activity>> {
        self.feed.write().expect("activity store lock poisoned")
    }
}
