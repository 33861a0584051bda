use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, trace};

use crate::config::StoreConfig;
use crate::core::Result;
use crate::mutation::Reducer;
use crate::storage::StoreState;

type Listener = Arc<dyn Fn(&StoreState) + Send + Sync>;

/// Handle returned by [`EntityStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Host store holding the current snapshot.
///
/// `reduce` runs a reducer against the current snapshot under the write
/// lock and commits its output, so concurrent callers never observe a
/// half-applied mutation. Listeners are called after the lock is released
/// and only when the committed snapshot is a new one.
///
/// A reducer that panics poisons the store; later calls return
/// `StoreError::LockError`.
pub struct EntityStore {
    name: String,
    state: RwLock<StoreState>,
    listeners: RwLock<Vec<(SubscriptionId, Listener)>>,
    next_subscription: AtomicU64,
}

impl EntityStore {
    pub fn new(config: StoreConfig) -> Self {
        let state = config.initial_state();
        debug!(store = %config.name, refs = config.refs().len(), "entity store created");
        Self {
            name: config.name,
            state: RwLock::new(state),
            listeners: RwLock::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current snapshot. Cheap: snapshots share structure.
    pub fn state(&self) -> Result<StoreState> {
        Ok(self.state.read()?.clone())
    }

    /// Applies `reducer` and commits its result.
    ///
    /// Returns `true` when a new snapshot was committed, `false` when the
    /// reducer handed back the current one. On error nothing is committed.
    pub fn reduce(&self, reducer: Reducer) -> Result<bool> {
        let next = {
            let mut current = self.state.write()?;
            let next = reducer(current.clone())?;
            if next.ptr_eq(&current) {
                trace!(store = %self.name, "reducer returned the current snapshot");
                return Ok(false);
            }
            *current = next.clone();
            next
        };

        debug!(store = %self.name, "snapshot committed");
        self.notify(&next)?;
        Ok(true)
    }

    /// Registers a listener called with every newly committed snapshot.
    pub fn subscribe<F>(&self, listener: F) -> Result<SubscriptionId>
    where
        F: Fn(&StoreState) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.listeners.write()?.push((id, Arc::new(listener)));
        Ok(id)
    }

    /// Removes a listener; `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<bool> {
        let mut listeners = self.listeners.write()?;
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        Ok(listeners.len() != before)
    }

    fn notify(&self, state: &StoreState) -> Result<()> {
        let listeners: Vec<Listener> = self
            .listeners
            .read()?
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(state);
        }
        Ok(())
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;
    use crate::mutation::{AddOptions, add_entities, set_prop};
    use crate::mutation::test_support::todo;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_reduce_commits_and_skips_noops() {
        let store = EntityStore::default();
        assert!(store.reduce(add_entities([todo(1)], AddOptions::new())).unwrap());
        assert!(!store.reduce(add_entities([todo(1)], AddOptions::new())).unwrap());
        assert_eq!(store.state().unwrap().collection(&Default::default()).len(), 1);
    }

    #[test]
    fn test_failed_reducer_commits_nothing() {
        let store = EntityStore::default();
        let before = store.state().unwrap();
        let failing: Reducer = Box::new(|_: StoreState| -> Result<StoreState> {
            Err(StoreError::UnsupportedOperation("nope".into()))
        });
        assert!(store.reduce(failing).is_err());
        assert!(store.state().unwrap().ptr_eq(&before));
    }

    #[test]
    fn test_listeners_only_see_changes() {
        let store = EntityStore::new(StoreConfig::new("todos"));
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let id = store
            .subscribe(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        store.reduce(set_prop("filter", json!("ALL"))).unwrap();
        store.reduce(set_prop("filter", json!("ALL"))).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert!(store.unsubscribe(id).unwrap());
        assert!(!store.unsubscribe(id).unwrap());
        store.reduce(set_prop("filter", json!("DONE"))).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
