//! Per-ID [`Locks`] serializing mutations of the same entity.

use std::{
    collections::HashMap,
    fmt,
    hash::Hash,
    sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of per-key asynchronous locks.
///
/// At most one [`Guard`] exists per key at a time, while different keys are
/// locked independently. Entries are removed once nobody holds or awaits
/// them.
pub struct Locks<K>(Arc<Mutex<HashMap<K, Arc<AsyncMutex<()>>>>>);

impl<K> Locks<K>
where
    K: Clone + Eq + Hash,
{
    /// Locks the provided `key`, waiting until the previous [`Guard`] of it
    /// (if any) is dropped.
    pub async fn lock(&self, key: K) -> Guard<K> {
        let mutex = Arc::clone(
            self.0
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(key.clone())
                .or_default(),
        );
        let entry = Entry {
            registry: Arc::clone(&self.0),
            key,
            mutex,
        };
        let guard = Arc::clone(&entry.mutex).lock_owned().await;

        Guard {
            _guard: guard,
            entry,
        }
    }

    /// Returns the number of keys currently locked or awaited.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Indicates whether no keys are currently locked or awaited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K> Clone for Locks<K> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<K> Default for Locks<K> {
    fn default() -> Self {
        Self(Arc::default())
    }
}

impl<K> fmt::Debug for Locks<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Locks").finish_non_exhaustive()
    }
}

/// Held lock of a single key in [`Locks`].
pub struct Guard<K>
where
    K: Eq + Hash,
{
    /// Held lock, released before the [`Entry`] is dropped.
    _guard: OwnedMutexGuard<()>,

    /// [`Entry`] of the locked key.
    entry: Entry<K>,
}

impl<K> fmt::Debug for Guard<K>
where
    K: Eq + Hash + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("key", &self.entry.key)
            .finish_non_exhaustive()
    }
}

/// Reference to a key's lock in [`Locks`], held while locking or locked.
///
/// Removes the key from the registry on drop, once nobody else references
/// its lock, so both released and cancelled lockings clean up after
/// themselves.
struct Entry<K>
where
    K: Eq + Hash,
{
    /// Registry this [`Entry`] belongs to.
    registry: Arc<Mutex<HashMap<K, Arc<AsyncMutex<()>>>>>,

    /// Referenced key.
    key: K,

    /// Lock of the key, as stored in the registry.
    mutex: Arc<AsyncMutex<()>>,
}

impl<K> Drop for Entry<K>
where
    K: Eq + Hash,
{
    fn drop(&mut self) {
        let mut registry =
            self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        // Only the registry and this `Entry` reference an idle lock.
        if Arc::strong_count(&self.mutex) == 2 {
            _ = registry.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod spec {
    use std::{sync::Arc, time::Duration};

    use tokio::sync::Mutex;

    use super::Locks;

    #[tokio::test]
    async fn serializes_same_key() {
        let locks = Locks::default();
        let log = Arc::new(Mutex::new(Vec::new()));

        let first = locks.lock(1).await;
        let task = tokio::spawn({
            let locks = locks.clone();
            let log = Arc::clone(&log);
            async move {
                let _guard = locks.lock(1).await;
                log.lock().await.push("second");
            }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        log.lock().await.push("first");
        drop(first);
        task.await.unwrap();

        assert_eq!(*log.lock().await, ["first", "second"]);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn different_keys_are_independent() {
        let locks = Locks::default();

        let a = locks.lock("a").await;
        let b = locks.lock("b").await;
        assert_eq!(locks.len(), 2);

        drop(a);
        drop(b);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn cancelled_waiter_leaves_no_entry() {
        let locks = Locks::default();

        let held = locks.lock(1).await;
        let mut waiting = Box::pin(locks.lock(1));
        assert!(tokio::time::timeout(Duration::from_millis(10), &mut waiting)
            .await
            .is_err());

        drop(held);
        assert_eq!(locks.len(), 1);
        drop(waiting);
        assert!(locks.is_empty());

        let held = locks.lock(2).await;
        assert!(tokio::time::timeout(Duration::from_millis(10), locks.lock(2))
            .await
            .is_err());
        drop(held);
        assert!(locks.is_empty());
    }
}
