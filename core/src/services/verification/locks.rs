//! Per-key async locks serializing work on one verification attempt

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One key's mutex plus the number of holders and waiters referencing it
#[derive(Debug, Default)]
struct Slot {
    mutex: Arc<AsyncMutex<()>>,
    users: usize,
}

/// Map of key to async mutex. Entries exist only while a guard is held or awaited.
#[derive(Debug)]
pub struct KeyedLocks<K> {
    slots: Mutex<HashMap<K, Slot>>,
}

impl<K> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone> KeyedLocks<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`.
    ///
    /// Dropping the returned future before it resolves releases the waiter's
    /// claim on the entry.
    pub async fn lock(&self, key: &K) -> KeyGuard<'_, K> {
        let mutex = {
            let mut slots = self.slots();
            let slot = slots.entry(key.clone()).or_default();
            slot.users += 1;
            slot.mutex.clone()
        };
        let lease = Lease {
            locks: self,
            key: key.clone(),
        };
        let guard = mutex.lock_owned().await;
        KeyGuard {
            _guard: guard,
            _lease: lease,
        }
    }

    /// Number of keys currently locked or awaited
    pub fn len(&self) -> usize {
        self.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn release(&self, key: &K) {
        let mut slots = self.slots();
        if let Some(slot) = slots.get_mut(key) {
            slot.users = slot.users.saturating_sub(1);
            if slot.users == 0 {
                slots.remove(key);
            }
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<K, Slot>> {
        // The map is only touched in short non-panicking sections
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Claim on a map entry, given back on drop whether or not the lock was won
struct Lease<'a, K: Eq + Hash + Clone> {
    locks: &'a KeyedLocks<K>,
    key: K,
}

impl<K: Eq + Hash + Clone> Drop for Lease<'_, K> {
    fn drop(&mut self) {
        self.locks.release(&self.key);
    }
}

/// Held lock on one key; the map entry is pruned when the last holder drops
pub struct KeyGuard<'a, K: Eq + Hash + Clone> {
    // Field order matters: the mutex unlocks before the lease is returned
    _guard: OwnedMutexGuard<()>,
    _lease: Lease<'a, K>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_entries_are_pruned() {
        let locks = KeyedLocks::new();
        {
            let _a = locks.lock(&"a").await;
            let _b = locks.lock(&"b").await;
            assert_eq!(locks.len(), 2);
        }
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_waiter_releases_entry() {
        let locks = KeyedLocks::new();
        let held = locks.lock(&"a").await;

        let waiting = tokio::time::timeout(Duration::from_millis(20), locks.lock(&"a")).await;
        assert!(waiting.is_err());
        assert_eq!(locks.len(), 1);

        drop(held);
        assert!(locks.is_empty());

        // The key is still usable afterwards
        let again = tokio::time::timeout(Duration::from_millis(50), locks.lock(&"a")).await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_contend() {
        let locks = KeyedLocks::new();
        let _held = locks.lock(&"a").await;
        let other = tokio::time::timeout(Duration::from_millis(50), locks.lock(&"b")).await;
        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn test_same_key_is_serialized() {
        let locks = Arc::new(KeyedLocks::new());
        let active = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = locks.clone();
            let active = active.clone();
            let max_seen = max_seen.clone();
            handles.push(tokio::spawn(async move {
                let _guard = locks.lock(&"shared").await;
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                active.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
        assert!(locks.is_empty());
    }
}
