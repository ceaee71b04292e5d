use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockMap = DashMap<String, Arc<Mutex<()>>>;

/// One in-flight message per user
///
/// Entries are dropped from the map as soon as nobody holds or waits on
/// them, so the map only ever holds users with a message in progress.
#[derive(Clone, Default)]
pub struct UserLocks {
    inner: Arc<LockMap>,
}

/// Held while a user's message is being processed
pub struct UserGuard {
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<LockMap>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the user's slot, or `None` if a message is already in flight
    pub fn try_acquire(&self, key: &str) -> Option<UserGuard> {
        let mutex = self.inner.entry(key.to_string()).or_default().clone();
        let guard = mutex.try_lock_owned().ok()?;
        Some(UserGuard {
            key: key.to_string(),
            guard: Some(guard),
            locks: self.inner.clone(),
        })
    }

    pub fn in_flight(&self) -> usize {
        self.inner.len()
    }
}

impl Drop for UserGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
