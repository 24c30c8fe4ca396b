//! Per-key async locks serializing upserts of the same `(platform, handle)`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OwnedMutexGuard;

use crate::types::Platform;

type LockKey = (Platform, String);

/// Lazily created mutex per key. Entries nobody holds are pruned on the
/// next acquire, so the map stays proportional to in-flight upserts.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: Mutex<HashMap<LockKey, Arc<tokio::sync::Mutex<()>>>>,
}

/// Held for the duration of one upsert; releases on drop.
#[derive(Debug)]
pub struct KeyGuard {
    _guard: OwnedMutexGuard<()>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `(platform, handle)`.
    pub async fn acquire(&self, platform: Platform, handle: &str) -> KeyGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap();
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry((platform, handle.to_string()))
                .or_default()
                .clone()
        };
        KeyGuard {
            _guard: lock.lock_owned().await,
        }
    }

    /// Keys currently tracked (held or awaited).
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
