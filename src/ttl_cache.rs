use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Keys younger than this count as active in [`TtlCache::stats`].
const ACTIVE_HORIZON: Duration = Duration::from_secs(86_400);

struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total_keys: usize,
    pub active_keys: usize,
}

/// Thread-safe key/value store where freshness is decided by the reader.
///
/// Entries carry no TTL of their own: every `get` passes the maximum age it
/// accepts. Expired entries are never evicted actively, they stay inert until
/// the next `set` for the same key replaces them.
pub struct TtlCache<V> {
    store: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str, ttl: Duration) -> Option<V> {
        let store = self.store.lock().expect("ttl cache lock poisoned");
        let entry = store.get(key)?;
        if entry.stored_at.elapsed() >= ttl {
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        let entry = CacheEntry {
            value,
            stored_at: Instant::now(),
        };
        let mut store = self.store.lock().expect("ttl cache lock poisoned");
        store.insert(key.into(), entry);
    }

    pub fn clear(&self) {
        let mut store = self.store.lock().expect("ttl cache lock poisoned");
        store.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let store = self.store.lock().expect("ttl cache lock poisoned");
        let active_keys = store
            .values()
            .filter(|entry| entry.stored_at.elapsed() < ACTIVE_HORIZON)
            .count();
        CacheStats {
            total_keys: store.len(),
            active_keys,
        }
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
