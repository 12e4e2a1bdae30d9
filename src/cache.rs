//! Keyed cache with explicit time-to-live, injected wherever responses are
//! reused instead of refetched.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub trait Cache<V>: Send + Sync {
    fn get(&self, key: &str) -> Option<V>;
    fn set(&self, key: &str, value: V);
    fn invalidate(&self, key: &str);
    fn clear(&self);
}

/// Stable key for a list of request parts (path, params, ...).
pub fn cache_key(parts: &[&str]) -> String {
    let mut hasher = blake3::Hasher::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            hasher.update(b"\n");
        }
        hasher.update(part.as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

pub struct TtlCache<V> {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Live (unexpired) entries.
    pub fn len(&self) -> usize {
        let ttl = self.ttl;
        self.lock()
            .values()
            .filter(|e| e.stored_at.elapsed() < ttl)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry<V>>> {
        // A panic while holding the lock leaves plain data behind; keep going.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<V: Clone + Send> Cache<V> for TtlCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(e) if e.stored_at.elapsed() < self.ttl => Some(e.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Drops every expired entry before storing.
    fn set(&self, key: &str, value: V) {
        let ttl = self.ttl;
        let mut entries = self.lock();
        entries.retain(|_, e| e.stored_at.elapsed() < ttl);
        entries.insert(
            key.to_string(),
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    fn invalidate(&self, key: &str) {
        self.lock().remove(key);
    }

    fn clear(&self) {
        self.lock().clear();
    }
}

#[cfg(test)]
#[path = "tests/cache_tests.rs"]
mod tests;
