//! Path-keyed view cache
//!
//! Rendered listings are cached per (path, query). Revalidating a path drops
//! every entry stored under it so the next read goes back to the store.
//!
//! Each path also carries a generation that revalidation bumps. A reader
//! captures the generation before it queries the store and hands it back to
//! [`ViewCache::put`]; a view read before a revalidation is then never
//! stored after it.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Something that can mark a named view as stale
pub trait Revalidate: Send + Sync {
    fn revalidate_path(&self, path: &str);
}

#[derive(Default)]
struct PathViews {
    generation: u64,
    views: HashMap<String, Value>,
}

#[derive(Clone, Default)]
pub struct ViewCache {
    entries: Arc<RwLock<HashMap<String, PathViews>>>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock only means a writer panicked mid-insert; the map is
    // still a valid cache.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, PathViews>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, PathViews>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, path: &str, key: &str) -> Option<Value> {
        self.read()
            .get(path)
            .and_then(|entry| entry.views.get(key))
            .cloned()
    }

    /// Current generation of `path`; capture it before reading the store
    pub fn generation(&self, path: &str) -> u64 {
        self.read().get(path).map_or(0, |entry| entry.generation)
    }

    /// Store `view` unless `path` was revalidated since `generation`
    ///
    /// Returns whether the view was stored.
    pub fn put(&self, path: &str, key: &str, view: Value, generation: u64) -> bool {
        let mut entries = self.write();
        let entry = entries.entry(path.to_string()).or_default();
        if entry.generation != generation {
            tracing::debug!(path, key, "discarding view read before revalidation");
            return false;
        }
        entry.views.insert(key.to_string(), view);
        true
    }

    /// Number of cached views under `path`
    pub fn len(&self, path: &str) -> usize {
        self.read().get(path).map_or(0, |entry| entry.views.len())
    }

    pub fn is_empty(&self, path: &str) -> bool {
        self.len(path) == 0
    }
}

impl Revalidate for ViewCache {
    fn revalidate_path(&self, path: &str) {
        let mut entries = self.write();
        let entry = entries.entry(path.to_string()).or_default();
        entry.generation += 1;
        let dropped = entry.views.len();
        entry.views.clear();
        tracing::debug!(path, dropped, "revalidated cached views");
    }
}
