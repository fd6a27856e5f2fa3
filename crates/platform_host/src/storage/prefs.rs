//! Key/value preference storage used for the persisted desktop snapshot.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

/// Object-safe boxed future used by [`PrefsStore`] async methods.
pub type PrefsStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service for small JSON documents stored as text under a fixed key.
pub trait PrefsStore {
    /// Loads the raw JSON string stored under `key`.
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>>;

    /// Replaces the raw JSON string stored under `key`.
    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>>;

    /// Deletes `key`.
    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Store that never holds anything; used off-browser and for hosts without storage.
pub struct NoopPrefsStore;

impl PrefsStore for NoopPrefsStore {
    fn load_pref<'a>(
        &'a self,
        _key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn save_pref<'a>(
        &'a self,
        _key: &'a str,
        _raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn delete_pref<'a>(&'a self, _key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Default)]
struct MemoryPrefsInner {
    entries: HashMap<String, String>,
    writes: usize,
}

#[derive(Debug, Clone, Default)]
/// In-memory store; clones share the same entries.
///
/// Every successful `save_pref` is counted so callers can assert how often state was written.
pub struct MemoryPrefsStore {
    inner: Rc<RefCell<MemoryPrefsInner>>,
}

impl MemoryPrefsStore {
    /// Creates a store pre-seeded with one raw entry, as if written by an earlier session.
    pub fn with_entry(key: &str, raw_json: &str) -> Self {
        let store = Self::default();
        store
            .inner
            .borrow_mut()
            .entries
            .insert(key.to_string(), raw_json.to_string());
        store
    }

    /// Returns the raw value under `key` without going through the async contract.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().entries.get(key).cloned()
    }

    /// Number of saves performed since construction.
    pub fn write_count(&self) -> usize {
        self.inner.borrow().writes
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { Ok(self.raw(key)) })
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner
                .entries
                .insert(key.to_string(), raw_json.to_string());
            inner.writes += 1;
            Ok(())
        })
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner.borrow_mut().entries.remove(key);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn memory_store_counts_writes_and_shares_entries_across_clones() {
        let store = MemoryPrefsStore::default();
        let clone = store.clone();
        let store_obj: &dyn PrefsStore = &store;

        block_on(store_obj.save_pref("os-storage", "{\"theme\":\"dark\"}")).expect("save");
        block_on(store_obj.save_pref("os-storage", "{\"theme\":\"light\"}")).expect("save");

        assert_eq!(store.write_count(), 2);
        assert_eq!(
            clone.raw("os-storage"),
            Some("{\"theme\":\"light\"}".to_string())
        );

        block_on(store_obj.delete_pref("os-storage")).expect("delete");
        assert_eq!(block_on(store_obj.load_pref("os-storage")).expect("load"), None);
    }

    #[test]
    fn noop_store_is_empty_and_successful() {
        let store = NoopPrefsStore;
        let store_obj: &dyn PrefsStore = &store;
        assert_eq!(block_on(store_obj.load_pref("k")).expect("load"), None);
        block_on(store_obj.save_pref("k", "{}")).expect("save");
        block_on(store_obj.delete_pref("k")).expect("delete");
    }
}
