//! Key-value storage that survives page reloads.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

pub trait DurableStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// The browser's `localStorage`. Storage can be unavailable (private
/// browsing, quota, native builds); failures are logged and otherwise
/// behave like an empty store.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl DurableStorage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        let Some(storage) = Self::storage() else {
            tracing::warn!(key, "localStorage unavailable, value not saved");
            return;
        };
        if storage.set_item(key, value).is_err() {
            tracing::warn!(key, "failed to write localStorage");
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage()
            && storage.remove_item(key).is_err()
        {
            tracing::warn!(key, "failed to remove localStorage entry");
        }
    }
}

/// In-memory storage. Clones share the same entries.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage(Rc<RefCell<BTreeMap<String, String>>>);

impl MemoryStorage {
    pub fn contains(&self, key: &str) -> bool {
        self.0.borrow().contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl DurableStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.0.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.0.borrow_mut().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_clones_share_entries() {
        let storage = MemoryStorage::default();
        let other = storage.clone();
        storage.set("token", "abc");
        assert_eq!(other.get("token").as_deref(), Some("abc"));

        other.remove("token");
        assert!(storage.is_empty());
        // removing again is fine
        storage.remove("token");
    }
}
