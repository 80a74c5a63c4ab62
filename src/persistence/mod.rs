//! Key/value blob persistence
//!
//! Everything the game keeps between runs (high scores, the learning profile,
//! tuning overrides) is a JSON string under a fixed key. On the web the store is
//! LocalStorage; natively and in tests an in-memory map stands in.

use std::collections::HashMap;

/// Storage keys
pub mod keys {
    pub const HIGH_SCORES: &str = "gridiron_dash_highscores";
    pub const LEARNING: &str = "gridiron_dash_learning";
    pub const TUNING: &str = "gridiron_dash_tuning";
}

/// A string-keyed blob store
pub trait BlobStore {
    /// Fetch a blob, `None` if absent or unreadable
    fn load(&self, key: &str) -> Option<String>;
    /// Store a blob (best effort, failures are logged not returned)
    fn save(&mut self, key: &str, value: &str);
}

/// In-memory blob store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl BlobStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Browser LocalStorage blob store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl BlobStore for LocalStorageStore {
    fn load(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn save(&mut self, key: &str, value: &str) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    log::warn!("LocalStorage write failed for {key}");
                }
            }
            None => log::warn!("LocalStorage unavailable, {key} not saved"),
        }
    }
}
