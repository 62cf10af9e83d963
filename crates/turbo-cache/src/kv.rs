//! Key-Value store wrapper with automatic serialization.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};
use tracing::trace;

type Entries = BTreeMap<String, Vec<u8>>;

/// Type-safe in-process Key-Value cache.
///
/// Values are stored as JSON bytes, so anything that implements
/// `Serialize` and `DeserializeOwned` can be cached. Cloning a `Cache`
/// yields another handle onto the same store.
#[derive(Debug, Clone)]
pub struct Cache {
    name: Arc<str>,
    entries: Arc<RwLock<Entries>>,
}

impl Cache {
    /// Open the default Key-Value store.
    ///
    /// # Example
    ///
    /// ```rust
    /// let cache = turbo_cache::Cache::open_default();
    /// assert_eq!(cache.name(), "default");
    /// ```
    pub fn open_default() -> Self {
        Self {
            name: Arc::from("default"),
            entries: Arc::new(RwLock::new(Entries::new())),
        }
    }

    /// Open a named Key-Value store.
    ///
    /// Store names must be non-empty and contain no whitespace.
    pub fn open(name: &str) -> Result<Self, CacheError> {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(CacheError::OpenError(format!("invalid store name {name:?}")));
        }
        Ok(Self {
            name: Arc::from(name),
            entries: Arc::new(RwLock::new(Entries::new())),
        })
    }

    /// Name of the underlying store.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let items: Option<Vec<CartLineItem>> = cache.get("session:abc:cart")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let entries = self.read()?;
        match entries.get(key) {
            Some(bytes) => Ok(Some(serde_json::from_slice(bytes)?)),
            None => Ok(None),
        }
    }

    /// Set a value in the cache, replacing any previous value.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        trace!(store = %self.name, key, len = bytes.len(), "cache set");
        self.write()?.insert(key.to_string(), bytes);
        Ok(())
    }

    /// Delete a value from the cache.
    ///
    /// Returns `true` if the key was present.
    pub fn delete(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.write()?.remove(key).is_some())
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.read()?.contains_key(key))
    }

    /// Get all keys in the cache, in sorted order.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.read()?.keys().cloned().collect())
    }

    /// Get all keys starting with `prefix`, in sorted order.
    pub fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, CacheError> {
        Ok(self
            .read()?
            .range(prefix.to_string()..)
            .map(|(key, _)| key)
            .take_while(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Entries>, CacheError> {
        self.entries
            .read()
            .map_err(|_| CacheError::Poisoned(self.name.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Entries>, CacheError> {
        self.entries
            .write()
            .map_err(|_| CacheError::Poisoned(self.name.to_string()))
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust
/// use turbo_cache::cache_key;
///
/// let key = cache_key!("session", "sess_1", "cart");
/// assert_eq!(key, "session:sess_1:cart");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}
