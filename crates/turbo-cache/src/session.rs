//! Session-scoped storage on top of the Key-Value cache.

use crate::{cache_key, Cache, CacheError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

/// A unique session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Create a new session ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new cryptographically secure session ID.
    pub fn generate() -> Self {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let bytes: [u8; 18] = rand::thread_rng().gen();
        Self(format!("sess_{}", URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Get the session ID as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Named values belonging to one session.
///
/// Every field is stored under `session:<id>:<field>` so a session's
/// values can be listed or dropped together. `%` and `:` in the id are
/// percent-encoded, so one id is never a key prefix of another.
///
/// # Example
///
/// ```rust
/// use turbo_cache::{Cache, Session, SessionId};
///
/// let session = Session::new(Cache::open_default(), SessionId::new("abc123"));
/// session.set("discount_code", &"SAVE10").unwrap();
///
/// let code: Option<String> = session.get("discount_code").unwrap();
/// assert_eq!(code.as_deref(), Some("SAVE10"));
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    cache: Cache,
    id: SessionId,
}

impl Session {
    /// Bind a session ID to a cache.
    pub fn new(cache: Cache, id: SessionId) -> Self {
        Self { cache, id }
    }

    /// The session identifier.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Get a session field.
    pub fn get<T: DeserializeOwned>(&self, field: &str) -> Result<Option<T>, CacheError> {
        self.cache.get(&self.key(field))
    }

    /// Set a session field.
    pub fn set<T: Serialize>(&self, field: &str, value: &T) -> Result<(), CacheError> {
        self.cache.set(&self.key(field), value)
    }

    /// Delete a session field.
    pub fn delete(&self, field: &str) -> Result<bool, CacheError> {
        self.cache.delete(&self.key(field))
    }

    /// Names of all fields stored for this session.
    pub fn fields(&self) -> Result<Vec<String>, CacheError> {
        let prefix = self.prefix();
        Ok(self
            .cache
            .keys_with_prefix(&prefix)?
            .into_iter()
            .map(|key| key[prefix.len()..].to_string())
            .collect())
    }

    /// Drop every field of this session.
    pub fn destroy(&self) -> Result<(), CacheError> {
        let keys = self.cache.keys_with_prefix(&self.prefix())?;
        debug!(session_id = %self.id, fields = keys.len(), "destroying session");
        for key in keys {
            self.cache.delete(&key)?;
        }
        Ok(())
    }

    fn prefix(&self) -> String {
        format!("{}:", cache_key!("session", self.key_part()))
    }

    fn key(&self, field: &str) -> String {
        cache_key!("session", self.key_part(), field)
    }

    fn key_part(&self) -> String {
        self.id.as_str().replace('%', "%25").replace(':', "%3A")
    }
}
