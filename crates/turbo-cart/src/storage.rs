//! Session store backed by `turbo-cache`.

use crate::error::CartError;
use crate::session::{SessionKey, SessionStore};
use turbo_cache::{Cache, Session, SessionId};

/// Keeps cart session values in a [`Cache`] under
/// `session:<session id>:<key>`.
#[derive(Debug, Clone)]
pub struct CacheSessionStore {
    session: Session,
}

impl CacheSessionStore {
    /// Create a new store for one session.
    pub fn new(cache: Cache, session_id: SessionId) -> Self {
        Self {
            session: Session::new(cache, session_id),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        self.session.id()
    }

    /// Drop every cart value of the session.
    pub fn destroy(&self) -> Result<(), CartError> {
        Ok(self.session.destroy()?)
    }
}

impl SessionStore for CacheSessionStore {
    fn get(&self, key: SessionKey) -> Result<Option<serde_json::Value>, CartError> {
        Ok(self.session.get(key.as_str())?)
    }

    fn set(&self, key: SessionKey, value: serde_json::Value) -> Result<(), CartError> {
        Ok(self.session.set(key.as_str(), &value)?)
    }
}
