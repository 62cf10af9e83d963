//! Type-safe Key-Value caching layer for TurboCommerce.
//!
//! Provides a small, ergonomic API for caching JSON-serializable values and
//! for grouping values by session.
//!
//! # Example
//!
//! ```rust
//! use turbo_cache::{Cache, Session, SessionId};
//!
//! let cache = Cache::open_default();
//!
//! // Store and retrieve a value
//! cache.set("store:currency", &"USD").unwrap();
//! let currency: Option<String> = cache.get("store:currency").unwrap();
//! assert_eq!(currency.as_deref(), Some("USD"));
//!
//! // Session-scoped values
//! let session = Session::new(cache, SessionId::generate());
//! session.set("shipping_instructions", &"Leave at the door").unwrap();
//! ```

mod error;
mod kv;
mod session;

pub use error::CacheError;
pub use kv::Cache;
pub use session::{Session, SessionId};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, Session, SessionId};
}
