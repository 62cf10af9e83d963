//! Cart error types.
//!
//! Only failures of the collaborators (catalog, discount rules, shipping,
//! session store) are errors. Missing products, stock shortfalls and
//! rejected add requests are reported through return values.

use thiserror::Error;

/// Fatal errors raised while reading or writing a cart.
#[derive(Error, Debug)]
pub enum CartError {
    /// Catalog lookup failed.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Discount rule lookup failed.
    #[error("Discount rules error: {0}")]
    Discounts(String),

    /// Shipping method lookup failed.
    #[error("Shipping error: {0}")]
    Shipping(String),

    /// Session store read or write failed.
    #[error("Session store error: {0}")]
    Session(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(feature = "storage")]
impl From<turbo_cache::CacheError> for CartError {
    fn from(e: turbo_cache::CacheError) -> Self {
        CartError::Session(e.to_string())
    }
}

/// Convenience type alias for Results with CartError.
pub type CartResult<T> = Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CartError::Catalog("connection refused".to_string());
        assert_eq!(err.to_string(), "Catalog error: connection refused");
    }

    #[test]
    fn test_serde_error_converts() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        let cart_err: CartError = err.into();
        assert!(matches!(cart_err, CartError::Serialization(_)));
    }
}
