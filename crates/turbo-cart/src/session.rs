//! Per-session cart state storage.

use crate::error::CartError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Values the cart keeps in the shopper's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SessionKey {
    /// Stored cart line items.
    Cart,
    /// Discount code entered by the shopper.
    DiscountCode,
    /// Free-text delivery instructions.
    ShippingInstructions,
    /// Selected shipping method, reset to `false` by every cart change.
    ShippingMethod,
}

impl SessionKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKey::Cart => "cart",
            SessionKey::DiscountCode => "discount_code",
            SessionKey::ShippingInstructions => "shipping_instructions",
            SessionKey::ShippingMethod => "shipping_method",
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque key/value storage scoped to one shopper session.
///
/// Values are arbitrary JSON; the cart validates what it reads back.
pub trait SessionStore {
    /// Read a value, `None` if it was never set.
    fn get(&self, key: SessionKey) -> Result<Option<serde_json::Value>, CartError>;

    /// Write a value.
    fn set(&self, key: SessionKey, value: serde_json::Value) -> Result<(), CartError>;
}
