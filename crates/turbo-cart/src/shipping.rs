//! Shipping method types.

use crate::error::CartError;
use crate::ids::ShippingMethodId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A configured shipping method.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingMethod {
    /// Unique identifier.
    pub id: ShippingMethodId,
    /// Display name.
    pub name: String,
    /// Base shipping price.
    pub price: Money,
}

impl ShippingMethod {
    /// Create a new shipping method.
    pub fn new(id: impl Into<ShippingMethodId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }
}

/// Source of the store's shipping methods.
pub trait ShippingMethods {
    /// Shipping methods currently offered by the store.
    fn available_methods(&self) -> Result<Vec<ShippingMethod>, CartError>;
}
