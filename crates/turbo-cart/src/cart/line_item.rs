//! Stored and resolved cart line items.

use crate::cart::attributes::Attributes;
use crate::catalog::ProductView;
use crate::ids::{ProductId, VariationId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A line of the cart as kept in the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLineItem {
    /// The product on this line.
    pub product_id: ProductId,
    /// Quantity, never negative.
    pub quantity: i64,
    /// Selected variation, for products with variations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation_id: Option<VariationId>,
    /// Price entered by the shopper.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_price: Option<Money>,
    /// Submitted option values.
    #[serde(default)]
    pub attributes: Attributes,
}

impl CartLineItem {
    /// Create a new line item.
    pub fn new(product_id: impl Into<ProductId>, quantity: i64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            variation_id: None,
            customer_price: None,
            attributes: Attributes::new(),
        }
    }

    pub fn with_variation(mut self, variation_id: impl Into<VariationId>) -> Self {
        self.variation_id = Some(variation_id.into());
        self
    }

    pub fn with_customer_price(mut self, price: Money) -> Self {
        self.customer_price = Some(price);
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Whether an add of `other` should merge into this line.
    ///
    /// Lines merge on product and identical attribute selections. A line
    /// carrying its own customer price always stays separate.
    pub fn merges_with(&self, other: &CartLineItem) -> bool {
        other.customer_price.is_none()
            && self.product_id == other.product_id
            && self.attributes == other.attributes
    }
}

/// A stored line bound to the live product it refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLineItem {
    pub item: CartLineItem,
    pub product: ProductView,
}

impl ResolvedLineItem {
    pub fn new(item: CartLineItem, product: ProductView) -> Self {
        Self { item, product }
    }

    pub fn quantity(&self) -> i64 {
        self.item.quantity
    }

    /// Line weight in the store's weight unit.
    pub fn weight(&self) -> f64 {
        self.product.weight() * self.item.quantity as f64
    }
}
