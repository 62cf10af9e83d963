//! Cart totals and checkout predicates.

use crate::cart::context::ResolvedCart;
use crate::cart::line_item::ResolvedLineItem;
use crate::cart::service::CartService;
use crate::error::CartError;
use crate::weight::WeightUnit;

impl ResolvedCart {
    /// Sum of line quantities.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(ResolvedLineItem::quantity).sum()
    }

    /// Lines whose product needs shipping.
    pub fn shippable_items(&self) -> impl Iterator<Item = &ResolvedLineItem> {
        self.items.iter().filter(|line| line.product.is_shippable())
    }

    /// Weight of the shippable lines in the store's weight unit.
    pub fn shippable_weight(&self) -> f64 {
        self.shippable_items().map(ResolvedLineItem::weight).sum()
    }

    /// Some product needs an account but does not create one itself.
    pub fn requires_login(&self) -> bool {
        self.items.iter().any(|line| {
            let product = &line.product;
            (product.has_user_groups() || product.has_digital_download()) && !product.creates_login()
        })
    }

    /// Some product creates a customer account on purchase.
    pub fn creates_account(&self) -> bool {
        self.items.iter().any(|line| line.product.creates_login())
    }
}

impl CartService<'_> {
    /// Total number of units in the cart.
    pub fn total_items(&mut self) -> Result<i64, CartError> {
        Ok(self.cart()?.total_quantity())
    }

    /// Lines that need shipping.
    pub fn shippable_items(&mut self) -> Result<Vec<ResolvedLineItem>, CartError> {
        Ok(self.cart()?.shippable_items().cloned().collect())
    }

    /// Weight of the shippable lines.
    ///
    /// Expressed in `unit`, or in the store's weight unit when `None`.
    pub fn cart_weight(&mut self, unit: Option<WeightUnit>) -> Result<f64, CartError> {
        let store_unit = self.config.weight_unit;
        let weight = self.cart()?.shippable_weight();
        Ok(match unit {
            Some(unit) if unit != store_unit => store_unit.convert(weight, unit),
            _ => weight,
        })
    }

    /// The cart has something to ship and the store can ship it.
    pub fn is_shippable(&mut self) -> Result<bool, CartError> {
        if self.cart()?.shippable_items().next().is_none() {
            return Ok(false);
        }
        Ok(!self.gateways.shipping.available_methods()?.is_empty())
    }

    pub fn requires_login(&mut self) -> Result<bool, CartError> {
        Ok(self.cart()?.requires_login())
    }

    pub fn creates_account(&mut self) -> Result<bool, CartError> {
        Ok(self.cart()?.creates_account())
    }
}
