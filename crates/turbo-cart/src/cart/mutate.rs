//! Cart mutations: add, update, remove and clear.
//!
//! An add request is validated completely before anything is written; a
//! rejected request leaves the cart and the session untouched.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::cart::attributes::{decode_fields, AttributeKind};
use crate::cart::line_item::{CartLineItem, ResolvedLineItem};
use crate::cart::service::CartService;
use crate::catalog::ProductView;
use crate::error::CartError;
use crate::ids::{OptionGroupId, OptionItemId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// An add-to-cart form submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddToCart {
    pub product_id: ProductId,
    pub quantity: i64,
    /// Price entered by the shopper, for products that allow it.
    #[serde(default)]
    pub customer_price: Option<Money>,
    /// Raw option fields keyed by prefixed field name (`po12`, `pt3`, ...).
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl AddToCart {
    pub fn new(product_id: impl Into<ProductId>, quantity: i64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            customer_price: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_customer_price(mut self, price: Money) -> Self {
        self.customer_price = Some(price);
        self
    }

    /// Add a submitted form field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

/// Why an add request was turned down.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AddRejection {
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Customer price {0} is outside the accepted range")]
    CustomerPriceOutOfRange(Money),

    #[error("No value selected for option list {0}")]
    EmptyOptionSelection(OptionGroupId),

    #[error("Unknown option group: {0}")]
    UnknownOption(OptionGroupId),

    #[error("Required option {0} has no value")]
    RequiredOptionMissing(OptionGroupId),

    #[error("Product {0} has variations but none was selected")]
    VariationNotSelected(ProductId),

    #[error("Selected options do not match a variation of product {0}")]
    VariationNotMatched(ProductId),
}

/// Outcome of an add request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartOperationResult {
    /// Units actually added, never negative.
    pub quantity_added: i64,
    /// The request was rejected and nothing changed.
    pub error: bool,
    /// The added product is exclusive.
    pub exclusive: bool,
    /// Exclusive lines already in the cart were removed.
    pub removed_existing_exclusive: bool,
    /// Reason for a rejection.
    pub rejection: Option<AddRejection>,
}

impl CartOperationResult {
    fn rejected(rejection: AddRejection) -> Self {
        Self {
            error: true,
            rejection: Some(rejection),
            ..Self::default()
        }
    }
}

/// A quantity change for one cart line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineUpdate {
    /// Position of the line in the cart.
    pub line: usize,
    pub quantity: i64,
}

impl LineUpdate {
    pub fn new(line: usize, quantity: i64) -> Self {
        Self { line, quantity }
    }
}

/// Outcome of a quantity change.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateResult {
    /// Quantity the line now has.
    pub quantity_applied: i64,
    /// The line was removed.
    pub removed: bool,
}

/// A validated add request.
struct PreparedAdd {
    item: CartLineItem,
    product: ProductView,
}

impl CartService<'_> {
    /// Add a product to the cart.
    ///
    /// Validation failures come back as a result with `error` set; only
    /// gateway failures are errors.
    pub fn add(&mut self, request: &AddToCart) -> Result<CartOperationResult, CartError> {
        let PreparedAdd { item, product } = match self.prepare_add(request)? {
            Ok(prepared) => prepared,
            Err(rejection) => {
                warn!(product_id = %request.product_id, reason = %rejection, "add to cart rejected");
                return Ok(CartOperationResult::rejected(rejection));
            }
        };

        self.reset_shipping_method()?;

        let exclusive = product.is_exclusive();
        let mut lines: Vec<ResolvedLineItem> = if exclusive {
            info!(product_id = %item.product_id, "clearing cart for exclusive product");
            Vec::new()
        } else {
            self.cart()?.items.clone()
        };

        let before = lines.len();
        lines.retain(|line| !line.product.is_exclusive());
        let removed_existing_exclusive = lines.len() < before;

        let inventory = product.inventory();
        let existing = lines.iter().position(|line| line.item.merges_with(&item));
        let quantity_added = match existing {
            Some(index) => {
                let existing = &mut lines[index];
                let current = existing.item.quantity;
                let merged = if product.allows_quantity() {
                    inventory.clamp(current.saturating_add(item.quantity))
                } else {
                    1
                };
                existing.item.quantity = merged;
                (merged - current).max(0)
            }
            None => {
                let requested = if product.allows_quantity() {
                    item.quantity
                } else {
                    item.quantity.min(1)
                };
                let quantity = inventory.clamp(requested);
                if quantity > 0 {
                    let item = CartLineItem { quantity, ..item };
                    lines.push(ResolvedLineItem::new(item, product));
                }
                quantity.max(0)
            }
        };

        let stored: Vec<CartLineItem> = lines.into_iter().map(|line| line.item).collect();
        self.commit(&stored)?;

        debug!(
            product_id = %request.product_id,
            requested = request.quantity,
            quantity_added,
            "added to cart"
        );

        Ok(CartOperationResult {
            quantity_added,
            error: false,
            exclusive,
            removed_existing_exclusive,
            rejection: None,
        })
    }

    /// Set the quantity of a line.
    ///
    /// A quantity of zero or less removes the line, as does a product that
    /// can no longer be found. Positions past the end are ignored.
    pub fn update(&mut self, line: usize, quantity: i64) -> Result<UpdateResult, CartError> {
        self.reset_shipping_method()?;

        let mut items = self.cart()?.stored_items();
        let Some(item) = items.get(line).cloned() else {
            debug!(line, "ignoring update of missing cart line");
            return Ok(UpdateResult::default());
        };

        if quantity <= 0 {
            return self.remove_for_update(line);
        }

        let catalog = self.gateways.catalog;
        let Some(product) = catalog.product(&item.product_id)? else {
            return self.remove_for_update(line);
        };
        let product = Arc::new(product);
        let view = match &item.variation_id {
            Some(variation_id) => match catalog.variation(variation_id)? {
                Some(variation) => ProductView::with_variation(product, variation),
                None => return self.remove_for_update(line),
            },
            None => ProductView::new(product),
        };

        let mut applied = view.inventory().clamp(quantity);
        if !view.allows_quantity() {
            applied = applied.min(1);
        }
        if applied <= 0 {
            return self.remove_for_update(line);
        }

        items[line].quantity = applied;
        self.commit(&items)?;

        debug!(product_id = %item.product_id, line, requested = quantity, applied, "updated cart line");

        Ok(UpdateResult {
            quantity_applied: applied,
            removed: false,
        })
    }

    /// Apply several quantity changes in order.
    ///
    /// Each change sees the cart as left by the previous one, so line
    /// positions shift after a removal.
    pub fn update_multiple(&mut self, updates: &[LineUpdate]) -> Result<Vec<UpdateResult>, CartError> {
        self.reset_shipping_method()?;
        updates
            .iter()
            .map(|update| self.update(update.line, update.quantity))
            .collect()
    }

    /// Remove a line. Returns `false` if there is no such line.
    pub fn remove(&mut self, line: usize) -> Result<bool, CartError> {
        self.reset_shipping_method()?;

        let mut items = self.cart()?.stored_items();
        if line >= items.len() {
            debug!(line, "ignoring removal of missing cart line");
            return Ok(false);
        }

        let removed = items.remove(line);
        self.commit(&items)?;

        debug!(product_id = %removed.product_id, line, "removed cart line");
        Ok(true)
    }

    /// Empty the cart.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.reset_shipping_method()?;
        self.commit(&[])?;
        info!("cleared cart");
        Ok(())
    }

    fn remove_for_update(&mut self, line: usize) -> Result<UpdateResult, CartError> {
        let removed = self.remove(line)?;
        Ok(UpdateResult {
            quantity_applied: 0,
            removed,
        })
    }

    /// Validate an add request without touching the cart.
    fn prepare_add(&self, request: &AddToCart) -> Result<Result<PreparedAdd, AddRejection>, CartError> {
        let catalog = self.gateways.catalog;

        let Some(product) = catalog.product(&request.product_id)? else {
            return Ok(Err(AddRejection::ProductNotFound(request.product_id.clone())));
        };

        let customer_price = if product.allow_customer_price {
            let price = request
                .customer_price
                .unwrap_or_else(|| Money::zero(self.config.currency));
            if !price.is_within(product.price_min, product.price_max) {
                return Ok(Err(AddRejection::CustomerPriceOutOfRange(price)));
            }
            request.customer_price.filter(Money::is_positive)
        } else {
            None
        };

        let attributes = decode_fields(&request.fields);
        let mut variation_items = Vec::new();
        for (key, value) in &attributes {
            let empty = value.trim().is_empty();
            let option_list = key.kind == AttributeKind::OptionList;
            if option_list && empty {
                return Ok(Err(AddRejection::EmptyOptionSelection(key.group_id.clone())));
            }

            let Some(option) = catalog.option_group(&key.group_id)? else {
                return Ok(Err(AddRejection::UnknownOption(key.group_id.clone())));
            };
            if option.is_required() && empty {
                return Ok(Err(AddRejection::RequiredOptionMissing(key.group_id.clone())));
            }
            if option_list && option.includes_variations() {
                variation_items.push(OptionItemId::new(value.trim()));
            }
        }

        let product = Arc::new(product);
        let mut item = CartLineItem::new(request.product_id.clone(), request.quantity.max(0))
            .with_attributes(attributes);
        item.customer_price = customer_price;

        if !product.has_variations {
            return Ok(Ok(PreparedAdd {
                item,
                product: ProductView::new(product),
            }));
        }

        if variation_items.is_empty() {
            return Ok(Err(AddRejection::VariationNotSelected(request.product_id.clone())));
        }

        let variation = catalog
            .variation_by_option_items(&product.id, &variation_items)?
            .filter(|variation| {
                variation.product_id == product.id
                    && variation.options().len() == variation_items.len()
            });
        let Some(variation) = variation else {
            return Ok(Err(AddRejection::VariationNotMatched(request.product_id.clone())));
        };

        item.variation_id = Some(variation.id.clone());
        Ok(Ok(PreparedAdd {
            item,
            product: ProductView::with_variation(product, variation),
        }))
    }
}
