//! Reconciliation of stored line items against the live catalog.
//!
//! Products disappear, variations get deleted and stock runs out between
//! requests. Every read of the cart passes the stored lines through
//! [`reconcile`], which drops or clamps whatever no longer holds and reports
//! whether anything was corrected.

use std::sync::Arc;

use crate::cart::line_item::{CartLineItem, ResolvedLineItem};
use crate::catalog::{Catalog, ProductView};
use crate::error::CartError;
use tracing::debug;

/// Outcome of a reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciled {
    /// Surviving lines, in stored order.
    pub items: Vec<ResolvedLineItem>,
    /// Some line was dropped or its quantity corrected.
    pub changed: bool,
}

impl Reconciled {
    /// The surviving lines in their stored form.
    pub fn stored(&self) -> Vec<CartLineItem> {
        self.items.iter().map(|line| line.item.clone()).collect()
    }
}

/// Validate stored lines against the catalog.
///
/// Lines without a positive quantity are dropped.
/// Running this on its own output changes nothing.
pub fn reconcile(catalog: &dyn Catalog, items: &[CartLineItem]) -> Result<Reconciled, CartError> {
    let mut reconciled = Reconciled::default();

    for stored in items {
        let mut item = stored.clone();

        if item.quantity <= 0 {
            debug!(
                product_id = %item.product_id,
                quantity = item.quantity,
                "dropping cart line: no quantity"
            );
            reconciled.changed = true;
            continue;
        }

        let Some(product) = catalog.product(&item.product_id)? else {
            debug!(product_id = %item.product_id, "dropping cart line: product no longer exists");
            reconciled.changed = true;
            continue;
        };
        let product = Arc::new(product);

        if !product.allow_quantity && item.quantity > 1 {
            debug!(
                product_id = %item.product_id,
                quantity = item.quantity,
                "clamping cart line to a single unit"
            );
            item.quantity = 1;
            reconciled.changed = true;
        }

        let view = match &item.variation_id {
            Some(variation_id) => {
                let Some(variation) = catalog.variation(variation_id)? else {
                    debug!(
                        product_id = %item.product_id,
                        variation_id = %variation_id,
                        "dropping cart line: variation no longer exists"
                    );
                    reconciled.changed = true;
                    continue;
                };
                ProductView::with_variation(product, variation)
            }
            None => ProductView::new(product),
        };

        let inventory = view.inventory();
        if inventory.is_limited() && item.quantity > inventory.available() {
            let available = inventory.available();
            reconciled.changed = true;
            if available == 0 {
                debug!(
                    product_id = %item.product_id,
                    quantity = item.quantity,
                    "dropping cart line: out of stock"
                );
                continue;
            }
            debug!(
                product_id = %item.product_id,
                old_quantity = item.quantity,
                new_quantity = available,
                "clamping cart line to available stock"
            );
            item.quantity = available;
        }

        reconciled.items.push(ResolvedLineItem::new(item, view));
    }

    Ok(reconciled)
}
