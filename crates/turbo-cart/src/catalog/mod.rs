//! Product catalog module.
//!
//! Contains the product, variation and option types the cart reads, and the
//! [`Catalog`] trait through which it reads them.

mod inventory;
mod option;
mod product;

pub use inventory::InventoryLevel;
pub use option::ProductOption;
pub use product::{Product, ProductView, Variation};

use crate::error::CartError;
use crate::ids::{OptionGroupId, OptionItemId, ProductId, VariationId};

/// Read access to live catalog data.
///
/// `Ok(None)` means the entity does not exist (any more); `Err` means the
/// catalog could not be asked.
pub trait Catalog {
    /// Look up a product.
    fn product(&self, id: &ProductId) -> Result<Option<Product>, CartError>;

    /// Look up a variation.
    fn variation(&self, id: &VariationId) -> Result<Option<Variation>, CartError>;

    /// Find the variation of a product selected by a set of option items.
    ///
    /// The returned variation contains every given item. A variation with
    /// exactly those items is preferred; a wider one may still be returned,
    /// which callers detect by comparing option counts.
    fn variation_by_option_items(
        &self,
        product_id: &ProductId,
        items: &[OptionItemId],
    ) -> Result<Option<Variation>, CartError>;

    /// Look up an option group.
    fn option_group(&self, id: &OptionGroupId) -> Result<Option<ProductOption>, CartError>;
}
