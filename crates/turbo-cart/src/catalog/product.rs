//! Product, variation and the variation-scoped product view.

use std::sync::Arc;

use crate::catalog::InventoryLevel;
use crate::ids::{OptionItemId, ProductGroupId, ProductId, UserGroupId, VariationId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product as the catalog currently knows it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Stock keeping unit.
    pub sku: String,
    /// Product name.
    pub name: String,
    /// List price.
    pub price: Money,
    /// Shoppers may enter their own price.
    pub allow_customer_price: bool,
    /// Lowest accepted customer price.
    pub price_min: Option<Money>,
    /// Highest accepted customer price.
    pub price_max: Option<Money>,
    /// Shoppers may buy more than one per line.
    pub allow_quantity: bool,
    /// Stock state.
    pub inventory: InventoryLevel,
    /// Must be the only product in the cart.
    pub exclusive: bool,
    /// Purchasable only as one of its variations.
    pub has_variations: bool,
    /// Needs shipping.
    pub shippable: bool,
    /// Weight per unit, in the store's weight unit.
    pub weight: f64,
    /// User groups a purchase grants membership of.
    pub user_groups: Vec<UserGroupId>,
    /// Comes with a digital download.
    pub digital_download: bool,
    /// Purchase creates a customer account.
    pub creates_login: bool,
    /// Product groups used to scope discount rules.
    pub group_ids: Vec<ProductGroupId>,
}

impl Product {
    /// Create a shippable product with untracked stock.
    pub fn new(
        id: impl Into<ProductId>,
        sku: impl Into<String>,
        name: impl Into<String>,
        price: Money,
    ) -> Self {
        Self {
            id: id.into(),
            sku: sku.into(),
            name: name.into(),
            price,
            allow_customer_price: false,
            price_min: None,
            price_max: None,
            allow_quantity: true,
            inventory: InventoryLevel::unlimited(),
            exclusive: false,
            has_variations: false,
            shippable: true,
            weight: 0.0,
            user_groups: Vec::new(),
            digital_download: false,
            creates_login: false,
            group_ids: Vec::new(),
        }
    }

    /// Set the stock state.
    pub fn with_inventory(mut self, inventory: InventoryLevel) -> Self {
        self.inventory = inventory;
        self
    }

    /// Add the product to a product group.
    pub fn in_group(mut self, group_id: impl Into<ProductGroupId>) -> Self {
        let group_id = group_id.into();
        if !self.group_ids.contains(&group_id) {
            self.group_ids.push(group_id);
        }
        self
    }
}

/// A priced, stocked combination of option items of one product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variation {
    /// Unique variation identifier.
    pub id: VariationId,
    /// Parent product ID.
    pub product_id: ProductId,
    /// Option items that select this variation.
    pub options: Vec<OptionItemId>,
    /// Overrides the product SKU.
    pub sku: Option<String>,
    /// Overrides the product price.
    pub price: Option<Money>,
    /// Overrides the product weight.
    pub weight: Option<f64>,
    /// Quantity on hand for this variation.
    pub quantity: i64,
    /// Stock is not tracked for this variation.
    pub unlimited: bool,
}

impl Variation {
    /// Create a variation with tracked stock.
    pub fn new(
        id: impl Into<VariationId>,
        product_id: impl Into<ProductId>,
        options: Vec<OptionItemId>,
        quantity: i64,
    ) -> Self {
        Self {
            id: id.into(),
            product_id: product_id.into(),
            options,
            sku: None,
            price: None,
            weight: None,
            quantity,
            unlimited: false,
        }
    }

    /// Option items that select this variation.
    pub fn options(&self) -> &[OptionItemId] {
        &self.options
    }
}

/// A product as seen through an optional selected variation.
///
/// The variation overrides price, SKU, weight and stock; everything else
/// comes from the product. The catalog's product is shared, never copied
/// or modified.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductView {
    product: Arc<Product>,
    variation: Option<Arc<Variation>>,
}

impl ProductView {
    pub fn new(product: Arc<Product>) -> Self {
        Self {
            product,
            variation: None,
        }
    }

    pub fn with_variation(product: Arc<Product>, variation: Variation) -> Self {
        Self {
            product,
            variation: Some(Arc::new(variation)),
        }
    }

    /// The underlying catalog product.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// The bound variation, if any.
    pub fn variation(&self) -> Option<&Variation> {
        self.variation.as_deref()
    }

    pub fn id(&self) -> &ProductId {
        &self.product.id
    }

    pub fn name(&self) -> &str {
        &self.product.name
    }

    pub fn sku(&self) -> &str {
        self.variation
            .as_ref()
            .and_then(|v| v.sku.as_deref())
            .unwrap_or(&self.product.sku)
    }

    pub fn price(&self) -> Money {
        self.variation
            .as_ref()
            .and_then(|v| v.price)
            .unwrap_or(self.product.price)
    }

    /// Effective stock state. Back-orders are a product-level setting.
    pub fn inventory(&self) -> InventoryLevel {
        match &self.variation {
            Some(variation) => InventoryLevel {
                quantity: variation.quantity,
                unlimited: variation.unlimited,
                allow_backorders: self.product.inventory.allow_backorders,
            },
            None => self.product.inventory,
        }
    }

    pub fn allows_quantity(&self) -> bool {
        self.product.allow_quantity
    }

    pub fn is_unlimited(&self) -> bool {
        self.inventory().unlimited
    }

    pub fn allows_back_orders(&self) -> bool {
        self.product.inventory.allow_backorders
    }

    pub fn available_qty(&self) -> i64 {
        self.inventory().available()
    }

    pub fn is_exclusive(&self) -> bool {
        self.product.exclusive
    }

    pub fn allows_customer_price(&self) -> bool {
        self.product.allow_customer_price
    }

    pub fn price_min(&self) -> Option<Money> {
        self.product.price_min
    }

    pub fn price_max(&self) -> Option<Money> {
        self.product.price_max
    }

    pub fn has_variations(&self) -> bool {
        self.product.has_variations
    }

    pub fn is_shippable(&self) -> bool {
        self.product.shippable
    }

    /// Weight per unit in the store's weight unit.
    pub fn weight(&self) -> f64 {
        self.variation
            .as_ref()
            .and_then(|v| v.weight)
            .unwrap_or(self.product.weight)
    }

    pub fn has_user_groups(&self) -> bool {
        !self.product.user_groups.is_empty()
    }

    pub fn has_digital_download(&self) -> bool {
        self.product.digital_download
    }

    pub fn creates_login(&self) -> bool {
        self.product.creates_login
    }

    pub fn group_ids(&self) -> &[ProductGroupId] {
        &self.product.group_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn shirt() -> Product {
        let mut product = Product::new("p1", "SHIRT", "Shirt", Money::new(2000, Currency::USD))
            .with_inventory(InventoryLevel::backorderable(10));
        product.weight = 250.0;
        product
    }

    #[test]
    fn test_product_defaults() {
        let product = Product::new("p1", "SKU-1", "Thing", Money::new(100, Currency::USD));
        assert!(product.allow_quantity);
        assert!(product.shippable);
        assert!(!product.inventory.is_limited());
    }

    #[test]
    fn test_in_group_deduplicates() {
        let product = Product::new("p1", "SKU-1", "Thing", Money::default())
            .in_group("sale")
            .in_group("sale");
        assert_eq!(product.group_ids, vec![ProductGroupId::new("sale")]);
    }

    #[test]
    fn test_plain_view() {
        let view = ProductView::new(Arc::new(shirt()));
        assert_eq!(view.sku(), "SHIRT");
        assert_eq!(view.price().amount_cents, 2000);
        assert_eq!(view.available_qty(), 10);
        assert_eq!(view.weight(), 250.0);
        assert!(view.variation().is_none());
    }

    #[test]
    fn test_variation_overlay() {
        let product = Arc::new(shirt());
        let mut variation = Variation::new("v1", "p1", vec![OptionItemId::new("large")], 3);
        variation.sku = Some("SHIRT-L".to_string());
        variation.price = Some(Money::new(2500, Currency::USD));
        variation.weight = Some(300.0);

        let view = ProductView::with_variation(product.clone(), variation);
        assert_eq!(view.sku(), "SHIRT-L");
        assert_eq!(view.price().amount_cents, 2500);
        assert_eq!(view.weight(), 300.0);
        assert_eq!(view.available_qty(), 3);
        assert!(view.allows_back_orders());

        // The shared product is untouched.
        assert_eq!(product.sku, "SHIRT");
        assert_eq!(product.inventory.quantity, 10);
    }

    #[test]
    fn test_variation_without_overrides_falls_back() {
        let view = ProductView::with_variation(
            Arc::new(shirt()),
            Variation::new("v1", "p1", Vec::new(), 1),
        );
        assert_eq!(view.price().amount_cents, 2000);
        assert_eq!(view.weight(), 250.0);
    }
}
