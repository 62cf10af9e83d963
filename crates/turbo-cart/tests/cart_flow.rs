//! End-to-end cart scenarios over the in-memory gateways.

use turbo_cart::cart::{DiscountRule, DiscountValue};
use turbo_cart::memory::{MemoryCatalog, MemoryDiscounts, MemorySessionStore, MemoryShipping};
use turbo_cart::prelude::*;

fn usd(cents: i64) -> Money {
    Money::new(cents, Currency::USD)
}

struct Storefront {
    catalog: MemoryCatalog,
    discounts: MemoryDiscounts,
    shipping: MemoryShipping,
    session: MemorySessionStore,
    config: StoreConfig,
}

impl Storefront {
    fn new() -> Self {
        let catalog = MemoryCatalog::new();
        catalog.insert_product(
            Product::new("mug", "MUG", "Mug", usd(1200)).with_inventory(InventoryLevel::new(5)),
        );
        catalog.insert_product(Product::new("pen", "PEN", "Pen", usd(300)).in_group("stationery"));
        let mut membership = Product::new("club", "CLUB", "Club membership", usd(9900));
        membership.exclusive = true;
        membership.shippable = false;
        membership.allow_quantity = false;
        catalog.insert_product(membership);

        Self {
            catalog,
            discounts: MemoryDiscounts::new(),
            shipping: MemoryShipping::new().with_method(ShippingMethod::new(
                "ground",
                "Ground",
                usd(500),
            )),
            session: MemorySessionStore::new(),
            config: StoreConfig::default(),
        }
    }

    /// A fresh request against the same session.
    fn request(&self) -> CartService<'_> {
        CartService::new(
            Gateways::new(&self.catalog, &self.discounts, &self.shipping),
            &self.session,
            &self.config,
        )
    }

    fn lines(&self) -> Vec<(String, i64)> {
        self.request()
            .items()
            .unwrap()
            .iter()
            .map(|line| (line.item.product_id.to_string(), line.item.quantity))
            .collect()
    }
}

#[test]
fn test_add_to_existing_line_clamps_to_stock() {
    let store = Storefront::new();
    store.request().add(&AddToCart::new("mug", 2)).unwrap();

    let result = store.request().add(&AddToCart::new("mug", 10)).unwrap();

    assert!(!result.error);
    assert_eq!(result.quantity_added, 3);
    assert_eq!(store.lines(), vec![("mug".to_string(), 5)]);
}

#[test]
fn test_identical_adds_merge() {
    let store = Storefront::new();
    store.catalog.insert_option(ProductOption::new("7", "Engraving"));
    let engraved = AddToCart::new("pen", 1).with_field("pt7", "Ada");

    store.request().add(&engraved).unwrap();
    store.request().add(&engraved).unwrap();
    store
        .request()
        .add(&AddToCart::new("pen", 1).with_field("pt7", "Grace"))
        .unwrap();

    assert_eq!(
        store.lines(),
        vec![("pen".to_string(), 2), ("pen".to_string(), 1)]
    );
}

#[test]
fn test_exclusive_product_replaces_cart() {
    let store = Storefront::new();
    let mut cart = store.request();
    cart.add(&AddToCart::new("mug", 1)).unwrap();
    cart.add(&AddToCart::new("pen", 3)).unwrap();

    let result = cart.add(&AddToCart::new("club", 1)).unwrap();

    assert!(result.exclusive);
    assert_eq!(result.quantity_added, 1);
    assert_eq!(store.lines(), vec![("club".to_string(), 1)]);
}

#[test]
fn test_adding_after_exclusive_removes_it() {
    let store = Storefront::new();
    let mut cart = store.request();
    cart.add(&AddToCart::new("club", 1)).unwrap();

    let result = cart.add(&AddToCart::new("pen", 2)).unwrap();

    assert!(result.removed_existing_exclusive);
    assert!(!result.exclusive);
    assert_eq!(store.lines(), vec![("pen".to_string(), 2)]);
}

#[test]
fn test_variation_product_without_options_is_rejected() {
    let store = Storefront::new();
    let mut shirt = Product::new("shirt", "SHIRT", "Shirt", usd(2000));
    shirt.has_variations = true;
    store.catalog.insert_product(shirt);
    let mut cart = store.request();
    cart.add(&AddToCart::new("mug", 1)).unwrap();
    let before = store.session.get(SessionKey::Cart).unwrap();

    let result = cart.add(&AddToCart::new("shirt", 1)).unwrap();

    assert!(result.error);
    assert_eq!(result.quantity_added, 0);
    assert_eq!(store.session.get(SessionKey::Cart).unwrap(), before);
}

#[test]
fn test_update_to_zero_removes_line() {
    let store = Storefront::new();
    let mut cart = store.request();
    cart.add(&AddToCart::new("mug", 2)).unwrap();

    let result = cart.update(0, 0).unwrap();

    assert!(result.removed);
    assert!(store.lines().is_empty());
}

#[test]
fn test_update_clamps_to_stock() {
    let store = Storefront::new();
    let mut cart = store.request();
    cart.add(&AddToCart::new("mug", 1)).unwrap();

    assert_eq!(cart.update(0, 50).unwrap().quantity_applied, 5);
    assert_eq!(cart.update(0, 3).unwrap().quantity_applied, 3);
    assert_eq!(store.lines(), vec![("mug".to_string(), 3)]);
}

#[test]
fn test_removed_line_stays_removed() {
    let store = Storefront::new();
    let mut cart = store.request();
    cart.add(&AddToCart::new("mug", 1)).unwrap();
    cart.add(&AddToCart::new("pen", 1)).unwrap();

    assert!(cart.remove(0).unwrap());

    assert_eq!(store.lines(), vec![("pen".to_string(), 1)]);
    assert_eq!(store.request().refresh().unwrap().len(), 1);
}

#[test]
fn test_stock_drop_between_requests() {
    let store = Storefront::new();
    store.request().add(&AddToCart::new("mug", 4)).unwrap();
    store.request().add(&AddToCart::new("pen", 1)).unwrap();

    store.catalog.set_stock(&ProductId::new("mug"), 2);
    let mut cart = store.request();
    assert!(cart.has_changed().unwrap());
    assert_eq!(cart.total_items().unwrap(), 3);

    store.catalog.set_stock(&ProductId::new("mug"), 0);
    assert_eq!(store.lines(), vec![("pen".to_string(), 1)]);

    // A corrected cart reads back unchanged.
    assert!(!store.request().has_changed().unwrap());
}

#[test]
fn test_unknown_code_is_cleared() {
    let store = Storefront::new();
    let mut cart = store.request();
    cart.add(&AddToCart::new("pen", 1)).unwrap();
    cart.set_discount_code("SAVE10").unwrap();

    let discounts = cart.discounts().unwrap();

    assert!(!discounts.has_code_rules);
    assert_eq!(cart.discount_code().unwrap(), None);
}

#[test]
fn test_discount_group_restrictions() {
    let mut store = Storefront::new();
    store.discounts = MemoryDiscounts::new()
        .with_rule(
            DiscountRule::automatic("pens", "Pens 10% off", DiscountValue::Percentage(10.0))
                .restricted_to("stationery"),
        )
        .with_rule(DiscountRule::with_code(
            "everything",
            "Five off",
            "FIVE",
            DiscountValue::Fixed(usd(500)),
        ));
    let mut cart = store.request();
    cart.add(&AddToCart::new("mug", 1)).unwrap();
    cart.add(&AddToCart::new("pen", 1)).unwrap();
    cart.set_discount_code("five").unwrap();

    let discounts = cart.discounts().unwrap().clone();

    assert!(discounts.has_code_rules);
    assert_eq!(discounts.rules.len(), 2);
    assert_eq!(discounts.rules_for_line(0), &[DiscountId::new("everything")]);
    assert_eq!(
        discounts.rules_for_line(1),
        &[DiscountId::new("pens"), DiscountId::new("everything")]
    );
    assert_eq!(cart.discount_code().unwrap().as_deref(), Some("five"));
}

#[test]
fn test_shippability_and_login() {
    let store = Storefront::new();
    let mut cart = store.request();
    cart.add(&AddToCart::new("club", 1)).unwrap();
    assert!(!cart.is_shippable().unwrap());

    cart.add(&AddToCart::new("mug", 1)).unwrap();
    assert!(cart.is_shippable().unwrap());
    assert!(!cart.requires_login().unwrap());
    assert!(!cart.creates_account().unwrap());
}

#[test]
fn test_weight_in_other_units() {
    let mut store = Storefront::new();
    store.config = StoreConfig::default().with_weight_unit(WeightUnit::Pound);
    let mut heavy = Product::new("anvil", "ANVIL", "Anvil", usd(10000));
    heavy.weight = 2.0;
    store.catalog.insert_product(heavy);
    let mut cart = store.request();
    cart.add(&AddToCart::new("anvil", 1)).unwrap();

    let grams = cart.cart_weight(Some(WeightUnit::Gram)).unwrap();
    assert!((grams - 907.184).abs() < 1e-6);

    let back = WeightUnit::Gram.convert(grams, WeightUnit::Pound);
    assert!((back - cart.cart_weight(None).unwrap()).abs() < 1e-9);
}

#[test]
fn test_mutations_reset_shipping_method() {
    let store = Storefront::new();
    let mut cart = store.request();
    cart.add(&AddToCart::new("mug", 1)).unwrap();
    cart.select_shipping_method(&ShippingMethodId::new("ground")).unwrap();
    assert!(cart.selected_shipping_method().unwrap().is_some());

    cart.update(0, 2).unwrap();
    assert_eq!(cart.selected_shipping_method().unwrap(), None);

    cart.select_shipping_method(&ShippingMethodId::new("ground")).unwrap();
    cart.clear().unwrap();
    assert_eq!(cart.selected_shipping_method().unwrap(), None);
    assert!(store.lines().is_empty());
}
