//! In-memory gateways.
//!
//! Reference implementations of the collaborator traits, for hosts without
//! a backing store and for tests. All of them can be shared between
//! threads behind an `Arc`.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::cart::{DiscountRule, DiscountRules};
use crate::catalog::{Catalog, Product, ProductOption, Variation};
use crate::customer::Customer;
use crate::error::CartError;
use crate::ids::{OptionGroupId, OptionItemId, ProductId, VariationId};
use crate::session::{SessionKey, SessionStore};
use crate::shipping::{ShippingMethod, ShippingMethods};

fn read<'a, T>(
    lock: &'a RwLock<T>,
    error: fn(String) -> CartError,
) -> Result<RwLockReadGuard<'a, T>, CartError> {
    lock.read().map_err(|e| error(e.to_string()))
}

fn write<'a, T>(
    lock: &'a RwLock<T>,
    error: fn(String) -> CartError,
) -> Result<RwLockWriteGuard<'a, T>, CartError> {
    lock.write().map_err(|e| error(e.to_string()))
}

/// Setup writes keep going after a panicked writer.
fn setup<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Catalog held in memory.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    products: RwLock<BTreeMap<ProductId, Product>>,
    variations: RwLock<BTreeMap<VariationId, Variation>>,
    options: RwLock<BTreeMap<OptionGroupId, ProductOption>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a product.
    pub fn insert_product(&self, product: Product) {
        setup(&self.products).insert(product.id.clone(), product);
    }

    /// Remove a product. Returns `true` if it existed.
    pub fn remove_product(&self, id: &ProductId) -> bool {
        setup(&self.products).remove(id).is_some()
    }

    /// Insert or replace a variation.
    pub fn insert_variation(&self, variation: Variation) {
        setup(&self.variations).insert(variation.id.clone(), variation);
    }

    pub fn remove_variation(&self, id: &VariationId) -> bool {
        setup(&self.variations).remove(id).is_some()
    }

    /// Insert or replace an option group.
    pub fn insert_option(&self, option: ProductOption) {
        setup(&self.options).insert(option.id.clone(), option);
    }

    /// Set the quantity on hand of a product. Returns `false` if unknown.
    pub fn set_stock(&self, id: &ProductId, quantity: i64) -> bool {
        match setup(&self.products).get_mut(id) {
            Some(product) => {
                product.inventory.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Set the quantity on hand of a variation. Returns `false` if unknown.
    pub fn set_variation_stock(&self, id: &VariationId, quantity: i64) -> bool {
        match setup(&self.variations).get_mut(id) {
            Some(variation) => {
                variation.quantity = quantity;
                true
            }
            None => false,
        }
    }
}

impl Catalog for MemoryCatalog {
    fn product(&self, id: &ProductId) -> Result<Option<Product>, CartError> {
        Ok(read(&self.products, CartError::Catalog)?.get(id).cloned())
    }

    fn variation(&self, id: &VariationId) -> Result<Option<Variation>, CartError> {
        Ok(read(&self.variations, CartError::Catalog)?.get(id).cloned())
    }

    fn variation_by_option_items(
        &self,
        product_id: &ProductId,
        items: &[OptionItemId],
    ) -> Result<Option<Variation>, CartError> {
        if items.is_empty() {
            return Ok(None);
        }
        let variations = read(&self.variations, CartError::Catalog)?;
        let candidates: Vec<&Variation> = variations
            .values()
            .filter(|variation| {
                &variation.product_id == product_id
                    && items.iter().all(|item| variation.options.contains(item))
            })
            .collect();
        let exact = candidates
            .iter()
            .find(|variation| variation.options.len() == items.len());
        Ok(exact.or(candidates.first()).map(|variation| (*variation).clone()))
    }

    fn option_group(&self, id: &OptionGroupId) -> Result<Option<ProductOption>, CartError> {
        Ok(read(&self.options, CartError::Catalog)?.get(id).cloned())
    }
}

/// Discount rules held in memory.
///
/// Codes match case-insensitively. Rules restricted to user groups are
/// only offered to members of those groups.
#[derive(Debug, Default)]
pub struct MemoryDiscounts {
    rules: RwLock<Vec<DiscountRule>>,
}

impl MemoryDiscounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(self, rule: DiscountRule) -> Self {
        self.insert_rule(rule);
        self
    }

    pub fn insert_rule(&self, rule: DiscountRule) {
        setup(&self.rules).push(rule);
    }

    fn matching(
        &self,
        customer: &Customer,
        keep: impl Fn(&DiscountRule) -> bool,
    ) -> Result<Vec<DiscountRule>, CartError> {
        Ok(read(&self.rules, CartError::Discounts)?
            .iter()
            .filter(|rule| rule.offered_to(customer) && keep(rule))
            .cloned()
            .collect())
    }
}

impl DiscountRules for MemoryDiscounts {
    fn automatic_discounts(&self, customer: &Customer) -> Result<Vec<DiscountRule>, CartError> {
        self.matching(customer, |rule| rule.code().is_none())
    }

    fn discounts_by_code(
        &self,
        code: &str,
        customer: &Customer,
    ) -> Result<Vec<DiscountRule>, CartError> {
        self.matching(customer, |rule| {
            rule.code().is_some_and(|rule_code| rule_code.eq_ignore_ascii_case(code))
        })
    }
}

/// Shipping methods held in memory.
#[derive(Debug, Default)]
pub struct MemoryShipping {
    methods: RwLock<Vec<ShippingMethod>>,
}

impl MemoryShipping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(self, method: ShippingMethod) -> Self {
        setup(&self.methods).push(method);
        self
    }
}

impl ShippingMethods for MemoryShipping {
    fn available_methods(&self) -> Result<Vec<ShippingMethod>, CartError> {
        Ok(read(&self.methods, CartError::Shipping)?.clone())
    }
}

/// Session values held in memory.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: RwLock<HashMap<SessionKey, serde_json::Value>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: SessionKey) -> Result<Option<serde_json::Value>, CartError> {
        Ok(read(&self.values, CartError::Session)?.get(&key).cloned())
    }

    fn set(&self, key: SessionKey, value: serde_json::Value) -> Result<(), CartError> {
        write(&self.values, CartError::Session)?.insert(key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::DiscountValue;
    use crate::money::Money;

    #[test]
    fn test_catalog_lookups() {
        let catalog = MemoryCatalog::new();
        catalog.insert_product(Product::new("p1", "SKU", "Thing", Money::default()));

        assert!(catalog.product(&ProductId::new("p1")).unwrap().is_some());
        assert!(catalog.product(&ProductId::new("p2")).unwrap().is_none());

        assert!(catalog.set_stock(&ProductId::new("p1"), 7));
        assert_eq!(
            catalog.product(&ProductId::new("p1")).unwrap().unwrap().inventory.quantity,
            7
        );

        assert!(catalog.remove_product(&ProductId::new("p1")));
        assert!(catalog.product(&ProductId::new("p1")).unwrap().is_none());
    }

    #[test]
    fn test_variation_by_option_items() {
        let catalog = MemoryCatalog::new();
        let red_large = Variation::new(
            "v1",
            "p1",
            vec![OptionItemId::new("red"), OptionItemId::new("large")],
            1,
        );
        catalog.insert_variation(red_large);
        let p1 = ProductId::new("p1");

        let found = catalog
            .variation_by_option_items(&p1, &[OptionItemId::new("large"), OptionItemId::new("red")])
            .unwrap();
        assert_eq!(found.map(|v| v.id), Some(VariationId::new("v1")));

        let partial = catalog
            .variation_by_option_items(&p1, &[OptionItemId::new("red")])
            .unwrap()
            .unwrap();
        assert_eq!(partial.options().len(), 2);

        assert!(catalog.variation_by_option_items(&p1, &[]).unwrap().is_none());
        assert!(catalog
            .variation_by_option_items(&p1, &[OptionItemId::new("blue")])
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_variation_lookup_prefers_exact_match() {
        let catalog = MemoryCatalog::new();
        catalog.insert_variation(Variation::new(
            "v-a",
            "shirt",
            vec![OptionItemId::new("red"), OptionItemId::new("large")],
            1,
        ));
        catalog.insert_variation(Variation::new("v-b", "shirt", vec![OptionItemId::new("red")], 1));

        let found = catalog
            .variation_by_option_items(&ProductId::new("shirt"), &[OptionItemId::new("red")])
            .unwrap();
        assert_eq!(found.map(|v| v.id), Some(VariationId::new("v-b")));
    }

    #[test]
    fn test_variation_lookup_scoped_to_product() {
        let catalog = MemoryCatalog::new();
        catalog.insert_variation(Variation::new("hat-l", "hat", vec![OptionItemId::new("large")], 1));
        catalog.insert_variation(Variation::new("tee-l", "tee", vec![OptionItemId::new("large")], 1));

        let found = catalog
            .variation_by_option_items(&ProductId::new("tee"), &[OptionItemId::new("large")])
            .unwrap();
        assert_eq!(found.map(|v| v.id), Some(VariationId::new("tee-l")));
        assert!(catalog
            .variation_by_option_items(&ProductId::new("cap"), &[OptionItemId::new("large")])
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_discount_codes() {
        let discounts = MemoryDiscounts::new()
            .with_rule(DiscountRule::automatic("auto", "Auto", DiscountValue::FreeShipping))
            .with_rule(DiscountRule::with_code(
                "code",
                "Code",
                "Save10",
                DiscountValue::Percentage(10.0),
            ))
            .with_rule(
                DiscountRule::with_code("vip", "VIP", "SAVE10", DiscountValue::Percentage(20.0))
                    .for_user_group("vip"),
            );

        let automatic = discounts.automatic_discounts(&Customer::Guest).unwrap();
        assert_eq!(automatic.len(), 1);

        let guest = discounts.discounts_by_code("SAVE10", &Customer::Guest).unwrap();
        assert_eq!(guest.len(), 1);

        let vip = Customer::member("u1", vec!["vip".into()]);
        assert_eq!(discounts.discounts_by_code("save10", &vip).unwrap().len(), 2);
    }

    #[test]
    fn test_session_store() {
        let session = MemorySessionStore::new();
        assert_eq!(session.get(SessionKey::Cart).unwrap(), None);

        session.set(SessionKey::Cart, serde_json::json!([])).unwrap();
        assert_eq!(session.get(SessionKey::Cart).unwrap(), Some(serde_json::json!([])));
        assert_eq!(session.get(SessionKey::DiscountCode).unwrap(), None);
    }
}
