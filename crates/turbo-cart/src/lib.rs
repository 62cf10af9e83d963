//! Storefront cart engine for TurboCommerce.
//!
//! Keeps a per-session list of cart lines and, on every read, reconciles it
//! against the live catalog, matches discount rules and derives totals:
//!
//! - **Catalog**: products, variations, option groups and the [`Catalog`] gateway
//! - **Cart**: line items, reconciliation, discounts, mutations and totals
//! - **Session**: the per-shopper [`SessionStore`] the cart lives in
//! - **Memory**: in-memory gateways for hosts and tests
//!
//! # Example
//!
//! ```rust
//! use turbo_cart::prelude::*;
//! use turbo_cart::memory::{MemoryCatalog, MemoryDiscounts, MemorySessionStore, MemoryShipping};
//!
//! let catalog = MemoryCatalog::new();
//! catalog.insert_product(
//!     Product::new("mug", "MUG-1", "Mug", Money::new(1200, Currency::USD))
//!         .with_inventory(InventoryLevel::new(5)),
//! );
//! let discounts = MemoryDiscounts::new();
//! let shipping = MemoryShipping::new();
//! let session = MemorySessionStore::new();
//! let config = StoreConfig::default();
//!
//! let mut cart = CartService::new(
//!     Gateways::new(&catalog, &discounts, &shipping),
//!     &session,
//!     &config,
//! );
//!
//! let result = cart.add(&AddToCart::new("mug", 10)).unwrap();
//! assert_eq!(result.quantity_added, 5);
//! assert_eq!(cart.total_items().unwrap(), 5);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod config;
pub mod customer;
pub mod memory;
pub mod session;
pub mod shipping;
#[cfg(feature = "storage")]
pub mod storage;
pub mod weight;

pub use cart::{
    AddRejection, AddToCart, CartLineItem, CartOperationResult, CartService, Gateways, LineUpdate,
    ResolvedCart, UpdateResult,
};
pub use catalog::Catalog;
pub use config::{ConfigError, StoreConfig};
pub use error::{CartError, CartResult};
pub use ids::*;
pub use money::{Currency, Money};
pub use session::{SessionKey, SessionStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CartError, CartResult};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        Catalog, InventoryLevel, Product, ProductOption, ProductView, Variation,
    };

    // Cart
    pub use crate::cart::{
        AddRejection, AddToCart, AttributeKey, AttributeKind, CartLineItem, CartOperationResult,
        CartService, DiscountRule, DiscountRules, DiscountSelection, DiscountValue, Gateways,
        LineUpdate, ResolvedCart, ResolvedLineItem, UpdateResult,
    };

    // Collaborators
    pub use crate::config::StoreConfig;
    pub use crate::customer::Customer;
    pub use crate::session::{SessionKey, SessionStore};
    pub use crate::shipping::{ShippingMethod, ShippingMethods};
    pub use crate::weight::WeightUnit;
}
