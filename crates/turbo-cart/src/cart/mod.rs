//! Shopping cart module.
//!
//! Line items, reconciliation, discount matching, mutations and totals.

mod aggregate;
mod attributes;
mod context;
mod discount;
mod line_item;
mod mutate;
mod reconcile;
mod service;

pub use attributes::{decode_fields, AttributeKey, AttributeKind, Attributes, InvalidAttributeKey};
pub use context::{CartContext, ResolvedCart};
pub use discount::{
    match_discounts, DiscountRule, DiscountRules, DiscountSelection, DiscountTrigger, DiscountValue,
};
pub use line_item::{CartLineItem, ResolvedLineItem};
pub use mutate::{AddRejection, AddToCart, CartOperationResult, LineUpdate, UpdateResult};
pub use reconcile::{reconcile, Reconciled};
pub use service::{CartService, Gateways};
