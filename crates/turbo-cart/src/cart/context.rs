//! Per-request memo of the resolved cart.

use crate::cart::discount::DiscountSelection;
use crate::cart::line_item::{CartLineItem, ResolvedLineItem};

/// The reconciled cart with its discount selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedCart {
    /// Reconciled lines, in stored order.
    pub items: Vec<ResolvedLineItem>,
    /// Rules matched against `items`.
    pub discounts: DiscountSelection,
    /// Reconciliation corrected the stored cart.
    pub has_changed: bool,
}

impl ResolvedCart {
    /// Lines in their stored form.
    pub fn stored_items(&self) -> Vec<CartLineItem> {
        self.items.iter().map(|line| line.item.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Holds the resolved cart for the lifetime of one request.
///
/// Cleared by every mutation; the next read resolves again.
#[derive(Debug, Default)]
pub struct CartContext {
    resolved: Option<ResolvedCart>,
}

impl CartContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The memoized cart, if resolved since the last invalidation.
    pub fn get(&self) -> Option<&ResolvedCart> {
        self.resolved.as_ref()
    }

    /// Memoize a resolved cart.
    pub fn store(&mut self, cart: ResolvedCart) -> &ResolvedCart {
        self.resolved.insert(cart)
    }

    /// Take the memoized cart out, leaving the context unresolved.
    pub fn take(&mut self) -> Option<ResolvedCart> {
        self.resolved.take()
    }

    /// Forget the memoized cart.
    pub fn invalidate(&mut self) {
        self.resolved = None;
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}
