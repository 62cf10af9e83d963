//! Stock levels and the cart's stock policy.

use serde::{Deserialize, Serialize};

/// Stock state of a product or variation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct InventoryLevel {
    /// Quantity on hand.
    pub quantity: i64,
    /// Stock is not tracked; any quantity can be sold.
    pub unlimited: bool,
    /// Orders may exceed the quantity on hand.
    pub allow_backorders: bool,
}

impl InventoryLevel {
    /// Tracked stock with no back-orders.
    pub fn new(quantity: i64) -> Self {
        Self {
            quantity,
            unlimited: false,
            allow_backorders: false,
        }
    }

    /// Untracked stock.
    pub fn unlimited() -> Self {
        Self {
            quantity: 0,
            unlimited: true,
            allow_backorders: false,
        }
    }

    /// Tracked stock that may be oversold.
    pub fn backorderable(quantity: i64) -> Self {
        Self {
            quantity,
            unlimited: false,
            allow_backorders: true,
        }
    }

    /// Quantity available for sale, never negative.
    pub fn available(&self) -> i64 {
        self.quantity.max(0)
    }

    /// Whether cart quantities must stay within the quantity on hand.
    pub fn is_limited(&self) -> bool {
        !self.unlimited && !self.allow_backorders
    }

    /// Check if a specific quantity can be sold.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        !self.is_limited() || quantity <= self.available()
    }

    /// Clamp a requested quantity to what can be sold.
    pub fn clamp(&self, requested: i64) -> i64 {
        if self.can_fulfill(requested) {
            requested
        } else {
            self.available()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limited_stock() {
        let inv = InventoryLevel::new(5);
        assert!(inv.is_limited());
        assert!(inv.can_fulfill(5));
        assert!(!inv.can_fulfill(6));
        assert_eq!(inv.clamp(10), 5);
        assert_eq!(inv.clamp(3), 3);
    }

    #[test]
    fn test_unlimited_stock() {
        let inv = InventoryLevel::unlimited();
        assert!(!inv.is_limited());
        assert_eq!(inv.clamp(1000), 1000);
    }

    #[test]
    fn test_backorders() {
        let inv = InventoryLevel::backorderable(2);
        assert!(!inv.is_limited());
        assert!(inv.can_fulfill(50));
        assert_eq!(inv.clamp(50), 50);
    }

    #[test]
    fn test_oversold_stock_is_zero_available() {
        let inv = InventoryLevel::new(-3);
        assert_eq!(inv.available(), 0);
        assert_eq!(inv.clamp(1), 0);
    }
}
