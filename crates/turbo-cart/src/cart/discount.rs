//! Discount rules and their matching against cart lines.

use crate::cart::line_item::ResolvedLineItem;
use crate::catalog::ProductView;
use crate::customer::Customer;
use crate::error::CartError;
use crate::ids::{DiscountId, ProductGroupId, UserGroupId};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Value of the discount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum DiscountValue {
    /// Percentage off (0.0 - 100.0).
    Percentage(f64),
    /// Fixed amount off.
    Fixed(Money),
    /// Free shipping.
    FreeShipping,
}

/// How a rule gets onto a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DiscountTrigger {
    /// Applies without any code.
    Automatic,
    /// Applies once the shopper enters the code.
    Code(String),
}

/// A discount rule as configured by the store.
///
/// Applying the value to prices is the job of the pricing stage; the cart
/// only decides which rules apply to which lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscountRule {
    /// Unique rule identifier.
    pub id: DiscountId,
    /// Display name.
    pub name: String,
    /// Automatic or code-restricted.
    pub trigger: DiscountTrigger,
    /// Value of the discount.
    pub value: DiscountValue,
    /// Product groups the rule is restricted to. Empty means every product.
    #[serde(default)]
    pub product_groups: Vec<ProductGroupId>,
    /// User groups the rule is offered to. Empty means every shopper.
    #[serde(default)]
    pub user_groups: Vec<UserGroupId>,
}

impl DiscountRule {
    /// Create a rule that applies without a code.
    pub fn automatic(id: impl Into<DiscountId>, name: impl Into<String>, value: DiscountValue) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            trigger: DiscountTrigger::Automatic,
            value,
            product_groups: Vec::new(),
            user_groups: Vec::new(),
        }
    }

    /// Create a rule unlocked by a discount code.
    pub fn with_code(
        id: impl Into<DiscountId>,
        name: impl Into<String>,
        code: impl Into<String>,
        value: DiscountValue,
    ) -> Self {
        Self {
            trigger: DiscountTrigger::Code(code.into()),
            ..Self::automatic(id, name, value)
        }
    }

    /// Restrict the rule to a product group.
    pub fn restricted_to(mut self, group_id: impl Into<ProductGroupId>) -> Self {
        self.product_groups.push(group_id.into());
        self
    }

    /// Offer the rule only to members of a user group.
    pub fn for_user_group(mut self, group_id: impl Into<UserGroupId>) -> Self {
        self.user_groups.push(group_id.into());
        self
    }

    pub fn product_groups(&self) -> &[ProductGroupId] {
        &self.product_groups
    }

    /// The code that unlocks this rule, if it needs one.
    pub fn code(&self) -> Option<&str> {
        match &self.trigger {
            DiscountTrigger::Automatic => None,
            DiscountTrigger::Code(code) => Some(code),
        }
    }

    /// Whether the rule covers a product.
    pub fn applies_to(&self, product: &ProductView) -> bool {
        self.product_groups.is_empty()
            || product
                .group_ids()
                .iter()
                .any(|group| self.product_groups.contains(group))
    }

    /// Whether the rule is offered to a shopper.
    pub fn offered_to(&self, customer: &Customer) -> bool {
        self.user_groups.is_empty()
            || customer
                .groups()
                .iter()
                .any(|group| self.user_groups.contains(group))
    }
}

/// Source of discount rules.
pub trait DiscountRules {
    /// Rules that apply without a code.
    fn automatic_discounts(&self, customer: &Customer) -> Result<Vec<DiscountRule>, CartError>;

    /// Rules unlocked by a code.
    fn discounts_by_code(&self, code: &str, customer: &Customer) -> Result<Vec<DiscountRule>, CartError>;
}

/// Rules that apply to the current cart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscountSelection {
    /// Every rule that applies to at least one line, each once.
    pub rules: Vec<DiscountRule>,
    /// Rule IDs applicable to each line, indexed like the cart lines.
    pub line_rules: Vec<Vec<DiscountId>>,
    /// The entered code unlocked at least one rule.
    pub has_code_rules: bool,
}

impl DiscountSelection {
    /// Rule IDs applicable to a line. Empty for out-of-range lines.
    pub fn rules_for_line(&self, line: usize) -> &[DiscountId] {
        self.line_rules.get(line).map_or(&[], Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Decide which rules apply to which cart lines.
///
/// Automatic rules are always considered; code rules only when a non-blank
/// code is given.
pub fn match_discounts(
    gateway: &dyn DiscountRules,
    items: &[ResolvedLineItem],
    code: Option<&str>,
    customer: &Customer,
) -> Result<DiscountSelection, CartError> {
    let mut candidates = gateway.automatic_discounts(customer)?;

    let mut has_code_rules = false;
    if let Some(code) = code.map(str::trim).filter(|code| !code.is_empty()) {
        let code_rules = gateway.discounts_by_code(code, customer)?;
        has_code_rules = !code_rules.is_empty();
        debug!(code, rules = code_rules.len(), "looked up discount code");
        candidates.extend(code_rules);
    }

    let mut selection = DiscountSelection {
        rules: Vec::new(),
        line_rules: vec![Vec::new(); items.len()],
        has_code_rules,
    };

    for rule in candidates {
        if selection.rules.iter().any(|selected| selected.id == rule.id) {
            continue;
        }

        let mut applies = false;
        for (line, item) in items.iter().enumerate() {
            if rule.applies_to(&item.product) {
                selection.line_rules[line].push(rule.id.clone());
                applies = true;
            }
        }

        if applies {
            selection.rules.push(rule);
        }
    }

    Ok(selection)
}
