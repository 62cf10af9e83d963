//! Request-scoped cart access.
//!
//! [`CartService`] ties the session store and the gateways together for one
//! request. Reads go through [`CartService::cart`], which reconciles the
//! stored lines, matches discounts and memoizes the result until the next
//! mutation.

use crate::cart::context::{CartContext, ResolvedCart};
use crate::cart::discount::{match_discounts, DiscountRules, DiscountSelection};
use crate::cart::line_item::{CartLineItem, ResolvedLineItem};
use crate::cart::reconcile::reconcile;
use crate::catalog::Catalog;
use crate::config::StoreConfig;
use crate::customer::Customer;
use crate::error::CartError;
use crate::ids::ShippingMethodId;
use crate::session::{SessionKey, SessionStore};
use crate::shipping::ShippingMethods;
use serde_json::Value;
use tracing::debug;

/// The external collaborators a cart reads from.
#[derive(Clone, Copy)]
pub struct Gateways<'a> {
    pub catalog: &'a dyn Catalog,
    pub discounts: &'a dyn DiscountRules,
    pub shipping: &'a dyn ShippingMethods,
}

impl<'a> Gateways<'a> {
    pub fn new(
        catalog: &'a dyn Catalog,
        discounts: &'a dyn DiscountRules,
        shipping: &'a dyn ShippingMethods,
    ) -> Self {
        Self {
            catalog,
            discounts,
            shipping,
        }
    }
}

/// One shopper's cart for the duration of a request.
pub struct CartService<'a> {
    pub(crate) gateways: Gateways<'a>,
    pub(crate) session: &'a dyn SessionStore,
    pub(crate) config: &'a StoreConfig,
    customer: Customer,
    context: CartContext,
}

impl<'a> CartService<'a> {
    /// Create a cart service for a guest shopper.
    pub fn new(gateways: Gateways<'a>, session: &'a dyn SessionStore, config: &'a StoreConfig) -> Self {
        Self::for_customer(gateways, session, config, Customer::Guest)
    }

    /// Create a cart service for a given shopper.
    pub fn for_customer(
        gateways: Gateways<'a>,
        session: &'a dyn SessionStore,
        config: &'a StoreConfig,
        customer: Customer,
    ) -> Self {
        Self {
            gateways,
            session,
            config,
            customer,
            context: CartContext::new(),
        }
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn config(&self) -> &StoreConfig {
        self.config
    }

    /// The reconciled cart, resolved at most once between mutations.
    pub fn cart(&mut self) -> Result<&ResolvedCart, CartError> {
        let resolved = match self.context.take() {
            Some(resolved) => resolved,
            None => self.resolve()?,
        };
        Ok(self.context.store(resolved))
    }

    /// Re-read the cart from the session, ignoring the memo.
    pub fn refresh(&mut self) -> Result<&ResolvedCart, CartError> {
        self.context.invalidate();
        self.cart()
    }

    pub fn items(&mut self) -> Result<&[ResolvedLineItem], CartError> {
        Ok(&self.cart()?.items)
    }

    /// Discount rules applying to the current cart.
    pub fn discounts(&mut self) -> Result<&DiscountSelection, CartError> {
        Ok(&self.cart()?.discounts)
    }

    /// Whether reading the cart corrected it against the catalog.
    pub fn has_changed(&mut self) -> Result<bool, CartError> {
        Ok(self.cart()?.has_changed)
    }

    /// The entered discount code, `None` when blank.
    pub fn discount_code(&self) -> Result<Option<String>, CartError> {
        Ok(self
            .read_string(SessionKey::DiscountCode)?
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty()))
    }

    /// Store a discount code. A blank code clears it.
    pub fn set_discount_code(&mut self, code: &str) -> Result<(), CartError> {
        self.session
            .set(SessionKey::DiscountCode, Value::String(code.trim().to_string()))?;
        self.context.invalidate();
        Ok(())
    }

    pub fn shipping_instructions(&self) -> Result<Option<String>, CartError> {
        self.read_string(SessionKey::ShippingInstructions)
    }

    pub fn set_shipping_instructions(&self, instructions: &str) -> Result<(), CartError> {
        self.session.set(
            SessionKey::ShippingInstructions,
            Value::String(instructions.to_string()),
        )
    }

    /// Record the shopper's shipping method choice.
    pub fn select_shipping_method(&self, id: &ShippingMethodId) -> Result<(), CartError> {
        self.session
            .set(SessionKey::ShippingMethod, Value::String(id.to_string()))
    }

    /// The selected shipping method, `None` after any cart change.
    pub fn selected_shipping_method(&self) -> Result<Option<ShippingMethodId>, CartError> {
        Ok(self
            .read_string(SessionKey::ShippingMethod)?
            .map(ShippingMethodId::from))
    }

    fn resolve(&self) -> Result<ResolvedCart, CartError> {
        let Some(stored) = self.stored_items()? else {
            debug!("resetting missing or unreadable cart");
            self.write_items(&[])?;
            return Ok(ResolvedCart::default());
        };

        let reconciled = reconcile(self.gateways.catalog, &stored)?;
        if reconciled.changed {
            self.write_items(&reconciled.stored())?;
        }

        let code = self.discount_code()?;
        let discounts = match_discounts(
            self.gateways.discounts,
            &reconciled.items,
            code.as_deref(),
            &self.customer,
        )?;
        if code.is_some() && !discounts.has_code_rules {
            debug!(code = code.as_deref(), "clearing discount code with no matching rules");
            self.session
                .set(SessionKey::DiscountCode, Value::String(String::new()))?;
        }

        Ok(ResolvedCart {
            items: reconciled.items,
            discounts,
            has_changed: reconciled.changed,
        })
    }

    /// Stored lines, or `None` if the session holds no readable cart.
    fn stored_items(&self) -> Result<Option<Vec<CartLineItem>>, CartError> {
        let Some(value) = self.session.get(SessionKey::Cart)? else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(items) => Ok(Some(items)),
            Err(e) => {
                debug!(error = %e, "stored cart is not a line item list");
                Ok(None)
            }
        }
    }

    pub(crate) fn write_items(&self, items: &[CartLineItem]) -> Result<(), CartError> {
        self.session.set(SessionKey::Cart, serde_json::to_value(items)?)
    }

    /// Persist new lines and drop the memo.
    pub(crate) fn commit(&mut self, items: &[CartLineItem]) -> Result<(), CartError> {
        self.write_items(items)?;
        self.context.invalidate();
        Ok(())
    }

    /// Any cart change invalidates the chosen shipping method.
    pub(crate) fn reset_shipping_method(&self) -> Result<(), CartError> {
        self.session.set(SessionKey::ShippingMethod, Value::Bool(false))
    }

    fn read_string(&self, key: SessionKey) -> Result<Option<String>, CartError> {
        Ok(match self.session.get(key)? {
            Some(Value::String(value)) => Some(value),
            _ => None,
        })
    }
}
