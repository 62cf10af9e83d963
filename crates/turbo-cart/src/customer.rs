//! The shopper a cart belongs to.

use crate::ids::{UserGroupId, UserId};
use serde::{Deserialize, Serialize};

/// Who is shopping. Discount rules may depend on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Customer {
    /// Not logged in.
    #[default]
    Guest,
    /// Logged-in customer.
    Member {
        /// User ID.
        id: UserId,
        /// User groups the customer belongs to.
        groups: Vec<UserGroupId>,
    },
}

impl Customer {
    /// Create a logged-in customer.
    pub fn member(id: impl Into<UserId>, groups: Vec<UserGroupId>) -> Self {
        Customer::Member {
            id: id.into(),
            groups,
        }
    }

    /// Check if the customer is logged in.
    pub fn is_member(&self) -> bool {
        matches!(self, Customer::Member { .. })
    }

    /// Get user ID if logged in.
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Customer::Member { id, .. } => Some(id),
            Customer::Guest => None,
        }
    }

    /// User groups, empty for guests.
    pub fn groups(&self) -> &[UserGroupId] {
        match self {
            Customer::Member { groups, .. } => groups,
            Customer::Guest => &[],
        }
    }
}
