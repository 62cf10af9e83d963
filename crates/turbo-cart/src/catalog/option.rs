//! Product option groups.

use crate::ids::OptionGroupId;
use serde::{Deserialize, Serialize};

/// An option group shown on the add-to-cart form (e.g., "Size").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductOption {
    /// Option group identifier.
    pub id: OptionGroupId,
    /// Display name.
    pub name: String,
    /// A value must be submitted.
    pub required: bool,
    /// The selected item takes part in choosing a variation.
    pub include_variations: bool,
}

impl ProductOption {
    pub fn new(id: impl Into<OptionGroupId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            required: false,
            include_variations: false,
        }
    }

    /// Mark the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the option as variation-determining.
    pub fn with_variations(mut self) -> Self {
        self.include_variations = true;
        self
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn includes_variations(&self) -> bool {
        self.include_variations
    }
}
