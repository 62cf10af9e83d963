//! Attribute fields submitted with an add-to-cart request.
//!
//! Form fields are named `<prefix><option group id>`, where the two-letter
//! prefix says how the option was rendered:
//!
//! | prefix | kind |
//! |--------|------|
//! | `po` | option list |
//! | `pt` | text |
//! | `pa` | text area |
//! | `ph` | hidden |
//! | `pc` | checkbox |

use std::collections::BTreeMap;
use std::fmt;

use crate::ids::OptionGroupId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How an option was rendered on the add-to-cart form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeKind {
    OptionList,
    Text,
    TextArea,
    Hidden,
    Checkbox,
}

impl AttributeKind {
    pub const ALL: [AttributeKind; 5] = [
        AttributeKind::OptionList,
        AttributeKind::Text,
        AttributeKind::TextArea,
        AttributeKind::Hidden,
        AttributeKind::Checkbox,
    ];

    /// Field name prefix.
    pub fn prefix(&self) -> &'static str {
        match self {
            AttributeKind::OptionList => "po",
            AttributeKind::Text => "pt",
            AttributeKind::TextArea => "pa",
            AttributeKind::Hidden => "ph",
            AttributeKind::Checkbox => "pc",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.prefix() == prefix)
    }
}

/// Field name that is not an attribute field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("not an attribute field: {0:?}")]
pub struct InvalidAttributeKey(pub String);

/// Decoded attribute field name: rendering kind plus option group.
///
/// Serializes back to the prefixed field name so stored carts stay
/// readable by the storefront templates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AttributeKey {
    pub kind: AttributeKind,
    pub group_id: OptionGroupId,
}

impl AttributeKey {
    pub fn new(kind: AttributeKind, group_id: impl Into<OptionGroupId>) -> Self {
        Self {
            kind,
            group_id: group_id.into(),
        }
    }

    /// Decode a field name such as `po12`.
    pub fn parse(field: &str) -> Result<Self, InvalidAttributeKey> {
        let invalid = || InvalidAttributeKey(field.to_string());
        let prefix = field.get(..2).ok_or_else(invalid)?;
        let kind = AttributeKind::from_prefix(prefix).ok_or_else(invalid)?;
        let group_id = &field[2..];
        if group_id.is_empty() {
            return Err(invalid());
        }
        Ok(Self::new(kind, group_id))
    }

    /// The form field name.
    pub fn field_name(&self) -> String {
        format!("{}{}", self.kind.prefix(), self.group_id)
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.group_id)
    }
}

impl TryFrom<String> for AttributeKey {
    type Error = InvalidAttributeKey;

    fn try_from(field: String) -> Result<Self, Self::Error> {
        Self::parse(&field)
    }
}

impl From<AttributeKey> for String {
    fn from(key: AttributeKey) -> Self {
        key.field_name()
    }
}

/// Attribute selections of one line item. Ordered, so two selections are
/// equal regardless of submission order.
pub type Attributes = BTreeMap<AttributeKey, String>;

/// Decode submitted form fields, skipping fields that are not attributes.
pub fn decode_fields<'a, I>(fields: I) -> Attributes
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    fields
        .into_iter()
        .filter_map(|(name, value)| {
            AttributeKey::parse(name)
                .ok()
                .map(|key| (key, value.clone()))
        })
        .collect()
}
