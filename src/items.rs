//! Line Items

use serde::{Deserialize, Serialize};

use crate::{cart::CartError, products::ProductRef};

/// One entry in a cart: a product reference, a quantity and optional customisation.
///
/// Line items are keyed by product reference and custom message, so the same
/// pack with two different card messages occupies two entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product or pack being purchased
    #[serde(rename = "productRef", alias = "packId")]
    product: ProductRef,

    /// Number of units, always at least one while the item is in a cart
    #[serde(deserialize_with = "quantity::deserialize")]
    quantity: u64,

    /// Message printed on the gift card
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom_message: Option<String>,

    /// Wrapping chosen for the pack
    #[serde(default, skip_serializing_if = "Option::is_none")]
    wrapping_option: Option<String>,
}

impl LineItem {
    /// Create a line item.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] when `quantity` is zero.
    pub fn new(product: impl Into<ProductRef>, quantity: u64) -> Result<Self, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        Ok(Self {
            product: product.into(),
            quantity,
            custom_message: None,
            wrapping_option: None,
        })
    }

    /// Attach a gift card message.
    #[must_use]
    pub fn with_custom_message(mut self, message: impl Into<String>) -> Self {
        self.custom_message = Some(message.into());
        self
    }

    /// Attach a wrapping option.
    #[must_use]
    pub fn with_wrapping_option(mut self, wrapping: impl Into<String>) -> Self {
        self.wrapping_option = Some(wrapping.into());
        self
    }

    /// Product reference
    pub fn product(&self) -> &ProductRef {
        &self.product
    }

    /// Quantity
    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Gift card message, if any
    pub fn custom_message(&self) -> Option<&str> {
        self.custom_message.as_deref()
    }

    /// Wrapping option, if any
    pub fn wrapping_option(&self) -> Option<&str> {
        self.wrapping_option.as_deref()
    }

    /// Whether both items share the `(product, custom message)` key.
    pub fn same_key(&self, other: &LineItem) -> bool {
        self.product == other.product && self.custom_message == other.custom_message
    }

    pub(crate) fn set_quantity(&mut self, quantity: u64) {
        self.quantity = quantity;
    }

    pub(crate) fn merge_quantity(&mut self, quantity: u64) {
        self.quantity = self.quantity.saturating_add(quantity);
    }
}

/// Quantities are written as JSON numbers but older stored carts encoded them
/// as decimal strings, so both forms are accepted on the way in.
mod quantity {
    use serde::{Deserialize, Deserializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawQuantity {
        Number(u64),
        Text(String),
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match RawQuantity::deserialize(deserializer)? {
            RawQuantity::Number(value) => Ok(value),
            RawQuantity::Text(text) => text
                .trim()
                .parse::<u64>()
                .map_err(|error| D::Error::custom(format!("invalid quantity {text:?}: {error}"))),
        }
    }
}
