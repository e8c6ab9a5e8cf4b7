//! Cart

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    coupons::Coupon,
    items::LineItem,
    pricing::{PricingConfig, Totals, calculate_totals},
    products::{Catalog, ProductRef},
};

/// Errors raised by cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Line items must hold at least one unit.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// The product has no line item in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductRef),
}

/// An ordered list of line items owned by one shopping session.
///
/// Deserialised carts go through [`Cart::from_items`], so stored or remote
/// data cannot break the quantity and merge rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CartRecord")]
pub struct Cart {
    items: Vec<LineItem>,
}

/// Wire shape of a cart before normalisation.
#[derive(Deserialize)]
struct CartRecord {
    items: Vec<LineItem>,
}

impl From<CartRecord> for Cart {
    fn from(record: CartRecord) -> Self {
        Cart::from_items(record.items)
    }
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from existing line items.
    ///
    /// Items are added in order through [`Cart::add_item`], so duplicate keys are
    /// merged. Zero quantities, which can only come from untrusted stored data,
    /// are dropped.
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        let mut cart = Cart::new();

        for item in items.into_iter().filter(|item| item.quantity() > 0) {
            cart.add_item(item);
        }

        cart
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Consume the cart, returning its line items.
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    /// Number of distinct line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no line items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add an item, merging quantities into an existing line item with the same
    /// product and custom message.
    pub fn add_item(&mut self, item: LineItem) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.same_key(&item)) {
            existing.merge_quantity(item.quantity());
        } else {
            self.items.push(item);
        }
    }

    /// Set the quantity of every line item for `product`.
    ///
    /// A quantity of zero removes those line items.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] if no line item references `product`.
    pub fn update_quantity(&mut self, product: &ProductRef, quantity: u64) -> Result<(), CartError> {
        if !self.contains(product) {
            return Err(CartError::NotInCart(product.clone()));
        }

        if quantity == 0 {
            self.remove_item(product);

            return Ok(());
        }

        self.items
            .iter_mut()
            .filter(|item| item.product() == product)
            .for_each(|item| item.set_quantity(quantity));

        Ok(())
    }

    /// Remove every line item for `product`, returning how many were removed.
    pub fn remove_item(&mut self, product: &ProductRef) -> usize {
        let before = self.items.len();

        self.items.retain(|item| item.product() != product);

        before - self.items.len()
    }

    /// Remove all line items.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Whether any line item references `product`.
    pub fn contains(&self, product: &ProductRef) -> bool {
        self.items.iter().any(|item| item.product() == product)
    }

    /// Total number of units across all line items.
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .fold(0_u64, |sum, item| sum.saturating_add(item.quantity()))
    }

    /// Calculate totals for this cart.
    pub fn totals(
        &self,
        catalog: &Catalog,
        coupon: Option<&Coupon>,
        config: &PricingConfig,
    ) -> Totals {
        calculate_totals(self, catalog, coupon, config)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn item(product: &str, quantity: u64) -> Result<LineItem, CartError> {
        LineItem::new(product, quantity)
    }

    #[test]
    fn re_adding_merges_quantities() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(item("birthday-bliss", 2)?);
        cart.add_item(item("birthday-bliss", 3)?);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items().first().map(LineItem::quantity), Some(5));

        Ok(())
    }

    #[test]
    fn distinct_messages_stay_separate() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(item("birthday-bliss", 1)?.with_custom_message("Happy Birthday"));
        cart.add_item(item("birthday-bliss", 1)?.with_custom_message("Congrats"));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.item_count(), 2);

        Ok(())
    }

    #[test]
    fn new_products_append_in_order() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(item("b", 1)?);
        cart.add_item(item("a", 1)?);

        let order: Vec<&str> = cart.items().iter().map(|i| i.product().as_str()).collect();

        assert_eq!(order, ["b", "a"]);

        Ok(())
    }

    #[test]
    fn update_sets_quantity_for_all_matching_items() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(item("birthday-bliss", 1)?.with_custom_message("Happy Birthday"));
        cart.add_item(item("birthday-bliss", 2)?);
        cart.add_item(item("festive-hamper", 1)?);

        cart.update_quantity(&"birthday-bliss".into(), 4)?;

        assert_eq!(cart.item_count(), 9);

        Ok(())
    }

    #[test]
    fn update_to_zero_removes_item() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(item("birthday-bliss", 2)?);
        cart.add_item(item("festive-hamper", 1)?);

        cart.update_quantity(&"birthday-bliss".into(), 0)?;

        assert_eq!(cart.len(), 1);
        assert!(!cart.contains(&"birthday-bliss".into()));

        Ok(())
    }

    #[test]
    fn update_of_missing_product_errors() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(item("festive-hamper", 1)?);

        let result = cart.update_quantity(&"birthday-bliss".into(), 3);

        assert_eq!(result, Err(CartError::NotInCart("birthday-bliss".into())));
        assert_eq!(cart.item_count(), 1);

        Ok(())
    }

    #[test]
    fn remove_deletes_every_matching_item() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(item("birthday-bliss", 1)?.with_custom_message("Happy Birthday"));
        cart.add_item(item("birthday-bliss", 1)?);
        cart.add_item(item("festive-hamper", 1)?);

        assert_eq!(cart.remove_item(&"birthday-bliss".into()), 2);
        assert_eq!(cart.remove_item(&"birthday-bliss".into()), 0);
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn clear_empties_cart() -> TestResult {
        let mut cart = Cart::from_items([item("a", 1)?, item("b", 2)?]);

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);

        Ok(())
    }

    #[test]
    fn from_items_merges_duplicates() -> TestResult {
        let cart = Cart::from_items([item("a", 1)?, item("b", 2)?, item("a", 4)?]);

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.item_count(), 7);

        Ok(())
    }

    #[test]
    fn from_items_drops_zero_quantities_from_stored_data() -> TestResult {
        let items: Vec<LineItem> = serde_json::from_str(
            r#"[{"productRef":"a","quantity":0},{"productRef":"b","quantity":1}]"#,
        )?;

        let cart = Cart::from_items(items);

        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn deserialised_carts_are_normalised() -> TestResult {
        let cart: Cart = serde_json::from_str(
            r#"{"items":[{"productRef":"gone","quantity":0},{"productRef":"a","quantity":1},{"productRef":"a","quantity":2}]}"#,
        )?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 3);

        let empty: Cart = serde_json::from_str(r#"{"items":[{"productRef":"gone","quantity":0}]}"#)?;

        assert!(empty.is_empty());

        Ok(())
    }
}
