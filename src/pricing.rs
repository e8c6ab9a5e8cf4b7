//! Pricing
//!
//! Derives subtotal, coupon discount, tax and grand total from a cart, a
//! catalog snapshot and the applied coupon. The calculation never fails:
//! unknown products fall back to a fixed unit price and overflowing amounts
//! saturate.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    cart::Cart,
    coupons::{Coupon, calculate_coupon_discount},
    items::LineItem,
    products::Catalog,
    utils::{round_to_units, saturating_add, saturating_mul},
};

/// Default tax rate in percentage points (GST).
pub const DEFAULT_TAX_RATE_PERCENT: u8 = 18;

/// Default unit price for products missing from the catalog, such as custom packs.
pub const DEFAULT_FALLBACK_UNIT_PRICE: u64 = 1999;

/// Pricing configuration.
#[derive(Debug, Clone, Copy)]
pub struct PricingConfig {
    tax_rate: Percentage,
    fallback_unit_price: u64,
}

impl PricingConfig {
    /// Create a configuration from a tax rate and a fallback unit price.
    pub fn new(tax_rate: Percentage, fallback_unit_price: u64) -> Self {
        Self {
            tax_rate,
            fallback_unit_price,
        }
    }

    /// Create a configuration from a tax rate in percentage points (`18` for 18%).
    pub fn from_tax_percent(tax_percent: Decimal, fallback_unit_price: u64) -> Self {
        Self::new(
            Percentage::from(tax_percent / Decimal::ONE_HUNDRED),
            fallback_unit_price,
        )
    }

    /// Tax rate applied after the coupon discount.
    pub fn tax_rate(&self) -> Percentage {
        self.tax_rate
    }

    /// Tax rate in percentage points, for display.
    pub fn tax_percent_points(&self) -> Decimal {
        (self.tax_rate * Decimal::ONE_HUNDRED).normalize()
    }

    /// Unit price used when a product is missing from the catalog.
    pub fn fallback_unit_price(&self) -> u64 {
        self.fallback_unit_price
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self::from_tax_percent(
            Decimal::from(DEFAULT_TAX_RATE_PERCENT),
            DEFAULT_FALLBACK_UNIT_PRICE,
        )
    }
}

/// Derived order totals in whole currency units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Sum of discounted line prices, rounded once
    pub subtotal: u64,

    /// Coupon discount taken off the subtotal
    pub coupon_discount: u64,

    /// Tax on the discounted subtotal
    pub tax: u64,

    /// Amount payable
    pub total: u64,
}

impl Totals {
    /// Subtotal after the coupon discount, before tax.
    pub fn discounted_subtotal(&self) -> u64 {
        self.subtotal.saturating_sub(self.coupon_discount)
    }
}

/// Unit price of a line item: the catalog price less the product discount, or
/// the fallback price when the product is not in the catalog.
pub fn unit_price(item: &LineItem, catalog: &Catalog, config: &PricingConfig) -> Decimal {
    catalog.get(item.product()).map_or_else(
        || Decimal::from(config.fallback_unit_price()),
        |entry| entry.unit_price(),
    )
}

/// Unit price times quantity, unrounded.
pub fn line_total(item: &LineItem, catalog: &Catalog, config: &PricingConfig) -> Decimal {
    saturating_mul(
        unit_price(item, catalog, config),
        Decimal::from(item.quantity()),
    )
}

/// Sum of all line totals, rounded once at the end.
pub fn calculate_subtotal(cart: &Cart, catalog: &Catalog, config: &PricingConfig) -> u64 {
    let sum = cart.items().iter().fold(Decimal::ZERO, |sum, item| {
        saturating_add(sum, line_total(item, catalog, config))
    });

    round_to_units(sum)
}

/// Tax owed on an amount at the configured rate, rounded.
pub fn calculate_tax(amount: u64, config: &PricingConfig) -> u64 {
    let rate = config.tax_rate() * Decimal::ONE;

    round_to_units(saturating_mul(Decimal::from(amount), rate))
}

/// Calculate the totals for a cart.
pub fn calculate_totals(
    cart: &Cart,
    catalog: &Catalog,
    coupon: Option<&Coupon>,
    config: &PricingConfig,
) -> Totals {
    let subtotal = calculate_subtotal(cart, catalog, config);

    totals_from_subtotal(subtotal, coupon, config)
}

/// Apply the coupon and tax steps to an already computed subtotal.
pub fn totals_from_subtotal(
    subtotal: u64,
    coupon: Option<&Coupon>,
    config: &PricingConfig,
) -> Totals {
    let coupon_discount = calculate_coupon_discount(subtotal, coupon);
    let discounted = subtotal.saturating_sub(coupon_discount);
    let tax = calculate_tax(discounted, config);

    Totals {
        subtotal,
        coupon_discount,
        tax,
        total: discounted.saturating_add(tax),
    }
}
