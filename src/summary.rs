//! Order Summary
//!
//! Renders a cart and its totals as a table, with amounts formatted as INR.

use std::io;

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    coupons::Coupon,
    pricing::{PricingConfig, Totals, calculate_totals, line_total, unit_price},
    products::Catalog,
};

/// Errors that can occur when writing a summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// Output could not be written.
    #[error("failed to write order summary")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SummaryLine {
    product: String,
    quantity: u64,
    unit_price: Decimal,
    line_total: Decimal,
}

/// A priced snapshot of a cart, ready for display.
#[derive(Debug, Clone)]
pub struct OrderSummary {
    lines: Vec<SummaryLine>,
    totals: Totals,
    tax_percent_points: Decimal,
    coupon: Option<String>,
}

impl OrderSummary {
    /// Price `cart` against `catalog` with the optional coupon.
    pub fn new(
        cart: &Cart,
        catalog: &Catalog,
        coupon: Option<&Coupon>,
        config: &PricingConfig,
    ) -> Self {
        let lines = cart
            .items()
            .iter()
            .map(|item| {
                let mut product = item.product().to_string();

                if item.product().is_custom() {
                    product.push_str(" (custom pack)");
                }

                if let Some(message) = item.custom_message() {
                    product.push_str(&format!(" \"{message}\""));
                }

                SummaryLine {
                    product,
                    quantity: item.quantity(),
                    unit_price: unit_price(item, catalog, config),
                    line_total: line_total(item, catalog, config),
                }
            })
            .collect();

        Self {
            lines,
            totals: calculate_totals(cart, catalog, coupon, config),
            tax_percent_points: config.tax_percent_points(),
            coupon: coupon.map(|c| c.code.to_string()),
        }
    }

    /// The totals shown at the foot of the summary.
    pub fn totals(&self) -> Totals {
        self.totals
    }

    /// Write the summary table.
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError::Io`] if `out` cannot be written to.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), SummaryError> {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Qty", "Unit Price", "Line Total"]);

        for line in &self.lines {
            builder.push_record([
                line.product.clone(),
                line.quantity.to_string(),
                inr(line.unit_price).to_string(),
                inr(line.line_total).to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Theme::from(Style::modern_rounded()));
        table.modify(Columns::new(1..4), Alignment::right());
        table.modify(Rows::first(), Alignment::center());

        writeln!(out, "{table}")?;

        let coupon_label = self
            .coupon
            .as_ref()
            .map_or_else(|| "Coupon".to_string(), |code| format!("Coupon ({code})"));

        let tax_label = format!("GST ({}%)", self.tax_percent_points);

        let rows = [
            ("Subtotal".to_string(), inr_units(self.totals.subtotal).to_string()),
            (
                coupon_label,
                format!("-{}", inr_units(self.totals.coupon_discount)),
            ),
            (tax_label, inr_units(self.totals.tax).to_string()),
            ("Total".to_string(), inr_units(self.totals.total).to_string()),
        ];

        let label_width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or_default();
        let value_width = rows
            .iter()
            .map(|(_, v)| v.chars().count())
            .max()
            .unwrap_or_default();

        for (label, value) in rows {
            writeln!(out, " {label:>label_width$}  {value:>value_width$}")?;
        }

        Ok(())
    }
}

fn inr(amount: Decimal) -> Money<'static, Currency> {
    Money::from_decimal(
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        iso::INR,
    )
}

fn inr_units(amount: u64) -> Money<'static, Currency> {
    inr(Decimal::from(amount))
}
