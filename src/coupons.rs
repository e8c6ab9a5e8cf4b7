//! Coupons
//!
//! Coupon records, code normalisation, the activity check and the coupon
//! discount calculator.

use std::fmt;

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::{round_to_units, saturating_mul};

/// Problems with a coupon record or code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CouponError {
    /// The code is blank once trimmed.
    #[error("coupon code cannot be empty")]
    EmptyCode,

    /// Discount percentage outside 1-100.
    #[error("discount must be between 1% and 100%, got {0}%")]
    DiscountOutOfRange(u8),

    /// Minimum discount percentage outside 1-100.
    #[error("minimum discount must be between 1% and 100%, got {0}%")]
    MinDiscountOutOfRange(u8),

    /// Maximum discount amount must be positive.
    #[error("maximum discount amount must be positive")]
    MaxDiscountAmountZero,

    /// A coupon must be redeemable at least once.
    #[error("total quantity must be at least 1")]
    TotalQuantityZero,

    /// More redemptions remain than were ever issued.
    #[error("remaining quantity {remaining} exceeds total quantity {total}")]
    RemainingExceedsTotal {
        /// Remaining redemptions
        remaining: u64,
        /// Issued redemptions
        total: u64,
    },
}

/// Why an otherwise valid coupon cannot be used right now.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CouponInactive {
    /// Past its expiration date.
    #[error("coupon has expired")]
    Expired,

    /// No redemptions left.
    #[error("coupon has been fully redeemed")]
    Exhausted,
}

/// A normalised coupon code: trimmed and uppercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CouponCode(String);

impl CouponCode {
    /// Normalise a user-entered code.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::EmptyCode`] if nothing is left after trimming.
    pub fn parse(raw: &str) -> Result<Self, CouponError> {
        let code = raw.trim().to_uppercase();

        if code.is_empty() {
            return Err(CouponError::EmptyCode);
        }

        Ok(Self(code))
    }

    /// Borrow the code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CouponCode {
    type Error = CouponError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CouponCode> for String {
    fn from(value: CouponCode) -> Self {
        value.0
    }
}

/// A quantity-limited, time-limited percentage discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    /// Unique code
    pub code: CouponCode,

    /// Percentage taken off the subtotal (1-100)
    pub discount_percentage: u8,

    /// Advertised minimum discount percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_discount_percentage: Option<u8>,

    /// Advertised cap on the discount amount, in whole currency units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_discount_amount: Option<u64>,

    /// Redemptions left
    pub remaining_quantity: u64,

    /// Redemptions issued
    pub total_quantity: u64,

    /// Last instant the coupon may be redeemed
    pub expiration_date: Timestamp,
}

impl Coupon {
    /// Check the record is well formed.
    ///
    /// # Errors
    ///
    /// Returns the first [`CouponError`] found.
    pub fn validate(&self) -> Result<(), CouponError> {
        if !(1..=100).contains(&self.discount_percentage) {
            return Err(CouponError::DiscountOutOfRange(self.discount_percentage));
        }

        if let Some(min) = self
            .min_discount_percentage
            .filter(|min| !(1..=100).contains(min))
        {
            return Err(CouponError::MinDiscountOutOfRange(min));
        }

        if self.max_discount_amount == Some(0) {
            return Err(CouponError::MaxDiscountAmountZero);
        }

        if self.total_quantity == 0 {
            return Err(CouponError::TotalQuantityZero);
        }

        if self.remaining_quantity > self.total_quantity {
            return Err(CouponError::RemainingExceedsTotal {
                remaining: self.remaining_quantity,
                total: self.total_quantity,
            });
        }

        Ok(())
    }

    /// Check whether the coupon can be redeemed at `now`.
    ///
    /// Exhaustion is reported ahead of expiry.
    ///
    /// # Errors
    ///
    /// Returns the [`CouponInactive`] reason when it cannot.
    pub fn check_active(&self, now: Timestamp) -> Result<(), CouponInactive> {
        if self.remaining_quantity == 0 {
            return Err(CouponInactive::Exhausted);
        }

        if now > self.expiration_date {
            return Err(CouponInactive::Expired);
        }

        Ok(())
    }

    /// The discount as a percentage, capped at 100%.
    pub fn discount(&self) -> Percentage {
        Percentage::from(Decimal::from(self.discount_percentage.min(100)) / Decimal::ONE_HUNDRED)
    }

    /// Advisory: whether `discount` is above the advertised maximum amount.
    ///
    /// The backend enforces bounds on redemption; this is for display only.
    pub fn exceeds_max_discount(&self, discount: u64) -> bool {
        self.max_discount_amount.is_some_and(|max| discount > max)
    }

    /// Advisory: whether the percentage is below the advertised minimum.
    pub fn below_min_percentage(&self) -> bool {
        self.min_discount_percentage
            .is_some_and(|min| self.discount_percentage < min)
    }
}

/// Discount a coupon takes off `subtotal`, rounded to whole currency units.
///
/// No coupon means no discount. Advertised minimum and maximum bounds are not
/// applied here.
pub fn calculate_coupon_discount(subtotal: u64, coupon: Option<&Coupon>) -> u64 {
    let Some(coupon) = coupon else {
        return 0;
    };

    let discount = coupon.discount() * Decimal::ONE;

    round_to_units(saturating_mul(Decimal::from(subtotal), discount)).min(subtotal)
}
