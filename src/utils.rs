//! Utils

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

/// Round a decimal amount to whole currency units, half away from zero.
///
/// Negative amounts floor at zero and amounts beyond `u64::MAX` saturate.
pub(crate) fn round_to_units(amount: Decimal) -> u64 {
    if amount.is_sign_negative() {
        return 0;
    }

    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(u64::MAX)
}

/// Multiply two decimals, saturating at [`Decimal::MAX`] on overflow.
pub(crate) fn saturating_mul(lhs: Decimal, rhs: Decimal) -> Decimal {
    lhs.checked_mul(rhs).unwrap_or(Decimal::MAX)
}

/// Add two decimals, saturating at [`Decimal::MAX`] on overflow.
pub(crate) fn saturating_add(lhs: Decimal, rhs: Decimal) -> Decimal {
    lhs.checked_add(rhs).unwrap_or(Decimal::MAX)
}
