//! Coupon Gate
//!
//! Validates user-entered coupon codes against the backend and holds the one
//! coupon applied to the session.

use std::sync::Arc;

use giftpack::coupons::{Coupon, CouponCode, CouponError, CouponInactive};
use jiff::Timestamp;
use thiserror::Error;
use tracing::{info, warn};

use crate::backend::{BackendError, CouponsService};

/// Why a coupon could not be applied. Messages are shown to the customer.
#[derive(Debug, Error)]
pub enum CouponApplyError {
    /// Nothing usable was entered.
    #[error("Please enter a coupon code")]
    InvalidCode(#[from] CouponError),

    /// No coupon has this code.
    #[error("Invalid coupon code")]
    Unknown,

    /// The backend returned a record that breaks the coupon rules.
    #[error("Invalid coupon code")]
    Malformed(#[source] CouponError),

    /// The coupon is past its expiration date.
    #[error("This coupon has expired")]
    Expired,

    /// The coupon has no redemptions left.
    #[error("This coupon has been fully redeemed")]
    Exhausted,

    /// The backend could not be asked.
    #[error("Could not validate coupon, please try again later")]
    Unavailable(#[source] BackendError),
}

impl From<CouponInactive> for CouponApplyError {
    fn from(value: CouponInactive) -> Self {
        match value {
            CouponInactive::Expired => CouponApplyError::Expired,
            CouponInactive::Exhausted => CouponApplyError::Exhausted,
        }
    }
}

/// Holds at most one applied coupon.
#[derive(Clone)]
pub struct CouponGate {
    coupons: Arc<dyn CouponsService>,
    applied: Option<Coupon>,
}

impl CouponGate {
    /// Create a gate with no applied coupon.
    pub fn new(coupons: Arc<dyn CouponsService>) -> Self {
        Self {
            coupons,
            applied: None,
        }
    }

    /// Look a code up and check it is active at `now`, without applying it.
    ///
    /// # Errors
    ///
    /// Returns a [`CouponApplyError`] describing why the coupon is unusable.
    #[tracing::instrument(name = "coupons.gate.check", skip(self, now), err)]
    pub async fn check(&self, raw_code: &str, now: Timestamp) -> Result<Coupon, CouponApplyError> {
        let code = CouponCode::parse(raw_code)?;

        let coupon = match self.coupons.validate_coupon(&code).await {
            Ok(Some(coupon)) => coupon,
            Ok(None) => return Err(CouponApplyError::Unknown),
            Err(error) => {
                warn!(%code, %error, "coupon lookup failed");
                return Err(CouponApplyError::Unavailable(error));
            }
        };

        if let Err(error) = coupon.validate() {
            warn!(%code, %error, "backend returned a malformed coupon");
            return Err(CouponApplyError::Malformed(error));
        }

        coupon.check_active(now)?;

        Ok(coupon)
    }

    /// Validate a code and make it the applied coupon, replacing any other.
    ///
    /// On failure the previously applied coupon is kept.
    ///
    /// # Errors
    ///
    /// Returns a [`CouponApplyError`] describing why the coupon is unusable.
    pub async fn apply(
        &mut self,
        raw_code: &str,
        now: Timestamp,
    ) -> Result<&Coupon, CouponApplyError> {
        let coupon = self.check(raw_code, now).await?;

        info!(
            code = %coupon.code,
            discount_percentage = coupon.discount_percentage,
            "applied coupon"
        );

        Ok(self.applied.insert(coupon))
    }

    /// Drop the applied coupon, returning it.
    pub fn remove(&mut self) -> Option<Coupon> {
        let removed = self.applied.take();

        if let Some(coupon) = &removed {
            info!(code = %coupon.code, "removed coupon");
        }

        removed
    }

    /// The applied coupon, if any.
    pub fn applied(&self) -> Option<&Coupon> {
        self.applied.as_ref()
    }
}

impl std::fmt::Debug for CouponGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CouponGate")
            .field("applied", &self.applied)
            .finish_non_exhaustive()
    }
}
