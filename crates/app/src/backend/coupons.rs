//! Coupons service contract.

use async_trait::async_trait;
use giftpack::coupons::{Coupon, CouponCode};
use mockall::automock;

use super::BackendError;

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Look up a coupon by its normalised code.
    ///
    /// Returns `None` when no coupon has this code. The returned coupon may be
    /// expired or exhausted; callers check activity themselves.
    async fn validate_coupon(&self, code: &CouponCode) -> Result<Option<Coupon>, BackendError>;
}
