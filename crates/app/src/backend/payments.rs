//! Payments
//!
//! The payment gateway is an external SDK. The storefront only needs to ask
//! it to collect an amount and learn whether that succeeded.

use async_trait::async_trait;
use giftpack::orders::{PaymentId, UserId};
use mockall::automock;
use thiserror::Error;

/// Paise per rupee.
const PAISE_PER_RUPEE: u64 = 100;

/// Payment failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// The customer closed the payment flow.
    #[error("payment was cancelled")]
    Cancelled,

    /// The gateway declined the payment.
    #[error("payment was declined: {0}")]
    Declined(String),

    /// The gateway could not be reached.
    #[error("payment gateway unavailable: {0}")]
    Unavailable(String),
}

/// A request to collect money for an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Paying user
    pub user_id: UserId,

    /// Amount in whole rupees
    pub amount: u64,

    /// Receipt reference shown to the customer
    pub receipt: String,
}

impl PaymentRequest {
    /// Amount in paise, the unit payment gateways charge in.
    pub fn amount_in_paise(&self) -> u64 {
        self.amount.saturating_mul(PAISE_PER_RUPEE)
    }
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Collect payment, returning the gateway's payment reference.
    async fn collect_payment(&self, request: PaymentRequest) -> Result<PaymentId, PaymentError>;
}

/// A gateway for payments completed outside the application, such as a
/// payment link the customer has already paid. It hands back the reference it
/// was given.
#[derive(Debug, Clone)]
pub struct PresetPayment {
    payment_id: PaymentId,
}

impl PresetPayment {
    pub fn new(payment_id: PaymentId) -> Self {
        Self { payment_id }
    }
}

#[async_trait]
impl PaymentGateway for PresetPayment {
    #[tracing::instrument(
        name = "payments.preset.collect_payment",
        skip(self, request),
        fields(user_id = %request.user_id, amount_in_paise = request.amount_in_paise()),
        err
    )]
    async fn collect_payment(&self, request: PaymentRequest) -> Result<PaymentId, PaymentError> {
        if request.amount == 0 {
            return Err(PaymentError::Declined("amount must be positive".to_string()));
        }

        Ok(self.payment_id.clone())
    }
}
