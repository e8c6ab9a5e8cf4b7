//! Checkout
//!
//! Turns the session's cart into an order: checks the customer and address,
//! prices the cart, collects payment, creates the order and then clears the
//! cart and applied coupon.

use std::sync::Arc;

use giftpack::{
    orders::{NewOrder, Order, PaymentId},
    pricing::PricingConfig,
    products::Catalog,
    validation::{AddressError, DeliveryAddress},
};
use jiff::Timestamp;
use thiserror::Error;
use tracing::{Span, info, warn};

use crate::{
    backend::{
        BackendError, CartsService, DeliveryService, OrdersService,
        payments::{PaymentError, PaymentGateway, PaymentRequest},
    },
    coupons::CouponGate,
    session::AuthState,
    storage::KeyValueStorage,
    store::CartStore,
};

/// Checkout failures. Messages are shown to the customer.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout requires a signed-in user.
    #[error("Please sign in to place an order")]
    NotSignedIn,

    /// Nothing to order.
    #[error("Your cart is empty")]
    EmptyCart,

    /// The delivery address is incomplete or malformed.
    #[error("Invalid delivery address: {0}")]
    InvalidAddress(#[from] AddressError),

    /// The delivery backend does not ship to the pincode.
    #[error("Sorry, we do not deliver to pincode {0} yet")]
    PincodeNotServiceable(String),

    /// The delivery backend could not be asked.
    #[error("Could not check delivery availability, please try again later")]
    DeliveryUnavailable(#[source] BackendError),

    /// The customer closed the payment flow.
    #[error("Payment was cancelled")]
    PaymentCancelled,

    /// The payment did not go through.
    #[error("Payment failed, please try again")]
    PaymentFailed(#[source] PaymentError),

    /// Payment succeeded but the order could not be recorded.
    #[error("Could not place your order, please contact support with payment reference {payment_id}")]
    OrderFailed {
        /// Reference of the collected payment
        payment_id: PaymentId,
        /// Backend failure
        #[source]
        source: BackendError,
    },
}

/// Places orders for the session.
#[derive(Clone)]
pub struct CheckoutService {
    orders: Arc<dyn OrdersService>,
    carts: Arc<dyn CartsService>,
    delivery: Option<Arc<dyn DeliveryService>>,
    payments: Arc<dyn PaymentGateway>,
    pricing: PricingConfig,
}

impl CheckoutService {
    /// Create a checkout without a delivery check.
    pub fn new(
        orders: Arc<dyn OrdersService>,
        carts: Arc<dyn CartsService>,
        payments: Arc<dyn PaymentGateway>,
        pricing: PricingConfig,
    ) -> Self {
        Self {
            orders,
            carts,
            delivery: None,
            payments,
            pricing,
        }
    }

    /// Check pincode serviceability before taking payment.
    #[must_use]
    pub fn with_delivery(mut self, delivery: Arc<dyn DeliveryService>) -> Self {
        self.delivery = Some(delivery);
        self
    }

    /// Place an order for the cart in `store`.
    ///
    /// Nothing in the cart or the coupon gate changes unless the order is
    /// created.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] for the first step that fails.
    #[tracing::instrument(
        name = "checkout.place_order",
        skip_all,
        fields(user_id = tracing::field::Empty, total = tracing::field::Empty),
        err
    )]
    pub async fn place_order<S: KeyValueStorage>(
        &self,
        auth: &AuthState,
        address: &DeliveryAddress,
        catalog: &Catalog,
        store: &mut CartStore<S>,
        coupons: &mut CouponGate,
    ) -> Result<Order, CheckoutError> {
        let user = auth.user().ok_or(CheckoutError::NotSignedIn)?;

        let span = Span::current();

        span.record("user_id", tracing::field::display(user));

        if store.cart().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        address.validate()?;

        if let Some(delivery) = &self.delivery {
            let serviceable = delivery
                .is_pincode_serviceable(address.pincode.trim())
                .await
                .map_err(CheckoutError::DeliveryUnavailable)?;

            if !serviceable {
                return Err(CheckoutError::PincodeNotServiceable(address.pincode.clone()));
            }
        }

        let totals = store.totals(catalog, coupons.applied(), &self.pricing);

        span.record("total", totals.total);

        let payment_id = self
            .payments
            .collect_payment(PaymentRequest {
                user_id: user.clone(),
                amount: totals.total,
                receipt: format!("giftpack-{}", Timestamp::now().as_millisecond()),
            })
            .await
            .map_err(|error| match error {
                PaymentError::Cancelled => CheckoutError::PaymentCancelled,
                error => CheckoutError::PaymentFailed(error),
            })?;

        let new_order = NewOrder {
            user_id: user.clone(),
            items: store.cart().items().to_vec(),
            delivery_address: address.clone(),
            total_amount: totals.total,
            payment_id: payment_id.clone(),
            coupon_code: coupons.applied().map(|coupon| coupon.code.clone()),
        };

        let order = match self.orders.create_order(new_order).await {
            Ok(order) => order,
            Err(source) => {
                warn!(%payment_id, error = %source, "payment collected but order creation failed");
                return Err(CheckoutError::OrderFailed { payment_id, source });
            }
        };

        store.clear_everywhere(self.carts.as_ref(), user).await;
        coupons.remove();

        info!(order_id = %order.id, %payment_id, "placed order");

        Ok(order)
    }
}

impl std::fmt::Debug for CheckoutService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutService")
            .field("checks_delivery", &self.delivery.is_some())
            .field("pricing", &self.pricing)
            .finish_non_exhaustive()
    }
}
