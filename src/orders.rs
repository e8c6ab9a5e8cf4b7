//! Orders
//!
//! Order snapshots as returned by the backend. Orders are immutable on the
//! client; the only local behaviour is display ordering.

use std::{cmp::Ordering, fmt};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{coupons::CouponCode, items::LineItem, validation::DeliveryAddress};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }
    };
}

string_id!(
    /// Signed-in user identity, as issued by the identity provider.
    UserId
);

string_id!(
    /// Backend-assigned order identifier.
    OrderId
);

string_id!(
    /// Payment reference returned by the payment gateway.
    PaymentId
);

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Created, awaiting confirmation
    Pending,
    /// Confirmed by the store
    Confirmed,
    /// Handed to the courier
    Shipped,
    /// Received by the recipient
    Delivered,
    /// Cancelled
    Cancelled,
}

impl OrderStatus {
    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order identifier
    pub id: OrderId,

    /// Owner
    pub user_id: UserId,

    /// Items purchased
    pub items: Vec<LineItem>,

    /// Shipping address
    pub delivery_address: DeliveryAddress,

    /// Amount charged, in whole currency units
    pub total_amount: u64,

    /// Payment reference
    pub payment_id: PaymentId,

    /// Coupon redeemed, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<CouponCode>,

    /// Current status
    pub status: OrderStatus,

    /// When the order was placed
    pub created_at: Timestamp,
}

/// Order creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Owner
    pub user_id: UserId,

    /// Items purchased
    pub items: Vec<LineItem>,

    /// Shipping address
    pub delivery_address: DeliveryAddress,

    /// Amount charged, in whole currency units
    pub total_amount: u64,

    /// Payment reference
    pub payment_id: PaymentId,

    /// Coupon redeemed, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<CouponCode>,
}

/// Newest first, ties broken by id so the order is stable.
fn newest_first(a: &Order, b: &Order) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort orders for display: most recent first.
pub fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(newest_first);
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use testresult::TestResult;

    use super::*;

    fn order(id: &str, created_at: Timestamp) -> Order {
        Order {
            id: id.into(),
            user_id: "u1".into(),
            items: Vec::new(),
            delivery_address: DeliveryAddress::default(),
            total_amount: 590,
            payment_id: "pay_1".into(),
            coupon_code: None,
            status: OrderStatus::Pending,
            created_at,
        }
    }

    #[test]
    fn sorts_newest_first_with_id_tiebreak() -> TestResult {
        let t0 = Timestamp::UNIX_EPOCH;
        let t1 = t0.checked_add(24.hours())?;

        let mut orders = vec![order("b", t0), order("c", t1), order("a", t0)];

        sort_newest_first(&mut orders);

        let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();

        assert_eq!(ids, ["c", "a", "b"]);

        Ok(())
    }

    #[test]
    fn statuses_use_lowercase_wire_names() -> TestResult {
        assert_eq!(serde_json::to_string(&OrderStatus::Shipped)?, r#""shipped""#);

        let status: OrderStatus = serde_json::from_str(r#""cancelled""#)?;

        assert_eq!(status, OrderStatus::Cancelled);
        assert_eq!(status.to_string(), "Cancelled");

        Ok(())
    }

    #[test]
    fn deserializes_backend_orders() -> TestResult {
        let order: Order = serde_json::from_str(
            r#"{
                "id": "ord_42",
                "userId": "u1",
                "items": [{"productRef": "birthday-bliss", "quantity": 2}],
                "deliveryAddress": {
                    "name": "Asha Rao",
                    "street": "12 MG Road",
                    "city": "Bengaluru",
                    "state": "Karnataka",
                    "phone": "9876543210",
                    "pincode": "560001"
                },
                "totalAmount": 944,
                "paymentId": "pay_9",
                "couponCode": "festive20",
                "status": "confirmed",
                "createdAt": "2026-10-01T10:00:00Z"
            }"#,
        )?;

        assert_eq!(order.id.as_str(), "ord_42");
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.coupon_code.map(String::from), Some("FESTIVE20".to_string()));
        assert_eq!(order.status, OrderStatus::Confirmed);

        Ok(())
    }
}
