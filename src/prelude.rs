//! Giftpack prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError},
    coupons::{Coupon, CouponCode, CouponError, CouponInactive, calculate_coupon_discount},
    items::LineItem,
    orders::{NewOrder, Order, OrderId, OrderStatus, PaymentId, UserId, sort_newest_first},
    pricing::{PricingConfig, Totals, calculate_totals},
    products::{Catalog, CatalogEntry, CatalogFileError, ProductRef},
    summary::{OrderSummary, SummaryError},
    validation::{AddressError, AddressField, DeliveryAddress, validate_phone, validate_pincode},
};
