//! Storefront services: backend contracts, cart persistence, coupon
//! validation, session reconciliation and checkout.

pub mod backend;
pub mod checkout;
pub mod config;
pub mod context;
pub mod coupons;
pub mod history;
pub mod logging;
pub mod session;
pub mod storage;
pub mod store;
