//! Giftpack
//!
//! Cart, pricing and coupon engine for a gift-pack storefront. This crate is
//! the synchronous core: catalog snapshots, carts, coupon rules, totals, order
//! snapshots and the order summary table. Backends, persistence and session
//! handling live in the `giftpack-app` crate.

pub mod cart;
pub mod coupons;
pub mod items;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod summary;
pub mod validation;

mod utils;
