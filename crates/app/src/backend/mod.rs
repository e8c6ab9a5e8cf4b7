//! Backend
//!
//! Contracts for the remote collaborators the storefront depends on, and an
//! HTTP implementation of them.

use thiserror::Error;

mod catalog;
mod carts;
mod coupons;
mod delivery;
mod http;
mod orders;
pub mod payments;

pub use catalog::{CatalogService, MockCatalogService};
pub use carts::{CartsService, MockCartsService};
pub use coupons::{CouponsService, MockCouponsService};
pub use delivery::{DeliveryService, MockDeliveryService};
pub use http::HttpBackend;
pub use orders::{MockOrdersService, OrdersService};

/// Errors returned by backend collaborators.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request could not be sent or the response could not be decoded.
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with an unexpected status.
    #[error("backend returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        body: String,
    },

    /// The backend does not offer this operation.
    #[error("backend does not support {0}")]
    Unsupported(&'static str),

    /// The backend is unreachable or refused to serve the request.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The configured base URL cannot be used.
    #[error("invalid backend url: {0}")]
    InvalidBaseUrl(String),
}
