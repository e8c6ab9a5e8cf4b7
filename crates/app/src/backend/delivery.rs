//! Delivery service contract.

use async_trait::async_trait;
use mockall::automock;

use super::BackendError;

#[automock]
#[async_trait]
pub trait DeliveryService: Send + Sync {
    /// Whether orders can be shipped to `pincode`.
    async fn is_pincode_serviceable(&self, pincode: &str) -> Result<bool, BackendError>;
}
