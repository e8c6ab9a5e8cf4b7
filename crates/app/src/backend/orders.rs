//! Orders service contract.

use async_trait::async_trait;
use giftpack::orders::{NewOrder, Order, UserId};
use mockall::automock;

use super::BackendError;

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Place an order.
    async fn create_order(&self, order: NewOrder) -> Result<Order, BackendError>;

    /// List a user's orders in backend order.
    async fn list_orders(&self, user: &UserId) -> Result<Vec<Order>, BackendError>;
}
