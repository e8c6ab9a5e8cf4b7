//! Remote carts service contract.

use async_trait::async_trait;
use giftpack::{cart::Cart, orders::UserId, products::ProductRef};
use mockall::automock;

use super::BackendError;

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Fetch the server copy of a user's cart, if one exists.
    async fn get_remote_cart(&self, user: &UserId) -> Result<Option<Cart>, BackendError>;

    /// Replace the server copy of a user's cart.
    async fn save_remote_cart(&self, user: &UserId, cart: &Cart) -> Result<(), BackendError>;

    /// Delete the server copy of a user's cart.
    async fn clear_remote_cart(&self, user: &UserId) -> Result<(), BackendError>;

    /// Set the quantity of a product in the server copy. Zero removes it.
    ///
    /// Returns the updated cart, or `None` when the user has no server cart.
    /// Backends without item-level updates return [`BackendError::Unsupported`].
    async fn update_remote_cart_item_quantity(
        &self,
        user: &UserId,
        product: &ProductRef,
        quantity: u64,
    ) -> Result<Option<Cart>, BackendError>;
}
