//! Cart Store
//!
//! Owns the session's cart. Every mutation updates the in-memory cart, writes
//! the whole cart to local storage and then publishes the new snapshot to
//! subscribers.

use giftpack::{
    cart::{Cart, CartError},
    coupons::Coupon,
    items::LineItem,
    orders::UserId,
    pricing::{PricingConfig, Totals},
    products::{Catalog, ProductRef},
};
use serde::Deserialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    backend::{BackendError, CartsService},
    storage::KeyValueStorage,
};

/// Storage key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "giftpack-cart";

/// Stored cart layouts. Older clients stored a bare array of line items.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PersistedCart {
    Record(Cart),
    Legacy(Vec<LineItem>),
}

impl PersistedCart {
    fn into_cart(self) -> Cart {
        let items = match self {
            PersistedCart::Record(cart) => cart.into_items(),
            PersistedCart::Legacy(items) => items,
        };

        Cart::from_items(items)
    }
}

/// The session's cart, kept in step with local storage.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    cart: Cart,
    updates: watch::Sender<Cart>,
}

impl<S: KeyValueStorage> CartStore<S> {
    /// Load the persisted cart.
    ///
    /// Never fails: a missing entry gives an empty cart, and an unreadable or
    /// corrupt entry is logged and also gives an empty cart.
    pub async fn load(storage: S) -> Self {
        let cart = match storage.get(CART_STORAGE_KEY).await {
            Ok(Some(stored)) => match serde_json::from_str::<PersistedCart>(&stored) {
                Ok(persisted) => persisted.into_cart(),
                Err(error) => {
                    warn!(%error, "discarding unreadable stored cart");
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(error) => {
                warn!(%error, "failed to read stored cart");
                Cart::new()
            }
        };

        debug!(items = cart.len(), "loaded cart");

        let (updates, _) = watch::channel(cart.clone());

        Self {
            storage,
            cart,
            updates,
        }
    }

    /// Current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Storage backing this store.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Receive a snapshot after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.updates.subscribe()
    }

    /// Total units in the cart.
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Totals for the current cart.
    pub fn totals(
        &self,
        catalog: &Catalog,
        coupon: Option<&Coupon>,
        config: &PricingConfig,
    ) -> Totals {
        self.cart.totals(catalog, coupon, config)
    }

    /// Add an item, merging with an existing line item with the same key.
    pub async fn add_item(&mut self, item: LineItem) {
        self.cart.add_item(item);
        self.commit().await;
    }

    /// Set the quantity for a product. Zero removes it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] when the product is not in the cart;
    /// nothing is persisted in that case.
    pub async fn update_quantity(
        &mut self,
        product: &ProductRef,
        quantity: u64,
    ) -> Result<(), CartError> {
        self.cart.update_quantity(product, quantity)?;
        self.commit().await;

        Ok(())
    }

    /// Remove every line item for a product.
    pub async fn remove_item(&mut self, product: &ProductRef) -> usize {
        let removed = self.cart.remove_item(product);

        self.commit().await;

        removed
    }

    /// Empty the cart.
    pub async fn clear(&mut self) {
        self.cart.clear();
        self.commit().await;
    }

    /// Empty the cart and ask the backend to drop the user's server copy.
    ///
    /// The remote clear is best effort: failures are logged, not returned.
    #[tracing::instrument(name = "store.clear_everywhere", skip(self, carts), fields(user_id = %user))]
    pub async fn clear_everywhere(&mut self, carts: &dyn CartsService, user: &UserId) {
        self.clear().await;

        if let Err(error) = carts.clear_remote_cart(user).await {
            warn!(%error, "failed to clear remote cart");
        }
    }

    /// Set a product's quantity locally, then mirror it to the user's server copy.
    ///
    /// Zero removes the product in both places. The remote update is best
    /// effort: a missing remote line, a backend without quantity updates and
    /// transport failures are logged, not returned.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] when the product is not in the local
    /// cart; the backend is not called in that case.
    #[tracing::instrument(
        name = "store.update_quantity_everywhere",
        skip(self, carts),
        fields(user_id = %user, product = %product),
        err
    )]
    pub async fn update_quantity_everywhere(
        &mut self,
        carts: &dyn CartsService,
        user: &UserId,
        product: &ProductRef,
        quantity: u64,
    ) -> Result<(), CartError> {
        self.update_quantity(product, quantity).await?;

        match carts
            .update_remote_cart_item_quantity(user, product, quantity)
            .await
        {
            Ok(Some(remote)) => debug!(items = remote.len(), "updated remote cart"),
            Ok(None) => debug!("product not in remote cart"),
            Err(BackendError::Unsupported(operation)) => {
                debug!(operation, "backend does not support remote quantity updates");
            }
            Err(error) => warn!(%error, "failed to update remote cart"),
        }

        Ok(())
    }

    /// Replace the whole cart, as when the server copy wins on sign-in.
    pub async fn replace(&mut self, cart: Cart) {
        self.cart = cart;
        self.commit().await;
    }

    /// Empty the cart and delete the persisted entry.
    pub async fn discard(&mut self) {
        self.cart.clear();

        if let Err(error) = self.storage.remove(CART_STORAGE_KEY).await {
            warn!(%error, "failed to remove stored cart");
        }

        self.publish();
    }

    /// Persist then publish. A failed write keeps the in-memory change.
    async fn commit(&mut self) {
        match serde_json::to_string(&self.cart) {
            Ok(json) => {
                if let Err(error) = self.storage.set(CART_STORAGE_KEY, &json).await {
                    warn!(%error, "failed to persist cart");
                }
            }
            Err(error) => warn!(%error, "failed to serialize cart"),
        }

        self.publish();
    }

    fn publish(&self) {
        self.updates.send_replace(self.cart.clone());

        info!(
            items = self.cart.len(),
            units = self.cart.item_count(),
            "cart updated"
        );
    }
}
