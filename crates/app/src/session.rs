//! Session reconciliation
//!
//! Keeps the local cart and the signed-in user's server cart consistent as the
//! authentication state changes. Each transition is reconciled exactly once.

use std::sync::Arc;

use giftpack::{cart::Cart, orders::UserId};
use tracing::{info, warn};

use crate::{backend::CartsService, storage::KeyValueStorage, store::CartStore};

/// Authentication state reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Nobody is signed in.
    Anonymous,
    /// A user is signed in.
    Authenticated(UserId),
}

impl AuthState {
    /// Signed-in user, if any.
    pub fn user(&self) -> Option<&UserId> {
        match self {
            AuthState::Anonymous => None,
            AuthState::Authenticated(user) => Some(user),
        }
    }
}

/// What reconciliation did for one observed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The state matched the last observed one.
    Unchanged,
    /// The server cart replaced the local cart.
    AdoptedRemote,
    /// The local cart was saved as the server cart.
    PushedLocal,
    /// Both carts were empty.
    NothingToSync,
    /// The local cart was cleared on sign-out.
    ClearedLocal,
    /// The backend failed; the local cart was left as it was.
    Failed,
}

/// Watches authentication state and reconciles carts on each change.
#[derive(Clone)]
pub struct SessionReconciler {
    carts: Arc<dyn CartsService>,
    last: Option<AuthState>,
}

impl SessionReconciler {
    /// Start with no observed state. The first observation of a signed-in
    /// user counts as a sign-in.
    pub fn new(carts: Arc<dyn CartsService>) -> Self {
        Self { carts, last: None }
    }

    /// Start from a known state, as when resuming a previous session.
    pub fn resume(carts: Arc<dyn CartsService>, last: AuthState) -> Self {
        Self {
            carts,
            last: Some(last),
        }
    }

    /// Last observed state.
    pub fn last(&self) -> Option<&AuthState> {
        self.last.as_ref()
    }

    /// Observe the current authentication state and reconcile if it changed.
    ///
    /// Switching directly between two users is handled as a sign-out of the
    /// first followed by a sign-in of the second; the sign-in outcome is
    /// returned.
    pub async fn observe<S: KeyValueStorage>(
        &mut self,
        state: AuthState,
        store: &mut CartStore<S>,
    ) -> ReconcileOutcome {
        if self.last.as_ref() == Some(&state) {
            return ReconcileOutcome::Unchanged;
        }

        let previous = self.last.replace(state.clone());
        let was_signed_in = previous.as_ref().and_then(AuthState::user);

        match (was_signed_in, state) {
            (Some(user), AuthState::Anonymous) => {
                info!(user_id = %user, "signed out");

                Self::sign_out(store).await
            }
            (Some(previous), AuthState::Authenticated(user)) => {
                info!(from = %previous, to = %user, "switched user");

                Self::sign_out(store).await;
                self.sign_in(&user, store).await
            }
            (None, AuthState::Authenticated(user)) => self.sign_in(&user, store).await,
            (None, AuthState::Anonymous) => ReconcileOutcome::Unchanged,
        }
    }

    #[tracing::instrument(name = "session.sign_in", skip(self, store), fields(user_id = %user))]
    async fn sign_in<S: KeyValueStorage>(
        &self,
        user: &UserId,
        store: &mut CartStore<S>,
    ) -> ReconcileOutcome {
        let remote = match self.carts.get_remote_cart(user).await {
            Ok(remote) => Cart::from_items(remote.unwrap_or_default().into_items()),
            Err(error) => {
                warn!(%error, "failed to fetch remote cart");
                return ReconcileOutcome::Failed;
            }
        };

        if !remote.is_empty() {
            info!(items = remote.len(), "adopting remote cart");

            store.replace(remote).await;

            return ReconcileOutcome::AdoptedRemote;
        }

        if store.cart().is_empty() {
            return ReconcileOutcome::NothingToSync;
        }

        if let Err(error) = self.carts.save_remote_cart(user, store.cart()).await {
            warn!(%error, "failed to save local cart remotely");
            return ReconcileOutcome::Failed;
        }

        info!(items = store.cart().len(), "pushed local cart");

        ReconcileOutcome::PushedLocal
    }

    async fn sign_out<S: KeyValueStorage>(store: &mut CartStore<S>) -> ReconcileOutcome {
        store.discard().await;

        ReconcileOutcome::ClearedLocal
    }
}

impl std::fmt::Debug for SessionReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionReconciler")
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use giftpack::items::LineItem;
    use testresult::TestResult;

    use crate::{
        backend::{BackendError, MockCartsService},
        storage::MemoryStorage,
        store::CART_STORAGE_KEY,
    };

    use super::*;

    fn signed_in(user: &str) -> AuthState {
        AuthState::Authenticated(user.into())
    }

    fn remote_cart() -> TestResult<Cart> {
        Ok(Cart::from_items([
            LineItem::new("festive-hamper", 2)?,
            LineItem::new("birthday-bliss", 1)?.with_custom_message("Happy Birthday"),
        ]))
    }

    async fn store_with(items: Vec<LineItem>) -> CartStore<MemoryStorage> {
        let mut store = CartStore::load(MemoryStorage::new()).await;

        for item in items {
            store.add_item(item).await;
        }

        store
    }

    #[tokio::test]
    async fn sign_in_adopts_non_empty_remote_cart() -> TestResult {
        let remote = remote_cart()?;
        let expected = remote.clone();

        let mut carts = MockCartsService::new();

        carts
            .expect_get_remote_cart()
            .once()
            .withf(|user| user.as_str() == "u1")
            .return_once(move |_| Ok(Some(remote)));

        carts.expect_save_remote_cart().never();

        let mut store = store_with(vec![LineItem::new("thank-you-tin", 4)?]).await;
        let mut reconciler = SessionReconciler::new(Arc::new(carts));

        let outcome = reconciler.observe(signed_in("u1"), &mut store).await;

        assert_eq!(outcome, ReconcileOutcome::AdoptedRemote);
        assert_eq!(store.cart(), &expected);

        Ok(())
    }

    #[tokio::test]
    async fn sign_in_pushes_local_cart_when_remote_is_empty() -> TestResult {
        let local = vec![LineItem::new("thank-you-tin", 4)?];
        let expected = Cart::from_items(local.clone());
        let pushed = expected.clone();

        let mut carts = MockCartsService::new();

        carts
            .expect_get_remote_cart()
            .once()
            .return_once(|_| Ok(Some(Cart::new())));

        carts
            .expect_save_remote_cart()
            .once()
            .withf(move |user, cart| user.as_str() == "u1" && *cart == pushed)
            .return_once(|_, _| Ok(()));

        let mut store = store_with(local).await;
        let mut reconciler = SessionReconciler::new(Arc::new(carts));

        let outcome = reconciler.observe(signed_in("u1"), &mut store).await;

        assert_eq!(outcome, ReconcileOutcome::PushedLocal);
        assert_eq!(store.cart(), &expected);

        Ok(())
    }

    #[tokio::test]
    async fn remote_cart_of_zero_quantities_counts_as_empty() -> TestResult {
        let local = vec![LineItem::new("festive-hamper", 3)?];
        let expected = Cart::from_items(local.clone());
        let pushed = expected.clone();

        let remote: Cart =
            serde_json::from_str(r#"{"items":[{"productRef":"gone","quantity":0}]}"#)?;

        let mut carts = MockCartsService::new();

        carts
            .expect_get_remote_cart()
            .once()
            .return_once(move |_| Ok(Some(remote)));

        carts
            .expect_save_remote_cart()
            .once()
            .withf(move |_, cart| *cart == pushed)
            .return_once(|_, _| Ok(()));

        let mut store = store_with(local).await;
        let mut reconciler = SessionReconciler::new(Arc::new(carts));

        let outcome = reconciler.observe(signed_in("u1"), &mut store).await;

        assert_eq!(outcome, ReconcileOutcome::PushedLocal);
        assert_eq!(store.cart(), &expected);

        Ok(())
    }

    #[tokio::test]
    async fn sign_in_with_both_carts_empty_does_nothing() {
        let mut carts = MockCartsService::new();

        carts
            .expect_get_remote_cart()
            .once()
            .return_once(|_| Ok(None));

        carts.expect_save_remote_cart().never();

        let mut store = store_with(Vec::new()).await;
        let mut reconciler = SessionReconciler::new(Arc::new(carts));

        let outcome = reconciler.observe(signed_in("u1"), &mut store).await;

        assert_eq!(outcome, ReconcileOutcome::NothingToSync);
    }

    #[tokio::test]
    async fn sign_out_clears_local_cart_without_pushing() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_get_remote_cart().never();
        carts.expect_save_remote_cart().never();
        carts.expect_clear_remote_cart().never();

        let mut store = store_with(vec![LineItem::new("festive-hamper", 1)?]).await;
        let mut reconciler = SessionReconciler::resume(Arc::new(carts), signed_in("u1"));

        let outcome = reconciler.observe(AuthState::Anonymous, &mut store).await;

        assert_eq!(outcome, ReconcileOutcome::ClearedLocal);
        assert!(store.cart().is_empty());
        assert_eq!(store.storage().get(CART_STORAGE_KEY).await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn each_transition_is_reconciled_once() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_get_remote_cart()
            .once()
            .return_once(|_| Ok(None));

        let mut store = store_with(Vec::new()).await;
        let mut reconciler = SessionReconciler::new(Arc::new(carts));

        assert_eq!(
            reconciler.observe(signed_in("u1"), &mut store).await,
            ReconcileOutcome::NothingToSync
        );
        assert_eq!(
            reconciler.observe(signed_in("u1"), &mut store).await,
            ReconcileOutcome::Unchanged
        );
        assert_eq!(reconciler.last(), Some(&signed_in("u1")));

        Ok(())
    }

    #[tokio::test]
    async fn anonymous_start_keeps_the_local_cart() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_get_remote_cart().never();

        let mut store = store_with(vec![LineItem::new("festive-hamper", 1)?]).await;
        let mut reconciler = SessionReconciler::new(Arc::new(carts));

        let outcome = reconciler.observe(AuthState::Anonymous, &mut store).await;

        assert_eq!(outcome, ReconcileOutcome::Unchanged);
        assert_eq!(store.item_count(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn backend_failure_leaves_local_cart_intact() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_get_remote_cart()
            .once()
            .return_once(|_| Err(BackendError::Unavailable("timeout".to_string())));

        carts.expect_save_remote_cart().never();

        let local = vec![LineItem::new("festive-hamper", 3)?];
        let expected = Cart::from_items(local.clone());

        let mut store = store_with(local).await;
        let mut reconciler = SessionReconciler::new(Arc::new(carts));

        let outcome = reconciler.observe(signed_in("u1"), &mut store).await;

        assert_eq!(outcome, ReconcileOutcome::Failed);
        assert_eq!(store.cart(), &expected);
        assert_eq!(
            reconciler.observe(signed_in("u1"), &mut store).await,
            ReconcileOutcome::Unchanged
        );

        Ok(())
    }

    #[tokio::test]
    async fn switching_users_signs_out_then_in() -> TestResult {
        let remote = remote_cart()?;
        let expected = remote.clone();

        let mut carts = MockCartsService::new();

        carts
            .expect_get_remote_cart()
            .once()
            .withf(|user| user.as_str() == "u2")
            .return_once(move |_| Ok(Some(remote)));

        carts.expect_save_remote_cart().never();

        let mut store = store_with(vec![LineItem::new("thank-you-tin", 1)?]).await;
        let mut reconciler = SessionReconciler::resume(Arc::new(carts), signed_in("u1"));

        let outcome = reconciler.observe(signed_in("u2"), &mut store).await;

        assert_eq!(outcome, ReconcileOutcome::AdoptedRemote);
        assert_eq!(store.cart(), &expected);

        Ok(())
    }

    #[tokio::test]
    async fn switching_users_does_not_leak_the_previous_cart() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_get_remote_cart()
            .once()
            .return_once(|_| Ok(None));

        carts.expect_save_remote_cart().never();

        let mut store = store_with(vec![LineItem::new("thank-you-tin", 1)?]).await;
        let mut reconciler = SessionReconciler::resume(Arc::new(carts), signed_in("u1"));

        let outcome = reconciler.observe(signed_in("u2"), &mut store).await;

        assert_eq!(outcome, ReconcileOutcome::NothingToSync);
        assert!(store.cart().is_empty());

        Ok(())
    }
}
