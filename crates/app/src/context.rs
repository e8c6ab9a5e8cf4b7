//! App Context

use std::{path::PathBuf, sync::Arc};

use giftpack::{
    orders::UserId,
    pricing::PricingConfig,
    products::{Catalog, CatalogFileError},
};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::{
    backend::{
        BackendError, CartsService, CatalogService, CouponsService, DeliveryService, HttpBackend,
        OrdersService, payments::PaymentGateway,
    },
    checkout::CheckoutService,
    config::AppConfig,
    coupons::CouponGate,
    session::{AuthState, SessionReconciler},
    storage::FileStorage,
    store::CartStore,
};

/// Why the application context could not be built.
#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to configure backend")]
    Backend(#[source] BackendError),

    #[error("tax rate must be between 0 and 100, got {0}")]
    InvalidTaxRate(Decimal),
}

/// Why the catalog could not be loaded.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to load catalog snapshot file")]
    File(#[from] CatalogFileError),

    #[error("failed to fetch catalog")]
    Backend(#[from] BackendError),
}

/// Services and settings shared by every command.
#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogService>,
    pub coupons: Arc<dyn CouponsService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub delivery: Arc<dyn DeliveryService>,
    pub pricing: PricingConfig,
    data_dir: PathBuf,
    catalog_file: Option<PathBuf>,
    user: Option<UserId>,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend URL or tax rate is unusable.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        if config.tax_rate.is_sign_negative() || config.tax_rate > Decimal::ONE_HUNDRED {
            return Err(AppInitError::InvalidTaxRate(config.tax_rate));
        }

        let backend = Arc::new(HttpBackend::new(&config.backend_url).map_err(AppInitError::Backend)?);

        Ok(Self {
            catalog: backend.clone(),
            coupons: backend.clone(),
            carts: backend.clone(),
            orders: backend.clone(),
            delivery: backend,
            pricing: config.pricing(),
            data_dir: config.data_dir.clone(),
            catalog_file: config.catalog_file.clone(),
            user: config
                .user
                .as_deref()
                .map(str::trim)
                .filter(|user| !user.is_empty())
                .map(UserId::from),
        })
    }

    /// Authentication state for this invocation.
    pub fn auth_state(&self) -> AuthState {
        self.user
            .clone()
            .map_or(AuthState::Anonymous, AuthState::Authenticated)
    }

    /// Load the catalog from the configured snapshot file, or the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the backend fails.
    pub async fn load_catalog(&self) -> Result<Catalog, CatalogLoadError> {
        let catalog = match &self.catalog_file {
            Some(path) => Catalog::load_yaml(path)?,
            None => self.catalog.catalog_snapshot().await?,
        };

        debug!(entries = catalog.len(), "loaded catalog");

        Ok(catalog)
    }

    /// Open the persisted cart.
    pub async fn cart_store(&self) -> CartStore<FileStorage> {
        CartStore::load(FileStorage::new(&self.data_dir)).await
    }

    /// A coupon gate with nothing applied.
    pub fn coupon_gate(&self) -> CouponGate {
        CouponGate::new(self.coupons.clone())
    }

    /// A reconciler resuming from `last`.
    pub fn session(&self, last: AuthState) -> SessionReconciler {
        SessionReconciler::resume(self.carts.clone(), last)
    }

    /// Checkout wired to the backend, with the pincode check enabled.
    pub fn checkout(&self, payments: Arc<dyn PaymentGateway>) -> CheckoutService {
        CheckoutService::new(
            self.orders.clone(),
            self.carts.clone(),
            payments,
            self.pricing,
        )
        .with_delivery(self.delivery.clone())
    }
}
