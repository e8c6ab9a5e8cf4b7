//! Catalog service contract.

use async_trait::async_trait;
use giftpack::products::Catalog;
use mockall::automock;

use super::BackendError;

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetch the current catalog snapshot.
    async fn catalog_snapshot(&self) -> Result<Catalog, BackendError>;
}
