//! Catalog repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{CatalogEntry, CatalogKey};
use crate::domain::DomainError;

/// Read-only lookup over the known-equipment catalog
#[async_trait]
pub trait CatalogRepository: Send + Sync + Debug {
    /// Get an entry by brand + model
    async fn get(&self, key: &CatalogKey) -> Result<Option<CatalogEntry>, DomainError>;

    /// List all entries
    async fn list(&self) -> Result<Vec<CatalogEntry>, DomainError>;

    /// Look up an entry, failing when the key has no catalog mapping.
    ///
    /// Label sets and the catalog can drift apart; this surfaces the drift
    /// instead of valuing against missing data.
    async fn require(&self, key: &CatalogKey) -> Result<CatalogEntry, DomainError> {
        self.get(key).await?.ok_or_else(|| {
            DomainError::unknown_catalog_entry(key.brand(), key.model())
        })
    }
}
