//! In-memory catalog repository

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::catalog::{CatalogEntry, CatalogKey, CatalogRepository, RarityTier};
use crate::domain::DomainError;

/// In-memory catalog keyed by (brand, model)
#[derive(Debug, Default)]
pub struct InMemoryCatalogRepository {
    entries: RwLock<HashMap<CatalogKey, CatalogEntry>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with a set of entries
    pub fn with_entries(entries: Vec<CatalogEntry>) -> Self {
        let map = entries
            .into_iter()
            .map(|e| (e.key().clone(), e))
            .collect();
        Self {
            entries: RwLock::new(map),
        }
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn get(&self, key: &CatalogKey) -> Result<Option<CatalogEntry>, DomainError> {
        let entries = self.entries.read().unwrap();
        Ok(entries.get(key).cloned())
    }

    async fn list(&self) -> Result<Vec<CatalogEntry>, DomainError> {
        let entries = self.entries.read().unwrap();
        let mut all: Vec<_> = entries.values().cloned().collect();
        all.sort_by(|a, b| a.key().to_string().cmp(&b.key().to_string()));
        Ok(all)
    }
}

/// The shipped catalog of known lacrosse heads.
///
/// One entry per class label the default model can predict.
pub fn default_catalog() -> Vec<CatalogEntry> {
    let raw: [(&str, &str, f64, RarityTier); 14] = [
        ("STX", "Proton Power", 45.0, RarityTier::Mass),
        ("STX", "Excalibur", 60.0, RarityTier::Legacy),
        ("STX", "Sabre", 55.0, RarityTier::Legacy),
        ("Brine", "Edge", 85.0, RarityTier::Collector),
        ("Brine", "Superlight", 65.0, RarityTier::Legacy),
        ("Brine", "Cyber", 90.0, RarityTier::Collector),
        ("Warrior", "Blade", 120.0, RarityTier::Rare),
        ("Warrior", "Razer", 95.0, RarityTier::Collector),
        ("Warrior", "Jett", 110.0, RarityTier::Rare),
        ("Warrior", "Revolution", 70.0, RarityTier::Legacy),
        ("Warrior", "Blade Prototype", 250.0, RarityTier::Prototype),
        ("deBeer", "Intercept", 40.0, RarityTier::Mass),
        ("Nike", "Blur", 50.0, RarityTier::Mass),
        ("Harrow", "P7", 35.0, RarityTier::Mass),
    ];

    raw.into_iter()
        .map(|(brand, model, base, tier)| {
            let key = CatalogKey::new(brand, model).expect("static catalog keys are non-empty");
            CatalogEntry::new(key, base, tier).expect("static catalog values are valid")
        })
        .collect()
}

/// Class labels matching `default_catalog`, in training order
pub fn default_labels() -> Vec<String> {
    default_catalog()
        .iter()
        .map(|e| e.key().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_and_require() {
        let repo = InMemoryCatalogRepository::with_entries(default_catalog());

        let key = CatalogKey::new("Warrior", "Blade").unwrap();
        let entry = repo.get(&key).await.unwrap().unwrap();
        assert_eq!(entry.base_value(), 120.0);
        assert_eq!(entry.rarity_tier(), RarityTier::Rare);

        let missing = CatalogKey::new("Acme", "Nonesuch").unwrap();
        assert!(repo.get(&missing).await.unwrap().is_none());

        let err = repo.require(&missing).await.unwrap_err();
        assert!(matches!(err, DomainError::UnknownCatalogEntry { .. }));
    }

    #[tokio::test]
    async fn test_list_is_sorted() {
        let repo = InMemoryCatalogRepository::with_entries(default_catalog());
        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 14);
        let names: Vec<String> = all.iter().map(|e| e.key().to_string()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_default_catalog_covers_all_tiers() {
        let catalog = default_catalog();
        for tier in RarityTier::ALL {
            assert!(
                catalog.iter().any(|e| e.rarity_tier() == tier),
                "no entry for tier {}",
                tier
            );
        }
    }

    #[test]
    fn test_default_labels_match_catalog() {
        let labels = default_labels();
        assert_eq!(labels.len(), 14);
        for label in &labels {
            let key = CatalogKey::from_label(label).unwrap();
            assert!(default_catalog().iter().any(|e| e.key() == &key));
        }
    }
}
