//! Test utilities & fixtures shared by the integration tests.

use std::sync::Arc;

use meshfish::config::{Config, FishingConfig};
use meshfish::fishing::{Catalog, FishVariant, FishingService, QualityConfig, QualityTier};
use meshfish::storage::MemoryStore;

/// Catalog with a single tier holding a single fish of fixed length.
#[allow(dead_code)]
pub fn one_fish_catalog(tier: QualityTier, fish: FishVariant, length: u32, price: f64) -> Arc<Catalog> {
    Arc::new(Catalog::new(vec![QualityConfig {
        tier,
        display: tier.display().to_string(),
        weight: 10.0,
        price,
        length_range: (length, length),
        fishes: vec![fish],
    }]))
}

/// Service over an in-memory store with default fishing rules.
#[allow(dead_code)]
pub fn memory_service(catalog: Arc<Catalog>) -> (Arc<MemoryStore>, FishingService) {
    let store = Arc::new(MemoryStore::new());
    let service = FishingService::new(FishingConfig::default(), catalog, store.clone());
    (store, service)
}

/// Config whose data directory lives inside `dir`, with no log file.
#[allow(dead_code)]
pub fn temp_config(dir: &tempfile::TempDir) -> Config {
    let mut config = Config::default();
    config.storage.data_dir = dir.path().to_string_lossy().to_string();
    config.logging.file = None;
    config.commands.admins = vec!["sysop".to_string()];
    config
}
