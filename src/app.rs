//! Wiring: open the store, build the catalog and service, attach the optional luck and
//! currency collaborators, and hand back a ready [`CommandProcessor`].

use anyhow::{Context, Result};
use log::info;
use std::sync::Arc;

use crate::chat::CommandProcessor;
use crate::config::Config;
use crate::fishing::{Catalog, DailyLuck, FishingService};
use crate::storage::{FishingStore, FishingStoreBuilder};

pub struct FishingApp {
    pub store: Arc<FishingStore>,
    pub service: Arc<FishingService>,
    pub processor: CommandProcessor,
}

impl FishingApp {
    pub fn open(config: &Config) -> Result<Self> {
        let db_path = config.storage.resolved_db_path();
        let store = Arc::new(
            FishingStoreBuilder::new(&db_path)
                .open()
                .with_context(|| format!("Failed to open fishing store at {}", db_path.display()))?,
        );

        let catalog = match &config.storage.catalog_seed {
            Some(path) => {
                let catalog = Catalog::load_json(path)
                    .with_context(|| format!("Failed to load catalog seed {}", path))?;
                info!("Loaded fish catalog from {}", path);
                catalog
            }
            None => Catalog::standard().clone(),
        };

        let mut service = FishingService::new(config.fishing.clone(), Arc::new(catalog), store.clone())
            .with_currency(store.clone());
        if config.luck.daily_enabled {
            service = service.with_luck(Arc::new(DailyLuck::new(config.luck.max_stars)));
        }
        let service = Arc::new(service);
        let processor = CommandProcessor::new(service.clone(), store.clone(), &config.commands);

        Ok(Self {
            store,
            service,
            processor,
        })
    }
}
