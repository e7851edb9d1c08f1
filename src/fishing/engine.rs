//! Public fishing service: one cast, one sale, and the read-only views.
//!
//! Every read-modify-write of a user's record runs under that user's own mutex, so
//! concurrent casts by one user never lose updates while different users proceed in
//! parallel. The service itself never sleeps or blocks on I/O beyond the store call;
//! reveal delays and cooldowns belong to the command layer.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use log::{debug, error, info};
use rand::Rng;
use uuid::Uuid;

use super::catalog::{Catalog, QualityTier};
use super::currency::{format_proceeds, sale_memo, CurrencySink};
use super::errors::FishingError;
use super::inventory::{self, SellTarget};
use super::luck::LuckProvider;
use super::progression::{advance, ProgressionRules};
use super::rod::{RodTable, WeightTable};
use super::sampler;
use super::types::{CatchOutcome, FishCatch, FishingStats, SaleOutcome, UserProgress};
use crate::config::FishingConfig;
use crate::metrics;
use crate::storage::ProgressStore;
use crate::validation::{escape_for_log, normalize_user_id};

pub struct FishingService {
    config: FishingConfig,
    catalog: Arc<Catalog>,
    store: Arc<dyn ProgressStore>,
    luck: Option<Arc<dyn LuckProvider>>,
    currency: Option<Arc<dyn CurrencySink>>,
    user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FishingService {
    pub fn new(config: FishingConfig, catalog: Arc<Catalog>, store: Arc<dyn ProgressStore>) -> Self {
        Self {
            config,
            catalog,
            store,
            luck: None,
            currency: None,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_luck(mut self, luck: Arc<dyn LuckProvider>) -> Self {
        self.luck = Some(luck);
        self
    }

    pub fn with_currency(mut self, currency: Arc<dyn CurrencySink>) -> Self {
        self.currency = Some(currency);
        self
    }

    pub fn config(&self) -> &FishingConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn user_lock(&self, user_id: &str) -> Result<Arc<Mutex<()>>, FishingError> {
        let mut locks = self
            .user_locks
            .lock()
            .map_err(|_| FishingError::Internal("user lock table poisoned".to_string()))?;
        // Entries only the table still references are idle
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        Ok(locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }

    fn load_or_create(&self, user_id: &str, now: DateTime<Utc>) -> Result<UserProgress, FishingError> {
        Ok(self
            .store
            .get_progress(user_id)?
            .unwrap_or_else(|| UserProgress::new(user_id, now)))
    }

    /// Cast once at the current time.
    pub fn catch_fish<R: Rng + ?Sized>(
        &self,
        user_id: &str,
        rng: &mut R,
    ) -> Result<CatchOutcome, FishingError> {
        self.catch_fish_at(user_id, Utc::now(), rng)
    }

    /// Cast once at `now`: draw a tier, a variant and a length, advance the rod, merge the
    /// catch into the bag and write the record back.
    pub fn catch_fish_at<R: Rng + ?Sized>(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<CatchOutcome, FishingError> {
        let user_id = normalize_user_id(Some(user_id))?;
        let lock = self.user_lock(&user_id)?;
        let _guard = lock
            .lock()
            .map_err(|_| FishingError::Internal("user lock poisoned".to_string()))?;

        let mut progress = self.load_or_create(&user_id, now)?;
        let luck_stars = self.luck.as_ref().and_then(|luck| luck.luck_stars(&user_id));
        let rods = RodTable::new(&self.config.rods);
        let weights = WeightTable::build(
            &self.catalog,
            rods,
            progress.rod_level,
            luck_stars,
            self.config.base_weight_increase,
            self.config.max_weight,
        );

        let tier = sampler::pick(&weights.weights, rng)?;
        let variant = self
            .catalog
            .draw_variant(tier, rods.special_fish_bonus(progress.rod_level), rng)?
            .clone();
        let length = self.catalog.draw_length(tier, rng);
        let fish = FishCatch::new(&variant.name, tier, length);

        let rules = ProgressionRules {
            rods,
            downgrade: &self.config.downgrade,
        };
        let experience = self.config.experience_for(tier.as_str());
        let transition = advance(&mut progress, &fish, experience, &rules, now, rng);

        inventory::merge(&mut progress.inventory, fish.clone());
        progress.touch(now);
        self.store.put_progress(&progress)?;

        metrics::record_catch(tier);
        debug!(
            "fishing: {} caught {} ({}, {}cm) rod={} stars={:?} total={}",
            escape_for_log(&user_id),
            fish.name,
            tier,
            fish.length,
            progress.rod_level,
            luck_stars,
            progress.total_catch_count
        );
        if let Some(reason) = &transition.downgrade {
            metrics::record_downgrade(reason);
            info!(
                "fishing: {} rod downgraded {} -> {} ({})",
                escape_for_log(&user_id),
                transition.previous_level,
                transition.new_level,
                reason.tag()
            );
        }
        if transition.upgraded {
            metrics::record_upgrade();
            info!(
                "fishing: {} rod upgraded {} -> {} at {} catches",
                escape_for_log(&user_id),
                transition.previous_level,
                transition.new_level,
                progress.total_catch_count
            );
        }

        Ok(CatchOutcome {
            fish,
            flavor: variant.flavor,
            previous_level: transition.previous_level,
            rod_level: transition.new_level,
            upgraded: transition.upgraded,
            downgrade: transition.downgrade,
            adjustment_mode: weights.adjustment_mode,
            luck_stars: weights.luck_stars,
            total_catch_count: progress.total_catch_count,
        })
    }

    /// Sell by fish name, quality, or everything (`all` / `*`).
    ///
    /// The emptied bag is written before proceeds are credited. A refused credit puts the
    /// sold fish back, and a failed write credits nothing.
    pub fn sell_fish(&self, user_id: &str, input: &str) -> Result<SaleOutcome, FishingError> {
        let user_id = normalize_user_id(Some(user_id))?;
        let lock = self.user_lock(&user_id)?;
        let _guard = lock
            .lock()
            .map_err(|_| FishingError::Internal("user lock poisoned".to_string()))?;

        let Some(mut progress) = self.store.get_progress(&user_id)? else {
            return Err(FishingError::EmptyInventory);
        };
        let target = SellTarget::parse(input, &self.catalog);
        let before = progress.clone();
        let (removed, price) = inventory::sell(&mut progress.inventory, &target, &self.catalog)?;
        if removed.is_empty() {
            return Ok(SaleOutcome {
                price: 0.0,
                removed,
                sale_id: None,
            });
        }

        let sale_id = Uuid::new_v4();
        progress.touch(Utc::now());
        self.store.put_progress(&progress)?;
        if let Some(currency) = &self.currency {
            if let Err(e) = currency.credit(&user_id, price, &sale_memo(sale_id, removed.len())) {
                if let Err(restore) = self.store.put_progress(&before) {
                    error!(
                        "fishing: sale {} for {} not credited and bag not restored: {}",
                        sale_id,
                        escape_for_log(&user_id),
                        restore
                    );
                }
                return Err(e);
            }
        }

        metrics::record_sale(removed.len(), price);
        info!(
            "fishing: {} sold {} entries for {} (target '{}', sale {})",
            escape_for_log(&user_id),
            removed.len(),
            format_proceeds(price),
            escape_for_log(input),
            sale_id
        );
        Ok(SaleOutcome {
            price,
            removed,
            sale_id: Some(sale_id),
        })
    }

    /// The user's bag grouped by quality; every tier is present.
    pub fn inventory(&self, user_id: &str) -> Result<BTreeMap<QualityTier, Vec<FishCatch>>, FishingError> {
        let user_id = normalize_user_id(Some(user_id))?;
        let items = self
            .store
            .get_progress(&user_id)?
            .map(|p| p.inventory)
            .unwrap_or_default();
        Ok(inventory::group_by_quality(&items))
    }

    /// Raw bag contents in insertion order.
    pub fn inventory_list(&self, user_id: &str) -> Result<Vec<FishCatch>, FishingError> {
        let user_id = normalize_user_id(Some(user_id))?;
        Ok(self
            .store
            .get_progress(&user_id)?
            .map(|p| p.inventory)
            .unwrap_or_default())
    }

    /// Counters for the stats command. Unknown users read as zeros at the normal rod.
    pub fn stats(&self, user_id: &str) -> Result<FishingStats, FishingError> {
        let user_id = normalize_user_id(Some(user_id))?;
        Ok(self
            .store
            .get_progress(&user_id)?
            .map(|p| FishingStats::from_progress(&p))
            .unwrap_or_default())
    }
}
