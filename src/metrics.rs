//! Process-wide fishing counters.
//! Cheap enough to bump on every catch; read back through [`snapshot`].
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock};

use crate::fishing::catalog::QualityTier;
use crate::fishing::types::DowngradeReason;

static CATCHES_TOTAL: AtomicU64 = AtomicU64::new(0);
static UPGRADES: AtomicU64 = AtomicU64::new(0);
static SALES: AtomicU64 = AtomicU64::new(0);
static FISH_SOLD: AtomicU64 = AtomicU64::new(0);
/// Sale proceeds in hundredths.
static PROCEEDS_CENTS: AtomicU64 = AtomicU64::new(0);

static LABELLED: OnceLock<Mutex<LabelledCounters>> = OnceLock::new();

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct LabelledCounters {
    catches_by_tier: HashMap<String, u64>,
    downgrades_by_reason: HashMap<String, u64>,
}

fn labelled() -> MutexGuard<'static, LabelledCounters> {
    LABELLED
        .get_or_init(|| Mutex::new(LabelledCounters::default()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn record_catch(tier: QualityTier) {
    CATCHES_TOTAL.fetch_add(1, Ordering::Relaxed);
    let mut guard = labelled();
    let counter = guard
        .catches_by_tier
        .entry(tier.as_str().to_string())
        .or_default();
    *counter = counter.saturating_add(1);
}

pub fn record_upgrade() {
    UPGRADES.fetch_add(1, Ordering::Relaxed);
}

pub fn record_downgrade(reason: &DowngradeReason) {
    let mut guard = labelled();
    let counter = guard
        .downgrades_by_reason
        .entry(reason.tag().to_string())
        .or_default();
    *counter = counter.saturating_add(1);
}

pub fn record_sale(fish_count: usize, proceeds: f64) {
    SALES.fetch_add(1, Ordering::Relaxed);
    FISH_SOLD.fetch_add(fish_count as u64, Ordering::Relaxed);
    if proceeds.is_finite() && proceeds > 0.0 {
        PROCEEDS_CENTS.fetch_add((proceeds * 100.0).round() as u64, Ordering::Relaxed);
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Snapshot {
    pub catches_total: u64,
    pub catches_by_tier: HashMap<String, u64>,
    pub upgrades: u64,
    pub downgrades_by_reason: HashMap<String, u64>,
    pub sales: u64,
    pub fish_sold: u64,
    pub proceeds: f64,
}

impl Snapshot {
    pub fn downgrades_total(&self) -> u64 {
        self.downgrades_by_reason.values().sum()
    }
}

pub fn snapshot() -> Snapshot {
    let guard = labelled();
    Snapshot {
        catches_total: CATCHES_TOTAL.load(Ordering::Relaxed),
        catches_by_tier: guard.catches_by_tier.clone(),
        upgrades: UPGRADES.load(Ordering::Relaxed),
        downgrades_by_reason: guard.downgrades_by_reason.clone(),
        sales: SALES.load(Ordering::Relaxed),
        fish_sold: FISH_SOLD.load(Ordering::Relaxed),
        proceeds: PROCEEDS_CENTS.load(Ordering::Relaxed) as f64 / 100.0,
    }
}
