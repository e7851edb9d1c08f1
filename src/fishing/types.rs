use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::QualityTier;
use super::rod::RodLevel;

pub const PROGRESS_SCHEMA_VERSION: u8 = 1;

/// A drawn fish. In an inventory, `length` is the accumulated length of every catch
/// sharing the same name and quality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FishCatch {
    pub name: String,
    pub quality: QualityTier,
    pub length: u32,
}

impl FishCatch {
    pub fn new(name: &str, quality: QualityTier, length: u32) -> Self {
        Self {
            name: name.to_string(),
            quality,
            length,
        }
    }

    /// Identity used when merging into an inventory.
    pub fn same_kind(&self, other: &FishCatch) -> bool {
        self.quality == other.quality && self.name == other.name
    }
}

/// Persistent fishing state for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    pub schema_version: u8,
    pub user_id: String,
    pub rod_level: RodLevel,
    /// Lifetime experience; never reset by rod transitions.
    pub experience: u64,
    pub total_catch_count: u64,
    /// Run length of back-to-back rotten/moldy catches.
    pub consecutive_bad_count: u32,
    pub last_catch_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub inventory: Vec<FishCatch>,
}

impl UserProgress {
    pub fn new(user_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            schema_version: PROGRESS_SCHEMA_VERSION,
            user_id: user_id.to_string(),
            rod_level: RodLevel::Normal,
            experience: 0,
            total_catch_count: 0,
            consecutive_bad_count: 0,
            last_catch_at: None,
            created_at: now,
            updated_at: now,
            inventory: Vec::new(),
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// Sum of every stored length.
    pub fn total_length(&self) -> u64 {
        self.inventory.iter().map(|f| u64::from(f.length)).sum()
    }
}

/// Why a rod lost a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DowngradeReason {
    /// Too long since the previous catch.
    Inactivity,
    /// Too many rotten/moldy catches in a row.
    ConsecutiveBad,
    /// Caught a fish from the unlucky list and lost the roll.
    UnluckyFish(String),
}

impl DowngradeReason {
    /// Stable tag suitable for logs and reply formatting.
    pub fn tag(&self) -> &'static str {
        match self {
            DowngradeReason::Inactivity => "inactivity",
            DowngradeReason::ConsecutiveBad => "consecutive-bad",
            DowngradeReason::UnluckyFish(_) => "unlucky-fish",
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DowngradeReason::Inactivity => "your rod rusted from disuse".to_string(),
            DowngradeReason::ConsecutiveBad => "a long run of bad catches wore it down".to_string(),
            DowngradeReason::UnluckyFish(name) => format!("the {} cursed it", name),
        }
    }
}

/// Result of one cast, as returned to the command layer.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchOutcome {
    pub fish: FishCatch,
    pub flavor: Option<String>,
    pub previous_level: RodLevel,
    pub rod_level: RodLevel,
    pub upgraded: bool,
    pub downgrade: Option<DowngradeReason>,
    pub adjustment_mode: bool,
    pub luck_stars: Option<i32>,
    pub total_catch_count: u64,
}

impl CatchOutcome {
    pub fn downgraded(&self) -> bool {
        self.downgrade.is_some()
    }
}

/// Result of a sale.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleOutcome {
    pub price: f64,
    pub removed: Vec<FishCatch>,
    pub sale_id: Option<uuid::Uuid>,
}

/// Summary counters for the stats command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FishingStats {
    pub total_catch_count: u64,
    pub rod_level: RodLevel,
    pub consecutive_bad_count: u32,
    pub experience: u64,
    pub total_length: u64,
}

impl FishingStats {
    pub fn from_progress(progress: &UserProgress) -> Self {
        Self {
            total_catch_count: progress.total_catch_count,
            rod_level: progress.rod_level,
            consecutive_bad_count: progress.consecutive_bad_count,
            experience: progress.experience,
            total_length: progress.total_length(),
        }
    }
}

impl Default for FishingStats {
    fn default() -> Self {
        Self {
            total_catch_count: 0,
            rod_level: RodLevel::Normal,
            consecutive_bad_count: 0,
            experience: 0,
            total_length: 0,
        }
    }
}
