//! # Fishing - reward generation and rod progression
//!
//! A cast draws a quality tier from weighted odds (base weight, plus a luck boost for rare
//! tiers, times the rod's bonus), then a fish variant and a length from that tier. The rod
//! levels up on catch-count thresholds and loses a level on inactivity, long bad streaks,
//! or an unlucky fish. Catches stack in the user's bag by total length and sell for
//! `length * price`.
//!
//! - [`catalog`] - quality tiers and their fish
//! - [`sampler`] - weighted draw
//! - [`luck`] - luck stars and the rare-tier boost
//! - [`rod`] - rod levels, bonuses, and the per-cast weight table
//! - [`progression`] - upgrade/downgrade state machine
//! - [`inventory`] - bag merge and selling
//! - [`engine`] - the [`FishingService`] tying it together

pub mod catalog;
pub mod currency;
pub mod engine;
pub mod errors;
pub mod inventory;
pub mod luck;
pub mod progression;
pub mod rod;
pub mod sampler;
pub mod types;

pub use catalog::{Catalog, FishVariant, QualityConfig, QualityTier};
pub use currency::CurrencySink;
pub use engine::FishingService;
pub use errors::{FishingError, SampleError};
pub use inventory::SellTarget;
pub use luck::{DailyLuck, FixedLuck, LuckProvider};
pub use rod::{RodLevel, RodTable, WeightTable};
pub use types::{
    CatchOutcome, DowngradeReason, FishCatch, FishingStats, SaleOutcome, UserProgress,
};
