//! Rod levels, their quality bonuses, and the per-tier draw weights derived from them.
//!
//! Final weight per tier: `clamp(base + luck_boost_if_rare, 0, max_weight) * rod_multiplier`.
//! The additive luck step (with its clamp) always runs before the multiplicative rod step.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::catalog::{Catalog, QualityTier};
use super::luck::{adjusted_weight, luck_boost};
use crate::config::RodConfig;

/// Ordered progression tiers of a user's fishing rod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RodLevel {
    #[default]
    Normal,
    Silver,
    Gold,
    Holy,
    Void,
}

impl RodLevel {
    pub const ALL: [RodLevel; 5] = [
        RodLevel::Normal,
        RodLevel::Silver,
        RodLevel::Gold,
        RodLevel::Holy,
        RodLevel::Void,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RodLevel::Normal => "normal",
            RodLevel::Silver => "silver",
            RodLevel::Gold => "gold",
            RodLevel::Holy => "holy",
            RodLevel::Void => "void",
        }
    }

    /// Next level up, `None` at the top.
    pub fn next(self) -> Option<RodLevel> {
        match self {
            RodLevel::Normal => Some(RodLevel::Silver),
            RodLevel::Silver => Some(RodLevel::Gold),
            RodLevel::Gold => Some(RodLevel::Holy),
            RodLevel::Holy => Some(RodLevel::Void),
            RodLevel::Void => None,
        }
    }

    /// Next level down, `None` at the floor.
    pub fn previous(self) -> Option<RodLevel> {
        match self {
            RodLevel::Normal => None,
            RodLevel::Silver => Some(RodLevel::Normal),
            RodLevel::Gold => Some(RodLevel::Silver),
            RodLevel::Holy => Some(RodLevel::Gold),
            RodLevel::Void => Some(RodLevel::Holy),
        }
    }
}

impl std::fmt::Display for RodLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view over the configured rod table. Lookups fail open.
#[derive(Debug, Clone, Copy)]
pub struct RodTable<'a> {
    rods: &'a HashMap<String, RodConfig>,
}

impl<'a> RodTable<'a> {
    pub fn new(rods: &'a HashMap<String, RodConfig>) -> Self {
        Self { rods }
    }

    pub fn config(&self, level: RodLevel) -> Option<&'a RodConfig> {
        self.rods.get(level.as_str())
    }

    /// Multiplicative bonus for `tier` at `level`; exactly 1.0 when not configured.
    pub fn rod_multiplier(&self, level: RodLevel, tier: QualityTier) -> f64 {
        self.config(level)
            .and_then(|rod| rod.quality_bonus.get(tier.as_str()).copied())
            .unwrap_or(1.0)
    }

    /// Total catch count needed to leave `level`. `None` at the top level or when the
    /// level has no config or no requirement.
    pub fn upgrade_threshold(&self, level: RodLevel) -> Option<u32> {
        level.next()?;
        match self.config(level) {
            Some(rod) => rod.upgrade_requirement,
            None => {
                warn!("fishing: no rod config for '{}', upgrades disabled", level);
                None
            }
        }
    }

    pub fn downgrade_probability(&self, level: RodLevel) -> f64 {
        self.config(level)
            .map(|rod| rod.downgrade_probability)
            .unwrap_or(0.0)
    }

    pub fn special_fish_bonus(&self, level: RodLevel) -> f64 {
        self.config(level)
            .map(|rod| rod.special_fish_bonus)
            .unwrap_or(1.0)
    }

    pub fn display(&self, level: RodLevel) -> String {
        self.config(level)
            .map(|rod| rod.display.clone())
            .unwrap_or_else(|| level.as_str().to_string())
    }
}

/// Per-tier draw weights for one catch, in declared tier order.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable {
    pub weights: Vec<(QualityTier, f64)>,
    /// True when a luck reading was applied to the rare tiers.
    pub adjustment_mode: bool,
    pub luck_stars: Option<i32>,
}

impl WeightTable {
    pub fn build(
        catalog: &Catalog,
        rods: RodTable<'_>,
        level: RodLevel,
        luck_stars: Option<i32>,
        base_weight_increase: f64,
        max_weight: f64,
    ) -> Self {
        let boost = luck_boost(base_weight_increase, luck_stars);
        let weights = catalog
            .tiers()
            .map(|cfg| {
                let base = if luck_stars.is_some() && cfg.tier.is_rare() {
                    adjusted_weight(cfg.weight, boost, max_weight)
                } else {
                    cfg.weight
                };
                (cfg.tier, base * rods.rod_multiplier(level, cfg.tier))
            })
            .collect();
        Self {
            weights,
            adjustment_mode: luck_stars.is_some(),
            luck_stars,
        }
    }

    pub fn weight_of(&self, tier: QualityTier) -> f64 {
        self.weights
            .iter()
            .find(|(t, _)| *t == tier)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }
}
