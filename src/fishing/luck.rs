//! Luck stars and the rare-tier weight boost they grant.
//!
//! The boost is exponential in the star count: `base * (1.1^stars - 1)`. Zero stars and
//! an absent luck service are both neutral. Only rare tiers (golden, void, hidden fire)
//! receive it, and the boosted weight is clamped to the configured ceiling.

use chrono::{DateTime, Utc};
use crc::{Crc, CRC_32_ISO_HDLC};

/// Growth factor per luck star.
pub const LUCK_GROWTH: f64 = 1.1;

const LUCK_CRC: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Additive weight boost for rare tiers. `None` means no luck service is available.
pub fn luck_boost(base_weight_increase: f64, luck_stars: Option<i32>) -> f64 {
    match luck_stars {
        None | Some(0) => 0.0,
        Some(stars) => base_weight_increase * (LUCK_GROWTH.powi(stars) - 1.0),
    }
}

/// Apply an additive boost to a base weight and clamp the result to `[0, max_weight]`.
pub fn adjusted_weight(base_weight: f64, boost: f64, max_weight: f64) -> f64 {
    (base_weight + boost).min(max_weight).max(0.0)
}

/// Source of a user's luck star count. Absence of a provider is the neutral default.
pub trait LuckProvider: Send + Sync {
    /// Star count for `user_id`, or `None` when the user has no reading.
    fn luck_stars(&self, user_id: &str) -> Option<i32>;
}

/// Returns the same star count for everyone.
#[derive(Debug, Clone, Copy)]
pub struct FixedLuck(pub i32);

impl LuckProvider for FixedLuck {
    fn luck_stars(&self, _user_id: &str) -> Option<i32> {
        Some(self.0)
    }
}

/// Built-in daily fortune: each user gets a stable star count per UTC day.
#[derive(Debug, Clone, Copy)]
pub struct DailyLuck {
    pub max_stars: u8,
}

impl DailyLuck {
    pub fn new(max_stars: u8) -> Self {
        Self { max_stars }
    }

    /// Star count for `user_id` on the UTC day containing `now`.
    pub fn stars_on(&self, user_id: &str, now: DateTime<Utc>) -> i32 {
        let key = format!("{}:{}", user_id, now.format("%Y-%m-%d"));
        let digest = LUCK_CRC.checksum(key.as_bytes());
        (digest % (u32::from(self.max_stars) + 1)) as i32
    }
}

impl LuckProvider for DailyLuck {
    fn luck_stars(&self, user_id: &str) -> Option<i32> {
        Some(self.stars_on(user_id, Utc::now()))
    }
}
