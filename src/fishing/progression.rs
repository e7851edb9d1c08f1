//! Rod progression state machine.
//!
//! Evaluated once per catch, in this order:
//! 1. remember the previous catch time, then bump counters, experience and the bad streak
//! 2. check downgrade triggers: inactivity, then consecutive-bad, then unlucky fish
//!    (the unlucky roll uses the pre-catch level's probability and is drawn only when the
//!    fish name matches)
//! 3. on a downgrade, step down one level and clear the bad streak
//! 4. only when no downgrade fired, check the upgrade threshold against the new total
//!
//! At most one transition happens per catch. A downgrade trigger at the floor level is
//! suppressed rather than treated as an error.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use super::rod::{RodLevel, RodTable};
use super::types::{DowngradeReason, FishCatch, UserProgress};
use crate::config::DowngradeConfig;

/// Rules consulted by [`advance`].
#[derive(Debug, Clone, Copy)]
pub struct ProgressionRules<'a> {
    pub rods: RodTable<'a>,
    pub downgrade: &'a DowngradeConfig,
}

/// What happened to the rod during one catch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub previous_level: RodLevel,
    pub new_level: RodLevel,
    pub upgraded: bool,
    pub downgrade: Option<DowngradeReason>,
}

/// Fold one catch into `progress` and evaluate rod transitions.
pub fn advance<R: Rng + ?Sized>(
    progress: &mut UserProgress,
    catch: &FishCatch,
    experience: u32,
    rules: &ProgressionRules<'_>,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Transition {
    let previous_catch = progress.last_catch_at;
    let previous_level = progress.rod_level;

    progress.total_catch_count = progress.total_catch_count.saturating_add(1);
    progress.experience = progress.experience.saturating_add(u64::from(experience));
    if catch.quality.is_bad() {
        progress.consecutive_bad_count = progress.consecutive_bad_count.saturating_add(1);
    } else {
        progress.consecutive_bad_count = 0;
    }
    progress.last_catch_at = Some(now);

    let downgrade = match previous_level.previous() {
        Some(lower) => {
            let reason = downgrade_trigger(progress, previous_catch, catch, rules, now, rng);
            if reason.is_some() {
                progress.rod_level = lower;
                progress.consecutive_bad_count = 0;
            }
            reason
        }
        None => None,
    };

    let mut upgraded = false;
    if downgrade.is_none() {
        if let (Some(threshold), Some(next)) = (
            rules.rods.upgrade_threshold(progress.rod_level),
            progress.rod_level.next(),
        ) {
            if progress.total_catch_count >= u64::from(threshold) {
                progress.rod_level = next;
                upgraded = true;
            }
        }
    }

    Transition {
        previous_level,
        new_level: progress.rod_level,
        upgraded,
        downgrade,
    }
}

fn downgrade_trigger<R: Rng + ?Sized>(
    progress: &UserProgress,
    previous_catch: Option<DateTime<Utc>>,
    catch: &FishCatch,
    rules: &ProgressionRules<'_>,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Option<DowngradeReason> {
    let cfg = rules.downgrade;

    if cfg.inactivity_days > 0 {
        if let Some(last) = previous_catch {
            if now.signed_duration_since(last) > Duration::days(cfg.inactivity_days) {
                return Some(DowngradeReason::Inactivity);
            }
        }
    }

    if cfg.consecutive_bad_threshold > 0
        && progress.consecutive_bad_count >= cfg.consecutive_bad_threshold
    {
        return Some(DowngradeReason::ConsecutiveBad);
    }

    if cfg.bad_fish_names.iter().any(|name| *name == catch.name) {
        let probability = rules.rods.downgrade_probability(progress.rod_level);
        let roll: f64 = rng.gen();
        if roll < probability {
            return Some(DowngradeReason::UnluckyFish(catch.name.clone()));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FishingConfig;
    use crate::fishing::catalog::QualityTier;
    use chrono::TimeZone;
    use rand::rngs::mock::StepRng;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    /// Every roll is 0.0, so any positive probability succeeds.
    fn always_hit() -> StepRng {
        StepRng::new(0, 0)
    }

    /// Every roll is just below 1.0, so probability rolls fail.
    fn always_miss() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    fn progress_at(level: RodLevel, total: u64) -> UserProgress {
        let mut p = UserProgress::new("u", t0());
        p.rod_level = level;
        p.total_catch_count = total;
        p.last_catch_at = Some(t0());
        p
    }

    fn common() -> FishCatch {
        FishCatch::new("Grass Carp", QualityTier::Common, 10)
    }

    fn rotten(name: &str) -> FishCatch {
        FishCatch::new(name, QualityTier::Rotten, 20)
    }

    #[test]
    fn crossing_threshold_upgrades_exactly_once() {
        let cfg = FishingConfig::default();
        let rules = ProgressionRules {
            rods: RodTable::new(&cfg.rods),
            downgrade: &cfg.downgrade,
        };
        let mut p = progress_at(RodLevel::Normal, 48);
        let t = advance(&mut p, &common(), 1, &rules, t0(), &mut always_miss());
        assert!(!t.upgraded);
        assert_eq!(p.total_catch_count, 49);

        let t = advance(&mut p, &common(), 1, &rules, t0(), &mut always_miss());
        assert!(t.upgraded);
        assert_eq!(t.downgrade, None);
        assert_eq!(t.previous_level, RodLevel::Normal);
        assert_eq!(p.rod_level, RodLevel::Silver);
        assert_eq!(p.total_catch_count, 50);

        // Silver needs 150, so the next catch stays put.
        let t = advance(&mut p, &common(), 1, &rules, t0(), &mut always_miss());
        assert!(!t.upgraded);
        assert_eq!(p.rod_level, RodLevel::Silver);
    }

    #[test]
    fn large_backlog_still_moves_one_level() {
        let cfg = FishingConfig::default();
        let rules = ProgressionRules {
            rods: RodTable::new(&cfg.rods),
            downgrade: &cfg.downgrade,
        };
        let mut p = progress_at(RodLevel::Normal, 10_000);
        advance(&mut p, &common(), 1, &rules, t0(), &mut always_miss());
        assert_eq!(p.rod_level, RodLevel::Silver);
    }

    #[test]
    fn top_level_never_upgrades() {
        let cfg = FishingConfig::default();
        let rules = ProgressionRules {
            rods: RodTable::new(&cfg.rods),
            downgrade: &cfg.downgrade,
        };
        let mut p = progress_at(RodLevel::Void, 99_999);
        let t = advance(&mut p, &common(), 1, &rules, t0(), &mut always_miss());
        assert!(!t.upgraded);
        assert_eq!(p.rod_level, RodLevel::Void);
    }

    #[test]
    fn bad_streak_at_threshold_downgrades() {
        let cfg = FishingConfig::default();
        let rules = ProgressionRules {
            rods: RodTable::new(&cfg.rods),
            downgrade: &cfg.downgrade,
        };
        let mut p = progress_at(RodLevel::Gold, 200);
        p.consecutive_bad_count = 9;
        let t = advance(&mut p, &rotten("Deadbeat Crab"), 1, &rules, t0(), &mut always_miss());
        assert_eq!(t.downgrade, Some(DowngradeReason::ConsecutiveBad));
        assert_eq!(t.downgrade.as_ref().unwrap().tag(), "consecutive-bad");
        assert_eq!(p.rod_level, RodLevel::Silver);
        assert_eq!(p.consecutive_bad_count, 0);
        // No upgrade in the same tick even though 201 >= 150.
        assert!(!t.upgraded);
    }

    #[test]
    fn good_catch_resets_streak() {
        let cfg = FishingConfig::default();
        let rules = ProgressionRules {
            rods: RodTable::new(&cfg.rods),
            downgrade: &cfg.downgrade,
        };
        let mut p = progress_at(RodLevel::Silver, 60);
        p.consecutive_bad_count = 8;
        advance(&mut p, &FishCatch::new("Soggy Sashimi", QualityTier::Moldy, 30), 1, &rules, t0(), &mut always_miss());
        assert_eq!(p.consecutive_bad_count, 9);
        advance(&mut p, &common(), 1, &rules, t0(), &mut always_miss());
        assert_eq!(p.consecutive_bad_count, 0);
        assert_eq!(p.rod_level, RodLevel::Silver);
    }

    #[test]
    fn floor_level_downgrade_is_a_no_op() {
        let cfg = FishingConfig::default();
        let rules = ProgressionRules {
            rods: RodTable::new(&cfg.rods),
            downgrade: &cfg.downgrade,
        };
        let mut p = progress_at(RodLevel::Normal, 5);
        p.consecutive_bad_count = 20;
        let t = advance(&mut p, &rotten("Overtime Carp"), 1, &rules, t0(), &mut always_hit());
        assert_eq!(t.downgrade, None);
        assert_eq!(p.rod_level, RodLevel::Normal);
        assert_eq!(p.consecutive_bad_count, 21);
    }

    #[test]
    fn inactivity_uses_previous_catch_time() {
        let cfg = FishingConfig::default();
        let rules = ProgressionRules {
            rods: RodTable::new(&cfg.rods),
            downgrade: &cfg.downgrade,
        };
        let mut p = progress_at(RodLevel::Holy, 400);
        let later = t0() + Duration::days(8);
        let t = advance(&mut p, &common(), 1, &rules, later, &mut always_miss());
        assert_eq!(t.downgrade, Some(DowngradeReason::Inactivity));
        assert_eq!(p.rod_level, RodLevel::Gold);
        assert_eq!(p.last_catch_at, Some(later));

        // Exactly seven days is not "more than" seven days.
        let mut p = progress_at(RodLevel::Holy, 400);
        let t = advance(&mut p, &common(), 1, &rules, t0() + Duration::days(7), &mut always_miss());
        assert_eq!(t.downgrade, None);
    }

    #[test]
    fn unlucky_fish_depends_on_the_roll() {
        let cfg = FishingConfig::default();
        let rules = ProgressionRules {
            rods: RodTable::new(&cfg.rods),
            downgrade: &cfg.downgrade,
        };
        let mut p = progress_at(RodLevel::Silver, 60);
        let t = advance(&mut p, &rotten("Overtime Carp"), 1, &rules, t0(), &mut always_miss());
        assert_eq!(t.downgrade, None);
        assert_eq!(p.rod_level, RodLevel::Silver);

        let t = advance(&mut p, &rotten("Overtime Carp"), 1, &rules, t0(), &mut always_hit());
        assert_eq!(
            t.downgrade,
            Some(DowngradeReason::UnluckyFish("Overtime Carp".into()))
        );
        assert_eq!(t.downgrade.as_ref().unwrap().tag(), "unlucky-fish");
        assert_eq!(p.rod_level, RodLevel::Normal);
    }

    #[test]
    fn experience_is_cumulative_across_transitions() {
        let cfg = FishingConfig::default();
        let rules = ProgressionRules {
            rods: RodTable::new(&cfg.rods),
            downgrade: &cfg.downgrade,
        };
        let mut p = progress_at(RodLevel::Normal, 49);
        p.experience = 49;
        advance(&mut p, &common(), 3, &rules, t0(), &mut always_miss());
        assert_eq!(p.rod_level, RodLevel::Silver);
        assert_eq!(p.experience, 52);
    }
}
