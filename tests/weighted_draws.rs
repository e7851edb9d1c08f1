use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use meshfish::config::FishingConfig;
use meshfish::fishing::luck::{adjusted_weight, luck_boost};
use meshfish::fishing::sampler;
use meshfish::fishing::{Catalog, QualityTier, RodLevel, RodTable, WeightTable};

#[test]
fn tier_frequencies_follow_weights_at_every_rod_level() {
    let cfg = FishingConfig::default();
    let rods = RodTable::new(&cfg.rods);
    let mut rng = StdRng::seed_from_u64(0x5eed);
    const DRAWS: usize = 100_000;

    for level in [RodLevel::Normal, RodLevel::Void] {
        let table = WeightTable::build(
            Catalog::standard(),
            rods,
            level,
            Some(3),
            cfg.base_weight_increase,
            cfg.max_weight,
        );
        let total: f64 = table.weights.iter().map(|(_, w)| w).sum();
        let mut counts: HashMap<QualityTier, usize> = HashMap::new();
        for _ in 0..DRAWS {
            let tier = sampler::pick(&table.weights, &mut rng).unwrap();
            *counts.entry(tier).or_default() += 1;
        }
        for (tier, weight) in &table.weights {
            let expected = weight / total;
            let observed = counts.get(tier).copied().unwrap_or(0) as f64 / DRAWS as f64;
            assert!(
                (expected - observed).abs() < 0.01,
                "{:?} at {}: expected {:.4}, observed {:.4}",
                tier,
                level,
                expected,
                observed
            );
        }
    }
}

#[test]
fn boost_grows_with_stars_and_respects_the_ceiling() {
    let mut previous = luck_boost(1.9, Some(0));
    assert_eq!(previous, 0.0);
    assert_eq!(luck_boost(1.9, None), 0.0);
    for stars in 1..40 {
        let boost = luck_boost(1.9, Some(stars));
        assert!(boost > previous, "boost not increasing at {}", stars);
        previous = boost;
        for base in [1.0, 3.0, 5.0] {
            assert!(adjusted_weight(base, boost, 20.0) <= 20.0);
        }
    }
}

#[test]
fn rare_tiers_gain_share_with_luck() {
    let cfg = FishingConfig::default();
    let rods = RodTable::new(&cfg.rods);
    let share = |stars: Option<i32>| {
        let table = WeightTable::build(
            Catalog::standard(),
            rods,
            RodLevel::Normal,
            stars,
            cfg.base_weight_increase,
            cfg.max_weight,
        );
        let total: f64 = table.weights.iter().map(|(_, w)| w).sum();
        let rare: f64 = table
            .weights
            .iter()
            .filter(|(t, _)| t.is_rare())
            .map(|(_, w)| w)
            .sum();
        rare / total
    };
    assert!(share(Some(10)) > share(Some(1)));
    assert!((share(None) - share(Some(0))).abs() < 1e-12);
}
