//! Quality tiers and the fish that live in them.
//!
//! The catalog is immutable once built. [`Catalog::standard`] hands out a process-wide
//! table initialized on first use; custom tables (tests, seed files) are built with
//! [`Catalog::new`] or [`Catalog::load_json`] at startup and shared behind an `Arc`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use super::errors::FishingError;
use super::sampler;

/// Rarity class of a catch, in declared draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Rotten,
    Moldy,
    Common,
    Golden,
    Void,
    HiddenFire,
}

impl QualityTier {
    pub const ALL: [QualityTier; 6] = [
        QualityTier::Rotten,
        QualityTier::Moldy,
        QualityTier::Common,
        QualityTier::Golden,
        QualityTier::Void,
        QualityTier::HiddenFire,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QualityTier::Rotten => "rotten",
            QualityTier::Moldy => "moldy",
            QualityTier::Common => "common",
            QualityTier::Golden => "golden",
            QualityTier::Void => "void",
            QualityTier::HiddenFire => "hidden_fire",
        }
    }

    /// Default display name; catalogs may carry their own.
    pub fn display(self) -> &'static str {
        match self {
            QualityTier::Rotten => "Rotten",
            QualityTier::Moldy => "Moldy",
            QualityTier::Common => "Common",
            QualityTier::Golden => "Golden",
            QualityTier::Void => "Void",
            QualityTier::HiddenFire => "Hidden Fire",
        }
    }

    /// Low-quality tiers that feed the consecutive-bad streak.
    pub fn is_bad(self) -> bool {
        matches!(self, QualityTier::Rotten | QualityTier::Moldy)
    }

    /// Tiers that receive the luck boost.
    pub fn is_rare(self) -> bool {
        matches!(
            self,
            QualityTier::Golden | QualityTier::Void | QualityTier::HiddenFire
        )
    }

    /// Accepts the identifier (`hidden_fire`) or display name (`Hidden Fire`), any case.
    pub fn parse(input: &str) -> Option<QualityTier> {
        let needle = input.trim();
        QualityTier::ALL.into_iter().find(|tier| {
            tier.as_str().eq_ignore_ascii_case(needle) || tier.display().eq_ignore_ascii_case(needle)
        })
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named fish within a tier, optionally carrying a line of flavor text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishVariant {
    pub name: String,
    #[serde(default)]
    pub flavor: Option<String>,
}

impl FishVariant {
    pub fn plain(name: &str) -> Self {
        Self {
            name: name.to_string(),
            flavor: None,
        }
    }

    pub fn with_flavor(name: &str, flavor: &str) -> Self {
        Self {
            name: name.to_string(),
            flavor: Some(flavor.to_string()),
        }
    }
}

/// Static configuration of one quality tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityConfig {
    pub tier: QualityTier,
    pub display: String,
    /// Base draw weight before luck and rod adjustments.
    pub weight: f64,
    /// Sale price per unit of length.
    pub price: f64,
    /// Inclusive length bounds.
    pub length_range: (u32, u32),
    pub fishes: Vec<FishVariant>,
}

/// Immutable table of quality tiers indexed by [`QualityTier`].
#[derive(Debug, Clone)]
pub struct Catalog {
    tiers: HashMap<QualityTier, QualityConfig>,
}

static STANDARD_CATALOG: OnceLock<Catalog> = OnceLock::new();

impl Catalog {
    /// Build a catalog from tier configs. Later duplicates of a tier replace earlier ones.
    pub fn new(configs: Vec<QualityConfig>) -> Self {
        let tiers = configs.into_iter().map(|cfg| (cfg.tier, cfg)).collect();
        Self { tiers }
    }

    /// The built-in six-tier catalog.
    pub fn standard() -> &'static Catalog {
        STANDARD_CATALOG.get_or_init(|| Catalog::new(standard_tiers()))
    }

    /// Load a catalog seed file: a JSON array of [`QualityConfig`].
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Catalog, FishingError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let configs: Vec<QualityConfig> = serde_json::from_str(&contents)?;
        Ok(Catalog::new(configs))
    }

    pub fn get(&self, tier: QualityTier) -> Option<&QualityConfig> {
        self.tiers.get(&tier)
    }

    /// Configured tiers in declared order.
    pub fn tiers(&self) -> impl Iterator<Item = &QualityConfig> + '_ {
        QualityTier::ALL.into_iter().filter_map(|tier| self.tiers.get(&tier))
    }

    /// Base weight of a tier; tiers missing from the catalog weigh nothing.
    pub fn base_weight(&self, tier: QualityTier) -> f64 {
        self.get(tier).map(|cfg| cfg.weight).unwrap_or(0.0)
    }

    pub fn price(&self, tier: QualityTier) -> f64 {
        self.get(tier).map(|cfg| cfg.price).unwrap_or(0.0)
    }

    pub fn display(&self, tier: QualityTier) -> &str {
        self.get(tier)
            .map(|cfg| cfg.display.as_str())
            .unwrap_or_else(|| tier.display())
    }

    /// Resolve a tier from its identifier or this catalog's display name.
    pub fn parse_quality(&self, input: &str) -> Option<QualityTier> {
        let needle = input.trim();
        if let Some(tier) = QualityTier::parse(needle) {
            return Some(tier);
        }
        self.tiers()
            .find(|cfg| cfg.display.eq_ignore_ascii_case(needle))
            .map(|cfg| cfg.tier)
    }

    /// Draw a fish variant from `tier`. Variants with flavor text weigh
    /// `special_fish_bonus`, plain ones weigh 1.0.
    pub fn draw_variant<R: Rng + ?Sized>(
        &self,
        tier: QualityTier,
        special_fish_bonus: f64,
        rng: &mut R,
    ) -> Result<&FishVariant, FishingError> {
        let cfg = self
            .get(tier)
            .ok_or_else(|| FishingError::Internal(format!("tier {} missing from catalog", tier)))?;
        let weighted: Vec<(usize, f64)> = cfg
            .fishes
            .iter()
            .enumerate()
            .map(|(idx, fish)| {
                let w = if fish.flavor.is_some() {
                    special_fish_bonus
                } else {
                    1.0
                };
                (idx, w)
            })
            .collect();
        let idx = sampler::pick(&weighted, rng)?;
        Ok(&cfg.fishes[idx])
    }

    /// Draw a length within the tier's inclusive range. A degenerate range yields its minimum.
    pub fn draw_length<R: Rng + ?Sized>(&self, tier: QualityTier, rng: &mut R) -> u32 {
        let Some(cfg) = self.get(tier) else {
            return 1;
        };
        let (min, max) = cfg.length_range;
        if min >= max {
            return min;
        }
        rng.gen_range(min..=max)
    }
}

fn tier_config(
    tier: QualityTier,
    weight: f64,
    price: f64,
    length_range: (u32, u32),
    fishes: Vec<FishVariant>,
) -> QualityConfig {
    QualityConfig {
        tier,
        display: tier.display().to_string(),
        weight,
        price,
        length_range,
        fishes,
    }
}

fn standard_tiers() -> Vec<QualityConfig> {
    use FishVariant as F;
    vec![
        tier_config(
            QualityTier::Rotten,
            20.0,
            0.05,
            (15, 45),
            vec![
                F::with_flavor("Overtime Carp", "It clocked in at 9am and never clocked out."),
                F::with_flavor("Couch Potato Perch", "Too tired to struggle. Too tired to do anything."),
                F::plain("Deadbeat Crab"),
                F::with_flavor("Salted Herring", "It flipped over! ...no, still salted."),
                F::plain("Meltdown Lobster"),
                F::with_flavor("Gloomy Starfish", "It sighs at you in five directions."),
                F::plain("Hollow Shark"),
                F::with_flavor("All-Nighter Eel", "Tells you to sleep early. Has not slept in days."),
                F::plain("Expired Pickle Fish"),
                F::plain("Sad Sack Sunfish"),
                F::with_flavor("Low Battery Minnow", "Blinking at 1%. It knows how you feel."),
                F::plain("Toxic Puffer"),
                F::plain("Deflated Balloonfish"),
                F::plain("Public Embarrassment Bass"),
                F::with_flavor("Monday Blues Trout", "Every cast is a Monday to this one."),
                F::plain("Bankrupt Bream"),
            ],
        ),
        tier_config(
            QualityTier::Moldy,
            15.0,
            0.08,
            (20, 150),
            vec![
                F::with_flavor("Hello World Guppy", "printf(\"Hello, fishing world!\");"),
                F::with_flavor("404 Flounder", "Page not found. Fish found."),
                F::with_flavor("Introvert Ide", "Avoids eye contact and swims to a corner."),
                F::plain("Pixel-Off Pollock"),
                F::plain("Lucky Koi Reject"),
                F::plain("Eel Rice Leftovers"),
                F::plain("Soggy Sashimi"),
                F::with_flavor("Replaced-By-AI Ray", "Worried a model will take its job. It is a fish."),
                F::plain("Broken API Bluegill"),
                F::with_flavor("Debug-Till-Dawn Dace", "Its eyes are red from a night of stack traces."),
                F::plain("Failed Exam Flathead"),
                F::plain("Delayed Release Roach"),
                F::plain("Dead-Eyed Drum"),
            ],
        ),
        tier_config(
            QualityTier::Common,
            100.0,
            0.1,
            (1, 30),
            vec![
                F::plain("Imperial Swordfish"),
                F::with_flavor("Fish", "It swims freely, enjoying life. It is simply a fish."),
                F::with_flavor("River", "The river got tired and rested... wait, you caught a river?!"),
                F::with_flavor("Sunny Sunfish", "Its optimism is contagious."),
                F::plain("Lucky Koi"),
                F::plain("Angel Shrimp"),
                F::plain("Deep Sea Mackerel"),
                F::plain("Rock Lobster"),
                F::plain("Atlantic Salmon"),
                F::plain("Grass Carp"),
                F::plain("Bighead Carp"),
                F::plain("Pink Starfish"),
                F::plain("Silver Carp"),
                F::plain("Yellow Croaker"),
                F::plain("Garden Goby"),
                F::with_flavor("Slacker Fish", "A fish that slacks off, caught while you slack off."),
                F::plain("Aquarium Escapee"),
                F::plain("Grumpy Crayfish"),
                F::plain("Insomniac Snapper"),
            ],
        ),
        tier_config(
            QualityTier::Golden,
            5.0,
            0.15,
            (125, 800),
            vec![
                F::plain("Tycoon Tuna"),
                F::plain("Snapping Turtle"),
                F::with_flavor("Makeover Mullet", "Fresh from the salon and glittering gold."),
                F::with_flavor("Legendary Fishing Rod", "You caught a fishing rod with a fishing rod?"),
                F::plain("Hairy Crab"),
                F::plain("Glazed Eel"),
                F::plain("Boston Lobster"),
                F::plain("Diamond Rockfish"),
                F::with_flavor("Humblebrag Halibut", "\"I was just swimming around and got caught, no big deal.\""),
                F::plain("Bluefin Tuna"),
                F::with_flavor("Gold Bar Grouper", "Made entirely of bullion. You are rich."),
                F::with_flavor("Koi of Fortune", "The legendary koi. Good luck follows it."),
                F::with_flavor("Overclocked Jellyfish", "Runs hot. Benchmarks great."),
                F::plain("Index Fund Flounder"),
            ],
        ),
        tier_config(
            QualityTier::Void,
            3.0,
            0.2,
            (800, 4000),
            vec![
                F::plain("Abyssal Squid"),
                F::with_flavor("Invisible Fish", "Are you sure you caught something? You can't see it."),
                F::plain("Spirit of the Deep"),
                F::with_flavor("Laser Cannon Fish", "Piu piu piu! It fires."),
                F::plain("Salmon Emperor"),
                F::plain("Midnight Pearl"),
                F::with_flavor("Pure Essence of Fish", "This is what fish is. Pure, distilled fish."),
                F::with_flavor("Zen Herring", "It has transcended. It regards you calmly."),
                F::with_flavor("Cyberpunk Shark", "A 2077 model. Chipped and chromed."),
                F::with_flavor("Antimatter Ray", "Do not let it touch anything. Anything."),
                F::with_flavor("Schrodinger's Jellyfish", "Both caught and not caught until you look."),
                F::with_flavor("Primordial Salmon", "The first salmon, swimming since creation."),
                F::plain("Lost Void Fish"),
            ],
        ),
        tier_config(
            QualityTier::HiddenFire,
            1.0,
            0.2,
            (1000, 4000),
            vec![
                F::with_flavor("Falling River of Heaven", "The river pours from the sky and never returns."),
                F::plain("Ember Wanderer"),
                F::with_flavor("Blazing Pearl", "It glows with an inner flame."),
                F::with_flavor("Magma Jellyfish", "Its tentacles drip molten rock."),
                F::with_flavor("Hellfire Lobster", "Its claws burn with infernal fire."),
                F::with_flavor("Bomb Puffer", "Careful. It might go off at any moment."),
                F::plain("Lava Rockfish"),
                F::with_flavor("Phoenix Salmon", "Reborn from its own ashes."),
                F::plain("Volcano Vent Fish"),
                F::with_flavor("Fate-Turning Koi", "It rewrites fortunes, starting with yours."),
                F::plain("Crimson Lotus Salmon"),
                F::with_flavor("Inner Flame Fish", "Light the fire within and never let it go out."),
            ],
        ),
    ]
}
