//! # Configuration Management Module
//!
//! Loads and writes the TOML configuration for the fishing game. All sections have
//! defaults, so a missing section in the file falls back to the values below.
//!
//! ## Configuration Structure
//!
//! - [`FishingConfig`] - draw weights, rod table, downgrade rules, cooldowns
//! - [`StorageConfig`] - location of the sled database
//! - [`LoggingConfig`] - log level and optional log file
//! - [`LuckConfig`] - built-in daily luck provider
//! - [`CommandConfig`] - chat command prefix and admin list
//!
//! ## Usage
//!
//! ```rust,no_run
//! use meshfish::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("meshfish.toml").await?;
//!     println!("Cooldown: {}s", config.fishing.cooldown_seconds);
//!     Config::create_default("meshfish.example.toml").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [fishing]
//! base_weight_increase = 1.9
//! max_weight = 1000.0
//! cooldown_seconds = 15
//!
//! [fishing.rods.normal]
//! display = "Normal"
//! upgrade_requirement = 50
//! downgrade_probability = 0.02
//! special_fish_bonus = 1.0
//!
//! [fishing.rods.normal.quality_bonus]
//! golden = 1.0
//!
//! [fishing.downgrade]
//! consecutive_bad_threshold = 10
//! inactivity_days = 7
//! ```
//!
//! Values are trusted: weights, thresholds and ranges are not validated beyond what the
//! types enforce.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub fishing: FishingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub luck: LuckConfig,
    #[serde(default)]
    pub commands: CommandConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FishingConfig {
    /// Base value of the exponential luck boost.
    #[serde(default = "default_base_weight_increase")]
    pub base_weight_increase: f64,
    /// Ceiling applied to a luck-boosted tier weight.
    #[serde(default = "default_max_weight")]
    pub max_weight: f64,
    /// Minimum seconds between two casts by the same user (enforced by the command layer).
    #[serde(default = "default_cooldown_seconds")]
    pub cooldown_seconds: u64,
    /// Inclusive bounds of the reveal delay the command layer waits before replying.
    #[serde(default = "default_reveal_delay")]
    pub reveal_delay_seconds: (u64, u64),
    /// Rod table keyed by rod identifier (`normal`, `silver`, `gold`, `holy`, `void`).
    #[serde(default = "default_rods")]
    pub rods: HashMap<String, RodConfig>,
    #[serde(default)]
    pub downgrade: DowngradeConfig,
    /// Experience granted per catch, keyed by quality identifier. Missing tiers grant 1.
    #[serde(default)]
    pub experience: HashMap<String, u32>,
}

fn default_base_weight_increase() -> f64 {
    1.9
}

fn default_max_weight() -> f64 {
    1000.0
}

fn default_cooldown_seconds() -> u64 {
    15
}

fn default_reveal_delay() -> (u64, u64) {
    (1, 6)
}

impl Default for FishingConfig {
    fn default() -> Self {
        Self {
            base_weight_increase: default_base_weight_increase(),
            max_weight: default_max_weight(),
            cooldown_seconds: default_cooldown_seconds(),
            reveal_delay_seconds: default_reveal_delay(),
            rods: default_rods(),
            downgrade: DowngradeConfig::default(),
            experience: HashMap::new(),
        }
    }
}

impl FishingConfig {
    /// Experience points granted for a catch of the given quality identifier.
    pub fn experience_for(&self, quality: &str) -> u32 {
        self.experience.get(quality).copied().unwrap_or(1)
    }
}

/// Per-level rod settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RodConfig {
    pub display: String,
    /// Total catch count required to advance. `None` marks the top level.
    #[serde(default)]
    pub upgrade_requirement: Option<u32>,
    /// Multiplicative weight bonus keyed by quality identifier.
    #[serde(default)]
    pub quality_bonus: HashMap<String, f64>,
    /// Chance that catching an unlucky fish costs a level.
    #[serde(default)]
    pub downgrade_probability: f64,
    /// Relative weight of flavored fish variants within a tier.
    #[serde(default = "default_special_fish_bonus")]
    pub special_fish_bonus: f64,
}

fn default_special_fish_bonus() -> f64 {
    1.0
}

fn rod(
    display: &str,
    upgrade_requirement: Option<u32>,
    bonus: [f64; 6],
    downgrade_probability: f64,
    special_fish_bonus: f64,
) -> RodConfig {
    let keys = ["rotten", "moldy", "common", "golden", "void", "hidden_fire"];
    RodConfig {
        display: display.to_string(),
        upgrade_requirement,
        quality_bonus: keys
            .iter()
            .zip(bonus)
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        downgrade_probability,
        special_fish_bonus,
    }
}

fn default_rods() -> HashMap<String, RodConfig> {
    let mut rods = HashMap::new();
    rods.insert(
        "normal".to_string(),
        rod("Normal", Some(50), [1.0, 1.0, 1.0, 1.0, 1.0, 1.0], 0.02, 1.0),
    );
    rods.insert(
        "silver".to_string(),
        rod("Silver", Some(150), [0.9, 0.95, 1.1, 1.2, 1.1, 1.1], 0.015, 1.1),
    );
    rods.insert(
        "gold".to_string(),
        rod("Gold", Some(300), [0.8, 0.9, 1.15, 1.4, 1.3, 1.2], 0.01, 1.25),
    );
    rods.insert(
        "holy".to_string(),
        rod("Holy Relic", Some(500), [0.7, 0.85, 1.2, 1.6, 1.5, 1.4], 0.008, 1.5),
    );
    rods.insert(
        "void".to_string(),
        rod("Void", None, [0.6, 0.8, 1.3, 1.8, 1.8, 1.7], 0.005, 2.0),
    );
    rods
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DowngradeConfig {
    /// Fish names that may cost a rod level when caught.
    #[serde(default = "default_bad_fish_names")]
    pub bad_fish_names: Vec<String>,
    /// Length of a rotten/moldy streak that costs a rod level.
    #[serde(default = "default_consecutive_bad_threshold")]
    pub consecutive_bad_threshold: u32,
    /// Days between two catches after which the rod loses a level.
    #[serde(default = "default_inactivity_days")]
    pub inactivity_days: i64,
}

fn default_bad_fish_names() -> Vec<String> {
    [
        "Overtime Carp",
        "Gloomy Starfish",
        "Public Embarrassment Bass",
        "Sad Sack Sunfish",
        "Monday Blues Trout",
        "Bankrupt Bream",
        "Failed Exam Flathead",
        "Delayed Release Roach",
        "Salted Herring",
        "Meltdown Lobster",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_consecutive_bad_threshold() -> u32 {
    10
}

fn default_inactivity_days() -> i64 {
    7
}

impl Default for DowngradeConfig {
    fn default() -> Self {
        Self {
            bad_fish_names: default_bad_fish_names(),
            consecutive_bad_threshold: default_consecutive_bad_threshold(),
            inactivity_days: default_inactivity_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Optional override for the sled database path; defaults to `<data_dir>/fishing`.
    #[serde(default)]
    pub db_path: Option<String>,
    /// Optional JSON catalog seed replacing the built-in fish table.
    #[serde(default)]
    pub catalog_seed: Option<String>,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            db_path: None,
            catalog_seed: None,
        }
    }
}

impl StorageConfig {
    pub fn resolved_db_path(&self) -> PathBuf {
        match &self.db_path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(&self.data_dir).join("fishing"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: Some("meshfish.log".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LuckConfig {
    /// Enable the built-in per-day luck stars when no external provider is wired in.
    #[serde(default)]
    pub daily_enabled: bool,
    #[serde(default = "default_max_stars")]
    pub max_stars: u8,
}

fn default_max_stars() -> u8 {
    5
}

impl Default for LuckConfig {
    fn default() -> Self {
        Self {
            daily_enabled: false,
            max_stars: default_max_stars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Public command prefix, e.g. `^FISH`.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// User ids allowed to toggle fishing in a channel.
    #[serde(default)]
    pub admins: Vec<String>,
}

fn default_prefix() -> String {
    "^".to_string()
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            admins: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Like [`Config::load`], but a file that does not exist yields `Ok(None)`. Any other read
    /// or parse failure is still an error.
    pub async fn load_if_present(path: &str) -> Result<Option<Self>> {
        match fs::read_to_string(path).await {
            Ok(content) => toml::from_str(&content)
                .map(Some)
                .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow!("Failed to read config file {}: {}", path, e)),
        }
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rod_table_covers_every_level() {
        let cfg = FishingConfig::default();
        for key in ["normal", "silver", "gold", "holy", "void"] {
            let rod = cfg.rods.get(key).expect("rod present");
            assert_eq!(rod.quality_bonus.len(), 6, "{} bonus table", key);
        }
        assert_eq!(cfg.rods["normal"].upgrade_requirement, Some(50));
        assert_eq!(cfg.rods["void"].upgrade_requirement, None);
        assert_eq!(cfg.rods["gold"].quality_bonus["golden"], 1.4);
    }

    #[test]
    fn experience_defaults_to_one_point() {
        let mut cfg = FishingConfig::default();
        assert_eq!(cfg.experience_for("golden"), 1);
        cfg.experience.insert("golden".into(), 5);
        assert_eq!(cfg.experience_for("golden"), 5);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let text = r#"
            [fishing]
            cooldown_seconds = 3

            [fishing.downgrade]
            inactivity_days = 2

            [commands]
            admins = ["sysop"]
        "#;
        let cfg: Config = toml::from_str(text).unwrap();
        assert_eq!(cfg.fishing.cooldown_seconds, 3);
        assert_eq!(cfg.fishing.base_weight_increase, 1.9);
        assert_eq!(cfg.fishing.downgrade.inactivity_days, 2);
        assert_eq!(cfg.fishing.downgrade.consecutive_bad_threshold, 10);
        assert_eq!(cfg.fishing.rods.len(), 5);
        assert_eq!(cfg.commands.prefix, "^");
        assert_eq!(cfg.commands.admins, vec!["sysop".to_string()]);
        assert_eq!(cfg.storage.resolved_db_path(), PathBuf::from("./data/fishing"));
    }

    #[tokio::test]
    async fn default_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meshfish.toml");
        let path_str = path.to_str().unwrap();
        Config::create_default(path_str).await.unwrap();
        let loaded = Config::load(path_str).await.unwrap();
        assert_eq!(loaded.fishing.rods, Config::default().fishing.rods);
        assert_eq!(
            loaded.fishing.downgrade.bad_fish_names,
            Config::default().fishing.downgrade.bad_fish_names
        );
        assert!(Config::load("/nonexistent/meshfish.toml").await.is_err());
    }
}
