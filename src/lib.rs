//! # Meshfish - chance-based fishing for mesh chat channels
//!
//! Meshfish is a small fishing minigame meant to sit behind a public chat channel. A user
//! casts, waits a few seconds, and lands a fish with a quality tier, a length and a price.
//! Catches pile up in a per-user bag that can be sold for coins, and a fishing rod levels
//! up with activity and back down with neglect or bad luck.
//!
//! ## Features
//!
//! - **Weighted draws**: six quality tiers from rotten to hidden fire, drawn by weight.
//! - **Luck stars**: an optional per-user luck signal boosts the rare tiers exponentially.
//! - **Rod progression**: five rod levels with per-quality bonuses, catch-count upgrades and
//!   inactivity / bad-streak / unlucky-fish downgrades.
//! - **Persistent bags**: sled-backed records, identical fish stacking by total length.
//! - **Chat commands**: `^FISH`, `^BAG`, `^SELL`, `^STATS`, `^FISHTOGGLE`, `^FISHHELP`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use meshfish::app::FishingApp;
//! use meshfish::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("meshfish.toml").await?;
//!     let mut app = FishingApp::open(&config)?;
//!     let mut rng = rand::thread_rng();
//!     if let Some(reply) = app.processor.handle("!a1b2c3d4", Some("general"), "^FISH", &mut rng) {
//!         tokio::time::sleep(reply.reveal_delay).await;
//!         println!("{}", reply.text);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`fishing`] - catalog, sampler, luck, rods, progression, bag, and the service
//! - [`chat`] - command parser, cooldowns and reply rendering
//! - [`storage`] - progress, channel switch and wallet persistence
//! - [`config`] - configuration loading
//! - [`validation`] - user id checks and log-safe escaping
//! - [`metrics`] - process-wide counters
//! - [`app`] - wiring for the binary

pub mod app;
pub mod chat;
pub mod config;
pub mod fishing;
pub mod metrics;
pub mod storage;
pub mod validation;
