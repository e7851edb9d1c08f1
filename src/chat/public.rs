//! Public channel utilities: per-user cast cooldowns and the fishing command parser.
//!
//! Commands are recognized only with the configured prefix (default `^`), e.g. `^FISH`,
//! `^BAG`, `^SELL Grass Carp`, `^SELL all`, `^STATS`, `^FISHTOGGLE`, `^FISHHELP`.
//! `^CAST` and `^INV` are aliases for `^FISH` and `^BAG`. Anything else parses as
//! [FishCommand::Unknown] so ordinary conversation is ignored.
use log::trace;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Cooldown entries untouched for this long are dropped by [PublicState::prune_expired].
const COOLDOWN_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Default)]
pub struct PublicState {
    pub last_cast: HashMap<String, Instant>, // user_id -> last accepted cast
    pub cast_cooldown: Duration,
}

impl PublicState {
    pub fn new(cast_cooldown: Duration) -> Self {
        Self {
            last_cast: HashMap::new(),
            cast_cooldown,
        }
    }

    pub fn prune_expired(&mut self) {
        let now = Instant::now();
        let ttl = COOLDOWN_TTL.max(self.cast_cooldown);
        self.last_cast.retain(|_, t| now.duration_since(*t) < ttl);
    }

    /// Per-user rate limit for casts. Returns the remaining wait when refused.
    pub fn allow_cast(&mut self, user_id: &str) -> Result<(), Duration> {
        self.allow_cast_at(user_id, Instant::now())
    }

    pub fn allow_cast_at(&mut self, user_id: &str, now: Instant) -> Result<(), Duration> {
        match self.last_cast.get(user_id) {
            Some(last) if now.saturating_duration_since(*last) < self.cast_cooldown => {
                Err(self.cast_cooldown - now.saturating_duration_since(*last))
            }
            _ => {
                self.last_cast.insert(user_id.to_string(), now);
                Ok(())
            }
        }
    }

    /// Forget a cast that [PublicState::allow_cast] accepted but that never landed.
    pub fn release_cast(&mut self, user_id: &str) {
        self.last_cast.remove(user_id);
    }
}

/// Prefix-driven parser for fishing commands.
pub struct FishCommandParser {
    prefix: String,
}

impl FishCommandParser {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    pub fn parse(&self, raw: &str) -> FishCommand {
        let trimmed = raw.trim();
        let Some(body) = trimmed.strip_prefix(self.prefix.as_str()) else {
            return FishCommand::Unknown;
        };
        let (word, rest) = match body.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (body, ""),
        };
        let word = word.to_ascii_uppercase();
        let cmd = match word.as_str() {
            "FISH" | "CAST" => FishCommand::Fish,
            "BAG" | "INV" => FishCommand::Bag,
            "STATS" => FishCommand::Stats,
            "FISHTOGGLE" => FishCommand::Toggle,
            "FISHHELP" => FishCommand::Help,
            "SELL" if rest.is_empty() => {
                FishCommand::Invalid(format!("Usage: {}SELL <name|quality|all>", self.prefix))
            }
            "SELL" => FishCommand::Sell(rest.to_string()),
            _ => FishCommand::Unknown,
        };
        if cmd != FishCommand::Unknown {
            trace!("Parsed {:?} from '{}'", cmd, raw);
        }
        cmd
    }
}

impl Default for FishCommandParser {
    fn default() -> Self {
        Self::new("^")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FishCommand {
    Fish,
    Bag,
    Sell(String),
    Stats,
    Toggle,
    Help,
    Unknown,
    Invalid(String),
}
