//! Command processing for the public fishing commands.
//!
//! [CommandProcessor::handle] parses one chat line, runs it against the
//! [FishingService](crate::fishing::FishingService) and returns a rendered [Reply]. Replies
//! stay within a single 230-byte frame. A cast reply carries a reveal delay drawn from the
//! configured bounds; the caller waits that long before sending it.
use log::{debug, info, warn};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

use super::public::{FishCommand, FishCommandParser, PublicState};
use crate::config::CommandConfig;
use crate::fishing::currency::format_proceeds;
use crate::fishing::inventory::format_inventory_compact;
use crate::fishing::rod::RodTable;
use crate::fishing::{CatchOutcome, FishingError, FishingService};
use crate::storage::ChannelSwitches;
use crate::validation::{escape_for_log, normalize_channel, normalize_user_id};

/// Frame budget for one reply.
pub const MAX_REPLY_BYTES: usize = 230;

mod ui {
    /// Truncate to at most `max_bytes` bytes on a char boundary, appending '…' if cut.
    pub fn utf8_truncate(s: &str, max_bytes: usize) -> String {
        if s.len() <= max_bytes {
            return s.to_string();
        }
        let budget = max_bytes.saturating_sub('…'.len_utf8());
        let mut cut = budget.min(s.len());
        while cut > 0 && !s.is_char_boundary(cut) {
            cut -= 1;
        }
        let mut out = s[..cut].to_string();
        out.push('…');
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// How long the caller should wait before delivering `text`.
    pub reveal_delay: Duration,
}

impl Reply {
    fn now(text: impl Into<String>) -> Self {
        Self {
            text: ui::utf8_truncate(&text.into(), MAX_REPLY_BYTES),
            reveal_delay: Duration::ZERO,
        }
    }

    fn delayed(text: impl Into<String>, reveal_delay: Duration) -> Self {
        Self {
            text: ui::utf8_truncate(&text.into(), MAX_REPLY_BYTES),
            reveal_delay,
        }
    }
}

pub struct CommandProcessor {
    service: Arc<FishingService>,
    switches: Arc<dyn ChannelSwitches>,
    parser: FishCommandParser,
    state: PublicState,
    admins: Vec<String>,
    prefix: String,
    reveal_delay_seconds: (u64, u64),
}

impl CommandProcessor {
    pub fn new(
        service: Arc<FishingService>,
        switches: Arc<dyn ChannelSwitches>,
        commands: &CommandConfig,
    ) -> Self {
        let fishing = service.config();
        Self {
            state: PublicState::new(Duration::from_secs(fishing.cooldown_seconds)),
            reveal_delay_seconds: fishing.reveal_delay_seconds,
            parser: FishCommandParser::new(&commands.prefix),
            prefix: commands.prefix.clone(),
            admins: commands.admins.clone(),
            service,
            switches,
        }
    }

    fn is_admin(&self, user_id: &str) -> bool {
        self.admins.iter().any(|a| a.eq_ignore_ascii_case(user_id))
    }

    fn draw_reveal_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let (min, max) = self.reveal_delay_seconds;
        if min >= max {
            return Duration::from_secs(min);
        }
        Duration::from_secs(rng.gen_range(min..=max))
    }

    /// Handle one line of chat. Returns `None` when the line is not a fishing command.
    ///
    /// `channel` is `None` for direct conversations, which are always enabled.
    pub fn handle<R: Rng + ?Sized>(
        &mut self,
        user_id: &str,
        channel: Option<&str>,
        text: &str,
        rng: &mut R,
    ) -> Option<Reply> {
        let cmd = self.parser.parse(text);
        let reply = match cmd {
            FishCommand::Unknown => return None,
            FishCommand::Invalid(msg) => Reply::now(msg),
            FishCommand::Help => Reply::now(self.help_text()),
            FishCommand::Fish => self.handle_fish(user_id, channel, rng),
            FishCommand::Bag => self.handle_bag(user_id),
            FishCommand::Sell(target) => self.handle_sell(user_id, &target),
            FishCommand::Stats => self.handle_stats(user_id),
            FishCommand::Toggle => self.handle_toggle(user_id, channel),
        };
        Some(reply)
    }

    fn help_text(&self) -> String {
        let p = &self.prefix;
        format!(
            "Fishing: {p}FISH cast | {p}BAG your catch | {p}SELL <name|quality|all> | {p}STATS rod & counts | {p}FISHTOGGLE (admin)"
        )
    }

    fn handle_fish<R: Rng + ?Sized>(
        &mut self,
        user_id: &str,
        channel: Option<&str>,
        rng: &mut R,
    ) -> Reply {
        if let Some(raw) = channel {
            let Some(channel) = normalize_channel(raw) else {
                return Reply::now("Unknown channel.");
            };
            match self.switches.channel_enabled(&channel) {
                Ok(true) => {}
                Ok(false) => return Reply::now("Fishing is disabled in this channel."),
                Err(e) => {
                    warn!("fishing: channel switch lookup failed for '{}': {}", channel, e);
                    return Reply::now("Fishing is unavailable right now.");
                }
            }
        }
        let user_id = match normalize_user_id(Some(user_id)) {
            Ok(id) => id,
            Err(e) => return self.error_reply("", e),
        };
        self.state.prune_expired();
        if let Err(wait) = self.state.allow_cast(&user_id) {
            debug!("fishing: cooldown for {} ({}s left)", escape_for_log(&user_id), wait.as_secs());
            return Reply::now(format!(
                "Your line is still wet. Try again in {}s.",
                wait.as_secs().max(1)
            ));
        }
        match self.service.catch_fish(&user_id, rng) {
            Ok(outcome) => {
                let delay = self.draw_reveal_delay(rng);
                Reply::delayed(self.render_catch(&outcome), delay)
            }
            Err(e) => {
                self.state.release_cast(&user_id);
                self.error_reply(&user_id, e)
            }
        }
    }

    fn render_catch(&self, outcome: &CatchOutcome) -> String {
        let catalog = self.service.catalog();
        let rods = RodTable::new(&self.service.config().rods);
        let mut text = format!(
            "🎣 {} {} ({}cm)",
            catalog.display(outcome.fish.quality),
            outcome.fish.name,
            outcome.fish.length
        );
        if let Some(flavor) = &outcome.flavor {
            text.push_str(&format!("\n{}", flavor));
        }
        if let Some(reason) = &outcome.downgrade {
            text.push_str(&format!(
                "\nRod down to {}: {}.",
                rods.display(outcome.rod_level),
                reason.describe()
            ));
        }
        if outcome.upgraded {
            text.push_str(&format!("\nRod up! Now {}.", rods.display(outcome.rod_level)));
        }
        text
    }

    fn handle_bag(&self, user_id: &str) -> Reply {
        match self.service.inventory_list(user_id) {
            Ok(items) => Reply::now(format_inventory_compact(&items, self.service.catalog())),
            Err(e) => self.error_reply(user_id, e),
        }
    }

    fn handle_sell(&self, user_id: &str, target: &str) -> Reply {
        match self.service.sell_fish(user_id, target) {
            Ok(sale) if sale.removed.is_empty() => Reply::now("Nothing of that quality to sell."),
            Ok(sale) => {
                let noun = if sale.removed.len() == 1 { "lot" } else { "lots" };
                Reply::now(format!(
                    "Sold {} {} for {} coins.",
                    sale.removed.len(),
                    noun,
                    format_proceeds(sale.price)
                ))
            }
            Err(e) => self.error_reply(user_id, e),
        }
    }

    fn handle_stats(&self, user_id: &str) -> Reply {
        match self.service.stats(user_id) {
            Ok(stats) => {
                let rods = RodTable::new(&self.service.config().rods);
                let next = match rods.upgrade_threshold(stats.rod_level) {
                    Some(threshold) => format!(" (next at {})", threshold),
                    None => String::new(),
                };
                Reply::now(format!(
                    "Rod: {}{} | Catches: {} | Exp: {} | Bad streak: {} | Bag: {}cm",
                    rods.display(stats.rod_level),
                    next,
                    stats.total_catch_count,
                    stats.experience,
                    stats.consecutive_bad_count,
                    stats.total_length
                ))
            }
            Err(e) => self.error_reply(user_id, e),
        }
    }

    fn handle_toggle(&self, user_id: &str, channel: Option<&str>) -> Reply {
        if !self.is_admin(user_id.trim()) {
            return Reply::now("Only admins can toggle fishing.");
        }
        let Some(channel) = channel.and_then(normalize_channel) else {
            return Reply::now("Toggle needs a channel.");
        };
        let result = self
            .switches
            .channel_enabled(&channel)
            .and_then(|enabled| {
                self.switches
                    .set_channel_enabled(&channel, !enabled)
                    .map(|_| !enabled)
            });
        match result {
            Ok(enabled) => {
                info!(
                    "fishing: {} turned fishing {} in '{}'",
                    escape_for_log(user_id),
                    if enabled { "on" } else { "off" },
                    channel
                );
                Reply::now(if enabled {
                    "Fishing enabled here."
                } else {
                    "Fishing disabled here."
                })
            }
            Err(e) => self.error_reply(user_id, e),
        }
    }

    fn error_reply(&self, user_id: &str, err: FishingError) -> Reply {
        match err {
            FishingError::InvalidUser => Reply::now("Who's fishing? No user id."),
            FishingError::EmptyInventory => Reply::now("Your bag is empty."),
            FishingError::UnknownQualityOrName(name) => {
                Reply::now(format!("No '{}' in your bag.", name))
            }
            other => {
                warn!("fishing: command for {} failed: {}", escape_for_log(user_id), other);
                Reply::now("Something went wrong at the pier. Try again later.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        let s = "ab🙂cd";
        assert_eq!(ui::utf8_truncate(s, 6), "ab…");
        assert_eq!(ui::utf8_truncate("hello", 10), "hello");
        assert!(ui::utf8_truncate(&"é".repeat(200), MAX_REPLY_BYTES).len() <= MAX_REPLY_BYTES);
    }
}
