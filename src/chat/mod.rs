//! # Chat Command Layer
//!
//! Thin adapter between chat lines and the [`FishingService`](crate::fishing::FishingService).
//!
//! - [`public`] - command parser and per-user cast cooldowns
//! - [`commands`] - [`CommandProcessor`] rendering compact replies with a reveal delay

pub mod commands;
pub mod public;

pub use commands::{CommandProcessor, Reply, MAX_REPLY_BYTES};
pub use public::{FishCommand, FishCommandParser, PublicState};
