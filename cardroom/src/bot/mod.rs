//! Bot players.
//!
//! A bot is just another actor: when the hand waits on a bot seat, the
//! table actor schedules a thinking delay, asks the room's [`BotPolicy`]
//! for an action, and feeds it through the same `submit_action` entry
//! point a human would use. Policies only ever *produce* an action; they
//! never touch room state.

mod policy;

pub use policy::{BotContext, BotPolicy, ThresholdPolicy};

/// Roster used to name seated bots.
pub const BOT_NAMES: [&str; 8] = [
    "Ada", "Blaise", "Church", "Dijkstra", "Erdos", "Fermat", "Godel", "Hopper",
];
