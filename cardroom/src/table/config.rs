//! Table pacing and room configuration.

use std::time::Duration;

use crate::game::{RoomConfig, TimerKind};

/// Full per-table configuration: engine settings plus the pacing delays
/// the actor applies to scheduled timers.
#[derive(Clone, Debug)]
pub struct TableConfig {
    pub room: RoomConfig,
    /// Pause between the last betting round closing and showdown payouts.
    pub reveal_delay: Duration,
    /// Pause between showdown and the next hand auto-starting.
    pub inter_hand_delay: Duration,
    /// Bot "thinking" delay before its action is submitted.
    pub bot_think_delay: Duration,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            room: RoomConfig::default(),
            reveal_delay: Duration::from_secs(2),
            inter_hand_delay: Duration::from_secs(4),
            bot_think_delay: Duration::from_millis(1200),
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.room.validate()
    }

    /// The delay a scheduled timer should fire after.
    #[must_use]
    pub fn delay_for(&self, timer: TimerKind) -> Duration {
        match timer {
            TimerKind::Showdown => self.reveal_delay,
            TimerKind::NextHand => self.inter_hand_delay,
            TimerKind::BotTurn { .. } => self.bot_think_delay,
        }
    }
}
