//! # Cardroom
//!
//! An authoritative multiplayer Texas Hold'em engine. Players join a
//! room by code, the host starts hands, and the server is the single
//! source of truth for cards, betting, side pots, and payouts; clients
//! only ever see per-viewer sanitized snapshots.
//!
//! ## Architecture
//!
//! - [`game`]: the pure engine: deck, seat/turn resolution, betting
//!   rules, pot accounting, hand lifecycle, showdown resolution, and
//!   per-viewer views. Every mutation returns explicit effects
//!   (broadcasts to send, timers to schedule) instead of performing I/O.
//! - [`table`]: the concurrency shell: one actor task per room, an
//!   inbox applied in arrival order, generation-checked timers, and the
//!   registry mapping room codes to live actors.
//! - [`bot`]: pluggable bot policies. A bot is just another actor whose
//!   action is submitted through the same entry point as a human's.
//!
//! ## Example
//!
//! ```
//! use cardroom::game::entities::PlayerId;
//! use cardroom::game::{Room, RoomCode, RoomConfig};
//!
//! let host = PlayerId::new();
//! let mut room = Room::new(RoomCode::new("ABCDE"), host, RoomConfig::default());
//! room.add_player(host, "alice".into(), false).unwrap();
//! ```

pub mod bot;
pub mod game;
pub mod table;

pub use game::{Effect, Room, RoomCode, RoomConfig, RoomError, TimerKind};
pub use table::{RoomHandle, RoomMessage, RoomRegistry, TableConfig};
