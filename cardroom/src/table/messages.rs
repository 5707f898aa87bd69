//! Table actor message types.

use tokio::sync::{mpsc, oneshot};

use crate::game::entities::{Action, Chips, PlayerId, SeatIndex};
use crate::game::view::RoomView;
use crate::game::{RoomError, TimerKind};

/// Messages a room actor processes, strictly in arrival order.
#[derive(Debug)]
pub enum RoomMessage {
    /// Seat a player in the lobby.
    Join {
        player: PlayerId,
        name: String,
        resp: oneshot::Sender<Result<SeatIndex, RoomError>>,
    },

    /// A player's connection went away (or they chose to leave).
    /// Responds with the number of connected humans remaining; zero
    /// means the room is being torn down.
    Disconnect {
        player: PlayerId,
        resp: oneshot::Sender<usize>,
    },

    /// Host-only: change the blinds between hands.
    SetBlinds {
        player: PlayerId,
        small: Chips,
        big: Chips,
    },

    /// Host-only: start the next hand.
    StartHand { player: PlayerId },

    /// A betting action from a seat.
    TakeAction { player: PlayerId, action: Action },

    /// Host-only: seat a bot.
    AddBot {
        player: PlayerId,
        resp: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Register for per-viewer snapshots after every state change.
    Subscribe {
        player: PlayerId,
        tx: mpsc::Sender<RoomView>,
    },

    Unsubscribe { player: PlayerId },

    /// Internal: a scheduled timer elapsed. Stale firings (the room's
    /// generation has moved on) are dropped.
    TimerFired { timer: TimerKind, generation: u64 },
}
