//! The authoritative hold'em engine.
//!
//! `Room` is the aggregate: a per-table state machine that deals cards,
//! enforces turn order and action legality, accounts bets and side pots,
//! and resolves showdowns. All transitions are pure; side effects are
//! returned as [`room::Effect`]s for the owning actor to carry out.

pub mod constants;
pub mod entities;
pub mod eval;
pub mod pot;
pub mod seating;
pub mod view;

mod betting;
mod showdown;

pub mod room;

pub use room::{Effect, Room, RoomCode, RoomConfig, RoomError, TimerKind};
