//! Room actors and their registry.
//!
//! One tokio task per room owns that room's state outright; the registry
//! maps room codes to actor handles. Messages for a room are applied in
//! arrival order with no interleaving, which preserves the engine's
//! single-writer guarantee without any locks around `Room` itself.

pub mod actor;
pub mod config;
pub mod messages;
pub mod registry;

pub use actor::{RoomActor, RoomHandle};
pub use config::TableConfig;
pub use messages::RoomMessage;
pub use registry::RoomRegistry;
