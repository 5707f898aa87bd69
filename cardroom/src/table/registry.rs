//! Registry of live rooms.
//!
//! The registry owns the mapping from room code to actor handle. It is
//! the only component that creates and tears down rooms; the engine
//! itself never sees more than one room at a time.

use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;
use tokio::sync::{RwLock, oneshot};

use super::actor::{RoomActor, RoomHandle};
use super::config::TableConfig;
use super::messages::RoomMessage;
use crate::game::constants::ROOM_CODE_LEN;
use crate::game::entities::{PlayerId, PlayerName, SeatIndex};
use crate::game::{Room, RoomCode, RoomError};

pub struct RoomRegistry {
    config: TableConfig,
    rooms: Arc<RwLock<HashMap<RoomCode, RoomHandle>>>,
}

impl RoomRegistry {
    #[must_use]
    pub fn new(config: TableConfig) -> Self {
        Self {
            config,
            rooms: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a room with a freshly minted code, seat the creator as
    /// host, and spawn the owning actor.
    pub async fn create_room(
        &self,
        host: PlayerId,
        name: &str,
    ) -> Result<(RoomCode, RoomHandle), RoomError> {
        let mut rooms = self.rooms.write().await;
        let code = loop {
            let candidate = random_code();
            if !rooms.contains_key(&candidate) {
                break candidate;
            }
        };

        let mut room = Room::new(code.clone(), host, self.config.room.clone());
        room.add_player(host, PlayerName::new(name), false)
            .expect("empty room always seats the host");

        let (actor, handle) = RoomActor::new(room, self.config.clone());
        tokio::spawn(actor.run());
        rooms.insert(code.clone(), handle.clone());
        log::info!("created room {code}");
        Ok((code, handle))
    }

    /// Join an existing room. Room-not-found, room-full, name-taken, and
    /// join-after-start all surface to this caller only.
    pub async fn join_room(
        &self,
        code: &RoomCode,
        player: PlayerId,
        name: &str,
    ) -> Result<(SeatIndex, RoomHandle), RoomError> {
        let handle = self.get(code).await.ok_or(RoomError::RoomNotFound)?;
        let (resp, rx) = oneshot::channel();
        handle
            .send(RoomMessage::Join {
                player,
                name: name.to_string(),
                resp,
            })
            .await?;
        let seat = rx.await.map_err(|_| RoomError::RoomNotFound)??;
        Ok((seat, handle))
    }

    #[must_use = "the handle is the only way to reach the room"]
    pub async fn get(&self, code: &RoomCode) -> Option<RoomHandle> {
        let rooms = self.rooms.read().await;
        rooms.get(code).cloned()
    }

    /// Report a disconnect to the player's room; tears the room down when
    /// the last human is gone.
    pub async fn leave(&self, code: &RoomCode, player: PlayerId) {
        let Some(handle) = self.get(code).await else {
            return;
        };
        let (resp, rx) = oneshot::channel();
        if handle
            .send(RoomMessage::Disconnect { player, resp })
            .await
            .is_err()
        {
            return;
        }
        if let Ok(0) = rx.await {
            let mut rooms = self.rooms.write().await;
            rooms.remove(code);
            log::info!("room {code} torn down (last player left)");
        }
    }

    pub async fn room_count(&self) -> usize {
        let rooms = self.rooms.read().await;
        rooms.len()
    }
}

fn random_code() -> RoomCode {
    let mut rng = rand::rng();
    let code: String = (0..ROOM_CODE_LEN)
        .map(|_| rng.random_range(b'A'..=b'Z') as char)
        .collect();
    RoomCode::new(&code)
}
