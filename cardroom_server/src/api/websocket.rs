//! WebSocket handler: the room command surface.
//!
//! Each connection is one identity. The lifecycle:
//!
//! 1. Client sends `create_room` or `join_room`.
//! 2. On success the connection is bound to that room and subscribed to
//!    its per-viewer snapshots.
//! 3. Subsequent commands (`set_blinds`, `start_hand`, `action`,
//!    `add_bot`) are forwarded to the room actor; snapshots stream back
//!    after every state change.
//! 4. On disconnect the room is informed; the last human leaving tears
//!    the room down.
//!
//! Command rejections that only concern the caller (room not found,
//! room full, name taken, join after start) come back as `error`
//! messages; everything else the room silently ignores by design.

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use cardroom::game::entities::{Action, Chips, PlayerId, SeatIndex};
use cardroom::game::view::RoomView;
use cardroom::{RoomCode, RoomHandle, RoomMessage};

use super::AppState;

const VIEW_CHANNEL_CAPACITY: usize = 32;

/// Client commands.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    CreateRoom { name: String },
    JoinRoom { code: String, name: String },
    SetBlinds { small: Chips, big: Chips },
    StartHand,
    Action { action: ActionData },
    AddBot,
    Leave,
}

/// Action payload from the client.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ActionData {
    Fold,
    Check,
    Call,
    Bet { amount: Chips },
    Raise { amount: Chips },
    AllIn,
}

impl From<ActionData> for Action {
    fn from(value: ActionData) -> Self {
        match value {
            ActionData::Fold => Self::Fold,
            ActionData::Check => Self::Check,
            ActionData::Call => Self::Call,
            ActionData::Bet { amount } => Self::Bet(amount),
            ActionData::Raise { amount } => Self::Raise(amount),
            ActionData::AllIn => Self::AllIn,
        }
    }
}

/// Messages sent to the client.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerMessage {
    RoomCreated { code: String, seat: SeatIndex },
    Joined { code: String, seat: SeatIndex },
    View { view: RoomView },
    Error { message: String },
    Left,
}

pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let player = PlayerId::new();
    info!("websocket connected: player={player}");

    let (mut sender, mut receiver) = socket.split();

    // Phase 1: wait for room assignment.
    let mut binding: Option<(RoomCode, RoomHandle, mpsc::Receiver<RoomView>)> = None;
    while let Some(Ok(message)) = receiver.next().await {
        let Message::Text(text) = message else {
            if matches!(message, Message::Close(_)) {
                return;
            }
            continue;
        };
        let parsed = match serde_json::from_str::<ClientMessage>(&text) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("player {player}: invalid message: {e}");
                send_message(
                    &mut sender,
                    &ServerMessage::Error {
                        message: "invalid message format".to_string(),
                    },
                )
                .await;
                continue;
            }
        };

        match parsed {
            ClientMessage::CreateRoom { name } => {
                match state.registry.create_room(player, &name).await {
                    Ok((code, handle)) => {
                        let views = subscribe(&handle, player).await;
                        send_message(
                            &mut sender,
                            &ServerMessage::RoomCreated {
                                code: code.to_string(),
                                seat: 0,
                            },
                        )
                        .await;
                        binding = Some((code, handle, views));
                        break;
                    }
                    Err(e) => {
                        send_message(&mut sender, &ServerMessage::Error { message: e.to_string() })
                            .await;
                    }
                }
            }
            ClientMessage::JoinRoom { code, name } => {
                let code = RoomCode::new(&code);
                match state.registry.join_room(&code, player, &name).await {
                    Ok((seat, handle)) => {
                        let views = subscribe(&handle, player).await;
                        send_message(
                            &mut sender,
                            &ServerMessage::Joined {
                                code: code.to_string(),
                                seat,
                            },
                        )
                        .await;
                        binding = Some((code, handle, views));
                        break;
                    }
                    Err(e) => {
                        send_message(&mut sender, &ServerMessage::Error { message: e.to_string() })
                            .await;
                    }
                }
            }
            _ => {
                send_message(
                    &mut sender,
                    &ServerMessage::Error {
                        message: "join or create a room first".to_string(),
                    },
                )
                .await;
            }
        }
    }

    let Some((code, handle, mut views)) = binding else {
        return;
    };

    // Phase 2: pump commands in and snapshots out.
    loop {
        tokio::select! {
            view = views.recv() => {
                match view {
                    Some(view) => {
                        send_message(&mut sender, &ServerMessage::View { view }).await;
                    }
                    // Room actor is gone.
                    None => break,
                }
            }
            frame = receiver.next() => {
                let Some(Ok(message)) = frame else { break };
                let Message::Text(text) = message else {
                    if matches!(message, Message::Close(_)) {
                        break;
                    }
                    continue;
                };
                let parsed = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        debug!("player {player}: invalid message: {e}");
                        continue;
                    }
                };
                match parsed {
                    ClientMessage::SetBlinds { small, big } => {
                        let _ = handle.send(RoomMessage::SetBlinds { player, small, big }).await;
                    }
                    ClientMessage::StartHand => {
                        let _ = handle.send(RoomMessage::StartHand { player }).await;
                    }
                    ClientMessage::Action { action } => {
                        let _ = handle
                            .send(RoomMessage::TakeAction { player, action: action.into() })
                            .await;
                    }
                    ClientMessage::AddBot => {
                        let (resp, rx) = oneshot::channel();
                        if handle.send(RoomMessage::AddBot { player, resp }).await.is_ok()
                            && let Ok(Err(e)) = rx.await
                        {
                            send_message(
                                &mut sender,
                                &ServerMessage::Error { message: e.to_string() },
                            )
                            .await;
                        }
                    }
                    ClientMessage::Leave => {
                        send_message(&mut sender, &ServerMessage::Left).await;
                        break;
                    }
                    ClientMessage::CreateRoom { .. } | ClientMessage::JoinRoom { .. } => {
                        send_message(
                            &mut sender,
                            &ServerMessage::Error {
                                message: "already in a room".to_string(),
                            },
                        )
                        .await;
                    }
                }
            }
        }
    }

    // Cleanup: the room treats this as a disconnect (implicit fold if
    // the hand is waiting on this player).
    let _ = handle.send(RoomMessage::Unsubscribe { player }).await;
    state.registry.leave(&code, player).await;
    info!("websocket disconnected: player={player} room={code}");
}

async fn subscribe(handle: &RoomHandle, player: PlayerId) -> mpsc::Receiver<RoomView> {
    let (tx, rx) = mpsc::channel(VIEW_CHANNEL_CAPACITY);
    if handle
        .send(RoomMessage::Subscribe { player, tx })
        .await
        .is_err()
    {
        warn!("player {player}: room vanished before subscription");
    }
    rx
}

async fn send_message(
    sender: &mut futures_util::stream::SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) {
    if let Ok(json) = serde_json::to_string(message) {
        let _ = sender.send(Message::Text(json.into())).await;
    }
}
