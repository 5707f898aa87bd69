//! End-to-end WebSocket tests against a real server instance.

use std::sync::Arc;

use cardroom::{RoomRegistry, TableConfig};
use cardroom_server::api::{self, AppState};
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::Message;

/// Bind the app on an ephemeral port and return its address.
async fn spawn_server() -> std::net::SocketAddr {
    let registry = Arc::new(RoomRegistry::new(TableConfig::default()));
    let app = api::create_router(AppState { registry });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn connect(
    addr: std::net::SocketAddr,
) -> tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
> {
    let (socket, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws"))
        .await
        .expect("websocket connects");
    socket
}

async fn send_json(
    socket: &mut tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    value: Value,
) {
    socket
        .send(Message::Text(value.to_string().into()))
        .await
        .unwrap();
}

async fn recv_json(
    socket: &mut tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
) -> Value {
    loop {
        let frame = tokio::time::timeout(std::time::Duration::from_secs(5), socket.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream open")
            .expect("frame ok");
        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

#[tokio::test]
async fn test_create_room_returns_code_and_snapshot() {
    let addr = spawn_server().await;
    let mut socket = connect(addr).await;

    send_json(&mut socket, json!({"type": "create_room", "name": "alice"})).await;

    let created = recv_json(&mut socket).await;
    assert_eq!(created["type"], "room_created");
    let code = created["code"].as_str().unwrap();
    assert_eq!(code.len(), 5);

    // The initial lobby snapshot follows.
    let view = recv_json(&mut socket).await;
    assert_eq!(view["type"], "view");
    assert_eq!(view["view"]["phase"], "lobby");
    assert_eq!(view["view"]["is_host"], true);
}

#[tokio::test]
async fn test_join_flow_and_masked_hole_cards() {
    let addr = spawn_server().await;
    let mut host = connect(addr).await;
    send_json(&mut host, json!({"type": "create_room", "name": "alice"})).await;
    let created = recv_json(&mut host).await;
    let code = created["code"].as_str().unwrap().to_string();
    let _host_view = recv_json(&mut host).await;

    let mut guest = connect(addr).await;
    send_json(
        &mut guest,
        json!({"type": "join_room", "code": code, "name": "bob"}),
    )
    .await;
    let joined = recv_json(&mut guest).await;
    assert_eq!(joined["type"], "joined");
    assert_eq!(joined["seat"], 1);

    // Host starts a hand; both clients get dealt-in views.
    send_json(&mut host, json!({"type": "start_hand"})).await;

    let view = wait_for_phase(&mut guest, "hand").await;
    let players = view["view"]["players"].as_array().unwrap();
    assert_eq!(players.len(), 2);
    for player in players {
        assert_eq!(player["hole_count"], 2);
        let visible = player["hole"].as_array().unwrap().len();
        if player["name"] == "bob" {
            assert_eq!(visible, 2, "own cards are visible");
        } else {
            assert_eq!(visible, 0, "opponent cards are masked");
        }
    }
}

#[tokio::test]
async fn test_join_unknown_room_surfaces_error() {
    let addr = spawn_server().await;
    let mut socket = connect(addr).await;
    send_json(
        &mut socket,
        json!({"type": "join_room", "code": "XXXXX", "name": "bob"}),
    )
    .await;
    let reply = recv_json(&mut socket).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["message"], "room not found");
}

#[tokio::test]
async fn test_command_before_join_is_rejected() {
    let addr = spawn_server().await;
    let mut socket = connect(addr).await;
    send_json(&mut socket, json!({"type": "start_hand"})).await;
    let reply = recv_json(&mut socket).await;
    assert_eq!(reply["type"], "error");
}

async fn wait_for_phase(
    socket: &mut tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    phase: &str,
) -> Value {
    for _ in 0..50 {
        let value = recv_json(socket).await;
        if value["type"] == "view" && value["view"]["phase"] == phase {
            return value;
        }
    }
    panic!("never saw phase {phase}");
}
