//! Cardroom WebSocket server.
//!
//! Rooms are created on demand over the WebSocket command surface; each
//! room runs as its own actor task and is torn down when its last human
//! leaves. Nothing is persisted; all room state lives in memory.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use cardroom::RoomRegistry;
use cardroom_server::{api, config::ServerConfig, logging};
use log::info;
use pico_args::Arguments;

const HELP: &str = "\
Run a cardroom WebSocket server

USAGE:
  cardroom_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:7777]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND                  Server bind address (e.g., 0.0.0.0:8080)
  CARDROOM_MAX_SEATS           Seats per room (2-8)
  CARDROOM_STARTING_STACK      Chips each player sits down with
  CARDROOM_SMALL_BLIND         Default small blind
  CARDROOM_BIG_BLIND           Default big blind
  CARDROOM_REVEAL_DELAY_MS     Pause before showdown payouts
  CARDROOM_INTER_HAND_DELAY_MS Pause before the next hand auto-starts
  CARDROOM_BOT_THINK_DELAY_MS  Bot thinking delay
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists.
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }
    let bind_override: Option<SocketAddr> = pargs.opt_value_from_str("--bind")?;

    logging::init();

    let config = ServerConfig::from_env(bind_override)?;
    info!(
        "room defaults: {} seats, stack {}, blinds {}",
        config.table.room.max_seats, config.table.room.starting_stack, config.table.room.blinds
    );

    let registry = Arc::new(RoomRegistry::new(config.table.clone()));
    let app = api::create_router(api::AppState { registry });

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind to {}: {e}", config.bind))?;
    info!("server running at http://{}. Press Ctrl+C to stop.", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("server error: {e}"))?;

    info!("shutting down");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install CTRL+C signal handler");
}
