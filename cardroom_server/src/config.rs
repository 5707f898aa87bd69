//! Server configuration loaded from environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use cardroom::TableConfig;
use cardroom::game::entities::Blinds;

/// Complete server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Server bind address.
    pub bind: SocketAddr,
    /// Defaults applied to every created room.
    pub table: TableConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables, with an optional
    /// bind address override from the CLI.
    pub fn from_env(bind_override: Option<SocketAddr>) -> Result<Self, ConfigError> {
        let bind = bind_override
            .or_else(|| {
                std::env::var("SERVER_BIND")
                    .ok()
                    .and_then(|s| s.parse().ok())
            })
            .unwrap_or_else(|| {
                "127.0.0.1:7777"
                    .parse()
                    .expect("default bind address is valid")
            });

        let mut table = TableConfig::default();
        table.room.max_seats = parse_env_or("CARDROOM_MAX_SEATS", table.room.max_seats);
        table.room.starting_stack =
            parse_env_or("CARDROOM_STARTING_STACK", table.room.starting_stack);
        table.room.blinds = Blinds {
            small: parse_env_or("CARDROOM_SMALL_BLIND", table.room.blinds.small),
            big: parse_env_or("CARDROOM_BIG_BLIND", table.room.blinds.big),
        };
        table.reveal_delay = Duration::from_millis(parse_env_or(
            "CARDROOM_REVEAL_DELAY_MS",
            table.reveal_delay.as_millis() as u64,
        ));
        table.inter_hand_delay = Duration::from_millis(parse_env_or(
            "CARDROOM_INTER_HAND_DELAY_MS",
            table.inter_hand_delay.as_millis() as u64,
        ));
        table.bot_think_delay = Duration::from_millis(parse_env_or(
            "CARDROOM_BOT_THINK_DELAY_MS",
            table.bot_think_delay.as_millis() as u64,
        ));

        let config = Self { bind, table };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.table.validate().map_err(|reason| ConfigError::Invalid {
            var: "CARDROOM_*".to_string(),
            reason,
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Parse an environment variable, falling back to a default.
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
