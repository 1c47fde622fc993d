//! Application settings.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::shared::snowflake::ROLLPLAYER_EPOCH;

/// Secrets shorter than this are rejected at load time (256 bits).
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub snowflake: SnowflakeSettings,
    pub cors: CorsSettings,
    pub websocket: WebSocketSettings,
    /// development, staging, or production
    pub environment: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Pool acquire timeout in seconds
    pub acquire_timeout: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    pub secret: String,
    pub access_token_expiry_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeSettings {
    /// Epoch in Unix milliseconds. A design-time constant shared by every
    /// instance; changing it breaks time-comparability of existing IDs.
    pub epoch: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebSocketSettings {
    /// How long a connection may sit between Hello and Subscribe
    pub subscribe_timeout_secs: u64,
}

impl Settings {
    /// Load settings, later sources overriding earlier ones:
    /// `config/default.toml`, `config/{RUN_ENV}.toml`, then environment
    /// variables (`APP__SERVER__PORT=...`, plus the bare `DATABASE_URL` and
    /// `JWT_SECRET` shortcuts).
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        let settings: Self = Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout", 30)?
            .set_default("jwt.access_token_expiry_minutes", 30)?
            .set_default("snowflake.epoch", ROLLPLAYER_EPOCH)?
            .set_default("cors.allowed_origins", vec!["http://localhost:3000"])?
            .set_default("websocket.subscribe_timeout_secs", 30_i64)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .build()?
            .try_deserialize()?;

        if settings.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::Message(format!(
                "JWT secret must be at least {} bytes, got {}",
                MIN_JWT_SECRET_LENGTH,
                settings.jwt.secret.len()
            )));
        }

        Ok(settings)
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
