//! Application configuration management.
//!
//! Configuration is read from environment variables with `envy`, after an
//! optional `.env` file has been loaded.

use std::time::Duration;

use serde::Deserialize;

use crate::store::UpdateSerialization;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (optional): full PostgreSQL connection string. When it is
///   not set the connection is assembled from the `DB_*` variables below.
/// - `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`, `DB_SSLMODE`
/// - `SERVER_PORT`: HTTP server port, defaults to 3000
/// - `DB_MAX_CONNECTIONS`, `DB_MAX_LIFETIME_SECS`, `DB_ACQUIRE_TIMEOUT_SECS`: pool sizing
/// - `BALANCE_UPDATE_TIMEOUT_MS`: deadline for a single balance update
/// - `GLOBAL_UPDATE_LOCK`: serialize every balance update in the process
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default = "default_db_host")]
    pub db_host: String,

    #[serde(default = "default_db_port")]
    pub db_port: u16,

    #[serde(default = "default_db_user")]
    pub db_user: String,

    #[serde(default)]
    pub db_password: String,

    #[serde(default = "default_db_name")]
    pub db_name: String,

    #[serde(default = "default_db_sslmode")]
    pub db_sslmode: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,

    #[serde(default = "default_max_lifetime_secs")]
    pub db_max_lifetime_secs: u64,

    #[serde(default = "default_acquire_timeout_secs")]
    pub db_acquire_timeout_secs: u64,

    #[serde(default = "default_update_timeout_ms")]
    pub balance_update_timeout_ms: u64,

    #[serde(default)]
    pub global_update_lock: bool,
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_db_name() -> String {
    "wallets".to_string()
}

fn default_db_sslmode() -> String {
    "prefer".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    50
}

fn default_max_lifetime_secs() -> u64 {
    300
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_update_timeout_ms() -> u64 {
    5000
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is loaded first if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed into
    /// its expected type (e.g. a non-numeric `SERVER_PORT`).
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        envy::from_env::<Config>()
    }

    /// Deadline applied to each balance update, lock waits included.
    pub fn update_timeout(&self) -> Duration {
        Duration::from_millis(self.balance_update_timeout_ms)
    }

    pub fn update_serialization(&self) -> UpdateSerialization {
        if self.global_update_lock {
            UpdateSerialization::Global
        } else {
            UpdateSerialization::PerRow
        }
    }
}
