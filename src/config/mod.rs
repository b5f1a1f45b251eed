//! Application configuration management

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::db::PoolSettings;

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind
    pub host: String,

    /// Server port
    pub port: u16,

    /// SQLite database URL (`sqlite://...`). DATABASE_PATH takes a plain file path.
    pub database_url: String,

    /// Connection pool sizing and acquire timeout
    pub pool: PoolSettings,

    /// How long startup keeps retrying the first database connection
    pub connect_timeout: Duration,

    /// Directory holding index.html and the static assets
    pub static_dir: PathBuf,

    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns the value of a variable if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Prefer DATABASE_PATH, fall back to DATABASE_URL
        let database_url = match lookup("DATABASE_PATH") {
            Some(path) => format!("sqlite://{}", path),
            None => lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://./data/grimoire.db".to_string()),
        };

        let defaults = PoolSettings::default();

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::to_ascii_lowercase) {
            None => LogFormat::default(),
            Some(value) => match value.as_str() {
                "json" => LogFormat::Json,
                "pretty" | "text" => LogFormat::Pretty,
                other => bail!("Invalid LOG_FORMAT: {} (expected json or pretty)", other),
            },
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),

            port: lookup("PORT")
                .unwrap_or_else(|| "3001".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url,

            pool: PoolSettings {
                max_connections: match lookup("DATABASE_MAX_CONNECTIONS") {
                    Some(v) => v.parse().context("Invalid DATABASE_MAX_CONNECTIONS")?,
                    None => defaults.max_connections,
                },
                acquire_timeout: match lookup("DATABASE_ACQUIRE_TIMEOUT_SECS") {
                    Some(v) => Duration::from_secs(
                        v.parse().context("Invalid DATABASE_ACQUIRE_TIMEOUT_SECS")?,
                    ),
                    None => defaults.acquire_timeout,
                },
            },

            connect_timeout: Duration::from_secs(
                lookup("DATABASE_CONNECT_TIMEOUT_SECS")
                    .unwrap_or_else(|| "30".to_string())
                    .parse()
                    .context("Invalid DATABASE_CONNECT_TIMEOUT_SECS")?,
            ),

            static_dir: PathBuf::from(
                lookup("STATIC_DIR").unwrap_or_else(|| "./static".to_string()),
            ),

            log_format,
        })
    }
}
