//! Application configuration management

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

/// Output format for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    fn from_env_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host (for generating URLs)
    pub host: Option<String>,

    /// Server port
    pub port: u16,

    /// SQLite connection URL (`sqlite:./data/movies.db`, `sqlite::memory:`)
    pub database_url: String,

    /// Maximum number of pooled connections
    pub database_max_connections: u32,

    /// How long to keep retrying the initial connection
    pub database_connect_timeout: Duration,

    /// Log output format
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Prefer DATABASE_PATH, fall back to DATABASE_URL
        let database_url = env::var("DATABASE_PATH")
            .or_else(|_| env::var("DATABASE_URL"))
            .map(|v| normalize_database_url(&v))
            .unwrap_or_else(|_| "sqlite:./data/movies.db".to_string());

        Ok(Self {
            host: env::var("HOST").ok(),

            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url,

            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid DATABASE_MAX_CONNECTIONS")?,

            database_connect_timeout: Duration::from_secs(
                env::var("DATABASE_CONNECT_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("Invalid DATABASE_CONNECT_TIMEOUT_SECS")?,
            ),

            log_format: env::var("LOG_FORMAT")
                .map(|v| LogFormat::from_env_value(&v))
                .unwrap_or_default(),
        })
    }
}

/// Accept a bare file path as well as a `sqlite:` URL
fn normalize_database_url(value: &str) -> String {
    if value.starts_with("sqlite:") {
        value.to_string()
    } else {
        format!("sqlite:{}", value)
    }
}
