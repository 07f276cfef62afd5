//! Server settings, read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `API_HOST` | `0.0.0.0` |
//! | `API_PORT` | `3000` |
//! | `DATABASE_URL` | required |
//! | `LOG_LEVEL` | `info` |
//! | `API_CORS_ORIGINS` | none (comma separated) |
//! | `API_REQUEST_TIMEOUT_SECONDS` | `30` |
//! | `PUBLIC_BASE_URL` | `http://localhost:3000` |

use eyre::{Result, WrapErr, eyre};
use std::{env, time::Duration};
use tracing::Level;

pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub log_level: Level,
    /// `None` leaves CORS off entirely.
    pub cors_origins: Option<Vec<String>>,
    pub request_timeout: Duration,
    /// Origin of the public booking page; share links are built on it.
    pub public_base_url: String,
}

/// Unknown names fall back to `INFO`.
pub fn parse_log_level(value: &str) -> Level {
    match value.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn split_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so it can be exercised
    /// without touching the process environment.
    ///
    /// # Errors
    ///
    /// Fails when `DATABASE_URL` is missing or `API_PORT` is not a port number.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup("API_PORT") {
            Some(port) => port
                .trim()
                .parse()
                .wrap_err_with(|| format!("Invalid API_PORT value {:?}", port))?,
            None => 3000,
        };

        let database_url = lookup("DATABASE_URL").ok_or_else(|| eyre!("DATABASE_URL environment variable must be set"))?;

        // A malformed timeout keeps the default rather than refusing to start.
        let request_timeout = lookup("API_REQUEST_TIMEOUT_SECONDS")
            .and_then(|secs| secs.trim().parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        Ok(Self {
            host: lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url,
            log_level: lookup("LOG_LEVEL").as_deref().map_or(Level::INFO, parse_log_level),
            cors_origins: lookup("API_CORS_ORIGINS").as_deref().map(split_origins),
            request_timeout,
            public_base_url: lookup("PUBLIC_BASE_URL").unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_string()),
        })
    }

    /// `host:port`, ready for `TcpListener::bind`.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
