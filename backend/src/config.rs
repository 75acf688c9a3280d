//! Configuration management for the Ferreteria Management System
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with FMS_ prefix

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// Store-specific behavior
    pub business: BusinessConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWT tokens
    pub secret: String,

    /// Access token expiration in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiration in seconds
    pub refresh_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessConfig {
    /// Offset from UTC for the store's local calendar, in hours.
    /// Colombia is UTC-5 year round (no DST).
    pub utc_offset_hours: i32,

    /// Days until an invoice falls due, counted from its issue date
    pub invoice_due_days: i64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("FMS_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("jwt.access_token_expiry", 3600)?
            .set_default("jwt.refresh_token_expiry", 604800)?
            .set_default("business.utc_offset_hours", -5)?
            .set_default("business.invoice_due_days", 0)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FMS_ prefix)
            .add_source(
                Environment::with_prefix("FMS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl BusinessConfig {
    /// The store's fixed UTC offset. Out-of-range values fall back to UTC.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
    }

    /// Current wall-clock time on the store's calendar
    pub fn now_local(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset())
    }

    /// Today's date on the store's calendar.
    ///
    /// Invoice dates and report numbers use this, not the UTC date, so a
    /// sale at 8 PM in Bogotá lands on the right day.
    pub fn today(&self) -> NaiveDate {
        self.now_local().date_naive()
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: -5,
            invoice_due_days: 0,
        }
    }
}
