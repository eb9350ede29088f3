//! Configuration management for the AgroNond Mandi Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with AGRO_ prefix

use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;

use shared::CommissionRates;

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

    /// Market commission configuration
    pub commission: CommissionConfig,

    /// OTP login configuration
    pub otp: OtpConfig,

    /// SMS gateway configuration
    pub sms: SmsConfig,
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

/// Commission rates applied at settlement time. Changing these affects
/// future settlements only; existing records keep their snapshot.
#[derive(Debug, Deserialize, Clone)]
pub struct CommissionConfig {
    /// Fraction deducted from the farmer's proceeds
    pub farmer_rate: Decimal,

    /// Fraction added on top of the trader's dues
    pub trader_rate: Decimal,
}

impl CommissionConfig {
    pub fn rates(&self) -> CommissionRates {
        CommissionRates {
            farmer: self.farmer_rate,
            trader: self.trader_rate,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OtpConfig {
    /// Secret key for OTP digests at rest
    pub secret: String,

    /// OTP validity in seconds
    pub ttl_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SmsConfig {
    /// SMS gateway endpoint; empty disables SMS delivery
    pub api_endpoint: String,

    /// SMS gateway API key
    pub api_key: String,

    /// Registered sender id
    pub sender_id: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("AGRO_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("jwt.access_token_expiry", 3600)?
            .set_default("jwt.refresh_token_expiry", 604800)?
            .set_default("commission.farmer_rate", 0.04)?
            .set_default("commission.trader_rate", 0.09)?
            .set_default("otp.ttl_seconds", 300)?
            .set_default("sms.api_endpoint", "")?
            .set_default("sms.api_key", "")?
            .set_default("sms.sender_id", "AGNOND")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (AGRO_ prefix)
            .add_source(
                Environment::with_prefix("AGRO")
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
