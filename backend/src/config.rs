//! Configuration management for the POS back office
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with POS_ prefix

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

    /// Stock transaction policies
    #[serde(default)]
    pub inventory: InventoryConfig,
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

/// What the stock ledger does when a delta takes a product below zero
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StockPolicy {
    /// Negative stock is recorded as-is (backorders)
    #[default]
    AllowNegative,
    /// The whole transaction is rejected
    RejectOversell,
}

/// When stock notifications are written relative to the stock transaction
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationDelivery {
    /// Inside the unit of work; a failed insert aborts the write
    #[default]
    InTransaction,
    /// After commit, best effort; failures are logged and dropped
    AfterCommit,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InventoryConfig {
    #[serde(default)]
    pub stock_policy: StockPolicy,

    #[serde(default)]
    pub notification_delivery: NotificationDelivery,

    /// Recompute header totals from line items and reject mismatches
    #[serde(default = "default_validate_summaries")]
    pub validate_summaries: bool,
}

fn default_validate_summaries() -> bool {
    true
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("POS_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("inventory.stock_policy", "allow_negative")?
            .set_default("inventory.notification_delivery", "in_transaction")?
            .set_default("inventory.validate_summaries", true)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (POS_ prefix)
            .add_source(
                Environment::with_prefix("POS")
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
            port: 8000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            stock_policy: StockPolicy::default(),
            notification_delivery: NotificationDelivery::default(),
            validate_summaries: default_validate_summaries(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_defaults_match_permissive_behaviour() {
        let inventory = InventoryConfig::default();
        assert_eq!(inventory.stock_policy, StockPolicy::AllowNegative);
        assert_eq!(inventory.notification_delivery, NotificationDelivery::InTransaction);
        assert!(inventory.validate_summaries);
    }

    #[test]
    fn test_policies_parse_from_snake_case() {
        let inventory: InventoryConfig = serde_json::from_str(
            r#"{"stock_policy":"reject_oversell","notification_delivery":"after_commit"}"#,
        )
        .unwrap();
        assert_eq!(inventory.stock_policy, StockPolicy::RejectOversell);
        assert_eq!(inventory.notification_delivery, NotificationDelivery::AfterCommit);
        assert!(inventory.validate_summaries);
    }
}
