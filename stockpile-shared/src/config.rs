//! Configuration management for the notification worker
//!
//! Loads configuration from environment variables into a type-safe struct.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
//! - `REDIS_URL`: Redis connection URL (required)
//! - `ITEM_CHANGE_STREAM`: Redis Stream carrying pantry item changes
//!   (default: stockpile:item-changes)
//! - `FCM_SERVER_KEY`: Push transport server key (required)
//! - `FCM_ENDPOINT`: Push transport endpoint
//!   (default: https://fcm.googleapis.com/fcm/send)
//! - `RUST_LOG`: Log level (default: info)
//!
//! # Example
//!
//! ```no_run
//! use stockpile_shared::config::Config;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! println!("Consuming changes from {}", config.feed.stream_key);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::env;

/// Complete worker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database configuration
    pub database: DatabaseConfig,

    /// Change feed configuration
    pub feed: FeedConfig,

    /// Push transport configuration
    pub push: PushConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Change feed (Redis Stream) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Redis connection URL
    pub redis_url: String,

    /// Stream key carrying pantry item change snapshots
    pub stream_key: String,

    /// Block timeout for XREAD in milliseconds
    pub block_timeout_ms: usize,
}

/// Push transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Multicast endpoint URL
    pub endpoint: String,

    /// Server key for the `Authorization` header
    ///
    /// IMPORTANT: secret material, never log this.
    pub server_key: String,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required environment variable is missing or
    /// has an invalid value.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let redis_url = env::var("REDIS_URL")
            .map_err(|_| anyhow::anyhow!("REDIS_URL environment variable is required"))?;

        let stream_key = env::var("ITEM_CHANGE_STREAM")
            .unwrap_or_else(|_| "stockpile:item-changes".to_string());

        let block_timeout_ms = env::var("ITEM_CHANGE_BLOCK_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<usize>()?;

        let server_key = env::var("FCM_SERVER_KEY")
            .map_err(|_| anyhow::anyhow!("FCM_SERVER_KEY environment variable is required"))?;

        let endpoint = env::var("FCM_ENDPOINT")
            .unwrap_or_else(|_| "https://fcm.googleapis.com/fcm/send".to_string());

        Ok(Self {
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            feed: FeedConfig {
                redis_url,
                stream_key,
                block_timeout_ms,
            },
            push: PushConfig {
                endpoint,
                server_key,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_construction() {
        let config = Config {
            database: DatabaseConfig {
                url: "postgresql://localhost/stockpile".to_string(),
                max_connections: 10,
            },
            feed: FeedConfig {
                redis_url: "redis://localhost:6379".to_string(),
                stream_key: "stockpile:item-changes".to_string(),
                block_timeout_ms: 5000,
            },
            push: PushConfig {
                endpoint: "https://fcm.googleapis.com/fcm/send".to_string(),
                server_key: "test-key".to_string(),
            },
        };

        assert_eq!(config.feed.stream_key, "stockpile:item-changes");
        assert_eq!(config.database.max_connections, 10);
    }
}
