//! Process configuration from CLI arguments and environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use customer_core::{default_log_level, PoolOptions, UpdatePolicy};

/// Customer registry HTTP service configuration.
///
/// All values can be set via environment variables or CLI arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "customer-api", about = "Customer registry HTTP service")]
pub struct Config {
    /// Listen address
    #[arg(long, env = "CUSTOMER_BIND", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    /// SQLite database file
    #[arg(long, env = "CUSTOMER_DB_PATH", default_value = "customers.db")]
    pub db_path: PathBuf,

    /// Number of pooled database connections
    #[arg(long, env = "CUSTOMER_DB_POOL_SIZE", default_value_t = 4)]
    pub db_pool_size: usize,

    /// Seconds to wait for a free database connection
    #[arg(long, env = "CUSTOMER_DB_ACQUIRE_TIMEOUT_SECS", default_value_t = 5)]
    pub db_acquire_timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error); defaults by build mode
    #[arg(long, env = "CUSTOMER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotating log files; logs to stderr when unset
    #[arg(long, env = "CUSTOMER_LOG_DIR")]
    pub log_dir: Option<String>,

    /// CORS allowed origins (comma-separated, or "*" for any)
    #[arg(long, env = "CUSTOMER_CORS_ALLOW_ORIGINS")]
    pub cors_allow_origins: Option<String>,

    /// Reject updates that match no customer with 404
    #[arg(long, env = "CUSTOMER_UPDATE_REQUIRES_EXISTING")]
    pub update_requires_existing: bool,

    /// Reject updates that would reuse another customer's identity number with 409
    #[arg(long, env = "CUSTOMER_UPDATE_ENFORCES_UNIQUE_IDENTITY")]
    pub update_enforces_unique_identity: bool,
}

impl Config {
    /// Validate values clap cannot check on its own.
    pub fn validate(&self) -> Result<(), String> {
        if self.db_pool_size == 0 {
            return Err("db_pool_size must be at least 1".to_string());
        }
        if self.db_acquire_timeout_secs == 0 {
            return Err("db_acquire_timeout_secs must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }

    pub fn pool_options(&self) -> PoolOptions {
        PoolOptions::new(self.db_pool_size)
            .acquire_timeout(Duration::from_secs(self.db_acquire_timeout_secs))
    }

    pub fn update_policy(&self) -> UpdatePolicy {
        UpdatePolicy {
            require_existing: self.update_requires_existing,
            enforce_unique_identity: self.update_enforces_unique_identity,
        }
    }
}
