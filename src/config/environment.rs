//! Environment configuration
//!
//! Loaded once at startup and read-only afterwards.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    /// Bounded window for reaching the database at startup.
    pub db_connect_timeout: Duration,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub rate_limit_requests: u32,
    pub rate_limit_window: u64,
    pub bcrypt_cost: u32,
}

fn var_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value '{}': {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

impl EnvironmentConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: var_or("PORT", 5000)?,
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            db_max_connections: var_or("DB_MAX_CONNECTIONS", 10)?,
            db_connect_timeout: Duration::from_secs(var_or("DB_CONNECT_TIMEOUT", 5)?),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_expiration: var_or("JWT_EXPIRATION", 7 * 24 * 3600)?,
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            rate_limit_requests: var_or("RATE_LIMIT_REQUESTS", 100)?,
            rate_limit_window: var_or("RATE_LIMIT_WINDOW", 15 * 60)?,
            bcrypt_cost: var_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        })
    }

    /// Settings for tests and local runs without a database.
    pub fn for_tests() -> Self {
        Self {
            environment: "test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: String::new(),
            db_max_connections: 1,
            db_connect_timeout: Duration::from_secs(1),
            jwt_secret: "test-secret".to_string(),
            jwt_expiration: 3600,
            cors_origins: vec!["*".to_string()],
            rate_limit_requests: 10_000,
            rate_limit_window: 60,
            bcrypt_cost: 4,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_is_permissive_and_cheap() {
        let config = EnvironmentConfig::for_tests();
        assert!(config.allows_any_origin());
        assert_eq!(config.bcrypt_cost, 4);
        assert!(!config.is_production());
        assert_eq!(config.server_url(), "127.0.0.1:0");
    }
}
