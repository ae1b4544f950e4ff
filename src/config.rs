//! Server configuration module
//! Handles the immutable parameters loaded once at process start

use crate::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_HOST, DEFAULT_JWT_ALGORITHM, DEFAULT_MAX_DB_CONNECTIONS,
    DEFAULT_PORT, DEFAULT_TOKEN_TTL_MINUTES,
};
use crate::error::{Result, StockError};
use jsonwebtoken::Algorithm;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Credentials for the user created at startup when absent
#[derive(Debug, Clone)]
pub struct BootstrapUser {
    pub username: String,
    pub password: String,
}

/// Server configuration parameters
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// sqlx connection URL for the credential and inventory store
    pub database_url: String,
    /// Upper bound on pooled store connections
    pub max_db_connections: u32,
    /// JWT secret for token signing/validation
    pub jwt_secret: String,
    /// HMAC algorithm used to sign tokens
    pub jwt_algorithm: Algorithm,
    /// Lifetime of an issued access token
    pub token_ttl: Duration,
    pub bootstrap_user: Option<BootstrapUser>,
}

impl ServerConfig {
    /// Create a test configuration - DANGEROUS: Only for testing!
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            database_url: "sqlite::memory:".to_string(),
            max_db_connections: 1,
            jwt_secret: "test-jwt-secret-only-for-unit-tests-never-use-in-production".to_string(),
            jwt_algorithm: Algorithm::HS256,
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_MINUTES * 60),
            bootstrap_user: None,
        }
    }

    /// Validate that a secret meets security requirements
    fn validate_secret(secret: &str) -> Result<()> {
        if secret.len() < 32 {
            return Err(StockError::ConfigError(
                "JWT secret must be at least 32 characters long".to_string(),
            ));
        }

        // Check for insecure default or example values
        let insecure_patterns = [
            "your-secret-key",
            "change-this",
            "changeme",
            "test-secret",
            "default",
            "secret",
            "password",
            "12345",
        ];

        for pattern in &insecure_patterns {
            if secret.to_lowercase().contains(pattern) {
                return Err(StockError::ConfigError(format!(
                    "JWT secret contains insecure pattern '{}'. Please use a secure random secret generated with: openssl rand -hex 32",
                    pattern
                )));
            }
        }

        // Ensure some complexity
        if secret.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(StockError::ConfigError(
                "JWT secret should contain mixed characters (letters, numbers, symbols) for security"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Only HMAC algorithms make sense with a shared secret
    fn parse_algorithm(name: &str) -> Result<Algorithm> {
        let algorithm = Algorithm::from_str(name.trim()).map_err(|_| {
            StockError::ConfigError(format!("Unknown JWT algorithm: {}", name))
        })?;

        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
            other => Err(StockError::ConfigError(format!(
                "JWT algorithm {:?} is not supported with a shared secret, use HS256, HS384 or HS512",
                other
            ))),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("RUSTY_STOCK_HOST").unwrap_or(DEFAULT_HOST.to_string());
        let port = match lookup("RUSTY_STOCK_PORT") {
            Some(p) => p.parse().map_err(|_| {
                StockError::ConfigError(format!("RUSTY_STOCK_PORT is not a valid port: {}", p))
            })?,
            None => DEFAULT_PORT,
        };

        let database_url = lookup("RUSTY_STOCK_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .unwrap_or(DEFAULT_DATABASE_URL.to_string());

        let max_db_connections = match lookup("RUSTY_STOCK_DB_MAX_CONNECTIONS") {
            Some(c) => c.parse::<u32>().map_err(|_| {
                StockError::ConfigError(format!(
                    "RUSTY_STOCK_DB_MAX_CONNECTIONS is not a valid connection count: {}",
                    c
                ))
            })?,
            None => DEFAULT_MAX_DB_CONNECTIONS,
        };
        if max_db_connections == 0 {
            return Err(StockError::ConfigError(
                "RUSTY_STOCK_DB_MAX_CONNECTIONS must be greater than zero".to_string(),
            ));
        }

        let jwt_secret = lookup("RUSTY_STOCK_JWT_SECRET")
            .or_else(|| lookup("SECRET_KEY"))
            .ok_or_else(|| {
                StockError::ConfigError(
                    "RUSTY_STOCK_JWT_SECRET environment variable is required for security. \
                     Generate one with: openssl rand -hex 32"
                        .to_string(),
                )
            })?;
        Self::validate_secret(&jwt_secret)?;

        let jwt_algorithm = Self::parse_algorithm(
            &lookup("RUSTY_STOCK_JWT_ALGORITHM")
                .or_else(|| lookup("ALGORITHM"))
                .unwrap_or(DEFAULT_JWT_ALGORITHM.to_string()),
        )?;

        let ttl_minutes = match lookup("RUSTY_STOCK_TOKEN_TTL_MINUTES")
            .or_else(|| lookup("ACCESS_TOKEN_EXPIRE_MINUTES"))
        {
            Some(t) => t.parse::<u64>().map_err(|_| {
                StockError::ConfigError(format!("Token TTL is not a whole number of minutes: {}", t))
            })?,
            None => DEFAULT_TOKEN_TTL_MINUTES,
        };
        if ttl_minutes == 0 {
            return Err(StockError::ConfigError(
                "Token TTL must be at least one minute".to_string(),
            ));
        }
        let ttl_secs = ttl_minutes.checked_mul(60).ok_or_else(|| {
            StockError::ConfigError(format!("Token TTL is too large: {} minutes", ttl_minutes))
        })?;

        let bootstrap_user = match (
            lookup("RUSTY_STOCK_BOOTSTRAP_USERNAME"),
            lookup("RUSTY_STOCK_BOOTSTRAP_PASSWORD"),
        ) {
            (Some(username), Some(password)) => Some(BootstrapUser { username, password }),
            (None, None) => None,
            _ => {
                return Err(StockError::ConfigError(
                    "RUSTY_STOCK_BOOTSTRAP_USERNAME and RUSTY_STOCK_BOOTSTRAP_PASSWORD must be set together"
                        .to_string(),
                ))
            }
        };

        Ok(Self {
            host,
            port,
            database_url,
            max_db_connections,
            jwt_secret,
            jwt_algorithm,
            token_ttl: Duration::from_secs(ttl_secs),
            bootstrap_user,
        })
    }
}
