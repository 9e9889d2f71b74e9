//! Service configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;

use crate::limiter::RateLimitPolicy;

/// Divvy service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT token lifetime in seconds
    pub jwt_lifetime_secs: i64,

    /// Issuer claim stamped into every token
    pub jwt_issuer: String,

    /// Budget for bill operations per user
    pub bill_rate_limit: RateLimitPolicy,

    /// Budget for receipt image uploads per user
    pub image_rate_limit: RateLimitPolicy,

    /// Largest accepted receipt image in bytes
    pub max_upload_bytes: usize,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServiceConfig {
            jwt_secret: env::var("DIVVY_JWT_SECRET").unwrap_or_else(|_| {
                // In production this MUST be set via environment variable
                "divvy-dev-secret-change-in-production".to_string()
            }),

            jwt_lifetime_secs: env::var("DIVVY_JWT_LIFETIME_SECS")
                .unwrap_or_else(|_| "3600".to_string()) // 1 hour
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DIVVY_JWT_LIFETIME_SECS".to_string()))?,

            jwt_issuer: env::var("DIVVY_JWT_ISSUER").unwrap_or_else(|_| "divvy-api".to_string()),

            bill_rate_limit: RateLimitPolicy::new(
                env::var("DIVVY_BILL_RATE_LIMIT")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("DIVVY_BILL_RATE_LIMIT".to_string()))?,
                env::var("DIVVY_BILL_RATE_WINDOW_SECS")
                    .unwrap_or_else(|_| "3600".to_string()) // 1 hour
                    .parse()
                    .map_err(|_| {
                        ConfigError::InvalidValue("DIVVY_BILL_RATE_WINDOW_SECS".to_string())
                    })?,
            ),

            image_rate_limit: RateLimitPolicy::new(
                env::var("DIVVY_IMAGE_RATE_LIMIT")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("DIVVY_IMAGE_RATE_LIMIT".to_string()))?,
                env::var("DIVVY_IMAGE_RATE_WINDOW_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()
                    .map_err(|_| {
                        ConfigError::InvalidValue("DIVVY_IMAGE_RATE_WINDOW_SECS".to_string())
                    })?,
            ),

            max_upload_bytes: env::var("DIVVY_MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| "10485760".to_string()) // 10MB
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DIVVY_MAX_UPLOAD_BYTES".to_string()))?,
        };

        // An explicitly blank secret would sign every token with "".
        if config.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired("DIVVY_JWT_SECRET".to_string()));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 8] = [
        "DIVVY_JWT_SECRET",
        "DIVVY_JWT_LIFETIME_SECS",
        "DIVVY_JWT_ISSUER",
        "DIVVY_BILL_RATE_LIMIT",
        "DIVVY_BILL_RATE_WINDOW_SECS",
        "DIVVY_IMAGE_RATE_LIMIT",
        "DIVVY_IMAGE_RATE_WINDOW_SECS",
        "DIVVY_MAX_UPLOAD_BYTES",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    // Environment variables are process-global, so every scenario runs in
    // this one test function instead of racing across the test threads.
    #[test]
    fn test_load_from_environment() {
        clear_env();

        // Defaults.
        let config = ServiceConfig::load().unwrap();
        assert_eq!(config.jwt_secret, "divvy-dev-secret-change-in-production");
        assert_eq!(config.jwt_lifetime_secs, 3600);
        assert_eq!(config.jwt_issuer, "divvy-api");
        assert_eq!(config.bill_rate_limit, RateLimitPolicy::new(30, 3600));
        assert_eq!(config.image_rate_limit, RateLimitPolicy::new(5, 60));
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);

        // Overrides.
        env::set_var("DIVVY_JWT_SECRET", "hunter2");
        env::set_var("DIVVY_JWT_LIFETIME_SECS", "120");
        env::set_var("DIVVY_IMAGE_RATE_LIMIT", "2");
        env::set_var("DIVVY_IMAGE_RATE_WINDOW_SECS", "10");
        let config = ServiceConfig::load().unwrap();
        assert_eq!(config.jwt_secret, "hunter2");
        assert_eq!(config.jwt_lifetime_secs, 120);
        assert_eq!(config.image_rate_limit, RateLimitPolicy::new(2, 10));

        // Unparseable numbers are rejected, not defaulted.
        env::set_var("DIVVY_MAX_UPLOAD_BYTES", "plenty");
        match ServiceConfig::load() {
            Err(ConfigError::InvalidValue(var)) => assert_eq!(var, "DIVVY_MAX_UPLOAD_BYTES"),
            other => panic!("expected invalid value error, got {other:?}"),
        }
        env::remove_var("DIVVY_MAX_UPLOAD_BYTES");

        // A blank secret is worse than a missing one.
        env::set_var("DIVVY_JWT_SECRET", "  ");
        match ServiceConfig::load() {
            Err(ConfigError::MissingRequired(var)) => assert_eq!(var, "DIVVY_JWT_SECRET"),
            other => panic!("expected missing required error, got {other:?}"),
        }

        clear_env();
    }
}
