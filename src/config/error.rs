//! Errors surfaced while loading or validating configuration.

use thiserror::Error;

/// Top-level failure from [`crate::config::AppConfig::load`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// A single configuration value that failed its section's `validate()`.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("server.port must be non-zero")]
    InvalidPort,

    #[error("timeout is outside the accepted range")]
    InvalidTimeout,

    #[error("database.url must be a postgres:// connection string")]
    InvalidDatabaseUrl,

    #[error("database.min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("database pool size exceeds the 100-connection cap")]
    PoolSizeTooLarge,

    #[error("payment.stripe_api_key does not look like a Stripe secret key")]
    InvalidStripeKey,

    #[error("payment.currency must be a 3-letter lowercase ISO code")]
    InvalidCurrency,

    #[error("auth.jwt_secret must be at least 32 bytes")]
    JwtSecretTooShort,
}
