//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Authentication configuration (JWT)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret shared with the token issuer
    pub jwt_secret: SecretString,
}

impl AuthConfig {
    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.jwt_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("JWT_SECRET"));
        }
        if self.jwt_secret.expose_secret().len() < 32 {
            return Err(ValidationError::JwtSecretTooShort);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_secret_is_invalid() {
        let config = AuthConfig {
            jwt_secret: SecretString::new(String::new()),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn short_secret_is_invalid() {
        let config = AuthConfig {
            jwt_secret: SecretString::new("short".to_string()),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn long_secret_passes() {
        let config = AuthConfig {
            jwt_secret: SecretString::new("a".repeat(48)),
        };
        assert!(config.validate().is_ok());
    }
}
