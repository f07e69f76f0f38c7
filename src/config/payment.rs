//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret key, never logged or serialized back out
    pub stripe_api_key: SecretString,

    /// Stripe API base URL (overridden in tests)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// ISO 4217 currency all charges are made in, lowercase
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Charge call timeout in seconds
    #[serde(default = "default_charge_timeout")]
    pub charge_timeout_secs: u64,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_test_")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let key = self.stripe_api_key.expose_secret();
        if key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_API_KEY"));
        }
        if !key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(ValidationError::InvalidCurrency);
        }
        if self.charge_timeout_secs == 0 || self.charge_timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_api_key: SecretString::new(String::new()),
            api_base_url: default_api_base_url(),
            currency: default_currency(),
            charge_timeout_secs: default_charge_timeout(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}

fn default_currency() -> String {
    "usd".to_string()
}

fn default_charge_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> PaymentConfig {
        PaymentConfig {
            stripe_api_key: SecretString::new("sk_test_abcd1234".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_mode_detection() {
        assert!(valid().is_test_mode());
        let live = PaymentConfig {
            stripe_api_key: SecretString::new("sk_live_xxx".to_string()),
            ..Default::default()
        };
        assert!(!live.is_test_mode());
    }

    #[test]
    fn missing_api_key_is_invalid() {
        assert!(PaymentConfig::default().validate().is_err());
    }

    #[test]
    fn wrong_key_prefix_is_invalid() {
        let config = PaymentConfig {
            stripe_api_key: SecretString::new("pk_test_xxx".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn uppercase_currency_is_invalid() {
        let config = PaymentConfig {
            currency: "USD".to_string(),
            ..valid()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn secret_key_is_redacted_in_debug_output() {
        let rendered = format!("{:?}", valid());
        assert!(!rendered.contains("sk_test_abcd1234"));
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid().validate().is_ok());
    }
}
