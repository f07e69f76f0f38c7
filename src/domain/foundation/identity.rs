//! Caller identity value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Resolved identity of the caller, as supplied by the identity context.
///
/// The booking flow trusts this value as the booking's owner; it performs
/// no authentication of its own. Identities are email addresses in this
/// deployment, so construction validates the basic shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserIdentity(String);

impl UserIdentity {
    /// Creates an identity from an email address.
    pub fn new(email: impl Into<String>) -> Result<Self, ValidationError> {
        let email = email.into();
        if email.trim().is_empty() {
            return Err(ValidationError::empty_field("identity"));
        }
        let (local, domain) = email
            .split_once('@')
            .ok_or_else(|| ValidationError::invalid_format("identity", "missing @ symbol"))?;
        if local.is_empty() || domain.is_empty() {
            return Err(ValidationError::invalid_format(
                "identity",
                "missing local part or domain",
            ));
        }
        Ok(Self(email))
    }

    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_email() {
        let identity = UserIdentity::new("guest@example.com").unwrap();
        assert_eq!(identity.as_str(), "guest@example.com");
    }

    #[test]
    fn rejects_empty() {
        assert!(UserIdentity::new("").is_err());
        assert!(UserIdentity::new("  ").is_err());
    }

    #[test]
    fn rejects_missing_at_or_parts() {
        assert!(UserIdentity::new("guest.example.com").is_err());
        assert!(UserIdentity::new("@example.com").is_err());
        assert!(UserIdentity::new("guest@").is_err());
    }
}
