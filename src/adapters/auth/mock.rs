//! Mock identity provider for testing.
//!
//! Maps literal bearer tokens to identities so HTTP tests can authenticate
//! without minting real JWTs.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::UserIdentity;
use crate::ports::{AuthError, IdentityProvider};

/// Mock identity provider for testing.
///
/// Stores a map of tokens to identities. Unknown tokens are rejected as
/// invalid credentials.
#[derive(Debug, Default)]
pub struct MockIdentityProvider {
    tokens: RwLock<HashMap<String, UserIdentity>>,
    /// Optional error to return for all resolutions (for error testing)
    force_error: RwLock<Option<AuthError>>,
}

impl MockIdentityProvider {
    /// Creates a new empty mock provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that resolves to the given identity.
    pub fn with_identity(self, token: impl Into<String>, identity: UserIdentity) -> Self {
        self.tokens.write().unwrap().insert(token.into(), identity);
        self
    }

    /// Adds a valid token resolving to the given email.
    pub fn with_email(self, token: impl Into<String>, email: &str) -> Self {
        let identity = UserIdentity::new(email).unwrap();
        self.with_identity(token, identity)
    }

    /// Forces all resolutions to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Clears the forced error and returns to normal operation.
    pub fn clear_error(&self) {
        *self.force_error.write().unwrap() = None;
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn resolve(&self, token: &str) -> Result<UserIdentity, AuthError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or_else(|| AuthError::InvalidCredential("Unknown token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_registered_token() {
        let provider = MockIdentityProvider::new().with_email("t1", "alice@example.com");

        let identity = provider.resolve("t1").await.unwrap();
        assert_eq!(identity.as_str(), "alice@example.com");
    }

    #[tokio::test]
    async fn unknown_token_is_rejected() {
        let provider = MockIdentityProvider::new();

        let result = provider.resolve("nope").await;
        assert!(matches!(result, Err(AuthError::InvalidCredential(_))));
    }

    #[tokio::test]
    async fn forced_error_wins_until_cleared() {
        let provider = MockIdentityProvider::new()
            .with_email("t1", "alice@example.com")
            .with_error(AuthError::Unavailable("down".to_string()));

        assert!(provider.resolve("t1").await.is_err());

        provider.clear_error();
        assert!(provider.resolve("t1").await.is_ok());
    }
}
