//! JWT implementation of the IdentityProvider port.
//!
//! Validates HS256 bearer tokens carrying the caller's email claim. The
//! signing secret is shared with the token issuer.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserIdentity;
use crate::ports::{AuthError, IdentityProvider};

/// Claims carried by the booking tokens.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Caller's email, used as the booking identity.
    email: String,
    /// Expiration as a Unix timestamp.
    exp: i64,
}

/// JWT implementation of the IdentityProvider port.
pub struct JwtIdentityProvider {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    /// Creates a provider validating HS256 tokens against the given secret.
    pub fn new(secret: &SecretString) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn resolve(&self, token: &str) -> Result<UserIdentity, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidCredential(e.to_string()),
            }
        })?;

        UserIdentity::new(&data.claims.email)
            .map_err(|e| AuthError::InvalidCredential(format!("Bad email claim: {}", e)))
    }
}
