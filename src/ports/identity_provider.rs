//! Identity provider port - bearer credential resolution.
//!
//! The identity context is a consumed collaborator: it turns a bearer
//! credential into a caller identity. The booking flow trusts the resolved
//! value as the booking's owner.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::UserIdentity;

/// Port for resolving a caller identity from a bearer credential.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves the identity behind a bearer credential.
    async fn resolve(&self, bearer: &str) -> Result<UserIdentity, AuthError>;
}

/// Errors from identity resolution.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The credential is malformed, unsigned, or unknown.
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// The credential was valid once but has expired.
    #[error("Credential expired")]
    Expired,

    /// The identity context is unreachable.
    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),
}
