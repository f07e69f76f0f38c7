//! Authentication adapters.
//!
//! `JwtIdentityProvider` resolves bearer tokens into a caller identity;
//! `MockIdentityProvider` serves the same port in tests.

mod jwt;
mod mock;

pub use jwt::JwtIdentityProvider;
pub use mock::MockIdentityProvider;
