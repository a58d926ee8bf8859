//! Token verification adapters.
//!
//! Two production verifiers implement the `TokenVerifier` port:
//!
//! - `LocalJwtVerifier` - HS256 tokens issued by this backend
//! - `IdpVerifier` - RS256 tokens from the external identity provider,
//!   validated against its JWKS endpoint
//!
//! `VerifierChain` composes them so either token kind authenticates a
//! request.

mod chain;
mod idp;
mod local_jwt;
mod mock;

pub use chain::VerifierChain;
pub use idp::{IdpConfig, IdpVerifier};
pub use local_jwt::{LocalJwtConfig, LocalJwtVerifier};
pub use mock::MockTokenVerifier;
