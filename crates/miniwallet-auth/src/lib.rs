//! MiniWallet Authentication
//!
//! Identity tokens for wallet customers:
//! - HS256 JWTs whose subject is the customer id
//! - Issuer, audience and expiry checks on every request
//! - In-memory revocation by token id (`jti`)
//!
//! [`JwtService`] is the production [`miniwallet_core::AuthGateway`].

pub mod config;
pub mod error;
pub mod jwt;

pub use config::JwtConfig;
pub use error::{AuthError, AuthResult};
pub use jwt::{JwtService, TokenClaims};
