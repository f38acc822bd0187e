//! Identity gateway seam
//!
//! The core never authenticates anyone. It asks a gateway to issue a token at
//! account creation and trusts the customer id a gateway returns for a token.

use thiserror::Error;

use crate::types::CustomerId;

/// Opaque credential handed to the customer at account creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityToken(pub String);

impl IdentityToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Gateway failures as seen by the core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token has been revoked")]
    TokenRevoked,

    #[error("Token issuance failed: {0}")]
    Issuance(String),
}

/// Token issuer and verifier consumed by the wallet service
pub trait AuthGateway: Send + Sync {
    /// Issue a token whose subject is `customer_id`
    fn issue_token(&self, customer_id: &CustomerId) -> Result<IdentityToken, GatewayError>;

    /// Resolve a token back to the customer it was issued for
    fn verify_token(&self, token: &str) -> Result<CustomerId, GatewayError>;
}
