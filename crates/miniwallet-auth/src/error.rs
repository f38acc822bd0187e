//! Authentication error types
//!
//! Errors are safe for external exposure and map onto HTTP status codes.

use miniwallet_core::GatewayError;
use thiserror::Error;

/// Result type alias for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    // =========================================================================
    // Token Errors
    // =========================================================================
    /// Token has expired
    #[error("Token has expired")]
    TokenExpired,

    /// Token is invalid (malformed, wrong signature, wrong issuer, etc.)
    #[error("Invalid token")]
    InvalidToken,

    /// Token has been revoked
    #[error("Token has been revoked")]
    TokenRevoked,

    // =========================================================================
    // Request Errors
    // =========================================================================
    /// No credentials on the request
    #[error("Authentication required")]
    Unauthenticated,

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Signing or clock failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::TokenExpired | Self::InvalidToken | Self::TokenRevoked | Self::Unauthenticated => {
                401
            }
            Self::Internal(_) => 500,
        }
    }

    /// Machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenRevoked => "TOKEN_REVOKED",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to clients
    pub fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::TokenExpired,
            _ => Self::InvalidToken,
        }
    }
}

impl From<GatewayError> for AuthError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::InvalidToken => Self::InvalidToken,
            GatewayError::TokenExpired => Self::TokenExpired,
            GatewayError::TokenRevoked => Self::TokenRevoked,
            GatewayError::Issuance(msg) => Self::Internal(msg),
        }
    }
}

impl From<AuthError> for GatewayError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenExpired => Self::TokenExpired,
            AuthError::TokenRevoked => Self::TokenRevoked,
            AuthError::InvalidToken | AuthError::Unauthenticated => Self::InvalidToken,
            AuthError::Internal(msg) => Self::Issuance(msg),
        }
    }
}
