//! JWT Token Service
//!
//! Issues one bearer token per customer at account creation. Tokens carry the
//! customer id as `sub` and are checked for signature, issuer, audience and
//! expiry on every request. Revocation is tracked by `jti`.

use chrono::{Duration, Utc};
use dashmap::DashSet;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use miniwallet_core::{AuthGateway, CustomerId, GatewayError, IdentityToken};

use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (customer id)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Not before (Unix timestamp)
    pub nbf: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// JWT ID (unique identifier)
    pub jti: String,
}

/// JWT service for token management
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// Revoked token IDs (jti)
    revoked_tokens: Arc<DashSet<String>>,
}

impl JwtService {
    /// Create a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
            revoked_tokens: Arc::new(DashSet::new()),
        }
    }

    /// Issue a token for a customer
    pub fn issue(&self, customer_id: &CustomerId) -> AuthResult<String> {
        let now = Utc::now();
        let exp = now
            + Duration::from_std(self.config.token_lifetime)
                .map_err(|e| AuthError::Internal(e.to_string()))?;

        let claims = TokenClaims {
            sub: customer_id.as_str().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        self.encode_claims(&claims)
    }

    /// Validate a token and return its claims
    pub fn validate(&self, token: &str) -> AuthResult<TokenClaims> {
        let claims = self.decode_token(token)?;

        if self.is_token_revoked(&claims.jti) {
            return Err(AuthError::TokenRevoked);
        }

        Ok(claims)
    }

    /// Revoke a token by id
    pub fn revoke_token(&self, jti: &str) {
        self.revoked_tokens.insert(jti.to_string());
        tracing::info!(jti = %jti, "Token revoked");
    }

    /// Check if a token is revoked
    pub fn is_token_revoked(&self, jti: &str) -> bool {
        self.revoked_tokens.contains(jti)
    }

    fn encode_claims(&self, claims: &TokenClaims) -> AuthResult<String> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to encode token: {}", e)))
    }

    fn decode_token(&self, token: &str) -> AuthResult<TokenClaims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &validation)?;

        Ok(token_data.claims)
    }
}

impl AuthGateway for JwtService {
    fn issue_token(&self, customer_id: &CustomerId) -> Result<IdentityToken, GatewayError> {
        Ok(IdentityToken(self.issue(customer_id)?))
    }

    fn verify_token(&self, token: &str) -> Result<CustomerId, GatewayError> {
        let claims = self.validate(token)?;
        if claims.sub.trim().is_empty() {
            return Err(GatewayError::InvalidToken);
        }
        Ok(CustomerId::new(claims.sub))
    }
}
