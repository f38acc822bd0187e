//! Custom Axum Extractors
//!
//! Token authentication and JSON bodies that fail with the wallet's error
//! envelope instead of axum's plain-text rejections.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts},
    Json,
};
use miniwallet_auth::AuthError;
use miniwallet_core::CustomerId;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Authenticated Customer Extractor
// =============================================================================

/// Customer resolved from the request's identity token
#[derive(Debug, Clone)]
pub struct CurrentCustomer(pub CustomerId);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentCustomer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(token_from_header)
            .ok_or(AuthError::Unauthenticated)?;

        let customer_id = state.wallet.authenticate(token)?;
        Ok(CurrentCustomer(customer_id))
    }
}

/// Accepts `Token <t>` and `Bearer <t>` (scheme is case-insensitive)
fn token_from_header(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    if scheme.eq_ignore_ascii_case("token") || scheme.eq_ignore_ascii_case("bearer") {
        Some(token)
    } else {
        None
    }
}

// =============================================================================
// JSON Body Extractor
// =============================================================================

/// JSON body whose rejection renders as a `fail` envelope
pub struct WalletJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for WalletJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(WalletJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_schemes() {
        assert_eq!(token_from_header("Token abc"), Some("abc"));
        assert_eq!(token_from_header("Bearer abc"), Some("abc"));
        assert_eq!(token_from_header("bearer  abc "), Some("abc"));
        assert_eq!(token_from_header("Basic abc"), None);
        assert_eq!(token_from_header("Token"), None);
        assert_eq!(token_from_header("Token   "), None);
    }
}
