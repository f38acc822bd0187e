//! Account Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::dto::{ApiResponse, InitAccountRequest, TokenResponse};
use crate::error::ApiResult;
use crate::extractors::WalletJson;
use crate::state::AppState;

/// Create an account for a customer and return its identity token
///
/// POST /api/v1/init
pub async fn init_account(
    State(state): State<Arc<AppState>>,
    WalletJson(request): WalletJson<InitAccountRequest>,
) -> ApiResult<Json<ApiResponse<TokenResponse>>> {
    let customer_xid = request.customer_xid.unwrap_or_default();
    let token = state.wallet.create_account(&customer_xid).await?;

    Ok(Json(ApiResponse::success(TokenResponse {
        token: token.0,
    })))
}
