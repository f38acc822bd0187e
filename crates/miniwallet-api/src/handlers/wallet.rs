//! Wallet Handlers
//!
//! Lifecycle, balance, deposits, withdrawals and history for the
//! authenticated customer's wallet.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::dto::{
    ApiResponse, DepositResponse, FundsBody, TransactionsResponse, WalletResponse,
    WithdrawalResponse,
};
use crate::error::ApiResult;
use crate::extractors::{CurrentCustomer, WalletJson};
use crate::state::AppState;

/// Enable wallet
///
/// POST /api/v1/wallet
pub async fn enable_wallet(
    State(state): State<Arc<AppState>>,
    CurrentCustomer(customer): CurrentCustomer,
) -> ApiResult<Json<ApiResponse<WalletResponse>>> {
    let snapshot = state.wallet.enable_wallet(&customer).await?;
    Ok(Json(ApiResponse::success(snapshot.into())))
}

/// View wallet balance
///
/// GET /api/v1/wallet
pub async fn view_wallet(
    State(state): State<Arc<AppState>>,
    CurrentCustomer(customer): CurrentCustomer,
) -> ApiResult<Json<ApiResponse<WalletResponse>>> {
    let snapshot = state.wallet.get_wallet(&customer).await?;
    Ok(Json(ApiResponse::success(snapshot.into())))
}

/// Disable wallet
///
/// PATCH /api/v1/wallet
pub async fn disable_wallet(
    State(state): State<Arc<AppState>>,
    CurrentCustomer(customer): CurrentCustomer,
) -> ApiResult<Json<ApiResponse<WalletResponse>>> {
    let snapshot = state.wallet.disable_wallet(&customer).await?;
    Ok(Json(ApiResponse::success(snapshot.into())))
}

/// Add virtual money
///
/// POST /api/v1/wallet/deposits
pub async fn deposit(
    State(state): State<Arc<AppState>>,
    CurrentCustomer(customer): CurrentCustomer,
    WalletJson(body): WalletJson<FundsBody>,
) -> ApiResult<Json<ApiResponse<DepositResponse>>> {
    let tx = state.wallet.deposit(&customer, body.into()).await?;
    Ok(Json(ApiResponse::success(tx.into())))
}

/// Use virtual money
///
/// POST /api/v1/wallet/withdrawals
pub async fn withdraw(
    State(state): State<Arc<AppState>>,
    CurrentCustomer(customer): CurrentCustomer,
    WalletJson(body): WalletJson<FundsBody>,
) -> ApiResult<Json<ApiResponse<WithdrawalResponse>>> {
    let tx = state.wallet.withdraw(&customer, body.into()).await?;
    Ok(Json(ApiResponse::success(tx.into())))
}

/// View wallet transactions
///
/// GET /api/v1/wallet/transactions
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    CurrentCustomer(customer): CurrentCustomer,
) -> ApiResult<Json<ApiResponse<TransactionsResponse>>> {
    let transactions = state.wallet.list_transactions(&customer).await?;
    Ok(Json(ApiResponse::success(transactions.into())))
}
