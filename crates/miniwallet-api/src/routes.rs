//! API Routes

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::state::AppState;

/// Create API v1 routes
pub fn api_v1_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Account (public)
        .route("/init", post(handlers::account::init_account))
        // Wallet (token required)
        .route(
            "/wallet",
            post(handlers::wallet::enable_wallet)
                .get(handlers::wallet::view_wallet)
                .patch(handlers::wallet::disable_wallet),
        )
        .route("/wallet/deposits", post(handlers::wallet::deposit))
        .route("/wallet/withdrawals", post(handlers::wallet::withdraw))
        .route("/wallet/transactions", get(handlers::wallet::list_transactions))
}
