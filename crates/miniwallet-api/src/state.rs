//! Application state shared across handlers

use std::sync::Arc;

use miniwallet_auth::{JwtConfig, JwtService};
use miniwallet_core::{InMemoryWalletRepository, LedgerConfig, WalletService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Wallet operations
    pub wallet: Arc<WalletService>,
}

impl AppState {
    /// Create a new application state
    pub fn new(wallet: Arc<WalletService>) -> Self {
        Self { wallet }
    }

    /// In-memory store with JWT identity tokens
    pub fn in_memory(jwt: JwtConfig, ledger: LedgerConfig) -> Self {
        let repo = Arc::new(InMemoryWalletRepository::new());
        let gateway = Arc::new(JwtService::new(jwt));
        Self::new(Arc::new(WalletService::new(repo, gateway, ledger)))
    }
}
