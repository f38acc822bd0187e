//! Read-only view over a wallet's transaction log

use std::sync::Arc;

use crate::error::LedgerResult;
use crate::lifecycle;
use crate::store::WalletRepository;
use crate::types::{Transaction, Wallet};

/// Append-ordered transaction history per wallet.
///
/// Records are only ever appended by the ledger engine; this type exposes no
/// way to add, change or remove them.
#[derive(Clone)]
pub struct TransactionLedger {
    repo: Arc<dyn WalletRepository>,
}

impl TransactionLedger {
    pub fn new(repo: Arc<dyn WalletRepository>) -> Self {
        Self { repo }
    }

    /// Full history of an enabled wallet, oldest first.
    ///
    /// Each call is a fresh read. History from before a disable/re-enable
    /// cycle is included.
    pub async fn list(&self, wallet: &Wallet) -> LedgerResult<Vec<Transaction>> {
        lifecycle::ensure_enabled(wallet)?;
        self.repo.transactions(&wallet.owner).await
    }
}
