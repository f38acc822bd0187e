//! Per-wallet mutual exclusion

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::types::CustomerId;

/// One async mutex per customer.
///
/// Operations on the same wallet queue behind each other; different wallets
/// never share a lock.
#[derive(Debug, Default)]
pub struct WalletLocks {
    locks: DashMap<CustomerId, Arc<Mutex<()>>>,
}

impl WalletLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Wait for exclusive access to a customer's wallet
    pub async fn acquire(&self, customer_id: &CustomerId) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the shard guard is released before awaiting.
        let lock = self
            .locks
            .entry(customer_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}
