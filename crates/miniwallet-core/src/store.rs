//! Wallet repository
//!
//! The core talks to storage only through [`WalletRepository`]. Any store that
//! can create a key if absent and update a wallet together with its
//! transaction log atomically satisfies the contract.

use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::{LedgerError, LedgerResult};
use crate::types::{CustomerId, Transaction, Wallet, WalletId};

/// Keyed store from customer id to wallet plus its transaction sequence
#[async_trait]
pub trait WalletRepository: Send + Sync {
    /// Insert `wallet` under its owner unless the owner already has one.
    ///
    /// Returns `false` when a wallet was already registered.
    async fn create_if_absent(&self, wallet: Wallet) -> LedgerResult<bool>;

    /// Fetch the wallet registered for a customer
    async fn get(&self, customer_id: &CustomerId) -> LedgerResult<Option<Wallet>>;

    /// Replace an existing wallet record
    async fn put(&self, wallet: Wallet) -> LedgerResult<()>;

    /// Store the updated wallet and append `transaction` in one step
    async fn record_transaction(&self, wallet: Wallet, transaction: Transaction)
        -> LedgerResult<()>;

    /// All transactions of a customer's wallet, in append order
    async fn transactions(&self, customer_id: &CustomerId) -> LedgerResult<Vec<Transaction>>;

    /// Most recent transaction recorded under `(wallet_id, reference_id)`
    async fn find_by_reference(
        &self,
        customer_id: &CustomerId,
        wallet_id: &WalletId,
        reference_id: &str,
    ) -> LedgerResult<Option<Transaction>> {
        let transactions = self.transactions(customer_id).await?;
        Ok(transactions
            .into_iter()
            .rev()
            .find(|t| &t.wallet_id == wallet_id && t.reference_id == reference_id))
    }
}

#[derive(Debug, Clone)]
struct StoredWallet {
    wallet: Wallet,
    transactions: Vec<Transaction>,
    /// Position of the latest transaction per `(wallet_id, reference_id)`
    references: HashMap<(WalletId, String), usize>,
}

impl StoredWallet {
    fn new(wallet: Wallet) -> Self {
        Self {
            wallet,
            transactions: Vec::new(),
            references: HashMap::new(),
        }
    }

    fn append(&mut self, transaction: Transaction) {
        let key = (transaction.wallet_id.clone(), transaction.reference_id.clone());
        self.references.insert(key, self.transactions.len());
        self.transactions.push(transaction);
    }
}

/// In-memory repository backed by a sharded concurrent map
#[derive(Debug, Default)]
pub struct InMemoryWalletRepository {
    wallets: DashMap<CustomerId, StoredWallet>,
}

impl InMemoryWalletRepository {
    pub fn new() -> Self {
        Self {
            wallets: DashMap::new(),
        }
    }

    /// Number of registered wallets
    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }
}

fn missing(customer_id: &CustomerId) -> LedgerError {
    LedgerError::NotFound {
        customer_id: customer_id.0.clone(),
    }
}

#[async_trait]
impl WalletRepository for InMemoryWalletRepository {
    async fn create_if_absent(&self, wallet: Wallet) -> LedgerResult<bool> {
        match self.wallets.entry(wallet.owner.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(StoredWallet::new(wallet));
                Ok(true)
            }
        }
    }

    async fn get(&self, customer_id: &CustomerId) -> LedgerResult<Option<Wallet>> {
        Ok(self.wallets.get(customer_id).map(|s| s.wallet.clone()))
    }

    async fn put(&self, wallet: Wallet) -> LedgerResult<()> {
        let mut stored = self
            .wallets
            .get_mut(&wallet.owner)
            .ok_or_else(|| missing(&wallet.owner))?;
        stored.wallet = wallet;
        Ok(())
    }

    async fn record_transaction(
        &self,
        wallet: Wallet,
        transaction: Transaction,
    ) -> LedgerResult<()> {
        let mut stored = self
            .wallets
            .get_mut(&wallet.owner)
            .ok_or_else(|| missing(&wallet.owner))?;
        stored.wallet = wallet;
        stored.append(transaction);
        Ok(())
    }

    async fn transactions(&self, customer_id: &CustomerId) -> LedgerResult<Vec<Transaction>> {
        self.wallets
            .get(customer_id)
            .map(|s| s.transactions.clone())
            .ok_or_else(|| missing(customer_id))
    }

    async fn find_by_reference(
        &self,
        customer_id: &CustomerId,
        wallet_id: &WalletId,
        reference_id: &str,
    ) -> LedgerResult<Option<Transaction>> {
        let stored = self
            .wallets
            .get(customer_id)
            .ok_or_else(|| missing(customer_id))?;
        let key = (wallet_id.clone(), reference_id.to_string());
        Ok(stored
            .references
            .get(&key)
            .and_then(|&position| stored.transactions.get(position))
            .cloned())
    }
}
