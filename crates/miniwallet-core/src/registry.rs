//! Account registry: one wallet per customer

use std::sync::Arc;

use crate::error::{LedgerError, LedgerResult};
use crate::store::WalletRepository;
use crate::types::{CustomerId, Wallet};

const MISSING_FIELD: &str = "Missing data for required field";

/// Maps customer ids to their single wallet record
#[derive(Clone)]
pub struct AccountRegistry {
    repo: Arc<dyn WalletRepository>,
}

impl AccountRegistry {
    pub fn new(repo: Arc<dyn WalletRepository>) -> Self {
        Self { repo }
    }

    /// Reject empty and whitespace-only customer ids
    pub fn validate_customer_id(raw: &str) -> LedgerResult<CustomerId> {
        if raw.trim().is_empty() {
            return Err(LedgerError::validation("customer_xid", MISSING_FIELD));
        }
        Ok(CustomerId::new(raw))
    }

    /// Register an uninitialized, zero-balance wallet for `customer_id`.
    ///
    /// Fails with `DuplicateAccount` if the customer already has a wallet in
    /// any state.
    pub async fn register(&self, customer_id: &CustomerId) -> LedgerResult<Wallet> {
        let wallet = Wallet::new(customer_id.clone());
        if !self.repo.create_if_absent(wallet.clone()).await? {
            return Err(LedgerError::DuplicateAccount {
                customer_id: customer_id.0.clone(),
            });
        }
        Ok(wallet)
    }

    /// Look up the wallet registered for `customer_id`
    pub async fn resolve(&self, customer_id: &CustomerId) -> LedgerResult<Wallet> {
        self.repo
            .get(customer_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound {
                customer_id: customer_id.0.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryWalletRepository;
    use crate::types::WalletStatus;
    use rust_decimal::Decimal;

    fn registry() -> AccountRegistry {
        AccountRegistry::new(Arc::new(InMemoryWalletRepository::new()))
    }

    #[test]
    fn test_blank_customer_ids_rejected() {
        for raw in ["", "   ", "\t\n"] {
            let err = AccountRegistry::validate_customer_id(raw).unwrap_err();
            assert!(matches!(
                err,
                LedgerError::Validation { ref field, .. } if field == "customer_xid"
            ));
        }
        assert!(AccountRegistry::validate_customer_id("ea0212d3").is_ok());
    }

    #[tokio::test]
    async fn test_register_then_resolve() {
        let registry = registry();
        let id = CustomerId::new("ea0212d3-abd6-406f-8c67-868e814a2436");

        registry.register(&id).await.unwrap();
        let wallet = registry.resolve(&id).await.unwrap();

        assert_eq!(wallet.owner, id);
        assert_eq!(wallet.status, WalletStatus::Uninitialized);
        assert_eq!(wallet.balance, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_duplicate_registration() {
        let registry = registry();
        let id = CustomerId::new("dup");

        assert!(registry.register(&id).await.is_ok());
        assert!(matches!(
            registry.register(&id).await,
            Err(LedgerError::DuplicateAccount { .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_unknown_customer() {
        let registry = registry();
        let result = registry.resolve(&CustomerId::new("nobody")).await;
        assert!(matches!(result, Err(LedgerError::NotFound { .. })));
    }
}
