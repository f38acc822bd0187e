//! Wallet service: the operations exposed to callers
//!
//! Every operation resolves the customer through the registry, takes the
//! customer's wallet lock, checks lifecycle preconditions and only then
//! touches balance or history. Token issuance and verification never run
//! while a wallet lock is held.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::OwnedMutexGuard;
use tracing::{info, warn};

use crate::config::LedgerConfig;
use crate::engine;
use crate::error::{LedgerError, LedgerResult};
use crate::gateway::{AuthGateway, GatewayError, IdentityToken};
use crate::history::TransactionLedger;
use crate::lifecycle;
use crate::locks::WalletLocks;
use crate::registry::AccountRegistry;
use crate::store::WalletRepository;
use crate::types::{CustomerId, FundsRequest, Transaction, TransactionType, Wallet, WalletSnapshot};

/// Entry point for every wallet operation
pub struct WalletService {
    registry: AccountRegistry,
    history: TransactionLedger,
    repo: Arc<dyn WalletRepository>,
    gateway: Arc<dyn AuthGateway>,
    locks: WalletLocks,
    config: LedgerConfig,
}

impl WalletService {
    pub fn new(
        repo: Arc<dyn WalletRepository>,
        gateway: Arc<dyn AuthGateway>,
        config: LedgerConfig,
    ) -> Self {
        Self {
            registry: AccountRegistry::new(repo.clone()),
            history: TransactionLedger::new(repo.clone()),
            repo,
            gateway,
            locks: WalletLocks::new(),
            config,
        }
    }

    /// Resolve a token to the customer it identifies
    pub fn authenticate(&self, token: &str) -> Result<CustomerId, GatewayError> {
        self.gateway.verify_token(token)
    }

    /// Register a customer and hand back their identity token
    pub async fn create_account(&self, customer_id: &str) -> LedgerResult<IdentityToken> {
        let result = async {
            let customer_id = AccountRegistry::validate_customer_id(customer_id)?;
            let token = self.gateway.issue_token(&customer_id)?;
            self.registry.register(&customer_id).await?;
            info!(customer_id = %customer_id, "Account created");
            Ok::<_, LedgerError>(token)
        }
        .await;
        observe("create_account", customer_id, result)
    }

    /// Enable (or re-enable) the customer's wallet
    pub async fn enable_wallet(&self, customer_id: &CustomerId) -> LedgerResult<WalletSnapshot> {
        let result = async {
            let (_guard, mut wallet) = self.lock_wallet(customer_id).await?;
            let snapshot = lifecycle::enable(&mut wallet, Utc::now())?;
            self.repo.put(wallet).await?;
            info!(customer_id = %customer_id, wallet_id = %snapshot.id, "Wallet enabled");
            Ok::<_, LedgerError>(snapshot)
        }
        .await;
        observe("enable_wallet", customer_id.as_str(), result)
    }

    /// Disable the customer's wallet
    pub async fn disable_wallet(&self, customer_id: &CustomerId) -> LedgerResult<WalletSnapshot> {
        let result = async {
            let (_guard, mut wallet) = self.lock_wallet(customer_id).await?;
            let snapshot = lifecycle::disable(&mut wallet, Utc::now())?;
            self.repo.put(wallet).await?;
            info!(customer_id = %customer_id, wallet_id = %snapshot.id, "Wallet disabled");
            Ok::<_, LedgerError>(snapshot)
        }
        .await;
        observe("disable_wallet", customer_id.as_str(), result)
    }

    /// Current balance and status of an enabled wallet
    pub async fn get_wallet(&self, customer_id: &CustomerId) -> LedgerResult<WalletSnapshot> {
        let result = async {
            let (_guard, wallet) = self.lock_wallet(customer_id).await?;
            lifecycle::view(&wallet)
        }
        .await;
        observe("get_wallet", customer_id.as_str(), result)
    }

    /// Add funds to an enabled wallet
    pub async fn deposit(
        &self,
        customer_id: &CustomerId,
        request: FundsRequest,
    ) -> LedgerResult<Transaction> {
        let result = self
            .move_funds(customer_id, TransactionType::Deposit, request)
            .await;
        observe("deposit", customer_id.as_str(), result)
    }

    /// Take funds out of an enabled wallet
    pub async fn withdraw(
        &self,
        customer_id: &CustomerId,
        request: FundsRequest,
    ) -> LedgerResult<Transaction> {
        let result = self
            .move_funds(customer_id, TransactionType::Withdrawal, request)
            .await;
        observe("withdraw", customer_id.as_str(), result)
    }

    /// Every transaction of an enabled wallet, oldest first
    pub async fn list_transactions(
        &self,
        customer_id: &CustomerId,
    ) -> LedgerResult<Vec<Transaction>> {
        let result = async {
            let (_guard, wallet) = self.lock_wallet(customer_id).await?;
            self.history.list(&wallet).await
        }
        .await;
        observe("list_transactions", customer_id.as_str(), result)
    }

    async fn move_funds(
        &self,
        customer_id: &CustomerId,
        kind: TransactionType,
        request: FundsRequest,
    ) -> LedgerResult<Transaction> {
        let (_guard, mut wallet) = self.lock_wallet(customer_id).await?;
        let movement = engine::validate(&wallet, kind, &request)?;

        if self.config.idempotent_references {
            if let Some(previous) = self.replay(&wallet, &movement.reference_id, kind).await? {
                info!(
                    customer_id = %customer_id,
                    transaction_id = %previous.id,
                    reference_id = %previous.reference_id,
                    "Replayed movement for known reference"
                );
                return Ok(previous);
            }
        }

        let transaction = engine::apply(&mut wallet, movement, Utc::now())?;
        let balance = wallet.balance;
        self.repo
            .record_transaction(wallet, transaction.clone())
            .await?;

        metrics::counter!(
            "miniwallet_movements_total",
            "type" => transaction.kind.as_str()
        )
        .increment(1);
        info!(
            customer_id = %customer_id,
            transaction_id = %transaction.id,
            kind = transaction.kind.as_str(),
            amount = %transaction.amount,
            balance = %balance,
            "Funds moved"
        );

        Ok(transaction)
    }

    async fn replay(
        &self,
        wallet: &Wallet,
        reference_id: &str,
        kind: TransactionType,
    ) -> LedgerResult<Option<Transaction>> {
        let Some(wallet_id) = wallet.wallet_id.as_ref() else {
            return Ok(None);
        };
        match self
            .repo
            .find_by_reference(&wallet.owner, wallet_id, reference_id)
            .await?
        {
            Some(previous) if previous.kind == kind => Ok(Some(previous)),
            Some(_) => Err(LedgerError::validation(
                "reference_id",
                "Reference already used",
            )),
            None => Ok(None),
        }
    }

    /// Resolve, lock, then re-read the wallet under the lock.
    ///
    /// Unknown customers are rejected before a lock entry is created for them.
    async fn lock_wallet(
        &self,
        customer_id: &CustomerId,
    ) -> LedgerResult<(OwnedMutexGuard<()>, Wallet)> {
        self.registry.resolve(customer_id).await?;
        let guard = self.locks.acquire(customer_id).await;
        let wallet = self.registry.resolve(customer_id).await?;
        Ok((guard, wallet))
    }
}

fn observe<T>(operation: &'static str, customer_id: &str, result: LedgerResult<T>) -> LedgerResult<T> {
    if let Err(err) = &result {
        metrics::counter!(
            "miniwallet_rejections_total",
            "operation" => operation,
            "kind" => err.kind()
        )
        .increment(1);
        warn!(operation, customer_id, error = %err, "Wallet operation rejected");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryWalletRepository;
    use crate::types::WalletStatus;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    /// Gateway whose token is the customer id itself
    struct EchoGateway;

    impl AuthGateway for EchoGateway {
        fn issue_token(&self, customer_id: &CustomerId) -> Result<IdentityToken, GatewayError> {
            Ok(IdentityToken(format!("token-{}", customer_id)))
        }

        fn verify_token(&self, token: &str) -> Result<CustomerId, GatewayError> {
            token
                .strip_prefix("token-")
                .map(CustomerId::new)
                .ok_or(GatewayError::InvalidToken)
        }
    }

    fn service_with(config: LedgerConfig) -> WalletService {
        WalletService::new(
            Arc::new(InMemoryWalletRepository::new()),
            Arc::new(EchoGateway),
            config,
        )
    }

    fn service() -> WalletService {
        service_with(LedgerConfig::default())
    }

    async fn enabled_customer(service: &WalletService, id: &str) -> CustomerId {
        service.create_account(id).await.unwrap();
        let customer = CustomerId::new(id);
        service.enable_wallet(&customer).await.unwrap();
        customer
    }

    fn net_of(transactions: &[Transaction]) -> Decimal {
        transactions.iter().fold(Decimal::ZERO, |acc, t| match t.kind {
            TransactionType::Deposit => acc + t.amount,
            TransactionType::Withdrawal => acc - t.amount,
        })
    }

    #[tokio::test]
    async fn test_create_account_issues_token() {
        let service = service();
        let token = service.create_account("alice").await.unwrap();
        assert_eq!(
            service.authenticate(token.as_str()).unwrap(),
            CustomerId::new("alice")
        );
    }

    #[tokio::test]
    async fn test_create_account_rejects_blank_and_duplicate() {
        let service = service();
        assert!(matches!(
            service.create_account("  ").await,
            Err(LedgerError::Validation { .. })
        ));

        assert!(service.create_account("alice").await.is_ok());
        assert!(matches!(
            service.create_account("alice").await,
            Err(LedgerError::DuplicateAccount { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_customer_is_not_found() {
        let service = service();
        let ghost = CustomerId::new("ghost");
        assert!(matches!(
            service.enable_wallet(&ghost).await,
            Err(LedgerError::NotFound { .. })
        ));
        assert!(matches!(
            service.deposit(&ghost, FundsRequest::new(dec!(1), "r")).await,
            Err(LedgerError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_enable_then_enable_again() {
        let service = service();
        service.create_account("alice").await.unwrap();
        let alice = CustomerId::new("alice");

        let snapshot = service.enable_wallet(&alice).await.unwrap();
        assert_eq!(snapshot.status, WalletStatus::Enabled);
        assert_eq!(snapshot.balance, Decimal::ZERO);

        assert!(matches!(
            service.enable_wallet(&alice).await,
            Err(LedgerError::AlreadyEnabled)
        ));
    }

    #[tokio::test]
    async fn test_uninitialized_wallet_rejects_balance_operations() {
        let service = service();
        service.create_account("alice").await.unwrap();
        let alice = CustomerId::new("alice");

        assert!(matches!(
            service.get_wallet(&alice).await,
            Err(LedgerError::WalletDisabled)
        ));
        assert!(matches!(
            service.list_transactions(&alice).await,
            Err(LedgerError::WalletDisabled)
        ));
        assert!(matches!(
            service.disable_wallet(&alice).await,
            Err(LedgerError::AlreadyDisabled)
        ));
    }

    #[tokio::test]
    async fn test_deposit_and_withdraw_flow() {
        let service = service();
        let alice = enabled_customer(&service, "alice").await;

        let deposit = service
            .deposit(&alice, FundsRequest::new(dec!(100), "r1"))
            .await
            .unwrap();
        assert_eq!(deposit.kind, TransactionType::Deposit);
        assert_eq!(deposit.amount, dec!(100));
        assert_eq!(service.get_wallet(&alice).await.unwrap().balance, dec!(100));

        let rejected = service
            .withdraw(&alice, FundsRequest::new(dec!(150), "w1"))
            .await;
        assert!(matches!(rejected, Err(LedgerError::InsufficientBalance { .. })));
        assert_eq!(service.get_wallet(&alice).await.unwrap().balance, dec!(100));

        service
            .withdraw(&alice, FundsRequest::new(dec!(40), "w2"))
            .await
            .unwrap();

        let transactions = service.list_transactions(&alice).await.unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].reference_id, "r1");
        assert_eq!(transactions[1].reference_id, "w2");
        assert_eq!(net_of(&transactions), dec!(60));
        assert_eq!(service.get_wallet(&alice).await.unwrap().balance, dec!(60));
    }

    #[tokio::test]
    async fn test_duplicate_reference_double_counts_by_default() {
        let service = service();
        let alice = enabled_customer(&service, "alice").await;

        let first = service
            .deposit(&alice, FundsRequest::new(dec!(50), "same-ref"))
            .await
            .unwrap();
        let second = service
            .deposit(&alice, FundsRequest::new(dec!(50), "same-ref"))
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(service.list_transactions(&alice).await.unwrap().len(), 2);
        assert_eq!(service.get_wallet(&alice).await.unwrap().balance, dec!(100));
    }

    #[tokio::test]
    async fn test_idempotent_references_replay() {
        let service = service_with(LedgerConfig::idempotent());
        let alice = enabled_customer(&service, "alice").await;

        let first = service
            .deposit(&alice, FundsRequest::new(dec!(50), "same-ref"))
            .await
            .unwrap();
        let replay = service
            .deposit(&alice, FundsRequest::new(dec!(50), "same-ref"))
            .await
            .unwrap();

        assert_eq!(first.id, replay.id);
        assert_eq!(service.list_transactions(&alice).await.unwrap().len(), 1);
        assert_eq!(service.get_wallet(&alice).await.unwrap().balance, dec!(50));

        let conflict = service
            .withdraw(&alice, FundsRequest::new(dec!(10), "same-ref"))
            .await;
        assert!(matches!(conflict, Err(LedgerError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_idempotency_is_scoped_to_current_wallet_id() {
        let service = service_with(LedgerConfig::idempotent());
        let alice = enabled_customer(&service, "alice").await;

        service
            .deposit(&alice, FundsRequest::new(dec!(5), "r1"))
            .await
            .unwrap();
        service.disable_wallet(&alice).await.unwrap();
        service.enable_wallet(&alice).await.unwrap();
        service
            .deposit(&alice, FundsRequest::new(dec!(5), "r1"))
            .await
            .unwrap();

        assert_eq!(service.get_wallet(&alice).await.unwrap().balance, dec!(10));
    }

    #[tokio::test]
    async fn test_disable_hides_history_without_losing_it() {
        let service = service();
        let alice = enabled_customer(&service, "alice").await;
        service
            .deposit(&alice, FundsRequest::new(dec!(25), "r1"))
            .await
            .unwrap();

        let disabled = service.disable_wallet(&alice).await.unwrap();
        assert_eq!(disabled.status, WalletStatus::Disabled);
        assert_eq!(disabled.balance, dec!(25));

        assert!(matches!(
            service.list_transactions(&alice).await,
            Err(LedgerError::WalletDisabled)
        ));
        assert!(matches!(
            service.get_wallet(&alice).await,
            Err(LedgerError::WalletDisabled)
        ));
        assert!(matches!(
            service.deposit(&alice, FundsRequest::new(dec!(1), "r2")).await,
            Err(LedgerError::WalletDisabled)
        ));

        let re_enabled = service.enable_wallet(&alice).await.unwrap();
        assert_ne!(re_enabled.id, disabled.id);
        assert_eq!(re_enabled.balance, dec!(25));
        assert_eq!(service.list_transactions(&alice).await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_deposits_are_not_lost() {
        let service = Arc::new(service());
        let alice = enabled_customer(&service, "alice").await;
        service
            .deposit(&alice, FundsRequest::new(dec!(10), "seed"))
            .await
            .unwrap();

        let handles: Vec<_> = (0..64)
            .map(|i| {
                let service = service.clone();
                let alice = alice.clone();
                tokio::spawn(async move {
                    service
                        .deposit(&alice, FundsRequest::new(dec!(2.5), format!("c-{}", i)))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let wallet = service.get_wallet(&alice).await.unwrap();
        assert_eq!(wallet.balance, dec!(10) + dec!(2.5) * Decimal::from(64));
        let transactions = service.list_transactions(&alice).await.unwrap();
        assert_eq!(transactions.len(), 65);
        assert_eq!(net_of(&transactions), wallet.balance);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_withdrawals_never_overdraw() {
        let service = Arc::new(service());
        let alice = enabled_customer(&service, "alice").await;
        service
            .deposit(&alice, FundsRequest::new(dec!(100), "seed"))
            .await
            .unwrap();

        let handles: Vec<_> = (0..30)
            .map(|i| {
                let service = service.clone();
                let alice = alice.clone();
                tokio::spawn(async move {
                    service
                        .withdraw(&alice, FundsRequest::new(dec!(7), format!("w-{}", i)))
                        .await
                })
            })
            .collect();

        let mut succeeded = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => succeeded += 1,
                Err(LedgerError::InsufficientBalance { .. }) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        // 100 / 7 = 14 withdrawals fit
        assert_eq!(succeeded, 14);
        let wallet = service.get_wallet(&alice).await.unwrap();
        assert_eq!(wallet.balance, dec!(2));
        assert!(wallet.balance >= Decimal::ZERO);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registration_admits_one() {
        let service = Arc::new(service());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.create_account("racer").await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
    }
}
