//! Core wallet and transaction types

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque customer identifier (the `customer_xid` of the public API)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub String);

impl CustomerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wallet identifier, reissued on every transition into `Enabled`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletId(pub String);

impl WalletId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for WalletId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique transaction identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub String);

impl TransactionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wallet lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletStatus {
    /// Registered but never enabled
    Uninitialized,
    Enabled,
    Disabled,
}

impl WalletStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
        }
    }
}

/// A customer's wallet record
///
/// `status`, `wallet_id` and the transition timestamps are owned by the
/// lifecycle module; `balance` is owned by the ledger engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub owner: CustomerId,
    pub wallet_id: Option<WalletId>,
    pub status: WalletStatus,
    pub balance: Decimal,
    pub enabled_at: Option<DateTime<Utc>>,
    pub disabled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Wallet {
    /// Create a fresh, uninitialized wallet with zero balance
    pub fn new(owner: CustomerId) -> Self {
        Self {
            owner,
            wallet_id: None,
            status: WalletStatus::Uninitialized,
            balance: Decimal::ZERO,
            enabled_at: None,
            disabled_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.status == WalletStatus::Enabled
    }

    /// Point-in-time view of the wallet; `None` until it has been enabled once
    pub fn snapshot(&self) -> Option<WalletSnapshot> {
        let id = self.wallet_id.clone()?;
        let (enabled_at, disabled_at) = match self.status {
            WalletStatus::Enabled => (self.enabled_at, None),
            WalletStatus::Disabled => (None, self.disabled_at),
            WalletStatus::Uninitialized => (None, None),
        };
        Some(WalletSnapshot {
            id,
            owned_by: self.owner.clone(),
            status: self.status,
            enabled_at,
            disabled_at,
            balance: self.balance,
        })
    }
}

/// Wallet view returned by lifecycle and balance reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletSnapshot {
    pub id: WalletId,
    pub owned_by: CustomerId,
    pub status: WalletStatus,
    pub enabled_at: Option<DateTime<Utc>>,
    pub disabled_at: Option<DateTime<Utc>>,
    pub balance: Decimal,
}

/// Direction of a money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
        }
    }
}

/// Transaction outcome. Failed attempts are never recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Success,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
        }
    }
}

/// Immutable ledger record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub wallet_id: WalletId,
    /// Customer who performed the movement
    pub owner: CustomerId,
    pub kind: TransactionType,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub occurred_at: DateTime<Utc>,
    pub reference_id: String,
}

/// Deposit or withdrawal request as received at the boundary.
///
/// Fields stay optional so that "missing" and "malformed" are reported by the
/// engine in its documented precedence order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundsRequest {
    pub amount: Option<Decimal>,
    pub reference_id: Option<String>,
}

impl FundsRequest {
    pub fn new(amount: Decimal, reference_id: impl Into<String>) -> Self {
        Self {
            amount: Some(amount),
            reference_id: Some(reference_id.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_wallet_is_uninitialized() {
        let wallet = Wallet::new(CustomerId::new("c-1"));
        assert_eq!(wallet.status, WalletStatus::Uninitialized);
        assert_eq!(wallet.balance, Decimal::ZERO);
        assert!(wallet.wallet_id.is_none());
        assert!(wallet.snapshot().is_none());
    }

    #[test]
    fn test_wallet_ids_are_unique() {
        assert_ne!(WalletId::new(), WalletId::new());
        assert_ne!(TransactionId::new(), TransactionId::new());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&WalletStatus::Enabled).unwrap();
        assert_eq!(json, "\"enabled\"");
        let json = serde_json::to_string(&TransactionType::Withdrawal).unwrap();
        assert_eq!(json, "\"withdrawal\"");
    }
}
