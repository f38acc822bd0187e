//! Wallet DTOs

use chrono::{DateTime, Utc};
use miniwallet_core::{FundsRequest, Transaction, WalletSnapshot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Requests
// =============================================================================

/// Deposit or withdrawal body
///
/// Both fields stay optional here so the core reports what is missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FundsBody {
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub reference_id: Option<String>,
}

impl From<FundsBody> for FundsRequest {
    fn from(body: FundsBody) -> Self {
        FundsRequest {
            amount: body.amount,
            reference_id: body.reference_id,
        }
    }
}

// =============================================================================
// Wallet
// =============================================================================

/// `{"wallet": {...}}`
#[derive(Debug, Clone, Serialize)]
pub struct WalletResponse {
    pub wallet: WalletView,
}

#[derive(Debug, Clone, Serialize)]
pub struct WalletView {
    pub id: String,
    pub owned_by: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled_at: Option<DateTime<Utc>>,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl From<WalletSnapshot> for WalletResponse {
    fn from(snapshot: WalletSnapshot) -> Self {
        Self {
            wallet: WalletView {
                id: snapshot.id.to_string(),
                owned_by: snapshot.owned_by.to_string(),
                status: snapshot.status.as_str().to_string(),
                enabled_at: snapshot.enabled_at,
                disabled_at: snapshot.disabled_at,
                balance: snapshot.balance,
            },
        }
    }
}

// =============================================================================
// Movements
// =============================================================================

/// `{"deposit": {...}}`
#[derive(Debug, Clone, Serialize)]
pub struct DepositResponse {
    pub deposit: DepositView,
}

#[derive(Debug, Clone, Serialize)]
pub struct DepositView {
    pub id: String,
    pub deposited_by: String,
    pub status: String,
    pub deposited_at: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub reference_id: String,
}

impl From<Transaction> for DepositResponse {
    fn from(tx: Transaction) -> Self {
        Self {
            deposit: DepositView {
                id: tx.id.to_string(),
                deposited_by: tx.owner.to_string(),
                status: status_of(&tx),
                deposited_at: tx.occurred_at,
                amount: tx.amount,
                reference_id: tx.reference_id,
            },
        }
    }
}

/// `{"withdrawal": {...}}`
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawalResponse {
    pub withdrawal: WithdrawalView,
}

#[derive(Debug, Clone, Serialize)]
pub struct WithdrawalView {
    pub id: String,
    pub withdrawn_by: String,
    pub status: String,
    pub withdrawn_at: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub reference_id: String,
}

impl From<Transaction> for WithdrawalResponse {
    fn from(tx: Transaction) -> Self {
        Self {
            withdrawal: WithdrawalView {
                id: tx.id.to_string(),
                withdrawn_by: tx.owner.to_string(),
                status: status_of(&tx),
                withdrawn_at: tx.occurred_at,
                amount: tx.amount,
                reference_id: tx.reference_id,
            },
        }
    }
}

// =============================================================================
// History
// =============================================================================

/// `{"transactions": [...]}`
#[derive(Debug, Clone, Serialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<TransactionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionView {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub status: String,
    pub transacted_at: DateTime<Utc>,
    pub reference_id: String,
}

impl From<Transaction> for TransactionView {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id.to_string(),
            kind: tx.kind.as_str().to_string(),
            amount: tx.amount,
            status: status_of(&tx),
            transacted_at: tx.occurred_at,
            reference_id: tx.reference_id,
        }
    }
}

impl From<Vec<Transaction>> for TransactionsResponse {
    fn from(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions: transactions.into_iter().map(TransactionView::from).collect(),
        }
    }
}

fn status_of(tx: &Transaction) -> String {
    tx.status.as_str().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use miniwallet_core::{
        CustomerId, TransactionId, TransactionStatus, TransactionType, WalletId, WalletStatus,
    };
    use serde_json::json;

    fn sample(kind: TransactionType) -> Transaction {
        Transaction {
            id: TransactionId("tx-1".to_string()),
            wallet_id: WalletId("w-1".to_string()),
            owner: CustomerId::new("cust"),
            kind,
            amount: Decimal::new(1050, 1),
            status: TransactionStatus::Success,
            occurred_at: Utc::now(),
            reference_id: "ref-1".to_string(),
        }
    }

    #[test]
    fn test_funds_body_accepts_numbers_and_missing_fields() {
        let body: FundsBody = serde_json::from_value(json!({"amount": 10.5})).unwrap();
        assert_eq!(body.amount, Some(Decimal::new(105, 1)));
        assert!(body.reference_id.is_none());

        let body: FundsBody = serde_json::from_value(json!({"amount": "7", "reference_id": "r"})).unwrap();
        assert_eq!(body.amount, Some(Decimal::new(7, 0)));
    }

    #[test]
    fn test_enabled_wallet_view_omits_disabled_at() {
        let snapshot = WalletSnapshot {
            id: WalletId("w-1".to_string()),
            owned_by: CustomerId::new("cust"),
            status: WalletStatus::Enabled,
            enabled_at: Some(Utc::now()),
            disabled_at: None,
            balance: Decimal::new(100, 0),
        };
        let value = serde_json::to_value(WalletResponse::from(snapshot)).unwrap();
        let wallet = &value["wallet"];
        assert_eq!(wallet["status"], "enabled");
        assert_eq!(wallet["balance"], json!(100.0));
        assert!(wallet.get("enabled_at").is_some());
        assert!(wallet.get("disabled_at").is_none());
    }

    #[test]
    fn test_movement_views() {
        let value = serde_json::to_value(DepositResponse::from(sample(TransactionType::Deposit))).unwrap();
        assert_eq!(value["deposit"]["deposited_by"], "cust");
        assert_eq!(value["deposit"]["amount"], json!(105.0));

        let value =
            serde_json::to_value(WithdrawalResponse::from(sample(TransactionType::Withdrawal))).unwrap();
        assert_eq!(value["withdrawal"]["withdrawn_by"], "cust");
        assert_eq!(value["withdrawal"]["status"], "success");

        let value = serde_json::to_value(TransactionView::from(sample(TransactionType::Withdrawal))).unwrap();
        assert_eq!(value["type"], "withdrawal");
        assert_eq!(value["reference_id"], "ref-1");
    }
}
