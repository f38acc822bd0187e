//! Error types for wallet and ledger operations
//!
//! Every failure is a local, recoverable condition. Nothing here is retried
//! internally; callers decide what to do with the structured error.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::gateway::GatewayError;

/// Result type for ledger operations
pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Errors surfaced by the wallet core
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    // ========================================================================
    // Input Errors
    // ========================================================================
    /// Malformed or missing input field
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    // ========================================================================
    // Registry Errors
    // ========================================================================
    /// Customer already has a wallet
    #[error("Customer {customer_id} already exists")]
    DuplicateAccount { customer_id: String },

    /// Customer is not registered
    #[error("Customer {customer_id} not found")]
    NotFound { customer_id: String },

    // ========================================================================
    // Lifecycle Errors
    // ========================================================================
    /// Operation requires an enabled wallet
    #[error("Wallet is disabled")]
    WalletDisabled,

    /// Enable attempted on an enabled wallet
    #[error("Wallet is already enabled")]
    AlreadyEnabled,

    /// Disable attempted on a wallet that is not enabled
    #[error("Wallet is already disabled")]
    AlreadyDisabled,

    // ========================================================================
    // Balance Errors
    // ========================================================================
    /// Withdrawal exceeds the current balance
    #[error("Insufficient balance: have {available}, need {requested}")]
    InsufficientBalance {
        available: Decimal,
        requested: Decimal,
    },

    // ========================================================================
    // Collaborator Errors
    // ========================================================================
    /// Backing store failure
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Identity token could not be issued
    #[error("Identity gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

impl LedgerError {
    /// Build a validation error for a named field
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Build a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Machine-readable kind, stable across message changes
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::DuplicateAccount { .. } => "DUPLICATE_ACCOUNT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::WalletDisabled => "WALLET_DISABLED",
            Self::AlreadyEnabled => "ALREADY_ENABLED",
            Self::AlreadyDisabled => "ALREADY_DISABLED",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::Storage { .. } => "STORAGE_ERROR",
            Self::Gateway(_) => "GATEWAY_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        let err = LedgerError::validation("amount", "Amount must be greater than 0");
        assert_eq!(err.to_string(), "Invalid amount: Amount must be greater than 0");
        assert_eq!(err.kind(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_kinds_are_distinct() {
        assert_eq!(LedgerError::WalletDisabled.kind(), "WALLET_DISABLED");
        assert_eq!(LedgerError::AlreadyEnabled.kind(), "ALREADY_ENABLED");
        assert_eq!(LedgerError::AlreadyDisabled.kind(), "ALREADY_DISABLED");
    }
}
