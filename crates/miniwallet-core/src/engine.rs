//! Ledger engine: deposits and withdrawals
//!
//! # Invariants
//!
//! 1. No negative balances
//! 2. Only enabled wallets move money
//! 3. Every successful movement produces exactly one transaction
//! 4. Rejected movements leave the wallet untouched and record nothing
//!
//! Preconditions are checked in a fixed order and the first failure wins:
//! wallet enabled, reference present, amount present, amount not negative,
//! and for withdrawals, amount covered by the balance. An amount of zero is
//! accepted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};
use crate::lifecycle;
use crate::types::{
    FundsRequest, Transaction, TransactionId, TransactionStatus, TransactionType, Wallet,
};

const MISSING_FIELD: &str = "Missing data for required field";
const DEPOSIT_AMOUNT_INVALID: &str = "Amount must be greater than 0.";
const WITHDRAWAL_AMOUNT_INVALID: &str = "Amount must be greater than 0";

/// A request that passed input validation against a specific wallet
#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    pub kind: TransactionType,
    pub amount: Decimal,
    pub reference_id: String,
}

/// Check everything except the balance
pub fn validate(
    wallet: &Wallet,
    kind: TransactionType,
    request: &FundsRequest,
) -> LedgerResult<Movement> {
    lifecycle::ensure_enabled(wallet)?;

    let reference_id = match request.reference_id.as_deref() {
        Some(r) if !r.trim().is_empty() => r.to_string(),
        _ => return Err(LedgerError::validation("reference_id", MISSING_FIELD)),
    };

    let amount = match (kind, request.amount) {
        (TransactionType::Deposit, None) => {
            return Err(LedgerError::validation("amount", DEPOSIT_AMOUNT_INVALID))
        }
        (TransactionType::Withdrawal, None) => {
            return Err(LedgerError::validation("amount", MISSING_FIELD))
        }
        (_, Some(amount)) => amount,
    };

    if amount < Decimal::ZERO {
        let reason = match kind {
            TransactionType::Deposit => DEPOSIT_AMOUNT_INVALID,
            TransactionType::Withdrawal => WITHDRAWAL_AMOUNT_INVALID,
        };
        return Err(LedgerError::validation("amount", reason));
    }

    Ok(Movement {
        kind,
        amount,
        reference_id,
    })
}

/// Apply a validated movement to the wallet balance and build its record
pub fn apply(
    wallet: &mut Wallet,
    movement: Movement,
    now: DateTime<Utc>,
) -> LedgerResult<Transaction> {
    lifecycle::ensure_enabled(wallet)?;
    let wallet_id = wallet.wallet_id.clone().ok_or(LedgerError::WalletDisabled)?;

    let new_balance = match movement.kind {
        TransactionType::Deposit => wallet
            .balance
            .checked_add(movement.amount)
            .ok_or_else(|| LedgerError::validation("amount", "Amount overflows balance"))?,
        TransactionType::Withdrawal => {
            if movement.amount > wallet.balance {
                return Err(LedgerError::InsufficientBalance {
                    available: wallet.balance,
                    requested: movement.amount,
                });
            }
            wallet.balance - movement.amount
        }
    };

    wallet.balance = new_balance;

    Ok(Transaction {
        id: TransactionId::new(),
        wallet_id,
        owner: wallet.owner.clone(),
        kind: movement.kind,
        amount: movement.amount,
        status: TransactionStatus::Success,
        occurred_at: now,
        reference_id: movement.reference_id,
    })
}

/// Credit the wallet
pub fn deposit(
    wallet: &mut Wallet,
    request: &FundsRequest,
    now: DateTime<Utc>,
) -> LedgerResult<Transaction> {
    let movement = validate(wallet, TransactionType::Deposit, request)?;
    apply(wallet, movement, now)
}

/// Debit the wallet; never takes the balance below zero
pub fn withdraw(
    wallet: &mut Wallet,
    request: &FundsRequest,
    now: DateTime<Utc>,
) -> LedgerResult<Transaction> {
    let movement = validate(wallet, TransactionType::Withdrawal, request)?;
    apply(wallet, movement, now)
}
