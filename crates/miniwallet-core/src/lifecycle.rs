//! Wallet lifecycle state machine
//!
//! ```text
//! Uninitialized ──enable──▶ Enabled ──disable──▶ Disabled
//!                              ▲                    │
//!                              └──────enable────────┘
//! ```
//!
//! Every transition into `Enabled` issues a fresh wallet id. Disabling keeps
//! the current id. There is no terminal state.

use chrono::{DateTime, Utc};

use crate::error::{LedgerError, LedgerResult};
use crate::types::{Wallet, WalletId, WalletSnapshot, WalletStatus};

/// Enable a wallet that is uninitialized or disabled
pub fn enable(wallet: &mut Wallet, now: DateTime<Utc>) -> LedgerResult<WalletSnapshot> {
    if wallet.status == WalletStatus::Enabled {
        return Err(LedgerError::AlreadyEnabled);
    }

    let id = WalletId::new();
    wallet.wallet_id = Some(id.clone());
    wallet.status = WalletStatus::Enabled;
    wallet.enabled_at = Some(now);

    Ok(WalletSnapshot {
        id,
        owned_by: wallet.owner.clone(),
        status: WalletStatus::Enabled,
        enabled_at: Some(now),
        disabled_at: None,
        balance: wallet.balance,
    })
}

/// Disable an enabled wallet
pub fn disable(wallet: &mut Wallet, now: DateTime<Utc>) -> LedgerResult<WalletSnapshot> {
    if wallet.status != WalletStatus::Enabled {
        return Err(LedgerError::AlreadyDisabled);
    }
    // An enabled wallet always carries an id.
    let id = wallet.wallet_id.clone().ok_or(LedgerError::AlreadyDisabled)?;

    wallet.status = WalletStatus::Disabled;
    wallet.disabled_at = Some(now);

    Ok(WalletSnapshot {
        id,
        owned_by: wallet.owner.clone(),
        status: WalletStatus::Disabled,
        enabled_at: None,
        disabled_at: Some(now),
        balance: wallet.balance,
    })
}

/// Gate for every balance or history read and every money movement
pub fn ensure_enabled(wallet: &Wallet) -> LedgerResult<()> {
    if wallet.is_enabled() {
        Ok(())
    } else {
        Err(LedgerError::WalletDisabled)
    }
}

/// Snapshot of an enabled wallet
pub fn view(wallet: &Wallet) -> LedgerResult<WalletSnapshot> {
    ensure_enabled(wallet)?;
    wallet.snapshot().ok_or(LedgerError::WalletDisabled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CustomerId;

    fn wallet() -> Wallet {
        Wallet::new(CustomerId::new("alice"))
    }

    #[test]
    fn test_enable_fresh_wallet() {
        let mut wallet = wallet();
        let now = Utc::now();

        let snapshot = enable(&mut wallet, now).unwrap();

        assert_eq!(snapshot.status, WalletStatus::Enabled);
        assert_eq!(snapshot.enabled_at, Some(now));
        assert_eq!(wallet.wallet_id.as_ref(), Some(&snapshot.id));
        assert_eq!(wallet.status, WalletStatus::Enabled);
    }

    #[test]
    fn test_enable_twice_fails() {
        let mut wallet = wallet();
        enable(&mut wallet, Utc::now()).unwrap();
        assert!(matches!(
            enable(&mut wallet, Utc::now()),
            Err(LedgerError::AlreadyEnabled)
        ));
    }

    #[test]
    fn test_disable_requires_enabled() {
        let mut wallet = wallet();
        assert!(matches!(
            disable(&mut wallet, Utc::now()),
            Err(LedgerError::AlreadyDisabled)
        ));

        enable(&mut wallet, Utc::now()).unwrap();
        disable(&mut wallet, Utc::now()).unwrap();
        assert!(matches!(
            disable(&mut wallet, Utc::now()),
            Err(LedgerError::AlreadyDisabled)
        ));
    }

    #[test]
    fn test_disable_keeps_wallet_id() {
        let mut wallet = wallet();
        let enabled = enable(&mut wallet, Utc::now()).unwrap();
        let disabled = disable(&mut wallet, Utc::now()).unwrap();

        assert_eq!(enabled.id, disabled.id);
        assert_eq!(disabled.status, WalletStatus::Disabled);
        assert!(disabled.disabled_at.is_some());
        assert!(disabled.enabled_at.is_none());
    }

    #[test]
    fn test_re_enable_issues_new_wallet_id() {
        let mut wallet = wallet();
        let first = enable(&mut wallet, Utc::now()).unwrap();
        disable(&mut wallet, Utc::now()).unwrap();
        let second = enable(&mut wallet, Utc::now()).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(second.status, WalletStatus::Enabled);
    }

    #[test]
    fn test_ensure_enabled_covers_uninitialized_and_disabled() {
        let mut wallet = wallet();
        assert!(matches!(ensure_enabled(&wallet), Err(LedgerError::WalletDisabled)));

        enable(&mut wallet, Utc::now()).unwrap();
        assert!(ensure_enabled(&wallet).is_ok());
        assert!(view(&wallet).is_ok());

        disable(&mut wallet, Utc::now()).unwrap();
        assert!(matches!(ensure_enabled(&wallet), Err(LedgerError::WalletDisabled)));
        assert!(matches!(view(&wallet), Err(LedgerError::WalletDisabled)));
    }
}
