//! Ledger configuration

use serde::{Deserialize, Serialize};

/// Ledger behaviour switches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Replay a movement that reuses a `(wallet_id, reference_id)` pair
    /// instead of recording it again. Off by default: every call with a
    /// reference, repeated or not, records a new transaction.
    #[serde(default)]
    pub idempotent_references: bool,
}

impl LedgerConfig {
    /// Configuration with reference replay turned on
    pub fn idempotent() -> Self {
        Self {
            idempotent_references: true,
        }
    }
}
