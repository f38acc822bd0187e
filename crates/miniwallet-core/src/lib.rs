//! MiniWallet Core - per-customer virtual wallet ledger
//!
//! The core is:
//! - Customer-keyed (exactly one wallet per customer)
//! - Lifecycle-gated (only enabled wallets read or move money)
//! - Append-only (transactions are never changed or removed)
//! - Serialized per wallet (one lock per customer, none shared across wallets)
//!
//! # Invariants
//!
//! 1. No negative balances
//! 2. Balance equals deposits minus withdrawals recorded for the wallet
//! 3. Failed movements never produce a transaction
//! 4. Transactions are read back in append order
//!
//! # Layout
//!
//! - [`registry`] - customer to wallet mapping
//! - [`lifecycle`] - enable/disable state machine
//! - [`engine`] - deposit and withdrawal rules
//! - [`history`] - read-only transaction log
//! - [`store`] - repository seam and in-memory implementation
//! - [`service`] - the operations callers use

pub mod config;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod history;
pub mod lifecycle;
pub mod locks;
pub mod registry;
pub mod service;
pub mod store;
pub mod types;

pub use config::LedgerConfig;
pub use error::{LedgerError, LedgerResult};
pub use gateway::{AuthGateway, GatewayError, IdentityToken};
pub use history::TransactionLedger;
pub use locks::WalletLocks;
pub use registry::AccountRegistry;
pub use service::WalletService;
pub use store::{InMemoryWalletRepository, WalletRepository};
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
