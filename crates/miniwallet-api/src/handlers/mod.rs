//! API Handlers
//!
//! Request handlers for all API endpoints.

pub mod account;
pub mod health;
pub mod wallet;

pub use health::*;
