//! Data Transfer Objects
//!
//! Request and response structures for the API.

pub mod account;
pub mod common;
pub mod wallet;

pub use account::*;
pub use common::*;
pub use wallet::*;
