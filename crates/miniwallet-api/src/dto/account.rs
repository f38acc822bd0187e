//! Account DTOs

use serde::{Deserialize, Serialize};

/// Account creation request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InitAccountRequest {
    /// Customer identifier; `cust_id` is accepted for older clients
    #[serde(default, alias = "cust_id")]
    pub customer_xid: Option<String>,
}

/// Account creation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}
