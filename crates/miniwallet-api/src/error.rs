//! API error handling
//!
//! Maps core and auth failures onto the wallet's response envelopes:
//! `fail` for problems the client can fix, `error` for unknown customers,
//! rejected credentials and server faults.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use miniwallet_auth::AuthError;
use miniwallet_core::{GatewayError, LedgerError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by handlers and extractors
#[derive(Debug, Error)]
pub enum ApiError {
    // =========================================================================
    // Authentication Errors
    // =========================================================================
    #[error("{0}")]
    Unauthorized(String),

    // =========================================================================
    // Request Errors
    // =========================================================================
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Invalid request body: {0}")]
    InvalidRequestBody(String),

    // =========================================================================
    // Account Errors
    // =========================================================================
    #[error("Customer ID already exists.")]
    CustomerExists,

    #[error("Customer ID not found.")]
    CustomerNotFound,

    // =========================================================================
    // Wallet Errors
    // =========================================================================
    #[error("Wallet is disabled")]
    WalletDisabled,

    #[error("Wallet is already enabled")]
    WalletAlreadyEnabled,

    #[error("Wallet is already disabled")]
    WalletAlreadyDisabled,

    #[error("Insufficient balance")]
    InsufficientBalance,

    // =========================================================================
    // Internal Errors
    // =========================================================================
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,

            Self::InvalidField { .. }
            | Self::InvalidRequestBody(_)
            | Self::CustomerExists
            | Self::WalletDisabled
            | Self::WalletAlreadyEnabled
            | Self::WalletAlreadyDisabled
            | Self::InsufficientBalance => StatusCode::BAD_REQUEST,

            Self::CustomerNotFound => StatusCode::NOT_FOUND,

            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code, used in logs
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::InvalidField { .. } => "VALIDATION_ERROR",
            Self::InvalidRequestBody(_) => "INVALID_REQUEST_BODY",
            Self::CustomerExists => "DUPLICATE_ACCOUNT",
            Self::CustomerNotFound => "NOT_FOUND",
            Self::WalletDisabled => "WALLET_DISABLED",
            Self::WalletAlreadyEnabled => "ALREADY_ENABLED",
            Self::WalletAlreadyDisabled => "ALREADY_DISABLED",
            Self::InsufficientBalance => "INSUFFICIENT_BALANCE",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    fn field(field: &str, reason: &str) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Error envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// `fail` or `error`
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<FailData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of a `fail` envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct FailData {
    pub error: FailDetail,
}

/// Per-field messages, or a single message
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FailDetail {
    Fields(BTreeMap<String, Vec<String>>),
    Message(String),
}

impl ErrorResponse {
    fn fail(error: FailDetail) -> Self {
        Self {
            status: "fail".to_string(),
            data: Some(FailData { error }),
            message: None,
        }
    }

    fn error(message: String) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            message: Some(message),
        }
    }
}

impl From<&ApiError> for ErrorResponse {
    fn from(error: &ApiError) -> Self {
        match error {
            ApiError::InvalidField { field, reason } => {
                let mut fields = BTreeMap::new();
                fields.insert(field.clone(), vec![reason.clone()]);
                Self::fail(FailDetail::Fields(fields))
            }
            ApiError::InsufficientBalance => {
                let mut fields = BTreeMap::new();
                fields.insert("amount".to_string(), vec![error.to_string()]);
                Self::fail(FailDetail::Fields(fields))
            }
            ApiError::InvalidRequestBody(_)
            | ApiError::WalletDisabled
            | ApiError::WalletAlreadyEnabled
            | ApiError::WalletAlreadyDisabled => Self::fail(FailDetail::Message(error.to_string())),
            ApiError::Unauthorized(_)
            | ApiError::CustomerExists
            | ApiError::CustomerNotFound
            | ApiError::Internal => Self::error(error.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "Request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "Request rejected");
        }
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

// Implement From conversions
impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation { field, reason } => Self::field(&field, &reason),
            LedgerError::DuplicateAccount { .. } => Self::CustomerExists,
            LedgerError::NotFound { .. } => Self::CustomerNotFound,
            LedgerError::WalletDisabled => Self::WalletDisabled,
            LedgerError::AlreadyEnabled => Self::WalletAlreadyEnabled,
            LedgerError::AlreadyDisabled => Self::WalletAlreadyDisabled,
            LedgerError::InsufficientBalance { .. } => Self::InsufficientBalance,
            LedgerError::Storage { message } => {
                tracing::error!(error = %message, "Storage error");
                Self::Internal
            }
            LedgerError::Gateway(err) => {
                tracing::error!(error = %err, "Identity gateway error");
                Self::Internal
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Internal(msg) => {
                tracing::error!(error = %msg, "Auth internal error");
                Self::Internal
            }
            other => Self::Unauthorized(other.client_message()),
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        AuthError::from(err).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequestBody(rejection.body_text())
    }
}
