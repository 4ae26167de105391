//! Unified error taxonomy for the order pipeline
//!
//! Every layer (persistence adapters, order service, read models, HTTP
//! handlers) speaks [`StoreError`]. The HTTP mapping lives in the server
//! crate; this module stays transport-agnostic.

use thiserror::Error;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    /// Operation attempted on an empty cart or an illegal state transition
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Unknown order, user, or product id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Id collision on create
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Document store timeout or connection error
    #[error("Backend unreachable: {0}")]
    BackendUnreachable(String),

    /// Missing or malformed request fields, caught before submission
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Serialization or storage-internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    pub fn unreachable(msg: impl Into<String>) -> Self {
        Self::BackendUnreachable(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Internal(format!("serialization: {err}"))
    }
}

impl From<validator::ValidationErrors> for StoreError {
    fn from(err: validator::ValidationErrors) -> Self {
        StoreError::Validation(err.to_string())
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
