//! Core error types for `SoldSync`.

use thiserror::Error;

/// Core error type for `SoldSync` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Identifier is empty or lacks the marketplace prefix.
    #[error("Invalid item identifier: {0:?}")]
    InvalidItemId(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid data from an input row or API response.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
