//! Error types for the stats storage layer

use thiserror::Error;

/// Result type alias for storage operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while building or executing bulk commands
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database errors (connection, execution)
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A counter does not fit the 32-bit column it is bound to
    #[error("value {value} for '{field}' does not fit a 32-bit column")]
    OutOfRange { field: &'static str, value: i64 },

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Create a new out-of-range error
    pub fn out_of_range(field: &'static str, value: i64) -> Self {
        Self::OutOfRange { field, value }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
