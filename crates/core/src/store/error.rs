use thiserror::Error;

/// Errors raised by a table store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Table '{table_name}' not found")]
    TableNotFound { table_name: String },
    #[error("Access denied: {0}")]
    AccessDenied(String),
    #[error("Request throttled: {0}")]
    Throttled(String),
    #[error("Provider error: {0}")]
    Provider(String),
    #[error("{remaining} keys still unprocessed after {rounds} batch write rounds")]
    Unprocessed { remaining: usize, rounds: u32 },
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Injected failure on {operation} call #{call}")]
    Injected { operation: &'static str, call: usize },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
