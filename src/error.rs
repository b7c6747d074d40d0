use thiserror::Error;

/// Custom error type for Longbox operations.
#[derive(Debug, Error)]
pub enum LongboxError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// Requested entity was not found.
    #[error("Not found: {entity_type} with id '{id}'")]
    NotFound { entity_type: String, id: String },

    /// Input validation failed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A specific entry in a bulk submission failed validation.
    /// `index` addresses the offending entry in submission order.
    #[error("Invalid entry #{index}: {message}")]
    InvalidEntry { index: usize, message: String },

    /// Conflict detected (e.g., duplicate keys, concurrent modifications).
    /// Storage-level write conflicts surface here and may be retried by the caller.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Transaction operation failed.
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Query execution failed.
    #[error("Query error: {message}")]
    Query {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Deletion blocked due to referential integrity constraint.
    #[error("Cannot delete {entity_type} '{entity_id}': {message}")]
    ReferentialIntegrityViolation {
        entity_type: String,
        entity_id: String,
        message: String,
    },
}

impl From<surrealdb::Error> for LongboxError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // Write-write and read-write conflicts are retryable by the caller.
        if msg.contains("read or write conflict") || msg.contains("can be retried") {
            return LongboxError::Conflict(msg);
        }
        LongboxError::Database(msg)
    }
}

impl From<serde_json::Error> for LongboxError {
    fn from(err: serde_json::Error) -> Self {
        LongboxError::Database(format!("JSON serialization error: {}", err))
    }
}

impl From<std::io::Error> for LongboxError {
    fn from(err: std::io::Error) -> Self {
        LongboxError::Database(format!("I/O error: {}", err))
    }
}
