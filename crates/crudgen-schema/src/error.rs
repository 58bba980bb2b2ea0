//! Error types for crudgen-schema

use thiserror::Error;

/// Result type for crudgen-schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Error type for crudgen-schema operations.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Database error from tokio-postgres.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),
    /// Provider identifier matched no known provider family.
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),
    /// Provider family is recognized but has no implementation.
    #[error("Provider not implemented: {0}")]
    NotImplemented(String),
    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Decode error when reading a column.
    #[error("Decode error for column '{column}': {message}")]
    Decode { column: String, message: String },
    /// IO or other error.
    #[error("{0}")]
    Other(String),
}

impl SchemaError {
    /// Create a decode error.
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        SchemaError::Decode {
            column: column.into(),
            message: message.into(),
        }
    }
}
