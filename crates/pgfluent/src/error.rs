//! Error types for pgfluent

use thiserror::Error;

/// Result type alias for pgfluent operations
pub type DbResult<T> = Result<T, DbError>;

/// Error types for query building and execution
#[derive(Debug, Error)]
pub enum DbError {
    /// Join kind outside the accepted set
    #[error("Invalid join kind: '{0}' (expected INNER JOIN, RIGHT JOIN, LEFT JOIN or LEFT OUTER JOIN)")]
    InvalidJoinKind(String),

    /// Connection configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// A terminal operation was invoked without an open session
    #[error("Not connected: call connect() before executing queries")]
    NotConnected,

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// Column count and value count disagree
    #[error("Parameter count mismatch: expected {expected} values, got {got}")]
    ParamCount { expected: usize, got: usize },

    /// Builder state rejected before execution
    #[error("Validation error: {0}")]
    Validation(String),

    /// Row decode error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl DbError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error was raised before any I/O because of caller configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidJoinKind(_) | Self::Config(_))
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Parse a tokio_postgres error into a more specific DbError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                "23514" => return Self::CheckViolation(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_classified() {
        assert!(DbError::InvalidJoinKind("CROSS JOIN".into()).is_configuration());
        assert!(DbError::config("bad driver").is_configuration());
        assert!(!DbError::NotConnected.is_configuration());
        assert!(!DbError::validation("empty").is_configuration());
    }

    #[test]
    fn param_count_message() {
        let err = DbError::ParamCount {
            expected: 2,
            got: 3,
        };
        assert_eq!(
            err.to_string(),
            "Parameter count mismatch: expected 2 values, got 3"
        );
    }
}
