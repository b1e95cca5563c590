//! Error types for primary-key discovery.
//!
//! Errors are split into two classes. Connection-level failures are fatal:
//! no strategy can make progress without the caller's session, so they are
//! propagated unchanged. Everything else is local to the strategy that hit
//! it and only means "this strategy found nothing".

use thiserror::Error;

/// Main error type for keyscout operations.
#[derive(Debug, Error)]
pub enum KeyScoutError {
    /// The caller-supplied connection is closed, lost or cannot hand out a
    /// statement. Always fatal.
    #[error("Connection unavailable: {context}")]
    Connection {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A catalog or probe statement failed on the server
    #[error("Query execution failed: {context}")]
    QueryExecution { context: String },

    /// A value in a catalog row could not be read or parsed
    #[error("Metadata collection failed: {context}")]
    Collection {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A column ordinal does not exist in the probed result metadata
    #[error("Column ordinal {ordinal} is out of range for {table} ({column_count} columns)")]
    OrdinalOutOfRange {
        ordinal: usize,
        column_count: usize,
        table: String,
    },

    /// A view's stored definition does not have the expected shape
    #[error("Unusable view definition for {table}: {source}")]
    ViewDefinition {
        table: String,
        #[source]
        source: crate::teradata::view_sql::ViewSqlError,
    },

    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with KeyScoutError
pub type Result<T> = std::result::Result<T, KeyScoutError>;

impl KeyScoutError {
    /// Returns true when the error must abort discovery instead of letting
    /// the next strategy run.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Creates a fatal connection error wrapping a driver error
    pub fn connection_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            context: context.into(),
            source: Some(Box::new(error)),
        }
    }

    /// Creates a fatal error for a connection that has already been closed
    pub fn connection_closed() -> Self {
        Self::Connection {
            context: "connection is closed".to_string(),
            source: None,
        }
    }

    /// Creates a parsing error for a catalog field.
    ///
    /// # Arguments
    /// * `field_name` - Name of the field being parsed
    /// * `table_context` - Optional table context for better error messages
    /// * `error` - The underlying parsing error
    pub fn parse_field<E>(field_name: &str, table_context: Option<&str>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let context = match table_context {
            Some(table) => format!(
                "Failed to parse field '{}' from result for table '{}'",
                field_name, table
            ),
            None => format!("Failed to parse field '{}' from catalog result", field_name),
        };
        Self::Collection {
            context,
            source: Box::new(error),
        }
    }

    /// Creates a query execution error
    pub fn query_failed(context: impl Into<String>) -> Self {
        Self::QueryExecution {
            context: context.into(),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Error raised when a catalog row lacks a field or holds an unusable value.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct FieldError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_errors_are_fatal() {
        assert!(KeyScoutError::connection_closed().is_fatal());

        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "socket reset");
        let error = KeyScoutError::connection_failed("session lost", io);
        assert!(error.is_fatal());
        assert!(error.to_string().contains("session lost"));
    }

    #[test]
    fn test_strategy_local_errors_are_not_fatal() {
        assert!(!KeyScoutError::query_failed("3807: Object does not exist").is_fatal());
        assert!(
            !KeyScoutError::parse_field("ColumnPosition", Some("LINE_ITEMS"), FieldError("x".into()))
                .is_fatal()
        );
        assert!(
            !KeyScoutError::OrdinalOutOfRange {
                ordinal: 9,
                column_count: 2,
                table: "'T'".to_string(),
            }
            .is_fatal()
        );
    }

    #[test]
    fn test_parse_field_context() {
        let error = KeyScoutError::parse_field(
            "ColumnPosition",
            Some("LINE_ITEMS"),
            FieldError("not a number".to_string()),
        );
        let message = error.to_string();
        assert!(message.contains("ColumnPosition"));
        assert!(message.contains("LINE_ITEMS"));

        let error = KeyScoutError::parse_field("ColumnName", None, FieldError("null".into()));
        assert!(error.to_string().contains("catalog result"));
    }

    #[test]
    fn test_error_creation() {
        let error = KeyScoutError::configuration("no strategies enabled");
        assert!(error.to_string().contains("no strategies enabled"));
    }
}
