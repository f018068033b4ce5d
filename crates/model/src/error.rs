//! Error types for the model core
//!
//! Validation failures are not errors: write operations report them as a
//! failed result and expose the messages through `Model::errors()`.

use crate::event_error::EventError;
use elif_validation::RuleError;
use thiserror::Error;

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Error types for model operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Model misconfiguration, raised on first use of the missing piece
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failure reported by the underlying store
    #[error("Database error: {0}")]
    Database(String),

    /// Mass assignment rejected before any write
    #[error("Protection violation: {0}")]
    Protection(String),

    /// Request the model refuses to turn into a statement
    #[error("Query error: {0}")]
    Query(String),

    /// A lifecycle callback failed
    #[error("Event error: {0}")]
    Event(#[from] EventError),

    /// Value could not be converted between rows and typed data
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ModelError {
    /// Whether the error came from the store
    pub fn is_database(&self) -> bool {
        matches!(self, ModelError::Database(_))
    }
}

// Convert from serde_json errors
impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Serialization(err.to_string())
    }
}

// Broken rules are a model configuration problem
impl From<RuleError> for ModelError {
    fn from(err: RuleError) -> Self {
        ModelError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let error = ModelError::Configuration("primary key is not defined".to_string());
        assert_eq!(error.to_string(), "Configuration error: primary key is not defined");
    }

    #[test]
    fn test_event_error_converts() {
        let error: ModelError = EventError::observer("hook failed").into();
        assert!(matches!(error, ModelError::Event(EventError::Observer { .. })));
    }

    #[test]
    fn test_rule_error_is_configuration() {
        let error: ModelError = RuleError::UnknownGroup("signup".to_string()).into();
        assert!(matches!(error, ModelError::Configuration(msg) if msg.contains("signup")));
    }
}
