//! # elif-testing - Model Testing Toolkit
//!
//! Utilities for exercising `elif-model` without a live server: a seeded
//! in-memory database, the fixture models the model suite runs against and
//! assertion helpers for rows and JSON values.
//!
//! ## Quick Start
//!
//! ```rust
//! use elif_testing::prelude::*;
//!
//! let db = TestDatabase::new().unwrap();
//! let mut jobs = db.model(fixtures::job());
//!
//! jobs.delete(1, false).unwrap();
//! db.dont_see_in_database("job", json!({ "name": "Developer" })).unwrap();
//! ```

pub mod assertions;
pub mod database;
pub mod fixtures;
pub mod logging;

use elif_model::ModelError;

// Re-export commonly used types
pub use assertions::TestAssertions;
pub use database::TestDatabase;
pub use fixtures::EventTokens;
pub use logging::init_test_logging;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::assertions::TestAssertions;
    pub use crate::database::TestDatabase;
    pub use crate::fixtures::{self, EventTokens};
    pub use crate::{TestError, TestResult};

    // Re-export commonly used external types
    pub use elif_model::{Found, Keys, Model, ModelConfig, Record, Row};
    pub use serde_json::{json, Value as JsonValue};
}

// Error handling
#[derive(thiserror::Error, Debug)]
pub enum TestError {
    #[error("Database error: {0}")]
    Database(#[from] ModelError),

    #[error("Rule error: {0}")]
    Rules(#[from] elif_validation::RuleError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Assertion failed: {message}")]
    Assertion { message: String },

    #[error("Test setup error: {0}")]
    Setup(String),
}

pub type TestResult<T> = Result<T, TestError>;

/// Turn a JSON object literal into a row
pub fn row(value: serde_json::Value) -> TestResult<elif_model::Row> {
    match value {
        serde_json::Value::Object(row) => Ok(row),
        other => Err(TestError::Setup(format!("expected a JSON object, got {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_from_object() {
        let row = row(json!({ "name": "Developer" })).unwrap();
        assert_eq!(row["name"], "Developer");
    }

    #[test]
    fn test_row_rejects_non_objects() {
        assert!(matches!(row(json!([1, 2])), Err(TestError::Setup(_))));
    }
}
