//! Test assertion utilities and helpers
//!
//! Assertions return `TestResult` so tests can chain them with `?`.

use chrono::Utc;
use elif_model::{timestamp, CompiledQuery};
use elif_validation::ValidationErrors;
use serde_json::Value as JsonValue;

use crate::{TestError, TestResult};

/// Collection of test assertions
pub struct TestAssertions;

impl TestAssertions {
    /// Assert that two JSON values are equal
    pub fn assert_json_eq(actual: &JsonValue, expected: &JsonValue) -> TestResult<()> {
        if actual != expected {
            return Err(TestError::Assertion {
                message: format!(
                    "JSON assertion failed:\nExpected: {}\nActual: {}",
                    serde_json::to_string_pretty(expected).unwrap_or_default(),
                    serde_json::to_string_pretty(actual).unwrap_or_default()
                ),
            });
        }
        Ok(())
    }

    /// Assert that JSON contains expected fields/values
    pub fn assert_json_contains(actual: &JsonValue, expected: &JsonValue) -> TestResult<()> {
        if !json_contains(actual, expected) {
            return Err(TestError::Assertion {
                message: format!(
                    "JSON does not contain expected values:\nExpected to contain: {}\nActual: {}",
                    serde_json::to_string_pretty(expected).unwrap_or_default(),
                    serde_json::to_string_pretty(actual).unwrap_or_default()
                ),
            });
        }
        Ok(())
    }

    /// Assert that a rendered statement matches a pattern
    pub fn assert_sql_matches(query: &CompiledQuery, pattern: &str) -> TestResult<()> {
        let regex = regex::Regex::new(pattern).map_err(|e| TestError::Assertion {
            message: format!("Invalid regex pattern '{}': {}", pattern, e),
        })?;

        if !regex.is_match(&query.sql) {
            return Err(TestError::Assertion {
                message: format!("SQL '{}' does not match pattern '{}'", query.sql, pattern),
            });
        }
        Ok(())
    }

    /// Assert the number of values a statement bound
    pub fn assert_bind_count(query: &CompiledQuery, expected: usize) -> TestResult<()> {
        if query.binds.len() != expected {
            return Err(TestError::Assertion {
                message: format!(
                    "Expected {} binds for '{}', got {}",
                    expected,
                    query.sql,
                    query.binds.len()
                ),
            });
        }
        Ok(())
    }

    /// Assert the message recorded for a field
    pub fn assert_validation_error(errors: &ValidationErrors, field: &str, expected: &str) -> TestResult<()> {
        match errors.message(field) {
            Some(message) if message == expected => Ok(()),
            Some(message) => Err(TestError::Assertion {
                message: format!("Expected error '{}' for '{}', got '{}'", expected, field, message),
            }),
            None => Err(TestError::Assertion {
                message: format!("No validation error recorded for '{}': {}", field, errors),
            }),
        }
    }

    /// Assert that a stored timestamp lies within `tolerance_secs` of now
    pub fn assert_recent(value: &JsonValue, tolerance_secs: i64) -> TestResult<()> {
        let moment = timestamp::parse(value).ok_or_else(|| TestError::Assertion {
            message: format!("'{}' is not a timestamp", value),
        })?;

        let drift = (Utc::now().naive_utc() - moment).num_seconds().abs();
        if drift > tolerance_secs {
            return Err(TestError::Assertion {
                message: format!("Timestamp {} is {}s away from now (tolerance {}s)", value, drift, tolerance_secs),
            });
        }
        Ok(())
    }
}

/// Helper function to check if JSON contains expected values
pub fn json_contains(actual: &JsonValue, expected: &JsonValue) -> bool {
    match (actual, expected) {
        (JsonValue::Object(actual_map), JsonValue::Object(expected_map)) => {
            expected_map.iter().all(|(key, expected_value)| {
                actual_map
                    .get(key)
                    .is_some_and(|actual_value| json_contains(actual_value, expected_value))
            })
        }
        (JsonValue::Array(actual_arr), JsonValue::Array(expected_arr)) => {
            // For arrays, check if all expected items exist in actual array
            expected_arr.iter().all(|expected_item| {
                actual_arr.iter().any(|actual_item| json_contains(actual_item, expected_item))
            })
        }
        (JsonValue::Number(actual_num), JsonValue::Number(expected_num)) => {
            actual_num.as_f64() == expected_num.as_f64()
        }
        _ => actual == expected,
    }
}

/// Macros for common assertions
#[macro_export]
macro_rules! assert_json_contains {
    ($actual:expr, $expected:expr) => {
        $crate::assertions::TestAssertions::assert_json_contains($actual, $expected)?
    };
}

#[macro_export]
macro_rules! assert_validation_error {
    ($errors:expr, $field:expr, $message:expr) => {
        $crate::assertions::TestAssertions::assert_validation_error($errors, $field, $message)?
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_contains_subset() {
        let actual = json!({ "id": 1, "name": "Derek Jones", "deleted": 0 });
        assert!(json_contains(&actual, &json!({ "name": "Derek Jones" })));
        assert!(json_contains(&actual, &json!({ "id": 1.0 })));
        assert!(!json_contains(&actual, &json!({ "deleted": 1 })));
        assert!(!json_contains(&actual, &json!({ "email": null })));
    }

    #[test]
    fn test_assert_json_eq() {
        let row = json!({ "id": 1, "name": "Developer" });
        TestAssertions::assert_json_eq(&row, &json!({ "name": "Developer", "id": 1 })).unwrap();
        assert!(TestAssertions::assert_json_eq(&row, &json!({ "id": 1 })).is_err());
    }

    #[test]
    fn test_sql_assertions() {
        let query = CompiledQuery {
            sql: "SELECT * FROM job WHERE id = $1 LIMIT 1".to_string(),
            binds: vec![json!(1)],
        };
        TestAssertions::assert_sql_matches(&query, r"^SELECT \* FROM job").unwrap();
        TestAssertions::assert_bind_count(&query, 1).unwrap();
        assert!(TestAssertions::assert_bind_count(&query, 2).is_err());
    }

    #[test]
    fn test_assert_validation_error() {
        let mut errors = ValidationErrors::new();
        errors.add_error("name", "Too short, man!");

        TestAssertions::assert_validation_error(&errors, "name", "Too short, man!").unwrap();
        assert!(TestAssertions::assert_validation_error(&errors, "email", "x").is_err());
    }

    #[test]
    fn test_assert_recent() {
        let now = timestamp::now(elif_model::DateFormat::Datetime);
        TestAssertions::assert_recent(&now, 5).unwrap();
        assert!(TestAssertions::assert_recent(&json!("2001-01-01 00:00:00"), 5).is_err());
    }
}
