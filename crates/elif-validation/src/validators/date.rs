//! Date validator

use crate::error::RuleError;
use crate::traits::{value_text, RuleContext, ValidationRule};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Formats tried by a bare `valid_date`
const DEFAULT_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d"];

/// Validator for `valid_date` and `valid_date[chrono format]`
#[derive(Debug, Clone, Default)]
pub struct DateValidator;

impl DateValidator {
    fn parses(text: &str, format: &str) -> bool {
        NaiveDateTime::parse_from_str(text, format).is_ok()
            || NaiveDate::parse_from_str(text, format).is_ok()
    }
}

impl ValidationRule for DateValidator {
    fn validate(&self, value: &Value, ctx: &RuleContext<'_>) -> Result<bool, RuleError> {
        let text = value_text(value);
        let text = text.trim();
        if text.is_empty() {
            return Ok(false);
        }

        Ok(match ctx.param {
            Some(format) => Self::parses(text, format),
            None => {
                DateTime::parse_from_rfc3339(text).is_ok()
                    || DEFAULT_FORMATS.iter().any(|format| Self::parses(text, format))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Data;
    use serde_json::json;

    fn check(param: Option<&str>, value: Value) -> bool {
        let data = Data::new();
        let ctx = RuleContext {
            field: "born",
            rule: "valid_date",
            param,
            data: &data,
        };
        DateValidator.validate(&value, &ctx).unwrap()
    }

    #[test]
    fn test_default_formats() {
        assert!(check(None, json!("2024-02-29")));
        assert!(check(None, json!("2024-02-29 10:00:00")));
        assert!(check(None, json!("2024-02-29T10:00:00+02:00")));
        assert!(!check(None, json!("2023-02-29")));
        assert!(!check(None, json!("yesterday")));
    }

    #[test]
    fn test_explicit_format() {
        assert!(check(Some("%d/%m/%Y"), json!("31/12/2020")));
        assert!(!check(Some("%d/%m/%Y"), json!("2020-12-31")));
    }
}
