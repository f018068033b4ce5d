//! Numeric value validators

use crate::error::RuleError;
use crate::traits::{value_text, RuleContext, ValidationRule};
use serde_json::Value;

/// Shape a value's text must have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    /// Optional sign, digits, optional fraction
    Numeric,
    /// Optional sign and digits only
    Integer,
    /// Like `Numeric`; the fraction part is optional
    Decimal,
    /// Digits only, zero allowed
    Natural,
    /// Digits only, greater than zero
    NaturalNoZero,
}

/// Validator for `numeric`, `integer`, `decimal`, `is_natural` and `is_natural_no_zero`
#[derive(Debug, Clone)]
pub struct NumericValidator {
    pub kind: NumericKind,
}

impl NumericValidator {
    pub fn new(kind: NumericKind) -> Self {
        Self { kind }
    }

    fn is_digits(text: &str) -> bool {
        !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
    }

    fn strip_sign(text: &str) -> &str {
        text.strip_prefix(['-', '+']).unwrap_or(text)
    }

    /// Digits with at most one dot, at least one digit after it
    fn is_decimal_text(text: &str) -> bool {
        let unsigned = Self::strip_sign(text);
        match unsigned.split_once('.') {
            None => Self::is_digits(unsigned),
            Some((whole, fraction)) => {
                (whole.is_empty() || Self::is_digits(whole)) && Self::is_digits(fraction)
            }
        }
    }
}

impl ValidationRule for NumericValidator {
    fn validate(&self, value: &Value, _ctx: &RuleContext<'_>) -> Result<bool, RuleError> {
        let text = value_text(value);
        let text = text.as_str();

        Ok(match self.kind {
            NumericKind::Numeric | NumericKind::Decimal => Self::is_decimal_text(text),
            NumericKind::Integer => Self::is_digits(Self::strip_sign(text)),
            NumericKind::Natural => Self::is_digits(text),
            NumericKind::NaturalNoZero => {
                Self::is_digits(text) && text.chars().any(|c| c != '0')
            }
        })
    }
}

/// Comparison against a numeric parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

/// Validator for `greater_than[n]` and friends. Non-numeric values fail.
#[derive(Debug, Clone)]
pub struct ComparisonValidator {
    pub comparison: Comparison,
}

impl ComparisonValidator {
    pub fn new(comparison: Comparison) -> Self {
        Self { comparison }
    }

    /// Extract numeric value from JSON value
    fn get_numeric_value(&self, value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

impl ValidationRule for ComparisonValidator {
    fn validate(&self, value: &Value, ctx: &RuleContext<'_>) -> Result<bool, RuleError> {
        let bound = ctx.numeric_param()?;
        let Some(number) = self.get_numeric_value(value) else {
            return Ok(false);
        };

        Ok(match self.comparison {
            Comparison::GreaterThan => number > bound,
            Comparison::GreaterThanOrEqual => number >= bound,
            Comparison::LessThan => number < bound,
            Comparison::LessThanOrEqual => number <= bound,
        })
    }
}
