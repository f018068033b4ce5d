//! Length-based validators for strings

use crate::error::RuleError;
use crate::traits::{value_text, RuleContext, ValidationRule};
use serde_json::Value;

/// Which side of the length the rule constrains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthBound {
    Min,
    Max,
    Exact,
}

/// Validator for `min_length`, `max_length` and `exact_length`.
/// Length is counted in characters of the value's text form.
#[derive(Debug, Clone)]
pub struct LengthValidator {
    pub bound: LengthBound,
}

impl LengthValidator {
    pub fn min() -> Self {
        Self {
            bound: LengthBound::Min,
        }
    }

    pub fn max() -> Self {
        Self {
            bound: LengthBound::Max,
        }
    }

    pub fn exact() -> Self {
        Self {
            bound: LengthBound::Exact,
        }
    }

    /// Get the length of a value (arrays count elements)
    fn get_length(&self, value: &Value) -> usize {
        match value {
            Value::Array(arr) => arr.len(),
            other => value_text(other).chars().count(), // Unicode-aware length
        }
    }
}

impl ValidationRule for LengthValidator {
    fn validate(&self, value: &Value, ctx: &RuleContext<'_>) -> Result<bool, RuleError> {
        let limit = ctx.length_param()?;
        let length = self.get_length(value);

        Ok(match self.bound {
            LengthBound::Min => length >= limit,
            LengthBound::Max => length <= limit,
            LengthBound::Exact => length == limit,
        })
    }
}
