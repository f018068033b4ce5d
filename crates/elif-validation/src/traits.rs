//! Core validation traits

use crate::error::RuleError;
use serde_json::{Map, Value};

/// A record under validation: field name to value.
pub type Data = Map<String, Value>;

/// Everything a rule may look at besides the value itself.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Field being validated
    pub field: &'a str,
    /// Name the rule was invoked under
    pub rule: &'a str,
    /// Bracketed parameter, e.g. `3` in `min_length[3]`
    pub param: Option<&'a str>,
    /// The whole record, for cross-field rules
    pub data: &'a Data,
}

impl<'a> RuleContext<'a> {
    /// The parameter, or an error naming the rule when it was omitted
    pub fn require_param(&self) -> Result<&'a str, RuleError> {
        self.param.ok_or_else(|| RuleError::MissingParameter {
            rule: self.rule.to_string(),
        })
    }

    /// Parse the parameter as a number
    pub fn numeric_param(&self) -> Result<f64, RuleError> {
        let param = self.require_param()?;
        param
            .trim()
            .parse::<f64>()
            .map_err(|_| RuleError::InvalidParameter {
                rule: self.rule.to_string(),
                param: param.to_string(),
            })
    }

    /// Parse the parameter as a length
    pub fn length_param(&self) -> Result<usize, RuleError> {
        let param = self.require_param()?;
        param
            .trim()
            .parse::<usize>()
            .map_err(|_| RuleError::InvalidParameter {
                rule: self.rule.to_string(),
                param: param.to_string(),
            })
    }
}

/// A single named check. Returns `Ok(false)` when the value fails and
/// `Err` only when the rule itself is misconfigured.
pub trait ValidationRule: Send + Sync {
    fn validate(&self, value: &Value, ctx: &RuleContext<'_>) -> Result<bool, RuleError>;
}

/// Render a value the way rule parameters and messages see it.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        other => other.to_string(),
    }
}

/// Whether a value counts as "nothing submitted" for `permit_empty`.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(_) => false,
    }
}
