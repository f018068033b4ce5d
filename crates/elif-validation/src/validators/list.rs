//! Membership and cross-field validators

use crate::error::RuleError;
use crate::traits::{value_text, RuleContext, ValidationRule};
use serde_json::Value;

/// Validator for `in_list[a,b,c]`. Items are trimmed and compared as text.
#[derive(Debug, Clone, Default)]
pub struct InListValidator;

impl ValidationRule for InListValidator {
    fn validate(&self, value: &Value, ctx: &RuleContext<'_>) -> Result<bool, RuleError> {
        let text = value_text(value);
        Ok(ctx
            .require_param()?
            .split(',')
            .any(|item| item.trim() == text))
    }
}

/// Validator for `matches[other]`: equal to another field's value
#[derive(Debug, Clone, Default)]
pub struct MatchesValidator;

impl ValidationRule for MatchesValidator {
    fn validate(&self, value: &Value, ctx: &RuleContext<'_>) -> Result<bool, RuleError> {
        let other = ctx.require_param()?;
        Ok(match ctx.data.get(other) {
            Some(other) => value_text(other) == value_text(value),
            None => false,
        })
    }
}

/// Validator for `differs[other]`: different from another field's value
#[derive(Debug, Clone, Default)]
pub struct DiffersValidator;

impl ValidationRule for DiffersValidator {
    fn validate(&self, value: &Value, ctx: &RuleContext<'_>) -> Result<bool, RuleError> {
        let other = ctx.require_param()?;
        Ok(match ctx.data.get(other) {
            Some(other) => value_text(other) != value_text(value),
            None => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Data;
    use serde_json::json;

    #[test]
    fn test_in_list() {
        let data = Data::new();
        let ctx = RuleContext {
            field: "token",
            rule: "in_list",
            param: Some("13, 14"),
            data: &data,
        };
        assert!(InListValidator.validate(&json!(13), &ctx).unwrap());
        assert!(InListValidator.validate(&json!("14"), &ctx).unwrap());
        assert!(!InListValidator.validate(&json!(12), &ctx).unwrap());
    }

    #[test]
    fn test_matches_and_differs() {
        let data = json!({ "password": "secret", "confirm": "secret" })
            .as_object()
            .cloned()
            .unwrap();
        let ctx = RuleContext {
            field: "confirm",
            rule: "matches",
            param: Some("password"),
            data: &data,
        };
        assert!(MatchesValidator.validate(&json!("secret"), &ctx).unwrap());
        assert!(!DiffersValidator.validate(&json!("secret"), &ctx).unwrap());

        let missing = RuleContext {
            param: Some("absent"),
            ..ctx
        };
        assert!(!MatchesValidator.validate(&json!("secret"), &missing).unwrap());
    }
}
