//! Pattern and character-class validators

use crate::error::RuleError;
use crate::traits::{value_text, RuleContext, ValidationRule};
use regex::Regex;
use serde_json::Value;

/// Validator for `regex_match[/pattern/]`. Surrounding `/` delimiters are
/// optional; a trailing `i` after the closing delimiter makes it case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct PatternValidator;

impl PatternValidator {
    pub fn new() -> Self {
        Self
    }

    fn compile(param: &str, rule: &str) -> Result<Regex, RuleError> {
        let source = match param.strip_prefix('/') {
            Some(rest) => match rest.rsplit_once('/') {
                Some((body, "i")) => format!("(?i){body}"),
                Some((body, "")) => body.to_string(),
                _ => param.to_string(),
            },
            None => param.to_string(),
        };

        Regex::new(&source).map_err(|_| RuleError::InvalidParameter {
            rule: rule.to_string(),
            param: param.to_string(),
        })
    }
}

impl ValidationRule for PatternValidator {
    fn validate(&self, value: &Value, ctx: &RuleContext<'_>) -> Result<bool, RuleError> {
        let regex = Self::compile(ctx.require_param()?, ctx.rule)?;
        Ok(regex.is_match(&value_text(value)))
    }
}

/// Allowed character set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterClass {
    Alpha,
    AlphaNumeric,
    AlphaNumericSpace,
    AlphaDash,
}

/// Validator for `alpha`, `alpha_numeric`, `alpha_numeric_space` and `alpha_dash`.
/// Only ASCII letters count as alphabetical.
#[derive(Debug, Clone)]
pub struct CharacterClassValidator {
    pub class: CharacterClass,
}

impl CharacterClassValidator {
    pub fn new(class: CharacterClass) -> Self {
        Self { class }
    }

    fn allows(&self, c: char) -> bool {
        match self.class {
            CharacterClass::Alpha => c.is_ascii_alphabetic(),
            CharacterClass::AlphaNumeric => c.is_ascii_alphanumeric(),
            CharacterClass::AlphaNumericSpace => c.is_ascii_alphanumeric() || c == ' ',
            CharacterClass::AlphaDash => c.is_ascii_alphanumeric() || c == '_' || c == '-',
        }
    }
}

impl ValidationRule for CharacterClassValidator {
    fn validate(&self, value: &Value, _ctx: &RuleContext<'_>) -> Result<bool, RuleError> {
        let text = value_text(value);
        Ok(!text.is_empty() && text.chars().all(|c| self.allows(c)))
    }
}

/// Validator for `string`: the value must be JSON text
#[derive(Debug, Clone, Default)]
pub struct StringValidator;

impl ValidationRule for StringValidator {
    fn validate(&self, value: &Value, _ctx: &RuleContext<'_>) -> Result<bool, RuleError> {
        Ok(value.is_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Data;
    use serde_json::json;

    fn run(rule: &dyn ValidationRule, param: Option<&str>, value: Value) -> Result<bool, RuleError> {
        let data = Data::new();
        let ctx = RuleContext {
            field: "code",
            rule: "regex_match",
            param,
            data: &data,
        };
        rule.validate(&value, &ctx)
    }

    #[test]
    fn test_regex_match_with_delimiters() {
        let validator = PatternValidator::new();
        assert!(run(&validator, Some("/^[a-z]+$/"), json!("abc")).unwrap());
        assert!(!run(&validator, Some("/^[a-z]+$/"), json!("ABC")).unwrap());
        assert!(run(&validator, Some("/^[a-z]+$/i"), json!("ABC")).unwrap());
        assert!(run(&validator, Some("^\\d{3}$"), json!(123)).unwrap());
    }

    #[test]
    fn test_invalid_regex_is_rule_error() {
        let validator = PatternValidator::new();
        assert!(matches!(
            run(&validator, Some("/(unclosed/"), json!("x")),
            Err(RuleError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_character_classes() {
        let alpha = CharacterClassValidator::new(CharacterClass::Alpha);
        assert!(run(&alpha, None, json!("Derek")).unwrap());
        assert!(!run(&alpha, None, json!("Derek Jones")).unwrap());

        let space = CharacterClassValidator::new(CharacterClass::AlphaNumericSpace);
        assert!(run(&space, None, json!("Derek Jones 2")).unwrap());

        let dash = CharacterClassValidator::new(CharacterClass::AlphaDash);
        assert!(run(&dash, None, json!("my-slug_1")).unwrap());
        assert!(!run(&dash, None, json!("")).unwrap());
    }

    #[test]
    fn test_string_rule() {
        assert!(run(&StringValidator, None, json!("x")).unwrap());
        assert!(!run(&StringValidator, None, json!(1)).unwrap());
    }
}
