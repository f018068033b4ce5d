//! Rule registry and evaluation

use crate::error::{RuleError, ValidationError, ValidationErrors};
use crate::messages::{default_message, interpolate, Messages};
use crate::placeholders::fill_placeholders;
use crate::rules::{FieldRules, RuleSet};
use crate::traits::{is_blank, value_text, Data, RuleContext, ValidationRule};
use crate::validators::{
    CharacterClass, CharacterClassValidator, Comparison, ComparisonValidator, CustomValidator,
    DateValidator, DiffersValidator, EmailValidator, InListValidator, LengthValidator,
    MatchesValidator, NumericKind, NumericValidator, PatternValidator, RequiredValidator,
    StringValidator,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Rule names that change how a field is evaluated instead of checking it
const IF_EXIST: &str = "if_exist";
const PERMIT_EMPTY: &str = "permit_empty";

/// Something that can check a record against a rule set.
///
/// An empty [`ValidationErrors`] means the record passed. `Err` is reserved
/// for broken rules (unknown names, bad parameters).
pub trait ValidationEngine: Send + Sync {
    fn run(&self, rules: &RuleSet, data: &Data, messages: &Messages) -> Result<ValidationErrors, RuleError>;
}

/// Default engine: a registry of named rules, built-ins included.
#[derive(Clone)]
pub struct RuleEngine {
    rules: BTreeMap<String, Arc<dyn ValidationRule>>,
}

impl RuleEngine {
    /// Engine with every built-in rule registered
    pub fn new() -> Self {
        let mut engine = Self::empty();
        engine.register("required", RequiredValidator::new());
        engine.register("min_length", LengthValidator::min());
        engine.register("max_length", LengthValidator::max());
        engine.register("exact_length", LengthValidator::exact());
        engine.register("alpha", CharacterClassValidator::new(CharacterClass::Alpha));
        engine.register("alpha_numeric", CharacterClassValidator::new(CharacterClass::AlphaNumeric));
        engine.register(
            "alpha_numeric_space",
            CharacterClassValidator::new(CharacterClass::AlphaNumericSpace),
        );
        engine.register("alpha_dash", CharacterClassValidator::new(CharacterClass::AlphaDash));
        engine.register("numeric", NumericValidator::new(NumericKind::Numeric));
        engine.register("integer", NumericValidator::new(NumericKind::Integer));
        engine.register("decimal", NumericValidator::new(NumericKind::Decimal));
        engine.register("is_natural", NumericValidator::new(NumericKind::Natural));
        engine.register("is_natural_no_zero", NumericValidator::new(NumericKind::NaturalNoZero));
        engine.register("greater_than", ComparisonValidator::new(Comparison::GreaterThan));
        engine.register(
            "greater_than_equal_to",
            ComparisonValidator::new(Comparison::GreaterThanOrEqual),
        );
        engine.register("less_than", ComparisonValidator::new(Comparison::LessThan));
        engine.register(
            "less_than_equal_to",
            ComparisonValidator::new(Comparison::LessThanOrEqual),
        );
        engine.register("valid_email", EmailValidator::new());
        engine.register("valid_emails", EmailValidator::multiple());
        engine.register("regex_match", PatternValidator::new());
        engine.register("in_list", InListValidator);
        engine.register("matches", MatchesValidator);
        engine.register("differs", DiffersValidator);
        engine.register("valid_date", DateValidator);
        engine.register("string", StringValidator);
        engine
    }

    /// Engine without any rules
    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Register or replace a rule
    pub fn register(&mut self, name: impl Into<String>, rule: impl ValidationRule + 'static) {
        self.rules.insert(name.into(), Arc::new(rule));
    }

    /// Register a closure as a rule
    pub fn register_fn<F>(&mut self, name: impl Into<String>, rule: F)
    where
        F: Fn(&Value, &RuleContext<'_>) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        self.register(name.clone(), CustomValidator::new(name, rule));
    }

    /// Builder form of [`RuleEngine::register`]
    pub fn with_rule(mut self, name: impl Into<String>, rule: impl ValidationRule + 'static) -> Self {
        self.register(name, rule);
        self
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Evaluate one field; `Some` carries the first failure.
    fn check_field(
        &self,
        field: &str,
        field_rules: &FieldRules,
        data: &Data,
        messages: &Messages,
    ) -> Result<Option<ValidationError>, RuleError> {
        let submitted = data.get(field);

        if submitted.is_none() && field_rules.has_rule(IF_EXIST) {
            return Ok(None);
        }

        let value = submitted.cloned().unwrap_or(Value::Null);

        if field_rules.has_rule(PERMIT_EMPTY) && is_blank(&value) {
            return Ok(None);
        }

        for rule in &field_rules.rules {
            if rule.name == IF_EXIST || rule.name == PERMIT_EMPTY {
                continue;
            }

            let validator = self.rules.get(&rule.name).ok_or_else(|| RuleError::UnknownRule {
                field: field.to_string(),
                rule: rule.name.clone(),
            })?;

            let ctx = RuleContext {
                field,
                rule: &rule.name,
                param: rule.param.as_deref(),
                data,
            };

            if validator.validate(&value, &ctx)? {
                continue;
            }

            let template = field_rules
                .errors
                .get(&rule.name)
                .map(String::as_str)
                .or_else(|| messages.get(field, &rule.name))
                .unwrap_or_else(|| default_message(&rule.name));
            let label = field_rules.label.as_deref().unwrap_or(field);
            let message = interpolate(template, label, rule.param.as_deref(), &value_text(&value));

            tracing::debug!(field, rule = %rule, "validation rule failed");
            return Ok(Some(ValidationError::with_code(field, message, rule.name.clone())));
        }

        Ok(None)
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ValidationEngine for RuleEngine {
    fn run(&self, rules: &RuleSet, data: &Data, messages: &Messages) -> Result<ValidationErrors, RuleError> {
        let rules = fill_placeholders(rules, data);
        let mut errors = ValidationErrors::new();

        for (field, field_rules) in rules.iter() {
            if let Some(error) = self.check_field(field, field_rules, data, messages)? {
                errors.add(error);
            }
        }

        Ok(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> Data {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_first_failing_rule_reports() {
        let rules = RuleSet::new().parse_field("name", "required|min_length[3]").unwrap();
        let errors = RuleEngine::new()
            .run(&rules, &data(json!({ "name": "" })), &Messages::new())
            .unwrap();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.message("name"), Some("The name field is required."));
        assert_eq!(errors.get("name").unwrap().code, "required");
    }

    #[test]
    fn test_passing_record_has_no_errors() {
        let rules = RuleSet::new().parse_field("name", "required|min_length[3]").unwrap();
        let errors = RuleEngine::new()
            .run(&rules, &data(json!({ "name": "Derek" })), &Messages::new())
            .unwrap();
        assert!(errors.is_empty());
    }

    #[test]
    fn test_message_precedence() {
        let rules = RuleSet::new().field(
            "name",
            FieldRules::parse("required|min_length[10]")
                .unwrap()
                .label("Name")
                .error("min_length", "Minimum Length Error"),
        );
        let messages = Messages::new()
            .with("name", "min_length", "ignored")
            .with("name", "required", "You forgot to name the baby.");
        let engine = RuleEngine::new();

        let errors = engine.run(&rules, &data(json!({ "name": "short" })), &messages).unwrap();
        assert_eq!(errors.message("name"), Some("Minimum Length Error"));

        let errors = engine.run(&rules, &data(json!({})), &messages).unwrap();
        assert_eq!(errors.message("name"), Some("You forgot to name the baby."));
    }

    #[test]
    fn test_label_is_used_in_default_message() {
        let rules = RuleSet::new().field("name", FieldRules::parse("required").unwrap().label("Full name"));
        let errors = RuleEngine::new().run(&rules, &Data::new(), &Messages::new()).unwrap();
        assert_eq!(errors.message("name"), Some("The Full name field is required."));
    }

    #[test]
    fn test_if_exist_skips_absent_fields() {
        let rules = RuleSet::new().parse_field("age", "if_exist|integer").unwrap();
        let engine = RuleEngine::new();

        assert!(engine.run(&rules, &Data::new(), &Messages::new()).unwrap().is_empty());
        let errors = engine.run(&rules, &data(json!({ "age": "x" })), &Messages::new()).unwrap();
        assert!(errors.has_field_errors("age"));
    }

    #[test]
    fn test_permit_empty() {
        let rules = RuleSet::new().parse_field("age", "permit_empty|integer").unwrap();
        let errors = RuleEngine::new()
            .run(&rules, &data(json!({ "age": "" })), &Messages::new())
            .unwrap();
        assert!(errors.is_empty());
    }

    #[test]
    fn test_placeholders_are_filled_before_evaluation() {
        let rules = RuleSet::new().parse_field("token", "in_list[{id}]").unwrap();
        let engine = RuleEngine::new();

        let ok = engine.run(&rules, &data(json!({ "id": 13, "token": 13 })), &Messages::new());
        assert!(ok.unwrap().is_empty());

        let bad = engine
            .run(&rules, &data(json!({ "id": 13, "token": 12 })), &Messages::new())
            .unwrap();
        assert_eq!(bad.message("token"), Some("The token field must be one of: 13."));
    }

    #[test]
    fn test_unknown_rule_is_an_error() {
        let rules = RuleSet::new().parse_field("name", "nonsense").unwrap();
        let result = RuleEngine::new().run(&rules, &Data::new(), &Messages::new());
        assert!(matches!(result, Err(RuleError::UnknownRule { .. })));
    }

    #[test]
    fn test_register_fn() {
        let mut engine = RuleEngine::new();
        engine.register_fn("even", |value, _| value.as_i64().map_or(false, |n| n % 2 == 0));
        let rules = RuleSet::new().parse_field("count", "even").unwrap();

        assert!(engine.has_rule("even"));
        assert!(engine.run(&rules, &data(json!({ "count": 4 })), &Messages::new()).unwrap().is_empty());
        let errors = engine.run(&rules, &data(json!({ "count": 3 })), &Messages::new()).unwrap();
        assert_eq!(errors.message("count"), Some("The count field is invalid."));
    }
}
