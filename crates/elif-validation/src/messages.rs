//! Custom and default error messages

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field -> rule -> message overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Messages {
    fields: BTreeMap<String, BTreeMap<String, String>>,
}

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one message for a field/rule pair
    pub fn set(&mut self, field: impl Into<String>, rule: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .insert(rule.into(), message.into());
    }

    /// Replace every message for a field
    pub fn set_field<I, R, M>(&mut self, field: impl Into<String>, messages: I)
    where
        I: IntoIterator<Item = (R, M)>,
        R: Into<String>,
        M: Into<String>,
    {
        let messages = messages
            .into_iter()
            .map(|(rule, message)| (rule.into(), message.into()))
            .collect();
        self.fields.insert(field.into(), messages);
    }

    /// Builder form of [`Messages::set`]
    pub fn with(mut self, field: impl Into<String>, rule: impl Into<String>, message: impl Into<String>) -> Self {
        self.set(field, rule, message);
        self
    }

    /// Fields present in `other` replace the ones here
    pub fn merge(&mut self, other: Messages) {
        for (field, messages) in other.fields {
            self.fields.insert(field, messages);
        }
    }

    pub fn get(&self, field: &str, rule: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(|messages| messages.get(rule))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Engine default for a built-in rule.
pub fn default_message(rule: &str) -> &'static str {
    match rule {
        "required" => "The {field} field is required.",
        "min_length" => "The {field} field must be at least {param} characters in length.",
        "max_length" => "The {field} field cannot exceed {param} characters in length.",
        "exact_length" => "The {field} field must be exactly {param} characters in length.",
        "alpha" => "The {field} field may only contain alphabetical characters.",
        "alpha_numeric" => "The {field} field may only contain alphanumeric characters.",
        "alpha_numeric_space" => {
            "The {field} field may only contain alphanumeric and space characters."
        }
        "alpha_dash" => {
            "The {field} field may only contain alphanumeric, underscore, and dash characters."
        }
        "numeric" => "The {field} field must contain only numbers.",
        "integer" => "The {field} field must contain an integer.",
        "decimal" => "The {field} field must contain a decimal number.",
        "is_natural" => "The {field} field must only contain digits.",
        "is_natural_no_zero" => {
            "The {field} field must only contain digits and must be greater than zero."
        }
        "greater_than" => "The {field} field must contain a number greater than {param}.",
        "greater_than_equal_to" => {
            "The {field} field must contain a number greater than or equal to {param}."
        }
        "less_than" => "The {field} field must contain a number less than {param}.",
        "less_than_equal_to" => {
            "The {field} field must contain a number less than or equal to {param}."
        }
        "valid_email" => "The {field} field must contain a valid email address.",
        "valid_emails" => "The {field} field must contain all valid email addresses.",
        "regex_match" => "The {field} field is not in the correct format.",
        "in_list" => "The {field} field must be one of: {param}.",
        "matches" => "The {field} field does not match the {param} field.",
        "differs" => "The {field} field must differ from the {param} field.",
        "valid_date" => "The {field} field must contain a valid date.",
        "string" => "The {field} field must be a valid string.",
        _ => "The {field} field is invalid.",
    }
}

/// Substitute `{field}`, `{param}` and `{value}` in a message template.
pub fn interpolate(template: &str, field: &str, param: Option<&str>, value: &str) -> String {
    template
        .replace("{field}", field)
        .replace("{param}", param.unwrap_or_default())
        .replace("{value}", value)
}
