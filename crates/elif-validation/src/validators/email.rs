//! Email format validator

use crate::error::RuleError;
use crate::traits::{value_text, RuleContext, ValidationRule};
use regex::Regex;
use serde_json::Value;

// ASCII local part and domain, no leading/trailing dots, TLD of two or more letters
const EMAIL_PATTERN: &str =
    r"^[a-zA-Z0-9]([a-zA-Z0-9._%+-]*[a-zA-Z0-9])?@[a-zA-Z0-9]([a-zA-Z0-9.-]*[a-zA-Z0-9])?\.[a-zA-Z]{2,}$";

/// Validator for `valid_email` and the comma-separated `valid_emails`
#[derive(Debug, Clone, Default)]
pub struct EmailValidator {
    /// Accept a comma-separated list, every entry must be valid
    pub multiple: bool,
}

impl EmailValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn multiple() -> Self {
        Self { multiple: true }
    }

    /// Validate a single address
    fn validate_email_format(&self, email: &str) -> Result<bool, RuleError> {
        if email.is_empty() || email.matches('@').count() != 1 {
            return Ok(false);
        }

        let Some((local_part, domain_part)) = email.split_once('@') else {
            return Ok(false);
        };

        // RFC 5321 limits
        if local_part.len() > 64 || domain_part.len() > 255 {
            return Ok(false);
        }

        let regex = Regex::new(EMAIL_PATTERN).map_err(|e| RuleError::Config(e.to_string()))?;
        Ok(regex.is_match(email) && !email.contains(".."))
    }
}

impl ValidationRule for EmailValidator {
    fn validate(&self, value: &Value, _ctx: &RuleContext<'_>) -> Result<bool, RuleError> {
        let text = value_text(value);

        if !self.multiple {
            return self.validate_email_format(text.trim());
        }

        for address in text.split(',') {
            if !self.validate_email_format(address.trim())? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
