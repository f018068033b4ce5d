//! Custom validation functions and closures

use crate::error::RuleError;
use crate::traits::{RuleContext, ValidationRule};
use serde_json::Value;
use std::sync::Arc;

/// Type alias for custom rule functions
pub type RuleFn = Arc<dyn Fn(&Value, &RuleContext<'_>) -> bool + Send + Sync>;

/// Rule backed by a user-supplied closure
#[derive(Clone)]
pub struct CustomValidator {
    /// Name the rule is registered under
    pub name: String,
    validator: RuleFn,
}

impl CustomValidator {
    pub fn new<F>(name: impl Into<String>, validator: F) -> Self
    where
        F: Fn(&Value, &RuleContext<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            validator: Arc::new(validator),
        }
    }

    /// Get the validator name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomValidator")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ValidationRule for CustomValidator {
    fn validate(&self, value: &Value, ctx: &RuleContext<'_>) -> Result<bool, RuleError> {
        Ok((self.validator)(value, ctx))
    }
}
