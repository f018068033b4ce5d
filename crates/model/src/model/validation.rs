//! Validation: rule resolution, data-dependent cleaning and error capture

use elif_validation::{FieldRules, Messages, RuleSet, ValidationErrors};

use crate::config::RuleSource;
use crate::error::ModelResult;
use crate::store::{Row, Store};

use super::Model;

/// Rules that apply to one write: only fields present in `data` are
/// checked, and no data at all means no rules.
pub fn clean_validation_rules(rules: &RuleSet, data: Option<&Row>) -> RuleSet {
    let Some(data) = data else {
        return RuleSet::new();
    };

    let mut cleaned = rules.clone();
    cleaned.retain(|field| data.contains_key(field));
    cleaned
}

impl<S: Store> Model<S> {
    /// The model's full rule set, resolving a named group if configured
    pub fn validation_rules(&self) -> ModelResult<RuleSet> {
        match &self.config.validation_rules {
            RuleSource::Rules(rules) => Ok(rules.clone()),
            RuleSource::Group(name) => Ok(self.validation_config.group(name)?.clone()),
        }
    }

    /// Replace the rules for this instance
    pub fn set_validation_rules(&mut self, rules: RuleSet) -> &mut Self {
        self.config.validation_rules = RuleSource::Rules(rules);
        self
    }

    /// Set or replace the rules of a single field
    pub fn set_validation_rule(&mut self, field: &str, rules: FieldRules) -> ModelResult<&mut Self> {
        let mut current = self.validation_rules()?;
        current.insert(field, rules);
        self.config.validation_rules = RuleSource::Rules(current);
        Ok(self)
    }

    /// Resolve rules from a named group for the rest of this instance's life
    pub fn use_validation_group(&mut self, name: &str) -> ModelResult<&mut Self> {
        self.validation_config.group(name)?;
        self.config.validation_rules = RuleSource::Group(name.to_string());
        Ok(self)
    }

    /// Custom messages for one field, keyed by rule
    pub fn set_validation_message<I, R, M>(&mut self, field: &str, messages: I) -> &mut Self
    where
        I: IntoIterator<Item = (R, M)>,
        R: Into<String>,
        M: Into<String>,
    {
        self.config.validation_messages.set_field(field, messages);
        self
    }

    /// Merge custom messages for several fields
    pub fn set_validation_messages(&mut self, messages: Messages) -> &mut Self {
        self.config.validation_messages.merge(messages);
        self
    }

    /// Validate `data` against the cleaned rules, honouring the configured
    /// skip flag. Failures are left in [`errors`](Model::errors).
    pub fn validate(&mut self, data: &Row) -> ModelResult<bool> {
        self.run_validation(data, None)
    }

    /// `skip` is the one-shot override; it wins over the configuration
    pub(crate) fn run_validation(&mut self, data: &Row, skip: Option<bool>) -> ModelResult<bool> {
        self.errors = ValidationErrors::new();

        if skip.unwrap_or(self.config.skip_validation) {
            return Ok(true);
        }

        let rules = clean_validation_rules(&self.validation_rules()?, Some(data));
        if rules.is_empty() {
            return Ok(true);
        }

        let errors = self
            .engine
            .run(&rules, data, &self.config.validation_messages)?;

        if errors.is_empty() {
            return Ok(true);
        }

        let fields: Vec<String> = errors.messages().into_keys().collect();
        tracing::warn!(
            table = %self.config.table,
            fields = ?fields,
            "validation rejected write"
        );
        self.errors = errors;
        Ok(false)
    }
}
