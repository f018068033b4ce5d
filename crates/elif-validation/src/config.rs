//! Named rule groups shared between models

use crate::error::RuleError;
use crate::rules::RuleSet;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Named validation groups, resolved by models that reference a group
/// instead of carrying their own rules.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ValidationConfig {
    #[serde(default)]
    pub groups: BTreeMap<String, RuleSet>,
}

impl ValidationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from JSON of the form `{ "groups": { "signup": { "email": "required" } } }`
    pub fn from_json_str(json: &str) -> Result<Self, RuleError> {
        serde_json::from_str(json).map_err(|e| RuleError::Config(e.to_string()))
    }

    /// Add or replace a group
    pub fn insert_group(&mut self, name: impl Into<String>, rules: RuleSet) {
        self.groups.insert(name.into(), rules);
    }

    /// Builder form of [`ValidationConfig::insert_group`]
    pub fn with_group(mut self, name: impl Into<String>, rules: RuleSet) -> Self {
        self.insert_group(name, rules);
        self
    }

    pub fn group(&self, name: &str) -> Result<&RuleSet, RuleError> {
        self.groups
            .get(name)
            .ok_or_else(|| RuleError::UnknownGroup(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_groups_from_json() {
        let config = ValidationConfig::from_json_str(
            r#"{ "groups": { "grouptest": { "name": ["required", "min_length[3]"] } } }"#,
        )
        .unwrap();

        let group = config.group("grouptest").unwrap();
        assert!(group.get("name").unwrap().has_rule("min_length"));
    }

    #[test]
    fn test_unknown_group() {
        let config = ValidationConfig::new();
        assert_eq!(
            config.group("missing"),
            Err(RuleError::UnknownGroup("missing".to_string()))
        );
    }

    #[test]
    fn test_bad_json_is_config_error() {
        assert!(matches!(
            ValidationConfig::from_json_str("{ nope"),
            Err(RuleError::Config(_))
        ));
    }
}
