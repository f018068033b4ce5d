//! Per-model configuration
//!
//! A concrete model is a `ModelConfig` value: table, key, mass-assignment
//! whitelist, timestamp and soft-delete columns, validation rules and
//! lifecycle callbacks. Built once with fluent setters and then owned by
//! the `Model` it configures.

use elif_validation::{Messages, RuleSet};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::event_error::EventError;
use crate::events::{EventData, EventRegistry, ModelEvent};

/// Shape of rows returned by the find family
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnType {
    /// Plain column map
    #[default]
    Array,
    /// JSON object value
    Object,
    /// Dirty-tracking [`Entity`](crate::entity::Entity)
    Entity,
}

/// Storage representation of timestamp columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    /// `YYYY-MM-DD HH:MM:SS`
    #[default]
    Datetime,
    /// `YYYY-MM-DD`
    Date,
    /// Unix seconds
    Int,
}

/// How the deleted column marks a row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoftDeleteMode {
    /// 0 for live rows, 1 for deleted ones
    #[default]
    Flag,
    /// NULL for live rows, the deletion time otherwise
    Timestamp,
}

/// Where a model's rules come from
#[derive(Debug, Clone, PartialEq)]
pub enum RuleSource {
    /// Rules declared on the model
    Rules(RuleSet),
    /// Named group resolved through `ValidationConfig`
    Group(String),
}

impl Default for RuleSource {
    fn default() -> Self {
        RuleSource::Rules(RuleSet::new())
    }
}

/// Declarative configuration of one model
#[derive(Clone)]
pub struct ModelConfig {
    pub table: String,
    /// Empty when the table has no key; keyed operations then fail
    pub primary_key: String,
    pub return_type: ReturnType,
    pub allowed_fields: Vec<String>,
    pub protect_fields: bool,

    pub use_timestamps: bool,
    pub created_field: String,
    pub updated_field: String,
    pub date_format: DateFormat,

    pub use_soft_deletes: bool,
    pub deleted_field: String,
    pub soft_delete_mode: SoftDeleteMode,

    pub validation_rules: RuleSource,
    pub validation_messages: Messages,
    pub skip_validation: bool,

    pub events: EventRegistry,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            table: String::new(),
            primary_key: "id".to_string(),
            return_type: ReturnType::Array,
            allowed_fields: Vec::new(),
            protect_fields: true,
            use_timestamps: false,
            created_field: "created_at".to_string(),
            updated_field: "updated_at".to_string(),
            date_format: DateFormat::Datetime,
            use_soft_deletes: false,
            deleted_field: "deleted".to_string(),
            soft_delete_mode: SoftDeleteMode::Flag,
            validation_rules: RuleSource::default(),
            validation_messages: Messages::new(),
            skip_validation: false,
            events: EventRegistry::new(),
        }
    }
}

impl ModelConfig {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Set the primary key column; an empty name declares a keyless table
    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = column.into();
        self
    }

    pub fn return_type(mut self, return_type: ReturnType) -> Self {
        self.return_type = return_type;
        self
    }

    /// Columns writable through mass assignment
    pub fn allowed_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn protect_fields(mut self, protect: bool) -> Self {
        self.protect_fields = protect;
        self
    }

    /// Enable timestamps with the given created/updated columns
    pub fn timestamps(mut self, created: impl Into<String>, updated: impl Into<String>) -> Self {
        self.use_timestamps = true;
        self.created_field = created.into();
        self.updated_field = updated.into();
        self
    }

    pub fn use_timestamps(mut self, enabled: bool) -> Self {
        self.use_timestamps = enabled;
        self
    }

    pub fn date_format(mut self, format: DateFormat) -> Self {
        self.date_format = format;
        self
    }

    /// Enable soft deletes on the given column
    pub fn soft_deletes(mut self, column: impl Into<String>) -> Self {
        self.use_soft_deletes = true;
        self.deleted_field = column.into();
        self
    }

    pub fn use_soft_deletes(mut self, enabled: bool) -> Self {
        self.use_soft_deletes = enabled;
        self
    }

    pub fn soft_delete_mode(mut self, mode: SoftDeleteMode) -> Self {
        self.soft_delete_mode = mode;
        self
    }

    pub fn validation_rules(mut self, rules: RuleSet) -> Self {
        self.validation_rules = RuleSource::Rules(rules);
        self
    }

    /// Validate against a named group instead of inline rules
    pub fn validation_group(mut self, group: impl Into<String>) -> Self {
        self.validation_rules = RuleSource::Group(group.into());
        self
    }

    pub fn validation_messages(mut self, messages: Messages) -> Self {
        self.validation_messages = messages;
        self
    }

    pub fn skip_validation(mut self, skip: bool) -> Self {
        self.skip_validation = skip;
        self
    }

    /// Append a callback to an event's list
    pub fn on<F>(mut self, event: ModelEvent, callback: F) -> Self
    where
        F: Fn(&mut EventData) -> Result<(), EventError> + Send + Sync + 'static,
    {
        self.events.register(event, callback);
        self
    }

    pub fn before_insert<F>(self, callback: F) -> Self
    where
        F: Fn(&mut EventData) -> Result<(), EventError> + Send + Sync + 'static,
    {
        self.on(ModelEvent::BeforeInsert, callback)
    }

    pub fn after_insert<F>(self, callback: F) -> Self
    where
        F: Fn(&mut EventData) -> Result<(), EventError> + Send + Sync + 'static,
    {
        self.on(ModelEvent::AfterInsert, callback)
    }

    pub fn before_update<F>(self, callback: F) -> Self
    where
        F: Fn(&mut EventData) -> Result<(), EventError> + Send + Sync + 'static,
    {
        self.on(ModelEvent::BeforeUpdate, callback)
    }

    pub fn after_update<F>(self, callback: F) -> Self
    where
        F: Fn(&mut EventData) -> Result<(), EventError> + Send + Sync + 'static,
    {
        self.on(ModelEvent::AfterUpdate, callback)
    }

    pub fn after_find<F>(self, callback: F) -> Self
    where
        F: Fn(&mut EventData) -> Result<(), EventError> + Send + Sync + 'static,
    {
        self.on(ModelEvent::AfterFind, callback)
    }

    pub fn after_delete<F>(self, callback: F) -> Self
    where
        F: Fn(&mut EventData) -> Result<(), EventError> + Send + Sync + 'static,
    {
        self.on(ModelEvent::AfterDelete, callback)
    }

    /// Columns an entity treats as dates
    pub fn date_fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        if self.use_timestamps {
            fields.push(self.created_field.clone());
            fields.push(self.updated_field.clone());
        }
        if self.use_soft_deletes && self.soft_delete_mode == SoftDeleteMode::Timestamp {
            fields.push(self.deleted_field.clone());
        }
        fields.retain(|field| !field.is_empty());
        fields
    }

    pub fn is_allowed(&self, field: &str) -> bool {
        self.allowed_fields.iter().any(|allowed| allowed == field)
    }
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("table", &self.table)
            .field("primary_key", &self.primary_key)
            .field("return_type", &self.return_type)
            .field("allowed_fields", &self.allowed_fields)
            .field("protect_fields", &self.protect_fields)
            .field("use_timestamps", &self.use_timestamps)
            .field("use_soft_deletes", &self.use_soft_deletes)
            .field("validation_rules", &self.validation_rules)
            .field("skip_validation", &self.skip_validation)
            .field("events", &self.events)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ModelConfig::new("job");
        assert_eq!(config.primary_key, "id");
        assert_eq!(config.return_type, ReturnType::Array);
        assert!(config.protect_fields);
        assert!(!config.use_timestamps);
        assert_eq!(config.deleted_field, "deleted");
        assert_eq!(config.soft_delete_mode, SoftDeleteMode::Flag);
    }

    #[test]
    fn test_fluent_setters() {
        let config = ModelConfig::new("user")
            .allowed_fields(["name", "email", "country"])
            .timestamps("created_at", "updated_at")
            .soft_deletes("deleted")
            .return_type(ReturnType::Object);

        assert!(config.is_allowed("email"));
        assert!(!config.is_allowed("id"));
        assert!(config.use_soft_deletes);
        assert_eq!(config.date_fields(), vec!["created_at", "updated_at"]);
    }

    #[test]
    fn test_timestamp_soft_deletes_are_dates() {
        let config = ModelConfig::new("user")
            .soft_deletes("deleted_at")
            .soft_delete_mode(SoftDeleteMode::Timestamp);
        assert_eq!(config.date_fields(), vec!["deleted_at"]);
    }

    #[test]
    fn test_callbacks_register_in_order() {
        let config = ModelConfig::new("job")
            .before_insert(|_| Ok(()))
            .before_insert(|_| Ok(()))
            .after_find(|_| Ok(()));

        assert_eq!(config.events.count(ModelEvent::BeforeInsert), 2);
        assert_eq!(config.events.count(ModelEvent::AfterFind), 1);
        assert_eq!(config.events.count(ModelEvent::AfterDelete), 0);
    }

    #[test]
    fn test_enums_deserialize_lowercase() {
        let format: DateFormat = serde_json::from_str("\"int\"").unwrap();
        assert_eq!(format, DateFormat::Int);
        let return_type: ReturnType = serde_json::from_str("\"entity\"").unwrap();
        assert_eq!(return_type, ReturnType::Entity);
    }
}
