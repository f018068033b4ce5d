//! Lifecycle plumbing: event dispatch, timestamps and field protection

use crate::config::SoftDeleteMode;
use crate::error::{ModelError, ModelResult};
use crate::events::EventData;
use crate::query::WhereCondition;
use crate::store::{Row, Store};
use crate::timestamp;

use super::state::DeletedScope;
use super::Model;

impl<S: Store> Model<S> {
    /// Run the callbacks for `data.event` and hand back the (possibly
    /// rewritten) payload
    pub(crate) fn trigger(&self, mut data: EventData) -> ModelResult<EventData> {
        if !self.config.events.has(data.event) {
            return Ok(data);
        }

        tracing::debug!(
            table = %self.config.table,
            event = %data.event,
            callbacks = self.config.events.count(data.event),
            "dispatching model event"
        );
        self.config.events.dispatch(&mut data)?;
        Ok(data)
    }

    /// Fill the given timestamp columns the caller left out
    pub(crate) fn stamp(&self, data: &mut Row, fields: &[&str]) {
        if !self.config.use_timestamps {
            return;
        }

        let now = timestamp::now(self.config.date_format);
        for field in fields.iter().filter(|field| !field.is_empty()) {
            if !data.contains_key(*field) {
                data.insert(field.to_string(), now.clone());
            }
        }
    }

    /// Stamp created and updated columns for an insert
    pub(crate) fn stamp_insert(&self, data: &mut Row) {
        let created = self.config.created_field.clone();
        let updated = self.config.updated_field.clone();
        self.stamp(data, &[&created, &updated]);
    }

    /// Stamp the updated column for an update
    pub(crate) fn stamp_update(&self, data: &mut Row) {
        let updated = self.config.updated_field.clone();
        self.stamp(data, &[&updated]);
    }

    /// Strip fields outside the allowed list unless protection is off
    pub(crate) fn protect_fields(&self, data: &mut Row, protect: Option<bool>) -> ModelResult<()> {
        if !protect.unwrap_or(self.config.protect_fields) {
            return Ok(());
        }

        if self.config.allowed_fields.is_empty() {
            return Err(ModelError::Protection(format!(
                "no allowed fields specified for model `{}`",
                self.config.table
            )));
        }

        let stripped: Vec<String> = data
            .keys()
            .filter(|field| !self.config.is_allowed(field))
            .cloned()
            .collect();

        if !stripped.is_empty() {
            tracing::warn!(
                table = %self.config.table,
                fields = ?stripped,
                "stripping fields outside the allowed list"
            );
            for field in &stripped {
                data.remove(field);
            }
        }

        if data.is_empty() {
            return Err(ModelError::Protection(format!(
                "no allowed fields left to write to `{}`",
                self.config.table
            )));
        }
        Ok(())
    }

    /// Flag-mode rows start out live unless the payload says otherwise
    pub(crate) fn mark_live(&self, data: &mut Row) {
        if self.config.use_soft_deletes
            && self.config.soft_delete_mode == SoftDeleteMode::Flag
            && !self.config.deleted_field.is_empty()
        {
            data.entry(self.config.deleted_field.clone())
                .or_insert(serde_json::Value::from(0));
        }
    }

    /// Marker value written when soft-deleting a row
    pub(crate) fn deleted_marker(&self) -> serde_json::Value {
        match self.config.soft_delete_mode {
            SoftDeleteMode::Flag => serde_json::Value::from(1),
            SoftDeleteMode::Timestamp => timestamp::now(self.config.date_format),
        }
    }

    /// Conditions restricting a read to the requested soft-delete scope
    pub(crate) fn deleted_scope(&self, scope: DeletedScope) -> Option<WhereCondition> {
        if !self.config.use_soft_deletes {
            return None;
        }

        let field = self.config.deleted_field.as_str();
        match (scope, self.config.soft_delete_mode) {
            (DeletedScope::Include, _) => None,
            (DeletedScope::Exclude, SoftDeleteMode::Flag) => {
                Some(WhereCondition::eq(field, serde_json::Value::from(0)))
            }
            (DeletedScope::Only, SoftDeleteMode::Flag) => {
                Some(WhereCondition::eq(field, serde_json::Value::from(1)))
            }
            (DeletedScope::Exclude, SoftDeleteMode::Timestamp) => Some(WhereCondition::null(field)),
            (DeletedScope::Only, SoftDeleteMode::Timestamp) => Some(WhereCondition::not_null(field)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ModelConfig, SoftDeleteMode};
    use crate::error::ModelError;
    use crate::model::{DeletedScope, Model};
    use crate::query::QueryOperator;
    use crate::store::{MemoryStore, Row};
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_protect_strips_disallowed_fields() {
        let model = Model::new(MemoryStore::new(), ModelConfig::new("job").allowed_fields(["name"]));
        let mut data = row(json!({ "name": "Pilot", "salary": 10 }));
        model.protect_fields(&mut data, None).unwrap();
        assert_eq!(data, row(json!({ "name": "Pilot" })));
    }

    #[test]
    fn test_protect_off_keeps_everything() {
        let model = Model::new(MemoryStore::new(), ModelConfig::new("job"));
        let mut data = row(json!({ "salary": 10 }));
        model.protect_fields(&mut data, Some(false)).unwrap();
        assert!(data.contains_key("salary"));
    }

    #[test]
    fn test_protect_without_allowed_fields_is_violation() {
        let model = Model::new(MemoryStore::new(), ModelConfig::new("job"));
        let mut data = row(json!({ "name": "Pilot" }));
        assert!(matches!(
            model.protect_fields(&mut data, None),
            Err(ModelError::Protection(_))
        ));
    }

    #[test]
    fn test_stamp_respects_caller_values() {
        let config = ModelConfig::new("user").timestamps("created_at", "updated_at");
        let model = Model::new(MemoryStore::new(), config);
        let mut data = row(json!({ "created_at": "2001-01-01 00:00:00" }));
        model.stamp_insert(&mut data);

        assert_eq!(data["created_at"], "2001-01-01 00:00:00");
        assert!(data["updated_at"].is_string());
    }

    #[test]
    fn test_mark_live_only_fills_missing_flag() {
        let flag = Model::new(MemoryStore::new(), ModelConfig::new("user").soft_deletes("deleted"));
        let mut data = row(json!({ "name": "Fred" }));
        flag.mark_live(&mut data);
        assert_eq!(data["deleted"], json!(0));

        let mut data = row(json!({ "name": "Fred", "deleted": 1 }));
        flag.mark_live(&mut data);
        assert_eq!(data["deleted"], json!(1));

        let stamped = Model::new(
            MemoryStore::new(),
            ModelConfig::new("user")
                .soft_deletes("deleted_at")
                .soft_delete_mode(SoftDeleteMode::Timestamp),
        );
        let mut data = row(json!({ "name": "Fred" }));
        stamped.mark_live(&mut data);
        assert!(!data.contains_key("deleted_at"));
    }

    #[test]
    fn test_deleted_scope_conditions() {
        let flag = Model::new(MemoryStore::new(), ModelConfig::new("user").soft_deletes("deleted"));
        let exclude = flag.deleted_scope(DeletedScope::Exclude).unwrap();
        assert_eq!(exclude.value, Some(json!(0)));
        assert!(flag.deleted_scope(DeletedScope::Include).is_none());

        let stamped = Model::new(
            MemoryStore::new(),
            ModelConfig::new("user")
                .soft_deletes("deleted_at")
                .soft_delete_mode(SoftDeleteMode::Timestamp),
        );
        let only = stamped.deleted_scope(DeletedScope::Only).unwrap();
        assert_eq!(only.operator, QueryOperator::IsNotNull);
    }
}
