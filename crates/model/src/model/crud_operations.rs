//! CRUD Operations - validated, event-wrapped writes

use serde_json::Value;
use std::slice;

use crate::entity::Entity;
use crate::error::{ModelError, ModelResult};
use crate::events::{EventData, ModelEvent};
use crate::query::{delete_sql, insert_sql, update_sql, WhereCondition};
use crate::store::{Row, Store};

use super::primary_key::Keys;
use super::state::{DeletedScope, QueryState};
use super::{IntoPayload, Model};

impl<S: Store> Model<S> {
    /// Insert one row and return its key.
    ///
    /// `Ok(None)` means validation rejected the row; see [`errors`](Model::errors).
    pub fn insert(&mut self, data: impl IntoPayload) -> ModelResult<Option<Value>> {
        let state = self.begin()?;
        let mut data = self.payload(&state, data)?;
        if data.is_empty() {
            return Err(ModelError::Query("There is no data to insert.".to_string()));
        }
        self.strip_null_key(&mut data);

        if !self.run_validation(&data, state.skip_validation)? {
            return Ok(None);
        }

        self.protect_fields(&mut data, state.protect)?;
        self.stamp_insert(&mut data);
        self.mark_live(&mut data);

        let event = self.trigger(EventData::new(ModelEvent::BeforeInsert).data(data))?;
        let data = Self::written(event.data, "insert")?;

        self.record_query(insert_sql(&self.config.table, slice::from_ref(&data)));
        let generated = self.store.insert(&self.config.table, &data)?;

        let id = generated
            .or_else(|| data.get(&self.config.primary_key).cloned())
            .unwrap_or(Value::Null);
        self.insert_id = Some(id.clone());

        self.trigger(
            EventData::new(ModelEvent::AfterInsert)
                .id(Keys::from(id.clone()))
                .data(data)
                .result(id.clone()),
        )?;
        Ok(Some(id))
    }

    /// Update the rows selected by `id` and any pending where clauses.
    ///
    /// With no data the fields staged by [`set`](Model::set) are written.
    /// `Ok(false)` means validation rejected the data.
    pub fn update(&mut self, id: impl Into<Keys>, data: impl IntoPayload) -> ModelResult<bool> {
        let state = self.begin()?;
        let id = id.into();
        self.write_conditions(&state, &id, "update")?;

        let mut data = self.payload(&state, data)?;
        if data.is_empty() {
            return Err(ModelError::Query("There is no data to update.".to_string()));
        }

        if !self.run_validation(&data, state.skip_validation)? {
            return Ok(false);
        }

        self.protect_fields(&mut data, state.protect)?;
        self.stamp_update(&mut data);

        let event = self.trigger(EventData::new(ModelEvent::BeforeUpdate).id(id).data(data))?;
        let id = event.id;
        let data = Self::written(event.data, "update")?;
        // callbacks may retarget the update through `id`
        let conditions = self.write_conditions(&state, &id, "update")?;

        self.record_query(update_sql(&self.config.table, &data, &conditions));
        self.store.update(&self.config.table, &data, &conditions)?;

        self.trigger(
            EventData::new(ModelEvent::AfterUpdate)
                .id(id)
                .data(data)
                .result(true),
        )?;
        Ok(true)
    }

    /// Insert every row or none of them.
    ///
    /// All rows are validated before anything is written; `Ok(None)` means
    /// one of them failed.
    pub fn insert_batch(&mut self, rows: Vec<Row>) -> ModelResult<Option<u64>> {
        let state = self.begin()?;
        if rows.is_empty() {
            return Err(ModelError::Query("There is no data to insert.".to_string()));
        }

        let mut prepared = Vec::with_capacity(rows.len());
        for mut row in rows {
            self.strip_null_key(&mut row);
            if !self.run_validation(&row, state.skip_validation)? {
                return Ok(None);
            }
            prepared.push(row);
        }

        for row in prepared.iter_mut() {
            self.protect_fields(row, state.protect)?;
            self.stamp_insert(row);
            self.mark_live(row);
        }

        self.record_query(insert_sql(&self.config.table, &prepared));
        let written = self.store.insert_batch(&self.config.table, &prepared)?;
        Ok(Some(written))
    }

    /// One update per row, each matched on the row's `index` field.
    ///
    /// `Ok(None)` means a row failed validation and nothing was written.
    pub fn update_batch(&mut self, rows: Vec<Row>, index: &str) -> ModelResult<Option<u64>> {
        let state = self.begin()?;
        if rows.is_empty() {
            return Err(ModelError::Query("There is no data to update.".to_string()));
        }

        if let Some(position) = rows.iter().position(|row| !row.contains_key(index)) {
            return Err(ModelError::Query(format!(
                "The index ('{}') for updateBatch() is missing in row {}.",
                index, position
            )));
        }

        for row in &rows {
            if !self.run_validation(row, state.skip_validation)? {
                return Ok(None);
            }
        }

        let mut prepared = Vec::with_capacity(rows.len());
        for mut row in rows {
            let key = row.remove(index).unwrap_or(Value::Null);
            self.protect_fields(&mut row, state.protect)?;
            self.stamp_update(&mut row);
            prepared.push((key, row));
        }

        let mut affected = 0;
        for (key, row) in prepared {
            let conditions = [WhereCondition::eq(index, key)];
            self.record_query(update_sql(&self.config.table, &row, &conditions));
            affected += self.store.update(&self.config.table, &row, &conditions)?;
        }
        Ok(Some(affected))
    }

    /// Delete the rows selected by `id` and any pending where clauses.
    ///
    /// Soft-delete models mark the rows unless `purge` is set. Returns the
    /// number of rows affected.
    pub fn delete(&mut self, id: impl Into<Keys>, purge: bool) -> ModelResult<u64> {
        let state = self.begin()?;
        let id = id.into();
        let conditions = self.write_conditions(&state, &id, "delete")?;

        let affected = if self.config.use_soft_deletes && !purge {
            let mut set = Row::new();
            set.insert(self.config.deleted_field.clone(), self.deleted_marker());
            self.stamp_update(&mut set);

            self.record_query(update_sql(&self.config.table, &set, &conditions));
            self.store.update(&self.config.table, &set, &conditions)?
        } else {
            self.record_query(delete_sql(&self.config.table, &conditions));
            self.store.delete(&self.config.table, &conditions)?
        };

        self.trigger(
            EventData::new(ModelEvent::AfterDelete)
                .id(id)
                .result(affected)
                .purge(purge),
        )?;
        Ok(affected)
    }

    /// Hard-delete the soft-deleted rows matching any pending where clauses
    pub fn purge_deleted(&mut self) -> ModelResult<u64> {
        let state = self.begin()?;
        let Some(condition) = self.deleted_scope(DeletedScope::Only) else {
            return Ok(0);
        };

        let mut conditions = state.builder.where_conditions().to_vec();
        conditions.push(condition);
        self.record_query(delete_sql(&self.config.table, &conditions));
        self.store.delete(&self.config.table, &conditions)
    }

    /// Update when the row carries a primary key, insert otherwise
    pub fn save(&mut self, row: Row) -> ModelResult<bool> {
        match self.key_of(&row) {
            Some(key) => self.update(key, row),
            None => Ok(self.insert(row)?.is_some()),
        }
    }

    /// Persist an entity: keyed entities write only their dirty fields,
    /// new ones are inserted and receive their key.
    pub fn save_entity(&mut self, entity: &mut Entity) -> ModelResult<bool> {
        let primary_key = self.config.primary_key.clone();

        match self.key_of(entity.attributes()) {
            Some(key) => {
                let mut changes = entity.dirty();
                changes.remove(&primary_key);

                if changes.is_empty() {
                    self.begin()?;
                    return Ok(true);
                }
                if !self.update(key, changes)? {
                    return Ok(false);
                }
            }
            None => {
                let Some(id) = self.insert(&*entity)? else {
                    return Ok(false);
                };
                if !primary_key.is_empty() && !id.is_null() {
                    entity.set(&primary_key, id)?;
                }
            }
        }

        entity.sync_original();
        Ok(true)
    }

    /// Staged `set()` fields overlaid with the explicit payload
    fn payload(&self, state: &QueryState, data: impl IntoPayload) -> ModelResult<Row> {
        let mut row = state.builder.set_data().clone();
        if let Some(data) = data.into_payload()? {
            row.extend(data);
        }
        Ok(row)
    }

    /// Pending filters plus the id condition; refuses to touch every row
    fn write_conditions(&self, state: &QueryState, id: &Keys, action: &str) -> ModelResult<Vec<WhereCondition>> {
        let mut conditions = state.builder.where_conditions().to_vec();
        if !id.is_none() {
            conditions.extend(id.condition(self.primary_key()?));
        }

        if conditions.is_empty() {
            return Err(ModelError::Query(format!(
                "Refusing to {} every row of `{}` without a key or where clause.",
                action, self.config.table
            )));
        }
        Ok(conditions)
    }

    /// A non-null primary key value carried by `row`
    fn key_of(&self, row: &Row) -> Option<Value> {
        if self.config.primary_key.is_empty() {
            return None;
        }
        row.get(&self.config.primary_key)
            .filter(|value| !value.is_null())
            .cloned()
    }

    /// A null key is left for the store to generate
    fn strip_null_key(&self, row: &mut Row) {
        let primary_key = &self.config.primary_key;
        if row.get(primary_key).is_some_and(Value::is_null) {
            row.remove(primary_key);
        }
    }

    /// Data left by the before-callbacks
    fn written(data: Option<Row>, action: &str) -> ModelResult<Row> {
        data.filter(|row| !row.is_empty())
            .ok_or_else(|| ModelError::Query(format!("There is no data to {}.", action)))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ModelConfig;
    use crate::entity::Entity;
    use crate::error::ModelError;
    use crate::model::Model;
    use crate::store::{MemoryStore, Row};
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    fn model() -> Model<MemoryStore> {
        let store = MemoryStore::new();
        store
            .create_table("job", &["id", "name", "description"], Some("id"))
            .unwrap();
        store
            .seed("job", [row(json!({ "name": "Developer", "description": "Awesome job" }))])
            .unwrap();
        Model::new(store, ModelConfig::new("job").allowed_fields(["name", "description"]))
    }

    #[test]
    fn test_insert_returns_generated_key() {
        let mut model = model();
        let id = model.insert(row(json!({ "name": "Pilot", "description": "Flies" }))).unwrap();
        assert_eq!(id, Some(json!(2)));
        assert_eq!(model.insert_id(), Some(&json!(2)));
        assert!(model.last_query().unwrap().sql.starts_with("INSERT INTO job"));
    }

    #[test]
    fn test_insert_without_data_is_query_error() {
        let mut model = model();
        assert!(matches!(model.insert(()), Err(ModelError::Query(_))));
    }

    #[test]
    fn test_insert_uses_staged_fields() {
        let mut model = model();
        model.set_field("name", "Pilot").set_field("description", "Flies");
        assert_eq!(model.insert(()).unwrap(), Some(json!(2)));
        assert!(model.builder().is_empty());
    }

    #[test]
    fn test_update_refuses_unfiltered_write() {
        let mut model = model();
        let result = model.update((), row(json!({ "name": "Nobody" })));
        assert!(matches!(result, Err(ModelError::Query(_))));
        assert_eq!(
            model.store().rows("job").unwrap()[0]["name"],
            json!("Developer")
        );
    }

    #[test]
    fn test_storage_failure_propagates() {
        let mut model = model();
        model.store().fail_next("connection lost").unwrap();
        let result = model.insert(row(json!({ "name": "Pilot" })));
        assert!(matches!(result, Err(ref err) if err.is_database()));
        assert!(model.builder().binds().is_empty());
    }

    #[test]
    fn test_save_entity_writes_only_dirty_fields() {
        let mut model = model();
        let mut entity = model.as_entity().find(1).unwrap().into_single().unwrap().into_entity().unwrap();

        entity.set("name", "Senior Developer").unwrap();
        assert!(model.save_entity(&mut entity).unwrap());
        assert!(!entity.has_changed());

        let query = model.last_query().unwrap();
        assert_eq!(query.sql, "UPDATE job SET name = $1 WHERE id = $2");
    }

    #[test]
    fn test_save_new_entity_receives_key() {
        let mut model = model();
        let mut entity = Entity::new();
        entity.set("name", "Pilot").unwrap();

        assert!(model.save_entity(&mut entity).unwrap());
        assert_eq!(entity.get("id"), Some(&json!(2)));
        assert!(!entity.has_changed());
    }
}
