//! Read results in the model's return shape

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ReturnType;
use crate::entity::Entity;
use crate::error::ModelResult;
use crate::store::Row;

/// One row, shaped per the model's return type
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Array(Row),
    Object(Value),
    Entity(Entity),
}

impl Record {
    /// Shape a raw row; `entity` builds the entity variant
    pub(crate) fn shape(row: Row, return_type: ReturnType, entity: impl FnOnce(Row) -> Entity) -> Self {
        match return_type {
            ReturnType::Array => Record::Array(row),
            ReturnType::Object => Record::Object(Value::Object(row)),
            ReturnType::Entity => Record::Entity(entity(row)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        match self {
            Record::Array(row) => row.get(field),
            Record::Object(value) => value.get(field),
            Record::Entity(entity) => entity.get(field),
        }
    }

    /// The record's columns whatever its shape
    pub fn to_row(&self) -> Row {
        match self {
            Record::Array(row) => row.clone(),
            Record::Object(value) => value.as_object().cloned().unwrap_or_default(),
            Record::Entity(entity) => entity.to_row(),
        }
    }

    pub fn as_array(&self) -> Option<&Row> {
        match self {
            Record::Array(row) => Some(row),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Value> {
        match self {
            Record::Object(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Record::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn into_entity(self) -> Option<Entity> {
        match self {
            Record::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    /// Deserialize the columns into a typed value
    pub fn into_typed<T: DeserializeOwned>(self) -> ModelResult<T> {
        Ok(serde_json::from_value(Value::Object(self.to_row()))?)
    }
}

/// Result of `find`: one record for a scalar id, a list otherwise
#[derive(Debug, Clone, PartialEq)]
pub enum Found {
    Single(Option<Record>),
    List(Vec<Record>),
}

impl Found {
    /// The single record, or the first of a list
    pub fn into_single(self) -> Option<Record> {
        match self {
            Found::Single(record) => record,
            Found::List(records) => records.into_iter().next(),
        }
    }

    pub fn into_list(self) -> Vec<Record> {
        match self {
            Found::Single(record) => record.into_iter().collect(),
            Found::List(records) => records,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Found::Single(record) => usize::from(record.is_some()),
            Found::List(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
