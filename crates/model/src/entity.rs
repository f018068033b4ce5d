//! Entities with field-level dirty tracking
//!
//! An entity keeps two maps: the current attributes and the snapshot taken
//! when it was loaded or last saved. A field is dirty when the two differ.
//! Fields that were never loaded are simply absent from both, so saving an
//! entity built from a narrowed `select` cannot overwrite them.

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

use crate::config::DateFormat;
use crate::error::{ModelError, ModelResult};
use crate::store::Row;
use crate::timestamp;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entity {
    attributes: Row,
    original: Row,
    dates: BTreeSet<String>,
    date_format: DateFormat,
}

impl Entity {
    /// An empty entity; every field set on it is dirty
    pub fn new() -> Self {
        Self::default()
    }

    /// Entity loaded from storage, clean
    pub fn from_row(row: Row) -> Self {
        Self {
            original: row.clone(),
            attributes: row,
            ..Self::default()
        }
    }

    /// Treat `fields` as dates stored in `format`
    pub fn with_dates<I, S>(mut self, fields: I, format: DateFormat) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dates = fields.into_iter().map(Into::into).collect();
        self.date_format = format;
        self
    }

    /// Unsaved entity from any serializable value; all its fields are dirty
    pub fn from_typed<T: Serialize>(value: &T) -> ModelResult<Self> {
        match serde_json::to_value(value)? {
            Value::Object(attributes) => Ok(Self {
                attributes,
                ..Self::default()
            }),
            other => Err(ModelError::Serialization(format!(
                "entity source must serialize to an object, got {}",
                other
            ))),
        }
    }

    /// Deserialize the current attributes into a typed value
    pub fn into_typed<T: DeserializeOwned>(&self) -> ModelResult<T> {
        Ok(serde_json::from_value(Value::Object(self.attributes.clone()))?)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
    }

    pub fn has(&self, field: &str) -> bool {
        self.attributes.contains_key(field)
    }

    /// Assign a field. Date fields accept any parseable date and are stored
    /// in the entity's date format.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> ModelResult<()> {
        let mut value = value.into();

        if self.dates.contains(field) && !value.is_null() {
            let moment = timestamp::parse(&value).ok_or_else(|| {
                ModelError::Serialization(format!("`{}` is not a valid date for `{}`", value, field))
            })?;
            value = timestamp::render(moment, self.date_format);
        }

        self.attributes.insert(field.to_string(), value);
        Ok(())
    }

    /// Drop a field from the entity
    pub fn unset(&mut self, field: &str) -> Option<Value> {
        self.attributes.remove(field)
    }

    /// A date field as a moment
    pub fn date(&self, field: &str) -> Option<NaiveDateTime> {
        self.attributes.get(field).and_then(timestamp::parse)
    }

    pub fn is_dirty(&self, field: &str) -> bool {
        self.attributes.get(field) != self.original.get(field)
    }

    pub fn has_changed(&self) -> bool {
        self.attributes
            .keys()
            .chain(self.original.keys())
            .any(|field| self.is_dirty(field))
    }

    /// Fields whose value differs from the snapshot
    pub fn dirty(&self) -> Row {
        self.attributes
            .iter()
            .filter(|(field, value)| self.original.get(field.as_str()) != Some(*value))
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect()
    }

    pub fn attributes(&self) -> &Row {
        &self.attributes
    }

    /// Current attributes as a row
    pub fn to_row(&self) -> Row {
        self.attributes.clone()
    }

    /// Accept the current attributes as persisted
    pub fn sync_original(&mut self) {
        self.original = self.attributes.clone();
    }
}
