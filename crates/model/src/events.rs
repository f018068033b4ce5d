//! Lifecycle callbacks
//!
//! Callbacks are registered per event on the model configuration and run
//! in registration order. Each receives the mutable payload; whatever it
//! leaves in `data` or `rows` is what the model continues with. The first
//! failing callback aborts the operation.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::event_error::EventError;
use crate::model::primary_key::Keys;
use crate::store::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModelEvent {
    BeforeInsert,
    AfterInsert,
    BeforeUpdate,
    AfterUpdate,
    AfterFind,
    AfterDelete,
}

impl fmt::Display for ModelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelEvent::BeforeInsert => "beforeInsert",
            ModelEvent::AfterInsert => "afterInsert",
            ModelEvent::BeforeUpdate => "beforeUpdate",
            ModelEvent::AfterUpdate => "afterUpdate",
            ModelEvent::AfterFind => "afterFind",
            ModelEvent::AfterDelete => "afterDelete",
        };
        write!(f, "{}", name)
    }
}

/// Payload handed to callbacks
#[derive(Debug, Clone, PartialEq)]
pub struct EventData {
    pub event: ModelEvent,
    /// Ids the operation was called with
    pub id: Keys,
    /// Row being written (insert/update events)
    pub data: Option<Row>,
    /// Rows read (afterFind)
    pub rows: Vec<Row>,
    /// New id for afterInsert, `true` for afterUpdate, affected count for afterDelete
    pub result: Option<Value>,
    /// Whether a delete was a purge
    pub purge: bool,
}

impl EventData {
    pub fn new(event: ModelEvent) -> Self {
        Self {
            event,
            id: Keys::None,
            data: None,
            rows: Vec::new(),
            result: None,
            purge: false,
        }
    }

    pub fn id(mut self, id: Keys) -> Self {
        self.id = id;
        self
    }

    pub fn data(mut self, data: Row) -> Self {
        self.data = Some(data);
        self
    }

    pub fn rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    pub fn result(mut self, result: impl Into<Value>) -> Self {
        self.result = Some(result.into());
        self
    }

    pub fn purge(mut self, purge: bool) -> Self {
        self.purge = purge;
        self
    }
}

/// Callback signature
pub type Callback = Arc<dyn Fn(&mut EventData) -> Result<(), EventError> + Send + Sync>;

/// Ordered callbacks per event
#[derive(Clone, Default)]
pub struct EventRegistry {
    callbacks: BTreeMap<ModelEvent, Vec<Callback>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, event: ModelEvent, callback: F)
    where
        F: Fn(&mut EventData) -> Result<(), EventError> + Send + Sync + 'static,
    {
        self.callbacks.entry(event).or_default().push(Arc::new(callback));
    }

    pub fn has(&self, event: ModelEvent) -> bool {
        self.count(event) > 0
    }

    pub fn count(&self, event: ModelEvent) -> usize {
        self.callbacks.get(&event).map_or(0, Vec::len)
    }

    /// Run every callback for `data.event` in order
    pub fn dispatch(&self, data: &mut EventData) -> Result<(), EventError> {
        let Some(callbacks) = self.callbacks.get(&data.event) else {
            return Ok(());
        };

        for callback in callbacks {
            callback(data)?;
        }
        Ok(())
    }
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: BTreeMap<String, usize> = self
            .callbacks
            .iter()
            .map(|(event, callbacks)| (event.to_string(), callbacks.len()))
            .collect();
        f.debug_struct("EventRegistry").field("callbacks", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[test]
    fn test_callbacks_run_in_order_and_mutate_payload() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut registry = EventRegistry::new();

        let log = seen.clone();
        registry.register(ModelEvent::BeforeInsert, move |data| {
            log.lock().unwrap().push("first");
            if let Some(row) = data.data.as_mut() {
                row.insert("name".to_string(), json!("Changed"));
            }
            Ok(())
        });
        let log = seen.clone();
        registry.register(ModelEvent::BeforeInsert, move |data| {
            log.lock().unwrap().push("second");
            assert_eq!(data.data.as_ref().unwrap()["name"], "Changed");
            Ok(())
        });

        let row = json!({ "name": "Original" }).as_object().cloned().unwrap();
        let mut data = EventData::new(ModelEvent::BeforeInsert).data(row);
        registry.dispatch(&mut data).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
        assert_eq!(data.data.unwrap()["name"], "Changed");
    }

    #[test]
    fn test_failure_stops_dispatch() {
        let calls = Arc::new(Mutex::new(0));
        let mut registry = EventRegistry::new();

        registry.register(ModelEvent::AfterDelete, |_| {
            Err(EventError::propagation_stopped("nope"))
        });
        let counter = calls.clone();
        registry.register(ModelEvent::AfterDelete, move |_| {
            *counter.lock().unwrap() += 1;
            Ok(())
        });

        let mut data = EventData::new(ModelEvent::AfterDelete);
        assert!(registry.dispatch(&mut data).is_err());
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_event_names() {
        assert_eq!(ModelEvent::BeforeInsert.to_string(), "beforeInsert");
        assert_eq!(ModelEvent::AfterFind.to_string(), "afterFind");
    }
}
