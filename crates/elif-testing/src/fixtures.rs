//! Fixture models
//!
//! Configurations for the tables `TestDatabase` seeds. Each mirrors one
//! support model of the model suite: plain jobs, soft-deleting users,
//! validated jobs, entity-returning jobs and so on.

use std::sync::{Arc, Mutex};

use elif_model::{DateFormat, EventData, EventError, ModelConfig, ModelEvent, ReturnType};
use elif_validation::{FieldRules, Messages, RuleSet};

use crate::TestResult;

pub use elif_model::models::students;

/// Jobs without validation or soft deletes
pub fn job() -> ModelConfig {
    ModelConfig::new("job")
        .return_type(ReturnType::Object)
        .allowed_fields(["name", "description"])
        .date_format(DateFormat::Int)
}

/// Users with flag soft deletes
pub fn user() -> ModelConfig {
    ModelConfig::new("user")
        .return_type(ReturnType::Object)
        .allowed_fields(["name", "email", "country", "deleted"])
        .soft_deletes("deleted")
}

/// Key/value rows without a primary key
pub fn secondary() -> ModelConfig {
    ModelConfig::new("secondary")
        .primary_key("")
        .return_type(ReturnType::Object)
        .allowed_fields(["key", "value"])
}

/// Jobs returned as entities with timestamp-aware date columns
pub fn entity() -> ModelConfig {
    ModelConfig::new("job")
        .return_type(ReturnType::Entity)
        .allowed_fields(["name", "description", "created_at"])
        .timestamps("created_at", "updated_at")
}

fn valid_rules(name: FieldRules) -> TestResult<RuleSet> {
    Ok(RuleSet::new()
        .field("name", name)
        .parse_field("token", "in_list[{id}]")?)
}

/// Jobs validated with model-level custom messages
pub fn valid() -> TestResult<ModelConfig> {
    let messages = Messages::new()
        .with("name", "required", "You forgot to name the baby.")
        .with("name", "min_length", "Too short, man!");

    Ok(ModelConfig::new("job")
        .return_type(ReturnType::Object)
        .allowed_fields(["name", "description"])
        .date_format(DateFormat::Int)
        .validation_rules(valid_rules(FieldRules::parse("required|min_length[3]")?)?)
        .validation_messages(messages))
}

/// Jobs validated with a labelled rule carrying its own messages
pub fn valid_errors() -> TestResult<ModelConfig> {
    let name = FieldRules::parse("required|min_length[10]")?
        .label("Name")
        .error("min_length", "Minimum Length Error");

    Ok(ModelConfig::new("job")
        .return_type(ReturnType::Object)
        .allowed_fields(["name", "description"])
        .date_format(DateFormat::Int)
        .validation_rules(valid_rules(name)?))
}

/// Events seen by a fixture's callbacks
#[derive(Debug, Clone, Default)]
pub struct EventTokens {
    seen: Arc<Mutex<Vec<ModelEvent>>>,
}

impl EventTokens {
    fn record(&self, event: ModelEvent) -> Result<(), EventError> {
        self.seen
            .lock()
            .map_err(|_| EventError::observer("event token lock poisoned"))?
            .push(event);
        Ok(())
    }

    pub fn has_token(&self, event: ModelEvent) -> bool {
        self.seen
            .lock()
            .map(|seen| seen.contains(&event))
            .unwrap_or(false)
    }

    pub fn tokens(&self) -> Vec<ModelEvent> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }
}

/// Users with a token-recording callback on every event
pub fn event() -> (ModelConfig, EventTokens) {
    let tokens = EventTokens::default();

    let config = [
        ModelEvent::BeforeInsert,
        ModelEvent::AfterInsert,
        ModelEvent::BeforeUpdate,
        ModelEvent::AfterUpdate,
        ModelEvent::AfterFind,
        ModelEvent::AfterDelete,
    ]
    .into_iter()
    .fold(
        ModelConfig::new("user")
            .allowed_fields(["name", "email", "country", "deleted"]),
        |config, event| {
            let tokens = tokens.clone();
            config.on(event, move |data: &mut EventData| tokens.record(data.event))
        },
    );

    (config, tokens)
}
