//! Model System - the data-mapper façade
//!
//! A `Model` pairs a [`ModelConfig`] with a [`Store`] and turns calls such as
//! `find`, `insert` or `delete` into validated, event-wrapped statements.
//!
//! - `state`: one-shot query state consumed by every top-level call
//! - `primary_key`: the id argument type
//! - `record`: read result shapes
//! - `crud_operations`: insert, update, save and delete
//! - `query_methods`: find, find_all, first, count and chunk
//! - `lifecycle`: event dispatch, timestamps and field protection
//! - `validation`: rule resolution and cleaning

pub mod crud_operations;
pub mod lifecycle;
pub mod primary_key;
pub mod query_methods;
pub mod record;
pub mod state;
pub mod validation;

use elif_validation::{RuleEngine, ValidationConfig, ValidationEngine, ValidationErrors};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::config::{ModelConfig, ReturnType};
use crate::entity::Entity;
use crate::error::{ModelError, ModelResult};
use crate::query::{CompiledQuery, OrderDirection, QueryBuilder, QueryOperator, WhereCondition};
use crate::store::{Row, Store};

pub use primary_key::Keys;
pub use record::{Found, Record};
pub use state::{DeletedScope, QueryState};
pub use validation::clean_validation_rules;

/// Data accepted by `insert` and `update`
pub trait IntoPayload {
    /// `None` means "use the data staged with `set()`"
    fn into_payload(self) -> ModelResult<Option<Row>>;
}

impl IntoPayload for Row {
    fn into_payload(self) -> ModelResult<Option<Row>> {
        Ok(Some(self).filter(|row| !row.is_empty()))
    }
}

impl IntoPayload for Option<Row> {
    fn into_payload(self) -> ModelResult<Option<Row>> {
        Ok(self.filter(|row| !row.is_empty()))
    }
}

impl IntoPayload for () {
    fn into_payload(self) -> ModelResult<Option<Row>> {
        Ok(None)
    }
}

impl IntoPayload for Value {
    fn into_payload(self) -> ModelResult<Option<Row>> {
        match self {
            Value::Null => Ok(None),
            Value::Object(row) => row.into_payload(),
            other => Err(ModelError::Serialization(format!(
                "expected an object to write, got {}",
                other
            ))),
        }
    }
}

impl IntoPayload for &Entity {
    fn into_payload(self) -> ModelResult<Option<Row>> {
        self.to_row().into_payload()
    }
}

impl IntoPayload for Entity {
    fn into_payload(self) -> ModelResult<Option<Row>> {
        (&self).into_payload()
    }
}

/// A configured model bound to a store
pub struct Model<S: Store> {
    store: S,
    config: ModelConfig,
    engine: Arc<dyn ValidationEngine>,
    validation_config: ValidationConfig,
    state: QueryState,
    errors: ValidationErrors,
    last_query: Option<CompiledQuery>,
    insert_id: Option<Value>,
}

impl<S: Store> Model<S> {
    pub fn new(store: S, config: ModelConfig) -> Self {
        Self {
            store,
            config,
            engine: Arc::new(RuleEngine::new()),
            validation_config: ValidationConfig::new(),
            state: QueryState::default(),
            errors: ValidationErrors::new(),
            last_query: None,
            insert_id: None,
        }
    }

    /// Replace the validation engine
    pub fn with_engine(mut self, engine: Arc<dyn ValidationEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// Attach the configuration validation groups are resolved from
    pub fn with_validation_config(mut self, config: ValidationConfig) -> Self {
        self.validation_config = config;
        self
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validation errors from the last write
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Clauses staged for the next call
    pub fn builder(&self) -> &QueryBuilder {
        &self.state.builder
    }

    /// The last statement sent to the store
    pub fn last_query(&self) -> Option<&CompiledQuery> {
        self.last_query.as_ref()
    }

    /// Key produced by the last insert
    pub fn insert_id(&self) -> Option<&Value> {
        self.insert_id.as_ref()
    }

    // One-shot modifiers

    /// Include soft-deleted rows in the next read
    pub fn with_deleted(&mut self) -> &mut Self {
        self.state.deleted = DeletedScope::Include;
        self
    }

    /// Read only soft-deleted rows in the next read
    pub fn only_deleted(&mut self) -> &mut Self {
        self.state.deleted = DeletedScope::Only;
        self
    }

    pub fn as_array(&mut self) -> &mut Self {
        self.state.return_type = Some(ReturnType::Array);
        self
    }

    pub fn as_object(&mut self) -> &mut Self {
        self.state.return_type = Some(ReturnType::Object);
        self
    }

    pub fn as_entity(&mut self) -> &mut Self {
        self.state.return_type = Some(ReturnType::Entity);
        self
    }

    /// Turn field protection on or off for the next write
    pub fn protect(&mut self, protect: bool) -> &mut Self {
        self.state.protect = Some(protect);
        self
    }

    /// Skip (or force) validation for the next write
    pub fn skip_validation(&mut self, skip: bool) -> &mut Self {
        self.state.skip_validation = Some(skip);
        self
    }

    // Query builder pass-throughs

    fn chain(&mut self, apply: impl FnOnce(QueryBuilder) -> QueryBuilder) -> &mut Self {
        let builder = std::mem::take(&mut self.state.builder);
        self.state.builder = apply(builder);
        self
    }

    pub fn select<I, C>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.chain(|builder| builder.select(columns))
    }

    pub fn where_eq<T: Into<Value>>(&mut self, column: &str, value: T) -> &mut Self {
        self.chain(|builder| builder.where_eq(column, value))
    }

    /// Filter with a textual operator; an unknown operator fails the next call
    pub fn where_condition<T: Into<Value>>(&mut self, column: &str, operator: &str, value: T) -> &mut Self {
        match operator.parse::<QueryOperator>() {
            Ok(operator) => self.chain(|builder| {
                builder.push_condition(WhereCondition::new(column, operator, value.into()))
            }),
            Err(message) => {
                self.state.error.get_or_insert(message);
                self
            }
        }
    }

    pub fn where_in<T: Into<Value>>(&mut self, column: &str, values: Vec<T>) -> &mut Self {
        self.chain(|builder| builder.where_in(column, values))
    }

    pub fn where_not_in<T: Into<Value>>(&mut self, column: &str, values: Vec<T>) -> &mut Self {
        self.chain(|builder| builder.where_not_in(column, values))
    }

    pub fn where_null(&mut self, column: &str) -> &mut Self {
        self.chain(|builder| builder.where_null(column))
    }

    pub fn where_not_null(&mut self, column: &str) -> &mut Self {
        self.chain(|builder| builder.where_not_null(column))
    }

    pub fn where_like(&mut self, column: &str, pattern: &str) -> &mut Self {
        self.chain(|builder| builder.where_like(column, pattern))
    }

    pub fn order_by(&mut self, column: &str, direction: OrderDirection) -> &mut Self {
        self.chain(|builder| builder.order_by(column, direction))
    }

    /// Stage fields for the next insert/update called without data
    pub fn set(&mut self, row: Row) -> &mut Self {
        self.chain(|builder| builder.set_row(row))
    }

    pub fn set_field<T: Into<Value>>(&mut self, column: &str, value: T) -> &mut Self {
        self.chain(|builder| builder.set(column, value))
    }

    // Internals shared by the operation modules

    /// Consume the query state for a top-level call
    pub(crate) fn begin(&mut self) -> ModelResult<QueryState> {
        let state = std::mem::take(&mut self.state);
        tracing::trace!(table = %self.config.table, "query state reset");

        match state.error {
            Some(message) => Err(ModelError::Query(message)),
            None => Ok(state),
        }
    }

    /// Primary key column, required by keyed operations
    pub(crate) fn primary_key(&self) -> ModelResult<&str> {
        if self.config.primary_key.is_empty() {
            return Err(ModelError::Configuration(format!(
                "model for table `{}` has no primary key defined",
                self.config.table
            )));
        }
        Ok(&self.config.primary_key)
    }

    /// Remember and log a statement about to run
    pub(crate) fn record_query(&mut self, query: CompiledQuery) {
        tracing::debug!(
            table = %self.config.table,
            sql = %query.sql,
            binds = query.binds.len(),
            "executing statement"
        );
        self.last_query = Some(query);
    }
}

impl<S: Store> fmt::Debug for Model<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("errors", &self.errors)
            .field("last_query", &self.last_query)
            .finish_non_exhaustive()
    }
}
