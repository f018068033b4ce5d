//! Query Builder - pending clauses collected between top-level model calls

use serde_json::Value;

use super::types::*;
use crate::store::Row;

/// Clauses staged for the next statement: projection, filters, ordering
/// and data queued with `set()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBuilder {
    pub(crate) select_fields: Vec<String>,
    pub(crate) where_conditions: Vec<WhereCondition>,
    pub(crate) order_by: Vec<(String, OrderDirection)>,
    pub(crate) set_data: Row,
}

impl QueryBuilder {
    /// Create a new query builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the selected columns
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select_fields.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Add ORDER BY clause
    pub fn order_by(mut self, column: &str, direction: OrderDirection) -> Self {
        self.order_by.push((column.to_string(), direction));
        self
    }

    /// Stage a field for the next insert/update
    pub fn set<T: Into<Value>>(mut self, column: &str, value: T) -> Self {
        self.set_data.insert(column.to_string(), value.into());
        self
    }

    /// Stage several fields at once
    pub fn set_row(mut self, row: Row) -> Self {
        self.set_data.extend(row);
        self
    }

    pub fn select_fields(&self) -> &[String] {
        &self.select_fields
    }

    pub fn where_conditions(&self) -> &[WhereCondition] {
        &self.where_conditions
    }

    pub fn order(&self) -> &[(String, OrderDirection)] {
        &self.order_by
    }

    pub fn set_data(&self) -> &Row {
        &self.set_data
    }

    /// Values that would be bound if the pending clauses ran now
    pub fn binds(&self) -> Vec<Value> {
        let staged = self.set_data.values().filter(|value| !value.is_null()).cloned();
        let filters = self.where_conditions.iter().flat_map(|condition| {
            condition
                .value
                .iter()
                .chain(condition.values.iter())
                .cloned()
                .collect::<Vec<_>>()
        });
        staged.chain(filters).collect()
    }

    /// Nothing pending at all
    pub fn is_empty(&self) -> bool {
        self.select_fields.is_empty()
            && self.where_conditions.is_empty()
            && self.order_by.is_empty()
            && self.set_data.is_empty()
    }
}
