//! Query Builder WHERE clause operations

use serde_json::Value;

use super::builder::QueryBuilder;
use super::types::*;

impl QueryBuilder {
    /// Add an already-built condition
    pub fn push_condition(mut self, condition: WhereCondition) -> Self {
        self.where_conditions.push(condition);
        self
    }

    /// Add WHERE condition with equality; `null` becomes `IS NULL`
    pub fn where_eq<T: Into<Value>>(self, column: &str, value: T) -> Self {
        self.push_condition(WhereCondition::eq(column, value.into()))
    }

    /// Add WHERE condition with not equal
    pub fn where_ne<T: Into<Value>>(self, column: &str, value: T) -> Self {
        self.push_condition(WhereCondition::new(column, QueryOperator::NotEqual, value.into()))
    }

    /// Add WHERE condition with greater than
    pub fn where_gt<T: Into<Value>>(self, column: &str, value: T) -> Self {
        self.push_condition(WhereCondition::new(column, QueryOperator::GreaterThan, value.into()))
    }

    /// Add WHERE condition with less than
    pub fn where_lt<T: Into<Value>>(self, column: &str, value: T) -> Self {
        self.push_condition(WhereCondition::new(column, QueryOperator::LessThan, value.into()))
    }

    /// Add WHERE condition with LIKE
    pub fn where_like(self, column: &str, pattern: &str) -> Self {
        self.push_condition(WhereCondition::new(
            column,
            QueryOperator::Like,
            Value::String(pattern.to_string()),
        ))
    }

    /// Add WHERE condition with an operator given as text (`>=`, `LIKE`, ...)
    pub fn where_condition<T: Into<Value>>(
        self,
        column: &str,
        operator: &str,
        value: T,
    ) -> Result<Self, String> {
        let operator: QueryOperator = operator.parse()?;
        Ok(self.push_condition(WhereCondition::new(column, operator, value.into())))
    }

    /// Add WHERE condition with IN
    pub fn where_in<T: Into<Value>>(self, column: &str, values: Vec<T>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.push_condition(WhereCondition::is_in(column, values))
    }

    /// Add WHERE condition with NOT IN
    pub fn where_not_in<T: Into<Value>>(self, column: &str, values: Vec<T>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.push_condition(WhereCondition::not_in(column, values))
    }

    /// Add WHERE condition with IS NULL
    pub fn where_null(self, column: &str) -> Self {
        self.push_condition(WhereCondition::null(column))
    }

    /// Add WHERE condition with IS NOT NULL
    pub fn where_not_null(self, column: &str) -> Self {
        self.push_condition(WhereCondition::not_null(column))
    }
}
