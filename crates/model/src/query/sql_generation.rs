//! SQL rendering with `$n` placeholders
//!
//! Stores execute the structured statements directly; the rendered text is
//! what the model logs and exposes through `last_query()`.

use serde_json::Value;
use std::fmt;

use super::statement::SelectStatement;
use super::types::*;
use crate::store::Row;

/// Rendered statement and the values bound to its placeholders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub binds: Vec<Value>,
}

impl fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql)
    }
}

/// Placeholder numbering shared across the clauses of one statement
#[derive(Debug, Default)]
struct Params {
    binds: Vec<Value>,
}

impl Params {
    /// Bind a value, NULL is written inline
    fn push(&mut self, value: &Value) -> String {
        if value.is_null() {
            return "NULL".to_string();
        }
        self.binds.push(value.clone());
        format!("${}", self.binds.len())
    }

    fn finish(self, sql: String) -> CompiledQuery {
        CompiledQuery {
            sql,
            binds: self.binds,
        }
    }
}

impl SelectStatement {
    /// Generate SQL with parameter placeholders
    pub fn to_sql(&self) -> CompiledQuery {
        let mut sql = String::from("SELECT ");
        let mut params = Params::default();

        if self.columns.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.columns.join(", "));
        }
        sql.push_str(&format!(" FROM {}", self.table));

        build_where_clause(&mut sql, &mut params, &self.conditions);

        if !self.order_by.is_empty() {
            let order: Vec<String> = self
                .order_by
                .iter()
                .map(|(column, direction)| format!("{} {}", column, direction))
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&order.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        params.finish(sql)
    }
}

/// `SELECT COUNT(*)` over the given filters
pub fn count_sql(table: &str, conditions: &[WhereCondition]) -> CompiledQuery {
    let mut sql = format!("SELECT COUNT(*) AS numrows FROM {}", table);
    let mut params = Params::default();
    build_where_clause(&mut sql, &mut params, conditions);
    params.finish(sql)
}

/// INSERT of one or more rows; columns come from the first row
pub fn insert_sql(table: &str, rows: &[Row]) -> CompiledQuery {
    let mut params = Params::default();
    let columns: Vec<&String> = rows.first().map(|row| row.keys().collect()).unwrap_or_default();

    let column_list: Vec<&str> = columns.iter().map(|column| column.as_str()).collect();
    let mut sql = format!("INSERT INTO {} ({}) VALUES ", table, column_list.join(", "));

    let tuples: Vec<String> = rows
        .iter()
        .map(|row| {
            let placeholders: Vec<String> = columns
                .iter()
                .map(|column| params.push(row.get(column.as_str()).unwrap_or(&Value::Null)))
                .collect();
            format!("({})", placeholders.join(", "))
        })
        .collect();
    sql.push_str(&tuples.join(", "));

    params.finish(sql)
}

/// UPDATE setting every field of `set` on rows matching `conditions`
pub fn update_sql(table: &str, set: &Row, conditions: &[WhereCondition]) -> CompiledQuery {
    let mut params = Params::default();
    let assignments: Vec<String> = set
        .iter()
        .map(|(column, value)| format!("{} = {}", column, params.push(value)))
        .collect();

    let mut sql = format!("UPDATE {} SET {}", table, assignments.join(", "));
    build_where_clause(&mut sql, &mut params, conditions);
    params.finish(sql)
}

/// DELETE of rows matching `conditions`
pub fn delete_sql(table: &str, conditions: &[WhereCondition]) -> CompiledQuery {
    let mut sql = format!("DELETE FROM {}", table);
    let mut params = Params::default();
    build_where_clause(&mut sql, &mut params, conditions);
    params.finish(sql)
}

/// Helper method to build WHERE clauses
fn build_where_clause(sql: &mut String, params: &mut Params, conditions: &[WhereCondition]) {
    if conditions.is_empty() {
        return;
    }

    sql.push_str(" WHERE ");
    for (i, condition) in conditions.iter().enumerate() {
        if i > 0 {
            sql.push_str(" AND ");
        }

        sql.push_str(&condition.column);
        sql.push(' ');
        sql.push_str(&condition.operator.to_string());

        match condition.operator {
            QueryOperator::In | QueryOperator::NotIn => {
                let placeholders: Vec<String> =
                    condition.values.iter().map(|value| params.push(value)).collect();
                sql.push_str(&format!(" ({})", placeholders.join(", ")));
            }
            QueryOperator::IsNull | QueryOperator::IsNotNull => {}
            _ => {
                if let Some(ref value) = condition.value {
                    sql.push(' ');
                    sql.push_str(&params.push(value));
                }
            }
        }
    }
}
