//! In-process store
//!
//! Tables are declared with a fixed column list and an optional
//! auto-increment key. Comparisons follow loose SQL semantics: numbers and
//! numeric strings compare numerically, `NULL` never equals anything and
//! `LIKE` is case-insensitive.

use elif_validation::traits::value_text;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{Row, Store};
use crate::error::{ModelError, ModelResult};
use crate::query::{OrderDirection, QueryOperator, SelectStatement, WhereCondition};

/// Shared in-memory database. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Tables>>,
}

#[derive(Debug, Default)]
struct Tables {
    tables: BTreeMap<String, Table>,
    fail_next: Option<String>,
}

#[derive(Debug)]
struct Table {
    name: String,
    columns: Vec<String>,
    auto_increment: Option<String>,
    rows: Vec<Row>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> ModelResult<MutexGuard<'_, Tables>> {
        self.inner
            .lock()
            .map_err(|_| ModelError::Database("memory store lock poisoned".to_string()))
    }

    /// Create (or replace) a table. `auto_increment` names the key column
    /// that is filled from a counter when an insert leaves it empty.
    pub fn create_table(&self, name: &str, columns: &[&str], auto_increment: Option<&str>) -> ModelResult<()> {
        if let Some(key) = auto_increment {
            if !columns.contains(&key) {
                return Err(ModelError::Database(format!(
                    "Auto-increment column '{}' is not a column of '{}'",
                    key, name
                )));
            }
        }

        let table = Table {
            name: name.to_string(),
            columns: columns.iter().map(|column| column.to_string()).collect(),
            auto_increment: auto_increment.map(str::to_string),
            rows: Vec::new(),
            next_id: 1,
        };
        self.lock()?.tables.insert(name.to_string(), table);
        Ok(())
    }

    pub fn has_table(&self, name: &str) -> ModelResult<bool> {
        Ok(self.lock()?.tables.contains_key(name))
    }

    /// Insert rows directly, bypassing any model
    pub fn seed<I>(&self, table: &str, rows: I) -> ModelResult<()>
    where
        I: IntoIterator<Item = Row>,
    {
        let mut tables = self.lock()?;
        let table = tables.table_mut(table)?;
        for row in rows {
            table.insert(row)?;
        }
        Ok(())
    }

    /// Every stored row of a table, soft-deleted ones included
    pub fn rows(&self, table: &str) -> ModelResult<Vec<Row>> {
        Ok(self.lock()?.table(table)?.rows.clone())
    }

    /// Remove all rows and reset the key counter
    pub fn truncate(&self, table: &str) -> ModelResult<()> {
        let mut tables = self.lock()?;
        let table = tables.table_mut(table)?;
        table.rows.clear();
        table.next_id = 1;
        Ok(())
    }

    /// Make the next statement fail with a database error
    pub fn fail_next(&self, message: impl Into<String>) -> ModelResult<()> {
        self.lock()?.fail_next = Some(message.into());
        Ok(())
    }
}

impl Tables {
    fn take_failure(&mut self) -> ModelResult<()> {
        match self.fail_next.take() {
            Some(message) => Err(ModelError::Database(message)),
            None => Ok(()),
        }
    }

    fn table(&self, name: &str) -> ModelResult<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| ModelError::Database(format!("Table '{}' doesn't exist", name)))
    }

    fn table_mut(&mut self, name: &str) -> ModelResult<&mut Table> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| ModelError::Database(format!("Table '{}' doesn't exist", name)))
    }
}

impl Table {
    fn ensure_column(&self, column: &str) -> ModelResult<()> {
        if self.columns.iter().any(|known| known == column) {
            Ok(())
        } else {
            Err(ModelError::Database(format!(
                "Unknown column '{}' in table '{}'",
                column, self.name
            )))
        }
    }

    fn ensure_conditions(&self, conditions: &[WhereCondition]) -> ModelResult<()> {
        conditions
            .iter()
            .try_for_each(|condition| self.ensure_column(&condition.column))
    }

    fn insert(&mut self, mut row: Row) -> ModelResult<Option<Value>> {
        for column in row.keys() {
            self.ensure_column(column)?;
        }

        let id = match self.auto_increment.clone() {
            None => None,
            Some(key) => {
                let id = match row.get(&key) {
                    Some(id) if !id.is_null() => {
                        let duplicate = self
                            .rows
                            .iter()
                            .any(|existing| existing.get(&key).map_or(false, |v| loose_eq(v, id)));
                        if duplicate {
                            return Err(ModelError::Database(format!(
                                "Duplicate entry '{}' for key '{}'",
                                value_text(id),
                                key
                            )));
                        }
                        if let Some(n) = id.as_i64() {
                            self.next_id = self.next_id.max(n.saturating_add(1));
                        }
                        id.clone()
                    }
                    _ => {
                        let id = Value::from(self.next_id);
                        self.next_id = self.next_id.saturating_add(1);
                        row.insert(key.clone(), id.clone());
                        id
                    }
                };
                Some(id)
            }
        };

        for column in &self.columns {
            row.entry(column.clone()).or_insert(Value::Null);
        }
        self.rows.push(row);
        Ok(id)
    }
}

impl Store for MemoryStore {
    fn select(&self, query: &SelectStatement) -> ModelResult<Vec<Row>> {
        let mut tables = self.lock()?;
        tables.take_failure()?;
        let table = tables.table(&query.table)?;

        table.ensure_conditions(&query.conditions)?;
        for column in query.columns.iter().chain(query.order_by.iter().map(|(column, _)| column)) {
            table.ensure_column(column)?;
        }

        let mut rows: Vec<&Row> = table
            .rows
            .iter()
            .filter(|row| matches_all(row, &query.conditions))
            .collect();

        if !query.order_by.is_empty() {
            rows.sort_by(|a, b| {
                for (column, direction) in &query.order_by {
                    let ordering = sort_order(
                        a.get(column).unwrap_or(&Value::Null),
                        b.get(column).unwrap_or(&Value::Null),
                    );
                    let ordering = match direction {
                        OrderDirection::Asc => ordering,
                        OrderDirection::Desc => ordering.reverse(),
                    };
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                Ordering::Equal
            });
        }

        Ok(rows
            .into_iter()
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .map(|row| project(row, &query.columns))
            .collect())
    }

    fn count(&self, table: &str, conditions: &[WhereCondition]) -> ModelResult<u64> {
        let mut tables = self.lock()?;
        tables.take_failure()?;
        let table = tables.table(table)?;
        table.ensure_conditions(conditions)?;

        Ok(table.rows.iter().filter(|row| matches_all(row, conditions)).count() as u64)
    }

    fn insert(&self, table: &str, row: &Row) -> ModelResult<Option<Value>> {
        let mut tables = self.lock()?;
        tables.take_failure()?;
        tables.table_mut(table)?.insert(row.clone())
    }

    fn insert_batch(&self, table: &str, rows: &[Row]) -> ModelResult<u64> {
        let mut tables = self.lock()?;
        tables.take_failure()?;
        let table = tables.table_mut(table)?;

        // Reject the whole batch before writing anything
        for row in rows {
            for column in row.keys() {
                table.ensure_column(column)?;
            }
        }
        for row in rows {
            table.insert(row.clone())?;
        }
        Ok(rows.len() as u64)
    }

    fn update(&self, table: &str, set: &Row, conditions: &[WhereCondition]) -> ModelResult<u64> {
        let mut tables = self.lock()?;
        tables.take_failure()?;
        let table = tables.table_mut(table)?;

        table.ensure_conditions(conditions)?;
        for column in set.keys() {
            table.ensure_column(column)?;
        }

        let mut affected = 0;
        for row in table.rows.iter_mut().filter(|row| matches_all(row, conditions)) {
            for (column, value) in set {
                row.insert(column.clone(), value.clone());
            }
            affected += 1;
        }
        Ok(affected)
    }

    fn delete(&self, table: &str, conditions: &[WhereCondition]) -> ModelResult<u64> {
        let mut tables = self.lock()?;
        tables.take_failure()?;
        let table = tables.table_mut(table)?;
        table.ensure_conditions(conditions)?;

        let before = table.rows.len();
        table.rows.retain(|row| !matches_all(row, conditions));
        Ok((before - table.rows.len()) as u64)
    }
}

fn project(row: &Row, columns: &[String]) -> Row {
    if columns.is_empty() {
        return row.clone();
    }
    columns
        .iter()
        .map(|column| (column.clone(), row.get(column).cloned().unwrap_or(Value::Null)))
        .collect()
}

fn matches_all(row: &Row, conditions: &[WhereCondition]) -> bool {
    conditions.iter().all(|condition| matches(row, condition))
}

fn matches(row: &Row, condition: &WhereCondition) -> bool {
    let cell = row.get(&condition.column).unwrap_or(&Value::Null);
    let value = condition.value.as_ref();

    match condition.operator {
        QueryOperator::Equal => value.map_or(false, |value| loose_eq(cell, value)),
        QueryOperator::NotEqual => value.map_or(false, |value| {
            !cell.is_null() && !value.is_null() && !loose_eq(cell, value)
        }),
        QueryOperator::GreaterThan => compares(cell, value, |o| o == Ordering::Greater),
        QueryOperator::GreaterThanOrEqual => compares(cell, value, |o| o != Ordering::Less),
        QueryOperator::LessThan => compares(cell, value, |o| o == Ordering::Less),
        QueryOperator::LessThanOrEqual => compares(cell, value, |o| o != Ordering::Greater),
        QueryOperator::Like => value.map_or(false, |pattern| {
            !cell.is_null() && like_match(&value_text(cell), &value_text(pattern))
        }),
        QueryOperator::NotLike => value.map_or(false, |pattern| {
            !cell.is_null() && !like_match(&value_text(cell), &value_text(pattern))
        }),
        QueryOperator::In => condition.values.iter().any(|value| loose_eq(cell, value)),
        QueryOperator::NotIn => {
            !cell.is_null() && !condition.values.iter().any(|value| loose_eq(cell, value))
        }
        QueryOperator::IsNull => cell.is_null(),
        QueryOperator::IsNotNull => !cell.is_null(),
    }
}

fn compares(cell: &Value, value: Option<&Value>, accept: impl Fn(Ordering) -> bool) -> bool {
    value.and_then(|value| compare(cell, value)).map_or(false, accept)
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// SQL comparison; `None` whenever either side is NULL
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    if a.is_null() || b.is_null() {
        return None;
    }
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y),
        _ => Some(value_text(a).cmp(&value_text(b))),
    }
}

fn loose_eq(a: &Value, b: &Value) -> bool {
    compare(a, b) == Some(Ordering::Equal)
}

/// Ordering for ORDER BY: NULLs first, then SQL comparison
fn sort_order(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => compare(a, b).unwrap_or(Ordering::Equal),
    }
}

/// Case-insensitive LIKE with `%` and `_` wildcards
fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.to_lowercase().chars().collect();
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();

    let (mut t, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '_' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == '%' {
            backtrack = Some((p, t));
            p += 1;
        } else if let Some((star, matched)) = backtrack {
            p = star + 1;
            t = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }

    while p < pattern.len() && pattern[p] == '%' {
        p += 1;
    }
    p == pattern.len()
}
