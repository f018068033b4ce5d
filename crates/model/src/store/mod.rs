//! Storage contract the model executes against
//!
//! The model resolves every call into a structured statement (table,
//! conditions, data) and hands it to a `Store`. Drivers translate those into
//! their own dialect; `MemoryStore` evaluates them in process.

pub mod memory;

use serde_json::{Map, Value};

use crate::error::ModelResult;
use crate::query::{SelectStatement, WhereCondition};

pub use memory::MemoryStore;

/// One database row: column name to value
pub type Row = Map<String, Value>;

/// Statement execution backing a model.
pub trait Store {
    /// Rows matching the statement, in store order unless it orders them
    fn select(&self, query: &SelectStatement) -> ModelResult<Vec<Row>>;

    /// Number of rows matching the conditions
    fn count(&self, table: &str, conditions: &[WhereCondition]) -> ModelResult<u64>;

    /// Insert one row, returning the generated key if the table has one
    fn insert(&self, table: &str, row: &Row) -> ModelResult<Option<Value>>;

    /// Insert several rows, returning how many were written
    fn insert_batch(&self, table: &str, rows: &[Row]) -> ModelResult<u64> {
        let mut written = 0;
        for row in rows {
            self.insert(table, row)?;
            written += 1;
        }
        Ok(written)
    }

    /// Apply `set` to matching rows, returning the affected count
    fn update(&self, table: &str, set: &Row, conditions: &[WhereCondition]) -> ModelResult<u64>;

    /// Remove matching rows, returning the affected count
    fn delete(&self, table: &str, conditions: &[WhereCondition]) -> ModelResult<u64>;
}

impl<S: Store + ?Sized> Store for &S {
    fn select(&self, query: &SelectStatement) -> ModelResult<Vec<Row>> {
        (**self).select(query)
    }

    fn count(&self, table: &str, conditions: &[WhereCondition]) -> ModelResult<u64> {
        (**self).count(table, conditions)
    }

    fn insert(&self, table: &str, row: &Row) -> ModelResult<Option<Value>> {
        (**self).insert(table, row)
    }

    fn insert_batch(&self, table: &str, rows: &[Row]) -> ModelResult<u64> {
        (**self).insert_batch(table, rows)
    }

    fn update(&self, table: &str, set: &Row, conditions: &[WhereCondition]) -> ModelResult<u64> {
        (**self).update(table, set, conditions)
    }

    fn delete(&self, table: &str, conditions: &[WhereCondition]) -> ModelResult<u64> {
        (**self).delete(table, conditions)
    }
}
