//! Fully resolved SELECT handed to a store

use super::types::{OrderDirection, WhereCondition};

/// A read against one table, with soft-delete scoping already applied
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectStatement {
    pub table: String,
    /// Empty selects every column
    pub columns: Vec<String>,
    pub conditions: Vec<WhereCondition>,
    pub order_by: Vec<(String, OrderDirection)>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl SelectStatement {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Self::default()
        }
    }

    pub fn columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }

    pub fn conditions(mut self, conditions: Vec<WhereCondition>) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn order_by(mut self, order_by: Vec<(String, OrderDirection)>) -> Self {
        self.order_by = order_by;
        self
    }

    /// Add LIMIT/OFFSET; a zero limit means unbounded and drops the offset
    pub fn paginate(mut self, limit: usize, offset: usize) -> Self {
        if limit > 0 {
            self.limit = Some(limit);
            self.offset = Some(offset).filter(|offset| *offset > 0);
        }
        self
    }
}
