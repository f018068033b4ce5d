//! Query Builder Module - pending clauses, resolved statements and SQL rendering

pub mod builder;
pub mod sql_generation;
pub mod statement;
pub mod types;
pub mod where_clause;

pub use builder::QueryBuilder;
pub use sql_generation::{count_sql, delete_sql, insert_sql, update_sql, CompiledQuery};
pub use statement::SelectStatement;
pub use types::{OrderDirection, QueryOperator, WhereCondition};
