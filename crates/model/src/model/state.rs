//! Per-call query state
//!
//! Everything a caller chains before a top-level call lives here. The model
//! takes the whole state at the start of each call, so nothing survives into
//! the next one whether the call succeeds, fails validation or errors.

use crate::config::ReturnType;
use crate::query::QueryBuilder;

/// Which rows a soft-delete model reads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeletedScope {
    /// Live rows only
    #[default]
    Exclude,
    /// Live and deleted rows
    Include,
    /// Deleted rows only
    Only,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    pub builder: QueryBuilder,
    pub deleted: DeletedScope,
    /// One-shot override of the configured return type
    pub return_type: Option<ReturnType>,
    /// One-shot override of field protection
    pub protect: Option<bool>,
    /// One-shot override of the configured skip-validation flag
    pub skip_validation: Option<bool>,
    /// Builder misuse reported by the next call
    pub error: Option<String>,
}

impl QueryState {
    /// Nothing staged at all
    pub fn is_pristine(&self) -> bool {
        *self == Self::default()
    }
}
