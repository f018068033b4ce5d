//! Query Builder Types - Core types and enums for query building

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Query operator types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Like,
    NotLike,
    In,
    NotIn,
    IsNull,
    IsNotNull,
}

impl fmt::Display for QueryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOperator::Equal => write!(f, "="),
            QueryOperator::NotEqual => write!(f, "!="),
            QueryOperator::GreaterThan => write!(f, ">"),
            QueryOperator::GreaterThanOrEqual => write!(f, ">="),
            QueryOperator::LessThan => write!(f, "<"),
            QueryOperator::LessThanOrEqual => write!(f, "<="),
            QueryOperator::Like => write!(f, "LIKE"),
            QueryOperator::NotLike => write!(f, "NOT LIKE"),
            QueryOperator::In => write!(f, "IN"),
            QueryOperator::NotIn => write!(f, "NOT IN"),
            QueryOperator::IsNull => write!(f, "IS NULL"),
            QueryOperator::IsNotNull => write!(f, "IS NOT NULL"),
        }
    }
}

impl FromStr for QueryOperator {
    type Err = String;

    /// Operators accepted by `where_condition`
    fn from_str(operator: &str) -> Result<Self, Self::Err> {
        match operator.trim().to_ascii_uppercase().as_str() {
            "=" => Ok(QueryOperator::Equal),
            "!=" | "<>" => Ok(QueryOperator::NotEqual),
            ">" => Ok(QueryOperator::GreaterThan),
            ">=" => Ok(QueryOperator::GreaterThanOrEqual),
            "<" => Ok(QueryOperator::LessThan),
            "<=" => Ok(QueryOperator::LessThanOrEqual),
            "LIKE" => Ok(QueryOperator::Like),
            "NOT LIKE" => Ok(QueryOperator::NotLike),
            other => Err(format!("Unsupported operator `{}`", other)),
        }
    }
}

/// Where clause condition
#[derive(Debug, Clone, PartialEq)]
pub struct WhereCondition {
    pub column: String,
    pub operator: QueryOperator,
    pub value: Option<Value>,
    pub values: Vec<Value>, // For IN, NOT IN
}

impl WhereCondition {
    pub fn new(column: &str, operator: QueryOperator, value: Value) -> Self {
        Self {
            column: column.to_string(),
            operator,
            value: Some(value),
            values: Vec::new(),
        }
    }

    /// Equality; a null value becomes `IS NULL`
    pub fn eq(column: &str, value: Value) -> Self {
        if value.is_null() {
            return Self::null(column);
        }
        Self::new(column, QueryOperator::Equal, value)
    }

    pub fn is_in(column: &str, values: Vec<Value>) -> Self {
        Self {
            column: column.to_string(),
            operator: QueryOperator::In,
            value: None,
            values,
        }
    }

    pub fn not_in(column: &str, values: Vec<Value>) -> Self {
        Self {
            operator: QueryOperator::NotIn,
            ..Self::is_in(column, values)
        }
    }

    pub fn null(column: &str) -> Self {
        Self {
            column: column.to_string(),
            operator: QueryOperator::IsNull,
            value: None,
            values: Vec::new(),
        }
    }

    pub fn not_null(column: &str) -> Self {
        Self {
            operator: QueryOperator::IsNotNull,
            ..Self::null(column)
        }
    }
}

/// Order by direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDirection::Asc => write!(f, "ASC"),
            OrderDirection::Desc => write!(f, "DESC"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operator_round_trip_through_text() {
        for op in ["=", "!=", ">", ">=", "<", "<=", "LIKE", "NOT LIKE"] {
            let parsed: QueryOperator = op.parse().unwrap();
            assert_eq!(parsed.to_string(), op);
        }
        assert_eq!("<>".parse::<QueryOperator>(), Ok(QueryOperator::NotEqual));
        assert_eq!("like".parse::<QueryOperator>(), Ok(QueryOperator::Like));
        assert!("BETWIXT".parse::<QueryOperator>().is_err());
    }

    #[test]
    fn test_eq_with_null_becomes_is_null() {
        let condition = WhereCondition::eq("deleted_at", Value::Null);
        assert_eq!(condition.operator, QueryOperator::IsNull);

        let condition = WhereCondition::eq("id", json!(1));
        assert_eq!(condition.value, Some(json!(1)));
    }
}
