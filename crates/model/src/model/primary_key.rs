//! Primary key arguments
//!
//! Every id-taking operation accepts "no id", a single id or a list of ids.
//! `Keys` is that argument; the `From` impls let callers pass plain values.

use serde_json::Value;

use crate::query::WhereCondition;

/// The id argument of `find`, `update` and `delete`
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Keys {
    /// No id; the operation falls back to pending where clauses
    #[default]
    None,
    /// A single primary key value
    One(Value),
    /// Several primary key values
    Many(Vec<Value>),
}

impl Keys {
    pub fn is_none(&self) -> bool {
        matches!(self, Keys::None)
    }

    /// Whether a single scalar id was given
    pub fn is_one(&self) -> bool {
        matches!(self, Keys::One(_))
    }

    /// All ids as a flat list
    pub fn values(&self) -> Vec<Value> {
        match self {
            Keys::None => Vec::new(),
            Keys::One(value) => vec![value.clone()],
            Keys::Many(values) => values.clone(),
        }
    }

    /// Condition selecting these ids on `column`
    pub fn condition(&self, column: &str) -> Option<WhereCondition> {
        match self {
            Keys::None => None,
            Keys::One(value) => Some(WhereCondition::eq(column, value.clone())),
            Keys::Many(values) => Some(WhereCondition::is_in(column, values.clone())),
        }
    }

    /// The id as a JSON value for event payloads
    pub fn to_value(&self) -> Value {
        match self {
            Keys::None => Value::Null,
            Keys::One(value) => value.clone(),
            Keys::Many(values) => Value::Array(values.clone()),
        }
    }
}

impl From<Value> for Keys {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Keys::None,
            Value::Array(values) => Keys::Many(values),
            other => Keys::One(other),
        }
    }
}

impl From<()> for Keys {
    fn from(_: ()) -> Self {
        Keys::None
    }
}

impl From<&str> for Keys {
    fn from(value: &str) -> Self {
        Keys::One(Value::from(value))
    }
}

impl From<String> for Keys {
    fn from(value: String) -> Self {
        Keys::One(Value::from(value))
    }
}

macro_rules! keys_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Keys {
                fn from(value: $ty) -> Self {
                    Keys::One(Value::from(value))
                }
            }
        )*
    };
}

keys_from_integer!(i32, i64, u32, u64, usize);

impl<T: Into<Value>> From<Vec<T>> for Keys {
    fn from(values: Vec<T>) -> Self {
        Keys::Many(values.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<Keys>> From<Option<K>> for Keys {
    fn from(value: Option<K>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}
