use drafter_value::Value;

use crate::current::current;
use crate::draft::Draft;
use crate::error::{DraftError, Result};

/// What reads return and writes accept: a plain value or a live draft.
#[derive(Debug, Clone)]
pub enum Item {
    Value(Value),
    Draft(Draft),
}

impl Item {
    pub fn as_draft(&self) -> Option<&Draft> {
        match self {
            Item::Draft(draft) => Some(draft),
            Item::Value(_) => None,
        }
    }

    pub fn into_draft(self) -> Result<Draft> {
        match self {
            Item::Draft(draft) => Ok(draft),
            Item::Value(value) => Err(DraftError::NotDraftable(value.kind().to_string())),
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Item::Value(value) => Some(value),
            Item::Draft(_) => None,
        }
    }

    pub fn is_draft(&self) -> bool {
        matches!(self, Item::Draft(_))
    }

    /// The plain value, or a draft's current value.
    pub fn to_value(&self) -> Result<Value> {
        match self {
            Item::Value(value) => Ok(value.clone()),
            Item::Draft(draft) => current(draft),
        }
    }
}

impl From<Value> for Item {
    fn from(value: Value) -> Self {
        Item::Value(value)
    }
}

impl From<Draft> for Item {
    fn from(draft: Draft) -> Self {
        Item::Draft(draft)
    }
}

impl From<&Draft> for Item {
    fn from(draft: &Draft) -> Self {
        Item::Draft(draft.clone())
    }
}

impl From<bool> for Item {
    fn from(b: bool) -> Self {
        Item::Value(Value::Bool(b))
    }
}

impl From<i64> for Item {
    fn from(i: i64) -> Self {
        Item::Value(Value::Int(i))
    }
}

impl From<i32> for Item {
    fn from(i: i32) -> Self {
        Item::Value(Value::from(i))
    }
}

impl From<usize> for Item {
    fn from(i: usize) -> Self {
        Item::Value(Value::from(i))
    }
}

impl From<f64> for Item {
    fn from(f: f64) -> Self {
        Item::Value(Value::Float(f))
    }
}

impl From<&str> for Item {
    fn from(s: &str) -> Self {
        Item::Value(Value::str(s))
    }
}

impl From<String> for Item {
    fn from(s: String) -> Self {
        Item::Value(Value::from(s))
    }
}
