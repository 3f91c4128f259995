//! serde_json interop.
//!
//! JSON objects become records and arrays become sequences. Going back,
//! mappings with only string keys become objects, other mappings become
//! arrays of `[key, value]` pairs, and sets become arrays.

use serde_json::{Map, Number, Value as Json};

use crate::value::Value;

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => number_to_value(&n),
            Json::String(s) => Value::from(s),
            Json::Array(items) => Value::sequence(items.into_iter().map(Value::from)),
            Json::Object(obj) => Value::record(obj.into_iter().map(|(k, v)| (k, Value::from(v)))),
        }
    }
}

impl From<&Json> for Value {
    fn from(json: &Json) -> Self {
        Value::from(json.clone())
    }
}

fn number_to_value(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Int(i)
    } else {
        Value::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

impl Value {
    /// Render as JSON. Non-finite floats become `null`; cells render their
    /// current contents.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::Number((*i).into()),
            Value::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
            Value::Str(s) => Json::String(s.to_string()),
            Value::Record(record) => {
                let mut obj = Map::new();
                for (k, v) in record.iter() {
                    obj.insert(k.clone(), v.to_json());
                }
                Json::Object(obj)
            }
            Value::Sequence(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Mapping(entries) => {
                if entries.keys().all(|k| matches!(k, Value::Str(_))) {
                    let mut obj = Map::new();
                    for (k, v) in entries.iter() {
                        if let Value::Str(key) = k {
                            obj.insert(key.to_string(), v.to_json());
                        }
                    }
                    Json::Object(obj)
                } else {
                    Json::Array(
                        entries
                            .iter()
                            .map(|(k, v)| Json::Array(vec![k.to_json(), v.to_json()]))
                            .collect(),
                    )
                }
            }
            Value::Set(elements) => Json::Array(elements.iter().map(Value::to_json).collect()),
            Value::Shared(cell) => cell.get().to_json(),
        }
    }
}

impl From<&Value> for Json {
    fn from(value: &Value) -> Self {
        value.to_json()
    }
}
