use std::rc::Rc;

use crate::shared::SharedValue;
use crate::value::{Record, Value};

/// Creates a deep clone of a value.
///
/// Unlike `Clone`, which shares every container, this rebuilds each nested
/// record, sequence, mapping and set, and gives every shared cell a fresh
/// cell. The result is equal to the input but shares nothing with it.
///
/// Cells that contain themselves are not supported.
///
/// # Examples
///
/// ```
/// use drafter_value::{deep_clone, same, value};
///
/// let original = value!({"foo": [1, 2, 3]});
/// let cloned = deep_clone(&original);
///
/// assert_eq!(original, cloned);
/// assert!(!same(&original, &cloned));
/// ```
pub fn deep_clone(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Bool(b) => Value::Bool(*b),
        Value::Int(i) => Value::Int(*i),
        Value::Float(f) => Value::Float(*f),
        Value::Str(s) => Value::Str(Rc::from(&**s)),
        Value::Record(record) => {
            let mut out = Record::with_tag(record.tag().cloned());
            for (key, val) in record.iter() {
                out.insert(key.clone(), deep_clone(val));
            }
            Value::Record(Rc::new(out))
        }
        Value::Sequence(items) => Value::Sequence(Rc::new(items.iter().map(deep_clone).collect())),
        Value::Mapping(entries) => Value::Mapping(Rc::new(
            entries
                .iter()
                .map(|(k, v)| (deep_clone(k), deep_clone(v)))
                .collect(),
        )),
        Value::Set(elements) => Value::Set(Rc::new(elements.iter().map(deep_clone).collect())),
        Value::Shared(cell) => Value::Shared(SharedValue::new(deep_clone(&cell.get()))),
    }
}
