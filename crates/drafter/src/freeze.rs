//! Deep freeze.
//!
//! Containers are immutable already; the only writable things in a value
//! graph are cells. Freezing walks the graph and freezes every cell it
//! reaches, skipping cells the marker classifies as mutable.

use std::collections::HashSet;

use drafter_value::Value;

use crate::options::{Mark, Options};

/// Freeze every cell reachable from `value`.
///
/// ```
/// use drafter::{deep_freeze, Options};
/// use drafter_value::{value, Value};
///
/// let cell = Value::shared(value!({"a": 1}));
/// let tree = Value::sequence([cell.clone()]);
/// deep_freeze(&tree, &Options::default());
/// assert!(cell.as_shared().unwrap().is_frozen());
/// ```
pub fn deep_freeze(value: &Value, options: &Options) {
    let mut visited = HashSet::new();
    freeze_into(value, options, &mut visited);
}

fn freeze_into(value: &Value, options: &Options, visited: &mut HashSet<usize>) {
    match value {
        Value::Record(record) => {
            for (_, field) in record.iter() {
                freeze_into(field, options, visited);
            }
        }
        Value::Sequence(items) => {
            for item in items.iter() {
                freeze_into(item, options, visited);
            }
        }
        Value::Mapping(entries) => {
            for (key, entry) in entries.iter() {
                freeze_into(key, options, visited);
                freeze_into(entry, options, visited);
            }
        }
        Value::Set(elements) => {
            for element in elements.iter() {
                freeze_into(element, options, visited);
            }
        }
        Value::Shared(cell) => {
            if !visited.insert(cell.addr()) || options.classify(value) == Some(Mark::Mutable) {
                return;
            }
            cell.freeze();
            freeze_into(&cell.get(), options, visited);
        }
        _ => {}
    }
}
