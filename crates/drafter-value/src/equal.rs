//! Equality on values.
//!
//! Two notions coexist:
//!
//! - [`same`] is identity. Containers and cells are the same only if they
//!   are one allocation; scalars are the same if they hold the same value.
//!   This is what structural sharing is judged by.
//! - [`deep_equal`] (and `PartialEq`) is structural. Records, mappings and
//!   sets compare without regard to order, sequences element by element.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::value::Value;

/// Identity comparison.
///
/// Floats are compared bitwise, so `-0.0` is not the same as `0.0`, and any
/// NaN is the same as any other NaN.
pub fn same(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan()),
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Record(a), Value::Record(b)) => Rc::ptr_eq(a, b),
        (Value::Sequence(a), Value::Sequence(b)) => Rc::ptr_eq(a, b),
        (Value::Mapping(a), Value::Mapping(b)) => Rc::ptr_eq(a, b),
        (Value::Set(a), Value::Set(b)) => Rc::ptr_eq(a, b),
        (Value::Shared(a), Value::Shared(b)) => a.ptr_eq(b),
        _ => false,
    }
}

/// Structural comparison.
///
/// Shares a fast path with [`same`]: identical allocations are equal without
/// being walked.
///
/// # Examples
///
/// ```
/// use drafter_value::{deep_equal, value};
///
/// let a = value!({"foo": [1, 2, 3], "bar": null});
/// let b = value!({"bar": null, "foo": [1, 2, 3]});
/// let c = value!({"foo": [1, 2, 4], "bar": null});
///
/// assert!(deep_equal(&a, &b));
/// assert!(!deep_equal(&a, &c));
/// ```
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
        (Value::Str(a), Value::Str(b)) => a == b,

        (Value::Record(ra), Value::Record(rb)) => {
            if Rc::ptr_eq(ra, rb) {
                return true;
            }
            if ra.len() != rb.len() {
                return false;
            }
            ra.iter().all(|(key, va)| rb.get(key).is_some_and(|vb| deep_equal(va, vb)))
        }

        (Value::Sequence(sa), Value::Sequence(sb)) => {
            if Rc::ptr_eq(sa, sb) {
                return true;
            }
            sa.len() == sb.len() && sa.iter().zip(sb.iter()).all(|(x, y)| deep_equal(x, y))
        }

        (Value::Mapping(ma), Value::Mapping(mb)) => {
            if Rc::ptr_eq(ma, mb) {
                return true;
            }
            ma.len() == mb.len()
                && ma.iter().all(|(key, va)| mb.get(key).is_some_and(|vb| deep_equal(va, vb)))
        }

        (Value::Set(sa), Value::Set(sb)) => {
            Rc::ptr_eq(sa, sb) || (sa.len() == sb.len() && sa.iter().all(|e| sb.contains(e)))
        }

        (Value::Shared(a), Value::Shared(b)) => a.ptr_eq(b),

        _ => false,
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        deep_equal(self, other)
    }
}

impl Eq for Value {}

/// Hash of one entry, combined order-independently by the caller.
fn entry_hash<K: Hash + ?Sized>(key: &K, value: Option<&Value>) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    if let Some(value) = value {
        value.hash(&mut hasher);
    }
    hasher.finish()
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => {
                // Matches deep_equal: 0.0 == -0.0, NaN == NaN.
                let bits = if *f == 0.0 {
                    0.0f64.to_bits()
                } else if f.is_nan() {
                    f64::NAN.to_bits()
                } else {
                    f.to_bits()
                };
                bits.hash(state);
            }
            Value::Str(s) => s.hash(state),
            Value::Record(r) => {
                r.len().hash(state);
                let combined = r.iter().fold(0u64, |acc, (k, v)| acc ^ entry_hash(k.as_str(), Some(v)));
                combined.hash(state);
            }
            Value::Sequence(s) => {
                s.len().hash(state);
                for item in s.iter() {
                    item.hash(state);
                }
            }
            Value::Mapping(m) => {
                m.len().hash(state);
                let combined = m.iter().fold(0u64, |acc, (k, v)| acc ^ entry_hash(k, Some(v)));
                combined.hash(state);
            }
            Value::Set(s) => {
                s.len().hash(state);
                let combined = s.iter().fold(0u64, |acc, e| acc ^ entry_hash(e, None));
                combined.hash(state);
            }
            Value::Shared(cell) => cell.addr().hash(state),
        }
    }
}
