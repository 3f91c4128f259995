//! Core value types.

use std::fmt;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};

use crate::shared::SharedValue;

/// A node of the value graph.
///
/// Scalars are stored inline. Containers sit behind an [`Rc`]: cloning a
/// value never copies a container, and two values holding the same `Rc`
/// share that whole subtree.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    /// Keyed record with insertion-ordered fields.
    Record(Rc<Record>),
    /// Ordered sequence.
    Sequence(Rc<Vec<Value>>),
    /// Keyed mapping container; any value can be a key.
    Mapping(Rc<IndexMap<Value, Value>>),
    /// Unique-element set container in insertion order.
    Set(Rc<IndexSet<Value>>),
    /// Reference-semantics cell. Never drafted.
    Shared(SharedValue),
}

/// Discriminant of a [`Value`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Str,
    Record,
    Sequence,
    Mapping,
    Set,
    Shared,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "string",
            ValueKind::Record => "record",
            ValueKind::Sequence => "sequence",
            ValueKind::Mapping => "mapping",
            ValueKind::Set => "set",
            ValueKind::Shared => "shared",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Record ────────────────────────────────────────────────────────────────

/// Field map of a [`Value::Record`].
///
/// The optional tag names the record's type. It is metadata for accessor
/// lookup only and does not take part in equality.
#[derive(Debug, Clone, Default)]
pub struct Record {
    tag: Option<Rc<str>>,
    fields: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty record carrying `tag`.
    pub fn with_tag(tag: Option<Rc<str>>) -> Self {
        Self {
            tag,
            fields: IndexMap::new(),
        }
    }

    pub fn tagged(tag: &str) -> Self {
        Self::with_tag(Some(Rc::from(tag)))
    }

    pub fn tag(&self) -> Option<&Rc<str>> {
        self.tag.as_ref()
    }

    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.fields.get_mut(field)
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Insert or overwrite a field. Overwriting keeps the field's position.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(field.into(), value)
    }

    /// Remove a field, preserving the order of the remaining ones.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.shift_remove(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.fields.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            tag: None,
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

// ── Constructors & accessors ──────────────────────────────────────────────

impl Value {
    pub fn str(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }

    pub fn record<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Record(Rc::new(fields.into_iter().collect()))
    }

    /// A record carrying a type tag.
    pub fn tagged_record<K: Into<String>>(
        tag: &str,
        fields: impl IntoIterator<Item = (K, Value)>,
    ) -> Self {
        let mut record = Record::tagged(tag);
        for (k, v) in fields {
            record.insert(k, v);
        }
        Value::Record(Rc::new(record))
    }

    pub fn sequence(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Sequence(Rc::new(items.into_iter().collect()))
    }

    pub fn mapping(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::Mapping(Rc::new(entries.into_iter().collect()))
    }

    pub fn set(elements: impl IntoIterator<Item = Value>) -> Self {
        Value::Set(Rc::new(elements.into_iter().collect()))
    }

    pub fn shared(inner: Value) -> Self {
        Value::Shared(SharedValue::new(inner))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::Record(_) => ValueKind::Record,
            Value::Sequence(_) => ValueKind::Sequence,
            Value::Mapping(_) => ValueKind::Mapping,
            Value::Set(_) => ValueKind::Set,
            Value::Shared(_) => ValueKind::Shared,
        }
    }

    /// Returns true for the four container kinds.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Value::Record(_) | Value::Sequence(_) | Value::Mapping(_) | Value::Set(_)
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<Value, Value>> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&IndexSet<Value>> {
        match self {
            Value::Set(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_shared(&self) -> Option<&SharedValue> {
        match self {
            Value::Shared(cell) => Some(cell),
            _ => None,
        }
    }

    /// Field of a record, `None` for anything else.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.as_record().and_then(|r| r.get(field))
    }

    /// Element of a sequence, `None` for anything else.
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.as_sequence().and_then(|s| s.get(index))
    }

    /// Number of entries of a container, `None` for scalars and cells.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Record(r) => Some(r.len()),
            Value::Sequence(s) => Some(s.len()),
            Value::Mapping(m) => Some(m.len()),
            Value::Set(s) => Some(s.len()),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

// ── Scalar conversions ────────────────────────────────────────────────────

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        i64::try_from(i).map_or(Value::Float(i as f64), Value::Int)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(Rc::new(items))
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(Rc::new(record))
    }
}

impl From<SharedValue> for Value {
    fn from(cell: SharedValue) -> Self {
        Value::Shared(cell)
    }
}
