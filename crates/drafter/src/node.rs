//! Divergence nodes.
//!
//! One [`Node`] per drafted container, stored in the session arena and
//! addressed by [`NodeId`]. A node starts lazy (no copy) and becomes
//! divergent once its shallow copy exists. Slots of the copy either hold a
//! plain value or point at a child node.

use std::fmt;
use std::rc::Rc;

use drafter_value::{Record, Value};
use indexmap::{IndexMap, IndexSet};

use crate::error::Result;
use crate::key::Key;

pub type NodeId = usize;

/// The root node of every session.
pub const ROOT: NodeId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftKind {
    Record,
    Sequence,
    Mapping,
    Set,
}

impl DraftKind {
    /// Kind of a draftable value, `None` for scalars and cells.
    pub fn of(value: &Value) -> Option<DraftKind> {
        match value {
            Value::Record(_) => Some(DraftKind::Record),
            Value::Sequence(_) => Some(DraftKind::Sequence),
            Value::Mapping(_) => Some(DraftKind::Mapping),
            Value::Set(_) => Some(DraftKind::Set),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DraftKind::Record => "record",
            DraftKind::Sequence => "sequence",
            DraftKind::Mapping => "mapping",
            DraftKind::Set => "set",
        }
    }
}

impl fmt::Display for DraftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Slot {
    Value(Value),
    Draft(NodeId),
}

impl Slot {
    pub(crate) fn is_null(&self) -> bool {
        matches!(self, Slot::Value(Value::Null))
    }
}

/// Shallow copy of a node's original.
///
/// The set copy is keyed by each element's original value, so an element
/// keeps its identity after being drafted.
#[derive(Debug, Clone)]
pub(crate) enum ShallowCopy {
    Record {
        tag: Option<Rc<str>>,
        fields: IndexMap<String, Slot>,
    },
    Sequence(Vec<Slot>),
    Mapping(IndexMap<Value, Slot>),
    Set(IndexMap<Value, Slot>),
}

impl ShallowCopy {
    pub(crate) fn of(original: &Value) -> Option<ShallowCopy> {
        Some(match original {
            Value::Record(record) => ShallowCopy::Record {
                tag: record.tag().cloned(),
                fields: record
                    .iter()
                    .map(|(k, v)| (k.clone(), Slot::Value(v.clone())))
                    .collect(),
            },
            Value::Sequence(items) => {
                ShallowCopy::Sequence(items.iter().cloned().map(Slot::Value).collect())
            }
            Value::Mapping(entries) => ShallowCopy::Mapping(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), Slot::Value(v.clone())))
                    .collect(),
            ),
            Value::Set(elements) => ShallowCopy::Set(
                elements
                    .iter()
                    .map(|e| (e.clone(), Slot::Value(e.clone())))
                    .collect(),
            ),
            _ => return None,
        })
    }

    pub(crate) fn slot(&self, key: &Key) -> Option<&Slot> {
        match (self, key) {
            (ShallowCopy::Record { fields, .. }, Key::Field(field)) => fields.get(field),
            (ShallowCopy::Sequence(items), Key::Index(index)) => items.get(*index),
            (ShallowCopy::Mapping(entries), Key::Entry(k)) => entries.get(k),
            (ShallowCopy::Set(elements), Key::Entry(k)) => elements.get(k),
            _ => None,
        }
    }

    /// Store `slot` at `key`. Writing past the end of a sequence pads the
    /// gap with nulls.
    pub(crate) fn put(&mut self, key: &Key, slot: Slot) {
        match (self, key) {
            (ShallowCopy::Record { fields, .. }, Key::Field(field)) => {
                fields.insert(field.clone(), slot);
            }
            (ShallowCopy::Sequence(items), Key::Index(index)) => {
                if *index >= items.len() {
                    let Some(len) = index.checked_add(1) else {
                        return;
                    };
                    items.resize(len, Slot::Value(Value::Null));
                }
                items[*index] = slot;
            }
            (ShallowCopy::Mapping(entries), Key::Entry(k)) => {
                entries.insert(k.clone(), slot);
            }
            (ShallowCopy::Set(elements), Key::Entry(k)) => {
                elements.insert(k.clone(), slot);
            }
            _ => {}
        }
    }

    pub(crate) fn remove(&mut self, key: &Key) -> Option<Slot> {
        match (self, key) {
            (ShallowCopy::Record { fields, .. }, Key::Field(field)) => fields.shift_remove(field),
            (ShallowCopy::Mapping(entries), Key::Entry(k)) => entries.shift_remove(k),
            (ShallowCopy::Set(elements), Key::Entry(k)) => elements.shift_remove(k),
            _ => None,
        }
    }

    pub(crate) fn resize(&mut self, len: usize) {
        if let ShallowCopy::Sequence(items) = self {
            items.resize(len, Slot::Value(Value::Null));
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            ShallowCopy::Record { fields, .. } => fields.len(),
            ShallowCopy::Sequence(items) => items.len(),
            ShallowCopy::Mapping(entries) => entries.len(),
            ShallowCopy::Set(elements) => elements.len(),
        }
    }

    pub(crate) fn keys(&self) -> Vec<Key> {
        match self {
            ShallowCopy::Record { fields, .. } => fields.keys().cloned().map(Key::Field).collect(),
            ShallowCopy::Sequence(items) => (0..items.len()).map(Key::Index).collect(),
            ShallowCopy::Mapping(entries) => entries.keys().cloned().map(Key::Entry).collect(),
            ShallowCopy::Set(elements) => elements.keys().cloned().map(Key::Entry).collect(),
        }
    }

    /// Build a value from the copy, resolving each slot with `resolve`.
    pub(crate) fn assemble<F>(&self, mut resolve: F) -> Result<Value>
    where
        F: FnMut(&Slot) -> Result<Value>,
    {
        Ok(match self {
            ShallowCopy::Record { tag, fields } => {
                let mut record = Record::with_tag(tag.clone());
                for (field, slot) in fields {
                    record.insert(field.clone(), resolve(slot)?);
                }
                Value::Record(Rc::new(record))
            }
            ShallowCopy::Sequence(items) => {
                Value::from(items.iter().map(&mut resolve).collect::<Result<Vec<_>>>()?)
            }
            ShallowCopy::Mapping(entries) => {
                let mut out = IndexMap::with_capacity(entries.len());
                for (key, slot) in entries {
                    out.insert(key.clone(), resolve(slot)?);
                }
                Value::Mapping(Rc::new(out))
            }
            ShallowCopy::Set(elements) => {
                let mut out = IndexSet::with_capacity(elements.len());
                for slot in elements.values() {
                    out.insert(resolve(slot)?);
                }
                Value::Set(Rc::new(out))
            }
        })
    }

    /// Key of the slot pointing at `child`, if any.
    pub(crate) fn key_of(&self, child: NodeId) -> Option<Key> {
        let hit = |slot: &Slot| matches!(slot, Slot::Draft(id) if *id == child);
        match self {
            ShallowCopy::Record { fields, .. } => {
                fields.iter().find(|(_, s)| hit(*s)).map(|(k, _)| Key::Field(k.clone()))
            }
            ShallowCopy::Sequence(items) => items.iter().position(hit).map(Key::Index),
            ShallowCopy::Mapping(entries) | ShallowCopy::Set(entries) => {
                entries.iter().find(|(_, s)| hit(*s)).map(|(k, _)| Key::Entry(k.clone()))
            }
        }
    }
}

/// Ledger entry for a touched key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Assignment {
    /// Absent from the original, present now.
    Added,
    /// Present in the original with a different value.
    Changed,
    /// Present in the original, deleted now.
    Removed,
    /// A drafted child was replaced by its own original.
    Reverted,
}

impl Assignment {
    pub(crate) fn is_assigned(self) -> bool {
        matches!(self, Assignment::Added | Assignment::Changed)
    }
}

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) kind: DraftKind,
    pub(crate) original: Value,
    pub(crate) copy: Option<ShallowCopy>,
    pub(crate) parent: Option<NodeId>,
    /// Key under which the parent's copy first held this node.
    pub(crate) key: Option<Key>,
    pub(crate) assigned: IndexMap<Key, Assignment>,
    pub(crate) operated: bool,
    pub(crate) finalized: bool,
    pub(crate) revoked: bool,
    pub(crate) in_progress: bool,
    pub(crate) resolved: Option<Value>,
}

impl Node {
    pub(crate) fn new(kind: DraftKind, original: Value, parent: Option<NodeId>, key: Option<Key>) -> Self {
        Self {
            kind,
            original,
            copy: None,
            parent,
            key,
            assigned: IndexMap::new(),
            operated: false,
            finalized: false,
            revoked: false,
            in_progress: false,
            resolved: None,
        }
    }

    pub(crate) fn original_at(&self, key: &Key) -> Option<&Value> {
        match (&self.original, key) {
            (Value::Record(record), Key::Field(field)) => record.get(field),
            (Value::Sequence(items), Key::Index(index)) => items.get(*index),
            (Value::Mapping(entries), Key::Entry(k)) => entries.get(k),
            (Value::Set(elements), Key::Entry(k)) => elements.get(k),
            _ => None,
        }
    }

    pub(crate) fn has_original(&self, key: &Key) -> bool {
        self.original_at(key).is_some()
    }

    /// Slot at `key` in the current view.
    pub(crate) fn slot(&self, key: &Key) -> Option<Slot> {
        match &self.copy {
            Some(copy) => copy.slot(key).cloned(),
            None => self.original_at(key).cloned().map(Slot::Value),
        }
    }

    pub(crate) fn len(&self) -> usize {
        match &self.copy {
            Some(copy) => copy.len(),
            None => self.original.len().unwrap_or(0),
        }
    }

    pub(crate) fn keys(&self) -> Vec<Key> {
        if let Some(copy) = &self.copy {
            return copy.keys();
        }
        match &self.original {
            Value::Record(record) => record.iter().map(|(k, _)| Key::Field(k.clone())).collect(),
            Value::Sequence(items) => (0..items.len()).map(Key::Index).collect(),
            Value::Mapping(entries) => entries.keys().cloned().map(Key::Entry).collect(),
            Value::Set(elements) => elements.iter().cloned().map(Key::Entry).collect(),
            _ => Vec::new(),
        }
    }

    /// Tag of a record node.
    pub(crate) fn tag(&self) -> Option<&Rc<str>> {
        self.original.as_record().and_then(|r| r.tag())
    }
}
