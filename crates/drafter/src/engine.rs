//! Interception rules shared by every container kind.
//!
//! These run against the session with the handle already checked. Keys
//! arrive normalized for the node's kind.

use drafter_value::{same, Value};

use crate::accessors::{Getter, Setter};
use crate::error::{Result, Violation};
use crate::key::Key;
use crate::node::{Assignment, DraftKind, NodeId, Slot};
use crate::session::Session;

/// Outcome of a keyed read.
pub(crate) enum Lookup {
    Found(Slot),
    Missing,
    /// Absent key answered by a computed field; call it without the session
    /// borrowed.
    Getter(Getter),
}

/// Property attributes reported for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub writable: bool,
    pub configurable: bool,
    pub enumerable: bool,
}

impl Descriptor {
    const FIELD: Descriptor = Descriptor {
        writable: true,
        configurable: true,
        enumerable: true,
    };

    const LENGTH: Descriptor = Descriptor {
        writable: true,
        configurable: false,
        enumerable: false,
    };
}

/// Longest sequence a draft will grow to. Index and length writes beyond it
/// fail.
pub(crate) const MAX_SEQUENCE_LEN: usize = u32::MAX as usize;

fn slot_same(a: &Slot, b: &Slot) -> bool {
    match (a, b) {
        (Slot::Draft(a), Slot::Draft(b)) => a == b,
        (Slot::Value(a), Slot::Value(b)) => same(a, b),
        _ => false,
    }
}

fn length_of(slot: &Slot) -> Result<usize> {
    match slot {
        Slot::Value(Value::Int(n)) => usize::try_from(*n).map_err(|_| Violation::InvalidLength.into()),
        Slot::Value(Value::Float(f)) if f.fract() == 0.0 && *f >= 0.0 && *f <= MAX_SEQUENCE_LEN as f64 => {
            Ok(*f as usize)
        }
        _ => Err(Violation::InvalidLength.into()),
    }
}

fn check_len(len: usize) -> Result<()> {
    if len > MAX_SEQUENCE_LEN {
        return Err(Violation::InvalidLength.into());
    }
    Ok(())
}

impl Session {
    /// Read `key`, drafting a draftable value on first access.
    pub(crate) fn read(&mut self, id: NodeId, key: &Key) -> Result<Lookup> {
        let node = self.node(id);
        if *key == Key::Length {
            return Ok(Lookup::Found(Slot::Value(Value::from(node.len()))));
        }
        let Some(slot) = node.slot(key) else {
            return Ok(match self.getter_for(id, key) {
                Some(getter) => Lookup::Getter(getter),
                None => Lookup::Missing,
            });
        };
        match slot {
            Slot::Value(value) if self.is_draftable(&value) => {
                let slot = match self.draft_child(id, key, value.clone()) {
                    Some(child) => Slot::Draft(child),
                    None => Slot::Value(value),
                };
                Ok(Lookup::Found(slot))
            }
            slot => Ok(Lookup::Found(slot)),
        }
    }

    fn computed_field<'a>(&'a self, id: NodeId, key: &'a Key) -> Option<(&'a str, &'a str)> {
        let node = self.node(id);
        match (node.kind, key) {
            (DraftKind::Record, Key::Field(field)) => node.tag().map(|tag| (&**tag, field.as_str())),
            _ => None,
        }
    }

    pub(crate) fn getter_for(&self, id: NodeId, key: &Key) -> Option<Getter> {
        let (tag, field) = self.computed_field(id, key)?;
        self.options.accessors.get(tag, field)
    }

    /// Setter for `key`, consulted only while the key is absent.
    pub(crate) fn setter_for(&self, id: NodeId, key: &Key) -> Option<Setter> {
        if self.node(id).slot(key).is_some() {
            return None;
        }
        let (tag, field) = self.computed_field(id, key)?;
        self.options.accessors.set(tag, field)
    }

    /// Write `incoming` at `key`.
    pub(crate) fn assign(&mut self, id: NodeId, key: &Key, incoming: Slot) -> Result<()> {
        if *key == Key::Length {
            let len = length_of(&incoming)?;
            return self.assign_length(id, len);
        }

        let node = self.node(id);
        if let (DraftKind::Sequence, Key::Index(index)) = (node.kind, key) {
            check_len(index.saturating_add(1))?;
        }
        let current = node.slot(key);

        // Putting back the original a drafted child was taken from: keep the
        // raw value.
        if let (Some(Slot::Draft(child)), Slot::Value(value)) = (&current, &incoming) {
            let restores = same(&self.node(*child).original, value)
                && node.original_at(key).is_some_and(|original| same(original, value));
            if restores {
                self.ensure_copy(id).put(key, incoming);
                self.node_mut(id).assigned.insert(key.clone(), Assignment::Reverted);
                return Ok(());
            }
        }

        if let Some(current) = &current {
            if slot_same(current, &incoming) && (node.has_original(key) || !incoming.is_null()) {
                return Ok(());
            }
        }

        let original = node.original_at(key).cloned();
        let padding = match (node.kind, key) {
            (DraftKind::Sequence, Key::Index(index)) => node.len()..*index,
            _ => 0..0,
        };
        let original_len = node.original.len().unwrap_or(0);

        self.mark_changed(id);
        let node = self.node_mut(id);
        for index in padding {
            let entry = if index < original_len {
                Assignment::Changed
            } else {
                Assignment::Added
            };
            node.assigned.insert(Key::Index(index), entry);
        }
        match (&incoming, &original) {
            (Slot::Value(value), Some(original)) if same(value, original) => {
                node.assigned.shift_remove(key);
            }
            (_, Some(_)) => {
                node.assigned.insert(key.clone(), Assignment::Changed);
            }
            (_, None) => {
                node.assigned.insert(key.clone(), Assignment::Added);
            }
        }
        self.ensure_copy(id).put(key, incoming);
        Ok(())
    }

    pub(crate) fn assign_length(&mut self, id: NodeId, len: usize) -> Result<()> {
        check_len(len)?;
        let node = self.node(id);
        let current_len = node.len();
        if len == current_len {
            return Ok(());
        }
        let original_len = node.original.len().unwrap_or(0);
        self.mark_changed(id);
        self.ensure_copy(id).resize(len);
        let node = self.node_mut(id);
        if len < current_len {
            node.assigned.retain(|key, _| key.as_index().map_or(true, |index| index < len));
        } else {
            for index in current_len..len {
                let entry = if index < original_len {
                    Assignment::Changed
                } else {
                    Assignment::Added
                };
                node.assigned.insert(Key::Index(index), entry);
            }
        }
        Ok(())
    }

    /// Delete `key`. Sequences write a null in place. Returns whether the
    /// key was present.
    pub(crate) fn delete(&mut self, id: NodeId, key: &Key) -> Result<bool> {
        let node = self.node(id);
        let present = node.slot(key).is_some();
        if node.kind == DraftKind::Sequence {
            if *key != Key::Length && present {
                self.assign(id, key, Slot::Value(Value::Null))?;
            }
            return Ok(present && *key != Key::Length);
        }
        if node.has_original(key) {
            self.mark_changed(id);
            self.node_mut(id).assigned.insert(key.clone(), Assignment::Removed);
        } else {
            self.node_mut(id).assigned.shift_remove(key);
        }
        if let Some(copy) = self.node_mut(id).copy.as_mut() {
            copy.remove(key);
        }
        Ok(present)
    }

    pub(crate) fn has(&self, id: NodeId, key: &Key) -> bool {
        *key == Key::Length || self.node(id).slot(key).is_some()
    }

    pub(crate) fn describe(&self, id: NodeId, key: &Key) -> Option<Descriptor> {
        if *key == Key::Length {
            return Some(Descriptor::LENGTH);
        }
        self.node(id).slot(key).map(|_| Descriptor::FIELD)
    }

    /// Current slot at a sequence index; null past the end.
    pub(crate) fn slot_at(&self, id: NodeId, index: usize) -> Slot {
        self.node(id)
            .slot(&Key::Index(index))
            .unwrap_or(Slot::Value(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DraftError;
    use crate::node::ROOT;
    use crate::options::Options;
    use drafter_value::value;

    fn open(base: Value) -> Session {
        Session::open(base, Options::default()).unwrap()
    }

    fn field(name: &str) -> Key {
        Key::Field(name.to_string())
    }

    #[test]
    fn read_drafts_containers_lazily() {
        let mut session = open(value!({"a": {"b": 1}, "n": 1}));
        assert!(session.node(ROOT).copy.is_none());
        let Lookup::Found(Slot::Draft(child)) = session.read(ROOT, &field("a")).unwrap() else {
            panic!("expected a drafted child");
        };
        assert!(session.node(ROOT).copy.is_some());
        assert!(!session.node(ROOT).operated);
        // Second read returns the cached child.
        assert!(matches!(session.read(ROOT, &field("a")).unwrap(), Lookup::Found(Slot::Draft(c)) if c == child));
        assert!(matches!(session.read(ROOT, &field("n")).unwrap(), Lookup::Found(Slot::Value(Value::Int(1)))));
        assert!(matches!(session.read(ROOT, &field("zz")).unwrap(), Lookup::Missing));
    }

    #[test]
    fn same_value_write_is_a_no_op() {
        let mut session = open(value!({"a": 1}));
        session.assign(ROOT, &field("a"), Slot::Value(Value::Int(1))).unwrap();
        assert!(!session.node(ROOT).operated);
        assert!(session.node(ROOT).assigned.is_empty());
    }

    #[test]
    fn writing_the_original_back_drops_the_ledger_entry() {
        let mut session = open(value!({"a": 1}));
        session.assign(ROOT, &field("a"), Slot::Value(Value::Int(2))).unwrap();
        assert_eq!(session.node(ROOT).assigned.get(&field("a")), Some(&Assignment::Changed));
        session.assign(ROOT, &field("a"), Slot::Value(Value::Int(1))).unwrap();
        assert!(session.node(ROOT).assigned.is_empty());
        assert!(session.node(ROOT).operated);
    }

    #[test]
    fn assigning_a_child_its_original_marks_reverted() {
        let base = value!({"a": {"b": 1}});
        let original_a = base.get("a").cloned().unwrap();
        let mut session = open(base);
        session.read(ROOT, &field("a")).unwrap();
        session.assign(ROOT, &field("a"), Slot::Value(original_a)).unwrap();
        assert_eq!(session.node(ROOT).assigned.get(&field("a")), Some(&Assignment::Reverted));
        assert!(matches!(session.node(ROOT).slot(&field("a")), Some(Slot::Value(_))));
    }

    #[test]
    fn rereading_a_restored_child_clears_the_revert() {
        let base = value!({"a": {"b": 1}});
        let original_a = base.get("a").cloned().unwrap();
        let mut session = open(base);
        session.read(ROOT, &field("a")).unwrap();
        session.assign(ROOT, &field("a"), Slot::Value(original_a)).unwrap();
        let Lookup::Found(Slot::Draft(_)) = session.read(ROOT, &field("a")).unwrap() else {
            panic!("expected a drafted child");
        };
        assert!(session.node(ROOT).assigned.is_empty());
    }

    #[test]
    fn reassigning_a_drafted_fresh_value_stays_assigned() {
        let fresh = value!({"y": 1});
        let mut session = open(value!({"a": {"x": 1}}));
        session.assign(ROOT, &field("a"), Slot::Value(fresh.clone())).unwrap();
        session.read(ROOT, &field("a")).unwrap();
        session.assign(ROOT, &field("a"), Slot::Value(fresh)).unwrap();
        assert_eq!(session.node(ROOT).assigned.get(&field("a")), Some(&Assignment::Changed));
    }

    #[test]
    fn oversized_index_and_length_writes_fail() {
        let mut session = open(value!([1]));
        let too_long = DraftError::StructuralViolation(Violation::InvalidLength);
        let err = session.assign(ROOT, &Key::Index(usize::MAX), Slot::Value(Value::Int(1))).unwrap_err();
        assert_eq!(err, too_long);
        let err = session.assign(ROOT, &Key::Index(MAX_SEQUENCE_LEN), Slot::Value(Value::Int(1))).unwrap_err();
        assert_eq!(err, too_long);
        assert_eq!(session.assign_length(ROOT, usize::MAX), Err(too_long));
        assert_eq!(session.node(ROOT).len(), 1);
        assert!(session.node(ROOT).assigned.is_empty());
    }

    #[test]
    fn delete_of_a_fresh_key_leaves_no_trace() {
        let mut session = open(value!({"a": 1}));
        session.assign(ROOT, &field("b"), Slot::Value(Value::Int(2))).unwrap();
        assert!(session.delete(ROOT, &field("b")).unwrap());
        assert!(session.node(ROOT).assigned.is_empty());
        assert!(session.delete(ROOT, &field("a")).unwrap());
        assert_eq!(session.node(ROOT).assigned.get(&field("a")), Some(&Assignment::Removed));
    }

    #[test]
    fn sequence_delete_writes_null() {
        let mut session = open(value!([1, 2]));
        session.delete(ROOT, &Key::Index(0)).unwrap();
        assert_eq!(session.node(ROOT).len(), 2);
        assert!(session.slot_at(ROOT, 0).is_null());
    }

    #[test]
    fn length_rejects_non_integers() {
        let mut session = open(value!([1, 2]));
        let err = session.assign(ROOT, &Key::Length, Slot::Value(Value::str("x"))).unwrap_err();
        assert_eq!(err, DraftError::StructuralViolation(Violation::InvalidLength));
        session.assign(ROOT, &Key::Length, Slot::Value(Value::Int(0))).unwrap();
        assert_eq!(session.node(ROOT).len(), 0);
    }

    #[test]
    fn length_descriptor_is_not_configurable() {
        let session = open(value!([1]));
        assert_eq!(session.describe(ROOT, &Key::Length).map(|d| d.configurable), Some(false));
        assert_eq!(session.describe(ROOT, &Key::Index(0)), Some(Descriptor::FIELD));
        assert_eq!(session.describe(ROOT, &Key::Index(5)), None);
    }
}
