//! Sequence adapter.
//!
//! Insertions and removals are expressed as index writes plus a length
//! change, so the ledger and patches see the same shifts a caller doing
//! them by hand would produce.

use drafter_value::Value;

use crate::draft::Draft;
use crate::engine::Lookup;
use crate::error::Result;
use crate::item::Item;
use crate::key::Key;
use crate::node::{NodeId, Slot};
use crate::session::Session;

impl Session {
    pub(crate) fn sequence_insert(&mut self, id: NodeId, index: usize, slot: Slot) -> Result<()> {
        let len = self.node(id).len();
        let index = index.min(len);
        for i in (index..len).rev() {
            let moved = self.slot_at(id, i);
            self.assign(id, &Key::Index(i + 1), moved)?;
        }
        self.assign(id, &Key::Index(index), slot)
    }

    pub(crate) fn sequence_remove(&mut self, id: NodeId, index: usize) -> Result<Option<Slot>> {
        let len = self.node(id).len();
        if index >= len {
            return Ok(None);
        }
        let removed = self.slot_at(id, index);
        for i in index..len - 1 {
            let moved = self.slot_at(id, i + 1);
            self.assign(id, &Key::Index(i), moved)?;
        }
        self.assign_length(id, len - 1)?;
        Ok(Some(removed))
    }
}

/// Handle onto a drafted sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceDraft {
    draft: Draft,
}

impl SequenceDraft {
    pub(crate) fn new(draft: Draft) -> Self {
        Self { draft }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn get(&self, index: usize) -> Result<Option<Item>> {
        self.draft.read_key(Key::Index(index))
    }

    pub fn value(&self, index: usize) -> Result<Option<Value>> {
        self.get(index)?.map(|item| item.to_value()).transpose()
    }

    pub fn child(&self, index: usize) -> Result<Draft> {
        self.draft.child(index)
    }

    /// Write at `index`. Writing past the end pads with nulls.
    pub fn set(&self, index: usize, value: impl Into<Item>) -> Result<()> {
        self.draft.write_key(Key::Index(index), value.into())
    }

    pub fn len(&self) -> Result<usize> {
        self.draft.len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.draft.is_empty()
    }

    /// Truncate, or pad with nulls.
    pub fn set_len(&self, len: usize) -> Result<()> {
        self.draft.enter(|session, id| session.assign_length(id, len))
    }

    /// Append and return the new length.
    pub fn push(&self, value: impl Into<Item>) -> Result<usize> {
        let slot = self.draft.incoming(value.into())?;
        self.draft.enter(|session, id| {
            let len = session.node(id).len();
            session.assign(id, &Key::Index(len), slot)?;
            Ok(len + 1)
        })
    }

    pub fn pop(&self) -> Result<Option<Item>> {
        let removed = self.draft.enter(|session, id| {
            let len = session.node(id).len();
            match len.checked_sub(1) {
                Some(last) => session.sequence_remove(id, last),
                None => Ok(None),
            }
        })?;
        Ok(removed.map(|slot| self.draft.wrap(slot)))
    }

    /// Insert before `index`, shifting later items up. An index past the end
    /// appends.
    pub fn insert(&self, index: usize, value: impl Into<Item>) -> Result<()> {
        let slot = self.draft.incoming(value.into())?;
        self.draft.enter(|session, id| session.sequence_insert(id, index, slot))
    }

    /// Remove the item at `index`, shifting later items down.
    pub fn remove(&self, index: usize) -> Result<Option<Item>> {
        let removed = self.draft.enter(|session, id| session.sequence_remove(id, index))?;
        Ok(removed.map(|slot| self.draft.wrap(slot)))
    }

    /// Every item, drafting containers.
    pub fn items(&self) -> Result<Vec<Item>> {
        let slots = self.draft.enter(|session, id| {
            let len = session.node(id).len();
            let mut slots = Vec::with_capacity(len);
            for index in 0..len {
                if let Lookup::Found(slot) = session.read(id, &Key::Index(index))? {
                    slots.push(slot);
                }
            }
            Ok(slots)
        })?;
        Ok(slots.into_iter().map(|slot| self.draft.wrap(slot)).collect())
    }
}
