//! Set adapter.
//!
//! Elements are their own keys. The copy maps each element's original value
//! to its slot, so an element drafted before or after the copy was forced
//! is found under the same key, and membership by original value keeps
//! working after the element is drafted.

use drafter_value::Value;

use crate::draft::Draft;
use crate::error::Result;
use crate::item::Item;
use crate::key::Key;
use crate::node::{Assignment, NodeId, Slot};
use crate::session::Session;

impl Session {
    /// Key of the element `slot` refers to, if it is in the set.
    fn set_find(&self, id: NodeId, slot: &Slot) -> Option<Key> {
        let node = self.node(id);
        match slot {
            Slot::Value(value) => {
                let key = Key::Entry(value.clone());
                node.slot(&key).map(|_| key)
            }
            Slot::Draft(child) => {
                if let Some(key) = node.copy.as_ref().and_then(|copy| copy.key_of(*child)) {
                    return Some(key);
                }
                let key = Key::Entry(self.node(*child).original.clone());
                match node.slot(&key) {
                    Some(Slot::Value(_)) => Some(key),
                    _ => None,
                }
            }
        }
    }

    pub(crate) fn set_has(&self, id: NodeId, slot: &Slot) -> bool {
        self.set_find(id, slot).is_some()
    }

    /// Returns false if the element was already present.
    pub(crate) fn set_add(&mut self, id: NodeId, slot: Slot) -> bool {
        if self.set_has(id, &slot) {
            return false;
        }
        let element = match &slot {
            Slot::Value(value) => value.clone(),
            Slot::Draft(child) => self.node(*child).original.clone(),
        };
        let key = Key::Entry(element);
        let in_original = self.node(id).has_original(&key);
        self.mark_changed(id);
        self.ensure_copy(id).put(&key, slot);
        let node = self.node_mut(id);
        if in_original {
            node.assigned.shift_remove(&key);
        } else {
            node.assigned.insert(key, Assignment::Added);
        }
        true
    }

    /// Returns false if the element was not present.
    pub(crate) fn set_delete(&mut self, id: NodeId, slot: &Slot) -> bool {
        let Some(key) = self.set_find(id, slot) else {
            return false;
        };
        let in_original = self.node(id).has_original(&key);
        self.mark_changed(id);
        self.ensure_copy(id).remove(&key);
        let node = self.node_mut(id);
        if in_original {
            node.assigned.insert(key, Assignment::Removed);
        } else {
            node.assigned.shift_remove(&key);
        }
        true
    }

    pub(crate) fn set_clear(&mut self, id: NodeId) {
        for key in self.node(id).keys() {
            if let Some(slot) = self.node(id).slot(&key) {
                self.set_delete(id, &slot);
            }
        }
    }

    /// Elements of the current view in order, drafting containers.
    pub(crate) fn set_values(&mut self, id: NodeId) -> Vec<Slot> {
        let keys = self.node(id).keys();
        let mut slots = Vec::with_capacity(keys.len());
        for key in keys {
            let Some(slot) = self.node(id).slot(&key) else {
                continue;
            };
            let slot = match slot {
                Slot::Value(value) if self.is_draftable(&value) => self
                    .draft_child(id, &key, value.clone())
                    .map_or(Slot::Value(value), Slot::Draft),
                slot => slot,
            };
            slots.push(slot);
        }
        slots
    }
}

/// Handle onto a drafted set.
#[derive(Debug, Clone, PartialEq)]
pub struct SetDraft {
    draft: Draft,
}

impl SetDraft {
    pub(crate) fn new(draft: Draft) -> Self {
        Self { draft }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Membership by value, or by handle for elements already drafted.
    pub fn has(&self, element: impl Into<Item>) -> Result<bool> {
        let slot = self.draft.incoming(element.into())?;
        self.draft.inspect(|session, id| Ok(session.set_has(id, &slot)))
    }

    /// Returns false if the element was already present.
    pub fn add(&self, element: impl Into<Item>) -> Result<bool> {
        let slot = self.draft.incoming(element.into())?;
        self.draft.enter(|session, id| Ok(session.set_add(id, slot)))
    }

    /// Returns false if the element was not present.
    pub fn delete(&self, element: impl Into<Item>) -> Result<bool> {
        let slot = self.draft.incoming(element.into())?;
        self.draft.enter(|session, id| Ok(session.set_delete(id, &slot)))
    }

    pub fn clear(&self) -> Result<()> {
        self.draft.enter(|session, id| {
            session.set_clear(id);
            Ok(())
        })
    }

    pub fn len(&self) -> Result<usize> {
        self.draft.len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.draft.is_empty()
    }

    /// Elements in insertion order, drafting containers.
    pub fn values(&self) -> Result<Vec<Item>> {
        let slots = self.draft.enter(|session, id| Ok(session.set_values(id)))?;
        Ok(slots.into_iter().map(|slot| self.draft.wrap(slot)).collect())
    }
}
