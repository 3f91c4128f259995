use drafter_value::Value;

use crate::draft::Draft;
use crate::engine::Lookup;
use crate::error::Result;
use crate::item::Item;
use crate::key::Key;
use crate::node::{NodeId, Slot};
use crate::session::Session;

impl Session {
    /// Entries of the current view, drafting container values.
    pub(crate) fn map_entries(&mut self, id: NodeId) -> Result<Vec<(Value, Slot)>> {
        let keys = self.node(id).keys();
        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            if let (Key::Entry(k), Lookup::Found(slot)) = (&key, self.read(id, &key)?) {
                entries.push((k.clone(), slot));
            }
        }
        Ok(entries)
    }

    pub(crate) fn map_clear(&mut self, id: NodeId) -> Result<()> {
        for key in self.node(id).keys() {
            self.delete(id, &key)?;
        }
        Ok(())
    }
}

/// Handle onto a drafted mapping.
///
/// `get` drafts container values the way record reads do; `set` and
/// `delete` update the ledger the way record writes do.
#[derive(Debug, Clone, PartialEq)]
pub struct MapDraft {
    draft: Draft,
}

impl MapDraft {
    pub(crate) fn new(draft: Draft) -> Self {
        Self { draft }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn get(&self, key: impl Into<Value>) -> Result<Option<Item>> {
        self.draft.read_key(Key::Entry(key.into()))
    }

    pub fn value(&self, key: impl Into<Value>) -> Result<Option<Value>> {
        self.get(key)?.map(|item| item.to_value()).transpose()
    }

    pub fn child(&self, key: impl Into<Value>) -> Result<Draft> {
        self.draft.child(Key::Entry(key.into()))
    }

    pub fn set(&self, key: impl Into<Value>, value: impl Into<Item>) -> Result<()> {
        self.draft.write_key(Key::Entry(key.into()), value.into())
    }

    /// Returns whether the key was present.
    pub fn delete(&self, key: impl Into<Value>) -> Result<bool> {
        self.draft.delete_key(Key::Entry(key.into()))
    }

    pub fn has(&self, key: impl Into<Value>) -> Result<bool> {
        self.draft.has(Key::Entry(key.into()))
    }

    pub fn len(&self) -> Result<usize> {
        self.draft.len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.draft.is_empty()
    }

    pub fn keys(&self) -> Result<Vec<Value>> {
        Ok(self
            .draft
            .keys()?
            .into_iter()
            .filter_map(|key| match key {
                Key::Entry(k) => Some(k),
                _ => None,
            })
            .collect())
    }

    pub fn values(&self) -> Result<Vec<Item>> {
        Ok(self.entries()?.into_iter().map(|(_, item)| item).collect())
    }

    pub fn entries(&self) -> Result<Vec<(Value, Item)>> {
        let entries = self.draft.enter(|session, id| session.map_entries(id))?;
        Ok(entries
            .into_iter()
            .map(|(key, slot)| (key, self.draft.wrap(slot)))
            .collect())
    }

    pub fn clear(&self) -> Result<()> {
        self.draft.enter(|session, id| session.map_clear(id))
    }
}
