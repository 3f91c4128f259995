use drafter_value::Value;

use crate::draft::Draft;
use crate::error::Result;
use crate::item::Item;
use crate::key::Key;

/// Handle onto a drafted record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDraft {
    draft: Draft,
}

impl RecordDraft {
    pub(crate) fn new(draft: Draft) -> Self {
        Self { draft }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn get(&self, field: &str) -> Result<Option<Item>> {
        self.draft.read_key(Key::from(field))
    }

    pub fn value(&self, field: &str) -> Result<Option<Value>> {
        self.get(field)?.map(|item| item.to_value()).transpose()
    }

    pub fn child(&self, field: &str) -> Result<Draft> {
        self.draft.child(field)
    }

    pub fn set(&self, field: &str, value: impl Into<Item>) -> Result<()> {
        self.draft.write_key(Key::from(field), value.into())
    }

    /// Returns whether the field was present.
    pub fn delete(&self, field: &str) -> Result<bool> {
        self.draft.delete_key(Key::from(field))
    }

    pub fn has(&self, field: &str) -> Result<bool> {
        self.draft.has(field)
    }

    pub fn fields(&self) -> Result<Vec<String>> {
        Ok(self
            .draft
            .keys()?
            .into_iter()
            .filter_map(|key| match key {
                Key::Field(field) => Some(field),
                _ => None,
            })
            .collect())
    }

    pub fn len(&self) -> Result<usize> {
        self.draft.len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.draft.is_empty()
    }

    /// The record's type tag.
    pub fn tag(&self) -> Result<Option<String>> {
        self.draft.inspect(|session, id| Ok(session.node(id).tag().map(|tag| tag.to_string())))
    }
}
