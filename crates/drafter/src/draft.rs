//! Draft handles.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use drafter_value::Value;

use crate::current::current_value;
use crate::engine::{Descriptor, Lookup};
use crate::error::{DraftError, Result, Violation};
use crate::item::Item;
use crate::key::Key;
use crate::node::{DraftKind, NodeId, Slot, ROOT};
use crate::session::Session;

/// A handle onto one drafted container.
///
/// Reads and writes go through the session that owns the node. Once the
/// session finishes, every handle it created fails with
/// [`DraftError::UseAfterFinalize`].
#[derive(Clone)]
pub struct Draft {
    session: Rc<RefCell<Session>>,
    id: NodeId,
    epoch: u64,
}

impl Draft {
    pub(crate) fn root(session: Rc<RefCell<Session>>) -> Self {
        let epoch = session.borrow().epoch;
        Self {
            session,
            id: ROOT,
            epoch,
        }
    }

    fn sibling(&self, id: NodeId) -> Draft {
        Draft {
            session: Rc::clone(&self.session),
            id,
            epoch: self.epoch,
        }
    }

    /// Run `f` against the live session.
    pub(crate) fn enter<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Session, NodeId) -> Result<R>,
    {
        let mut session = self.session.try_borrow_mut().map_err(|_| DraftError::Reentrant)?;
        session.check_live(self.id, self.epoch)?;
        f(&mut session, self.id)
    }

    pub(crate) fn inspect<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&Session, NodeId) -> Result<R>,
    {
        let session = self.session.try_borrow().map_err(|_| DraftError::Reentrant)?;
        session.check_live(self.id, self.epoch)?;
        f(&session, self.id)
    }

    pub(crate) fn wrap(&self, slot: Slot) -> Item {
        match slot {
            Slot::Value(value) => Item::Value(value),
            Slot::Draft(id) => Item::Draft(self.sibling(id)),
        }
    }

    /// Convert an incoming item into a slot. A handle from this session is
    /// stored as-is; a handle from another session is snapshotted.
    pub(crate) fn incoming(&self, item: Item) -> Result<Slot> {
        match item {
            Item::Value(value) => Ok(Slot::Value(value)),
            Item::Draft(draft) if Rc::ptr_eq(&draft.session, &self.session) => {
                self.session
                    .try_borrow()
                    .map_err(|_| DraftError::Reentrant)?
                    .check_live(draft.id, draft.epoch)?;
                Ok(Slot::Draft(draft.id))
            }
            Item::Draft(draft) => Ok(Slot::Value(draft.current()?)),
        }
    }

    fn normalize(&self, key: Key) -> Result<Key> {
        let kind = self.kind()?;
        key.normalize(kind)
    }

    pub(crate) fn read_key(&self, key: Key) -> Result<Option<Item>> {
        match self.enter(|session, id| session.read(id, &key))? {
            Lookup::Found(slot) => Ok(Some(self.wrap(slot))),
            Lookup::Missing => Ok(None),
            Lookup::Getter(getter) => getter(self),
        }
    }

    pub(crate) fn write_key(&self, key: Key, item: Item) -> Result<()> {
        if let Some(setter) = self.inspect(|session, id| Ok(session.setter_for(id, &key)))? {
            return setter(self, item);
        }
        let slot = self.incoming(item)?;
        self.enter(|session, id| session.assign(id, &key, slot))
    }

    pub(crate) fn delete_key(&self, key: Key) -> Result<bool> {
        self.enter(|session, id| session.delete(id, &key))
    }

    pub fn kind(&self) -> Result<DraftKind> {
        self.inspect(|session, id| Ok(session.kind(id)))
    }

    /// False once the owning session has finished or been abandoned.
    pub fn is_live(&self) -> bool {
        self.session
            .try_borrow()
            .is_ok_and(|session| session.check_live(self.id, self.epoch).is_ok())
    }

    /// Read a slot. Drafts a container on first read.
    ///
    /// On a mapping this looks up an entry. Sets have no keyed reads.
    pub fn get(&self, key: impl Into<Key>) -> Result<Option<Item>> {
        let key = self.normalize(key.into())?;
        if self.kind()? == DraftKind::Set {
            return Err(Violation::SetRead.into());
        }
        self.read_key(key)
    }

    /// Current value at `key`, drafted or not.
    pub fn value(&self, key: impl Into<Key>) -> Result<Option<Value>> {
        self.get(key)?.map(|item| item.to_value()).transpose()
    }

    /// The drafted child at `key`.
    pub fn child(&self, key: impl Into<Key>) -> Result<Draft> {
        let key = key.into();
        let missing = format!("nothing at {key}");
        self.get(key)?
            .ok_or(DraftError::NotDraftable(missing))?
            .into_draft()
    }

    /// Write a slot.
    ///
    /// Mappings and sets reject property writes; use [`Draft::as_map`] or
    /// [`Draft::as_set`].
    pub fn set(&self, key: impl Into<Key>, value: impl Into<Item>) -> Result<()> {
        let key = self.normalize(key.into())?;
        self.reject_properties()?;
        self.write_key(key, value.into())
    }

    /// Delete a slot. On a sequence this leaves a null hole.
    pub fn delete(&self, key: impl Into<Key>) -> Result<()> {
        let key = self.normalize(key.into())?;
        self.reject_properties()?;
        self.delete_key(key).map(|_| ())
    }

    fn reject_properties(&self) -> Result<()> {
        match self.kind()? {
            DraftKind::Mapping => Err(Violation::MappingProperty.into()),
            DraftKind::Set => Err(Violation::SetProperty.into()),
            _ => Ok(()),
        }
    }

    pub fn has(&self, key: impl Into<Key>) -> Result<bool> {
        let key = self.normalize(key.into())?;
        self.inspect(|session, id| Ok(session.has(id, &key)))
    }

    /// Keys of the current view in order.
    pub fn keys(&self) -> Result<Vec<Key>> {
        self.inspect(|session, id| Ok(session.node(id).keys()))
    }

    pub fn len(&self) -> Result<usize> {
        self.inspect(|session, id| Ok(session.node(id).len()))
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|len| len == 0)
    }

    pub fn describe(&self, key: impl Into<Key>) -> Result<Option<Descriptor>> {
        let key = self.normalize(key.into())?;
        self.inspect(|session, id| Ok(session.describe(id, &key)))
    }

    /// Retagging a draft is not allowed.
    pub fn set_prototype(&self, _tag: Option<&str>) -> Result<()> {
        self.inspect(|_, _| Err(Violation::SetPrototype.into()))
    }

    /// Defining a property outside of [`Draft::set`] is not allowed.
    pub fn define_property(&self, _key: impl Into<Key>, _value: impl Into<Item>) -> Result<()> {
        self.inspect(|_, _| Err(Violation::DefineProperty.into()))
    }

    /// Snapshot of the current value, without finalizing.
    pub fn current(&self) -> Result<Value> {
        self.inspect(|session, id| current_value(session, id, &mut Vec::new()))
    }

    /// The value this node was drafted from.
    pub fn original(&self) -> Result<Value> {
        self.inspect(|session, id| Ok(session.node(id).original.clone()))
    }
}

impl PartialEq for Draft {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.session, &other.session) && self.id == other.id
    }
}

impl fmt::Debug for Draft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Draft")
            .field("id", &self.id)
            .field("epoch", &self.epoch)
            .finish()
    }
}
