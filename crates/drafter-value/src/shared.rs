//! Reference-semantics cells.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::error::ValueError;
use crate::value::Value;

/// A mutable cell shared by reference.
///
/// Every clone points at the same cell, so a write through one clone is seen
/// by all of them. Cells are never drafted: the engine hands them out as-is
/// and leaves mutation to their owner. Once frozen, writes fail.
#[derive(Clone)]
pub struct SharedValue(Rc<SharedCell>);

struct SharedCell {
    value: RefCell<Value>,
    frozen: Cell<bool>,
}

impl SharedValue {
    pub fn new(value: Value) -> Self {
        Self(Rc::new(SharedCell {
            value: RefCell::new(value),
            frozen: Cell::new(false),
        }))
    }

    /// Current contents of the cell.
    pub fn get(&self) -> Value {
        self.0.value.borrow().clone()
    }

    pub fn set(&self, value: Value) -> Result<(), ValueError> {
        if self.is_frozen() {
            return Err(ValueError::Frozen);
        }
        *self.0.value.borrow_mut() = value;
        Ok(())
    }

    /// Replace the contents with `f(old)`.
    pub fn update<F>(&self, f: F) -> Result<(), ValueError>
    where
        F: FnOnce(Value) -> Value,
    {
        if self.is_frozen() {
            return Err(ValueError::Frozen);
        }
        let old = self.get();
        *self.0.value.borrow_mut() = f(old);
        Ok(())
    }

    pub fn freeze(&self) {
        self.0.frozen.set(true);
    }

    pub fn is_frozen(&self) -> bool {
        self.0.frozen.get()
    }

    /// True if both handles point at the same cell.
    pub fn ptr_eq(&self, other: &SharedValue) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the cell, stable for its lifetime.
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for SharedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Contents are not printed: a cell may contain itself.
        f.debug_struct("SharedValue")
            .field("addr", &format_args!("{:#x}", self.addr()))
            .field("frozen", &self.is_frozen())
            .finish()
    }
}
