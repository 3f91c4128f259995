//! Computed fields for tagged records.
//!
//! A tagged record may declare fields that are not stored but computed. The
//! engine consults this table only for keys absent from a record's current
//! view: a getter answers the read, a setter takes the write. Both receive
//! the handle itself, so they can read and write other fields through it.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::draft::Draft;
use crate::error::Result;
use crate::item::Item;

pub type Getter = Rc<dyn Fn(&Draft) -> Result<Option<Item>>>;
pub type Setter = Rc<dyn Fn(&Draft, Item) -> Result<()>>;

#[derive(Clone, Default)]
struct ComputedFields {
    getters: HashMap<String, Getter>,
    setters: HashMap<String, Setter>,
}

/// Per-tag table of computed fields.
///
/// ```
/// use drafter::{Accessors, Item};
///
/// let accessors = Accessors::new().getter("Point", "sum", |point| {
///     let x = point.value("x")?.and_then(|v| v.as_i64()).unwrap_or(0);
///     let y = point.value("y")?.and_then(|v| v.as_i64()).unwrap_or(0);
///     Ok(Some(Item::from(x + y)))
/// });
/// assert!(accessors.has_getter("Point", "sum"));
/// ```
#[derive(Clone, Default)]
pub struct Accessors {
    types: HashMap<String, ComputedFields>,
}

impl Accessors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn getter<F>(mut self, tag: &str, field: &str, getter: F) -> Self
    where
        F: Fn(&Draft) -> Result<Option<Item>> + 'static,
    {
        self.types
            .entry(tag.to_string())
            .or_default()
            .getters
            .insert(field.to_string(), Rc::new(getter));
        self
    }

    pub fn setter<F>(mut self, tag: &str, field: &str, setter: F) -> Self
    where
        F: Fn(&Draft, Item) -> Result<()> + 'static,
    {
        self.types
            .entry(tag.to_string())
            .or_default()
            .setters
            .insert(field.to_string(), Rc::new(setter));
        self
    }

    pub fn has_getter(&self, tag: &str, field: &str) -> bool {
        self.types.get(tag).is_some_and(|t| t.getters.contains_key(field))
    }

    pub fn has_setter(&self, tag: &str, field: &str) -> bool {
        self.types.get(tag).is_some_and(|t| t.setters.contains_key(field))
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub(crate) fn get(&self, tag: &str, field: &str) -> Option<Getter> {
        self.types.get(tag)?.getters.get(field).cloned()
    }

    pub(crate) fn set(&self, tag: &str, field: &str) -> Option<Setter> {
        self.types.get(tag)?.setters.get(field).cloned()
    }
}

impl fmt::Debug for Accessors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (tag, fields) in &self.types {
            let mut names: Vec<&str> = fields
                .getters
                .keys()
                .chain(fields.setters.keys())
                .map(String::as_str)
                .collect();
            names.sort_unstable();
            names.dedup();
            map.entry(tag, &names);
        }
        map.finish()
    }
}
