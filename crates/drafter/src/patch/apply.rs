//! Patch application.
//!
//! Add, replace and remove over the value model. Navigation clones shared
//! containers on the way down (`Rc::make_mut`), so applying patches never
//! disturbs other holders of the same substructure.

use std::borrow::Cow;
use std::rc::Rc;

use drafter_value::{PathStep, Value};

use super::types::{Patch, PatchError};

// ── Path navigation ───────────────────────────────────────────────────────

fn field_of(step: &PathStep) -> Result<Cow<'_, str>, PatchError> {
    match step {
        PathStep::Field(field) => Ok(Cow::Borrowed(field)),
        PathStep::Index(index) => Ok(Cow::Owned(index.to_string())),
        PathStep::Entry(Value::Str(s)) => Ok(Cow::Borrowed(s)),
        PathStep::Entry(_) => Err(PatchError::InvalidTarget),
    }
}

fn index_of(step: &PathStep) -> Result<usize, PatchError> {
    match step {
        PathStep::Index(index) => Ok(*index),
        PathStep::Field(field) => field.parse().map_err(|_| PatchError::InvalidIndex),
        PathStep::Entry(Value::Int(i)) => usize::try_from(*i).map_err(|_| PatchError::InvalidIndex),
        PathStep::Entry(_) => Err(PatchError::InvalidIndex),
    }
}

fn entry_of(step: &PathStep) -> Value {
    match step {
        PathStep::Field(field) => Value::str(field),
        PathStep::Index(index) => Value::from(*index),
        PathStep::Entry(key) => key.clone(),
    }
}

/// Mutable navigation to the value at `path` (must exist).
fn get_mut_at<'a>(doc: &'a mut Value, path: &[PathStep]) -> Result<&'a mut Value, PatchError> {
    let mut cursor = doc;
    for step in path {
        cursor = match cursor {
            Value::Record(record) => Rc::make_mut(record)
                .get_mut(&field_of(step)?)
                .ok_or(PatchError::NotFound)?,
            Value::Sequence(items) => {
                let index = index_of(step)?;
                Rc::make_mut(items).get_mut(index).ok_or(PatchError::NotFound)?
            }
            Value::Mapping(entries) => Rc::make_mut(entries)
                .get_mut(&entry_of(step))
                .ok_or(PatchError::NotFound)?,
            _ => return Err(PatchError::InvalidTarget),
        };
    }
    Ok(cursor)
}

// ── Individual operation applicators ─────────────────────────────────────

fn apply_add(doc: &mut Value, path: &[PathStep], value: Value) -> Result<(), PatchError> {
    let Some((key, parent_path)) = path.split_last() else {
        *doc = value;
        return Ok(());
    };
    match get_mut_at(doc, parent_path)? {
        Value::Record(record) => {
            Rc::make_mut(record).insert(field_of(key)?.into_owned(), value);
        }
        Value::Sequence(items) => {
            let items = Rc::make_mut(items);
            if matches!(key, PathStep::Field(f) if f == "-") {
                items.push(value);
            } else {
                let index = index_of(key)?;
                if index > items.len() {
                    return Err(PatchError::InvalidIndex);
                }
                items.insert(index, value);
            }
        }
        Value::Mapping(entries) => {
            Rc::make_mut(entries).insert(entry_of(key), value);
        }
        Value::Set(elements) => {
            Rc::make_mut(elements).insert(value);
        }
        _ => return Err(PatchError::InvalidTarget),
    }
    Ok(())
}

fn apply_remove(doc: &mut Value, path: &[PathStep]) -> Result<(), PatchError> {
    let Some((key, parent_path)) = path.split_last() else {
        return Err(PatchError::InvalidTarget);
    };
    let removed = match get_mut_at(doc, parent_path)? {
        Value::Record(record) => Rc::make_mut(record).remove(&field_of(key)?).is_some(),
        Value::Sequence(items) => {
            let index = index_of(key)?;
            let items = Rc::make_mut(items);
            if index >= items.len() {
                return Err(PatchError::NotFound);
            }
            items.remove(index);
            true
        }
        Value::Mapping(entries) => Rc::make_mut(entries).shift_remove(&entry_of(key)).is_some(),
        Value::Set(elements) => Rc::make_mut(elements).shift_remove(&entry_of(key)),
        _ => return Err(PatchError::InvalidTarget),
    };
    if removed {
        Ok(())
    } else {
        Err(PatchError::NotFound)
    }
}

fn apply_replace(doc: &mut Value, path: &[PathStep], value: Value) -> Result<(), PatchError> {
    if path.is_empty() {
        *doc = value;
        return Ok(());
    }
    *get_mut_at(doc, path)? = value;
    Ok(())
}

// ── Main apply function ───────────────────────────────────────────────────

/// Apply a single patch to the document in place.
pub fn apply_patch(doc: &mut Value, patch: &Patch) -> Result<(), PatchError> {
    match patch {
        Patch::Add { path, value } => apply_add(doc, path, value.clone()),
        Patch::Replace { path, value } => apply_replace(doc, path, value.clone()),
        Patch::Remove { path } => apply_remove(doc, path),
    }
}

/// Apply patches in order, returning the final document.
pub fn apply_patches(mut doc: Value, patches: &[Patch]) -> Result<Value, PatchError> {
    for patch in patches {
        apply_patch(&mut doc, patch)?;
    }
    Ok(doc)
}

// ── Tests ─────────────────────────────────────────────────────────────────
