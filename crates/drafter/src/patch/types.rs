use drafter_value::{format_pointer, Path, PathStep, Value};
use serde_json::{json, Value as Json};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatchError {
    #[error("NOT_FOUND")]
    NotFound,
    #[error("INVALID_INDEX")]
    InvalidIndex,
    #[error("INVALID_TARGET")]
    InvalidTarget,
}

/// One change record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch {
    Add { path: Path, value: Value },
    Replace { path: Path, value: Value },
    Remove { path: Path },
}

impl Patch {
    pub fn op_name(&self) -> &'static str {
        match self {
            Patch::Add { .. } => "add",
            Patch::Replace { .. } => "replace",
            Patch::Remove { .. } => "remove",
        }
    }

    pub fn path(&self) -> &[PathStep] {
        match self {
            Patch::Add { path, .. } | Patch::Replace { path, .. } | Patch::Remove { path } => path,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Patch::Add { value, .. } | Patch::Replace { value, .. } => Some(value),
            Patch::Remove { .. } => None,
        }
    }

    /// Pointer rendering of the path, for display.
    pub fn pointer(&self) -> String {
        format_pointer(self.path())
    }

    /// `{"op", "path", "value"}` with the path as an array of steps.
    pub fn to_json(&self) -> Json {
        let path: Vec<Json> = self
            .path()
            .iter()
            .map(|step| match step {
                PathStep::Field(field) => json!(field),
                PathStep::Index(index) => json!(index),
                PathStep::Entry(key) => key.to_json(),
            })
            .collect();
        match self.value() {
            Some(value) => json!({"op": self.op_name(), "path": path, "value": value.to_json()}),
            None => json!({"op": self.op_name(), "path": path}),
        }
    }
}

/// Forward and inverse records of one session.
///
/// Applying `forward` to the base yields the state; applying `inverse` to
/// the state yields the base.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patches {
    pub forward: Vec<Patch>,
    pub inverse: Vec<Patch>,
}

impl Patches {
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}
