use drafter_value::{ValueError, ValueKind};
use thiserror::Error;

use crate::node::DraftKind;
use crate::patch::PatchError;

#[derive(Debug, Error, PartialEq)]
pub enum DraftError {
    /// The base is not a record, sequence, mapping or set, and is not opaque.
    #[error("cannot draft a {0} base")]
    InvalidBaseKind(ValueKind),
    #[error("structural violation: {0}")]
    StructuralViolation(#[from] Violation),
    /// The handle's session has already finished or was abandoned.
    #[error("draft handle used after finalization")]
    UseAfterFinalize,
    #[error("draft already finalized")]
    DoubleFinalization,
    /// The mutator returned a value instead of nothing.
    #[error("mutator must not return a value")]
    MutatorContractViolation,
    #[error("not a draft: {0}")]
    NotDraftable(String),
    #[error("draft contains itself")]
    CircularDraft,
    /// A handle was used from inside a marker, while its session was busy.
    #[error("draft session re-entered while in use")]
    Reentrant,
    #[error(transparent)]
    Value(#[from] ValueError),
    #[error(transparent)]
    Patch(#[from] PatchError),
}

/// Shape violations raised at the offending operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Violation {
    #[error("mappings have no properties; use the mapping adapter")]
    MappingProperty,
    #[error("sets have no properties; use the set adapter")]
    SetProperty,
    #[error("set elements cannot be read by key")]
    SetRead,
    #[error("invalid sequence key {0:?}")]
    SequenceKey(String),
    #[error("sequence length must be a non-negative integer")]
    InvalidLength,
    #[error("cannot change the prototype of a draft")]
    SetPrototype,
    #[error("cannot define a property on a draft")]
    DefineProperty,
    #[error("expected a {expected} draft, found {found}")]
    KindMismatch { expected: DraftKind, found: DraftKind },
}

pub type Result<T> = std::result::Result<T, DraftError>;
