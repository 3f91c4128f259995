//! drafter - copy-on-write drafts over persistent values.
//!
//! A mutator writes through a [`Draft`] as if it owned the state; finishing
//! the draft produces the next state. Only nodes along written paths are
//! copied, everything else is shared with the base by reference, and the
//! session can report forward and inverse [`Patch`] lists describing the
//! change.
//!
//! # Example
//!
//! ```
//! use drafter::{create, Options, Patch};
//! use drafter_value::{value, PathStep, Value};
//!
//! let produced = create(
//!     value!({"a": 1}),
//!     |draft| -> drafter::Result<()> {
//!         draft.set("a", 2)?;
//!         draft.set("b", 3)
//!     },
//!     &Options::new().with_patches(),
//! )
//! .unwrap();
//!
//! assert_eq!(produced.state, value!({"a": 2, "b": 3}));
//! let patches = produced.patches.unwrap();
//! assert_eq!(
//!     patches.forward,
//!     vec![
//!         Patch::Replace { path: vec![PathStep::from("a")], value: Value::Int(2) },
//!         Patch::Add { path: vec![PathStep::from("b")], value: Value::Int(3) },
//!     ]
//! );
//! ```

pub mod accessors;
pub mod adapters;
pub mod create;
pub mod current;
pub mod draft;
pub mod engine;
pub mod error;
pub mod finalize;
pub mod freeze;
pub mod item;
pub mod key;
pub mod node;
pub mod options;
pub mod patch;

mod session;

pub use accessors::{Accessors, Getter, Setter};
pub use adapters::{MapDraft, RecordDraft, SequenceDraft, SetDraft};
pub use create::{create, create_async, create_draft, is_draftable, produce, producer, Finisher, MutatorReturn};
pub use current::current;
pub use draft::Draft;
pub use engine::Descriptor;
pub use error::{DraftError, Result, Violation};
pub use finalize::Produced;
pub use freeze::deep_freeze;
pub use item::Item;
pub use key::Key;
pub use node::DraftKind;
pub use options::{Mark, Marker, Options};
pub use patch::{apply_patch, apply_patches, Patch, PatchError, Patches};
