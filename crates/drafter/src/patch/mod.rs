//! Change records.
//!
//! A session with patches enabled emits `add`, `replace` and `remove`
//! records whose paths are typed steps from the root. Mapping entries and
//! set elements are addressed by key value rather than position.

pub mod apply;
pub(crate) mod generate;
pub mod types;

pub use apply::{apply_patch, apply_patches};
pub use types::{Patch, PatchError, Patches};
