//! Session configuration.

use std::fmt;
use std::rc::Rc;

use drafter_value::Value;
use serde::Deserialize;

use crate::accessors::Accessors;

/// Classification returned by a [`Marker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// Opaque: returned and stored by reference, never drafted.
    Mutable,
    /// Drafted as usual.
    Immutable,
}

/// Classifies encountered values. `None` means no opinion.
///
/// The marker is called while the session is busy. Handles it touches fail
/// with [`DraftError::Reentrant`](crate::DraftError::Reentrant).
pub type Marker = Rc<dyn Fn(&Value) -> Option<Mark>>;

/// Options for a drafting session.
///
/// Only the two flags are read from configuration; the marker and accessor
/// table are code.
///
/// ```
/// use drafter::Options;
///
/// let options: Options =
///     serde_json::from_str(r#"{"enablePatches": true}"#).unwrap();
/// assert!(options.enable_patches);
/// assert!(!options.enable_auto_freeze);
/// ```
#[derive(Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Freeze every cell reachable from the finalized state.
    pub enable_auto_freeze: bool,
    /// Produce forward and inverse patches alongside the state.
    pub enable_patches: bool,
    #[serde(skip)]
    pub mark: Option<Marker>,
    #[serde(skip)]
    pub accessors: Accessors,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patches(mut self) -> Self {
        self.enable_patches = true;
        self
    }

    pub fn with_auto_freeze(mut self) -> Self {
        self.enable_auto_freeze = true;
        self
    }

    pub fn with_marker<F>(mut self, marker: F) -> Self
    where
        F: Fn(&Value) -> Option<Mark> + 'static,
    {
        self.mark = Some(Rc::new(marker));
        self
    }

    pub fn with_accessors(mut self, accessors: Accessors) -> Self {
        self.accessors = accessors;
        self
    }

    pub fn classify(&self, value: &Value) -> Option<Mark> {
        self.mark.as_ref().and_then(|mark| mark(value))
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("enable_auto_freeze", &self.enable_auto_freeze)
            .field("enable_patches", &self.enable_patches)
            .field("mark", &self.mark.as_ref().map(|_| "<fn>"))
            .field("accessors", &self.accessors)
            .finish()
    }
}
