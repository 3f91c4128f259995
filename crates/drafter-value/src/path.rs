//! Paths into a value graph.
//!
//! A path is the sequence of keys walked from the root to a node. Steps are
//! typed: record fields, sequence indices, and mapping or set entries keyed
//! by an arbitrary value. Paths render as RFC 6901 pointers for display.

use std::fmt;

use crate::value::Value;

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Record field.
    Field(String),
    /// Sequence index.
    Index(usize),
    /// Mapping key or set element.
    Entry(Value),
}

/// Root-to-node key sequence. The empty path is the root.
pub type Path = Vec<PathStep>;

impl From<&str> for PathStep {
    fn from(field: &str) -> Self {
        PathStep::Field(field.to_string())
    }
}

impl From<String> for PathStep {
    fn from(field: String) -> Self {
        PathStep::Field(field)
    }
}

impl From<usize> for PathStep {
    fn from(index: usize) -> Self {
        PathStep::Index(index)
    }
}

impl From<Value> for PathStep {
    fn from(key: Value) -> Self {
        PathStep::Entry(key)
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Field(field) => f.write_str(&escape_component(field)),
            PathStep::Index(index) => write!(f, "{index}"),
            PathStep::Entry(Value::Str(s)) => f.write_str(&escape_component(s)),
            PathStep::Entry(key) => f.write_str(&escape_component(&key.to_json().to_string())),
        }
    }
}

/// Escapes a pointer component.
///
/// `/` is replaced with `~1` and `~` is replaced with `~0`.
///
/// ```
/// use drafter_value::escape_component;
///
/// assert_eq!(escape_component("a~b"), "a~0b");
/// assert_eq!(escape_component("c/d"), "c~1d");
/// ```
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Render a path as a pointer string. The root renders as `""`.
///
/// ```
/// use drafter_value::{format_pointer, PathStep};
///
/// assert_eq!(format_pointer(&[]), "");
/// assert_eq!(format_pointer(&["foo".into(), PathStep::Index(0)]), "/foo/0");
/// ```
pub fn format_pointer(path: &[PathStep]) -> String {
    let mut out = String::new();
    for step in path {
        out.push('/');
        out.push_str(&step.to_string());
    }
    out
}
