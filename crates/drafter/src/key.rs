//! Slot addresses.

use std::fmt;

use drafter_value::{PathStep, Value};

use crate::error::{Result, Violation};
use crate::node::DraftKind;

/// Address of a slot in a draft.
///
/// Callers may pass any variant; it is normalized against the draft's kind
/// before use (see [`Key::normalize`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Field(String),
    Index(usize),
    /// A sequence's length.
    Length,
    /// Mapping key or set element.
    Entry(Value),
}

impl Key {
    /// Rewrite a key into the form used by containers of `kind`.
    ///
    /// - Records: indices and string entries become fields.
    /// - Sequences: canonical decimal fields become indices, `"length"`
    ///   becomes [`Key::Length`], any other field is rejected.
    /// - Mappings and sets: fields and indices become entries.
    pub fn normalize(self, kind: DraftKind) -> Result<Key> {
        match kind {
            DraftKind::Record => Ok(match self {
                Key::Field(field) => Key::Field(field),
                Key::Index(index) => Key::Field(index.to_string()),
                Key::Length => Key::Field("length".to_string()),
                Key::Entry(Value::Str(s)) => Key::Field(s.to_string()),
                Key::Entry(other) => Key::Field(other.to_json().to_string()),
            }),
            DraftKind::Sequence => match self {
                Key::Index(index) => Ok(Key::Index(index)),
                Key::Length => Ok(Key::Length),
                Key::Field(field) => sequence_field(&field),
                Key::Entry(Value::Str(s)) => sequence_field(&s),
                Key::Entry(Value::Int(i)) => usize::try_from(i)
                    .map(Key::Index)
                    .map_err(|_| Violation::SequenceKey(i.to_string()).into()),
                Key::Entry(other) => Err(Violation::SequenceKey(other.to_json().to_string()).into()),
            },
            DraftKind::Mapping | DraftKind::Set => Ok(match self {
                Key::Field(field) => Key::Entry(Value::from(field)),
                Key::Index(index) => Key::Entry(Value::from(index)),
                Key::Length => Key::Entry(Value::str("length")),
                Key::Entry(value) => Key::Entry(value),
            }),
        }
    }

    pub fn to_step(&self) -> PathStep {
        match self {
            Key::Field(field) => PathStep::Field(field.clone()),
            Key::Index(index) => PathStep::Index(*index),
            Key::Length => PathStep::Field("length".to_string()),
            Key::Entry(value) => PathStep::Entry(value.clone()),
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Index(index) => Some(*index),
            _ => None,
        }
    }
}

fn sequence_field(field: &str) -> Result<Key> {
    if field == "length" {
        return Ok(Key::Length);
    }
    if is_canonical_index(field) {
        if let Ok(index) = field.parse::<usize>() {
            return Ok(Key::Index(index));
        }
    }
    Err(Violation::SequenceKey(field.to_string()).into())
}

/// Digits only, no leading zero unless the index is `0`.
fn is_canonical_index(s: &str) -> bool {
    let bytes = s.as_bytes();
    !bytes.is_empty() && (bytes.len() == 1 || bytes[0] != b'0') && bytes.iter().all(u8::is_ascii_digit)
}

impl From<&str> for Key {
    fn from(field: &str) -> Self {
        Key::Field(field.to_string())
    }
}

impl From<String> for Key {
    fn from(field: String) -> Self {
        Key::Field(field)
    }
}

impl From<&String> for Key {
    fn from(field: &String) -> Self {
        Key::Field(field.clone())
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl From<Value> for Key {
    fn from(value: Value) -> Self {
        Key::Entry(value)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Field(field) => f.write_str(field),
            Key::Index(index) => write!(f, "{index}"),
            Key::Length => f.write_str("length"),
            Key::Entry(value) => write!(f, "{}", value.to_json()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DraftError;

    #[test]
    fn sequence_keys() {
        assert_eq!(Key::from("3").normalize(DraftKind::Sequence), Ok(Key::Index(3)));
        assert_eq!(Key::from("length").normalize(DraftKind::Sequence), Ok(Key::Length));
        assert_eq!(
            Key::from("03").normalize(DraftKind::Sequence),
            Err(DraftError::StructuralViolation(Violation::SequenceKey("03".into())))
        );
        assert_eq!(
            Key::from("foo").normalize(DraftKind::Sequence),
            Err(DraftError::StructuralViolation(Violation::SequenceKey("foo".into())))
        );
        assert!(Key::Entry(Value::Int(-1)).normalize(DraftKind::Sequence).is_err());
    }

    #[test]
    fn record_keys_are_fields() {
        assert_eq!(Key::from(2usize).normalize(DraftKind::Record), Ok(Key::Field("2".into())));
        assert_eq!(
            Key::Entry(Value::str("a")).normalize(DraftKind::Record),
            Ok(Key::Field("a".into()))
        );
    }

    #[test]
    fn mapping_keys_are_entries() {
        assert_eq!(
            Key::from("a").normalize(DraftKind::Mapping),
            Ok(Key::Entry(Value::str("a")))
        );
        assert_eq!(
            Key::from(1usize).normalize(DraftKind::Set),
            Ok(Key::Entry(Value::Int(1)))
        );
    }
}
