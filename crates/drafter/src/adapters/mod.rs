//! Typed handles per container kind.
//!
//! Each handle wraps a [`Draft`] of a known kind and exposes that
//! container's own operation set. Mappings and sets are only writable
//! through their handles.

pub mod map;
pub mod record;
pub mod sequence;
pub mod set;

pub use map::MapDraft;
pub use record::RecordDraft;
pub use sequence::SequenceDraft;
pub use set::SetDraft;

use crate::draft::Draft;
use crate::error::{Result, Violation};
use crate::node::DraftKind;

impl Draft {
    fn expect_kind(&self, expected: DraftKind) -> Result<Draft> {
        let found = self.kind()?;
        if found != expected {
            return Err(Violation::KindMismatch { expected, found }.into());
        }
        Ok(self.clone())
    }

    pub fn as_record(&self) -> Result<RecordDraft> {
        self.expect_kind(DraftKind::Record).map(RecordDraft::new)
    }

    pub fn as_sequence(&self) -> Result<SequenceDraft> {
        self.expect_kind(DraftKind::Sequence).map(SequenceDraft::new)
    }

    pub fn as_map(&self) -> Result<MapDraft> {
        self.expect_kind(DraftKind::Mapping).map(MapDraft::new)
    }

    pub fn as_set(&self) -> Result<SetDraft> {
        self.expect_kind(DraftKind::Set).map(SetDraft::new)
    }
}
