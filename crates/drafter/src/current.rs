use drafter_value::Value;

use crate::draft::Draft;
use crate::error::{DraftError, Result};
use crate::node::{NodeId, Slot};
use crate::session::Session;

/// Snapshot the current logical value of a draft.
///
/// Unlike finishing, this leaves the session open. Untouched subtrees are
/// returned as the original values themselves.
///
/// ```
/// use drafter::{create_draft, current, Options};
/// use drafter_value::value;
///
/// let (draft, _finisher) = create_draft(value!({"a": 1}), &Options::default()).unwrap();
/// draft.set("a", 2).unwrap();
/// assert_eq!(current(&draft).unwrap(), value!({"a": 2}));
/// ```
pub fn current(draft: &Draft) -> Result<Value> {
    draft.current()
}

pub(crate) fn current_value(session: &Session, id: NodeId, stack: &mut Vec<NodeId>) -> Result<Value> {
    let node = session.node(id);
    let copy = match &node.copy {
        Some(copy) if node.operated => copy,
        _ => return Ok(node.original.clone()),
    };
    if stack.contains(&id) {
        return Err(DraftError::CircularDraft);
    }
    stack.push(id);
    let value = copy.assemble(|slot| match slot {
        Slot::Value(value) => Ok(value.clone()),
        Slot::Draft(child) => current_value(session, *child, stack),
    })?;
    stack.pop();
    Ok(value)
}
