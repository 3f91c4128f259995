//! The per-draft arena.

use std::collections::VecDeque;

use drafter_value::{SharedValue, Value};
use tracing::{debug, trace};

use crate::error::{DraftError, Result};
use crate::key::Key;
use crate::node::{Assignment, DraftKind, Node, NodeId, ShallowCopy, Slot};
use crate::options::{Mark, Options};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Drafting,
    Finalized,
    Abandoned,
}

/// How the base bypasses normal drafting.
#[derive(Debug, Clone)]
pub(crate) enum Passthrough {
    Off,
    /// The marker classified the base as mutable.
    Marked,
    /// The base is a cell; its contents are drafted and written back.
    Cell(SharedValue),
}

impl Passthrough {
    pub(crate) fn is_off(&self) -> bool {
        matches!(self, Passthrough::Off)
    }
}

#[derive(Debug)]
pub(crate) struct Session {
    pub(crate) nodes: Vec<Node>,
    pub(crate) options: Options,
    /// Finalize order: most recently registered first.
    pub(crate) finalizers: VecDeque<NodeId>,
    /// Revoke order: most recently registered first.
    pub(crate) revokers: VecDeque<NodeId>,
    pub(crate) epoch: u64,
    pub(crate) phase: Phase,
    pub(crate) passthrough: Passthrough,
    /// An opaque base with nothing to draft. It is returned unchanged and
    /// the session registers no nodes.
    pub(crate) opaque: Option<Value>,
}

impl Session {
    /// Open a session over `base`, registering the root node.
    pub(crate) fn open(base: Value, options: Options) -> Result<Self> {
        let untouched = base.clone();
        let (root, passthrough) = match base {
            Value::Shared(cell) => (cell.get(), Passthrough::Cell(cell)),
            other if options.classify(&other) == Some(Mark::Mutable) => (other, Passthrough::Marked),
            other => (other, Passthrough::Off),
        };
        let kind = DraftKind::of(&root);
        if kind.is_none() && passthrough.is_off() {
            return Err(DraftError::InvalidBaseKind(root.kind()));
        }
        let mut session = Session {
            nodes: Vec::new(),
            options,
            finalizers: VecDeque::new(),
            revokers: VecDeque::new(),
            epoch: 0,
            phase: Phase::Drafting,
            passthrough,
            opaque: None,
        };
        match kind {
            Some(kind) => {
                session.register(kind, root, None, None);
                debug!(kind = %kind, passthrough = ?session.passthrough, "opened draft session");
            }
            None => {
                debug!(base = %untouched.kind(), "opened opaque session");
                session.opaque = Some(untouched);
            }
        }
        Ok(session)
    }

    pub(crate) fn register(
        &mut self,
        kind: DraftKind,
        original: Value,
        parent: Option<NodeId>,
        key: Option<Key>,
    ) -> NodeId {
        let id = self.nodes.len();
        trace!(node = id, kind = %kind, parent = ?parent, "registered node");
        self.nodes.push(Node::new(kind, original, parent, key));
        self.finalizers.push_front(id);
        self.revokers.push_front(id);
        id
    }

    pub(crate) fn check_live(&self, id: NodeId, epoch: u64) -> Result<()> {
        if self.phase != Phase::Drafting || self.epoch != epoch {
            return Err(DraftError::UseAfterFinalize);
        }
        if let Some(base) = &self.opaque {
            return Err(DraftError::NotDraftable(base.kind().to_string()));
        }
        match self.nodes.get(id) {
            Some(node) if !node.revoked && !node.finalized => Ok(()),
            _ => Err(DraftError::UseAfterFinalize),
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    pub(crate) fn kind(&self, id: NodeId) -> DraftKind {
        self.nodes[id].kind
    }

    /// Create the node's shallow copy if it does not exist yet.
    pub(crate) fn ensure_copy(&mut self, id: NodeId) -> &mut ShallowCopy {
        let node = &mut self.nodes[id];
        if node.copy.is_none() {
            trace!(node = id, "created shallow copy");
        }
        let original = &node.original;
        node.copy
            .get_or_insert_with(|| ShallowCopy::of(original).unwrap_or(ShallowCopy::Sequence(Vec::new())))
    }

    /// Mark `id` and every ancestor as diverged.
    pub(crate) fn mark_changed(&mut self, id: NodeId) {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            self.ensure_copy(current);
            let node = &mut self.nodes[current];
            if node.operated {
                break;
            }
            node.operated = true;
            cursor = node.parent;
        }
    }

    /// True if `value` would be drafted when read.
    pub(crate) fn is_draftable(&self, value: &Value) -> bool {
        value.is_container() && self.options.classify(value) != Some(Mark::Mutable)
    }

    /// Lazily draft the draftable value held in `parent` at `key`.
    pub(crate) fn draft_child(&mut self, parent: NodeId, key: &Key, value: Value) -> Option<NodeId> {
        let kind = DraftKind::of(&value)?;
        let child = self.register(kind, value, Some(parent), Some(key.clone()));
        self.ensure_copy(parent).put(key, Slot::Draft(child));
        // A restored original drafted again is attached like any first read.
        let holder = self.node_mut(parent);
        if holder.assigned.get(key) == Some(&Assignment::Reverted) {
            holder.assigned.shift_remove(key);
        }
        Some(child)
    }

    /// Revoke every handle, most recently created first.
    pub(crate) fn revoke(&mut self) {
        while let Some(id) = self.revokers.pop_front() {
            if let Some(node) = self.nodes.get_mut(id) {
                node.revoked = true;
            }
        }
        self.epoch += 1;
        trace!(nodes = self.nodes.len(), epoch = self.epoch, "revoked handles");
    }

    /// Close the session without producing a state.
    pub(crate) fn abandon(&mut self) {
        if self.phase == Phase::Drafting {
            self.phase = Phase::Abandoned;
            self.revoke();
            debug!(nodes = self.nodes.len(), "abandoned draft session");
        }
    }
}
