//! Finalization and patch assembly.
//!
//! Nodes are finalized front to back in registration-list order, which puts
//! descendants before their ancestors. Finalizing a node resolves its
//! child slots on demand and memoizes the result, so a child is assembled
//! once no matter how many slots point at it.

use drafter_value::{Path, Value};
use tracing::debug;

use crate::error::{DraftError, Result};
use crate::freeze::deep_freeze;
use crate::node::{DraftKind, NodeId, Slot, ROOT};
use crate::patch::generate::{generate, PatchSink};
use crate::patch::Patches;
use crate::session::{Passthrough, Phase, Session};

/// Result of a finished session.
#[derive(Debug, Clone)]
pub struct Produced {
    pub state: Value,
    /// `Some` when patches were enabled for the session.
    pub patches: Option<Patches>,
}

impl Session {
    /// Finalize the whole tree, then revoke every handle. Any failure
    /// abandons the session.
    pub(crate) fn finish(&mut self, force_patches: bool) -> Result<Produced> {
        match self.phase {
            Phase::Finalized => return Err(DraftError::DoubleFinalization),
            Phase::Abandoned => return Err(DraftError::UseAfterFinalize),
            Phase::Drafting => {}
        }
        match self.assemble(force_patches) {
            Ok(produced) => {
                self.phase = Phase::Finalized;
                self.revoke();
                if self.options.enable_auto_freeze && self.passthrough.is_off() {
                    deep_freeze(&produced.state, &self.options);
                }
                debug!(
                    nodes = self.nodes.len(),
                    forward = produced.patches.as_ref().map_or(0, |p| p.forward.len()),
                    inverse = produced.patches.as_ref().map_or(0, |p| p.inverse.len()),
                    "finished draft session"
                );
                Ok(produced)
            }
            Err(err) => {
                self.abandon();
                Err(err)
            }
        }
    }

    fn assemble(&mut self, force_patches: bool) -> Result<Produced> {
        let with_patches = force_patches || self.options.enable_patches;
        if let Some(base) = &self.opaque {
            return Ok(Produced {
                state: base.clone(),
                patches: with_patches.then(Patches::default),
            });
        }
        let mut sink = PatchSink::default();
        let order: Vec<NodeId> = self.finalizers.iter().copied().collect();
        for id in order {
            let value = self.finalize_node(id)?;
            if !with_patches || !self.passthrough.is_off() || !self.node(id).operated {
                continue;
            }
            if let Some(path) = self.attached_path(id) {
                generate(self.node(id), &path, &value, &mut sink);
            }
        }
        let mut state = self.finalize_node(ROOT)?;
        if let Passthrough::Cell(cell) = &self.passthrough {
            cell.set(state)?;
            state = Value::Shared(cell.clone());
        }
        Ok(Produced {
            state,
            patches: with_patches.then(|| sink.into_patches()),
        })
    }

    /// Final value of `id`: its original if it never diverged, otherwise its
    /// copy with every child slot finalized.
    pub(crate) fn finalize_node(&mut self, id: NodeId) -> Result<Value> {
        let node = self.node_mut(id);
        if let Some(value) = &node.resolved {
            return Ok(value.clone());
        }
        if node.in_progress {
            return Err(DraftError::CircularDraft);
        }
        let copy = match &node.copy {
            Some(copy) if node.operated => copy.clone(),
            _ => {
                let value = node.original.clone();
                node.resolved = Some(value.clone());
                node.finalized = true;
                return Ok(value);
            }
        };
        node.in_progress = true;
        let value = copy.assemble(|slot| match slot {
            Slot::Value(value) => Ok(value.clone()),
            Slot::Draft(child) => self.finalize_node(*child),
        })?;
        let node = self.node_mut(id);
        node.in_progress = false;
        node.finalized = true;
        node.resolved = Some(value.clone());
        Ok(value)
    }

    /// Path from the root if every hop still holds this node at its own,
    /// unassigned key. Detached nodes are covered by an ancestor's records.
    pub(crate) fn attached_path(&self, id: NodeId) -> Option<Path> {
        let mut steps = Vec::new();
        let mut cursor = id;
        while let Some(parent) = self.node(cursor).parent {
            let key = self.node(cursor).key.as_ref()?;
            let holder = self.node(parent);
            if holder.kind == DraftKind::Set || holder.assigned.contains_key(key) {
                return None;
            }
            match holder.copy.as_ref().and_then(|copy| copy.slot(key)) {
                Some(Slot::Draft(held)) if *held == cursor => {}
                _ => return None,
            }
            steps.push(key.to_step());
            cursor = parent;
        }
        if cursor != ROOT {
            return None;
        }
        steps.reverse();
        Some(steps)
    }
}
