//! Patch generation for one finalized node.
//!
//! Keyed containers walk the ledger in assignment order. Sequences compare
//! the common prefix slot by slot, then report growth or shrinkage at the
//! tail. Sets diff their element collections.

use drafter_value::{same, Path, PathStep, Value};

use super::types::Patch;
use crate::key::Key;
use crate::node::{Assignment, Node};

/// Forward records with their inverses, in emission order.
#[derive(Debug, Default)]
pub(crate) struct PatchSink {
    pub(crate) forward: Vec<Patch>,
    pub(crate) inverse: Vec<Patch>,
}

impl PatchSink {
    fn push(&mut self, forward: Patch, inverse: Patch) {
        self.forward.push(forward);
        self.inverse.push(inverse);
    }

    /// Inverses in reverse emission order, so they undo the forward list
    /// when applied front to back.
    pub(crate) fn into_patches(mut self) -> super::Patches {
        self.inverse.reverse();
        super::Patches {
            forward: self.forward,
            inverse: self.inverse,
        }
    }
}

fn child_path(base: &[PathStep], step: PathStep) -> Path {
    let mut path = Vec::with_capacity(base.len() + 1);
    path.extend_from_slice(base);
    path.push(step);
    path
}

/// Emit records for `node`, whose finalized value is `value`, at `base`.
pub(crate) fn generate(node: &Node, base: &[PathStep], value: &Value, sink: &mut PatchSink) {
    match (&node.original, value) {
        (Value::Record(original), Value::Record(current)) => {
            for (key, assignment) in &node.assigned {
                if let Key::Field(field) = key {
                    emit_keyed(
                        child_path(base, key.to_step()),
                        *assignment,
                        original.get(field),
                        current.get(field),
                        sink,
                    );
                }
            }
        }
        (Value::Mapping(original), Value::Mapping(current)) => {
            for (key, assignment) in &node.assigned {
                if let Key::Entry(k) = key {
                    emit_keyed(
                        child_path(base, key.to_step()),
                        *assignment,
                        original.get(k),
                        current.get(k),
                        sink,
                    );
                }
            }
        }
        (Value::Sequence(original), Value::Sequence(current)) => {
            generate_sequence(node, base, original, current, sink);
        }
        (Value::Set(original), Value::Set(current)) => {
            for element in original.iter().filter(|e| !current.contains(*e)) {
                let path = child_path(base, PathStep::Entry(element.clone()));
                sink.push(
                    Patch::Remove { path: path.clone() },
                    Patch::Add { path, value: element.clone() },
                );
            }
            for element in current.iter().filter(|e| !original.contains(*e)) {
                let path = child_path(base, PathStep::Entry(element.clone()));
                sink.push(
                    Patch::Add { path: path.clone(), value: element.clone() },
                    Patch::Remove { path },
                );
            }
        }
        _ => {}
    }
}

fn emit_keyed(
    path: Path,
    assignment: Assignment,
    original: Option<&Value>,
    current: Option<&Value>,
    sink: &mut PatchSink,
) {
    match (original, current) {
        (Some(original), Some(current)) => {
            if assignment.is_assigned() && !same(original, current) {
                sink.push(
                    Patch::Replace { path: path.clone(), value: current.clone() },
                    Patch::Replace { path, value: original.clone() },
                );
            }
        }
        (None, Some(current)) => {
            if assignment.is_assigned() {
                sink.push(
                    Patch::Add { path: path.clone(), value: current.clone() },
                    Patch::Remove { path },
                );
            }
        }
        (Some(original), None) => {
            sink.push(
                Patch::Remove { path: path.clone() },
                Patch::Add { path, value: original.clone() },
            );
        }
        (None, None) => {}
    }
}

fn generate_sequence(node: &Node, base: &[PathStep], original: &[Value], current: &[Value], sink: &mut PatchSink) {
    let common = original.len().min(current.len());
    for index in 0..common {
        let assigned = node
            .assigned
            .get(&Key::Index(index))
            .is_some_and(|a| a.is_assigned());
        if assigned && !same(&original[index], &current[index]) {
            let path = child_path(base, PathStep::Index(index));
            sink.push(
                Patch::Replace { path: path.clone(), value: current[index].clone() },
                Patch::Replace { path, value: original[index].clone() },
            );
        }
    }
    for (index, value) in current.iter().enumerate().skip(common) {
        let path = child_path(base, PathStep::Index(index));
        sink.push(
            Patch::Add { path: path.clone(), value: value.clone() },
            Patch::Remove { path },
        );
    }
    for index in (common..original.len()).rev() {
        let path = child_path(base, PathStep::Index(index));
        sink.push(
            Patch::Remove { path: path.clone() },
            Patch::Add { path, value: original[index].clone() },
        );
    }
}
