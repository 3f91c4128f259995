#![allow(dead_code)]

use drafter::{apply_patches, Options, Produced};
use drafter_value::{deep_clone, PathStep, Value};

/// Path of field names and sequence indices, e.g. `path(&["a", "0"])`.
pub fn path(steps: &[&str]) -> Vec<PathStep> {
    steps
        .iter()
        .map(|step| match step.parse::<usize>() {
            Ok(index) => PathStep::Index(index),
            Err(_) => PathStep::Field(step.to_string()),
        })
        .collect()
}

pub fn with_patches() -> Options {
    Options::new().with_patches()
}

/// Forward patches rebuild the state from an unshared copy of the base, and
/// inverse patches rebuild the base from an unshared copy of the state.
pub fn assert_round_trip(base: &Value, produced: &Produced) {
    let patches = produced
        .patches
        .as_ref()
        .expect("patches were not enabled");
    let forward = apply_patches(deep_clone(base), &patches.forward).expect("forward patches apply");
    assert_eq!(forward, produced.state, "forward patches: {:?}", patches.forward);
    let inverse =
        apply_patches(deep_clone(&produced.state), &patches.inverse).expect("inverse patches apply");
    assert_eq!(&inverse, base, "inverse patches: {:?}", patches.inverse);
}
