mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::with_patches;
use drafter::{create, create_draft, is_draftable, produce, Draft, DraftError, Item, Mark, Options};
use drafter_value::{same, value, Value};

fn sequences_are_mutable() -> Options {
    Options::new().with_marker(|value| value.as_sequence().map(|_| Mark::Mutable))
}

#[test]
fn marked_values_are_returned_by_reference() {
    let base = value!({"list": [1, 2], "rec": {"a": 1}});
    let (draft, _finisher) = create_draft(base.clone(), &sequences_are_mutable()).unwrap();

    let list = draft.get("list").unwrap().unwrap();
    assert!(!list.is_draft());
    assert!(same(list.as_value().unwrap(), base.get("list").unwrap()));
    assert!(draft.get("rec").unwrap().unwrap().is_draft());
}

#[test]
fn marked_base_produces_no_patches() {
    let produced = create(
        value!([1]),
        |draft| draft.set(0usize, 5),
        &sequences_are_mutable().with_patches().with_auto_freeze(),
    )
    .unwrap();
    assert_eq!(produced.state, value!([5]));
    assert!(produced.patches.unwrap().is_empty());
}

#[test]
fn opaque_scalar_bases_pass_through() {
    let everything_mutable = Options::new()
        .with_marker(|_| Some(Mark::Mutable))
        .with_patches();
    let produced = create(Value::Int(1), |_| (), &everything_mutable).unwrap();
    assert_eq!(produced.state, Value::Int(1));
    assert!(produced.patches.unwrap().is_empty());

    let cell = Value::shared(Value::Int(1));
    let produced = create(cell.clone(), |_| (), &with_patches()).unwrap();
    assert!(same(&produced.state, &cell));
    assert!(produced.patches.unwrap().is_empty());

    let err = create(Value::Int(1), |_| (), &Options::default()).unwrap_err();
    assert!(matches!(err, DraftError::InvalidBaseKind(_)));
}

#[test]
fn handles_over_an_opaque_base_cannot_be_read_through() {
    let cell = Value::shared(Value::str("x"));
    let (draft, finisher) = create_draft(cell.clone(), &Options::default()).unwrap();
    assert!(matches!(draft.get("a"), Err(DraftError::NotDraftable(_))));
    assert!(!draft.is_live());
    assert!(same(&finisher.finish().unwrap().state, &cell));
}

#[test]
fn cell_base_is_written_back() {
    let cell = Value::shared(value!({"a": 1}));
    let produced = create(cell.clone(), |draft| draft.set("a", 2), &with_patches()).unwrap();

    let handle = cell.as_shared().unwrap();
    assert!(same(&produced.state, &cell));
    assert_eq!(handle.get(), value!({"a": 2}));
    assert!(produced.patches.unwrap().is_empty());
    assert!(!handle.is_frozen());
}

#[test]
fn cells_inside_the_state_are_shared_not_drafted() {
    let cell = Value::shared(value!({"n": 1}));
    let base = Value::record([("cell", cell.clone())]);
    let state = produce(base, |draft| -> drafter::Result<()> {
        let item = draft.get("cell")?;
        assert!(matches!(item, Some(Item::Value(Value::Shared(_)))));
        draft.set("other", 1)
    })
    .unwrap();
    assert!(same(state.get("cell").unwrap(), &cell));
}

#[test]
fn auto_freeze_freezes_reachable_cells() {
    let kept = Value::shared(Value::Int(1));
    let skipped = Value::shared(value!([1]));
    let options = Options::new()
        .with_auto_freeze()
        .with_marker(|value| {
            value
                .as_shared()
                .filter(|cell| cell.get().as_sequence().is_some())
                .map(|_| Mark::Mutable)
        });
    let base = Value::record([("kept", kept.clone()), ("skipped", skipped.clone())]);
    create(base, |draft| draft.set("x", 1), &options).unwrap();

    assert!(kept.as_shared().unwrap().is_frozen());
    assert!(!skipped.as_shared().unwrap().is_frozen());
}

#[test]
fn freezing_is_off_by_default() {
    let cell = Value::shared(Value::Int(1));
    produce(Value::record([("c", cell.clone())]), |draft| draft.set("x", 1)).unwrap();
    assert!(!cell.as_shared().unwrap().is_frozen());
}

#[test]
fn a_marker_touching_a_handle_gets_an_error() {
    let handle: Rc<RefCell<Option<Draft>>> = Rc::default();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let options = {
        let (handle, seen) = (Rc::clone(&handle), Rc::clone(&seen));
        Options::new().with_marker(move |_| {
            if let Some(draft) = handle.borrow().as_ref() {
                seen.borrow_mut().push(draft.len());
            }
            None
        })
    };
    let (draft, finisher) = create_draft(value!({"a": {"b": 1}}), &options).unwrap();
    *handle.borrow_mut() = Some(draft.clone());
    draft.child("a").unwrap().set("b", 2).unwrap();
    handle.borrow_mut().take();

    assert!(!seen.borrow().is_empty());
    assert!(seen.borrow().iter().all(|len| *len == Err(DraftError::Reentrant)));
    assert_eq!(finisher.finish().unwrap().state, value!({"a": {"b": 2}}));
}

#[test]
fn options_deserialize_from_camel_case() {
    let options: Options =
        serde_json::from_str(r#"{"enableAutoFreeze": true, "enablePatches": true}"#).unwrap();
    assert!(options.enable_auto_freeze && options.enable_patches);
    let defaults: Options = serde_json::from_str("{}").unwrap();
    assert!(!defaults.enable_auto_freeze && !defaults.enable_patches);
    assert!(is_draftable(&value!({}), &defaults));
}
