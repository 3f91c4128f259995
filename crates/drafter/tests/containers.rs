mod common;

use common::{assert_round_trip, path, with_patches};
use drafter::{create, create_draft, Options, Patch};
use drafter_value::{same, value, PathStep, Value};

fn entry(key: Value) -> PathStep {
    PathStep::Entry(key)
}

#[test]
fn sequence_insert_remove_and_length() {
    let base = value!({"list": [1, 2, 3], "other": [4]});
    let produced = create(
        base.clone(),
        |draft| -> drafter::Result<()> {
            let list = draft.child("list")?.as_sequence()?;
            list.insert(0, 0)?;
            assert_eq!(list.remove(2)?.and_then(|item| item.to_value().ok()), Some(Value::Int(2)));
            assert_eq!(list.push(9)?, 4);
            assert_eq!(list.pop()?.and_then(|item| item.to_value().ok()), Some(Value::Int(9)));
            assert_eq!(list.len()?, 3);
            Ok(())
        },
        &with_patches(),
    )
    .unwrap();
    assert_eq!(produced.state, value!({"list": [0, 1, 3], "other": [4]}));
    assert!(same(produced.state.get("other").unwrap(), base.get("other").unwrap()));
    assert_round_trip(&base, &produced);
}

#[test]
fn sequence_growth_and_truncation() {
    let base = value!([1, 2, 3]);
    let produced = create(
        base.clone(),
        |draft| -> drafter::Result<()> {
            let list = draft.as_sequence()?;
            list.set_len(1)?;
            list.set(3, 7)
        },
        &with_patches(),
    )
    .unwrap();
    assert_eq!(produced.state, value!([1, null, null, 7]));
    assert_round_trip(&base, &produced);
}

#[test]
fn shifted_sequence_elements_are_covered_by_the_parent() {
    let base = value!([{"a": 1}, {"a": 2}]);
    let produced = create(
        base.clone(),
        |draft| -> drafter::Result<()> {
            let list = draft.as_sequence()?;
            list.remove(0)?;
            list.child(0)?.set("a", 5)
        },
        &with_patches(),
    )
    .unwrap();
    assert_eq!(produced.state, value!([{"a": 5}]));
    assert_eq!(
        produced.patches.clone().unwrap().forward,
        vec![
            Patch::Replace { path: path(&["0"]), value: value!({"a": 5}) },
            Patch::Remove { path: path(&["1"]) },
        ]
    );
    assert_round_trip(&base, &produced);
}

#[test]
fn sequence_items_draft_containers() {
    let (draft, finisher) = create_draft(value!([{"n": 1}, 2]), &Options::default()).unwrap();
    let items = draft.as_sequence().unwrap().items().unwrap();
    assert!(items[0].is_draft());
    assert_eq!(items[1].as_value(), Some(&Value::Int(2)));
    items[0].as_draft().unwrap().set("n", 3).unwrap();
    assert_eq!(finisher.finish().unwrap().state, value!([{"n": 3}, 2]));
}

fn sample_mapping() -> Value {
    Value::mapping([
        (Value::Int(1), value!({"n": 1})),
        (Value::str("k"), Value::Int(2)),
    ])
}

#[test]
fn mapping_entries_follow_the_generic_rules() {
    let base = sample_mapping();
    let produced = create(
        base.clone(),
        |draft| -> drafter::Result<()> {
            let map = draft.as_map()?;
            map.child(Value::Int(1))?.set("n", 5)?;
            map.set("new", 3)?;
            assert!(map.delete("k")?);
            assert!(!map.delete("missing")?);
            assert_eq!(map.len()?, 2);
            assert_eq!(map.keys()?, vec![Value::Int(1), Value::str("new")]);
            Ok(())
        },
        &with_patches(),
    )
    .unwrap();

    assert_eq!(
        produced.state,
        Value::mapping([
            (Value::Int(1), value!({"n": 5})),
            (Value::str("new"), Value::Int(3)),
        ])
    );
    assert_eq!(
        produced.patches.clone().unwrap().forward,
        vec![
            Patch::Replace {
                path: vec![entry(Value::Int(1)), PathStep::from("n")],
                value: Value::Int(5),
            },
            Patch::Add { path: vec![entry(Value::str("new"))], value: Value::Int(3) },
            Patch::Remove { path: vec![entry(Value::str("k"))] },
        ]
    );
    assert_round_trip(&base, &produced);
}

#[test]
fn mapping_clear_removes_original_entries() {
    let base = sample_mapping();
    let produced = create(
        base.clone(),
        |draft| -> drafter::Result<()> {
            let map = draft.as_map()?;
            map.set("fresh", 1)?;
            map.clear()?;
            assert!(map.is_empty()?);
            Ok(())
        },
        &with_patches(),
    )
    .unwrap();
    assert_eq!(produced.state, Value::mapping([]));
    assert_eq!(produced.patches.clone().unwrap().forward.len(), 2);
    assert_round_trip(&base, &produced);
}

#[test]
fn mapping_entries_reports_drafts() {
    let (draft, _finisher) = create_draft(sample_mapping(), &Options::default()).unwrap();
    let map = draft.as_map().unwrap();
    let entries = map.entries().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].1.is_draft());
    assert_eq!(entries[1].1.as_value(), Some(&Value::Int(2)));
    assert!(map.has("k").unwrap());
    assert_eq!(map.value("k").unwrap(), Some(Value::Int(2)));
}

#[test]
fn set_membership_and_patches() {
    let base = Value::set([Value::Int(1), Value::Int(2), value!({"a": 1})]);
    let produced = create(
        base.clone(),
        |draft| -> drafter::Result<()> {
            let set = draft.as_set()?;
            assert!(set.has(Value::Int(1))?);
            assert!(!set.add(Value::Int(1))?);
            assert!(set.add(Value::Int(3))?);
            assert!(set.delete(Value::Int(2))?);
            assert!(!set.delete(Value::Int(2))?);

            let element = set
                .values()?
                .into_iter()
                .find_map(|item| item.into_draft().ok())
                .ok_or_else(|| drafter::DraftError::NotDraftable("no element".into()))?;
            element.set("a", 2)?;
            assert!(set.has(&element)?);
            assert!(set.has(value!({"a": 1}))?);
            assert_eq!(set.len()?, 3);
            Ok(())
        },
        &with_patches(),
    )
    .unwrap();

    assert_eq!(
        produced.state,
        Value::set([Value::Int(1), value!({"a": 2}), Value::Int(3)])
    );
    let forward = produced.patches.clone().unwrap().forward;
    assert_eq!(
        forward,
        vec![
            Patch::Remove { path: vec![entry(Value::Int(2))] },
            Patch::Remove { path: vec![entry(value!({"a": 1}))] },
            Patch::Add { path: vec![entry(value!({"a": 2}))], value: value!({"a": 2}) },
            Patch::Add { path: vec![entry(Value::Int(3))], value: Value::Int(3) },
        ]
    );
    assert_round_trip(&base, &produced);
}

#[test]
fn set_add_then_delete_of_a_fresh_element_is_silent() {
    let base = Value::set([Value::Int(1)]);
    let produced = create(
        base.clone(),
        |draft| -> drafter::Result<()> {
            let set = draft.as_set()?;
            set.add(Value::Int(5))?;
            set.delete(Value::Int(5))?;
            Ok(())
        },
        &with_patches(),
    )
    .unwrap();
    assert_eq!(produced.state, base);
    assert!(produced.patches.unwrap().is_empty());
}

#[test]
fn set_clear_empties_the_view() {
    let state = drafter::produce(Value::set([Value::Int(1), Value::Int(2)]), |draft| {
        draft.as_set()?.clear()
    })
    .unwrap();
    assert_eq!(state, Value::set([]));
}

#[test]
fn record_adapter_lists_fields_in_order() {
    let (draft, _finisher) =
        create_draft(Value::tagged_record("T", [("b", Value::Int(1))]), &Options::default()).unwrap();
    let record = draft.as_record().unwrap();
    record.set("a", 2).unwrap();
    assert_eq!(record.fields().unwrap(), vec!["b".to_string(), "a".to_string()]);
    assert_eq!(record.tag().unwrap(), Some("T".to_string()));
    assert!(record.delete("b").unwrap());
    assert_eq!(record.len().unwrap(), 1);
}
