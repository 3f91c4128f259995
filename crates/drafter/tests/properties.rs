mod common;

use common::{assert_round_trip, with_patches};
use drafter::{create, create_draft, Draft, Options};
use drafter_value::{deep_clone, same, value, Value};
use proptest::prelude::*;

const FIELDS: [&str; 4] = ["k0", "k1", "k2", "k3"];

#[derive(Debug, Clone)]
enum Op {
    SetField(usize, i64),
    DeleteField(usize),
    SetNested(i64),
    ReassignNestedOriginal,
    MoveNestedTo(usize),
    SetFreshRecord(usize, i64),
    ReassignFresh(usize),
    Push(i64),
    Pop,
    SetIndex(usize, i64),
    Insert(usize, i64),
    Remove(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..4, 0i64..4).prop_map(|(f, v)| Op::SetField(f, v)),
        (0usize..4).prop_map(Op::DeleteField),
        (0i64..4).prop_map(Op::SetNested),
        Just(Op::ReassignNestedOriginal),
        (0usize..4).prop_map(Op::MoveNestedTo),
        (0usize..4, 0i64..4).prop_map(|(f, v)| Op::SetFreshRecord(f, v)),
        (0usize..4).prop_map(Op::ReassignFresh),
        (0i64..4).prop_map(Op::Push),
        Just(Op::Pop),
        (0usize..6, 0i64..4).prop_map(|(i, v)| Op::SetIndex(i, v)),
        (0usize..6, 0i64..4).prop_map(|(i, v)| Op::Insert(i, v)),
        (0usize..6).prop_map(Op::Remove),
    ]
}

fn base() -> Value {
    value!({
        "k0": 0,
        "k1": 1,
        "k2": 2,
        "nested": {"n": 0},
        "list": [0, 1, 2],
        "other": {"x": [1]}
    })
}

fn run(draft: &Draft, ops: &[Op]) -> drafter::Result<()> {
    for op in ops {
        match *op {
            Op::SetField(f, v) => draft.set(FIELDS[f], v)?,
            Op::DeleteField(f) => draft.delete(FIELDS[f])?,
            Op::SetNested(v) => draft.child("nested")?.set("n", v)?,
            Op::ReassignNestedOriginal => {
                let nested = draft.child("nested")?;
                draft.set("nested", nested.original()?)?;
            }
            Op::MoveNestedTo(f) => {
                let nested = draft.child("nested")?;
                draft.set(FIELDS[f], nested)?;
            }
            Op::SetFreshRecord(f, v) => {
                draft.set(FIELDS[f], Value::record([("f", Value::Int(v))]))?;
                draft.child(FIELDS[f])?.set("g", v)?;
            }
            Op::ReassignFresh(f) => {
                let fresh = Value::record([("f", Value::Int(0))]);
                draft.set(FIELDS[f], fresh.clone())?;
                draft.child(FIELDS[f])?;
                draft.set(FIELDS[f], fresh)?;
            }
            Op::Push(v) => {
                draft.child("list")?.as_sequence()?.push(v)?;
            }
            Op::Pop => {
                draft.child("list")?.as_sequence()?.pop()?;
            }
            Op::SetIndex(i, v) => {
                let list = draft.child("list")?.as_sequence()?;
                if i < list.len()? {
                    list.set(i, v)?;
                }
            }
            Op::Insert(i, v) => draft.child("list")?.as_sequence()?.insert(i, v)?,
            Op::Remove(i) => {
                draft.child("list")?.as_sequence()?.remove(i)?;
            }
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn patches_round_trip(ops in prop::collection::vec(op(), 0..24)) {
        let base = base();
        let produced = create(base.clone(), |draft| run(draft, &ops), &with_patches()).unwrap();
        assert_round_trip(&base, &produced);
    }

    #[test]
    fn untouched_subtrees_are_shared(ops in prop::collection::vec(op(), 0..24)) {
        let base = base();
        let snapshot = deep_clone(&base);
        let state = create(base.clone(), |draft| run(draft, &ops), &Options::default())
            .unwrap()
            .state;
        prop_assert!(same(state.get("other").unwrap(), base.get("other").unwrap()));
        prop_assert_eq!(&base, &snapshot);
        if ops.is_empty() {
            prop_assert!(same(&state, &base));
        }
    }

    #[test]
    fn current_matches_the_finished_state(ops in prop::collection::vec(op(), 0..24)) {
        let (draft, finisher) = create_draft(base(), &Options::default()).unwrap();
        run(&draft, &ops).unwrap();
        let snapshot = draft.current().unwrap();
        prop_assert_eq!(snapshot, finisher.finish().unwrap().state);
    }

    #[test]
    fn no_patches_when_every_write_is_reverted(ops in prop::collection::vec(op(), 0..12)) {
        let base = base();
        let produced = create(
            base.clone(),
            |draft| -> drafter::Result<()> {
                run(draft, &ops)?;
                for field in ["k0", "k1", "k2"] {
                    draft.set(field, base.get(field).cloned().unwrap_or(Value::Null))?;
                }
                draft.delete("k3")?;
                draft.set("nested", base.get("nested").cloned().unwrap_or(Value::Null))?;
                draft.set("list", base.get("list").cloned().unwrap_or(Value::Null))
            },
            &with_patches(),
        )
        .unwrap();
        prop_assert_eq!(&produced.state, &base);
        prop_assert!(produced.patches.unwrap().is_empty());
    }
}
