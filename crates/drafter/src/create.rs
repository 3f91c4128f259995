//! Session orchestration: the entry points that open a draft, run the
//! mutator and finish.

use std::cell::{RefCell, RefMut};
use std::future::Future;
use std::rc::Rc;

use drafter_value::Value;

use crate::draft::Draft;
use crate::error::{DraftError, Result};
use crate::finalize::Produced;
use crate::item::Item;
use crate::options::{Mark, Options};
use crate::patch::Patch;
use crate::session::Session;

/// What a mutator may return.
///
/// Returning nothing (or `Ok(())`) finishes the session. Returning a value
/// is a [`DraftError::MutatorContractViolation`].
pub trait MutatorReturn {
    fn into_outcome(self) -> Result<()>;
}

impl MutatorReturn for () {
    fn into_outcome(self) -> Result<()> {
        Ok(())
    }
}

impl<E: Into<DraftError>> MutatorReturn for std::result::Result<(), E> {
    fn into_outcome(self) -> Result<()> {
        self.map_err(Into::into)
    }
}

impl MutatorReturn for Value {
    fn into_outcome(self) -> Result<()> {
        Err(DraftError::MutatorContractViolation)
    }
}

impl MutatorReturn for Item {
    fn into_outcome(self) -> Result<()> {
        Err(DraftError::MutatorContractViolation)
    }
}

/// Finishes a manual draft.
pub struct Finisher {
    session: Rc<RefCell<Session>>,
}

impl Finisher {
    /// Finalize and return the state, with patches if the session's options
    /// enable them.
    pub fn finish(&self) -> Result<Produced> {
        self.session()?.finish(false)
    }

    /// Finalize with patches, handing `(forward, inverse)` to `listener`
    /// before returning the state.
    pub fn finish_with<F>(&self, listener: F) -> Result<Value>
    where
        F: FnOnce(&[Patch], &[Patch]),
    {
        let produced = self.session()?.finish(true)?;
        let patches = produced.patches.unwrap_or_default();
        listener(&patches.forward, &patches.inverse);
        Ok(produced.state)
    }

    /// Close the session without producing a state. Every handle is revoked.
    /// Called from inside a marker, while the session is busy, it does
    /// nothing.
    pub fn abandon(&self) {
        if let Ok(mut session) = self.session() {
            session.abandon();
        }
    }

    fn session(&self) -> Result<RefMut<'_, Session>> {
        self.session.try_borrow_mut().map_err(|_| DraftError::Reentrant)
    }
}

impl std::fmt::Debug for Finisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Finisher").finish_non_exhaustive()
    }
}

fn resolve_base(base: Item) -> Result<Value> {
    match base {
        Item::Value(value) => Ok(value),
        Item::Draft(draft) => draft.current(),
    }
}

/// Open a draft over `base` and return it with its finisher.
///
/// A live draft from another session is accepted as a base; its current
/// value is drafted.
///
/// ```
/// use drafter::{create_draft, Options};
/// use drafter_value::value;
///
/// let (draft, finisher) = create_draft(value!({"a": 1}), &Options::default()).unwrap();
/// draft.set("b", 2).unwrap();
/// let produced = finisher.finish().unwrap();
/// assert_eq!(produced.state, value!({"a": 1, "b": 2}));
/// assert!(!draft.is_live());
/// ```
pub fn create_draft(base: impl Into<Item>, options: &Options) -> Result<(Draft, Finisher)> {
    let base = resolve_base(base.into())?;
    let session = Rc::new(RefCell::new(Session::open(base, options.clone())?));
    let draft = Draft::root(Rc::clone(&session));
    Ok((draft, Finisher { session }))
}

/// Run `mutator` against a draft of `base` and finalize.
///
/// If the mutator fails, every handle is revoked and the error is returned.
///
/// ```
/// use drafter::{create, Options};
/// use drafter_value::{same, value};
///
/// let base = value!({"foo": {"bar": "str"}, "arr": []});
/// let produced = create(
///     base.clone(),
///     |draft| draft.child("foo")?.set("bar", "str2"),
///     &Options::default(),
/// )
/// .unwrap();
/// assert_eq!(produced.state, value!({"foo": {"bar": "str2"}, "arr": []}));
/// assert!(same(produced.state.get("arr").unwrap(), base.get("arr").unwrap()));
/// ```
pub fn create<B, F, R>(base: B, mutator: F, options: &Options) -> Result<Produced>
where
    B: Into<Item>,
    F: FnOnce(&Draft) -> R,
    R: MutatorReturn,
{
    let (draft, finisher) = create_draft(base, options)?;
    match mutator(&draft).into_outcome() {
        Ok(()) => finisher.finish(),
        Err(err) => {
            finisher.abandon();
            Err(err)
        }
    }
}

/// [`create`] with default options, returning only the state.
pub fn produce<B, F, R>(base: B, mutator: F) -> Result<Value>
where
    B: Into<Item>,
    F: FnOnce(&Draft) -> R,
    R: MutatorReturn,
{
    create(base, mutator, &Options::default()).map(|produced| produced.state)
}

/// Bind a mutator and options now, apply them to a base later.
pub fn producer<B, F, R>(mutator: F, options: Options) -> impl Fn(B) -> Result<Produced>
where
    B: Into<Item>,
    F: Fn(&Draft) -> R,
    R: MutatorReturn,
{
    move |base| create(base, &mutator, &options)
}

/// [`create`] for a mutator that returns a future. Finalization runs once the
/// future resolves.
pub async fn create_async<B, F, Fut, R>(base: B, mutator: F, options: &Options) -> Result<Produced>
where
    B: Into<Item>,
    F: FnOnce(Draft) -> Fut,
    Fut: Future<Output = R>,
    R: MutatorReturn,
{
    let (draft, finisher) = create_draft(base, options)?;
    match mutator(draft).await.into_outcome() {
        Ok(()) => finisher.finish(),
        Err(err) => {
            finisher.abandon();
            Err(err)
        }
    }
}

/// True if `value` would be drafted rather than passed through by reference.
pub fn is_draftable(value: &Value, options: &Options) -> bool {
    value.is_container() && options.classify(value) != Some(Mark::Mutable)
}
