//! States, their identifiers, and their outgoing transitions.

use super::guard::{Guard, Hook};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a state registered with a builder.
///
/// Ids are dense indices into the graph in registration order, so two
/// graphs built by the same declarations assign the same ids. An id carries
/// no trace of the builder that issued it: any builder accepts an id below
/// its own state count and reads it as the state at that index. Only ids
/// past the end are rejected, with
/// [`BuildError::StateIdOutOfRange`](crate::BuildError::StateIdOutOfRange).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(pub(crate) usize);

impl StateId {
    /// Position of the state in registration order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a transition points while the graph is still being declared.
///
/// Name targets are resolved by `build()`; a name that was never registered
/// fails the build instead of surfacing at runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    Id(StateId),
    Name(String),
}

impl From<StateId> for Target {
    fn from(id: StateId) -> Self {
        Target::Id(id)
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Target::Name(name.to_string())
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Target::Name(name)
    }
}

/// A guarded edge out of a state, with its target already resolved.
pub struct Transition<C> {
    pub(crate) guard: Guard<C>,
    pub(crate) target: StateId,
    pub(crate) order: usize,
}

impl<C> Transition<C> {
    pub fn target(&self) -> StateId {
        self.target
    }

    /// Builder-wide declaration index.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Whether this transition fires for `ctx` (pure).
    pub fn can_fire(&self, ctx: &C) -> bool {
        self.guard.check(ctx)
    }
}

impl<C> Clone for Transition<C> {
    fn clone(&self) -> Self {
        Self {
            guard: self.guard.clone(),
            target: self.target,
            order: self.order,
        }
    }
}

impl<C> fmt::Debug for Transition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("target", &self.target)
            .field("order", &self.order)
            .finish()
    }
}

/// A named node of a built graph.
///
/// `D` is the per-state tunable data, `C` the per-tick context guards and
/// hooks are evaluated against. The transition list is frozen once the
/// graph is built and keeps declaration order.
pub struct State<D, C> {
    pub(crate) id: StateId,
    pub(crate) name: String,
    pub(crate) data: D,
    pub(crate) transitions: Vec<Transition<C>>,
    pub(crate) on_enter: Option<Hook<C>>,
    pub(crate) on_exit: Option<Hook<C>>,
}

impl<D, C> State<D, C> {
    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn transitions(&self) -> &[Transition<C>] {
        &self.transitions
    }

    /// First transition, in declaration order, whose guard holds.
    ///
    /// Later transitions are not evaluated once one matches, so a fallback
    /// declared after a more specific guard only fires when the specific
    /// one does not.
    pub fn evaluate(&self, ctx: &C) -> Option<&Transition<C>> {
        self.transitions.iter().find(|t| t.can_fire(ctx))
    }

    pub(crate) fn enter(&self, ctx: &C) {
        if let Some(hook) = &self.on_enter {
            hook.call(ctx);
        }
    }

    pub(crate) fn exit(&self, ctx: &C) {
        if let Some(hook) = &self.on_exit {
            hook.call(ctx);
        }
    }
}

impl<D: fmt::Debug, C> fmt::Debug for State<D, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("data", &self.data)
            .field("transitions", &self.transitions)
            .finish()
    }
}
