//! Fluent editors over one state or a group of states.
//!
//! Both borrow the builder mutably and return themselves from every call,
//! so declarations read in the order they take effect:
//!
//! ```rust
//! use fighter_fsm::builder::StateControllerBuilder;
//!
//! struct Tick {
//!     attack: bool,
//!     up: bool,
//! }
//!
//! let mut builder = StateControllerBuilder::<(), Tick>::new();
//! let idle = builder.add_state("Idle", ());
//! let walk = builder.add_state("Walk", ());
//! let tilt_up = builder.add_state("TiltUp", ());
//! let neutral = builder.add_state("Neutral", ());
//!
//! builder
//!     .group(&[idle, walk])
//!     .add_transitions(tilt_up, |t: &Tick| t.attack && t.up)
//!     .add_transitions(neutral, |t: &Tick| t.attack);
//! builder.group(&[tilt_up, neutral]).add_transitions_to(idle);
//! builder.with_default_state(idle);
//!
//! let mut controller = builder.build().unwrap();
//! controller.update(&Tick { attack: true, up: true });
//! assert_eq!(controller.current_name(), "TiltUp");
//! ```

use crate::builder::machine::StateControllerBuilder;
use crate::core::{Guard, StateId, Target};

/// Declarations scoped to a single state.
pub struct StateEditor<'b, D, C> {
    builder: &'b mut StateControllerBuilder<D, C>,
    id: StateId,
}

impl<'b, D, C: 'static> StateEditor<'b, D, C> {
    pub(crate) fn new(builder: &'b mut StateControllerBuilder<D, C>, id: StateId) -> Self {
        Self { builder, id }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    /// Append a guarded transition; earlier declarations take priority.
    pub fn add_transition<F>(self, target: impl Into<Target>, guard: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.builder
            .push_transition(self.id, target.into(), Guard::new(guard));
        self
    }

    /// Append a pre-built guard, e.g. one shared with other states.
    pub fn add_guarded(self, target: impl Into<Target>, guard: Guard<C>) -> Self {
        self.builder.push_transition(self.id, target.into(), guard);
        self
    }

    /// Append an unconditional transition.
    pub fn add_transition_to(self, target: impl Into<Target>) -> Self {
        self.builder
            .push_transition(self.id, target.into(), Guard::always());
        self
    }

    pub fn on_enter<F>(self, hook: F) -> Self
    where
        F: Fn(&C) + Send + Sync + 'static,
    {
        self.builder.on_enter(self.id, hook);
        self
    }

    pub fn on_exit<F>(self, hook: F) -> Self
    where
        F: Fn(&C) + Send + Sync + 'static,
    {
        self.builder.on_exit(self.id, hook);
        self
    }
}

/// Declarations applied to every state of a list, in list order.
pub struct StateGroup<'b, D, C> {
    builder: &'b mut StateControllerBuilder<D, C>,
    ids: Vec<StateId>,
}

impl<'b, D, C: 'static> StateGroup<'b, D, C> {
    pub(crate) fn new(builder: &'b mut StateControllerBuilder<D, C>, ids: Vec<StateId>) -> Self {
        Self { builder, ids }
    }

    pub fn ids(&self) -> &[StateId] {
        &self.ids
    }

    /// Give every state of the group the same guarded transition.
    pub fn add_transitions<F>(self, target: impl Into<Target>, guard: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.builder
            .push_to_all(&self.ids, target.into(), Guard::new(guard));
        self
    }

    /// Give every state of the group the same pre-built guard.
    pub fn add_guarded(self, target: impl Into<Target>, guard: Guard<C>) -> Self {
        self.builder.push_to_all(&self.ids, target.into(), guard);
        self
    }

    /// Give every state of the group the same unconditional transition.
    pub fn add_transitions_to(self, target: impl Into<Target>) -> Self {
        self.builder
            .push_to_all(&self.ids, target.into(), Guard::always());
        self
    }

    /// Wire the group into a cycle; see [`StateControllerBuilder::chain`].
    pub fn chain(self) -> Self {
        self.builder.chain(&self.ids);
        self
    }

    /// Wire the group front to back without wrapping around.
    pub fn sequence(self) -> Self {
        self.builder.sequence(&self.ids);
        self
    }
}
