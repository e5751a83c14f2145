//! Builder for constructing state controllers.

use crate::builder::error::{BuildError, BuildErrors};
use crate::builder::group::{StateEditor, StateGroup};
use crate::core::{Guard, Hook, State, StateId, Target, Transition};
use crate::runtime::{StateController, StateGraph};
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::{info, warn};

struct DeclaredTransition<C> {
    guard: Guard<C>,
    target: Target,
    order: usize,
}

struct DeclaredState<D, C> {
    name: String,
    data: D,
    transitions: Vec<DeclaredTransition<C>>,
    on_enter: Option<Hook<C>>,
    on_exit: Option<Hook<C>>,
}

/// Fluent, setup-time API for declaring a state graph.
///
/// The builder owns the name registry while the graph is being declared and
/// hands a frozen graph to the controller on [`build`](Self::build). Nothing
/// is validated until then: declarations never fail, `build()` reports every
/// problem at once.
///
/// # Example
///
/// ```rust
/// use fighter_fsm::builder::StateControllerBuilder;
///
/// struct Tick {
///     moving: bool,
/// }
///
/// let mut builder = StateControllerBuilder::<(), Tick>::new();
/// let idle = builder.add_state("Idle", ());
/// let walk = builder.add_state("Walk", ());
///
/// builder
///     .state(idle)
///     .add_transition(walk, |t: &Tick| t.moving);
/// builder
///     .state(walk)
///     .add_transition(idle, |t: &Tick| !t.moving);
/// builder.with_default_state(idle);
///
/// let mut controller = builder.build().unwrap();
/// controller.update(&Tick { moving: true });
/// assert_eq!(controller.current_name(), "Walk");
/// ```
pub struct StateControllerBuilder<D, C> {
    states: Vec<DeclaredState<D, C>>,
    default: Option<StateId>,
    out_of_range: Vec<StateId>,
    next_order: usize,
}

impl<D, C: 'static> StateControllerBuilder<D, C> {
    /// Create a new, empty builder.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            default: None,
            out_of_range: Vec::new(),
            next_order: 0,
        }
    }

    /// Register a state and return its handle.
    ///
    /// Names must be unique within the graph; a repeated name is reported by
    /// `build()`.
    pub fn add_state(&mut self, name: impl Into<String>, data: D) -> StateId {
        let id = StateId(self.states.len());
        self.states.push(DeclaredState {
            name: name.into(),
            data,
            transitions: Vec::new(),
            on_enter: None,
            on_exit: None,
        });
        id
    }

    /// Handle of the first state registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<StateId> {
        self.states
            .iter()
            .position(|s| s.name == name)
            .map(StateId)
    }

    /// Fluent editor for one state.
    pub fn state(&mut self, id: StateId) -> StateEditor<'_, D, C> {
        StateEditor::new(self, id)
    }

    /// Fluent editor applying each declaration to every state of `ids`.
    pub fn group(&mut self, ids: &[StateId]) -> StateGroup<'_, D, C> {
        StateGroup::new(self, ids.to_vec())
    }

    /// Mutable access to a state's data while the graph is being declared.
    pub fn data_mut(&mut self, id: StateId) -> Option<&mut D> {
        self.states.get_mut(id.index()).map(|s| &mut s.data)
    }

    /// Append a guarded transition to `from`'s ordered list.
    pub fn add_transition<F>(
        &mut self,
        from: StateId,
        target: impl Into<Target>,
        guard: F,
    ) -> &mut Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.push_transition(from, target.into(), Guard::new(guard));
        self
    }

    /// Append an unconditional transition to `from`'s ordered list.
    pub fn add_transition_to(&mut self, from: StateId, target: impl Into<Target>) -> &mut Self {
        self.push_transition(from, target.into(), Guard::always());
        self
    }

    /// Give every state of `sources` the same guarded transition.
    pub fn add_transitions<F>(
        &mut self,
        sources: &[StateId],
        target: impl Into<Target>,
        guard: F,
    ) -> &mut Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.push_to_all(sources, target.into(), Guard::new(guard));
        self
    }

    /// Give every state of `sources` the same unconditional transition.
    pub fn add_transitions_to(
        &mut self,
        sources: &[StateId],
        target: impl Into<Target>,
    ) -> &mut Self {
        self.push_to_all(sources, target.into(), Guard::always());
        self
    }

    /// Wire `ids[i] -> ids[i + 1]` unconditionally and the last back to the first.
    ///
    /// The wrap-around always happens. A phase that must not recur belongs
    /// outside the chained list; see [`sequence`](Self::sequence).
    pub fn chain(&mut self, ids: &[StateId]) -> &mut Self {
        for (i, &from) in ids.iter().enumerate() {
            let to = ids[(i + 1) % ids.len()];
            self.push_transition(from, Target::Id(to), Guard::always());
        }
        self
    }

    /// Wire `ids[i] -> ids[i + 1]` unconditionally without wrapping around.
    pub fn sequence(&mut self, ids: &[StateId]) -> &mut Self {
        for pair in ids.windows(2) {
            self.push_transition(pair[0], Target::Id(pair[1]), Guard::always());
        }
        self
    }

    /// Callback run each time `id` becomes the current state.
    pub fn on_enter<F>(&mut self, id: StateId, hook: F) -> &mut Self
    where
        F: Fn(&C) + Send + Sync + 'static,
    {
        match self.states.get_mut(id.index()) {
            Some(state) => state.on_enter = Some(Hook::new(hook)),
            None => self.out_of_range.push(id),
        }
        self
    }

    /// Callback run each time `id` stops being the current state.
    pub fn on_exit<F>(&mut self, id: StateId, hook: F) -> &mut Self
    where
        F: Fn(&C) + Send + Sync + 'static,
    {
        match self.states.get_mut(id.index()) {
            Some(state) => state.on_exit = Some(Hook::new(hook)),
            None => self.out_of_range.push(id),
        }
        self
    }

    /// Designate the initial state (required).
    pub fn with_default_state(&mut self, id: StateId) -> &mut Self {
        self.default = Some(id);
        self
    }

    pub(crate) fn push_transition(&mut self, from: StateId, target: Target, guard: Guard<C>) {
        let order = self.next_order;
        self.next_order += 1;
        match self.states.get_mut(from.index()) {
            Some(state) => state.transitions.push(DeclaredTransition {
                guard,
                target,
                order,
            }),
            None => self.out_of_range.push(from),
        }
    }

    pub(crate) fn push_to_all(&mut self, sources: &[StateId], target: Target, guard: Guard<C>) {
        for &from in sources {
            self.push_transition(from, target.clone(), guard.clone());
        }
    }

    /// Validate the declarations and freeze them into a controller.
    ///
    /// Validation is exhaustive: every unresolved target, out-of-range id,
    /// duplicate name and a missing default state are all reported, in that
    /// order. On success the controller sits at the default state with zero
    /// elapsed ticks.
    pub fn build(self) -> Result<StateController<D, C>, BuildErrors> {
        let names = self.name_index();
        let checks = self.validate(&names);
        if let Validation::Failure(errors) = Validation::all_vec(checks) {
            let errors: Vec<BuildError> = errors.iter().cloned().collect();
            warn!(errors = errors.len(), "state graph failed validation");
            return Err(BuildErrors::new(errors));
        }

        let Some(default) = self.default else {
            return Err(BuildErrors::new(vec![BuildError::NoDefaultState]));
        };

        let resolved = {
            let resolve = |target: &Target| match target {
                Target::Id(id) => Some(*id),
                Target::Name(name) => names.get(name.as_str()).copied(),
            };

            let mut resolved = Vec::with_capacity(self.states.len());
            for (index, declared) in self.states.iter().enumerate() {
                let mut transitions = Vec::with_capacity(declared.transitions.len());
                for t in &declared.transitions {
                    let Some(target) = resolve(&t.target) else {
                        return Err(BuildErrors::new(vec![unresolved(&declared.name, &t.target)]));
                    };
                    transitions.push(Transition {
                        guard: t.guard.clone(),
                        target,
                        order: t.order,
                    });
                }
                resolved.push((index, transitions));
            }
            resolved
        };
        drop(names);

        let states: Vec<State<D, C>> = self
            .states
            .into_iter()
            .zip(resolved)
            .map(|(declared, (index, transitions))| State {
                id: StateId(index),
                name: declared.name,
                data: declared.data,
                transitions,
                on_enter: declared.on_enter,
                on_exit: declared.on_exit,
            })
            .collect();

        let graph = StateGraph::new(states, default);
        info!(
            states = graph.len(),
            transitions = graph.transition_count(),
            default = graph.state(default).name(),
            "state graph built"
        );
        for warning in graph.diagnostics() {
            warn!(%warning, "state graph smell");
        }

        Ok(StateController::new(graph.into()))
    }

    fn name_index(&self) -> HashMap<&str, StateId> {
        let mut names = HashMap::with_capacity(self.states.len());
        for (index, state) in self.states.iter().enumerate() {
            names.entry(state.name.as_str()).or_insert(StateId(index));
        }
        names
    }

    fn validate(
        &self,
        names: &HashMap<&str, StateId>,
    ) -> Vec<Validation<(), NonEmptyVec<BuildError>>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<BuildError>>> = Vec::new();
        let registered = |id: StateId| id.index() < self.states.len();

        for state in &self.states {
            for t in &state.transitions {
                let resolved = match &t.target {
                    Target::Id(id) => registered(*id),
                    Target::Name(name) => names.contains_key(name.as_str()),
                };
                if !resolved {
                    checks.push(Validation::fail(unresolved(&state.name, &t.target)));
                }
            }
        }

        let mut out_of_range = self.out_of_range.clone();
        if let Some(default) = self.default.filter(|&id| !registered(id)) {
            out_of_range.push(default);
        }
        out_of_range.sort();
        out_of_range.dedup();
        for id in out_of_range {
            checks.push(Validation::fail(BuildError::StateIdOutOfRange {
                id,
                len: self.states.len(),
            }));
        }

        let mut reported: Vec<&str> = Vec::new();
        for (index, state) in self.states.iter().enumerate() {
            let first = names.get(state.name.as_str()).copied();
            if first != Some(StateId(index)) && !reported.contains(&state.name.as_str()) {
                reported.push(&state.name);
                checks.push(Validation::fail(BuildError::DuplicateStateName {
                    name: state.name.clone(),
                }));
            }
        }

        if self.default.is_none() {
            checks.push(Validation::fail(BuildError::NoDefaultState));
        }

        checks
    }
}

fn unresolved(from: &str, target: &Target) -> BuildError {
    BuildError::UnresolvedTransition {
        from: from.to_string(),
        target: match target {
            Target::Id(id) => id.to_string(),
            Target::Name(name) => name.clone(),
        },
    }
}

impl<D, C: 'static> Default for StateControllerBuilder<D, C> {
    fn default() -> Self {
        Self::new()
    }
}
