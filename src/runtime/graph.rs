//! Frozen state graph shared by every controller built from it.

use crate::core::{State, StateId};
use std::collections::{HashMap, VecDeque};
use std::fmt;

/// Non-fatal configuration smells found in a built graph.
///
/// These never fail a build: an unreachable state may be entered by a
/// snapshot restore, and a sink may be intentional (a KO state).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphWarning {
    /// No path of transitions leads from the default state to this one
    Unreachable { name: String },
    /// The state has no outgoing transitions
    NoExit { name: String },
}

impl fmt::Display for GraphWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable { name } => {
                write!(f, "state '{name}' is unreachable from the default state")
            }
            Self::NoExit { name } => write!(f, "state '{name}' has no outgoing transitions"),
        }
    }
}

/// Immutable set of states with resolved transitions.
///
/// Every transition target is a valid id of this graph, so runtime lookups
/// by id cannot miss.
pub struct StateGraph<D, C> {
    states: Vec<State<D, C>>,
    by_name: HashMap<String, StateId>,
    default: StateId,
}

impl<D, C> StateGraph<D, C> {
    pub(crate) fn new(states: Vec<State<D, C>>, default: StateId) -> Self {
        let by_name = states
            .iter()
            .map(|s| (s.name.clone(), s.id))
            .collect();
        Self {
            states,
            by_name,
            default,
        }
    }

    pub fn default_state(&self) -> StateId {
        self.default
    }

    /// State behind an id issued while building this graph.
    ///
    /// # Panics
    ///
    /// Panics if `id` came from a different graph.
    pub fn state(&self, id: StateId) -> &State<D, C> {
        &self.states[id.index()]
    }

    pub fn get(&self, id: StateId) -> Option<&State<D, C>> {
        self.states.get(id.index())
    }

    pub fn find(&self, name: &str) -> Option<&State<D, C>> {
        self.by_name.get(name).map(|&id| self.state(id))
    }

    pub fn states(&self) -> &[State<D, C>] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn transition_count(&self) -> usize {
        self.states.iter().map(|s| s.transitions.len()).sum()
    }

    /// Unreachable states and sinks, in registration order.
    pub fn diagnostics(&self) -> Vec<GraphWarning> {
        let mut reached = vec![false; self.states.len()];
        let mut queue = VecDeque::from([self.default]);
        reached[self.default.index()] = true;
        while let Some(id) = queue.pop_front() {
            for t in &self.state(id).transitions {
                if !reached[t.target.index()] {
                    reached[t.target.index()] = true;
                    queue.push_back(t.target);
                }
            }
        }

        let mut warnings = Vec::new();
        for (state, reached) in self.states.iter().zip(reached) {
            if !reached {
                warnings.push(GraphWarning::Unreachable {
                    name: state.name.clone(),
                });
            }
            if state.transitions.is_empty() {
                warnings.push(GraphWarning::NoExit {
                    name: state.name.clone(),
                });
            }
        }
        warnings
    }
}

impl<D, C> fmt::Debug for StateGraph<D, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateGraph")
            .field("states", &self.states.len())
            .field("transitions", &self.transition_count())
            .field("default", &self.default)
            .finish()
    }
}
