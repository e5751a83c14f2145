//! Transition history for replay and desync diagnosis.
//!
//! Records are stamped with the simulation tick, never wall-clock time, so
//! two replays of the same input log produce equal histories.

use super::state::StateId;
use serde::{Deserialize, Serialize};

/// Record of a single state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Zero-based index of the update that fired the transition
    pub tick: u64,
    /// The state being left
    pub from: StateId,
    /// The state being entered
    pub to: StateId,
}

/// Ordered history of state changes of one controller.
///
/// # Example
///
/// ```rust
/// use fighter_fsm::core::StateHistory;
///
/// let history = StateHistory::new();
/// assert!(history.is_empty());
/// assert!(history.path().is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: Vec<TransitionRecord>,
}

impl StateHistory {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Append a transition.
    pub fn record(&mut self, record: TransitionRecord) {
        self.transitions.push(record);
    }

    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// States traversed: the first `from`, then the `to` of each record.
    ///
    /// Empty when nothing was recorded.
    pub fn path(&self) -> Vec<StateId> {
        let Some(first) = self.transitions.first() else {
            return Vec::new();
        };
        std::iter::once(first.from)
            .chain(self.transitions.iter().map(|t| t.to))
            .collect()
    }

    /// Drop every record at or after `tick`.
    ///
    /// Used when a controller is restored to an earlier snapshot so that the
    /// re-simulated ticks are not recorded twice.
    pub fn rewind(&mut self, tick: u64) {
        self.transitions.retain(|t| t.tick < tick);
    }

    /// Ticks between the first and the last recorded transition.
    ///
    /// Zero when the last record is stamped earlier than the first.
    pub fn span(&self) -> Option<u64> {
        let first = self.transitions.first()?;
        let last = self.transitions.last()?;
        Some(last.tick.saturating_sub(first.tick))
    }
}
