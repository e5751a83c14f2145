//! Per-entity runtime cursor over a built graph.

use crate::checkpoint::{ControllerSnapshot, SnapshotError, SNAPSHOT_VERSION};
use crate::core::{State, StateHistory, StateId, TransitionRecord};
use crate::runtime::graph::StateGraph;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Outcome of one [`StateController::update`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    /// State before the update
    pub from: StateId,
    /// State after the update
    pub to: StateId,
}

impl Step {
    /// Whether the update changed the current state.
    pub fn transitioned(&self) -> bool {
        self.from != self.to
    }
}

/// Runtime engine driving one entity through a state graph.
///
/// The graph is shared and immutable; the controller only owns the cursor
/// (current state, ticks spent in it, total ticks) and an optional
/// history. Given the same graph and the same sequence of contexts, two
/// controllers visit the same states and fire the same hooks.
pub struct StateController<D, C> {
    graph: Arc<StateGraph<D, C>>,
    current: StateId,
    ticks_in_state: u64,
    tick: u64,
    history: Option<StateHistory>,
}

impl<D, C> StateController<D, C> {
    /// Create a controller positioned at the graph's default state.
    pub fn new(graph: Arc<StateGraph<D, C>>) -> Self {
        let current = graph.default_state();
        Self {
            graph,
            current,
            ticks_in_state: 0,
            tick: 0,
            history: None,
        }
    }

    /// Fresh controller for another entity over the same graph.
    pub fn spawn(&self) -> Self {
        Self::new(Arc::clone(&self.graph))
    }

    pub fn graph(&self) -> &StateGraph<D, C> {
        &self.graph
    }

    pub fn shared_graph(&self) -> Arc<StateGraph<D, C>> {
        Arc::clone(&self.graph)
    }

    pub fn current(&self) -> &State<D, C> {
        self.graph.state(self.current)
    }

    pub fn current_id(&self) -> StateId {
        self.current
    }

    pub fn current_name(&self) -> &str {
        self.current().name()
    }

    /// Updates since the current state was entered.
    pub fn ticks_in_state(&self) -> u64 {
        self.ticks_in_state
    }

    /// Updates since the controller was built or reset.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Advance one tick.
    ///
    /// Evaluates the current state's transitions in declaration order and
    /// takes the first whose guard holds. When it leads to another state,
    /// the old state's exit hook runs, then the new state's enter hook, and
    /// the time-in-state counter restarts at zero. Otherwise no hook runs
    /// and the counter advances by one; a transition back onto the current
    /// state counts as no change.
    ///
    /// # Panics
    ///
    /// A panicking guard or hook propagates to the caller. The tick counter
    /// has already advanced by then, while the current state and the
    /// time-in-state counter keep their values from before the update, even
    /// when the exit hook already ran. Restore a snapshot taken before the
    /// failing tick to resume from a known cursor.
    pub fn update(&mut self, ctx: &C) -> Step {
        let tick = self.tick;
        self.tick += 1;

        let from = self.current;
        let state = self.graph.state(from);
        let next = state
            .evaluate(ctx)
            .map(|t| t.target())
            .filter(|&to| to != from);

        let Some(to) = next else {
            self.ticks_in_state += 1;
            trace!(tick, state = state.name(), "no transition");
            return Step { from, to: from };
        };

        let target = self.graph.state(to);
        debug!(tick, from = state.name(), to = target.name(), "state transition");
        state.exit(ctx);
        target.enter(ctx);

        self.current = to;
        self.ticks_in_state = 0;
        if let Some(history) = &mut self.history {
            history.record(TransitionRecord { tick, from, to });
        }
        Step { from, to }
    }

    /// Return to the default state with cleared counters.
    ///
    /// Hooks do not run: a respawned entity starts from scratch rather than
    /// leaving its previous state.
    pub fn reset(&mut self) {
        self.current = self.graph.default_state();
        self.ticks_in_state = 0;
        self.tick = 0;
        if let Some(history) = &mut self.history {
            *history = StateHistory::new();
        }
    }

    /// Start or stop recording transitions.
    ///
    /// Stopping discards what was recorded.
    pub fn record_history(&mut self, enabled: bool) {
        match (enabled, self.history.is_some()) {
            (true, false) => self.history = Some(StateHistory::new()),
            (false, true) => self.history = None,
            _ => {}
        }
    }

    pub fn history(&self) -> Option<&StateHistory> {
        self.history.as_ref()
    }

    /// Capture the cursor so it can be restored later.
    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            version: SNAPSHOT_VERSION,
            state: self.current_name().to_string(),
            ticks_in_state: self.ticks_in_state,
            tick: self.tick,
        }
    }

    /// Reinstate a captured cursor.
    ///
    /// The state is looked up by name, so snapshots move between any graphs
    /// built from the same declarations. No hooks run. Recorded history from
    /// the snapshot's tick onward is dropped. A snapshot claiming more ticks
    /// in its state than ticks overall is rejected.
    pub fn restore(&mut self, snapshot: &ControllerSnapshot) -> Result<(), SnapshotError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        if snapshot.ticks_in_state > snapshot.tick {
            return Err(SnapshotError::InconsistentTicks {
                ticks_in_state: snapshot.ticks_in_state,
                tick: snapshot.tick,
            });
        }
        let state = self
            .graph
            .find(&snapshot.state)
            .ok_or_else(|| SnapshotError::UnknownState(snapshot.state.clone()))?;

        self.current = state.id();
        self.ticks_in_state = snapshot.ticks_in_state;
        self.tick = snapshot.tick;
        if let Some(history) = &mut self.history {
            history.rewind(snapshot.tick);
        }
        Ok(())
    }
}

impl<D, C> Clone for StateController<D, C> {
    fn clone(&self) -> Self {
        Self {
            graph: Arc::clone(&self.graph),
            current: self.current,
            ticks_in_state: self.ticks_in_state,
            tick: self.tick,
            history: self.history.clone(),
        }
    }
}

impl<D, C> fmt::Debug for StateController<D, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateController")
            .field("current", &self.current_name())
            .field("ticks_in_state", &self.ticks_in_state)
            .field("tick", &self.tick)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::StateControllerBuilder;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Copy, Default)]
    struct Tick {
        a: bool,
        b: bool,
    }

    type Log = Arc<Mutex<Vec<String>>>;

    fn logging_controller(log: &Log) -> StateController<(), Tick> {
        let mut b = StateControllerBuilder::<(), Tick>::new();
        let idle = b.add_state("Idle", ());
        let first = b.add_state("A", ());
        let second = b.add_state("B", ());
        b.state(idle)
            .add_transition(first, |t: &Tick| t.a)
            .add_transition(second, |t: &Tick| t.b);
        b.state(first).add_transition(idle, |t: &Tick| !t.a);
        b.state(second).add_transition(idle, |t: &Tick| !t.b);
        for (id, name) in [(idle, "Idle"), (first, "A"), (second, "B")] {
            let enter = Arc::clone(log);
            let exit = Arc::clone(log);
            b.on_enter(id, move |_| enter.lock().unwrap().push(format!("enter {name}")))
                .on_exit(id, move |_| exit.lock().unwrap().push(format!("exit {name}")));
        }
        b.with_default_state(idle);
        b.build().unwrap()
    }

    #[test]
    fn first_matching_transition_wins() {
        let log = Log::default();
        let mut controller = logging_controller(&log);

        let step = controller.update(&Tick { a: true, b: true });

        assert!(step.transitioned());
        assert_eq!(controller.current_name(), "A");
    }

    #[test]
    fn no_match_only_advances_counter() {
        let log = Log::default();
        let mut controller = logging_controller(&log);

        let step = controller.update(&Tick::default());
        controller.update(&Tick::default());

        assert!(!step.transitioned());
        assert_eq!(controller.current_name(), "Idle");
        assert_eq!(controller.ticks_in_state(), 2);
        assert_eq!(controller.tick(), 2);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn exit_runs_before_enter_once_per_change() {
        let log = Log::default();
        let mut controller = logging_controller(&log);

        controller.update(&Tick { a: true, b: false });
        controller.update(&Tick { a: true, b: false });
        controller.update(&Tick::default());

        assert_eq!(
            *log.lock().unwrap(),
            vec!["exit Idle", "enter A", "exit A", "enter Idle"]
        );
    }

    #[test]
    fn transition_resets_time_in_state() {
        let log = Log::default();
        let mut controller = logging_controller(&log);
        controller.update(&Tick::default());
        controller.update(&Tick::default());

        controller.update(&Tick { a: true, b: false });

        assert_eq!(controller.ticks_in_state(), 0);
        controller.update(&Tick { a: true, b: false });
        assert_eq!(controller.ticks_in_state(), 1);
    }

    #[test]
    fn self_transition_is_not_a_change() {
        let entered = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&entered);
        let mut b = StateControllerBuilder::<(), Tick>::new();
        let idle = b.add_state("Idle", ());
        b.add_transition_to(idle, idle)
            .on_enter(idle, move |_| *counter.lock().unwrap() += 1)
            .with_default_state(idle);
        let mut controller = b.build().unwrap();

        let step = controller.update(&Tick::default());

        assert!(!step.transitioned());
        assert_eq!(controller.ticks_in_state(), 1);
        assert_eq!(*entered.lock().unwrap(), 0);
    }

    #[test]
    fn reset_returns_to_default_without_hooks() {
        let log = Log::default();
        let mut controller = logging_controller(&log);
        controller.update(&Tick { a: true, b: false });
        log.lock().unwrap().clear();

        controller.reset();

        assert_eq!(controller.current_name(), "Idle");
        assert_eq!(controller.ticks_in_state(), 0);
        assert_eq!(controller.tick(), 0);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn spawn_starts_at_default_over_shared_graph() {
        let log = Log::default();
        let mut controller = logging_controller(&log);
        controller.update(&Tick { a: true, b: false });

        let spawned = controller.spawn();

        assert_eq!(spawned.current_name(), "Idle");
        assert!(Arc::ptr_eq(&spawned.shared_graph(), &controller.shared_graph()));
    }

    #[test]
    fn history_records_ticks_of_transitions() {
        let log = Log::default();
        let mut controller = logging_controller(&log);
        controller.record_history(true);

        controller.update(&Tick::default());
        controller.update(&Tick { a: false, b: true });
        controller.update(&Tick::default());

        let history = controller.history().unwrap();
        let ticks: Vec<u64> = history.transitions().iter().map(|r| r.tick).collect();
        assert_eq!(ticks, vec![1, 2]);
        assert_eq!(history.path().len(), 3);
    }

    #[test]
    fn snapshot_restores_cursor_and_rewinds_history() {
        let log = Log::default();
        let mut controller = logging_controller(&log);
        controller.record_history(true);
        controller.update(&Tick { a: true, b: false });
        let snapshot = controller.snapshot();

        controller.update(&Tick::default());
        controller.update(&Tick { a: false, b: true });
        controller.restore(&snapshot).unwrap();

        assert_eq!(controller.current_name(), "A");
        assert_eq!(controller.tick(), 1);
        assert_eq!(controller.history().unwrap().len(), 1);
    }

    #[test]
    fn restore_rejects_unknown_state() {
        let log = Log::default();
        let mut controller = logging_controller(&log);
        let mut snapshot = controller.snapshot();
        snapshot.state = "Ghost".to_string();

        let result = controller.restore(&snapshot);

        assert!(matches!(result, Err(SnapshotError::UnknownState(name)) if name == "Ghost"));
        assert_eq!(controller.current_name(), "Idle");
    }

    #[test]
    fn restore_rejects_other_versions() {
        let log = Log::default();
        let mut controller = logging_controller(&log);
        let mut snapshot = controller.snapshot();
        snapshot.version = SNAPSHOT_VERSION + 1;

        assert!(matches!(
            controller.restore(&snapshot),
            Err(SnapshotError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn restore_rejects_more_ticks_in_state_than_ticks() {
        let log = Log::default();
        let mut controller = logging_controller(&log);
        controller.update(&Tick::default());
        let mut snapshot = controller.snapshot();
        snapshot.ticks_in_state = snapshot.tick + 1;

        assert!(matches!(
            controller.restore(&snapshot),
            Err(SnapshotError::InconsistentTicks {
                ticks_in_state: 2,
                tick: 1
            })
        ));
        assert_eq!(controller.ticks_in_state(), 1);
    }

    fn panicking_controller(guard_panics: bool) -> StateController<(), Tick> {
        let mut b = StateControllerBuilder::<(), Tick>::new();
        let idle = b.add_state("Idle", ());
        let next = b.add_state("Next", ());
        b.add_transition(idle, next, move |t: &Tick| {
            if guard_panics && t.a {
                panic!("guard failed");
            }
            t.b
        })
        .on_exit(idle, move |t: &Tick| {
            if t.a {
                panic!("exit hook failed");
            }
        })
        .with_default_state(idle);
        b.build().unwrap()
    }

    #[test]
    #[should_panic(expected = "guard failed")]
    fn guard_panic_propagates_out_of_update() {
        let mut controller = panicking_controller(true);

        controller.update(&Tick { a: true, b: false });
    }

    #[test]
    #[should_panic(expected = "exit hook failed")]
    fn exit_hook_panic_propagates_out_of_update() {
        let mut controller = panicking_controller(false);

        controller.update(&Tick { a: true, b: true });
    }

    #[test]
    fn panic_leaves_cursor_in_source_state_with_tick_advanced() {
        let mut controller = panicking_controller(false);
        controller.update(&Tick::default());
        let before = controller.snapshot();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            controller.update(&Tick { a: true, b: true });
        }));

        assert!(result.is_err());
        assert_eq!(controller.current_name(), "Idle");
        assert_eq!(controller.ticks_in_state(), 1);
        assert_eq!(controller.tick(), 2);

        controller.restore(&before).unwrap();
        assert_eq!(controller.tick(), 1);
        controller.update(&Tick { a: false, b: true });
        assert_eq!(controller.current_name(), "Next");
    }

    #[test]
    fn controller_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StateController<u32, Tick>>();
    }
}
