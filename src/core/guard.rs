//! Guard predicates and enter/exit hooks.
//!
//! Guards are pure boolean functions of the per-tick context that decide
//! whether a transition fires. Hooks are the side effects a state runs when
//! it is entered or exited.

use std::fmt;
use std::sync::Arc;

/// Pure predicate that decides whether a transition fires.
///
/// A guard sees nothing but the context it is handed. Anything a guard
/// needs (facing direction, shield health, input edges) must be read from
/// that context rather than captured as mutable state, otherwise two
/// replays over the same input log can diverge.
///
/// Guards are cheap to clone: the predicate is shared, which is how the bulk
/// helpers attach one guard to many states.
///
/// # Example
///
/// ```rust
/// use fighter_fsm::core::Guard;
///
/// struct Tick {
///     grounded: bool,
/// }
///
/// let on_ground = Guard::new(|ctx: &Tick| ctx.grounded);
///
/// assert!(on_ground.check(&Tick { grounded: true }));
/// assert!(!on_ground.check(&Tick { grounded: false }));
/// ```
pub struct Guard<C> {
    predicate: Arc<dyn Fn(&C) -> bool + Send + Sync>,
}

impl<C: 'static> Guard<C> {
    /// Create a guard from a pure predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Guard of an unconditional transition.
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    /// Guard that holds only when both `self` and `other` hold.
    ///
    /// `other` is not evaluated when `self` fails.
    pub fn and(self, other: Guard<C>) -> Self {
        Self::new(move |ctx| self.check(ctx) && other.check(ctx))
    }

    /// Guard that holds exactly when `self` does not.
    pub fn negate(self) -> Self {
        Self::new(move |ctx| !self.check(ctx))
    }
}

impl<C> Guard<C> {
    /// Evaluate the predicate against one tick's context.
    pub fn check(&self, ctx: &C) -> bool {
        (self.predicate)(ctx)
    }
}

impl<C> Clone for Guard<C> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<C> fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard")
    }
}

/// Callback run when a state is entered or exited.
pub struct Hook<C> {
    callback: Arc<dyn Fn(&C) + Send + Sync>,
}

impl<C: 'static> Hook<C> {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&C) + Send + Sync + 'static,
    {
        Hook {
            callback: Arc::new(callback),
        }
    }
}

impl<C> Hook<C> {
    pub fn call(&self, ctx: &C) {
        (self.callback)(ctx)
    }
}

impl<C> Clone for Hook<C> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<C> fmt::Debug for Hook<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Hook")
    }
}
