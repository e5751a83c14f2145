//! Core graph types.
//!
//! This module contains the pieces every built graph is made of:
//! - States and their identifiers
//! - Guard predicates and enter/exit hooks
//! - Transition history
//!
//! Nothing in here reads clocks, random sources or shared mutable state;
//! everything a guard decides is a function of the context it is given.

mod guard;
mod history;
mod state;

pub use guard::{Guard, Hook};
pub use history::{StateHistory, TransitionRecord};
pub use state::{State, StateId, Target, Transition};
