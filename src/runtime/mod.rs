//! Runtime side of a built graph.
//!
//! A [`StateGraph`] is built once and shared; each entity owns a
//! [`StateController`] over it and advances it once per simulation tick.
//! Controllers share no mutable state, so different entities may be
//! updated on different threads within a tick.

mod controller;
mod graph;

pub use controller::{StateController, Step};
pub use graph::{GraphWarning, StateGraph};
