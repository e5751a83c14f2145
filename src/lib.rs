//! Fighter FSM: deterministic, declarative state machines for fighting game entities
//!
//! A graph of named states is declared once at setup time, validated, and
//! then advanced one simulation tick at a time. Each tick the current
//! state's transitions are checked in declaration order against an
//! immutable context; the first guard that holds wins. Nothing else
//! influences the outcome, so replaying the same contexts reproduces the
//! same states on every machine.
//!
//! # Core Concepts
//!
//! - **State**: a named node with its own data, ordered outgoing transitions
//!   and optional enter/exit hooks
//! - **Guard**: a pure predicate over the per-tick context
//! - **Builder**: fluent declaration of states and transitions, including
//!   bulk helpers and chains, validated by `build()`
//! - **Controller**: the per-entity cursor advanced by `update()`
//!
//! # Example
//!
//! ```rust
//! use fighter_fsm::builder::StateControllerBuilder;
//!
//! struct Tick {
//!     shield_hp: f32,
//! }
//!
//! let mut builder = StateControllerBuilder::<(), Tick>::new();
//! let shield = builder.add_state("Shield", ());
//! let broken = builder.add_state("Broken", ());
//! let stunned = builder.add_state("Stunned", ());
//!
//! builder
//!     .state(shield)
//!     .add_transition(broken, |t: &Tick| t.shield_hp < 0.0);
//! builder.chain(&[broken, stunned, shield]);
//! builder.with_default_state(shield);
//!
//! let mut controller = builder.build().unwrap();
//! let step = controller.update(&Tick { shield_hp: -1.0 });
//! assert!(step.transitioned());
//! assert_eq!(controller.current_name(), "Broken");
//!
//! controller.update(&Tick { shield_hp: 50.0 });
//! assert_eq!(controller.current_name(), "Stunned");
//! ```

pub mod builder;
pub mod character;
pub mod checkpoint;
pub mod core;
pub mod runtime;

// Re-export commonly used types
pub use builder::{BuildError, BuildErrors, StateControllerBuilder};
pub use checkpoint::{ControllerSnapshot, SnapshotError};
pub use self::core::{Guard, State, StateHistory, StateId};
pub use runtime::{StateController, StateGraph, Step};
