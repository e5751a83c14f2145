//! Builder API for declaring state graphs.
//!
//! Graphs are declared once at setup time: states are registered, their
//! transitions are attached one at a time or in bulk, a default state is
//! chosen, and `build()` validates the whole thing before any tick runs.

pub mod error;
pub mod group;
pub mod machine;

pub use error::{BuildError, BuildErrors};
pub use group::{StateEditor, StateGroup};
pub use machine::StateControllerBuilder;
