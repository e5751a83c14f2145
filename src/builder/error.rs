//! Build errors for state controller builders.

use crate::core::StateId;
use std::fmt;
use thiserror::Error;

/// A single problem found while validating a graph.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Transition from '{from}' targets unregistered state '{target}'")]
    UnresolvedTransition { from: String, target: String },

    #[error("State name '{name}' is registered more than once")]
    DuplicateStateName { name: String },

    #[error("No default state designated. Call .with_default_state(state) before .build()")]
    NoDefaultState,

    #[error("State id {id} is out of range for a builder with {len} states")]
    StateIdOutOfRange { id: StateId, len: usize },
}

/// Every problem found by one `build()` call.
///
/// Never empty. Entries are ordered unresolved transitions first, then
/// out-of-range ids, duplicate names, and finally the missing default state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub struct BuildErrors {
    errors: Vec<BuildError>,
}

impl BuildErrors {
    pub(crate) fn new(errors: Vec<BuildError>) -> Self {
        Self { errors }
    }

    /// Highest-precedence failure.
    pub fn first(&self) -> &BuildError {
        &self.errors[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuildError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn contains(&self, error: &BuildError) -> bool {
        self.errors.contains(error)
    }
}

impl fmt::Display for BuildErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state graph failed validation ({} error(s))", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl IntoIterator for BuildErrors {
    type Item = BuildError;
    type IntoIter = std::vec::IntoIter<BuildError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
