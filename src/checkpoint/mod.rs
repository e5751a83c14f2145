//! Snapshots of a controller's cursor.
//!
//! A snapshot is everything a controller owns besides its graph: the
//! current state, the ticks spent in it, and the total tick count. A
//! rollback system keeps one per confirmed frame and restores it before
//! re-simulating; the graph itself is never part of a snapshot.

use serde::{Deserialize, Serialize};

pub mod error;

pub use error::SnapshotError;

/// Version identifier for the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable cursor of one [`StateController`](crate::runtime::StateController).
///
/// The state is stored by name so a snapshot taken on one machine restores
/// into any graph built from the same declarations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// Name of the current state
    pub state: String,

    /// Updates since the current state was entered
    pub ticks_in_state: u64,

    /// Updates since the controller was built or reset
    pub tick: u64,
}

impl ControllerSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(|e| SnapshotError::Deserialization(e.to_string()))
    }

    /// Compact binary encoding for per-frame rollback buffers.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::Serialization(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        bincode::deserialize(bytes).map_err(|e| SnapshotError::Deserialization(e.to_string()))
    }
}
