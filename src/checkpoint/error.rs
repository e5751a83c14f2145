//! Snapshot error types.

use thiserror::Error;

/// Errors that can occur while encoding or restoring a snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Encoding to JSON or binary failed
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Decoding from JSON or binary failed
    #[error("Deserialization failed: {0}")]
    Deserialization(String),

    /// Snapshot format version is not supported by this version
    #[error("Unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Snapshot counts more ticks in its state than ticks overall
    #[error("Snapshot has {ticks_in_state} ticks in state but only {tick} ticks overall")]
    InconsistentTicks { ticks_in_state: u64, tick: u64 },

    /// Snapshot names a state the graph does not have
    #[error("Snapshot names unknown state '{0}'")]
    UnknownState(String),
}
