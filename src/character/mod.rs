//! Fighting-game character built on the generic engine.
//!
//! This is configuration, not engine: it registers the state catalog of a
//! playable character (ground movement, jumps, attacks, ledge and shield
//! states) and wires their transitions with the generic builder, in an
//! order that encodes which input wins when several apply.

mod builder;
mod config;
mod context;
mod data;

pub use builder::{
    CharacterBuildError, CharacterControllerBuilder, CharacterStates, ShieldStates, SmashStates,
};
pub use config::{CharacterConfig, ConfigError, StateDataEntry, DEFAULT_INPUT_THRESHOLD};
pub use context::{ButtonState, CharacterContext, InputContext};
pub use data::{CharacterStateData, SmashAttack};

use crate::builder::StateControllerBuilder;
use crate::runtime::StateController;

/// Controller driving one character.
pub type CharacterController = StateController<CharacterStateData, CharacterContext>;

/// Generic builder specialized to character data and context.
pub type CharacterGraphBuilder = StateControllerBuilder<CharacterStateData, CharacterContext>;
