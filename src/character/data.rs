//! Tunable data attached to each character state.

use serde::{Deserialize, Serialize};

/// Role a state plays in a smash attack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SmashAttack {
    /// Not part of a smash attack
    #[default]
    None,
    /// Holding the attack to build power
    Charge,
    /// Releasing the charged attack
    Attack,
}

/// Per-state parameters of a character.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterStateData {
    pub smash_attack: SmashAttack,
    /// Clip the animation system plays while the state is active
    pub animation: Option<String>,
}

impl CharacterStateData {
    pub fn with_animation(animation: impl Into<String>) -> Self {
        Self {
            animation: Some(animation.into()),
            ..Self::default()
        }
    }

    pub fn is_smash_charge(&self) -> bool {
        self.smash_attack == SmashAttack::Charge
    }
}
