//! Per-tick snapshot of a character's input and environment.

use super::CharacterController;
use crate::core::StateId;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Level and edge state of one logical button for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonState {
    /// Held this tick
    pub current: bool,
    /// Went down this tick
    pub was_pressed: bool,
    /// Went up this tick
    pub was_released: bool,
}

impl ButtonState {
    /// Derive edges from the level on the previous and the current tick.
    pub fn from_levels(previous: bool, current: bool) -> Self {
        Self {
            current,
            was_pressed: current && !previous,
            was_released: previous && !current,
        }
    }

    /// Pressed down on this exact tick.
    pub fn pressed() -> Self {
        Self::from_levels(false, true)
    }

    /// Held since an earlier tick.
    pub fn held() -> Self {
        Self::from_levels(true, true)
    }
}

/// One tick of player input.
///
/// Analog vectors are in `[-1, 1]` per axis; `movement` is the control
/// stick, `smash` its fast flick (or a dedicated C-stick).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputContext {
    pub movement: Vec2,
    pub smash: Vec2,
    pub attack: ButtonState,
    pub special: ButtonState,
    pub jump: ButtonState,
    pub shield: ButtonState,
    pub grab: ButtonState,
}

/// Immutable per-tick context consumed by character guards and hooks.
///
/// Assembled by the simulation once physics and input for the tick are
/// resolved, handed to [`StateController::update`](crate::runtime::StateController::update)
/// by reference and dropped afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharacterContext {
    input: InputContext,
    grounded: bool,
    grabbing_ledge: bool,
    hit: bool,
    direction: f32,
    shield_hp: f32,
    normalized_animation_time: f32,
    state: Option<StateId>,
    ticks_in_state: u64,
}

impl Default for CharacterContext {
    fn default() -> Self {
        Self::new(InputContext::default())
    }
}

impl CharacterContext {
    /// Context for a grounded character facing right with a full shield.
    pub fn new(input: InputContext) -> Self {
        Self {
            input,
            grounded: true,
            grabbing_ledge: false,
            hit: false,
            direction: 1.0,
            shield_hp: 100.0,
            normalized_animation_time: 0.0,
            state: None,
            ticks_in_state: 0,
        }
    }

    pub fn with_grounded(mut self, grounded: bool) -> Self {
        self.grounded = grounded;
        self
    }

    pub fn with_grabbing_ledge(mut self, grabbing: bool) -> Self {
        self.grabbing_ledge = grabbing;
        self
    }

    pub fn with_hit(mut self, hit: bool) -> Self {
        self.hit = hit;
        self
    }

    /// Facing direction; only its sign is meaningful.
    pub fn with_direction(mut self, direction: f32) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_shield_hp(mut self, shield_hp: f32) -> Self {
        self.shield_hp = shield_hp;
        self
    }

    /// Fraction of the active state's clip that has elapsed, clamped to `[0, 1]`.
    pub fn with_animation_time(mut self, normalized: f32) -> Self {
        self.normalized_animation_time = normalized.clamp(0.0, 1.0);
        self
    }

    /// Fill in the active state and its time in state from `controller`.
    pub fn for_controller(mut self, controller: &CharacterController) -> Self {
        self.state = Some(controller.current_id());
        self.ticks_in_state = controller.ticks_in_state();
        self
    }

    pub fn input(&self) -> &InputContext {
        &self.input
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_grabbing_ledge(&self) -> bool {
        self.grabbing_ledge
    }

    pub fn is_hit(&self) -> bool {
        self.hit
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    /// `1.0` when facing right (or straight ahead), `-1.0` when facing left.
    pub fn facing(&self) -> f32 {
        sign(self.direction)
    }

    pub fn shield_hp(&self) -> f32 {
        self.shield_hp
    }

    pub fn normalized_animation_time(&self) -> f32 {
        self.normalized_animation_time
    }

    /// Whether the active state's clip has played to the end.
    pub fn animation_finished(&self) -> bool {
        self.normalized_animation_time >= 1.0
    }

    /// Active state, when filled in by [`for_controller`](Self::for_controller).
    pub fn state(&self) -> Option<StateId> {
        self.state
    }

    pub fn ticks_in_state(&self) -> u64 {
        self.ticks_in_state
    }
}

/// Sign with zero counted as positive, so a neutral stick reads as forward.
pub(crate) fn sign(value: f32) -> f32 {
    if value >= 0.0 {
        1.0
    } else {
        -1.0
    }
}
