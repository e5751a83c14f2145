//! State catalog and transition wiring of a playable character.

use super::config::{CharacterConfig, ConfigError};
use super::context::{sign, CharacterContext, InputContext};
use super::data::SmashAttack;
use super::{CharacterController, CharacterGraphBuilder};
use crate::builder::BuildErrors;
use crate::core::StateId;
use thiserror::Error;
use tracing::debug;

/// Errors raised while building a character controller.
#[derive(Debug, Error)]
pub enum CharacterBuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Graph(#[from] BuildErrors),
}

/// Charge and release halves of a smash attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SmashStates {
    pub charge: StateId,
    pub attack: StateId,
}

/// Shield raise, hold, release and break phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShieldStates {
    pub on: StateId,
    pub perfect: StateId,
    pub main: StateId,
    pub off: StateId,
    pub broken: StateId,
    pub stunned: StateId,
}

/// Handles of every state a character has.
///
/// Grouped states are registered under dotted names (`Shield.Main`,
/// `SmashUp.Charge`); the group is only a naming convention, the engine
/// sees a flat list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharacterStates {
    pub idle: StateId,
    pub walk: StateId,
    pub dash: StateId,
    pub run: StateId,
    pub run_turn: StateId,
    pub run_brake: StateId,
    pub crouch_start: StateId,
    pub crouch: StateId,
    pub crouch_end: StateId,

    pub jump_start: StateId,
    pub jump: StateId,
    pub jump_aerial: StateId,
    pub fall: StateId,
    pub fall_helpless: StateId,
    pub land: StateId,
    pub escape_air: StateId,

    pub escape: StateId,
    pub escape_forward: StateId,
    pub escape_backward: StateId,

    pub neutral: StateId,
    pub tilt_up: StateId,
    pub tilt_down: StateId,
    pub tilt_side: StateId,
    pub smash_up: SmashStates,
    pub smash_side: SmashStates,
    pub smash_down: SmashStates,

    pub aerial_up: StateId,
    pub aerial_down: StateId,
    pub aerial_forward: StateId,
    pub aerial_backward: StateId,
    pub aerial_neutral: StateId,
    pub aerial_attack_land: StateId,

    pub ledge_grab: StateId,
    pub ledge_idle: StateId,
    pub ledge_release: StateId,
    pub ledge_climb: StateId,
    pub ledge_jump: StateId,
    pub ledge_attack: StateId,
    pub ledge_escape: StateId,

    pub shield: ShieldStates,
}

impl CharacterStates {
    /// Register the whole catalog, taking each state's data from `config`.
    pub fn register(builder: &mut CharacterGraphBuilder, config: &CharacterConfig) -> Self {
        let mut state = |name: &str| builder.add_state(name, config.data_for(name));

        let idle = state("Idle");
        let walk = state("Walk");
        let dash = state("Dash");
        let run = state("Run");
        let run_turn = state("RunTurn");
        let run_brake = state("RunBrake");
        let crouch_start = state("CrouchStart");
        let crouch = state("Crouch");
        let crouch_end = state("CrouchEnd");

        let jump_start = state("JumpStart");
        let jump = state("Jump");
        let jump_aerial = state("JumpAerial");
        let fall = state("Fall");
        let fall_helpless = state("FallHelpless");
        let land = state("Land");
        let escape_air = state("EscapeAir");

        let escape = state("Escape");
        let escape_forward = state("EscapeForward");
        let escape_backward = state("EscapeBackward");

        let neutral = state("Neutral");
        let tilt_up = state("TiltUp");
        let tilt_down = state("TiltDown");
        let tilt_side = state("TiltSide");
        let mut smash = |group: &str| SmashStates {
            charge: state(format!("{group}.Charge").as_str()),
            attack: state(format!("{group}.Attack").as_str()),
        };
        let smash_up = smash("SmashUp");
        let smash_side = smash("SmashSide");
        let smash_down = smash("SmashDown");

        let aerial_up = state("AerialUp");
        let aerial_down = state("AerialDown");
        let aerial_forward = state("AerialForward");
        let aerial_backward = state("AerialBackward");
        let aerial_neutral = state("AerialNeutral");
        let aerial_attack_land = state("AerialAttackLand");

        let ledge_grab = state("LedgeGrab");
        let ledge_idle = state("LedgeIdle");
        let ledge_release = state("LedgeRelease");
        let ledge_climb = state("LedgeClimb");
        let ledge_jump = state("LedgeJump");
        let ledge_attack = state("LedgeAttack");
        let ledge_escape = state("LedgeEscape");

        let shield = ShieldStates {
            on: state("Shield.On"),
            perfect: state("Shield.Perfect"),
            main: state("Shield.Main"),
            off: state("Shield.Off"),
            broken: state("Shield.Broken"),
            stunned: state("Shield.Stunned"),
        };

        Self {
            idle,
            walk,
            dash,
            run,
            run_turn,
            run_brake,
            crouch_start,
            crouch,
            crouch_end,
            jump_start,
            jump,
            jump_aerial,
            fall,
            fall_helpless,
            land,
            escape_air,
            escape,
            escape_forward,
            escape_backward,
            neutral,
            tilt_up,
            tilt_down,
            tilt_side,
            smash_up,
            smash_side,
            smash_down,
            aerial_up,
            aerial_down,
            aerial_forward,
            aerial_backward,
            aerial_neutral,
            aerial_attack_land,
            ledge_grab,
            ledge_idle,
            ledge_release,
            ledge_climb,
            ledge_jump,
            ledge_attack,
            ledge_escape,
            shield,
        }
    }

    pub fn smash_attacks(&self) -> [SmashStates; 3] {
        [self.smash_up, self.smash_side, self.smash_down]
    }
}

/// Guard over the input alone.
fn input<F>(predicate: F) -> impl Fn(&CharacterContext) -> bool + Send + Sync + 'static
where
    F: Fn(&InputContext) -> bool + Send + Sync + 'static,
{
    move |ctx: &CharacterContext| predicate(ctx.input())
}

/// Guard for an attack press that also satisfies `predicate`.
fn attack<F>(predicate: F) -> impl Fn(&CharacterContext) -> bool + Send + Sync + 'static
where
    F: Fn(&InputContext) -> bool + Send + Sync + 'static,
{
    move |ctx: &CharacterContext| ctx.input().attack.was_pressed && predicate(ctx.input())
}

fn finished_grounded(ctx: &CharacterContext) -> bool {
    ctx.animation_finished() && ctx.is_grounded()
}

fn finished_airborne(ctx: &CharacterContext) -> bool {
    ctx.animation_finished() && !ctx.is_grounded()
}

/// Declares a character's state graph on top of the generic builder.
///
/// Transitions are declared group by group; within a state, whatever is
/// declared first takes priority. Ground attacks are therefore checked
/// before jumps, dashes and walking, and directional attacks before the
/// neutral fallback.
///
/// ```rust
/// use fighter_fsm::character::{
///     ButtonState, CharacterConfig, CharacterContext, CharacterControllerBuilder, InputContext,
/// };
///
/// let mut controller = CharacterControllerBuilder::new(CharacterConfig::default())
///     .build()
///     .unwrap();
/// let jump = CharacterContext::new(InputContext {
///     jump: ButtonState::pressed(),
///     ..InputContext::default()
/// });
///
/// controller.update(&jump);
/// assert_eq!(controller.current_name(), "JumpStart");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CharacterControllerBuilder {
    config: CharacterConfig,
}

impl CharacterControllerBuilder {
    pub fn new(config: CharacterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CharacterConfig {
        &self.config
    }

    /// Build the standard character graph.
    pub fn build(&self) -> Result<CharacterController, CharacterBuildError> {
        self.build_with(|_, _| {})
    }

    /// Build the standard graph plus character-specific declarations.
    ///
    /// `extend` runs after every standard transition is declared, so what it
    /// adds to an existing state has the lowest priority there.
    pub fn build_with<F>(&self, extend: F) -> Result<CharacterController, CharacterBuildError>
    where
        F: FnOnce(&mut CharacterGraphBuilder, &CharacterStates),
    {
        let mut builder = CharacterGraphBuilder::new();
        let states = self.declare(&mut builder)?;
        extend(&mut builder, &states);
        Ok(builder.build()?)
    }

    /// Register the catalog and declare its transitions on `builder`.
    pub fn declare(
        &self,
        builder: &mut CharacterGraphBuilder,
    ) -> Result<CharacterStates, ConfigError> {
        let s = CharacterStates::register(builder, &self.config);
        self.config.validate(|name| builder.lookup(name).is_some())?;

        for smash in s.smash_attacks() {
            if let Some(data) = builder.data_mut(smash.charge) {
                data.smash_attack = SmashAttack::Charge;
            }
            if let Some(data) = builder.data_mut(smash.attack) {
                data.smash_attack = SmashAttack::Attack;
            }
        }

        let t = self.config.input_threshold;
        debug!(threshold = t, "declaring character transitions");

        // Ground attacks: tilts, then smashes, then the neutral fallback
        builder
            .group(&[s.idle, s.walk, s.crouch_start, s.crouch, s.crouch_end])
            .add_transitions(s.tilt_up, attack(move |i| i.movement.y > t))
            .add_transitions(s.tilt_down, attack(move |i| i.movement.y < -t))
            .add_transitions(s.tilt_side, attack(move |i| i.movement.x.abs() > t))
            .add_transitions(s.smash_up.charge, attack(move |i| i.smash.y > t))
            .add_transitions(s.smash_side.charge, attack(move |i| i.smash.x.abs() > t))
            .add_transitions(s.smash_down.charge, attack(move |i| i.smash.y < -t))
            .add_transitions(s.neutral, attack(|_| true));
        for smash in s.smash_attacks() {
            builder.add_transition_to(smash.charge, smash.attack);
        }
        builder.add_transitions_to(
            &[
                s.neutral,
                s.tilt_up,
                s.tilt_down,
                s.tilt_side,
                s.smash_up.attack,
                s.smash_down.attack,
                s.smash_side.attack,
            ],
            s.idle,
        );

        // Aerial attacks, forward and backward relative to facing
        builder
            .group(&[s.fall, s.jump, s.jump_aerial])
            .add_transitions(s.aerial_up, attack(move |i| i.movement.y > t))
            .add_transitions(s.aerial_down, attack(move |i| i.movement.y < -t))
            .add_transitions(s.aerial_forward, move |ctx: &CharacterContext| {
                ctx.input().attack.was_pressed && ctx.input().movement.x * ctx.facing() > t
            })
            .add_transitions(s.aerial_backward, move |ctx: &CharacterContext| {
                ctx.input().attack.was_pressed && ctx.input().movement.x * ctx.facing() < -t
            })
            .add_transitions(s.aerial_neutral, attack(|_| true));
        builder
            .group(&[
                s.aerial_forward,
                s.aerial_backward,
                s.aerial_down,
                s.aerial_up,
                s.aerial_neutral,
            ])
            .add_transitions(s.aerial_attack_land, |ctx: &CharacterContext| ctx.is_grounded())
            .add_transitions_to(s.fall);
        builder.add_transition_to(s.aerial_attack_land, s.idle);

        // Aerial movement
        builder.add_transitions(
            &[
                s.idle,
                s.walk,
                s.dash,
                s.run,
                s.run_turn,
                s.run_brake,
                s.crouch_start,
                s.crouch,
                s.crouch_end,
                s.shield.main,
            ],
            s.jump_start,
            input(|i| i.jump.was_pressed),
        );
        builder.add_transitions_to(&[s.jump_start, s.jump_aerial], s.jump);
        builder
            .group(&[s.jump, s.fall])
            .add_transitions(s.jump_aerial, input(|i| i.jump.was_pressed))
            .add_transitions(s.escape_air, input(|i| i.shield.was_pressed));
        builder
            .state(s.jump)
            .add_transition(s.idle, finished_grounded)
            .add_transition(s.fall, finished_airborne);
        builder.add_transition_to(s.escape_air, s.fall_helpless);
        builder.add_transitions(
            &[s.fall, s.fall_helpless, s.escape_air],
            s.land,
            |ctx: &CharacterContext| ctx.is_grounded(),
        );
        builder.add_transition_to(s.land, s.idle);

        // Running
        builder.add_transition(s.idle, s.dash, input(move |i| i.smash.x.abs() > t));
        builder.add_transition(s.dash, s.idle, input(move |i| i.movement.x.abs() < t));
        builder.add_transitions_to(&[s.dash, s.run_turn], s.run);
        builder
            .state(s.run)
            .add_transition(s.run_brake, input(move |i| i.movement.x.abs() < t))
            .add_transition(s.run_turn, |ctx: &CharacterContext| {
                sign(ctx.input().movement.x) != ctx.facing()
            });
        builder.add_transition_to(s.run_brake, s.idle);

        // Ground movement
        builder
            .group(&[s.idle, s.walk, s.run])
            .add_transitions(s.crouch_start, input(move |i| i.movement.y < -t))
            .add_transitions(s.fall, |ctx: &CharacterContext| !ctx.is_grounded());
        builder.add_transition(s.idle, s.walk, input(move |i| i.movement.x.abs() > t));
        builder.add_transition(s.walk, s.idle, input(move |i| i.movement.x.abs() < t));

        // Crouching
        builder.add_transition_to(s.crouch_start, s.crouch);
        builder.add_transition(s.crouch, s.crouch_end, input(move |i| i.movement.y >= -t));
        builder.add_transition_to(s.crouch_end, s.idle);

        // Ledge
        builder.add_transitions(
            &[s.idle, s.fall, s.fall_helpless],
            s.ledge_grab,
            |ctx: &CharacterContext| ctx.is_grabbing_ledge(),
        );
        builder.add_transition_to(s.ledge_grab, s.ledge_idle);
        builder
            .state(s.ledge_idle)
            .add_transition(s.ledge_release, input(move |i| i.movement.y < -t))
            .add_transition(s.ledge_climb, input(move |i| i.movement.y > t))
            .add_transition(s.ledge_jump, input(|i| i.jump.was_pressed))
            .add_transition(s.ledge_attack, attack(|_| true))
            .add_transition(s.ledge_escape, input(|i| i.shield.was_pressed));
        builder.add_transition_to(s.ledge_jump, s.jump);
        builder
            .group(&[s.ledge_release, s.ledge_climb, s.ledge_escape, s.ledge_attack])
            .add_transitions(s.idle, finished_grounded)
            .add_transitions(s.fall, finished_airborne);

        // Shielding; a break runs Broken -> Stunned -> Idle once, no wrap
        builder.add_transition(s.idle, s.shield.on, input(|i| i.shield.current));
        builder
            .state(s.shield.on)
            .add_transition(s.shield.perfect, |ctx: &CharacterContext| ctx.is_hit())
            .add_transition_to(s.shield.main);
        builder.add_transition_to(s.shield.perfect, s.shield.main);
        builder
            .state(s.shield.main)
            .add_transition(s.shield.broken, |ctx: &CharacterContext| ctx.shield_hp() < 0.0)
            .add_transition(s.shield.off, input(|i| !i.shield.current));
        builder.add_transition_to(s.shield.off, s.idle);
        builder.sequence(&[s.shield.broken, s.shield.stunned, s.idle]);

        // Rolls and spot dodge out of shield
        builder
            .state(s.shield.main)
            .add_transition(s.escape_forward, input(move |i| i.movement.x > t))
            .add_transition(s.escape_backward, input(move |i| i.movement.x < -t))
            .add_transition(s.escape, input(move |i| i.movement.y < -t));
        builder.add_transitions_to(&[s.escape, s.escape_forward, s.escape_backward], s.shield.main);

        builder.with_default_state(s.idle);
        Ok(s)
    }
}
