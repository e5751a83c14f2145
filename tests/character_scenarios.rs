//! Scenario tests for the standard character graph.

use fighter_fsm::character::{
    ButtonState, CharacterConfig, CharacterContext, CharacterController,
    CharacterControllerBuilder, InputContext,
};
use fighter_fsm::ControllerSnapshot;
use glam::Vec2;

fn controller() -> CharacterController {
    CharacterControllerBuilder::new(CharacterConfig::default())
        .build()
        .unwrap()
}

fn moving(x: f32) -> CharacterContext {
    CharacterContext::new(InputContext {
        movement: Vec2::new(x, 0.0),
        ..InputContext::default()
    })
}

fn idle_input() -> CharacterContext {
    CharacterContext::default()
}

fn holding_shield() -> InputContext {
    InputContext {
        shield: ButtonState::held(),
        ..InputContext::default()
    }
}

#[test]
fn ground_movement_walks_and_stops() {
    let mut controller = controller();
    assert_eq!(controller.current_name(), "Idle");

    let step = controller.update(&moving(0.5));
    assert!(step.transitioned());
    assert_eq!(controller.current_name(), "Walk");

    controller.update(&moving(0.0));
    assert_eq!(controller.current_name(), "Idle");
}

#[test]
fn idle_without_input_stays_idle() {
    let mut controller = controller();

    for _ in 0..10 {
        let step = controller.update(&idle_input());
        assert!(!step.transitioned());
    }

    assert_eq!(controller.current_name(), "Idle");
    assert_eq!(controller.ticks_in_state(), 10);
}

#[test]
fn jump_arc_rises_then_falls() {
    let mut controller = controller();
    let jump = CharacterContext::new(InputContext {
        jump: ButtonState::pressed(),
        ..InputContext::default()
    });

    controller.update(&jump);
    assert_eq!(controller.current_name(), "JumpStart");

    controller.update(&idle_input().with_grounded(false));
    assert_eq!(controller.current_name(), "Jump");

    controller.update(&idle_input().with_grounded(false).with_animation_time(0.5));
    assert_eq!(controller.current_name(), "Jump");

    controller.update(&idle_input().with_grounded(false).with_animation_time(1.0));
    assert_eq!(controller.current_name(), "Fall");

    controller.update(&idle_input().with_grounded(true));
    assert_eq!(controller.current_name(), "Land");
    controller.update(&idle_input());
    assert_eq!(controller.current_name(), "Idle");
}

#[test]
fn shield_break_runs_once_through_stun() {
    let mut controller = controller();
    let shielding = CharacterContext::new(holding_shield());

    controller.update(&shielding);
    assert_eq!(controller.current_name(), "Shield.On");
    controller.update(&shielding);
    assert_eq!(controller.current_name(), "Shield.Main");

    controller.update(&shielding.with_shield_hp(-1.0));
    assert_eq!(controller.current_name(), "Shield.Broken");

    controller.update(&idle_input());
    assert_eq!(controller.current_name(), "Shield.Stunned");

    controller.update(&idle_input());
    assert_eq!(controller.current_name(), "Idle");

    controller.update(&idle_input());
    assert_eq!(controller.current_name(), "Idle");
}

#[test]
fn hit_while_raising_shield_is_perfect() {
    let mut controller = controller();
    let shielding = CharacterContext::new(holding_shield());

    controller.update(&shielding);
    controller.update(&shielding.with_hit(true));
    assert_eq!(controller.current_name(), "Shield.Perfect");

    controller.update(&shielding);
    assert_eq!(controller.current_name(), "Shield.Main");

    controller.update(&idle_input());
    assert_eq!(controller.current_name(), "Shield.Off");
    controller.update(&idle_input());
    assert_eq!(controller.current_name(), "Idle");
}

#[test]
fn roll_out_of_shield_returns_to_shield() {
    let mut controller = controller();
    let shielding = CharacterContext::new(holding_shield());
    controller.update(&shielding);
    controller.update(&shielding);

    controller.update(&CharacterContext::new(InputContext {
        movement: Vec2::new(-0.9, 0.0),
        ..holding_shield()
    }));
    assert_eq!(controller.current_name(), "EscapeBackward");

    controller.update(&shielding);
    assert_eq!(controller.current_name(), "Shield.Main");
}

#[test]
fn aerial_direction_is_relative_to_facing() {
    let airborne_attack = |x: f32, facing: f32| {
        CharacterContext::new(InputContext {
            movement: Vec2::new(x, 0.0),
            attack: ButtonState::pressed(),
            ..InputContext::default()
        })
        .with_grounded(false)
        .with_direction(facing)
    };

    let mut facing_right = controller();
    facing_right.update(&idle_input().with_grounded(false));
    assert_eq!(facing_right.current_name(), "Fall");
    facing_right.update(&airborne_attack(0.8, 1.0));
    assert_eq!(facing_right.current_name(), "AerialForward");

    let mut facing_left = controller();
    facing_left.update(&idle_input().with_grounded(false));
    facing_left.update(&airborne_attack(0.8, -1.0));
    assert_eq!(facing_left.current_name(), "AerialBackward");

    facing_left.update(&idle_input().with_grounded(true));
    assert_eq!(facing_left.current_name(), "AerialAttackLand");
}

#[test]
fn dash_into_run_and_turn() {
    let mut controller = controller();
    let flick = CharacterContext::new(InputContext {
        movement: Vec2::new(1.0, 0.0),
        smash: Vec2::new(1.0, 0.0),
        ..InputContext::default()
    });
    let hold_right = moving(1.0);
    let hold_left = moving(-1.0);

    controller.update(&flick);
    assert_eq!(controller.current_name(), "Dash");
    controller.update(&hold_right);
    assert_eq!(controller.current_name(), "Run");
    controller.update(&hold_right);
    assert_eq!(controller.current_name(), "Run");

    controller.update(&hold_left);
    assert_eq!(controller.current_name(), "RunTurn");
    controller.update(&hold_left.with_direction(-1.0));
    assert_eq!(controller.current_name(), "Run");

    controller.update(&moving(0.0).with_direction(-1.0));
    assert_eq!(controller.current_name(), "RunBrake");
    controller.update(&idle_input());
    assert_eq!(controller.current_name(), "Idle");
}

#[test]
fn ledge_grab_and_climb() {
    let mut controller = controller();
    controller.update(&idle_input().with_grounded(false));
    assert_eq!(controller.current_name(), "Fall");

    controller.update(&idle_input().with_grounded(false).with_grabbing_ledge(true));
    assert_eq!(controller.current_name(), "LedgeGrab");
    controller.update(&idle_input().with_grounded(false).with_grabbing_ledge(true));
    assert_eq!(controller.current_name(), "LedgeIdle");

    controller.update(&CharacterContext::new(InputContext {
        movement: Vec2::new(0.0, 1.0),
        ..InputContext::default()
    }));
    assert_eq!(controller.current_name(), "LedgeClimb");

    controller.update(&idle_input().with_animation_time(1.0));
    assert_eq!(controller.current_name(), "Idle");
}

#[test]
fn context_reports_time_in_state() {
    let mut controller = controller();
    controller.update(&idle_input());
    controller.update(&idle_input());

    let ctx = idle_input().for_controller(&controller);

    assert_eq!(ctx.state(), Some(controller.current_id()));
    assert_eq!(ctx.ticks_in_state(), 2);
}

#[test]
fn identical_input_logs_replay_identically() {
    let log: Vec<CharacterContext> = (0..120)
        .map(|i| {
            let phase = i as f32 * 0.37;
            CharacterContext::new(InputContext {
                movement: Vec2::new(phase.sin(), (phase * 0.5).cos()),
                smash: Vec2::new(if i % 11 == 0 { 1.0 } else { 0.0 }, 0.0),
                attack: ButtonState::from_levels(i % 5 == 1, i % 5 == 0),
                jump: ButtonState::from_levels(false, i % 13 == 0),
                shield: ButtonState::from_levels(i % 17 > 8, i % 17 > 9),
                ..InputContext::default()
            })
            .with_grounded(i % 19 != 0)
            .with_animation_time((i % 10) as f32 / 9.0)
        })
        .collect();

    let replay = |log: &[CharacterContext]| {
        let mut controller = controller();
        controller.record_history(true);
        let names: Vec<String> = log
            .iter()
            .map(|ctx| {
                controller.update(ctx);
                controller.current_name().to_string()
            })
            .collect();
        (names, controller.history().cloned())
    };

    assert_eq!(replay(&log), replay(&log));
}

#[test]
fn snapshot_moves_between_identically_built_controllers() {
    let mut source = controller();
    source.update(&moving(0.5));
    source.update(&moving(0.5));

    let bytes = source.snapshot().to_bytes().unwrap();
    let mut target = controller();
    target
        .restore(&ControllerSnapshot::from_bytes(&bytes).unwrap())
        .unwrap();

    assert_eq!(target.current_name(), "Walk");
    assert_eq!(target.ticks_in_state(), 1);
    assert_eq!(target.tick(), 2);
}

#[test]
fn reset_returns_to_idle() {
    let mut controller = controller();
    controller.update(&moving(0.5));

    controller.reset();

    assert_eq!(controller.current_name(), "Idle");
    assert_eq!(controller.ticks_in_state(), 0);
}
