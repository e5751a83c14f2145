//! Input Log Replay
//!
//! This example drives the standard character graph with a scripted input
//! log, twice, and checks that both runs visit the same states.
//!
//! Key concepts:
//! - Contexts are plain values, so an input log is just a list of them
//! - Replaying the same log reproduces the same transitions
//! - Snapshots rewind a controller for re-simulation
//!
//! Run with: RUST_LOG=fighter_fsm=debug cargo run --example replay

use fighter_fsm::character::{
    ButtonState, CharacterConfig, CharacterContext, CharacterControllerBuilder, InputContext,
};
use glam::Vec2;
use tracing_subscriber::EnvFilter;

fn script() -> Vec<CharacterContext> {
    let walk = CharacterContext::new(InputContext {
        movement: Vec2::new(0.6, 0.0),
        ..InputContext::default()
    });
    let jump = CharacterContext::new(InputContext {
        jump: ButtonState::pressed(),
        ..InputContext::default()
    });
    let airborne = CharacterContext::default().with_grounded(false);
    let shield = CharacterContext::new(InputContext {
        shield: ButtonState::held(),
        ..InputContext::default()
    });

    let mut log = vec![walk; 4];
    log.push(CharacterContext::default());
    log.push(jump);
    log.push(airborne);
    log.push(airborne.with_animation_time(1.0));
    log.push(CharacterContext::default());
    log.push(CharacterContext::default());
    log.extend([shield, shield, shield.with_shield_hp(-5.0)]);
    log.extend([CharacterContext::default(); 3]);
    log
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let builder = CharacterControllerBuilder::new(CharacterConfig::default());
    let mut first = builder.build()?;
    let mut second = first.spawn();
    let script = script();

    println!("=== Input Log Replay ===\n");
    let mut visited = Vec::with_capacity(script.len());
    for (tick, ctx) in script.iter().enumerate() {
        let step = first.update(ctx);
        let marker = if step.transitioned() { "->" } else { "  " };
        println!("tick {tick:>2} {marker} {}", first.current_name());
        visited.push(first.current_id());
    }

    let replayed: Vec<_> = script
        .iter()
        .map(|ctx| second.update(ctx).to)
        .collect();
    println!("\nReplay identical: {}", visited == replayed);

    let snapshot = first.snapshot();
    println!("Snapshot: {}", snapshot.to_json()?);
    first.reset();
    first.restore(&snapshot)?;
    println!("Restored to '{}' at tick {}", first.current_name(), first.tick());

    Ok(())
}
