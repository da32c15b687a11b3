/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Input → player motion intents, block, attack
///   2. Spawn director (story spawns / boss-rush waves, rocks)
///   3. Player physics and timers (cooldowns, block window, effects, poison)
///   4. Creatures: stun ragdoll or physics + AI
///   5. Collisions: rocks, then creature contact
///   6. Pickups
///   7. Particles, off-screen culling
///   8. Camera
///
/// Presentation (phase 9) belongs to the game loop and runs even while
/// paused. Any phase that ends the session returns immediately: nothing
/// mutates the world after the outcome is decided.

use rand::Rng;

use crate::config::SpawnConfig;
use crate::domain::ai;
use crate::domain::entity::{burst, EffectKind, Facing, FrameInput, Spark};
use crate::domain::physics;
use crate::domain::rules;
use super::combat;
use super::event::GameEvent;
use super::spawn;
use super::world::{GameMode, Phase, WorldState};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step<R: Rng + ?Sized>(world: &mut WorldState, input: FrameInput, rng: &mut R) -> Vec<GameEvent> {
    if !world.is_running() { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    if world.message_timer > 0 {
        world.message_timer -= 1;
        if world.message_timer == 0 { world.message.clear(); }
    }

    if resolve_input(world, input, rng, &mut events) { return events; }
    if spawn::run(world, rng, &mut events) { return events; }
    if resolve_player(world, rng, &mut events) { return events; }
    resolve_enemies(world, rng);
    if combat::resolve_hazards(world, rng, &mut events) { return events; }
    if combat::resolve_enemy_contacts(world, rng, &mut events) { return events; }
    combat::resolve_pickups(world, rng, &mut events);
    resolve_particles(world);
    spawn::cull_behind(world);
    world.camera.follow(world.player.body.x, world.camera_limit());

    events
}

/// Build a fresh, populated session. The previous world is simply dropped.
pub fn start_session(mode: GameMode, spawn_cfg: SpawnConfig) -> WorldState {
    let mut world = WorldState::session(mode, spawn_cfg);
    spawn::seed(&mut world);
    log::info!(
        "{} session started: {} creatures, {} pickups",
        mode, world.enemies.len(), world.collectibles.len()
    );
    world
}

/// Pause only applies to a running session.
pub fn toggle_pause(world: &mut WorldState) {
    if world.phase == Phase::Playing {
        world.paused = !world.paused;
        log::debug!("paused: {}", world.paused);
    }
}

// ══════════════════════════════════════════════════════════════
// 1. Input
// ══════════════════════════════════════════════════════════════

fn resolve_input<R: Rng + ?Sized>(
    world: &mut WorldState,
    input: FrameInput,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) -> bool {
    let player = &mut world.player;
    let accel = if player.has_effect(EffectKind::Speed) {
        rules::MOVE_ACCEL * rules::SPEED_MULTIPLIER
    } else {
        rules::MOVE_ACCEL
    };

    if input.right {
        player.body.vx += accel;
        player.facing = Facing::Right;
    }
    if input.left {
        player.body.vx -= accel;
        player.facing = Facing::Left;
    }
    if input.jump && physics::can_jump(&player.body) {
        player.body.vy = rules::JUMP_FORCE;
        events.push(GameEvent::Jumped);
    }
    if input.block {
        combat::try_block(player);
    }
    input.attack && combat::try_attack(world, rng, events)
}

// ══════════════════════════════════════════════════════════════
// 3. Player physics and timers
// ══════════════════════════════════════════════════════════════

/// Returns true if poison finished the player off.
fn resolve_player<R: Rng + ?Sized>(world: &mut WorldState, rng: &mut R, events: &mut Vec<GameEvent>) -> bool {
    let bounds = world.bounds();
    let player = &mut world.player;

    physics::slide(&mut player.body);
    physics::fall(&mut player.body);
    physics::land(&mut player.body);
    physics::clamp_to_bounds(&mut player.body, bounds);

    player.attack_cooldown = player.attack_cooldown.saturating_sub(1);
    if player.swing_timer > 0 {
        player.swing_timer -= 1;
        if player.swing_timer == 0 { player.is_attacking = false; }
    }
    if player.parry_timer > 0 {
        player.parry_timer -= 1;
        if player.parry_timer == 0 { player.is_blocking = false; }
    }
    player.parry_cooldown = player.parry_cooldown.saturating_sub(1);

    world.shake = world.shake.saturating_sub(1);
    world.flash = world.flash.saturating_sub(1);

    for effect in world.player.effects.iter_mut() {
        effect.remaining = effect.remaining.saturating_sub(1);
    }
    if combat::resolve_poison(world, rng, events) { return true; }
    world.player.effects.retain(|e| e.remaining > 0);
    false
}

// ══════════════════════════════════════════════════════════════
// 4. Creatures
// ══════════════════════════════════════════════════════════════

fn resolve_enemies<R: Rng + ?Sized>(world: &mut WorldState, rng: &mut R) {
    let player = world.player.body.clone();
    let bounds = world.bounds();

    for enemy in world.enemies.iter_mut() {
        let motion = ai::update_enemy(enemy, &player, bounds, rng);
        if let Some((x, y)) = motion.landed {
            burst(&mut world.particles, rng, x, y, Spark::Dust, 5);
        }
        if let Some((x, y)) = motion.leapt {
            burst(&mut world.particles, rng, x, y, Spark::Smoke, 5);
        }
    }
}

// ══════════════════════════════════════════════════════════════
// 7. Particles
// ══════════════════════════════════════════════════════════════

fn resolve_particles(world: &mut WorldState) {
    world.particles.retain_mut(|p| p.advance());
}
