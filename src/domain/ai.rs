/// Creature AI: one behavior per `Species`, selected by a single match.
///
/// Behaviors are functions of the signed horizontal distance to the player
/// (`dist = player.x - enemy.x`), the creature's own velocity and a
/// per-call random draw. They only write velocity and facing; position is
/// integrated by `update_enemy` through `physics`.
///
/// Roles:
///   - **Ground default** (Tiger, T-Rex): creep toward the player.
///   - **Charger** (Rhino): charges only while already facing the player.
///   - **Fast jumper** (Raptor): runs at the player, hops when close.
///   - **Pouncer** (Sabertooth): accelerates to a cap, leaps from mid range.
///   - **Heavy** (Mammoth): stands its ground, occasional dash.
///   - **Ranger** (Scorpion): patrols, turns to face the player up close.
///   - **Flyer** (Pterodactyl): no gravity, swoops and climbs.

use rand::Rng;

use super::entity::{Body, Enemy, Facing, Species};
use super::physics::{self, Bounds};
use super::rules;

// ── Ground default ──
const CREEP_ACCEL: f32 = 0.2;

// ── Charger ──
const CHARGE_RANGE: f32 = 400.0;
const CHARGE_ACCEL: f32 = 0.5;
const CHARGE_MAX: f32 = 10.0;
const PATROL_SPEED: f32 = 1.5;
const TURN_CHANCE: f64 = 0.01;

// ── Fast jumper ──
const RUN_SPEED: f32 = 5.0;
const HOP_RANGE: f32 = 150.0;
const HOP_CHANCE: f64 = 0.05;
const HOP_FORCE: f32 = -12.0;

// ── Pouncer ──
const POUNCE_ACCEL: f32 = 0.4;
const POUNCE_MAX: f32 = 7.0;
const LEAP_MIN: f32 = 50.0;
const LEAP_MAX: f32 = 200.0;
const LEAP_CHANCE: f64 = 0.03;
const LEAP_LIFT: f32 = -12.0;
const LEAP_SPEED: f32 = 10.0;

// ── Heavy ──
const DASH_RANGE: f32 = 200.0;
const DASH_CHANCE: f64 = 0.02;
const DASH_SPEED: f32 = 8.0;

// ── Ranger ──
const CRAWL_SPEED: f32 = 1.0;
const NOTICE_RANGE: f32 = 100.0;

// ── Flyer ──
const GLIDE_ACCEL: f32 = 0.3;
const GLIDE_MAX: f32 = 6.0;
const SWOOP_RANGE: f32 = 250.0;
const SWOOP_ACCEL: f32 = 0.5;
const SWOOP_MAX: f32 = 6.0;
/// Flyers climb when their lower edge gets this close to the floor.
const CLIMB_CLEARANCE: f32 = 120.0;
const CLIMB_ACCEL: f32 = 0.4;
const CLIMB_MAX: f32 = 4.0;
const CRUISE_DAMPING: f32 = 0.9;

/// Landing impacts faster than this kick up dust.
pub const HARD_LANDING_VY: f32 = 2.0;

/// Visual side effects of one enemy update, for the caller to turn into
/// particles.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Motion {
    /// Ground point of a hard landing.
    pub landed: Option<(f32, f32)>,
    /// Take-off point of a pouncer leap.
    pub leapt: Option<(f32, f32)>,
}

#[inline]
fn dir(dist: f32) -> f32 {
    Facing::toward(dist).sign()
}

fn is_facing(facing: Facing, dist: f32) -> bool {
    (dist > 0.0 && facing == Facing::Right) || (dist < 0.0 && facing == Facing::Left)
}

// ══════════════════════════════════════════════════════════════
// Per-tick update: stun → physics → think
// ══════════════════════════════════════════════════════════════

/// Advance one creature by one tick.
///
/// A stunned creature is a ragdoll: it falls, lands and slides (flyers
/// included) while the stun counts down, and never thinks. Otherwise it
/// moves under physics first, then reacts if the player is within
/// `rules::AWARENESS_RANGE`.
pub fn update_enemy<R: Rng + ?Sized>(
    enemy: &mut Enemy,
    player: &Body,
    bounds: Bounds,
    rng: &mut R,
) -> Motion {
    let mut motion = Motion::default();

    if enemy.is_stunned() {
        enemy.stun_timer -= 1;
        physics::fall(&mut enemy.body);
        physics::land(&mut enemy.body);
        physics::slide(&mut enemy.body);
        physics::clamp_to_bounds(&mut enemy.body, bounds);
        return motion;
    }

    if enemy.species.is_flyer() {
        enemy.body.y += enemy.body.vy;
        physics::bounce(&mut enemy.body);
        physics::clamp_ceiling(&mut enemy.body);
    } else {
        physics::fall(&mut enemy.body);
        if let Some(impact) = physics::land(&mut enemy.body) {
            if impact > HARD_LANDING_VY {
                let (cx, _) = enemy.body.center();
                motion.landed = Some((cx, rules::FLOOR_Y));
            }
        }
    }
    physics::slide(&mut enemy.body);
    physics::clamp_to_bounds(&mut enemy.body, bounds);

    let dist = player.x - enemy.body.x;
    if dist.abs() < rules::AWARENESS_RANGE {
        motion.leapt = think(enemy, player, dist, rng);
    }
    motion
}

/// Species dispatch. Returns the take-off point when a pouncer leaps.
pub fn think<R: Rng + ?Sized>(
    enemy: &mut Enemy,
    player: &Body,
    dist: f32,
    rng: &mut R,
) -> Option<(f32, f32)> {
    match enemy.species {
        Species::Tiger | Species::TRex => creep(enemy, dist),
        Species::Rhino => charge(enemy, dist, rng),
        Species::Raptor => run_and_hop(enemy, dist, rng),
        Species::Sabertooth => return pounce(enemy, dist, rng),
        Species::Mammoth => stomp(enemy, dist, rng),
        Species::Scorpion => crawl(enemy, dist, rng),
        Species::Pterodactyl => glide(enemy, player, dist),
    }
    None
}

// ── Behaviors ──

fn creep(enemy: &mut Enemy, dist: f32) {
    enemy.body.vx += dir(dist) * CREEP_ACCEL;
    enemy.facing = Facing::toward(dist);
}

fn charge<R: Rng + ?Sized>(enemy: &mut Enemy, dist: f32, rng: &mut R) {
    if dist.abs() < CHARGE_RANGE && is_facing(enemy.facing, dist) {
        enemy.body.vx += dir(dist) * CHARGE_ACCEL;
        if enemy.body.vx.abs() > CHARGE_MAX {
            enemy.body.vx = dir(dist) * CHARGE_MAX;
        }
    } else {
        enemy.body.vx = enemy.facing.sign() * PATROL_SPEED;
        if rng.gen_bool(TURN_CHANCE) {
            enemy.facing = enemy.facing.flipped();
        }
    }
}

fn run_and_hop<R: Rng + ?Sized>(enemy: &mut Enemy, dist: f32, rng: &mut R) {
    enemy.facing = Facing::toward(dist);
    enemy.body.vx = enemy.facing.sign() * RUN_SPEED;
    if dist.abs() < HOP_RANGE && physics::is_grounded(&enemy.body) && rng.gen_bool(HOP_CHANCE) {
        enemy.body.vy = HOP_FORCE;
    }
}

fn pounce<R: Rng + ?Sized>(enemy: &mut Enemy, dist: f32, rng: &mut R) -> Option<(f32, f32)> {
    enemy.body.vx = (enemy.body.vx + dir(dist) * POUNCE_ACCEL).clamp(-POUNCE_MAX, POUNCE_MAX);
    enemy.facing = Facing::toward(dist);

    let in_band = dist.abs() < LEAP_MAX && dist.abs() > LEAP_MIN;
    if in_band && physics::is_grounded(&enemy.body) && rng.gen_bool(LEAP_CHANCE) {
        enemy.body.vy = LEAP_LIFT;
        enemy.body.vx = dir(dist) * LEAP_SPEED;
        let (cx, _) = enemy.body.center();
        return Some((cx, enemy.body.bottom()));
    }
    None
}

fn stomp<R: Rng + ?Sized>(enemy: &mut Enemy, dist: f32, rng: &mut R) {
    if dist.abs() < DASH_RANGE && rng.gen_bool(DASH_CHANCE) {
        enemy.body.vx = dir(dist) * DASH_SPEED;
    }
    enemy.facing = Facing::toward(dist);
}

fn crawl<R: Rng + ?Sized>(enemy: &mut Enemy, dist: f32, rng: &mut R) {
    if dist.abs() < NOTICE_RANGE {
        enemy.facing = Facing::toward(dist);
    } else if rng.gen_bool(TURN_CHANCE) {
        enemy.facing = enemy.facing.flipped();
    }
    enemy.body.vx = enemy.facing.sign() * CRAWL_SPEED;
}

fn glide(enemy: &mut Enemy, player: &Body, dist: f32) {
    enemy.facing = Facing::toward(dist);
    enemy.body.vx = (enemy.body.vx + dir(dist) * GLIDE_ACCEL).clamp(-GLIDE_MAX, GLIDE_MAX);

    let above_player = enemy.body.bottom() < player.y;
    let near_floor = enemy.body.bottom() > rules::FLOOR_Y - CLIMB_CLEARANCE;
    if dist.abs() < SWOOP_RANGE && above_player {
        enemy.body.vy = (enemy.body.vy + SWOOP_ACCEL).min(SWOOP_MAX);
    } else if near_floor {
        enemy.body.vy = (enemy.body.vy - CLIMB_ACCEL).max(-CLIMB_MAX);
    } else {
        enemy.body.vy *= CRUISE_DAMPING;
    }
}
