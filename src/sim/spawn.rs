/// Spawn director: who enters the world, where and when.
///
/// ## Story
///   - A fixed opening line of creatures and pickups (`seed_story`).
///   - Every `spawn.interval` ticks, while fewer than `spawn.max_enemies`
///     are alive: one weighted-random creature one view ahead of the
///     player (plus up to 200 px), unless that point is already inside the
///     boss arena. 30 % of those spawns also drop a pickup nearby.
///   - Rocks fall every `spawn.hazard_interval_story` ticks once the
///     player is within 100 px of the arena.
///
/// ## Boss rush
///   - Five fixed waves. When the arena is empty the delay timer counts
///     up; at `spawn.wave_delay` the next wave enters. With no wave left,
///     the session is won.
///   - Rocks fall every `spawn.hazard_interval_rush` ticks, always.
///
/// ## Wave Table
/// ┌──────┬──────────────────────────────────────┬─────────────────────┐
/// │ Wave │ Creatures                            │ Drops               │
/// ├──────┼──────────────────────────────────────┼─────────────────────┤
/// │ 1    │ raptor ×2, tiger                     │                     │
/// │ 2    │ sabertooth ×2, scorpion, pterodactyl │ food                │
/// │ 3    │ rhino ×2, t-rex                      │ strength            │
/// │ 4    │ t-rex ×2, pterodactyl ×2             │ speed, food         │
/// │ 5    │ mammoth (hp ×5)                      │ strength, food      │
/// └──────┴──────────────────────────────────────┴─────────────────────┘

use rand::Rng;

use crate::domain::entity::{Collectible, CollectibleKind, Enemy, Facing, Hazard, PowerUp, Species};
use crate::domain::rules;
use super::combat;
use super::event::{GameEvent, Outcome};
use super::world::{GameMode, WorldState};

/// Flyers enter this far above the floor line.
pub const FLYER_ALTITUDE: f32 = 250.0;
/// Extra random distance beyond one view for story spawns.
pub const SPAWN_JITTER: f32 = 200.0;
pub const PICKUP_CHANCE: f64 = 0.3;
/// Story hazards start this far before the arena.
pub const HAZARD_LEAD: f32 = 100.0;
pub const WAVE_MESSAGE_TICKS: u32 = 120;

/// Cumulative weights for story spawns.
const STORY_SPAWNS: [(Species, f32); 6] = [
    (Species::Tiger, 0.20),
    (Species::Sabertooth, 0.40),
    (Species::Rhino, 0.60),
    (Species::Raptor, 0.80),
    (Species::Scorpion, 0.90),
    (Species::Pterodactyl, 1.00),
];

/// Cumulative weights for story pickups, with the x offset from the spawn.
const STORY_PICKUPS: [(CollectibleKind, f32, f32); 4] = [
    (CollectibleKind::PowerUp(PowerUp::Speed), 0.4, 50.0),
    (CollectibleKind::PowerUp(PowerUp::Strength), 0.7, 80.0),
    (CollectibleKind::Food, 0.9, 100.0),
    (CollectibleKind::Artifact, 1.0, 100.0),
];

const STORY_ROSTER: [(Species, f32); 10] = [
    (Species::Raptor, 500.0),
    (Species::Rhino, 900.0),
    (Species::Scorpion, 1100.0),
    (Species::Sabertooth, 1300.0),
    (Species::Raptor, 1600.0),
    (Species::Pterodactyl, 1750.0),
    (Species::Tiger, 1900.0),
    (Species::Rhino, 2300.0),
    (Species::TRex, 2500.0),
    (Species::Mammoth, 3000.0),
];

const STORY_PICKUP_LINE: [(CollectibleKind, f32); 3] = [
    (CollectibleKind::PowerUp(PowerUp::Speed), 700.0),
    (CollectibleKind::Artifact, 1400.0),
    (CollectibleKind::PowerUp(PowerUp::Strength), 2100.0),
];

pub struct Wave {
    pub enemies: &'static [Species],
    pub drops: &'static [CollectibleKind],
    pub hp_multiplier: u32,
}

pub const WAVES: [Wave; 5] = [
    Wave {
        enemies: &[Species::Raptor, Species::Raptor, Species::Tiger],
        drops: &[],
        hp_multiplier: 1,
    },
    Wave {
        enemies: &[Species::Sabertooth, Species::Sabertooth, Species::Scorpion, Species::Pterodactyl],
        drops: &[CollectibleKind::Food],
        hp_multiplier: 1,
    },
    Wave {
        enemies: &[Species::Rhino, Species::Rhino, Species::TRex],
        drops: &[CollectibleKind::PowerUp(PowerUp::Strength)],
        hp_multiplier: 1,
    },
    Wave {
        enemies: &[Species::TRex, Species::TRex, Species::Pterodactyl, Species::Pterodactyl],
        drops: &[CollectibleKind::PowerUp(PowerUp::Speed), CollectibleKind::Food],
        hp_multiplier: 1,
    },
    Wave {
        enemies: &[Species::Mammoth],
        drops: &[CollectibleKind::PowerUp(PowerUp::Strength), CollectibleKind::Food],
        hp_multiplier: rules::BOSS_RUSH_HP_MULTIPLIER,
    },
];

// ══════════════════════════════════════════════════════════════
// Placement helpers
// ══════════════════════════════════════════════════════════════

/// A creature at `x` with its species' stats; flyers start airborne.
fn make_enemy(world: &mut WorldState, species: Species, x: f32, hp_multiplier: u32) -> Enemy {
    let id = world.alloc_id();
    let stats = rules::stats(species);
    let y = if species.is_flyer() {
        rules::FLOOR_Y - FLYER_ALTITUDE
    } else {
        rules::FLOOR_Y - stats.height
    };
    Enemy::with_hp(id, species, x, y, stats.hp.saturating_mul(hp_multiplier))
}

fn place_pickup(world: &mut WorldState, kind: CollectibleKind, x: f32) {
    let id = world.alloc_id();
    world.collectibles.push(Collectible::new(id, kind, x));
}

fn pick<T: Copy, R: Rng + ?Sized>(table: &[(T, f32)], rng: &mut R) -> Option<T> {
    let roll: f32 = rng.gen();
    table.iter().find(|(_, upto)| roll < *upto).or(table.last()).map(|(v, _)| *v)
}

// ══════════════════════════════════════════════════════════════
// Session start
// ══════════════════════════════════════════════════════════════

/// Lay out the opening state for the world's mode.
pub fn seed(world: &mut WorldState) {
    match world.mode {
        GameMode::Story => seed_story(world),
        GameMode::BossRush => world.set_message("Boss rush! Survive five waves.", WAVE_MESSAGE_TICKS),
    }
}

fn seed_story(world: &mut WorldState) {
    for (species, x) in STORY_ROSTER {
        let enemy = make_enemy(world, species, x, 1);
        world.enemies.push(enemy);
    }
    for (kind, x) in STORY_PICKUP_LINE {
        place_pickup(world, kind, x);
    }
}

// ══════════════════════════════════════════════════════════════
// Per-tick director
// ══════════════════════════════════════════════════════════════

/// Run one tick of the director. Returns true if the session ended
/// (boss rush cleared).
pub fn run<R: Rng + ?Sized>(world: &mut WorldState, rng: &mut R, events: &mut Vec<GameEvent>) -> bool {
    match world.mode {
        GameMode::Story => {
            story_spawns(world, rng);
            if world.player.body.x > rules::ARENA_START_X - HAZARD_LEAD {
                drop_rocks(world, rng);
            }
            false
        }
        GameMode::BossRush => {
            if advance_waves(world, events) {
                return true;
            }
            drop_rocks(world, rng);
            false
        }
    }
}

fn story_spawns<R: Rng + ?Sized>(world: &mut WorldState, rng: &mut R) {
    world.spawn_timer += 1;
    if world.spawn_timer <= world.spawn.interval || world.enemies.len() >= world.spawn.max_enemies {
        return;
    }
    world.spawn_timer = 0;

    let spawn_x = world.player.body.x + rules::VIEW_WIDTH + rng.gen::<f32>() * SPAWN_JITTER;
    if spawn_x >= rules::ARENA_START_X {
        return;
    }

    let Some(species) = pick(&STORY_SPAWNS, rng) else { return };
    let enemy = make_enemy(world, species, spawn_x, 1);
    log::debug!("spawned {} {} at x={:.0}", species.name(), enemy.id, spawn_x);
    world.enemies.push(enemy);

    if rng.gen_bool(PICKUP_CHANCE) {
        let roll: f32 = rng.gen();
        let choice = STORY_PICKUPS.iter().find(|(_, upto, _)| roll < *upto).or(STORY_PICKUPS.last());
        if let Some(&(kind, _, offset)) = choice {
            place_pickup(world, kind, spawn_x + offset);
        }
    }
}

fn drop_rocks<R: Rng + ?Sized>(world: &mut WorldState, rng: &mut R) {
    world.hazard_timer += 1;
    if world.hazard_timer <= world.spawn.hazard_interval(world.mode) {
        return;
    }
    world.hazard_timer = 0;
    let x = world.camera.x + rng.gen::<f32>() * (rules::VIEW_WIDTH - rules::HAZARD_SIZE);
    let id = world.alloc_id();
    world.hazards.push(Hazard::new(id, x, rules::HAZARD_DROP_Y));
}

/// Boss-rush wave sequencing. Returns true when the last wave is cleared.
pub fn advance_waves(world: &mut WorldState, events: &mut Vec<GameEvent>) -> bool {
    if !world.enemies.is_empty() {
        return false;
    }
    world.wave_delay_timer += 1;
    if world.wave_delay_timer < world.spawn.wave_delay {
        return false;
    }
    world.wave_delay_timer = 0;

    let Some(wave) = WAVES.get(world.wave_index as usize) else {
        combat::end_session(world, Outcome::Victory, events);
        return true;
    };
    world.wave_index += 1;
    spawn_wave(world, wave);

    let n = world.wave_index;
    log::debug!("wave {} of {}: {} creatures", n, WAVES.len(), wave.enemies.len());
    let banner = if n as usize == WAVES.len() { format!("Final wave {n}!") } else { format!("Wave {n}!") };
    world.set_message(&banner, WAVE_MESSAGE_TICKS);
    events.push(GameEvent::WaveStarted { wave: n });
    false
}

/// Enter from the side of the arena away from the player.
fn spawn_wave(world: &mut WorldState, wave: &Wave) {
    const SPACING: f32 = 110.0;
    const MARGIN: f32 = 60.0;
    let arena = rules::RUSH_ARENA_WIDTH;
    let from_right = world.player.body.x < arena / 2.0;

    for (i, &species) in wave.enemies.iter().enumerate() {
        let width = rules::stats(species).width;
        let offset = MARGIN + i as f32 * SPACING;
        let x = if from_right { arena - offset - width } else { offset };
        let mut enemy = make_enemy(world, species, x, wave.hp_multiplier);
        enemy.facing = if from_right { Facing::Left } else { Facing::Right };
        world.enemies.push(enemy);
    }

    let center = arena / 2.0 - rules::COLLECTIBLE_SIZE / 2.0;
    for (k, &kind) in wave.drops.iter().enumerate() {
        place_pickup(world, kind, center + k as f32 * 60.0);
    }
}

/// Story: forget creatures and pickups left more than one view behind the
/// camera. The boss always stays; story mode never spawns another.
pub fn cull_behind(world: &mut WorldState) {
    if world.mode != GameMode::Story {
        return;
    }
    let limit = world.camera.x - rules::VIEW_WIDTH;
    world
        .enemies
        .retain(|e| e.species.is_boss() || e.body.x + e.body.width >= limit);
    world.collectibles.retain(|c| c.body.x + c.body.width >= limit);
}
