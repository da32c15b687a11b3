/// Combat resolution: the player's club, block/parry, contact damage,
/// falling rocks, poison, pickups and the end of a session.
///
/// Every function here mutates `WorldState` in place and appends to the
/// tick's event list. Functions that can end the session return `true`
/// when they did; the caller must stop the tick right there.
///
/// ## Contact Table
/// ┌────────────────────┬──────────────┬──────────────────────────────────┐
/// │ Source             │ Player state │ Result                           │
/// ├────────────────────┼──────────────┼──────────────────────────────────┤
/// │ Creature (awake)   │ blocking     │ parry: stun + shove, +50, block  │
/// │                    │              │ spent                            │
/// │ Creature (awake)   │ open         │ -1 hp, knocked away, scorpion    │
/// │                    │              │ poisons if not already poisoned  │
/// │ Creature (stunned) │ any          │ nothing                          │
/// │ Rock               │ blocking     │ rock shattered, block spent      │
/// │ Rock               │ open         │ -1 hp, random shove              │
/// └────────────────────┴──────────────┴──────────────────────────────────┘

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::entity::{burst, CollectibleKind, EffectKind, Player, PowerUp, Spark};
use crate::domain::geometry::{overlaps, Aabb};
use crate::domain::physics;
use crate::domain::rules;
use super::event::{GameEvent, Outcome};
use super::world::{GameMode, Phase, WorldState};

/// How long a callout stays on the message line.
pub const CALLOUT_TICKS: u32 = 90;

const PARRY_CALLOUTS: [&str; 4] = ["Parry!", "Perfect timing!", "The beast is stunned!", "Blocked!"];

// ══════════════════════════════════════════════════════════════
// Player actions
// ══════════════════════════════════════════════════════════════

/// The club's reach: `ATTACK_RANGE` wide, out from the leading edge.
pub fn attack_hitbox(player: &Player) -> Aabb {
    let b = &player.body;
    let x = if player.facing.sign() > 0.0 { b.x + b.width } else { b.x - rules::ATTACK_RANGE };
    Aabb::new(x, b.y, rules::ATTACK_RANGE, b.height)
}

/// Swing once. The hitbox is tested exactly once, right now.
/// Returns true if the swing ended the session.
pub fn try_attack<R: Rng + ?Sized>(
    world: &mut WorldState,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) -> bool {
    if world.player.attack_cooldown > 0 || world.player.is_blocking {
        return false;
    }

    let hasted = world.player.has_effect(EffectKind::Speed);
    let strong = world.player.has_effect(EffectKind::Strength);
    let cooldown = rules::attack_cooldown(hasted);
    world.player.is_attacking = true;
    world.player.attack_cooldown = cooldown;
    world.player.swing_timer = cooldown / 2;
    events.push(GameEvent::Swung);

    let hitbox = attack_hitbox(&world.player);
    let damage = rules::attack_damage(strong);
    let dir = world.player.facing.sign();
    let mut boss_down = false;

    for enemy in world.enemies.iter_mut() {
        if !overlaps(hitbox, enemy.aabb()) { continue; }

        let dead = enemy.take_damage(damage);
        enemy.body.vx = dir * rules::knockback(strong);
        enemy.body.vy = rules::KNOCKBACK_LIFT;
        events.push(GameEvent::EnemyHit { id: enemy.id, damage });
        let (cx, cy) = enemy.body.center();
        burst(&mut world.particles, rng, cx, cy, Spark::Blood, 10);

        if dead {
            let score = rules::kill_score(enemy.species);
            world.score = world.score.saturating_add(score);
            events.push(GameEvent::EnemyKilled { id: enemy.id, species: enemy.species, score });
            log::debug!("{} {} killed (+{})", enemy.species.name(), enemy.id, score);
            if enemy.species.is_boss() {
                boss_down = true;
                burst(&mut world.particles, rng, cx, cy, Spark::Star, 40);
            } else {
                burst(&mut world.particles, rng, enemy.body.x, enemy.body.y, Spark::Smoke, 20);
            }
        } else if !enemy.species.is_boss() {
            enemy.body.vx += dir * rules::FLINCH;
        }
    }
    world.enemies.retain(|e| e.hp > 0);

    if boss_down && world.mode == GameMode::Story {
        end_session(world, Outcome::Victory, events);
        return true;
    }
    false
}

/// Raise the guard if it is neither active nor cooling down.
pub fn try_block(player: &mut Player) -> bool {
    if player.parry_cooldown > 0 || player.parry_timer > 0 {
        return false;
    }
    player.is_blocking = true;
    player.parry_timer = rules::PARRY_DURATION;
    player.parry_cooldown = rules::PARRY_COOLDOWN;
    true
}

/// A successful block is single use.
fn spend_block(player: &mut Player) {
    player.is_blocking = false;
    player.parry_timer = 0;
}

// ══════════════════════════════════════════════════════════════
// Hazards
// ══════════════════════════════════════════════════════════════

/// Drop every rock one tick, shatter those that reach the floor and
/// resolve rocks that hit the player. Returns true on defeat.
pub fn resolve_hazards<R: Rng + ?Sized>(
    world: &mut WorldState,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) -> bool {
    let mut dead = false;

    for hazard in world.hazards.iter_mut() {
        physics::fall(&mut hazard.body);
        if hazard.body.bottom() > rules::FLOOR_Y {
            hazard.destroy();
            let (cx, _) = hazard.body.center();
            burst(&mut world.particles, rng, cx, rules::FLOOR_Y, Spark::Dust, 5);
        }

        if dead || !overlaps(hazard.aabb(), world.player.aabb()) { continue; }
        hazard.destroy();

        let player = &mut world.player;
        if player.is_blocking {
            spend_block(player);
            world.flash = rules::FLASH_ON_BLOCK;
            let (cx, _) = player.body.center();
            burst(&mut world.particles, rng, cx, player.body.y, Spark::Flash, 10);
            events.push(GameEvent::HazardBlocked);
        } else {
            dead = player.take_damage(rules::CONTACT_DAMAGE);
            player.body.vx = (rng.gen::<f32>() - 0.5) * 2.0 * rules::HAZARD_SHOVE;
            world.shake = rules::SHAKE_ON_HIT;
            burst(&mut world.particles, rng, player.body.x, player.body.y, Spark::Bruise, 10);
            events.push(GameEvent::PlayerHurt { hp: player.hp });
        }
    }
    world.hazards.retain(|h| !h.is_destroyed());

    if dead {
        end_session(world, Outcome::Defeat, events);
    }
    dead
}

// ══════════════════════════════════════════════════════════════
// Creature contact
// ══════════════════════════════════════════════════════════════

/// Resolve body contact between the player and every awake creature.
/// Returns true on defeat.
pub fn resolve_enemy_contacts<R: Rng + ?Sized>(
    world: &mut WorldState,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) -> bool {
    for i in 0..world.enemies.len() {
        let enemy = &world.enemies[i];
        if enemy.is_stunned() || !overlaps(world.player.aabb(), enemy.aabb()) {
            continue;
        }

        if world.player.is_blocking {
            parry(world, i, rng, events);
            continue;
        }

        if take_hit(world, i, rng, events) {
            end_session(world, Outcome::Defeat, events);
            return true;
        }
    }
    false
}

fn parry<R: Rng + ?Sized>(world: &mut WorldState, i: usize, rng: &mut R, events: &mut Vec<GameEvent>) {
    let player_x = world.player.body.x;
    let enemy = &mut world.enemies[i];
    let away = if player_x < enemy.body.x { 1.0 } else { -1.0 };
    enemy.body.vx = away * rules::PARRY_KNOCKBACK;
    enemy.body.vy = rules::PARRY_LIFT;
    enemy.stun_timer = rules::STUN_DURATION;
    let id = enemy.id;
    let (ex, _) = enemy.body.center();
    let ey = enemy.body.y;

    spend_block(&mut world.player);
    world.score = world.score.saturating_add(rules::SCORE_PARRY);
    world.shake = rules::SHAKE_ON_PARRY;
    world.flash = rules::FLASH_ON_PARRY;

    let (px, py) = world.player.body.center();
    burst(&mut world.particles, rng, px, py, Spark::Flash, 40);
    burst(&mut world.particles, rng, ex, ey, Spark::Star, 15);

    let callout = PARRY_CALLOUTS.choose(rng).copied().unwrap_or("Parry!");
    world.set_message(callout, CALLOUT_TICKS);
    events.push(GameEvent::Parried { id });
}

/// Returns true if the hit was fatal.
fn take_hit<R: Rng + ?Sized>(world: &mut WorldState, i: usize, rng: &mut R, events: &mut Vec<GameEvent>) -> bool {
    let enemy_x = world.enemies[i].body.x;
    let poisons = world.enemies[i].species.applies_poison();
    let player = &mut world.player;

    player.body.vx = if player.body.x < enemy_x { -rules::HIT_KNOCKBACK } else { rules::HIT_KNOCKBACK };
    player.body.vy = rules::HIT_LIFT;
    let dead = player.take_damage(rules::CONTACT_DAMAGE);
    world.shake = rules::SHAKE_ON_HIT;
    burst(&mut world.particles, rng, player.body.x, player.body.y, Spark::Bruise, 5);
    events.push(GameEvent::PlayerHurt { hp: player.hp });

    if poisons && !dead && !player.has_effect(EffectKind::Poison) {
        player.grant_effect(EffectKind::Poison, rules::POISON_DURATION);
        let (cx, cy) = player.body.center();
        burst(&mut world.particles, rng, cx, cy, Spark::Toxin, 15);
        events.push(GameEvent::Poisoned);
    }
    dead
}

// ══════════════════════════════════════════════════════════════
// Poison
// ══════════════════════════════════════════════════════════════

/// Poison bite for this tick, if due. Call after effect timers have been
/// decremented and before expired effects are dropped. Returns true on
/// defeat.
pub fn resolve_poison<R: Rng + ?Sized>(
    world: &mut WorldState,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) -> bool {
    let due = world
        .player
        .effect(EffectKind::Poison)
        .map_or(false, |e| rules::poison_bites(e.elapsed()));
    if !due {
        return false;
    }

    let player = &mut world.player;
    let dead = player.take_damage(rules::POISON_DAMAGE);
    let (cx, cy) = player.body.center();
    burst(&mut world.particles, rng, cx, cy, Spark::Toxin, 8);
    events.push(GameEvent::PoisonTick { hp: player.hp });

    if dead {
        end_session(world, Outcome::Defeat, events);
    }
    dead
}

// ══════════════════════════════════════════════════════════════
// Pickups
// ══════════════════════════════════════════════════════════════

pub fn resolve_pickups<R: Rng + ?Sized>(
    world: &mut WorldState,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    let reach = world.player.aabb();
    let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut world.collectibles)
        .into_iter()
        .partition(|c| overlaps(reach, c.aabb()));
    world.collectibles = kept;

    for item in taken {
        collect(world, item.kind, rng);
        events.push(GameEvent::Collected { kind: item.kind });
    }
}

fn collect<R: Rng + ?Sized>(world: &mut WorldState, kind: CollectibleKind, rng: &mut R) {
    let (px, py) = (world.player.body.x, world.player.body.y);
    match kind {
        CollectibleKind::PowerUp(power) => {
            world.player.grant_effect(power.effect(), rules::POWERUP_DURATION);
            let (spark, callout) = match power {
                PowerUp::Speed => (Spark::Haste, "Lightning power! Run fast!"),
                PowerUp::Strength => (Spark::Might, "Power meat! Mighty club!"),
            };
            burst(&mut world.particles, rng, px, py, spark, 20);
            world.set_message(callout, CALLOUT_TICKS);
        }
        CollectibleKind::Artifact => {
            world.score = world.score.saturating_add(rules::SCORE_ARTIFACT);
            burst(&mut world.particles, rng, px, py, Spark::Relic, 20);
            world.set_message("Ancient treasure! Honor to the tribe!", CALLOUT_TICKS);
        }
        CollectibleKind::Food => {
            world.score = world.score.saturating_add(rules::SCORE_FOOD);
            world.player.heal(rules::FOOD_HEAL);
            burst(&mut world.particles, rng, px, py, Spark::Heal, 15);
            world.set_message("Tasty food! Strength returns!", CALLOUT_TICKS);
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Termination
// ══════════════════════════════════════════════════════════════

/// Leave `Playing` and report the outcome. A no-op once the session has
/// already ended, so the outcome is reported exactly once.
pub fn end_session(world: &mut WorldState, outcome: Outcome, events: &mut Vec<GameEvent>) {
    if world.phase != Phase::Playing {
        return;
    }
    world.phase = match outcome {
        Outcome::Victory => Phase::Victory,
        Outcome::Defeat => Phase::GameOver,
    };
    log::info!("{} session ended: {:?}, score {}", world.mode, outcome, world.score);
    events.push(GameEvent::SessionEnded { outcome, score: world.score, mode: world.mode });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::domain::entity::{Collectible, Enemy, Facing, Hazard, Species};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world(mode: GameMode) -> WorldState {
        WorldState::session(mode, GameConfig::default().spawn)
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    /// Enemy whose left edge sits `gap` px in front of the player.
    fn enemy_ahead(w: &mut WorldState, species: Species, gap: f32) -> usize {
        let id = w.alloc_id();
        let x = w.player.body.x + w.player.body.width + gap;
        w.enemies.push(Enemy::spawn(id, species, x));
        w.enemies.len() - 1
    }

    /// Enemy overlapping the player's body.
    fn enemy_touching(w: &mut WorldState, species: Species) -> usize {
        enemy_ahead(w, species, -10.0)
    }

    // ── Attack ──

    #[test]
    fn hitbox_extends_from_leading_edge() {
        let mut p = Player::new(0, 100.0, 370.0);
        assert_eq!(attack_hitbox(&p).x, 150.0);
        p.facing = Facing::Left;
        assert_eq!(attack_hitbox(&p).x, 20.0);
        assert_eq!(attack_hitbox(&p).width, rules::ATTACK_RANGE);
    }

    #[test]
    fn strength_attack_kills_one_hp_enemy_for_its_score() {
        let mut w = world(GameMode::Story);
        let mut events = vec![];
        w.collectibles.push(Collectible::new(99, CollectibleKind::PowerUp(PowerUp::Strength), w.player.body.x));
        resolve_pickups(&mut w, &mut rng(), &mut events);
        assert!(w.player.has_effect(EffectKind::Strength));

        let i = enemy_ahead(&mut w, Species::Raptor, 10.0);
        let id = w.enemies[i].id;
        let before = w.score;
        events.clear();
        assert!(!try_attack(&mut w, &mut rng(), &mut events));
        assert!(w.enemies.is_empty());
        assert_eq!(w.score - before, rules::kill_score(Species::Raptor));
        assert!(events.contains(&GameEvent::EnemyHit { id, damage: 3 }));
    }

    #[test]
    fn surviving_enemy_is_knocked_back_and_flinches() {
        let mut w = world(GameMode::Story);
        let i = enemy_ahead(&mut w, Species::Rhino, 10.0);
        let mut events = vec![];
        try_attack(&mut w, &mut rng(), &mut events);
        let e = &w.enemies[i];
        assert_eq!(e.hp, 2);
        assert_eq!(e.body.vx, rules::KNOCKBACK + rules::FLINCH);
        assert_eq!(e.body.vy, rules::KNOCKBACK_LIFT);
    }

    #[test]
    fn boss_does_not_flinch() {
        let mut w = world(GameMode::Story);
        let i = enemy_ahead(&mut w, Species::Mammoth, 10.0);
        try_attack(&mut w, &mut rng(), &mut vec![]);
        assert_eq!(w.enemies[i].body.vx, rules::KNOCKBACK);
    }

    #[test]
    fn attack_respects_cooldown_and_block() {
        let mut w = world(GameMode::Story);
        enemy_ahead(&mut w, Species::Raptor, 10.0);
        w.player.attack_cooldown = 1;
        try_attack(&mut w, &mut rng(), &mut vec![]);
        assert_eq!(w.enemies.len(), 1);

        w.player.attack_cooldown = 0;
        w.player.is_blocking = true;
        try_attack(&mut w, &mut rng(), &mut vec![]);
        assert_eq!(w.enemies.len(), 1);
        assert!(!w.player.is_attacking);
    }

    #[test]
    fn speed_halves_cooldown_and_swing() {
        let mut w = world(GameMode::Story);
        w.player.grant_effect(EffectKind::Speed, 600);
        try_attack(&mut w, &mut rng(), &mut vec![]);
        assert_eq!(w.player.attack_cooldown, 10);
        assert_eq!(w.player.swing_timer, 5);
        assert!(w.player.is_attacking);
    }

    #[test]
    fn enemy_out_of_reach_is_untouched() {
        let mut w = world(GameMode::Story);
        enemy_ahead(&mut w, Species::Raptor, rules::ATTACK_RANGE + 1.0);
        try_attack(&mut w, &mut rng(), &mut vec![]);
        assert_eq!(w.enemies[0].hp, 1);
    }

    #[test]
    fn mammoth_kill_wins_story_once() {
        let mut w = world(GameMode::Story);
        let i = enemy_ahead(&mut w, Species::Mammoth, 10.0);
        w.enemies[i].hp = 1;
        let mut events = vec![];
        assert!(try_attack(&mut w, &mut rng(), &mut events));
        assert_eq!(w.phase, Phase::Victory);
        assert_eq!(w.score, rules::SCORE_MAMMOTH);

        end_session(&mut w, Outcome::Defeat, &mut events);
        let ends = events.iter().filter(|e| matches!(e, GameEvent::SessionEnded { .. })).count();
        assert_eq!(ends, 1);
        assert_eq!(w.phase, Phase::Victory);
    }

    #[test]
    fn mammoth_kill_in_boss_rush_does_not_end_session() {
        let mut w = world(GameMode::BossRush);
        let i = enemy_ahead(&mut w, Species::Mammoth, 10.0);
        w.enemies[i].hp = 1;
        assert!(!try_attack(&mut w, &mut rng(), &mut vec![]));
        assert_eq!(w.phase, Phase::Playing);
        assert!(w.enemies.is_empty());
    }

    // ── Block / parry ──

    #[test]
    fn block_gated_by_window_and_cooldown() {
        let mut p = Player::new(0, 0.0, 0.0);
        assert!(try_block(&mut p));
        assert!(p.is_blocking);
        assert!(!try_block(&mut p));

        p.parry_timer = 0;
        p.is_blocking = false;
        assert!(!try_block(&mut p), "cooldown still running");
        p.parry_cooldown = 0;
        assert!(try_block(&mut p));
    }

    #[test]
    fn parry_negates_stuns_and_scores() {
        let mut w = world(GameMode::Story);
        let i = enemy_touching(&mut w, Species::Rhino);
        w.enemies[i].facing = Facing::Left;
        try_block(&mut w.player);
        let mut events = vec![];

        assert!(!resolve_enemy_contacts(&mut w, &mut rng(), &mut events));
        assert_eq!(w.player.hp, 5);
        assert_eq!(w.score, rules::SCORE_PARRY);
        assert_eq!(w.enemies[i].stun_timer, rules::STUN_DURATION);
        assert_eq!(w.enemies[i].body.vx, rules::PARRY_KNOCKBACK);
        assert!(!w.player.is_blocking);
        assert_eq!(w.shake, rules::SHAKE_ON_PARRY);
        assert_eq!(w.flash, rules::FLASH_ON_PARRY);
        assert!(!w.message.is_empty());
    }

    #[test]
    fn parry_is_single_use() {
        let mut w = world(GameMode::Story);
        enemy_touching(&mut w, Species::Tiger);
        enemy_touching(&mut w, Species::Raptor);
        try_block(&mut w.player);
        resolve_enemy_contacts(&mut w, &mut rng(), &mut vec![]);
        // first is parried, second lands because the block was spent
        assert_eq!(w.enemies[0].stun_timer, rules::STUN_DURATION);
        assert_eq!(w.enemies[1].stun_timer, 0);
        assert_eq!(w.player.hp, 4);
        assert!(!try_block(&mut w.player));
    }

    #[test]
    fn open_contact_hurts_and_knocks_back() {
        let mut w = world(GameMode::Story);
        enemy_touching(&mut w, Species::Tiger);
        let mut events = vec![];
        resolve_enemy_contacts(&mut w, &mut rng(), &mut events);
        assert_eq!(w.player.hp, 4);
        assert_eq!(w.player.body.vx, -rules::HIT_KNOCKBACK);
        assert_eq!(w.shake, rules::SHAKE_ON_HIT);
        assert!(events.contains(&GameEvent::PlayerHurt { hp: 4 }));
    }

    #[test]
    fn stunned_creature_is_harmless() {
        let mut w = world(GameMode::Story);
        let i = enemy_touching(&mut w, Species::Tiger);
        w.enemies[i].stun_timer = 5;
        resolve_enemy_contacts(&mut w, &mut rng(), &mut vec![]);
        assert_eq!(w.player.hp, 5);
    }

    #[test]
    fn scorpion_poisons_without_stacking() {
        let mut w = world(GameMode::Story);
        enemy_touching(&mut w, Species::Scorpion);
        let mut events = vec![];
        resolve_enemy_contacts(&mut w, &mut rng(), &mut events);
        assert!(events.contains(&GameEvent::Poisoned));
        w.player.effects[0].remaining = 100;

        events.clear();
        resolve_enemy_contacts(&mut w, &mut rng(), &mut events);
        assert!(!events.contains(&GameEvent::Poisoned));
        assert_eq!(w.player.effects.len(), 1);
        assert_eq!(w.player.effects[0].remaining, 100);
    }

    #[test]
    fn fatal_contact_ends_in_defeat() {
        let mut w = world(GameMode::Story);
        w.player.hp = 1;
        enemy_touching(&mut w, Species::Tiger);
        enemy_touching(&mut w, Species::Tiger);
        let mut events = vec![];
        assert!(resolve_enemy_contacts(&mut w, &mut rng(), &mut events));
        assert_eq!(w.phase, Phase::GameOver);
        assert_eq!(w.player.hp, 0);
        assert!(matches!(
            events.last(),
            Some(GameEvent::SessionEnded { outcome: Outcome::Defeat, .. })
        ));
    }

    // ── Hazards ──

    fn rock_on_player(w: &mut WorldState) {
        let id = w.alloc_id();
        let (x, y) = (w.player.body.x, w.player.body.y);
        w.hazards.push(Hazard::new(id, x, y));
    }

    #[test]
    fn blocked_rock_is_consumed_without_damage() {
        let mut w = world(GameMode::Story);
        rock_on_player(&mut w);
        try_block(&mut w.player);
        let mut events = vec![];
        resolve_hazards(&mut w, &mut rng(), &mut events);
        assert!(w.hazards.is_empty());
        assert_eq!(w.player.hp, 5);
        assert_eq!(w.flash, rules::FLASH_ON_BLOCK);
        assert_eq!(w.score, 0);
        assert!(!w.player.is_blocking);
        assert_eq!(events, vec![GameEvent::HazardBlocked]);
    }

    #[test]
    fn unblocked_rock_hurts() {
        let mut w = world(GameMode::Story);
        rock_on_player(&mut w);
        resolve_hazards(&mut w, &mut rng(), &mut vec![]);
        assert!(w.hazards.is_empty());
        assert_eq!(w.player.hp, 4);
        assert!(w.player.body.vx.abs() <= rules::HAZARD_SHOVE);
    }

    #[test]
    fn rock_shatters_on_floor() {
        let mut w = world(GameMode::Story);
        let id = w.alloc_id();
        w.hazards.push(Hazard::new(id, 2000.0, rules::FLOOR_Y - rules::HAZARD_SIZE));
        resolve_hazards(&mut w, &mut rng(), &mut vec![]);
        assert!(w.hazards.is_empty());
        assert!(!w.particles.is_empty());
    }

    // ── Poison ──

    #[test]
    fn poison_costs_duration_over_interval() {
        let mut w = world(GameMode::Story);
        w.player.grant_effect(EffectKind::Poison, rules::POISON_DURATION);
        let mut events = vec![];
        for _ in 0..rules::POISON_DURATION {
            for e in w.player.effects.iter_mut() { e.remaining -= 1; }
            resolve_poison(&mut w, &mut rng(), &mut events);
            w.player.effects.retain(|e| e.remaining > 0);
        }
        let lost = 5 - w.player.hp;
        assert_eq!(lost, rules::POISON_DURATION / rules::POISON_INTERVAL);
        assert!(w.player.effects.is_empty());
    }

    // ── Pickups ──

    #[test]
    fn double_speed_pickup_keeps_one_entry() {
        let mut w = world(GameMode::Story);
        let x = w.player.body.x;
        w.collectibles.push(Collectible::new(1, CollectibleKind::PowerUp(PowerUp::Speed), x));
        resolve_pickups(&mut w, &mut rng(), &mut vec![]);
        w.player.effects[0].remaining = 3;
        w.collectibles.push(Collectible::new(2, CollectibleKind::PowerUp(PowerUp::Speed), x));
        resolve_pickups(&mut w, &mut rng(), &mut vec![]);
        assert_eq!(w.player.effects.len(), 1);
        assert_eq!(w.player.effects[0].remaining, rules::POWERUP_DURATION);
    }

    #[test]
    fn artifact_adds_exact_bonus() {
        let mut w = world(GameMode::Story);
        w.score = 1234;
        let x = w.player.body.x;
        w.collectibles.push(Collectible::new(1, CollectibleKind::Artifact, x));
        resolve_pickups(&mut w, &mut rng(), &mut vec![]);
        assert_eq!(w.score, 1234 + rules::SCORE_ARTIFACT);
        assert!(w.collectibles.is_empty());
    }

    #[test]
    fn food_heals_up_to_max() {
        let mut w = world(GameMode::Story);
        let x = w.player.body.x;
        w.collectibles.push(Collectible::new(1, CollectibleKind::Food, x));
        w.collectibles.push(Collectible::new(2, CollectibleKind::Food, x));
        w.player.hp = 4;
        resolve_pickups(&mut w, &mut rng(), &mut vec![]);
        assert_eq!(w.player.hp, 5);
        assert_eq!(w.score, 2 * rules::SCORE_FOOD);
    }

    #[test]
    fn distant_collectible_stays() {
        let mut w = world(GameMode::Story);
        w.collectibles.push(Collectible::new(1, CollectibleKind::Food, 900.0));
        resolve_pickups(&mut w, &mut rng(), &mut vec![]);
        assert_eq!(w.collectibles.len(), 1);
    }
}
