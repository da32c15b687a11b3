/// Game rules: species stats, scoring, damage and timing constants.
///
/// Pure data and pure functions. Nothing here mutates world state.
///
/// ## Species Table
/// ┌─────────────┬──────────┬────┬───────┬───────────────────────┐
/// │ Species     │ Size     │ HP │ Score │ Notes                 │
/// ├─────────────┼──────────┼────┼───────┼───────────────────────┤
/// │ Raptor      │ 50×50    │ 1  │ 100   │                       │
/// │ Tiger       │ 80×70    │ 1  │ 100   │                       │
/// │ Scorpion    │ 50×40    │ 1  │ 100   │ touch poisons         │
/// │ Sabertooth  │ 90×80    │ 2  │ 200   │                       │
/// │ Rhino       │ 90×60    │ 3  │ 200   │                       │
/// │ Pterodactyl │ 70×50    │ 1  │ 200   │ flies                 │
/// │ T-Rex       │ 100×100  │ 2  │ 300   │                       │
/// │ Mammoth     │ 150×120  │ 3  │ 5000  │ boss, never flinches  │
/// └─────────────┴──────────┴────┴───────┴───────────────────────┘
///
/// ## Score Events
/// ┌──────────────────────┬────────┐
/// │ Event                │ Points │
/// ├──────────────────────┼────────┤
/// │ Kill                 │ table  │
/// │ Parry a creature     │ 50     │
/// │ Artifact pickup      │ 500    │
/// │ Food pickup          │ 50     │
/// └──────────────────────┴────────┘

use super::entity::Species;

// ── World geometry ──

pub const FLOOR_Y: f32 = 450.0;
pub const VIEW_WIDTH: f32 = 800.0;
pub const VIEW_HEIGHT: f32 = 600.0;
/// Story mode: where the boss arena begins.
pub const ARENA_START_X: f32 = 2600.0;
/// Boss-rush mode: the whole arena, walled on both sides.
pub const RUSH_ARENA_WIDTH: f32 = VIEW_WIDTH * 2.0;

// ── Motion ──

pub const GRAVITY: f32 = 0.6;
pub const FRICTION: f32 = 0.8;
/// Horizontal velocity added per tick while a direction is held.
pub const MOVE_ACCEL: f32 = 1.0;
pub const JUMP_FORCE: f32 = -14.0;
/// Creatures farther than this from the player do not think.
pub const AWARENESS_RANGE: f32 = 600.0;

// ── Bodies ──

pub const PLAYER_WIDTH: f32 = 50.0;
pub const PLAYER_HEIGHT: f32 = 80.0;
pub const PLAYER_START_X: f32 = 50.0;
pub const PLAYER_MAX_HP: u32 = 5;
pub const HAZARD_SIZE: f32 = 40.0;
pub const HAZARD_DROP_Y: f32 = -50.0;
pub const COLLECTIBLE_SIZE: f32 = 40.0;

// ── Player attack ──

pub const ATTACK_RANGE: f32 = 80.0;
pub const ATTACK_COOLDOWN: u32 = 20;
pub const ATTACK_COOLDOWN_HASTED: u32 = 10;
pub const BASE_DAMAGE: u32 = 1;
pub const STRENGTH_DAMAGE: u32 = 3;
pub const KNOCKBACK: f32 = 10.0;
pub const KNOCKBACK_STRONG: f32 = 15.0;
pub const KNOCKBACK_LIFT: f32 = -5.0;
/// Extra shove for non-boss creatures that survive a hit.
pub const FLINCH: f32 = 5.0;

// ── Block / parry ──

pub const PARRY_DURATION: u32 = 20;
pub const PARRY_COOLDOWN: u32 = 60;
pub const STUN_DURATION: u32 = 120;
pub const PARRY_KNOCKBACK: f32 = 20.0;
pub const PARRY_LIFT: f32 = -8.0;

// ── Player taking a hit ──

pub const CONTACT_DAMAGE: u32 = 1;
pub const HIT_KNOCKBACK: f32 = 10.0;
pub const HIT_LIFT: f32 = -5.0;
/// Hazards shove the player sideways by up to ±this much.
pub const HAZARD_SHOVE: f32 = 10.0;

// ── Effects ──

pub const POWERUP_DURATION: u32 = 600;
pub const POISON_DURATION: u32 = 180;
pub const POISON_INTERVAL: u32 = 60;
pub const POISON_DAMAGE: u32 = 1;
pub const SPEED_MULTIPLIER: f32 = 1.8;

// ── Scoring ──

pub const SCORE_KILL_SMALL: u32 = 100;
pub const SCORE_KILL_MEDIUM: u32 = 200;
pub const SCORE_KILL_LARGE: u32 = 300;
pub const SCORE_MAMMOTH: u32 = 5000;
pub const SCORE_PARRY: u32 = 50;
pub const SCORE_ARTIFACT: u32 = 500;
pub const SCORE_FOOD: u32 = 50;
pub const FOOD_HEAL: u32 = 1;

// ── Feedback timers ──

pub const SHAKE_ON_HIT: u32 = 10;
pub const SHAKE_ON_PARRY: u32 = 15;
pub const FLASH_ON_PARRY: u32 = 10;
pub const FLASH_ON_BLOCK: u32 = 5;

// ── Particles ──

pub const PARTICLE_GRAVITY: f32 = 0.1;
pub const PARTICLE_DECAY: f32 = 0.02;

// ── Boss rush ──

pub const BOSS_RUSH_HP_MULTIPLIER: u32 = 5;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SpeciesStats {
    pub width: f32,
    pub height: f32,
    pub hp: u32,
    pub score: u32,
}

pub fn stats(species: Species) -> SpeciesStats {
    let (width, height, hp, score) = match species {
        Species::Raptor => (50.0, 50.0, 1, SCORE_KILL_SMALL),
        Species::Tiger => (80.0, 70.0, 1, SCORE_KILL_SMALL),
        Species::Scorpion => (50.0, 40.0, 1, SCORE_KILL_SMALL),
        Species::Sabertooth => (90.0, 80.0, 2, SCORE_KILL_MEDIUM),
        Species::Rhino => (90.0, 60.0, 3, SCORE_KILL_MEDIUM),
        Species::Pterodactyl => (70.0, 50.0, 1, SCORE_KILL_MEDIUM),
        Species::TRex => (100.0, 100.0, 2, SCORE_KILL_LARGE),
        Species::Mammoth => (150.0, 120.0, 3, SCORE_MAMMOTH),
    };
    SpeciesStats { width, height, hp, score }
}

pub fn kill_score(species: Species) -> u32 {
    stats(species).score
}

pub fn attack_damage(strength: bool) -> u32 {
    if strength { STRENGTH_DAMAGE } else { BASE_DAMAGE }
}

pub fn attack_cooldown(hasted: bool) -> u32 {
    if hasted { ATTACK_COOLDOWN_HASTED } else { ATTACK_COOLDOWN }
}

pub fn knockback(strength: bool) -> f32 {
    if strength { KNOCKBACK_STRONG } else { KNOCKBACK }
}

/// Should poison with `elapsed` ticks on the clock bite this tick?
/// Bites once per full interval since application, never at tick 0.
pub fn poison_bites(elapsed: u32) -> bool {
    elapsed > 0 && elapsed % POISON_INTERVAL == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kill_scores_by_tier() {
        assert_eq!(kill_score(Species::Raptor), 100);
        assert_eq!(kill_score(Species::Tiger), 100);
        assert_eq!(kill_score(Species::Scorpion), 100);
        assert_eq!(kill_score(Species::Sabertooth), 200);
        assert_eq!(kill_score(Species::Rhino), 200);
        assert_eq!(kill_score(Species::Pterodactyl), 200);
        assert_eq!(kill_score(Species::TRex), 300);
        assert_eq!(kill_score(Species::Mammoth), 5000);
    }

    #[test]
    fn every_species_has_positive_size_and_hp() {
        for s in Species::ALL {
            let st = stats(s);
            assert!(st.width > 0.0 && st.height > 0.0, "{:?}", s);
            assert!(st.hp > 0, "{:?}", s);
        }
    }

    #[test]
    fn strength_and_speed_modifiers() {
        assert_eq!(attack_damage(false), 1);
        assert_eq!(attack_damage(true), 3);
        assert_eq!(attack_cooldown(false), 20);
        assert_eq!(attack_cooldown(true), 10);
        assert!(knockback(true) > knockback(false));
    }

    #[test]
    fn poison_bite_count_is_integer_division() {
        for duration in [60, 150, 300, 359, 360] {
            let bites = (1..=duration).filter(|&e| poison_bites(e)).count() as u32;
            assert_eq!(bites, duration / POISON_INTERVAL, "duration {}", duration);
        }
    }
}
