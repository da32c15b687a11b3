/// Entities: Player, Enemy (one closed `Species` per creature), Hazard,
/// Collectible and the purely visual Particle.
///
/// Every body is an AABB plus a velocity. Hit points are unsigned and only
/// change through `take_damage` / `heal`, so `0 <= hp <= max_hp` holds by
/// construction.

use rand::Rng;

use super::geometry::Aabb;
use super::rules;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// -1.0 for left, +1.0 for right.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Facing that points along `dx`. Zero counts as left.
    #[inline]
    pub fn toward(dx: f32) -> Facing {
        if dx > 0.0 { Facing::Right } else { Facing::Left }
    }

    pub fn flipped(self) -> Facing {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// Kinematic state shared by everything that moves and collides.
#[derive(Clone, Debug)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub vx: f32,
    pub vy: f32,
}

impl Body {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Body { x, y, width, height, vx: 0.0, vy: 0.0 }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    #[inline]
    pub fn bottom(&self) -> f32 { self.y + self.height }

    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Creature kinds. Each one has exactly one behavior in `ai::think`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Species {
    /// Fast jumper.
    Raptor,
    /// Ground default.
    Tiger,
    /// Ground patroller whose touch poisons.
    Scorpion,
    /// Pouncer.
    Sabertooth,
    /// Charger.
    Rhino,
    /// Flyer, ignores gravity unless stunned.
    Pterodactyl,
    /// Large ground default.
    TRex,
    /// Heavy. Top tier: killing it ends a story session.
    Mammoth,
}

impl Species {
    pub const ALL: [Species; 8] = [
        Species::Raptor,
        Species::Tiger,
        Species::Scorpion,
        Species::Sabertooth,
        Species::Rhino,
        Species::Pterodactyl,
        Species::TRex,
        Species::Mammoth,
    ];

    pub fn is_boss(self) -> bool {
        self == Species::Mammoth
    }

    pub fn applies_poison(self) -> bool {
        self == Species::Scorpion
    }

    pub fn is_flyer(self) -> bool {
        self == Species::Pterodactyl
    }

    pub fn name(self) -> &'static str {
        match self {
            Species::Raptor => "raptor",
            Species::Tiger => "tiger",
            Species::Scorpion => "scorpion",
            Species::Sabertooth => "sabertooth",
            Species::Rhino => "rhino",
            Species::Pterodactyl => "pterodactyl",
            Species::TRex => "t-rex",
            Species::Mammoth => "mammoth",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EffectKind {
    Speed,
    Strength,
    Poison,
}

/// A timed modifier on the player. `total` is kept so poison can count
/// whole intervals from the moment it was applied.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    pub remaining: u32,
    pub total: u32,
}

impl ActiveEffect {
    pub fn new(kind: EffectKind, duration: u32) -> Self {
        ActiveEffect { kind, remaining: duration, total: duration }
    }

    /// Ticks since the effect was (re)applied.
    pub fn elapsed(&self) -> u32 {
        self.total - self.remaining
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PowerUp {
    Speed,
    Strength,
}

impl PowerUp {
    pub fn effect(self) -> EffectKind {
        match self {
            PowerUp::Speed => EffectKind::Speed,
            PowerUp::Strength => EffectKind::Strength,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CollectibleKind {
    PowerUp(PowerUp),
    Artifact,
    Food,
}

/// Level-triggered intent flags sampled once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub block: bool,
    pub attack: bool,
}

impl FrameInput {
    /// Union of two input sources (keyboard and gamepad).
    pub fn merge(self, other: FrameInput) -> FrameInput {
        FrameInput {
            left: self.left || other.left,
            right: self.right || other.right,
            jump: self.jump || other.jump,
            block: self.block || other.block,
            attack: self.attack || other.attack,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub id: u64,
    pub body: Body,
    pub hp: u32,
    pub max_hp: u32,
    pub facing: Facing,
    pub attack_cooldown: u32,
    pub swing_timer: u32,     // >0 while the club swing is shown
    pub is_attacking: bool,
    pub is_blocking: bool,
    pub parry_timer: u32,     // remaining block window
    pub parry_cooldown: u32,  // gates re-activation, counts independently
    pub effects: Vec<ActiveEffect>,
}

impl Player {
    pub fn new(id: u64, x: f32, y: f32) -> Self {
        Player {
            id,
            body: Body::new(x, y, rules::PLAYER_WIDTH, rules::PLAYER_HEIGHT),
            hp: rules::PLAYER_MAX_HP,
            max_hp: rules::PLAYER_MAX_HP,
            facing: Facing::Right,
            attack_cooldown: 0,
            swing_timer: 0,
            is_attacking: false,
            is_blocking: false,
            parry_timer: 0,
            parry_cooldown: 0,
            effects: Vec::new(),
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb { self.body.aabb() }

    pub fn has_effect(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn effect(&self, kind: EffectKind) -> Option<&ActiveEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Grant `kind` for `duration` ticks, replacing any instance already held.
    pub fn grant_effect(&mut self, kind: EffectKind, duration: u32) {
        self.effects.retain(|e| e.kind != kind);
        self.effects.push(ActiveEffect::new(kind, duration));
    }

    /// Returns true if the player is now at 0 hp.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.hp = self.hp.saturating_sub(amount);
        self.is_dead()
    }

    pub fn heal(&mut self, amount: u32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: u64,
    pub body: Body,
    pub species: Species,
    pub hp: u32,
    pub max_hp: u32,
    pub facing: Facing,
    pub stun_timer: u32,
}

impl Enemy {
    /// A fresh creature with its species' stats, standing on the floor at `x`.
    pub fn spawn(id: u64, species: Species, x: f32) -> Self {
        let stats = rules::stats(species);
        let y = rules::FLOOR_Y - stats.height;
        Enemy::with_hp(id, species, x, y, stats.hp)
    }

    /// Same as `spawn` but with an explicit position and hit points.
    pub fn with_hp(id: u64, species: Species, x: f32, y: f32, hp: u32) -> Self {
        let stats = rules::stats(species);
        let hp = hp.max(1);
        Enemy {
            id,
            body: Body::new(x, y, stats.width, stats.height),
            species,
            hp,
            max_hp: hp,
            facing: Facing::Left,
            stun_timer: 0,
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb { self.body.aabb() }

    pub fn is_stunned(&self) -> bool {
        self.stun_timer > 0
    }

    /// Returns true if the enemy died from this hit.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.hp = self.hp.saturating_sub(amount);
        self.hp == 0
    }
}

/// Falling rock.
#[derive(Clone, Debug)]
pub struct Hazard {
    pub id: u64,
    pub body: Body,
    pub hp: u32,
}

impl Hazard {
    pub fn new(id: u64, x: f32, y: f32) -> Self {
        Hazard {
            id,
            body: Body::new(x, y, rules::HAZARD_SIZE, rules::HAZARD_SIZE),
            hp: 1,
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb { self.body.aabb() }

    pub fn destroy(&mut self) {
        self.hp = 0;
    }

    pub fn is_destroyed(&self) -> bool {
        self.hp == 0
    }
}

#[derive(Clone, Debug)]
pub struct Collectible {
    pub id: u64,
    pub body: Body,
    pub kind: CollectibleKind,
}

impl Collectible {
    /// Placed resting on the floor at `x`.
    pub fn new(id: u64, kind: CollectibleKind, x: f32) -> Self {
        let size = rules::COLLECTIBLE_SIZE;
        let lift = match kind {
            CollectibleKind::PowerUp(_) => 50.0,
            CollectibleKind::Artifact | CollectibleKind::Food => 40.0,
        };
        Collectible {
            id,
            body: Body::new(x, rules::FLOOR_Y - lift, size, size),
            kind,
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb { self.body.aabb() }
}

/// Color tag for a particle. The renderer decides what it looks like.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Spark {
    Blood,
    Smoke,
    Dust,
    Flash,
    Star,
    Haste,
    Might,
    Relic,
    Heal,
    Bruise,
    Toxin,
}

#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: f32,   // 1.0 → 0.0
    pub spark: Spark,
    pub size: f32,
}

impl Particle {
    /// Advance one tick. Returns false once the particle has faded out.
    pub fn advance(&mut self) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += rules::PARTICLE_GRAVITY;
        self.life -= rules::PARTICLE_DECAY;
        self.life > 0.0
    }
}

/// Scatter `count` particles from (x, y) in random directions.
pub fn burst<R: Rng + ?Sized>(
    particles: &mut Vec<Particle>,
    rng: &mut R,
    x: f32,
    y: f32,
    spark: Spark,
    count: usize,
) {
    particles.reserve(count);
    for _ in 0..count {
        particles.push(Particle {
            x,
            y,
            vx: (rng.gen::<f32>() - 0.5) * 10.0,
            vy: (rng.gen::<f32>() - 0.5) * 10.0,
            life: 1.0,
            spark,
            size: rng.gen::<f32>() * 5.0 + 2.0,
        });
    }
}
