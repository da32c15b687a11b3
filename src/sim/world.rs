/// WorldState: the complete snapshot of a running session.
///
/// ## Ownership
///
/// The game loop owns exactly one `WorldState` and hands `&mut` to `step()`
/// once per tick. Everything else (renderer, sound, narration) reads it
/// through `&WorldState` between ticks. A restart replaces it wholesale
/// via `WorldState::session()`, so nothing from the previous session can
/// leak across.
///
/// ## Camera
///
/// World coordinates are pixels: x grows right, y grows down, the floor
/// line is `rules::FLOOR_Y`. The camera is a single horizontal offset,
/// eased toward `player.x - VIEW_WIDTH / 3` and clamped to the world.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::config::SpawnConfig;
use crate::domain::entity::{Collectible, Enemy, Hazard, Particle, Player};
use crate::domain::physics::Bounds;
use crate::domain::rules;

/// Fraction of the remaining distance the camera covers each tick.
pub const CAMERA_SMOOTHING: f32 = 0.1;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Start,
    Playing,
    GameOver,
    Victory,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    Story,
    BossRush,
}

impl GameMode {
    pub fn label(self) -> &'static str {
        match self {
            GameMode::Story => "Story",
            GameMode::BossRush => "Boss Rush",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "story" => Ok(GameMode::Story),
            "boss_rush" | "boss-rush" | "bossrush" | "rush" => Ok(GameMode::BossRush),
            other => Err(format!("unknown mode '{other}' (expected story or boss_rush)")),
        }
    }
}

/// Horizontal camera offset into the world.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Camera {
    pub x: f32,
}

impl Camera {
    /// Ease toward the player and clamp to `[0, max_x]`.
    pub fn follow(&mut self, player_x: f32, max_x: Option<f32>) {
        let target = player_x - rules::VIEW_WIDTH / 3.0;
        self.x += (target - self.x) * CAMERA_SMOOTHING;
        if let Some(max_x) = max_x {
            self.x = self.x.min(max_x);
        }
        self.x = self.x.max(0.0);
    }
}

pub struct WorldState {
    // ── Entities ──
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub hazards: Vec<Hazard>,
    pub collectibles: Vec<Collectible>,
    pub particles: Vec<Particle>,

    // ── Session ──
    pub mode: GameMode,
    pub phase: Phase,
    pub paused: bool,
    pub score: u32,
    pub tick: u64,
    next_id: u64,

    // ── Spawn director ──
    pub spawn: SpawnConfig,
    pub spawn_timer: u32,
    pub hazard_timer: u32,
    /// Boss-rush: last wave spawned (0 before the first one).
    pub wave_index: u32,
    pub wave_delay_timer: u32,

    // ── Feedback ──
    pub shake: u32,
    pub flash: u32,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,

    pub camera: Camera,
}

// ── Construction ──

impl WorldState {
    /// An idle world on the start screen.
    pub fn new(spawn: SpawnConfig) -> Self {
        let mut world = WorldState::session(GameMode::Story, spawn);
        world.phase = Phase::Start;
        world
    }

    /// A fresh, empty session in `mode`, ready to be populated.
    pub fn session(mode: GameMode, spawn: SpawnConfig) -> Self {
        let player_y = rules::FLOOR_Y - rules::PLAYER_HEIGHT;
        WorldState {
            player: Player::new(0, rules::PLAYER_START_X, player_y),
            enemies: Vec::new(),
            hazards: Vec::new(),
            collectibles: Vec::new(),
            particles: Vec::new(),
            mode,
            phase: Phase::Playing,
            paused: false,
            score: 0,
            tick: 0,
            next_id: 1,
            spawn,
            spawn_timer: 0,
            hazard_timer: 0,
            wave_index: 0,
            wave_delay_timer: 0,
            shake: 0,
            flash: 0,
            message: String::new(),
            message_timer: 0,
            camera: Camera::default(),
        }
    }

    /// Unique entity id for this session. The player holds 0.
    pub fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }
}

// ── Mode-dependent geometry ──

impl WorldState {
    /// Walls for the player and creatures.
    pub fn bounds(&self) -> Bounds {
        match self.mode {
            GameMode::Story => Bounds::left_wall(),
            GameMode::BossRush => Bounds::arena(rules::RUSH_ARENA_WIDTH),
        }
    }

    /// Largest camera offset, if the world has a right edge.
    pub fn camera_limit(&self) -> Option<f32> {
        match self.mode {
            GameMode::Story => None,
            GameMode::BossRush => Some((rules::RUSH_ARENA_WIDTH - rules::VIEW_WIDTH).max(0.0)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Playing && !self.paused
    }
}
