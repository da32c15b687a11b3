/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound, narration and menus.

use crate::domain::entity::{CollectibleKind, Species};
use super::world::GameMode;

/// One-shot audio cue tags.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AudioCue {
    Jump,
    Attack,
    Hit,
    Block,
    PowerUp,
    Damage,
    Victory,
    Collect,
    Poison,
}

impl AudioCue {
    pub const ALL: [AudioCue; 9] = [
        AudioCue::Jump,
        AudioCue::Attack,
        AudioCue::Hit,
        AudioCue::Block,
        AudioCue::PowerUp,
        AudioCue::Damage,
        AudioCue::Victory,
        AudioCue::Collect,
        AudioCue::Poison,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            AudioCue::Jump => "jump",
            AudioCue::Attack => "attack",
            AudioCue::Hit => "hit",
            AudioCue::Block => "block",
            AudioCue::PowerUp => "powerup",
            AudioCue::Damage => "damage",
            AudioCue::Victory => "victory",
            AudioCue::Collect => "collect",
            AudioCue::Poison => "poison",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Victory,
    Defeat,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Jumped,
    Swung,
    EnemyHit { id: u64, damage: u32 },
    EnemyKilled { id: u64, species: Species, score: u32 },
    Parried { id: u64 },
    HazardBlocked,
    PlayerHurt { hp: u32 },
    Poisoned,
    PoisonTick { hp: u32 },
    Collected { kind: CollectibleKind },
    WaveStarted { wave: u32 },
    /// Emitted exactly once per session.
    SessionEnded { outcome: Outcome, score: u32, mode: GameMode },
}

impl GameEvent {
    /// The audio cue this event triggers, if any.
    pub fn cue(&self) -> Option<AudioCue> {
        match self {
            GameEvent::Jumped => Some(AudioCue::Jump),
            GameEvent::Swung => Some(AudioCue::Attack),
            GameEvent::EnemyHit { .. } => Some(AudioCue::Hit),
            GameEvent::EnemyKilled { .. } => None,
            GameEvent::Parried { .. } | GameEvent::HazardBlocked => Some(AudioCue::Block),
            GameEvent::PlayerHurt { .. } | GameEvent::PoisonTick { .. } => Some(AudioCue::Damage),
            GameEvent::Poisoned => Some(AudioCue::Poison),
            GameEvent::Collected { kind: CollectibleKind::PowerUp(_) } => Some(AudioCue::PowerUp),
            GameEvent::Collected { .. } => Some(AudioCue::Collect),
            GameEvent::WaveStarted { .. } => None,
            GameEvent::SessionEnded { outcome: Outcome::Victory, .. } => Some(AudioCue::Victory),
            GameEvent::SessionEnded { outcome: Outcome::Defeat, .. } => None,
        }
    }
}
