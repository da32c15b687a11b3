/// External configuration loader.
///
/// Reads `config.toml` from an explicit path, or else from the executable's
/// directory, the CWD and the usual data directories. Falls back to
/// sensible defaults if the file is missing, unreadable or incomplete; the
/// caller gets the error back so it can be logged once logging is up.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::sim::world::GameMode;

// ── Errors ──

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub session: SessionConfig,
    pub spawn: SpawnConfig,
    pub gamepad: GamepadConfig,
    pub general: GeneralConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimingConfig {
    pub tick_rate_ms: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub mode: GameMode,
    pub muted: bool,
    pub seed: Option<u64>,
    pub narration_delay_ms: u64,
    pub narration_display_ms: u64,
}

/// Spawn director tuning. All intervals are in ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnConfig {
    pub interval: u32,
    pub max_enemies: usize,
    pub hazard_interval_story: u32,
    pub hazard_interval_rush: u32,
    pub wave_delay: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GamepadConfig {
    pub attack: Vec<String>,
    pub block: Vec<String>,
    pub jump: Vec<String>,
    pub pause: Vec<String>,
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeneralConfig {
    pub log_file: Option<PathBuf>,
    pub verbose: bool,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    session: TomlSession,
    #[serde(default)]
    spawn: TomlSpawn,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlSession {
    #[serde(default)]
    mode: GameMode,
    #[serde(default)]
    muted: bool,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default = "default_narration_delay")]
    narration_delay_ms: u64,
    #[serde(default = "default_narration_display")]
    narration_display_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlSpawn {
    #[serde(default = "default_spawn_interval")]
    interval: u32,
    #[serde(default = "default_max_enemies")]
    max_enemies: usize,
    #[serde(default = "default_hazard_story")]
    hazard_interval_story: u32,
    #[serde(default = "default_hazard_rush")]
    hazard_interval_rush: u32,
    #[serde(default = "default_wave_delay")]
    wave_delay: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_attack")]
    attack: Vec<String>,
    #[serde(default = "default_block")]
    block: Vec<String>,
    #[serde(default = "default_jump")]
    jump: Vec<String>,
    #[serde(default = "default_pause")]
    pause: Vec<String>,
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    log_file: Option<String>,
    #[serde(default)]
    verbose: bool,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 16 }           // ~60 ticks per second
fn default_narration_delay() -> u64 { 200 }
fn default_narration_display() -> u64 { 5000 }
fn default_spawn_interval() -> u32 { 120 }
fn default_max_enemies() -> usize { 15 }
fn default_hazard_story() -> u32 { 60 }
fn default_hazard_rush() -> u32 { 120 }
fn default_wave_delay() -> u32 { 180 }

fn default_attack() -> Vec<String> { vec!["X".into(), "B".into()] }
fn default_block() -> Vec<String> { vec!["L1".into(), "R1".into(), "Y".into()] }
fn default_jump() -> Vec<String> { vec!["A".into()] }
fn default_pause() -> Vec<String> { vec!["Start".into()] }
fn default_confirm() -> Vec<String> { vec!["Start".into(), "A".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming { tick_rate_ms: default_tick_rate() }
    }
}

impl Default for TomlSession {
    fn default() -> Self {
        TomlSession {
            mode: GameMode::default(),
            muted: false,
            seed: None,
            narration_delay_ms: default_narration_delay(),
            narration_display_ms: default_narration_display(),
        }
    }
}

impl Default for TomlSpawn {
    fn default() -> Self {
        TomlSpawn {
            interval: default_spawn_interval(),
            max_enemies: default_max_enemies(),
            hazard_interval_story: default_hazard_story(),
            hazard_interval_rush: default_hazard_rush(),
            wave_delay: default_wave_delay(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            attack: default_attack(),
            block: default_block(),
            jump: default_jump(),
            pause: default_pause(),
            confirm: default_confirm(),
            cancel: default_cancel(),
        }
    }
}

impl From<TomlConfig> for GameConfig {
    fn from(t: TomlConfig) -> Self {
        GameConfig {
            timing: TimingConfig {
                tick_rate_ms: t.timing.tick_rate_ms.max(1),
            },
            session: SessionConfig {
                mode: t.session.mode,
                muted: t.session.muted,
                seed: t.session.seed,
                narration_delay_ms: t.session.narration_delay_ms,
                narration_display_ms: t.session.narration_display_ms,
            },
            spawn: SpawnConfig {
                interval: t.spawn.interval,
                max_enemies: t.spawn.max_enemies,
                hazard_interval_story: t.spawn.hazard_interval_story,
                hazard_interval_rush: t.spawn.hazard_interval_rush,
                wave_delay: t.spawn.wave_delay,
            },
            gamepad: GamepadConfig {
                attack: t.gamepad.attack,
                block: t.gamepad.block,
                jump: t.gamepad.jump,
                pause: t.gamepad.pause,
                confirm: t.gamepad.confirm,
                cancel: t.gamepad.cancel,
            },
            general: GeneralConfig {
                log_file: t.general.log_file.map(PathBuf::from),
                verbose: t.general.verbose,
            },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

impl SpawnConfig {
    /// Hazard interval for the given mode.
    pub fn hazard_interval(&self, mode: GameMode) -> u32 {
        match mode {
            GameMode::Story => self.hazard_interval_story,
            GameMode::BossRush => self.hazard_interval_rush,
        }
    }
}

// ── Loading ──

impl GameConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: TomlConfig = toml::from_str(text)?;
        Ok(cfg.into())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load `config.toml`: the explicit path if given, else the first one
    /// found in `candidate_dirs()`. Missing file means defaults with no
    /// error; a broken file means defaults plus the error.
    pub fn load(explicit: Option<&Path>) -> (Self, Option<ConfigError>) {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => candidate_dirs()
                .into_iter()
                .map(|d| d.join("config.toml"))
                .find(|p| p.exists()),
        };
        match path {
            Some(p) => match Self::from_file(&p) {
                Ok(cfg) => (cfg, None),
                Err(e) => (Self::default(), Some(e)),
            },
            None => (Self::default(), None),
        }
    }

    /// Ticks a narration line stays on screen.
    pub fn narration_display_ticks(&self) -> u32 {
        let ticks = self.session.narration_display_ms / self.timing.tick_rate_ms.max(1);
        u32::try_from(ticks).unwrap_or(u32::MAX)
    }
}

/// Candidate directories to search: exe dir + CWD + data dirs (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG config home (~/.config/mammoth-hunt)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".config/mammoth-hunt");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory
    let sys = PathBuf::from("/usr/share/mammoth-hunt");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.timing.tick_rate_ms, 16);
        assert_eq!(cfg.spawn.max_enemies, 15);
        assert_eq!(cfg.session.mode, GameMode::Story);
        assert_eq!(cfg.gamepad.attack, vec!["X".to_string(), "B".to_string()]);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::from_toml_str(
            "[session]\nmode = \"boss_rush\"\nseed = 42\n\n[spawn]\nwave_delay = 30\n",
        )
        .unwrap();
        assert_eq!(cfg.session.mode, GameMode::BossRush);
        assert_eq!(cfg.session.seed, Some(42));
        assert_eq!(cfg.spawn.wave_delay, 30);
        assert_eq!(cfg.spawn.interval, 120);
        assert_eq!(cfg.session.narration_delay_ms, 200);
    }

    #[test]
    fn unknown_mode_is_a_parse_error() {
        let err = GameConfig::from_toml_str("[session]\nmode = \"arcade\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_explicit_file_falls_back_with_error() {
        let (cfg, err) = GameConfig::load(Some(Path::new("/nonexistent/mammoth/config.toml")));
        assert_eq!(cfg, GameConfig::default());
        assert!(matches!(err, Some(ConfigError::Read { .. })));
    }

    #[test]
    fn zero_tick_rate_is_clamped() {
        let cfg = GameConfig::from_toml_str("[timing]\ntick_rate_ms = 0\n").unwrap();
        assert_eq!(cfg.timing.tick_rate_ms, 1);
    }

    #[test]
    fn narration_display_converts_to_ticks() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.narration_display_ticks(), 5000 / 16);
    }

    #[test]
    fn hazard_interval_by_mode() {
        let spawn = GameConfig::default().spawn;
        assert_eq!(spawn.hazard_interval(GameMode::Story), 60);
        assert_eq!(spawn.hazard_interval(GameMode::BossRush), 120);
    }
}
