/// Entry point and game loop.
///
/// The loop runs at terminal frame rate and advances the simulation on a
/// fixed tick (`timing.tick_rate_ms`). Per frame:
///   1. drain keyboard / gamepad, turn edge presses into `Command`s
///   2. apply commands (start, pause, mute, title, quit)
///   3. pick up finished narration lines
///   4. on tick: merge held intents, `step()`, play cues, request narration
///   5. render

mod config;
mod domain;
mod logging;
mod sim;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use config::GameConfig;
use sim::event::{GameEvent, Outcome};
use sim::narrator::{NarrationDesk, NarrationTag, StaticNarrator};
use sim::step;
use sim::world::{GameMode, Phase, WorldState};
use ui::gamepad::GamepadState;
use ui::input::{Command, InputState};
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

/// Hunt the mammoth in your terminal
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Skip the title screen and start in this mode (story, boss_rush)
    #[arg(long)]
    mode: Option<GameMode>,

    /// Seed for the spawn director
    #[arg(long)]
    seed: Option<u64>,

    /// Start with sound off
    #[arg(long)]
    mute: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Everything the loop owns besides the world itself.
struct Session {
    config: GameConfig,
    rng: SmallRng,
    desk: NarrationDesk,
    sound: Option<SoundEngine>,
    muted: bool,
}

fn main() {
    let cli = Cli::parse();

    let (mut config, config_err) = GameConfig::load(cli.config.as_deref());
    if let Some(mode) = cli.mode {
        config.session.mode = mode;
    }
    if cli.seed.is_some() {
        config.session.seed = cli.seed;
    }
    config.general.verbose |= cli.verbose;
    config.session.muted |= cli.mute;

    if let Err(e) = logging::init(config.general.verbose, config.general.log_file.as_deref()) {
        eprintln!("Log file unavailable: {e}");
    }
    if let Some(e) = config_err {
        log::warn!("using default settings: {e}");
    }

    let rng = match config.session.seed {
        Some(seed) => {
            log::info!("spawn seed {seed}");
            SmallRng::seed_from_u64(seed)
        }
        None => SmallRng::from_entropy(),
    };

    let narrator = StaticNarrator::new(Duration::from_millis(config.session.narration_delay_ms));
    let mut session = Session {
        rng,
        desk: NarrationDesk::new(Arc::new(narrator)),
        sound: SoundEngine::new(),
        muted: config.session.muted,
        config,
    };

    let mode = session.config.session.mode;
    let mut world = WorldState::new(session.config.spawn.clone());
    world.mode = mode;
    if cli.mode.is_some() {
        begin(&mut world, &mut session, mode);
    }

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut world, &mut renderer, &mut session);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        log::error!("game loop aborted: {e}");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for hunting!");
    println!("Final Score: {}", world.score);
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    session: &mut Session,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    kb.honor_release = renderer.keyboard_enhanced();
    let mut gp = GamepadState::new();
    gp.load_button_config(&session.config.gamepad);

    let tick_rate = Duration::from_millis(session.config.timing.tick_rate_ms.max(1));
    let mut last_tick = Instant::now();

    loop {
        kb.drain_events();
        gp.update();

        let mut commands = kb.commands();
        commands.extend(gp.commands());
        if handle_commands(world, session, &commands) {
            break;
        }

        if let Some(text) = session.desk.poll() {
            let ticks = session.config.narration_display_ticks();
            world.set_message(&text, ticks);
        }

        if last_tick.elapsed() >= tick_rate {
            if world.is_running() {
                let input = kb.frame_input().merge(gp.frame_input());
                let events = step::step(world, input, &mut session.rng);
                if !session.muted {
                    if let Some(sfx) = &session.sound {
                        sfx.play_events(&events);
                    }
                }
                narrate_events(&session.desk, &events);
            }
            last_tick = Instant::now();
        }

        renderer.render(world, session.muted)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Apply this frame's commands. Returns true when the game should exit.
///
/// Commands are judged against the phase at the start of the frame, so a
/// button bound to both confirm and pause cannot start a session and pause
/// it in one press.
fn handle_commands(world: &mut WorldState, session: &mut Session, commands: &[Command]) -> bool {
    let phase = world.phase;
    let mode = world.mode;
    let in_session = phase == Phase::Playing;

    for &cmd in commands {
        match cmd {
            Command::Quit => return true,
            Command::ToggleMute => {
                session.muted = !session.muted;
                log::debug!("muted: {}", session.muted);
            }
            Command::TogglePause if in_session => step::toggle_pause(world),
            Command::ToTitle if phase == Phase::Start => return true,
            Command::ToTitle => {
                return_to_title(world, session);
                return false;
            }
            Command::Confirm if !in_session => {
                begin(world, session, mode);
                return false;
            }
            Command::StartStory if !in_session => {
                begin(world, session, GameMode::Story);
                return false;
            }
            Command::StartBossRush if !in_session => {
                begin(world, session, GameMode::BossRush);
                return false;
            }
            _ => {}
        }
    }
    false
}

/// Replace the world with a fresh session. Nothing carries over.
fn begin(world: &mut WorldState, session: &mut Session, mode: GameMode) {
    session.desk.new_session();
    *world = step::start_session(mode, session.config.spawn.clone());
    session.desk.request(NarrationTag::Start(mode));
}

/// Back to the start screen, keeping the last mode selected.
fn return_to_title(world: &mut WorldState, session: &mut Session) {
    session.desk.new_session();
    let mode = world.mode;
    *world = WorldState::new(session.config.spawn.clone());
    world.mode = mode;
    log::info!("returned to title");
}

fn narrate_events(desk: &NarrationDesk, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::WaveStarted { wave } => desk.request(NarrationTag::Wave(*wave)),
            GameEvent::SessionEnded { outcome, .. } => {
                let tag = match outcome {
                    Outcome::Victory => NarrationTag::Victory,
                    Outcome::Defeat => NarrationTag::Defeat,
                };
                desk.request(tag);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::narrator::{NarrationError, Narrator};

    struct Silent;

    impl Narrator for Silent {
        fn narrate(&self, _tag: NarrationTag) -> Result<String, NarrationError> {
            Err(NarrationError::Unavailable("test".into()))
        }
    }

    fn session() -> Session {
        Session {
            config: GameConfig::default(),
            rng: SmallRng::seed_from_u64(1),
            desk: NarrationDesk::new(Arc::new(Silent)),
            sound: None,
            muted: false,
        }
    }

    fn title(s: &Session) -> WorldState {
        WorldState::new(s.config.spawn.clone())
    }

    #[test]
    fn confirm_starts_the_selected_mode() {
        let mut s = session();
        let mut w = title(&s);
        w.mode = GameMode::BossRush;
        assert!(!handle_commands(&mut w, &mut s, &[Command::Confirm]));
        assert_eq!(w.phase, Phase::Playing);
        assert_eq!(w.mode, GameMode::BossRush);
    }

    #[test]
    fn shared_start_button_does_not_pause_new_session() {
        let mut s = session();
        let mut w = title(&s);
        handle_commands(&mut w, &mut s, &[Command::Confirm, Command::TogglePause]);
        assert_eq!(w.phase, Phase::Playing);
        assert!(!w.paused);

        handle_commands(&mut w, &mut s, &[Command::Confirm, Command::TogglePause]);
        assert!(w.paused);
    }

    #[test]
    fn start_keys_are_ignored_mid_session() {
        let mut s = session();
        let mut w = title(&s);
        handle_commands(&mut w, &mut s, &[Command::StartStory]);
        w.score = 40;
        handle_commands(&mut w, &mut s, &[Command::StartBossRush, Command::Confirm]);
        assert_eq!(w.mode, GameMode::Story);
        assert_eq!(w.score, 40);
    }

    #[test]
    fn restart_after_game_over_is_fresh() {
        let mut s = session();
        let mut w = title(&s);
        handle_commands(&mut w, &mut s, &[Command::StartStory]);
        w.score = 900;
        w.phase = Phase::GameOver;
        handle_commands(&mut w, &mut s, &[Command::StartBossRush]);
        assert_eq!(w.phase, Phase::Playing);
        assert_eq!(w.mode, GameMode::BossRush);
        assert_eq!(w.score, 0);
    }

    #[test]
    fn escape_goes_to_title_then_quits() {
        let mut s = session();
        let mut w = title(&s);
        handle_commands(&mut w, &mut s, &[Command::StartBossRush]);
        assert!(!handle_commands(&mut w, &mut s, &[Command::ToTitle]));
        assert_eq!(w.phase, Phase::Start);
        assert_eq!(w.mode, GameMode::BossRush);
        assert!(handle_commands(&mut w, &mut s, &[Command::ToTitle]));
    }

    #[test]
    fn mute_toggles_in_any_phase() {
        let mut s = session();
        let mut w = title(&s);
        handle_commands(&mut w, &mut s, &[Command::ToggleMute]);
        assert!(s.muted);
        assert!(handle_commands(&mut w, &mut s, &[Command::ToggleMute, Command::Quit]));
        assert!(!s.muted);
    }
}
