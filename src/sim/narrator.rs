/// Narration: short story lines for session start, victory, defeat and
/// boss-rush waves.
///
/// The simulation never waits for a line. The game loop calls
/// `NarrationDesk::request`, which runs the narrator on a worker thread and
/// hands the text back over a channel; `poll` picks it up on a later frame
/// and the loop shows it on the message line. A narrator that fails or
/// returns nothing degrades to `PLACEHOLDER`.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::seq::SliceRandom;
use thiserror::Error;

use super::world::GameMode;

pub const PLACEHOLDER: &str = "...";

#[derive(Debug, Error)]
pub enum NarrationError {
    #[error("narrator unavailable: {0}")]
    Unavailable(String),
    #[error("narrator has nothing to say about '{0}'")]
    Empty(&'static str),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NarrationTag {
    Start(GameMode),
    Victory,
    Defeat,
    Wave(u32),
}

impl NarrationTag {
    pub fn key(self) -> &'static str {
        match self {
            NarrationTag::Start(_) => "start",
            NarrationTag::Victory => "victory",
            NarrationTag::Defeat => "defeat",
            NarrationTag::Wave(_) => "wave",
        }
    }
}

pub trait Narrator: Send + Sync {
    fn narrate(&self, tag: NarrationTag) -> Result<String, NarrationError>;
}

// ── Built-in narrator ──

const STORY_START: &[&str] = &[
    "The caveman sets out at dawn. The mammoth waits beyond the hills.",
    "Club in hand, the hunter leaves the cave. The tribe is hungry.",
];
const RUSH_START: &[&str] = &[
    "The boss battle begins. Only the strongest walk out of this valley.",
    "Five waves of beasts. One caveman. The drums are beating.",
];
const VICTORY: &[&str] = &[
    "The caveman has beaten the great mammoth with his club! The tribe will feast.",
    "Victory! Tonight the fire burns high and the stories are about you.",
];
const DEFEAT: &[&str] = &[
    "The caveman was trampled by wild beasts. Very sad.",
    "The hunt is over. The beasts keep the valley tonight.",
];
const WAVE: &[&str] = &[
    "Wave {n}! More beasts pour into the arena.",
    "Wave {n}. The ground trembles.",
];

/// Picks a canned line per tag after a fixed delay.
pub struct StaticNarrator {
    delay: Duration,
}

impl StaticNarrator {
    pub fn new(delay: Duration) -> Self {
        StaticNarrator { delay }
    }

    fn lines(tag: NarrationTag) -> &'static [&'static str] {
        match tag {
            NarrationTag::Start(GameMode::Story) => STORY_START,
            NarrationTag::Start(GameMode::BossRush) => RUSH_START,
            NarrationTag::Victory => VICTORY,
            NarrationTag::Defeat => DEFEAT,
            NarrationTag::Wave(_) => WAVE,
        }
    }
}

impl Narrator for StaticNarrator {
    fn narrate(&self, tag: NarrationTag) -> Result<String, NarrationError> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        let line = Self::lines(tag)
            .choose(&mut rand::thread_rng())
            .ok_or(NarrationError::Empty(tag.key()))?;
        Ok(match tag {
            NarrationTag::Wave(n) => line.replace("{n}", &n.to_string()),
            _ => line.to_string(),
        })
    }
}

// ── Desk: async requests, polled results ──

pub struct NarrationDesk {
    narrator: Arc<dyn Narrator>,
    tx: Sender<(u64, String)>,
    rx: Receiver<(u64, String)>,
    generation: u64,
}

impl NarrationDesk {
    pub fn new(narrator: Arc<dyn Narrator>) -> Self {
        let (tx, rx) = mpsc::channel();
        NarrationDesk { narrator, tx, rx, generation: 0 }
    }

    /// Forget lines still in flight for the previous session.
    pub fn new_session(&mut self) {
        self.generation += 1;
    }

    /// Fire and forget.
    pub fn request(&self, tag: NarrationTag) {
        let narrator = Arc::clone(&self.narrator);
        let tx = self.tx.clone();
        let generation = self.generation;
        let spawned = thread::Builder::new()
            .name("narrator".into())
            .spawn(move || {
                let text = narrate_or_placeholder(narrator.as_ref(), tag);
                // receiver gone means the game is shutting down
                let _ = tx.send((generation, text));
            });
        if let Err(e) = spawned {
            log::warn!("narrator thread failed to start: {e}");
            let _ = self.tx.send((generation, PLACEHOLDER.to_string()));
        }
    }

    /// Newest line for the current session, if one has arrived.
    pub fn poll(&self) -> Option<String> {
        let mut latest = None;
        while let Ok((generation, text)) = self.rx.try_recv() {
            if generation == self.generation {
                latest = Some(text);
            }
        }
        latest
    }
}

fn narrate_or_placeholder(narrator: &dyn Narrator, tag: NarrationTag) -> String {
    match narrator.narrate(tag) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            log::warn!("{}", NarrationError::Empty(tag.key()));
            PLACEHOLDER.to_string()
        }
        Err(e) => {
            log::warn!("narration for '{}' failed: {e}", tag.key());
            PLACEHOLDER.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    struct Offline;

    impl Narrator for Offline {
        fn narrate(&self, _tag: NarrationTag) -> Result<String, NarrationError> {
            Err(NarrationError::Unavailable("no connection".into()))
        }
    }

    struct Mute;

    impl Narrator for Mute {
        fn narrate(&self, _tag: NarrationTag) -> Result<String, NarrationError> {
            Ok("   ".into())
        }
    }

    fn wait_for(desk: &NarrationDesk) -> Option<String> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if let Some(text) = desk.poll() {
                return Some(text);
            }
            thread::sleep(Duration::from_millis(5));
        }
        None
    }

    #[test]
    fn static_narrator_covers_every_tag() {
        let n = StaticNarrator::new(Duration::ZERO);
        let tags = [
            NarrationTag::Start(GameMode::Story),
            NarrationTag::Start(GameMode::BossRush),
            NarrationTag::Victory,
            NarrationTag::Defeat,
            NarrationTag::Wave(3),
        ];
        for tag in tags {
            let text = n.narrate(tag).unwrap();
            assert!(!text.is_empty(), "{:?}", tag);
        }
        let wave = n.narrate(NarrationTag::Wave(4)).unwrap();
        assert!(wave.contains('4'));
        assert!(!wave.contains("{n}"));
    }

    #[test]
    fn desk_delivers_line() {
        let desk = NarrationDesk::new(Arc::new(StaticNarrator::new(Duration::ZERO)));
        desk.request(NarrationTag::Victory);
        let text = wait_for(&desk).unwrap();
        assert!(VICTORY.contains(&text.as_str()));
    }

    #[test]
    fn failure_becomes_placeholder() {
        let desk = NarrationDesk::new(Arc::new(Offline));
        desk.request(NarrationTag::Defeat);
        assert_eq!(wait_for(&desk).as_deref(), Some(PLACEHOLDER));

        let desk = NarrationDesk::new(Arc::new(Mute));
        desk.request(NarrationTag::Defeat);
        assert_eq!(wait_for(&desk).as_deref(), Some(PLACEHOLDER));
    }

    #[test]
    fn stale_lines_are_dropped_after_restart() {
        let mut desk = NarrationDesk::new(Arc::new(StaticNarrator::new(Duration::ZERO)));
        desk.request(NarrationTag::Defeat);
        thread::sleep(Duration::from_millis(100));
        desk.new_session();
        assert_eq!(desk.poll(), None);
    }
}
