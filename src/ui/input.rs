/// Keyboard input tracker.
///
/// Tracks which keys are currently held down, enabling:
///   - Level-triggered intents (walk, jump, block, attack) while a key is held
///   - Edge-triggered commands (pause, mute, menu) on the initial press only
///
/// Uses crossterm's keyboard enhancement for Release events when available.
/// Falls back to timeout-based release detection on terminals that don't support it.
///
/// ## Key Map
/// ┌───────────────────┬──────────────────┐
/// │ Keys              │ Intent           │
/// ├───────────────────┼──────────────────┤
/// │ ← / A             │ walk left        │
/// │ → / D             │ walk right       │
/// │ ↑ / W             │ jump             │
/// │ ↓ / S             │ block            │
/// │ Space / J         │ attack           │
/// │ P                 │ pause (edge)     │
/// │ M                 │ mute (edge)      │
/// │ Enter             │ start / retry    │
/// │ 1                 │ start story      │
/// │ 2                 │ start boss rush  │
/// │ Esc               │ back to title    │
/// └───────────────────┴──────────────────┘

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::FrameInput;

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

const LEFT: [KeyCode; 3] = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT: [KeyCode; 3] = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const JUMP: [KeyCode; 3] = [KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const BLOCK: [KeyCode; 3] = [KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const ATTACK: [KeyCode; 3] = [KeyCode::Char(' '), KeyCode::Char('j'), KeyCode::Char('J')];
const PAUSE: [KeyCode; 2] = [KeyCode::Char('p'), KeyCode::Char('P')];
const MUTE: [KeyCode; 2] = [KeyCode::Char('m'), KeyCode::Char('M')];

/// One-shot commands outside the simulation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    /// Start a session in the mode last played (or configured).
    Confirm,
    StartStory,
    StartBossRush,
    TogglePause,
    ToggleMute,
    ToTitle,
    Quit,
}

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that transitioned from "not held" → "held" during the
    /// most recent drain_events() call.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for modifier checks.
    pub raw_events: Vec<KeyEvent>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per frame, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.record(key, Instant::now());
            }
        }

        // Expire keys that have timed out (fallback for terminals without Release)
        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    fn record(&mut self, key: KeyEvent, now: Instant) {
        self.raw_events.push(key);
        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {
                // rely on timeout-based expiry instead
            }
            _ => {
                let was_held = self.is_held(key.code);
                self.last_active.insert(key.code, now);
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    /// Is this key currently held down?
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.last_active
            .get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Was this key freshly pressed this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    /// Intent flags for this tick.
    pub fn frame_input(&self) -> FrameInput {
        FrameInput {
            left: self.any_held(&LEFT),
            right: self.any_held(&RIGHT),
            jump: self.any_held(&JUMP),
            block: self.any_held(&BLOCK),
            attack: self.any_held(&ATTACK),
        }
    }

    /// Edge-triggered commands pressed this frame, in a fixed order.
    pub fn commands(&self) -> Vec<Command> {
        let mut out = Vec::new();
        if self.ctrl_c_pressed() {
            out.push(Command::Quit);
            return out;
        }
        if self.was_pressed(KeyCode::Esc) { out.push(Command::ToTitle); }
        if self.was_pressed(KeyCode::Enter) { out.push(Command::Confirm); }
        if self.was_pressed(KeyCode::Char('1')) { out.push(Command::StartStory); }
        if self.was_pressed(KeyCode::Char('2')) { out.push(Command::StartBossRush); }
        if self.any_pressed(&PAUSE) { out.push(Command::TogglePause); }
        if self.any_pressed(&MUTE) { out.push(Command::ToggleMute); }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        let mut k = KeyEvent::new(code, KeyModifiers::NONE);
        k.kind = KeyEventKind::Release;
        k
    }

    #[test]
    fn held_keys_become_intents() {
        let mut input = InputState::new();
        let now = Instant::now();
        input.record(press(KeyCode::Char('d')), now);
        input.record(press(KeyCode::Char(' ')), now);
        let f = input.frame_input();
        assert!(f.right && f.attack);
        assert!(!f.left && !f.jump && !f.block);
    }

    #[test]
    fn repeat_is_not_a_fresh_press() {
        let mut input = InputState::new();
        input.record(press(KeyCode::Char('p')), Instant::now());
        assert_eq!(input.commands(), vec![Command::TogglePause]);

        input.fresh_presses.clear();
        input.record(press(KeyCode::Char('p')), Instant::now());
        assert!(input.commands().is_empty());
    }

    #[test]
    fn release_ignored_until_enhancement_confirmed() {
        let mut input = InputState::new();
        input.record(press(KeyCode::Left), Instant::now());
        input.record(release(KeyCode::Left), Instant::now());
        assert!(input.is_held(KeyCode::Left));

        input.honor_release = true;
        input.record(release(KeyCode::Left), Instant::now());
        assert!(!input.is_held(KeyCode::Left));
    }

    #[test]
    fn stale_press_expires() {
        let mut input = InputState::new();
        let Some(old) = Instant::now().checked_sub(HOLD_TIMEOUT * 2) else { return };
        input.record(press(KeyCode::Up), old);
        assert!(!input.frame_input().jump);
    }

    #[test]
    fn ctrl_c_quits_alone() {
        let mut input = InputState::new();
        input.record(press(KeyCode::Char('m')), Instant::now());
        input.record(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), Instant::now());
        assert_eq!(input.commands(), vec![Command::Quit]);
    }
}
