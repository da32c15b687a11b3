/// Gamepad input via gilrs.
///
/// Every physical button, d-pad included, is one `Btn` slot in a flat
/// state array. Actions map to lists of buttons, configurable from the
/// `[gamepad]` table of config.toml.
///
/// ## Default Mapping
/// ┌────────────────────┬──────────────────────────────────┐
/// │ Input              │ Action                           │
/// ├────────────────────┼──────────────────────────────────┤
/// │ D-pad / left stick │ walk (up also jumps, down blocks)│
/// │ X / B              │ attack                           │
/// │ L1 / R1 / Y        │ block                            │
/// │ A                  │ jump, confirm                    │
/// │ Start              │ confirm, pause                   │
/// │ Select             │ back to title                    │
/// └────────────────────┴──────────────────────────────────┘

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::entity::FrameInput;
use super::input::Command;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    South,
    East,
    West,
    North,
    L1,
    R1,
    L2,
    R2,
    Start,
    Select,
    Up,
    Down,
    Left,
    Right,
}

impl Btn {
    const COUNT: usize = 14;

    /// Config names. Face buttons accept both the Xbox letter and the
    /// compass name.
    fn from_name(s: &str) -> Option<Btn> {
        let btn = match s.to_ascii_uppercase().as_str() {
            "A" | "SOUTH" => Btn::South,
            "B" | "EAST" => Btn::East,
            "X" | "WEST" => Btn::West,
            "Y" | "NORTH" => Btn::North,
            "L1" | "LB" => Btn::L1,
            "R1" | "RB" => Btn::R1,
            "L2" | "LT" => Btn::L2,
            "R2" | "RT" => Btn::R2,
            "START" | "MENU" => Btn::Start,
            "SELECT" | "BACK" | "VIEW" => Btn::Select,
            "UP" => Btn::Up,
            "DOWN" => Btn::Down,
            "LEFT" => Btn::Left,
            "RIGHT" => Btn::Right,
            _ => return None,
        };
        Some(btn)
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(button: Button) -> Option<Btn> {
        let btn = match button {
            Button::South => Btn::South,
            Button::East => Btn::East,
            Button::West => Btn::West,
            Button::North => Btn::North,
            Button::LeftTrigger => Btn::L1,
            Button::RightTrigger => Btn::R1,
            Button::LeftTrigger2 => Btn::L2,
            Button::RightTrigger2 => Btn::R2,
            Button::Start => Btn::Start,
            Button::Select => Btn::Select,
            Button::DPadUp => Btn::Up,
            Button::DPadDown => Btn::Down,
            Button::DPadLeft => Btn::Left,
            Button::DPadRight => Btn::Right,
            _ => return None,
        };
        Some(btn)
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    /// Went down since the last `update()`.
    fresh: bool,
}

#[derive(Debug, PartialEq)]
struct ActionMap {
    attack: Vec<Btn>,
    block: Vec<Btn>,
    jump: Vec<Btn>,
    pause: Vec<Btn>,
    confirm: Vec<Btn>,
    cancel: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            attack: vec![Btn::West, Btn::East],
            block: vec![Btn::L1, Btn::R1, Btn::North],
            jump: vec![Btn::South],
            pause: vec![Btn::Start],
            confirm: vec![Btn::Start, Btn::South],
            cancel: vec![Btn::Select],
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,
    buttons: [BtnState; Btn::COUNT],
    stick: (f32, f32),
    actions: ActionMap,
    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let gilrs = Gilrs::new()
            .map_err(|e| log::warn!("gamepad support unavailable: {e}"))
            .ok();
        #[cfg(feature = "gamepad")]
        let connected = gilrs.as_ref().map_or(false, |g| g.gamepads().next().is_some());
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs,
            buttons: [BtnState::default(); Btn::COUNT],
            stick: (0.0, 0.0),
            actions: ActionMap::default(),
            connected,
        }
    }

    /// Replace the default mapping with the configured one. Unknown names
    /// are dropped; an action left with no button keeps its default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse(action: &str, slot: &mut Vec<Btn>, names: &[String]) {
            let btns: Vec<Btn> = names.iter().filter_map(|n| Btn::from_name(n)).collect();
            if btns.is_empty() {
                log::warn!("gamepad: no usable buttons for {action} in {names:?}, keeping defaults");
            } else {
                *slot = btns;
            }
        }
        let a = &mut self.actions;
        parse("attack", &mut a.attack, &cfg.attack);
        parse("block", &mut a.block, &cfg.block);
        parse("jump", &mut a.jump, &cfg.jump);
        parse("pause", &mut a.pause, &cfg.pause);
        parse("confirm", &mut a.confirm, &cfg.confirm);
        parse("cancel", &mut a.cancel, &cfg.cancel);
    }

    /// Once per frame, before reading intents or commands.
    pub fn update(&mut self) {
        for b in &mut self.buttons {
            b.fresh = false;
        }
        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let Some(gilrs) = self.gilrs.as_mut() else { return };
        let events: Vec<EventType> = std::iter::from_fn(|| gilrs.next_event())
            .map(|e| e.event)
            .collect();

        for event in events {
            match event {
                EventType::ButtonPressed(button, _) => self.set(button, true),
                EventType::ButtonReleased(button, _) => self.set(button, false),
                EventType::AxisChanged(Axis::LeftStickX, v, _) => self.stick.0 = v,
                EventType::AxisChanged(Axis::LeftStickY, v, _) => self.stick.1 = v,
                EventType::Connected => {
                    log::info!("gamepad connected");
                    self.connected = true;
                }
                EventType::Disconnected => {
                    log::info!("gamepad disconnected");
                    self.connected = false;
                    self.release_all();
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn set(&mut self, button: Button, down: bool) {
        let Some(btn) = Btn::from_gilrs(button) else { return };
        self.connected = true;
        self.press(btn, down);
    }

    fn press(&mut self, btn: Btn, down: bool) {
        let state = &mut self.buttons[btn as usize];
        state.fresh |= down && !state.held;
        state.held = down;
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        self.buttons = [BtnState::default(); Btn::COUNT];
        self.stick = (0.0, 0.0);
    }

    fn held(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[b as usize].held)
    }

    fn fresh(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[b as usize].fresh)
    }

    /// Level-triggered intents, same contract as the keyboard's.
    pub fn frame_input(&self) -> FrameInput {
        let a = &self.actions;
        let (sx, sy) = self.stick;
        FrameInput {
            left: self.held(&[Btn::Left]) || sx < -STICK_DEADZONE,
            right: self.held(&[Btn::Right]) || sx > STICK_DEADZONE,
            jump: self.held(&a.jump) || self.held(&[Btn::Up]) || sy > STICK_DEADZONE,
            block: self.held(&a.block) || self.held(&[Btn::Down]) || sy < -STICK_DEADZONE,
            attack: self.held(&a.attack),
        }
    }

    /// Edge-triggered commands. Confirm and pause may share a button; the
    /// game loop acts on whichever fits the current phase.
    pub fn commands(&self) -> Vec<Command> {
        let a = &self.actions;
        [
            (&a.cancel, Command::ToTitle),
            (&a.confirm, Command::Confirm),
            (&a.pause, Command::TogglePause),
        ]
        .into_iter()
        .filter(|(btns, _)| self.fresh(btns))
        .map(|(_, cmd)| cmd)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn pad() -> GamepadState {
        let mut p = GamepadState::new();
        p.release_all();
        p
    }

    #[test]
    fn button_names_parse_case_insensitively() {
        assert_eq!(Btn::from_name("lb"), Some(Btn::L1));
        assert_eq!(Btn::from_name("south"), Some(Btn::South));
        assert_eq!(Btn::from_name("A"), Some(Btn::South));
        assert_eq!(Btn::from_name("Back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("turbo"), None);
    }

    #[test]
    fn config_defaults_match_builtin_map() {
        let mut p = pad();
        p.load_button_config(&GameConfig::default().gamepad);
        assert_eq!(p.actions, ActionMap::default());
    }

    #[test]
    fn unusable_list_keeps_default() {
        let mut cfg = GameConfig::default().gamepad;
        cfg.attack = vec!["turbo".into()];
        cfg.jump = vec!["B".into()];
        let mut p = pad();
        p.load_button_config(&cfg);
        assert_eq!(p.actions.attack, vec![Btn::West, Btn::East]);
        assert_eq!(p.actions.jump, vec![Btn::East]);
    }

    #[test]
    fn held_buttons_and_stick_become_intents() {
        let mut p = pad();
        p.press(Btn::West, true);
        p.stick.0 = -0.8;
        let f = p.frame_input();
        assert!(f.attack && f.left);
        assert!(!f.right && !f.block);

        p.stick.0 = 0.1;
        p.press(Btn::Down, true);
        let f = p.frame_input();
        assert!(!f.left && f.block);
    }

    #[test]
    fn start_emits_confirm_and_pause_once() {
        let mut p = pad();
        p.press(Btn::Start, true);
        assert_eq!(p.commands(), vec![Command::Confirm, Command::TogglePause]);

        p.update();
        assert!(p.commands().is_empty());
        assert!(p.held(&[Btn::Start]));
    }
}
