/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// ## Screen Layout
///
///   row 0      HUD: score, hearts, active effects, wave, mute
///   row 1      message line (callouts, wave banners, narration)
///   rows 2..   the world, one column per 10 px and one row per 25 px
///
/// The world view is 80×24 cells for the 800×600 px view. The renderer
/// only reads `WorldState`; the camera is owned by the simulation.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{CollectibleKind, EffectKind, Enemy, Player, PowerUp, Spark, Species};
use crate::domain::rules;
use crate::sim::combat::attack_hitbox;
use crate::sim::spawn::WAVES;
use crate::sim::world::{GameMode, Phase, WorldState};

/// World pixels per terminal column / row.
pub const PX_PER_COL: f32 = 10.0;
pub const PX_PER_ROW: f32 = 25.0;

const HUD_ROW: usize = 0;
const MSG_ROW: usize = 1;
const VIEW_ROW: usize = 2;
const VIEW_COLS: usize = (rules::VIEW_WIDTH / PX_PER_COL) as usize;
const VIEW_ROWS: usize = (rules::VIEW_HEIGHT / PX_PER_ROW) as usize;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells, so the
    /// gap between rows never shows the terminal's own default.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = if bg == Color::Reset { Cell::BASE_BG } else { bg };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Keep the glyph, change the background.
    fn tint(&mut self, x: usize, y: usize, bg: Color) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x].bg = bg;
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn put_centered(&mut self, y: usize, s: &str, fg: Color, bg: Color) {
        let len = s.chars().count();
        let x = VIEW_COLS.min(self.width).saturating_sub(len) / 2;
        self.put_str(x, y, s, fg, bg);
    }
}

// ── World → screen mapping ──

/// Screen cell of a world point, if it falls inside the view.
fn to_screen(wx: f32, wy: f32, cam_x: f32, shake: i32) -> Option<(usize, usize)> {
    let col = ((wx - cam_x) / PX_PER_COL).floor() as i32 + shake;
    let row = (wy / PX_PER_ROW).floor() as i32;
    if col < 0 || row < 0 || col >= VIEW_COLS as i32 || row >= VIEW_ROWS as i32 {
        return None;
    }
    Some((col as usize, VIEW_ROW + row as usize))
}

/// Cells covered by a world rectangle, clipped to the view. Every body
/// covers at least one cell.
fn cover(x: f32, y: f32, w: f32, h: f32, cam_x: f32, shake: i32) -> impl Iterator<Item = (usize, usize)> {
    let c0 = ((x - cam_x) / PX_PER_COL).floor() as i32 + shake;
    let c1 = (((x + w - cam_x) / PX_PER_COL).ceil() as i32 + shake).max(c0 + 1);
    let r0 = (y / PX_PER_ROW).floor() as i32;
    let r1 = ((y + h) / PX_PER_ROW).ceil().max(r0 as f32 + 1.0) as i32;
    (r0.max(0)..r1.min(VIEW_ROWS as i32)).flat_map(move |r| {
        (c0.max(0)..c1.min(VIEW_COLS as i32)).map(move |c| (c as usize, VIEW_ROW + r as usize))
    })
}

fn hearts(hp: u32, max_hp: u32) -> String {
    (0..max_hp).map(|i| if i < hp { '♥' } else { '♡' }).collect()
}

fn effect_tags(player: &Player) -> String {
    player
        .effects
        .iter()
        .map(|e| {
            let tag = match e.kind {
                EffectKind::Speed => "SPD",
                EffectKind::Strength => "STR",
                EffectKind::Poison => "PSN",
            };
            format!("[{} {}s]", tag, e.remaining.div_ceil(60))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn species_glyph(species: Species) -> (char, Color) {
    match species {
        Species::Raptor => ('r', Color::Green),
        Species::Tiger => ('t', Color::Rgb { r: 255, g: 150, b: 40 }),
        Species::Scorpion => ('s', Color::Magenta),
        Species::Sabertooth => ('S', Color::Rgb { r: 230, g: 200, b: 120 }),
        Species::Rhino => ('R', Color::Grey),
        Species::Pterodactyl => ('v', Color::Cyan),
        Species::TRex => ('T', Color::DarkGreen),
        Species::Mammoth => ('M', Color::Rgb { r: 160, g: 100, b: 60 }),
    }
}

fn spark_glyph(spark: Spark) -> (char, Color) {
    match spark {
        Spark::Blood => ('•', Color::Red),
        Spark::Smoke => ('░', Color::DarkGrey),
        Spark::Dust => ('.', Color::Rgb { r: 150, g: 120, b: 80 }),
        Spark::Flash => ('*', Color::White),
        Spark::Star => ('✦', Color::Yellow),
        Spark::Haste => ('·', Color::Cyan),
        Spark::Might => ('·', Color::Red),
        Spark::Relic => ('✦', Color::Rgb { r: 255, g: 215, b: 0 }),
        Spark::Heal => ('+', Color::Green),
        Spark::Bruise => ('x', Color::DarkRed),
        Spark::Toxin => ('~', Color::Magenta),
    }
}

fn collectible_glyph(kind: CollectibleKind) -> (char, Color) {
    match kind {
        CollectibleKind::PowerUp(PowerUp::Speed) => ('⚡', Color::Cyan),
        CollectibleKind::PowerUp(PowerUp::Strength) => ('♣', Color::Red),
        CollectibleKind::Artifact => ('◆', Color::Rgb { r: 255, g: 215, b: 0 }),
        CollectibleKind::Food => ('%', Color::Green),
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
    /// Terminal reports key releases.
    enhanced: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
            enhanced: false,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            let flags = KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                | KeyboardEnhancementFlags::REPORT_EVENT_TYPES;
            self.enhanced = execute!(self.writer, PushKeyboardEnhancementFlags(flags)).is_ok();
        }
        log::debug!("keyboard release events: {}", self.enhanced);

        let (tw, th) = terminal::size().unwrap_or((80, 26));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn keyboard_enhanced(&self) -> bool {
        self.enhanced
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.enhanced {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &WorldState, muted: bool) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 26));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        if self.last_phase != Some(world.phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(world.phase);
        }

        self.front.clear();
        match world.phase {
            Phase::Start => self.compose_title(world, muted),
            Phase::Playing => self.compose_game(world, muted),
            Phase::GameOver => {
                self.compose_game(world, muted);
                self.compose_game_over(world);
            }
            Phase::Victory => {
                self.compose_game(world, muted);
                self.compose_victory(world);
            }
        }
        if world.paused {
            self.compose_pause_overlay();
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Never ResetColor here: the terminal default may differ from BASE_BG.
        queue!(self.writer, SetForegroundColor(Color::White), SetBackgroundColor(Cell::BASE_BG))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_hud(&mut self, w: &WorldState, muted: bool) {
        let mut hud = format!(
            " {}  Score:{:<7} {}  {}",
            w.mode.label(),
            w.score,
            hearts(w.player.hp, w.player.max_hp),
            effect_tags(&w.player),
        );
        if w.mode == GameMode::BossRush {
            hud.push_str(&format!("  Wave {}/{}", w.wave_index, WAVES.len()));
        }
        if muted {
            hud.push_str("  [muted]");
        }
        let bar = Color::Rgb { r: 50, g: 40, b: 30 };
        for x in 0..self.front.width {
            self.front.set(x, HUD_ROW, Cell::new(' ', Color::White, bar));
        }
        self.front.put_str(0, HUD_ROW, &hud, Color::Rgb { r: 255, g: 220, b: 120 }, bar);

        if !w.message.is_empty() {
            self.front.put_str(1, MSG_ROW, &w.message, Color::Rgb { r: 255, g: 200, b: 50 }, Color::Reset);
        }
    }

    fn compose_game(&mut self, w: &WorldState, muted: bool) {
        self.compose_hud(w, muted);

        let cam_x = w.camera.x;
        let shake = if w.shake > 0 { if w.tick % 2 == 0 { 1 } else { -1 } } else { 0 };

        // Ground
        let floor_row = (rules::FLOOR_Y / PX_PER_ROW) as usize;
        let ground = Color::Rgb { r: 90, g: 65, b: 40 };
        for row in floor_row..VIEW_ROWS {
            for col in 0..VIEW_COLS {
                let ch = if row == floor_row { '▀' } else { '▓' };
                self.front.set(col, VIEW_ROW + row, Cell::new(ch, ground, Color::Reset));
            }
        }

        // Story: the arena gate
        if w.mode == GameMode::Story {
            for row in 0..floor_row {
                if let Some((c, r)) = to_screen(rules::ARENA_START_X, row as f32 * PX_PER_ROW, cam_x, shake) {
                    self.front.set(c, r, Cell::new('¦', Color::DarkGrey, Color::Reset));
                }
            }
        }

        for c in &w.collectibles {
            let (ch, fg) = collectible_glyph(c.kind);
            let b = &c.body;
            for (x, y) in cover(b.x, b.y, b.width, b.height, cam_x, shake) {
                self.front.set(x, y, Cell::new(ch, fg, Color::Reset));
            }
        }

        for h in &w.hazards {
            let b = &h.body;
            for (x, y) in cover(b.x, b.y, b.width, b.height, cam_x, shake) {
                self.front.set(x, y, Cell::new('●', Color::Grey, Color::Reset));
            }
        }

        for e in &w.enemies {
            self.compose_enemy(e, cam_x, shake);
        }

        self.compose_player(&w.player, cam_x, shake);

        for p in &w.particles {
            if let Some((x, y)) = to_screen(p.x, p.y, cam_x, shake) {
                let (ch, fg) = spark_glyph(p.spark);
                let fg = if p.life < 0.3 { Color::DarkGrey } else { fg };
                self.front.set(x, y, Cell::new(ch, fg, self.front.get(x, y).bg));
            }
        }

        if w.flash > 0 {
            let flash = Color::Rgb { r: 120, g: 120, b: 140 };
            for row in 0..VIEW_ROWS {
                for col in 0..VIEW_COLS {
                    self.front.tint(col, VIEW_ROW + row, flash);
                }
            }
        }
    }

    fn compose_enemy(&mut self, e: &Enemy, cam_x: f32, shake: i32) {
        let (ch, fg) = species_glyph(e.species);
        let b = &e.body;
        for (x, y) in cover(b.x, b.y, b.width, b.height, cam_x, shake) {
            self.front.set(x, y, Cell::new(ch, fg, Color::Reset));
        }

        // Eye on the leading edge
        let eye_x = if e.facing.sign() > 0.0 { b.x + b.width - 1.0 } else { b.x };
        if let Some((x, y)) = to_screen(eye_x, b.y, cam_x, shake) {
            self.front.set(x, y, Cell::new('o', Color::White, Color::Reset));
        }

        // Stun stars or an hp bar above the head
        if e.is_stunned() {
            if let Some((x, y)) = to_screen(b.x + b.width / 2.0, b.y - PX_PER_ROW, cam_x, shake) {
                self.front.put_str(x.saturating_sub(1), y, "***", Color::Yellow, Color::Reset);
            }
        } else if e.max_hp > 1 {
            if let Some((x, y)) = to_screen(b.x, b.y - PX_PER_ROW, cam_x, shake) {
                let cols = ((b.width / PX_PER_COL) as u32).max(1);
                let filled = (e.hp * cols).div_ceil(e.max_hp.max(1));
                for i in 0..cols {
                    let fg = if i < filled { Color::Red } else { Color::DarkGrey };
                    self.front.set(x + i as usize, y, Cell::new('▬', fg, Color::Reset));
                }
            }
        }
    }

    fn compose_player(&mut self, p: &Player, cam_x: f32, shake: i32) {
        let b = &p.body;
        let body = if p.has_effect(EffectKind::Poison) {
            Color::Magenta
        } else if p.has_effect(EffectKind::Speed) {
            Color::Cyan
        } else if p.has_effect(EffectKind::Strength) {
            Color::Red
        } else {
            Color::Rgb { r: 230, g: 180, b: 120 }
        };
        for (x, y) in cover(b.x, b.y, b.width, b.height, cam_x, shake) {
            self.front.set(x, y, Cell::new('█', body, Color::Reset));
        }
        let head_x = if p.facing.sign() > 0.0 { b.x + b.width - 1.0 } else { b.x };
        if let Some((x, y)) = to_screen(head_x, b.y, cam_x, shake) {
            self.front.set(x, y, Cell::new('☻', Color::White, Color::Reset));
        }

        if p.is_attacking {
            let hb = attack_hitbox(p);
            if let Some((x, y)) = to_screen(hb.x, hb.y + hb.height / 3.0, cam_x, shake) {
                let club = if p.facing.sign() > 0.0 { "====o" } else { "o====" };
                self.front.put_str(x, y, club, Color::Rgb { r: 160, g: 110, b: 60 }, Color::Reset);
            }
        }
        if p.is_blocking {
            let shield_x = if p.facing.sign() > 0.0 { b.x + b.width } else { b.x - PX_PER_COL };
            for (x, y) in cover(shield_x, b.y, PX_PER_COL, b.height, cam_x, shake) {
                self.front.set(x, y, Cell::new('▐', Color::Cyan, Color::Reset));
            }
        }
    }

    fn compose_title(&mut self, w: &WorldState, muted: bool) {
        let title = [
            r" __  __                            _   _     _   _             _   ",
            r"|  \/  | __ _ _ __ ___  _ __ ___ | |_| |__ | | | |_   _ _ __ | |_ ",
            r"| |\/| |/ _` | '_ ` _ \| '_ ` _ \| __| '_ \| |_| | | | | '_ \| __|",
            r"| |  | | (_| | | | | | | | | | | | |_| | | |  _  | |_| | | | | |_ ",
            r"|_|  |_|\__,_|_| |_| |_|_| |_| |_|\__|_| |_|_| |_|\__,_|_| |_|\__|",
        ];
        let gold = Color::Rgb { r: 255, g: 200, b: 50 };
        for (i, line) in title.iter().enumerate() {
            self.front.put_centered(2 + i, line, gold, Color::Reset);
        }
        self.front.put_centered(8, "A caveman, a club, and one very large mammoth.", Color::Rgb { r: 180, g: 140, b: 80 }, Color::Reset);

        let hi = Color::Rgb { r: 80, g: 255, b: 80 };
        let start = format!("ENTER   Start ({})", w.mode.label());
        self.front.put_str(10, 10, &start, hi, Color::Reset);
        self.front.put_str(10, 11, "  1     Story", Color::White, Color::Reset);
        self.front.put_str(10, 12, "  2     Boss Rush", Color::Rgb { r: 255, g: 120, b: 80 }, Color::Reset);
        let mute_line = if muted { "  M     Sound: off" } else { "  M     Sound: on" };
        self.front.put_str(10, 13, mute_line, Color::White, Color::Reset);
        self.front.put_str(10, 14, "Esc     Quit", Color::White, Color::Reset);

        let help = [
            "Controls",
            "  ←→ / AD   Walk          ↑ / W   Jump",
            "  ↓ / S     Block/parry   Space/J Club",
            "  P Pause   M Mute        Esc     Title",
        ];
        for (i, line) in help.iter().enumerate() {
            let fg = if i == 0 { gold } else { Color::White };
            self.front.put_str(10, 17 + i, line, fg, Color::Reset);
        }

        if !w.message.is_empty() {
            let row = self.front.height.saturating_sub(1);
            self.front.put_str(1, row, &w.message, gold, Color::Reset);
        }
    }

    fn compose_banner(&mut self, lines: &[&str], fg: Color) {
        let dim = Color::Rgb { r: 40, g: 30, b: 30 };
        let top = VIEW_ROW + 5;
        for (i, line) in lines.iter().enumerate() {
            self.front.put_centered(top + i, line, fg, dim);
        }
    }

    fn compose_game_over(&mut self, w: &WorldState) {
        let score = format!("  Final score: {:<8}        ", w.score);
        self.compose_banner(
            &[
                "╔══════════════════════════════╗",
                "║      THE HUNT IS OVER...     ║",
                "╚══════════════════════════════╝",
                &score,
                "  ENTER: Retry   1: Story       ",
                "  2: Boss Rush   Esc: Title     ",
            ],
            Color::Rgb { r: 255, g: 80, b: 80 },
        );
    }

    fn compose_victory(&mut self, w: &WorldState) {
        let score = format!("  Final score: {:<8}        ", w.score);
        let headline = match w.mode {
            GameMode::Story => "║   THE MAMMOTH HAS FALLEN!    ║",
            GameMode::BossRush => "║   ALL FIVE WAVES DEFEATED!   ║",
        };
        self.compose_banner(
            &[
                "╔══════════════════════════════╗",
                headline,
                "╚══════════════════════════════╝",
                &score,
                "  ENTER: Retry   1: Story       ",
                "  2: Boss Rush   Esc: Title     ",
            ],
            Color::Rgb { r: 255, g: 220, b: 50 },
        );
    }

    fn compose_pause_overlay(&mut self) {
        self.compose_banner(
            &[
                "╔══════════════════╗",
                "║      PAUSED      ║",
                "╚══════════════════╝",
                "  P: resume        ",
                "  Esc: title       ",
            ],
            Color::Rgb { r: 100, g: 200, b: 255 },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::ActiveEffect;

    #[test]
    fn world_maps_to_cells() {
        assert_eq!(to_screen(0.0, 0.0, 0.0, 0), Some((0, VIEW_ROW)));
        assert_eq!(to_screen(1015.0, 449.0, 1000.0, 0), Some((1, VIEW_ROW + 17)));
        assert_eq!(to_screen(999.0, 100.0, 1000.0, 0), None);
        assert_eq!(to_screen(100.0, -1.0, 0.0, 0), None);
        assert_eq!(to_screen(100.0, 100.0, 0.0, 1), Some((11, VIEW_ROW + 4)));
    }

    #[test]
    fn player_covers_five_by_four_cells() {
        let cells: Vec<_> = cover(50.0, 370.0, 50.0, 80.0, 0.0, 0).collect();
        assert_eq!(cells.len(), 5 * 4);
        assert!(cells.iter().all(|&(x, y)| x >= 5 && x < 10 && y >= VIEW_ROW));
    }

    #[test]
    fn cover_clips_to_view() {
        assert_eq!(cover(-500.0, 370.0, 50.0, 80.0, 0.0, 0).count(), 0);
        assert_eq!(cover(-20.0, 370.0, 50.0, 80.0, 0.0, 0).count(), 3 * 4);
        // a tiny body still shows up
        assert_eq!(cover(100.0, 100.0, 1.0, 1.0, 0.0, 0).count(), 1);
    }

    #[test]
    fn hud_pieces() {
        assert_eq!(hearts(3, 5), "♥♥♥♡♡");
        assert_eq!(hearts(0, 0), "");
        let mut p = Player::new(0, 0.0, 0.0);
        p.effects.push(ActiveEffect::new(EffectKind::Speed, 600));
        p.effects.push(ActiveEffect::new(EffectKind::Poison, 61));
        assert_eq!(effect_tags(&p), "[SPD 10s] [PSN 2s]");
    }

    #[test]
    fn framebuffer_clips_and_tints() {
        let mut fb = FrameBuffer::new(4, 2);
        fb.put_str(2, 0, "abc", Color::White, Color::Reset);
        assert_eq!(fb.get(3, 0).ch, 'b');
        assert_eq!(fb.get(2, 0).bg, Cell::BASE_BG);
        fb.tint(3, 0, Color::Red);
        assert_eq!(fb.get(3, 0).ch, 'b');
        assert_eq!(fb.get(3, 0).bg, Color::Red);
        assert_eq!(fb.get(9, 9), Cell::BLANK);
    }

    #[test]
    fn every_species_has_distinct_glyph() {
        let mut seen: Vec<char> = Species::ALL.iter().map(|&s| species_glyph(s).0).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), Species::ALL.len());
    }
}
