/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The board is drawn at a fixed origin so pointer hit-testing
/// (`grid_cell_at`) needs no renderer state.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::direction::Coord;
use crate::sim::game::Phase;
use crate::sim::ranking::MAX_NAME_LEN;
use crate::sim::selection::SelectionMode;
use crate::sim::session::Session;
use crate::sim::world::{Screen, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells, so the
    /// gaps between rows match the cell color on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    /// Normalize bg: Color::Reset → BASE_BG so every cell gets an explicit
    /// background color (never terminal-default).
    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn from_char(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg: Self::norm_bg(bg) }
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

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width {
                break;
            }
            self.set(x + i, y, Cell::from_char(ch, fg, bg));
        }
    }

    /// Paint a whole row with `bg`, then the text from column 0.
    fn put_bar(&mut self, y: usize, s: &str, fg: Color, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::from_char(' ', fg, bg));
        }
        self.put_str(0, y, s, fg, bg);
    }
}

// ── Layout ──

/// Each letter takes 2 terminal columns: the letter and a gap.
pub const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
pub const GRID_ROW: usize = 2;
pub const GRID_COL: usize = 2;

/// Gap between the board and the word list.
const LIST_GAP: usize = 4;

// ── Palette ──

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const BOARD_BG: Color = Color::Rgb { r: 32, g: 32, b: 52 };
const FOUND_BG: Color = Color::Rgb { r: 70, g: 190, b: 110 };
const PREVIEW_BG: Color = Color::Rgb { r: 255, g: 215, b: 80 };
const ANCHOR_BG: Color = Color::Rgb { r: 255, g: 140, b: 40 };
const HOVER_BG: Color = Color::Rgb { r: 70, g: 70, b: 110 };
const MISSED_FG: Color = Color::Rgb { r: 255, g: 90, b: 90 };
const GOLD: Color = Color::Rgb { r: 255, g: 200, b: 50 };
const GREEN: Color = Color::Rgb { r: 80, g: 255, b: 80 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };

/// Board cell under terminal position (x, y), if any.
pub fn grid_cell_at(x: u16, y: u16, size: usize) -> Option<Coord> {
    let (x, y) = (x as usize, y as usize);
    if x < GRID_COL || y < GRID_ROW {
        return None;
    }
    let row = y - GRID_ROW;
    let col = (x - GRID_COL) / CELL_W;
    if row < size && col < size {
        Some(Coord::new(row, col))
    } else {
        None
    }
}

/// Seconds as `mm:ss`.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_view: Option<(Screen, Phase)>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_view: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Drop the back buffer so the next frame repaints everything.
    pub fn invalidate(&mut self) {
        self.back.cells.fill(Cell::INVALID);
    }

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Screen or phase change → clear for clean transition
        let view = (world.screen, world.game.phase());
        if self.last_view != Some(view) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_view = Some(view);
        }

        self.front.clear();

        match world.screen {
            Screen::Title => self.compose_title(world),
            Screen::Instructions => self.compose_instructions(world),
            Screen::Ranking => self.compose_ranking(world),
            Screen::Playing => match world.game.session() {
                Some(session) => self.compose_game(world, session),
                None => self.compose_title(world),
            },
        }

        self.flush_diff()?;

        // Swap: current front becomes next back
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

        // Explicit base colors; ResetColor would fall back to the terminal's
        // own default and leave line artifacts.
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

    fn compose_game(&mut self, w: &WorldState, s: &Session) {
        let size = s.grid().size();
        let phase = w.game.phase();
        let level = s.level();

        // ── HUD row ──
        let hud = format!(
            " Level: {} ({}/{})   Score: {:<5}  Time: {}   Words: {}/{}   Mode: {}   Sound: {} ",
            level.key.to_uppercase(),
            s.level_index() + 1,
            w.game.catalog().len(),
            s.score(),
            format_clock(s.time_remaining()),
            s.found_count(),
            level.words.len(),
            w.game.mode().label(),
            if w.muted { "off" } else { "on" },
        );
        self.front.put_bar(HUD_ROW, &hud, Color::White, HUD_BG);
        if s.clock_running() && s.time_remaining() <= 30 {
            // Low time: repaint the clock in red.
            if let Some(pos) = hud.find("Time: ") {
                let col = hud[..pos].chars().count() + 6;
                let clock = format_clock(s.time_remaining());
                self.front.put_str(col, HUD_ROW, &clock, MISSED_FG, HUD_BG);
            }
        }

        // ── Board ──
        let reveal = phase.is_final();
        let missed: Vec<Coord> = if reveal {
            s.placements()
                .iter()
                .filter(|p| !s.is_found(&p.word))
                .flat_map(|p| p.cells(size))
                .collect()
        } else {
            vec![]
        };
        let sel = s.selection();
        for (r, letters) in s.grid().rows().enumerate() {
            let y = GRID_ROW + r;
            for (c, &ch) in letters.iter().enumerate() {
                let at = Coord::new(r, c);
                let x = GRID_COL + c * CELL_W;
                let (fg, bg) = if sel.anchor() == Some(at) {
                    (Color::Black, ANCHOR_BG)
                } else if sel.preview().contains(&at) {
                    (Color::Black, PREVIEW_BG)
                } else if s.is_found_cell(at) {
                    (Color::Black, FOUND_BG)
                } else if missed.contains(&at) {
                    (MISSED_FG, BOARD_BG)
                } else if phase == Phase::Playing && w.hover == Some(at) {
                    (Color::White, HOVER_BG)
                } else {
                    (Color::White, BOARD_BG)
                };
                self.front.set(x, y, Cell::from_char(ch, fg, bg));
                // Gap column joins horizontal runs of the preview.
                let right = Coord::new(r, c + 1);
                let gap_bg = if sel.preview().contains(&at) && sel.preview().contains(&right) {
                    PREVIEW_BG
                } else {
                    BOARD_BG
                };
                self.front.set(x + 1, y, Cell::from_char(' ', fg, gap_bg));
            }
        }

        // ── Word list ──
        let list_x = GRID_COL + size * CELL_W + LIST_GAP;
        self.front.put_str(list_x, GRID_ROW, "WORDS", GOLD, Color::Reset);
        for (i, word) in level.words.iter().enumerate() {
            let y = GRID_ROW + 2 + i;
            if s.is_found(word) {
                self.front.put_str(list_x, y, &format!("✓ {word}"), FOUND_BG, Color::Reset);
            } else if s.skipped().contains(word) {
                self.front.put_str(list_x, y, &format!("· {word} (not placed)"), Color::DarkGrey, Color::Reset);
            } else if reveal {
                self.front.put_str(list_x, y, &format!("✗ {word}"), MISSED_FG, Color::Reset);
            } else {
                self.front.put_str(list_x, y, &format!("· {word}"), Color::White, Color::Reset);
            }
        }

        // ── Phase panels ──
        let panel_y = GRID_ROW + level.words.len() + 3;
        match phase {
            Phase::LevelCleared => self.compose_cleared_panel(w, s, list_x, panel_y),
            Phase::TimedOut | Phase::AllCleared => self.compose_end_panel(w, list_x, panel_y),
            Phase::Playing | Phase::Idle => {}
        }

        // ── Message bar ──
        let msg_row = GRID_ROW + size + 1;
        if !w.message.is_empty() && msg_row < self.front.height {
            self.front.put_bar(msg_row, &format!(" ◈ {} ", w.message), Color::Black, MSG_BG);
        }

        // ── Help bar ──
        let help_row = GRID_ROW + size + 3;
        let help = match (phase, w.game.mode()) {
            (Phase::Playing, SelectionMode::Drag) => {
                " Drag from first to last letter   Tab:Mode  M:Mute  Esc/F2:Restart"
            }
            (Phase::Playing, _) => {
                " Click first letter, then last letter   Tab:Mode  M:Mute  Esc:Cancel/Restart"
            }
            (Phase::LevelCleared, _) => " Enter:Next level   Esc/F2:Restart",
            _ => " Type your name, Enter:Save   Esc/F2:Title",
        };
        self.front.put_str(0, help_row, help, Color::DarkGrey, Color::Reset);
    }

    fn compose_cleared_panel(&mut self, w: &WorldState, s: &Session, x: usize, y: usize) {
        let blink = (w.anim_tick / 20) % 2 == 0;
        let art = [
            "╔══════════════════════╗",
            "║    LEVEL  CLEARED!   ║",
            "╚══════════════════════╝",
        ];
        for (i, l) in art.iter().enumerate() {
            self.front.put_str(x, y + i, l, GOLD, Color::Reset);
        }
        self.front.put_str(x, y + 4, &format!("◈ Score: {}", s.score()), Color::White, Color::Reset);
        if let Some(next) = w.game.catalog().get(s.level_index() + 1) {
            let label = format!("◈ Next: {} ({}x{})", next.key.to_uppercase(), next.size, next.size);
            self.front.put_str(x, y + 5, &label, Color::White, Color::Reset);
        }
        if blink {
            self.front.put_str(x, y + 7, "▸ ENTER: Next level", GREEN, Color::Reset);
        }
    }

    fn compose_end_panel(&mut self, w: &WorldState, x: usize, y: usize) {
        let (title, color) = if w.game.phase() == Phase::AllCleared {
            ("║  ★ ALL LEVELS CLEARED! ★ ║", GOLD)
        } else {
            ("║       TIME'S  UP!        ║", MISSED_FG)
        };
        self.front.put_str(x, y, "╔══════════════════════════╗", color, Color::Reset);
        self.front.put_str(x, y + 1, title, color, Color::Reset);
        self.front.put_str(x, y + 2, "╚══════════════════════════╝", color, Color::Reset);

        let score = w.game.final_score().unwrap_or(0);
        self.front.put_str(x, y + 4, &format!("◈ Final Score: {score}"), Color::White, Color::Reset);

        if score == 0 {
            self.front.put_str(x, y + 6, "No score to save.", Color::DarkGrey, Color::Reset);
            self.front.put_str(x, y + 7, "▸ ENTER / ESC: Title", GREEN, Color::Reset);
            return;
        }

        self.front.put_str(x, y + 6, "Your name:", Color::White, Color::Reset);
        let caret = if (w.anim_tick / 15) % 2 == 0 { '_' } else { ' ' };
        let field = format!("[{:<width$}]", format!("{}{}", w.name_input, caret), width = MAX_NAME_LEN + 1);
        self.front.put_str(x, y + 7, &field, GOLD, Color::Rgb { r: 40, g: 40, b: 60 });
        self.front.put_str(x, y + 9, "▸ ENTER: Save score", GREEN, Color::Reset);
    }

    fn compose_title(&mut self, w: &WorldState) {
        let title = [
            r" __      __          _   _  _           _   ",
            r" \ \    / /__ _ _ __| | | || |_  _ _ _ | |_ ",
            r"  \ \/\/ / _ \ '_/ _` | | __ | || | ' \|  _|",
            r"   \_/\_/\___/_| \__,_| |_||_|\_,_|_||_|\__|",
        ];
        for (i, line) in title.iter().enumerate() {
            self.front.put_str(2, 1 + i, line, GOLD, Color::Reset);
        }
        let tagline = "━━━ Find every word before the clock runs out ━━━";
        let tx = 2 + title[0].len().saturating_sub(tagline.chars().count()) / 2;
        self.front.put_str(tx, 6, tagline, Color::Rgb { r: 180, g: 140, b: 50 }, Color::Reset);

        // Level list
        let list_y = 8;
        self.front.put_str(6, list_y, "Choose a level", Color::White, Color::Reset);
        for (i, level) in w.game.catalog().levels().iter().enumerate() {
            let selected = i == w.select_cursor;
            let line = format!(
                "{} {:<10} {:>2}x{:<2}  {:>2} words  {}",
                if selected { '▸' } else { ' ' },
                level.key.to_uppercase(),
                level.size,
                level.size,
                level.words.len(),
                format_clock(level.time_budget_secs),
            );
            let color = if selected { GREEN } else { Color::DarkGrey };
            self.front.put_str(8, list_y + 2 + i, &line, color, Color::Reset);
        }

        let menu_y = list_y + 3 + w.game.catalog().len();
        let menu = [
            "ENTER   Start".to_string(),
            "↑↓      Choose level".to_string(),
            format!("Tab     Selection: {}", w.game.mode().label()),
            format!("M       Sound: {}", if w.muted { "off" } else { "on" }),
            "I       How to play".to_string(),
            "R       Ranking".to_string(),
            "Q       Quit".to_string(),
        ];
        for (i, line) in menu.iter().enumerate() {
            self.front.put_str(8, menu_y + i, line, Color::White, Color::Reset);
        }

        if !w.message.is_empty() {
            let msg_row = self.front.height.saturating_sub(1);
            if msg_row > menu_y + menu.len() {
                self.front.put_bar(msg_row, &format!(" ◈ {} ", w.message), Color::Black, MSG_BG);
            }
        }
    }

    fn compose_instructions(&mut self, w: &WorldState) {
        self.front.put_str(4, 1, "HOW TO PLAY", GOLD, Color::Reset);
        let lines = [
            "Words are hidden in the grid in any of eight directions:",
            "across, down, diagonal, and backwards along each of those.",
            "",
            "Drag mode: press on the first letter, drag to the last, release.",
            "Click mode: click the first letter, then click the last one.",
            "A straight or 45° pick spells a word either way round.",
            "",
            "Each found word scores 10 points per letter.",
            "Find all words to clear the level; the score carries over.",
            "When time runs out the run ends and you can save your score.",
            "",
            "Tab switches selection mode, M mutes, Esc/F2 restarts.",
        ];
        for (i, l) in lines.iter().enumerate() {
            self.front.put_str(4, 3 + i, l, Color::White, Color::Reset);
        }
        let mode = format!("Current selection mode: {}", w.game.mode().label());
        self.front.put_str(4, 4 + lines.len(), &mode, GREEN, Color::Reset);
        self.front.put_str(4, 6 + lines.len(), "▸ ENTER / ESC: Back", GREEN, Color::Reset);
    }

    fn compose_ranking(&mut self, w: &WorldState) {
        let art = [
            "╔══════════════════════════╗",
            "║        TOP  SCORES       ║",
            "╚══════════════════════════╝",
        ];
        for (i, l) in art.iter().enumerate() {
            self.front.put_str(4, 1 + i, l, GOLD, Color::Reset);
        }
        if w.ranking.is_empty() {
            self.front.put_str(6, 5, "No scores yet.", Color::DarkGrey, Color::Reset);
        }
        for (i, e) in w.ranking.iter().enumerate() {
            let color = match i {
                0 => GOLD,
                1 => Color::Rgb { r: 200, g: 200, b: 210 },
                2 => Color::Rgb { r: 205, g: 127, b: 50 },
                _ => Color::White,
            };
            let line = format!("{:>2}. {:<width$}  {:>6}", i + 1, e.name, e.score, width = MAX_NAME_LEN);
            self.front.put_str(6, 5 + i, &line, color, Color::Reset);
        }
        let footer = 6 + w.ranking.len().max(1);
        self.front.put_str(6, footer, "▸ ENTER / ESC: Title", GREEN, Color::Reset);

        if !w.message.is_empty() {
            self.front.put_bar(footer + 2, &format!(" ◈ {} ", w.message), Color::Black, MSG_BG);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_test_maps_both_columns_of_a_cell() {
        let x = (GRID_COL + 3 * CELL_W) as u16;
        let y = (GRID_ROW + 4) as u16;
        assert_eq!(grid_cell_at(x, y, 10), Some(Coord::new(4, 3)));
        assert_eq!(grid_cell_at(x + 1, y, 10), Some(Coord::new(4, 3)));
        assert_eq!(grid_cell_at(x + 2, y, 10), Some(Coord::new(4, 4)));
    }

    #[test]
    fn hit_test_outside_board() {
        assert_eq!(grid_cell_at(0, GRID_ROW as u16, 10), None);
        assert_eq!(grid_cell_at(GRID_COL as u16, 0, 10), None);
        let past = (GRID_COL + 10 * CELL_W) as u16;
        assert_eq!(grid_cell_at(past, GRID_ROW as u16, 10), None);
        assert_eq!(grid_cell_at(GRID_COL as u16, (GRID_ROW + 10) as u16, 10), None);
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(240), "04:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(3725), "62:05");
    }

    #[test]
    fn put_str_clips_at_edge() {
        let mut fb = FrameBuffer::new(4, 1);
        fb.put_str(2, 0, "ABCD", Color::White, Color::Reset);
        assert_eq!(fb.get(2, 0).ch, 'A');
        assert_eq!(fb.get(3, 0).ch, 'B');
        assert_eq!(fb.get(0, 0), Cell::BLANK);
    }
}
