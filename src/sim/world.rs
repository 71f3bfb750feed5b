/// WorldState: everything the shell needs around the game controller.
///
/// The `Game` holds the puzzle rules; this struct adds the screens, the
/// level-select cursor, the name-entry buffer, the cached ranking, mute and
/// the transient message bar. The renderer reads it; `main` mutates it.

use crate::config::GameConfig;
use crate::domain::direction::Coord;
use crate::sim::game::Game;
use crate::sim::ranking::{self, RankingEntry, MAX_NAME_LEN, TOP_N};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen {
    Title,
    Instructions,
    Playing,
    Ranking,
}

pub struct WorldState {
    pub game: Game,
    pub screen: Screen,

    // ── Level select ──
    pub select_cursor: usize,

    // ── Pointer ──
    pub hover: Option<Coord>,

    // ── End of run ──
    pub name_input: String,

    // ── Ranking screen ──
    pub ranking: Vec<RankingEntry>,

    // ── Audio ──
    pub muted: bool,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,
    pub anim_tick: u32,
}

impl WorldState {
    pub fn new(config: &GameConfig) -> Self {
        let game = Game::new(config.catalog.clone(), config.game_settings());
        let select_cursor = game.catalog().index_of(&config.general.default_level).unwrap_or(0);
        WorldState {
            game,
            screen: Screen::Title,
            select_cursor,
            hover: None,
            name_input: String::new(),
            ranking: vec![],
            muted: config.general.muted,
            message: String::new(),
            message_timer: 0,
            anim_tick: 0,
        }
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }

    /// Count the message bar down one frame. Duration 0 means "sticky".
    pub fn tick_message(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message.clear();
            }
        }
    }

    /// Catalog key under the level-select cursor.
    pub fn selected_level_key(&self) -> Option<String> {
        self.game.catalog().get(self.select_cursor).map(|l| l.key.clone())
    }

    pub fn move_cursor(&mut self, delta: i32) {
        let len = self.game.catalog().len();
        if len == 0 {
            return;
        }
        let next = (self.select_cursor as i32 + delta).rem_euclid(len as i32);
        self.select_cursor = next as usize;
    }

    /// Reset the end-of-run form for a new run.
    pub fn reset_run(&mut self) {
        self.name_input.clear();
        self.hover = None;
    }

    pub fn push_name_char(&mut self, c: char) {
        if !c.is_control() && self.name_input.chars().count() < MAX_NAME_LEN {
            self.name_input.push(c);
        }
    }

    pub fn pop_name_char(&mut self) {
        self.name_input.pop();
    }

    /// Refresh the cached top list from stored entries.
    pub fn set_ranking(&mut self, entries: &[RankingEntry]) {
        self.ranking = ranking::top(entries, TOP_N);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::catalog::Catalog;
    use crate::config::{GeneralConfig, TimerConfig};
    use crate::domain::generator::PlacementPolicy;
    use crate::sim::selection::SelectionMode;

    fn config(default_level: &str) -> GameConfig {
        GameConfig {
            general: GeneralConfig {
                selection_mode: SelectionMode::Drag,
                default_level: default_level.into(),
                unplaceable_words: PlacementPolicy::Skip,
                muted: true,
            },
            timer: TimerConfig { tick_ms: 1000, frame_ms: 16 },
            catalog: Catalog::builtin(),
        }
    }

    #[test]
    fn cursor_starts_at_default_level_and_wraps() {
        let mut w = WorldState::new(&config("medium"));
        assert_eq!(w.select_cursor, 1);
        assert!(w.muted);
        w.move_cursor(1);
        w.move_cursor(1);
        assert_eq!(w.selected_level_key().as_deref(), Some("easy"));
        w.move_cursor(-1);
        assert_eq!(w.selected_level_key().as_deref(), Some("hard"));
    }

    #[test]
    fn name_input_is_capped() {
        let mut w = WorldState::new(&config("easy"));
        for c in "ABCDEFGHIJKLMNOPQRS".chars() {
            w.push_name_char(c);
        }
        assert_eq!(w.name_input.chars().count(), MAX_NAME_LEN);
        w.pop_name_char();
        assert_eq!(w.name_input, "ABCDEFGHIJKLMN");
        w.push_name_char('\u{8}');
        assert_eq!(w.name_input.len(), 14);
    }

    #[test]
    fn message_expires() {
        let mut w = WorldState::new(&config("easy"));
        w.set_message("hi", 2);
        w.tick_message();
        assert_eq!(w.message, "hi");
        w.tick_message();
        assert!(w.message.is_empty());
    }

    #[test]
    fn ranking_cache_is_sorted_top_ten() {
        let mut w = WorldState::new(&config("easy"));
        let entries: Vec<RankingEntry> = (0..15)
            .map(|i| RankingEntry { name: format!("P{i}"), score: i * 5 })
            .collect();
        w.set_ranking(&entries);
        assert_eq!(w.ranking.len(), 10);
        assert_eq!(w.ranking[0].score, 70);
    }
}
