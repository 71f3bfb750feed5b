/// Session: the state of one level being played.
///
/// Owns the grid, the found-word set, the running score, the countdown and
/// the pending selection. Replaced wholesale on level advance or restart,
/// which also drops (and so cancels) its countdown.

use std::collections::HashSet;
use std::time::Duration;

use log::info;

use crate::domain::direction::Coord;
use crate::domain::generator::{Placement, Puzzle};
use crate::domain::grid::Grid;
use crate::domain::matcher::{self, Lookup, MatchResult};
use crate::domain::path::resolve_path;
use super::catalog::LevelConfig;
use super::selection::{Pick, Selection, SelectionMode};
use super::timer::Countdown;

pub struct Session {
    level: LevelConfig,
    level_index: usize,
    grid: Grid,
    placements: Vec<Placement>,
    skipped: Vec<String>,
    found_words: HashSet<String>,
    /// Found words in discovery order with the cells they covered.
    found_paths: Vec<(String, Vec<Coord>)>,
    score: u32,
    countdown: Countdown,
    selection: Selection,
}

impl Session {
    /// Start a level. `carried_score` is the run score from earlier levels.
    pub fn new(
        level: LevelConfig,
        level_index: usize,
        puzzle: Puzzle,
        carried_score: u32,
        mode: SelectionMode,
        tick_period: Duration,
    ) -> Self {
        let size = puzzle.grid.size();
        let countdown = Countdown::new(level.time_budget_secs, tick_period);
        Session {
            level,
            level_index,
            grid: puzzle.grid,
            placements: puzzle.placements,
            skipped: puzzle.skipped,
            found_words: HashSet::new(),
            found_paths: vec![],
            score: carried_score,
            countdown,
            selection: Selection::new(mode, size),
        }
    }

    // ── Queries ──

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Words the generator could not lay into the grid.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_remaining(&self) -> u32 {
        self.countdown.remaining()
    }

    pub fn clock_running(&self) -> bool {
        self.countdown.is_running()
    }

    pub fn is_found(&self, word: &str) -> bool {
        self.found_words.contains(word)
    }

    pub fn found_count(&self) -> usize {
        self.found_words.len()
    }

    /// Is `at` part of any found word?
    pub fn is_found_cell(&self, at: Coord) -> bool {
        self.found_paths.iter().any(|(_, cells)| cells.contains(&at))
    }

    /// Every configured word has been found.
    pub fn is_complete(&self) -> bool {
        self.found_words.len() == self.level.words.len()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    // ── Mutation ──

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn countdown_mut(&mut self) -> &mut Countdown {
        &mut self.countdown
    }

    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.selection = Selection::new(mode, self.grid.size());
    }

    /// What `pick` would match, without recording anything.
    pub fn lookup(&self, pick: Pick) -> Lookup {
        let path = resolve_path(self.grid.size(), pick.start, pick.end);
        matcher::lookup(&self.grid, &self.level.words, &self.found_words, &path)
    }

    /// Resolve a committed pick and match it.
    pub fn commit(&mut self, pick: Pick) -> MatchResult {
        let path = resolve_path(self.grid.size(), pick.start, pick.end);
        self.try_match(&path)
    }

    /// Match the letters under `path` against the remaining target words.
    /// A word already found is a no-op.
    pub fn try_match(&mut self, path: &[Coord]) -> MatchResult {
        match matcher::lookup(&self.grid, &self.level.words, &self.found_words, path) {
            Lookup::Fresh(word) => {
                let delta = matcher::word_score(&word);
                self.score += delta;
                self.found_words.insert(word.clone());
                self.found_paths.push((word.clone(), path.to_vec()));
                info!("found {word} (+{delta}), score {}", self.score);
                MatchResult {
                    matched: true,
                    word: Some(word),
                    score_delta: delta,
                    game_complete: self.is_complete(),
                }
            }
            Lookup::AlreadyFound(_) | Lookup::NoWord => MatchResult::miss(),
        }
    }
}
