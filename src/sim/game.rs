/// Game controller: the run-level state machine.
///
/// ```text
///   Idle ──start──▶ Playing ──all words──▶ LevelCleared ──advance──▶ Playing
///                      │                        (last level) ──▶ AllCleared
///                      └──time up──▶ TimedOut
///   any ──restart──▶ Idle
/// ```
///
/// Owns at most one `Session`. `TimedOut` and `AllCleared` end the run and
/// keep the session around so the final board and score can be shown.

use std::time::Duration;

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::domain::direction::Coord;
use crate::domain::generator::{self, GenerateError, PlacementPolicy};
use crate::domain::matcher::{Lookup, MatchResult};
use super::catalog::Catalog;
use super::event::GameEvent;
use super::selection::{Pick, SelectionMode};
use super::session::Session;
use super::timer::TickOutcome;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Idle,
    Playing,
    LevelCleared,
    TimedOut,
    AllCleared,
}

impl Phase {
    /// Run is over; the score can go to the ranking.
    pub fn is_final(self) -> bool {
        matches!(self, Phase::TimedOut | Phase::AllCleared)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("unknown level {0:?}")]
    UnknownLevel(String),
    #[error("could not build grid: {0}")]
    Generate(#[from] GenerateError),
    #[error("no cleared level to advance from")]
    NotCleared,
}

#[derive(Clone, Copy, Debug)]
pub struct GameSettings {
    pub policy: PlacementPolicy,
    pub mode: SelectionMode,
    pub tick_period: Duration,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings {
            policy: PlacementPolicy::Skip,
            mode: SelectionMode::Drag,
            tick_period: Duration::from_secs(1),
        }
    }
}

pub struct Game {
    catalog: Catalog,
    settings: GameSettings,
    rng: StdRng,
    phase: Phase,
    session: Option<Session>,
}

impl Game {
    pub fn new(catalog: Catalog, settings: GameSettings) -> Self {
        Self::with_rng(catalog, settings, StdRng::from_entropy())
    }

    pub fn with_rng(catalog: Catalog, settings: GameSettings, rng: StdRng) -> Self {
        Game { catalog, settings, rng, phase: Phase::Idle, session: None }
    }

    // ── Queries ──

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn mode(&self) -> SelectionMode {
        self.settings.mode
    }

    pub fn score(&self) -> u32 {
        self.session.as_ref().map_or(0, |s| s.score())
    }

    /// Score to rank, once the run has ended.
    pub fn final_score(&self) -> Option<u32> {
        if self.phase.is_final() {
            Some(self.score())
        } else {
            None
        }
    }

    // ── Lifecycle ──

    /// Start a fresh run at `key`. On error nothing changes: no session is
    /// created and the phase stays where it was.
    pub fn start(&mut self, key: &str) -> Result<Vec<GameEvent>, GameError> {
        let idx = match self.catalog.index_of(key) {
            Some(i) => i,
            None => {
                warn!("start refused: unknown level {key:?}");
                return Err(GameError::UnknownLevel(key.to_string()));
            }
        };
        let session = self.build_session(idx, 0)?;
        self.session = Some(session);
        self.phase = Phase::Playing;
        Ok(vec![GameEvent::LevelStarted { key: key.to_string(), index: idx }])
    }

    /// From `LevelCleared`, start the next level carrying the score over.
    pub fn advance(&mut self) -> Result<Vec<GameEvent>, GameError> {
        let (idx, score) = match (&self.session, self.phase) {
            (Some(s), Phase::LevelCleared) => (s.level_index() + 1, s.score()),
            _ => return Err(GameError::NotCleared),
        };
        let session = self.build_session(idx, score)?;
        let key = session.level().key.clone();
        self.session = Some(session);
        self.phase = Phase::Playing;
        Ok(vec![GameEvent::LevelStarted { key, index: idx }])
    }

    /// Drop the session and its timer unconditionally.
    pub fn restart(&mut self) {
        if self.session.take().is_some() {
            info!("session discarded ({:?})", self.phase);
        }
        self.phase = Phase::Idle;
    }

    fn build_session(&mut self, idx: usize, carried: u32) -> Result<Session, GameError> {
        let level = match self.catalog.get(idx) {
            Some(l) => l.clone(),
            None => return Err(GameError::NotCleared),
        };
        let puzzle = generator::generate(level.size, &level.words, self.settings.policy, &mut self.rng)
            .map_err(|e| {
                warn!("level {:?}: {e}", level.key);
                e
            })?;
        info!(
            "level {:?} started: {}x{}, {} of {} words placed",
            level.key, level.size, level.size, puzzle.placements.len(), level.words.len()
        );
        Ok(Session::new(level, idx, puzzle, carried, self.settings.mode, self.settings.tick_period))
    }

    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.settings.mode = mode;
        if let Some(s) = self.session.as_mut() {
            s.set_selection_mode(mode);
        }
    }

    // ── Timer ──

    /// One second elapsed.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        if self.phase != Phase::Playing {
            return vec![];
        }
        let outcome = match self.session.as_mut() {
            Some(s) => s.countdown_mut().tick(),
            None => return vec![],
        };
        self.after_tick(outcome)
    }

    /// Wall-clock time from the game loop.
    pub fn advance_time(&mut self, elapsed: Duration) -> Vec<GameEvent> {
        if self.phase != Phase::Playing {
            return vec![];
        }
        let outcome = match self.session.as_mut() {
            Some(s) => s.countdown_mut().advance(elapsed),
            None => return vec![],
        };
        self.after_tick(outcome)
    }

    fn after_tick(&mut self, outcome: TickOutcome) -> Vec<GameEvent> {
        if outcome != TickOutcome::Expired {
            return vec![];
        }
        self.phase = Phase::TimedOut;
        if let Some(s) = self.session.as_mut() {
            s.selection_mut().cancel();
        }
        let score = self.score();
        info!("time up, final score {score}");
        vec![GameEvent::TimedOut { score }]
    }

    // ── Selection ──

    pub fn on_anchor(&mut self, at: Coord) -> Vec<GameEvent> {
        if self.phase != Phase::Playing {
            return vec![];
        }
        let pick = match self.session.as_mut() {
            Some(s) => s.selection_mut().on_anchor(at),
            None => None,
        };
        match pick {
            Some(p) => self.commit(p),
            None => vec![],
        }
    }

    pub fn on_extend(&mut self, at: Coord) {
        if self.phase != Phase::Playing {
            return;
        }
        if let Some(s) = self.session.as_mut() {
            s.selection_mut().on_extend(at);
        }
    }

    pub fn on_commit(&mut self, at: Coord) -> Vec<GameEvent> {
        if self.phase != Phase::Playing {
            return vec![];
        }
        let pick = match self.session.as_mut() {
            Some(s) => s.selection_mut().on_commit(at),
            None => None,
        };
        match pick {
            Some(p) => self.commit(p),
            None => vec![],
        }
    }

    pub fn cancel_selection(&mut self) {
        if let Some(s) = self.session.as_mut() {
            s.selection_mut().cancel();
        }
    }

    fn commit(&mut self, pick: Pick) -> Vec<GameEvent> {
        let session = match self.session.as_mut() {
            Some(s) => s,
            None => return vec![],
        };
        let before = session.lookup(pick);
        let result = session.commit(pick);
        let mut events = vec![];
        match (before, &result) {
            (_, MatchResult { matched: true, word: Some(word), score_delta, .. }) => {
                events.push(GameEvent::WordFound { word: word.clone(), score_delta: *score_delta });
            }
            (Lookup::AlreadyFound(word), _) => events.push(GameEvent::AlreadyFound { word }),
            _ => events.push(GameEvent::NoMatch),
        }
        if result.game_complete {
            events.extend(self.clear_level());
        }
        events
    }

    fn clear_level(&mut self) -> Vec<GameEvent> {
        let (key, idx, score) = match self.session.as_mut() {
            Some(s) => {
                s.countdown_mut().cancel();
                s.selection_mut().cancel();
                (s.level().key.clone(), s.level_index(), s.score())
            }
            None => return vec![],
        };
        if self.catalog.has_next(idx) {
            info!("level {key:?} cleared");
            self.phase = Phase::LevelCleared;
            vec![GameEvent::LevelCleared { key }]
        } else {
            info!("all levels cleared, final score {score}");
            self.phase = Phase::AllCleared;
            vec![GameEvent::LevelCleared { key }, GameEvent::AllCleared { score }]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::catalog::LevelConfig;

    fn level(key: &str, size: usize, time: u32, words: &[&str]) -> LevelConfig {
        LevelConfig {
            key: key.into(),
            size,
            words: words.iter().map(|w| w.to_string()).collect(),
            time_budget_secs: time,
        }
    }

    fn game(levels: Vec<LevelConfig>) -> Game {
        let catalog = Catalog::from_levels(levels).unwrap();
        Game::with_rng(catalog, GameSettings::default(), StdRng::seed_from_u64(11))
    }

    /// Find every placed word of the current level by dragging over it.
    fn solve_current(g: &mut Game) -> Vec<GameEvent> {
        let (size, picks): (usize, Vec<(Coord, Coord)>) = {
            let s = g.session().unwrap();
            let size = s.grid().size();
            let picks = s
                .placements()
                .iter()
                .map(|p| {
                    let cells = p.cells(size);
                    (cells[0], *cells.last().unwrap())
                })
                .collect();
            (size, picks)
        };
        assert!(size > 0);
        let mut events = vec![];
        for (a, b) in picks {
            g.on_anchor(a);
            g.on_extend(b);
            events.extend(g.on_commit(b));
        }
        events
    }

    #[test]
    fn unknown_level_creates_no_session() {
        let mut g = game(vec![level("a", 6, 30, &["CAT"])]);
        assert_eq!(g.start("zzz").unwrap_err(), GameError::UnknownLevel("zzz".into()));
        assert_eq!(g.phase(), Phase::Idle);
        assert!(g.session().is_none());
    }

    #[test]
    fn fail_policy_aborts_start() {
        let catalog = Catalog::from_levels(vec![level("a", 3, 30, &["LONGWORD"])]).unwrap();
        let settings = GameSettings { policy: PlacementPolicy::Fail, ..GameSettings::default() };
        let mut g = Game::with_rng(catalog, settings, StdRng::seed_from_u64(1));
        assert!(matches!(g.start("a"), Err(GameError::Generate(_))));
        assert_eq!(g.phase(), Phase::Idle);
        assert!(g.session().is_none());
    }

    #[test]
    fn start_sets_timer_and_zero_score() {
        let mut g = game(vec![level("a", 6, 30, &["CAT", "DOG"])]);
        let ev = g.start("a").unwrap();
        assert_eq!(ev, vec![GameEvent::LevelStarted { key: "a".into(), index: 0 }]);
        assert_eq!(g.phase(), Phase::Playing);
        assert_eq!(g.session().unwrap().time_remaining(), 30);
        assert_eq!(g.score(), 0);
    }

    #[test]
    fn timer_counts_down_and_times_out_once() {
        let mut g = game(vec![level("a", 6, 3, &["CAT"])]);
        g.start("a").unwrap();
        assert!(g.tick().is_empty());
        assert_eq!(g.session().unwrap().time_remaining(), 2);
        assert!(g.tick().is_empty());
        assert_eq!(g.tick(), vec![GameEvent::TimedOut { score: 0 }]);
        assert_eq!(g.phase(), Phase::TimedOut);
        assert!(g.tick().is_empty());
        assert_eq!(g.session().unwrap().time_remaining(), 0);
        assert_eq!(g.final_score(), Some(0));
    }

    #[test]
    fn wall_clock_drives_timer() {
        let mut g = game(vec![level("a", 6, 2, &["CAT"])]);
        g.start("a").unwrap();
        assert!(g.advance_time(Duration::from_millis(1500)).is_empty());
        assert_eq!(g.session().unwrap().time_remaining(), 1);
        let ev = g.advance_time(Duration::from_millis(500));
        assert_eq!(ev, vec![GameEvent::TimedOut { score: 0 }]);
    }

    #[test]
    fn selection_ignored_after_time_out() {
        let mut g = game(vec![level("a", 6, 1, &["CAT"])]);
        g.start("a").unwrap();
        g.tick();
        let p = g.session().unwrap().placements()[0].cells(6);
        g.on_anchor(p[0]);
        assert!(g.on_commit(p[2]).is_empty());
        assert_eq!(g.score(), 0);
    }

    #[test]
    fn clearing_level_advances_with_score_kept() {
        let mut g = game(vec![
            level("a", 6, 60, &["CAT", "DOG"]),
            level("b", 7, 90, &["BIRD"]),
        ]);
        g.start("a").unwrap();
        let events = solve_current(&mut g);
        assert!(events.contains(&GameEvent::LevelCleared { key: "a".into() }));
        assert_eq!(g.phase(), Phase::LevelCleared);
        assert_eq!(g.score(), 60);
        assert!(g.tick().is_empty(), "timer stops once cleared");

        let first_grid = g.session().unwrap().grid().clone();
        let ev = g.advance().unwrap();
        assert_eq!(ev, vec![GameEvent::LevelStarted { key: "b".into(), index: 1 }]);
        let s = g.session().unwrap();
        assert_eq!(g.phase(), Phase::Playing);
        assert_eq!(s.score(), 60);
        assert_eq!(s.found_count(), 0);
        assert_eq!(s.time_remaining(), 90);
        assert_eq!(s.grid().size(), 7);
        assert_ne!(s.grid(), &first_grid);
        assert!(s.selection().anchor().is_none());
    }

    #[test]
    fn clearing_last_level_ends_run() {
        let mut g = game(vec![level("a", 6, 60, &["CAT"])]);
        g.start("a").unwrap();
        let events = solve_current(&mut g);
        assert!(events.contains(&GameEvent::AllCleared { score: 30 }));
        assert_eq!(g.phase(), Phase::AllCleared);
        assert_eq!(g.final_score(), Some(30));
        assert_eq!(g.advance().unwrap_err(), GameError::NotCleared);
    }

    #[test]
    fn repeated_word_reports_already_found() {
        let mut g = game(vec![level("a", 6, 60, &["CAT", "DOG"])]);
        g.start("a").unwrap();
        let cells = g.session().unwrap().placements()[0].cells(6);
        let (a, b) = (cells[0], *cells.last().unwrap());
        g.on_anchor(a);
        let first = g.on_commit(b);
        assert!(matches!(first[0], GameEvent::WordFound { score_delta: 30, .. }));
        g.on_anchor(b);
        let again = g.on_commit(a);
        assert!(matches!(again[0], GameEvent::AlreadyFound { .. }));
        assert_eq!(g.score(), 30);
    }

    #[test]
    fn restart_discards_everything() {
        let mut g = game(vec![level("a", 6, 60, &["CAT"])]);
        g.start("a").unwrap();
        g.on_anchor(Coord::new(0, 0));
        g.restart();
        assert_eq!(g.phase(), Phase::Idle);
        assert!(g.session().is_none());
        assert!(g.tick().is_empty());
        assert_eq!(g.final_score(), None);
    }

    #[test]
    fn mode_switch_applies_to_live_session() {
        let mut g = game(vec![level("a", 6, 60, &["CAT"])]);
        g.start("a").unwrap();
        g.set_mode(SelectionMode::Click);
        assert_eq!(g.session().unwrap().selection().mode(), SelectionMode::Click);
        let cells = g.session().unwrap().placements()[0].cells(6);
        assert!(g.on_anchor(cells[0]).is_empty());
        let ev = g.on_anchor(cells[2]);
        assert!(ev.contains(&GameEvent::WordFound { word: "CAT".into(), score_delta: 30 }));
    }
}
