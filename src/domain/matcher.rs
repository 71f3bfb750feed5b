/// Match engine: read a path's letters both ways and look them up in the
/// target list. Pure; the session applies the outcome.

use std::collections::HashSet;

use super::direction::Coord;
use super::grid::Grid;

/// Points per letter of a found word.
pub const POINTS_PER_LETTER: u32 = 10;

/// Outcome of one commit against the session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub matched: bool,
    pub word: Option<String>,
    pub score_delta: u32,
    pub game_complete: bool,
}

impl MatchResult {
    pub fn miss() -> Self {
        MatchResult::default()
    }
}

/// What the letters under a path correspond to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// Not a target word in either reading direction.
    NoWord,
    /// A target word that was already found this level.
    AlreadyFound(String),
    /// A target word not yet found.
    Fresh(String),
}

/// Look the path up against `targets`. The reversed reading wins when both
/// readings are targets (palindromes).
pub fn lookup(grid: &Grid, targets: &[String], found: &HashSet<String>, path: &[Coord]) -> Lookup {
    if path.is_empty() {
        return Lookup::NoWord;
    }
    let forward = grid.spell(path);
    let reverse: String = forward.chars().rev().collect();

    let hit = if targets.contains(&reverse) {
        reverse
    } else if targets.contains(&forward) {
        forward
    } else {
        return Lookup::NoWord;
    };

    if found.contains(&hit) {
        Lookup::AlreadyFound(hit)
    } else {
        Lookup::Fresh(hit)
    }
}

/// Score awarded for finding `word`.
pub fn word_score(word: &str) -> u32 {
    word.chars().count() as u32 * POINTS_PER_LETTER
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::path::resolve_path;

    fn targets(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn gato_grid() -> Grid {
        Grid::from_rows(&[
            "GATOXXXXXX",
            "XXXXXXXXXX",
            "XXXXXXXXXX",
            "XXXXXXXXXX",
            "XXXXXXXXXX",
            "XXXXXXXXXX",
            "XXXXXXXXXX",
            "XXXXXXXXXX",
            "XXXXXXXXXX",
            "OTAGXXXXXX",
        ])
    }

    #[test]
    fn forward_reading_matches() {
        let g = gato_grid();
        let path = resolve_path(10, Coord::new(0, 0), Coord::new(0, 3));
        assert_eq!(g.spell(&path), "GATO");
        let got = lookup(&g, &targets(&["GATO"]), &HashSet::new(), &path);
        assert_eq!(got, Lookup::Fresh("GATO".into()));
        assert_eq!(word_score("GATO"), 40);
    }

    #[test]
    fn reversed_reading_matches() {
        let g = gato_grid();
        let path = resolve_path(10, Coord::new(9, 0), Coord::new(9, 3));
        assert_eq!(g.spell(&path), "OTAG");
        let got = lookup(&g, &targets(&["GATO"]), &HashSet::new(), &path);
        assert_eq!(got, Lookup::Fresh("GATO".into()));
    }

    #[test]
    fn found_word_reports_already_found() {
        let g = gato_grid();
        let path = resolve_path(10, Coord::new(0, 3), Coord::new(0, 0));
        let found: HashSet<String> = ["GATO".to_string()].into_iter().collect();
        let got = lookup(&g, &targets(&["GATO"]), &found, &path);
        assert_eq!(got, Lookup::AlreadyFound("GATO".into()));
    }

    #[test]
    fn partial_word_is_no_match() {
        let g = gato_grid();
        let path = resolve_path(10, Coord::new(0, 0), Coord::new(0, 2));
        assert_eq!(lookup(&g, &targets(&["GATO"]), &HashSet::new(), &path), Lookup::NoWord);
    }

    #[test]
    fn empty_path_is_no_match() {
        let g = gato_grid();
        assert_eq!(lookup(&g, &targets(&["GATO"]), &HashSet::new(), &[]), Lookup::NoWord);
    }

    #[test]
    fn reverse_wins_when_both_readings_are_targets() {
        let g = Grid::from_rows(&["ABX", "XXX", "XXX"]);
        let path = resolve_path(3, Coord::new(0, 0), Coord::new(0, 1));
        let got = lookup(&g, &targets(&["AB", "BA"]), &HashSet::new(), &path);
        assert_eq!(got, Lookup::Fresh("BA".into()));
    }
}
