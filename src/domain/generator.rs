/// Grid generator: lays a word list into an empty square and fills the rest.
///
/// ## Placement
///   1. Word order is shuffled (Fisher–Yates).
///   2. Per word, the 8 directions are shuffled.
///   3. Per direction, starts are scanned row-major; the first start whose
///      full extent is in bounds and only crosses matching letters wins.
///   4. No backtracking: a word that fits nowhere is handled by the policy.
///
/// The RNG is passed in so a seeded generator reproduces the same grid.

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

use super::direction::{Coord, Direction};
use super::grid::Grid;

const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// What to do with a word that has no valid slot.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementPolicy {
    /// Leave the word out and keep going.
    #[default]
    Skip,
    /// Abort generation.
    Fail,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("word {word:?} does not fit in a {size}x{size} grid")]
    Unplaceable { word: String, size: usize },
}

/// Where one word ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub word: String,
    pub start: Coord,
    pub direction: Direction,
}

impl Placement {
    /// Cells covered by this placement, first letter first.
    pub fn cells(&self, size: usize) -> Vec<Coord> {
        (0..self.word.chars().count())
            .filter_map(|k| self.start.offset(self.direction, k, size))
            .collect()
    }
}

/// Generator output.
#[derive(Clone, Debug)]
pub struct Puzzle {
    pub grid: Grid,
    pub placements: Vec<Placement>,
    pub skipped: Vec<String>,
}

/// Build a fresh puzzle for `words` on a `size`×`size` grid.
pub fn generate<R: Rng + ?Sized>(
    size: usize,
    words: &[String],
    policy: PlacementPolicy,
    rng: &mut R,
) -> Result<Puzzle, GenerateError> {
    let mut cells: Vec<Option<char>> = vec![None; size * size];
    let mut order: Vec<&String> = words.iter().collect();
    order.shuffle(rng);

    let mut placements = Vec::with_capacity(order.len());
    let mut skipped = Vec::new();

    for word in order {
        let letters: Vec<char> = word.chars().collect();
        match place_word(&mut cells, size, &letters, rng) {
            Some((start, direction)) => {
                debug!("placed {word} at ({}, {}) dir {:?}", start.row, start.col, direction);
                placements.push(Placement { word: word.clone(), start, direction });
            }
            None => match policy {
                PlacementPolicy::Skip => {
                    warn!("could not place {word:?} in {size}x{size} grid; skipping");
                    skipped.push(word.clone());
                }
                PlacementPolicy::Fail => {
                    return Err(GenerateError::Unplaceable { word: word.clone(), size });
                }
            },
        }
    }

    let letters = cells
        .into_iter()
        .map(|c| c.unwrap_or_else(|| random_letter(rng)))
        .collect();

    Ok(Puzzle {
        grid: Grid::from_letters(size, letters),
        placements,
        skipped,
    })
}

fn random_letter<R: Rng + ?Sized>(rng: &mut R) -> char {
    ALPHABET[rng.gen_range(0..ALPHABET.len())] as char
}

/// First-fit search over shuffled directions and row-major starts.
/// Writes the word on success.
fn place_word<R: Rng + ?Sized>(
    cells: &mut [Option<char>],
    size: usize,
    word: &[char],
    rng: &mut R,
) -> Option<(Coord, Direction)> {
    if word.is_empty() {
        return None;
    }
    let mut dirs = Direction::ALL;
    dirs.shuffle(rng);

    for dir in dirs {
        for row in 0..size {
            for col in 0..size {
                let start = Coord::new(row, col);
                if fits(cells, size, word, start, dir) {
                    for (k, &ch) in word.iter().enumerate() {
                        if let Some(at) = start.offset(dir, k, size) {
                            cells[at.row * size + at.col] = Some(ch);
                        }
                    }
                    return Some((start, dir));
                }
            }
        }
    }
    None
}

fn fits(cells: &[Option<char>], size: usize, word: &[char], start: Coord, dir: Direction) -> bool {
    // Last letter in bounds implies all of them are (straight line).
    if start.offset(dir, word.len() - 1, size).is_none() {
        return false;
    }
    word.iter().enumerate().all(|(k, &ch)| {
        match start.offset(dir, k, size) {
            Some(at) => match cells[at.row * size + at.col] {
                None => true,
                Some(existing) => existing == ch,
            },
            None => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn read_placement(grid: &Grid, p: &Placement) -> String {
        grid.spell(&p.cells(grid.size()))
    }

    #[test]
    fn every_placed_word_is_readable() {
        let list = words(&["GATO", "SOL", "CASA", "LUA", "CARRO", "AMOR"]);
        for seed in 0..40 {
            let mut rng = StdRng::seed_from_u64(seed);
            let puzzle = generate(10, &list, PlacementPolicy::Skip, &mut rng).unwrap();
            assert_eq!(puzzle.placements.len() + puzzle.skipped.len(), list.len());
            for p in &puzzle.placements {
                assert_eq!(p.cells(10).len(), p.word.len());
                assert_eq!(read_placement(&puzzle.grid, p), p.word, "seed {seed}");
            }
        }
    }

    #[test]
    fn every_cell_is_one_uppercase_letter() {
        let list = words(&["DESENVOLVIMENTO", "PROGRAMACAO", "DADOS"]);
        let mut rng = StdRng::seed_from_u64(7);
        let puzzle = generate(18, &list, PlacementPolicy::Skip, &mut rng).unwrap();
        let mut count = 0;
        for row in puzzle.grid.rows() {
            for ch in row {
                assert!(ch.is_ascii_uppercase(), "unexpected cell {ch:?}");
                count += 1;
            }
        }
        assert_eq!(count, 18 * 18);
    }

    #[test]
    fn each_word_placed_at_most_once() {
        let list = words(&["COMPUTADOR", "ESCOLA", "TECLADO", "JOGOS", "CELULAR"]);
        let mut rng = StdRng::seed_from_u64(99);
        let puzzle = generate(14, &list, PlacementPolicy::Skip, &mut rng).unwrap();
        for w in &list {
            let n = puzzle.placements.iter().filter(|p| &p.word == w).count();
            assert!(n <= 1);
        }
    }

    #[test]
    fn too_long_word_is_skipped() {
        let list = words(&["ABCDEFG", "HI"]);
        let mut rng = StdRng::seed_from_u64(1);
        let puzzle = generate(5, &list, PlacementPolicy::Skip, &mut rng).unwrap();
        assert_eq!(puzzle.skipped, vec!["ABCDEFG".to_string()]);
        assert_eq!(puzzle.placements.len(), 1);
        assert_eq!(puzzle.placements[0].word, "HI");
    }

    #[test]
    fn too_long_word_fails_under_fail_policy() {
        let list = words(&["ABCDEFG"]);
        let mut rng = StdRng::seed_from_u64(1);
        let err = generate(5, &list, PlacementPolicy::Fail, &mut rng).unwrap_err();
        assert_eq!(err, GenerateError::Unplaceable { word: "ABCDEFG".into(), size: 5 });
    }

    #[test]
    fn same_seed_same_grid() {
        let list = words(&["GATO", "SOL", "LUA"]);
        let a = generate(8, &list, PlacementPolicy::Skip, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = generate(8, &list, PlacementPolicy::Skip, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.placements, b.placements);
    }

    #[test]
    fn crossing_requires_matching_letter() {
        let mut cells = vec![None; 9];
        cells[0] = Some('X');
        let word: Vec<char> = "ABC".chars().collect();
        assert!(!fits(&cells, 3, &word, Coord::new(0, 0), Direction::EAST));
        cells[0] = Some('A');
        assert!(fits(&cells, 3, &word, Coord::new(0, 0), Direction::EAST));
        assert!(!fits(&cells, 3, &word, Coord::new(0, 1), Direction::EAST));
    }

    #[test]
    fn word_filling_whole_row_is_placed() {
        let list = words(&["ABC"]);
        let mut rng = StdRng::seed_from_u64(3);
        let puzzle = generate(3, &list, PlacementPolicy::Fail, &mut rng).unwrap();
        assert_eq!(read_placement(&puzzle.grid, &puzzle.placements[0]), "ABC");
    }
}
