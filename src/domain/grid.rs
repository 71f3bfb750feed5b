/// The letter grid: a size×size square, row-major, one uppercase letter per cell.
/// Built only by the generator; read-only for the rest of the level.

use super::direction::Coord;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    letters: Vec<char>,
}

impl Grid {
    /// Wrap a fully-filled row-major letter buffer.
    /// Callers guarantee `letters.len() == size * size`.
    pub(crate) fn from_letters(size: usize, letters: Vec<char>) -> Self {
        debug_assert_eq!(letters.len(), size * size);
        Grid { size, letters }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn contains(&self, at: Coord) -> bool {
        at.row < self.size && at.col < self.size
    }

    /// Letter at `at`, or None outside the grid.
    #[inline]
    pub fn letter(&self, at: Coord) -> Option<char> {
        if self.contains(at) {
            Some(self.letters[at.row * self.size + at.col])
        } else {
            None
        }
    }

    /// Concatenate the letters along a path. Off-grid cells are skipped.
    pub fn spell(&self, path: &[Coord]) -> String {
        path.iter().filter_map(|&c| self.letter(c)).collect()
    }

    /// Iterate rows as letter slices (renderer).
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.letters.chunks(self.size.max(1))
    }
}

#[cfg(test)]
impl Grid {
    /// Build a grid from string rows. Panics on non-square input.
    pub fn from_rows(rows: &[&str]) -> Self {
        let size = rows.len();
        let letters: Vec<char> = rows.iter().flat_map(|r| r.chars()).collect();
        assert_eq!(letters.len(), size * size, "grid rows must be square");
        Grid { size, letters }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_lookup_is_row_major() {
        let g = Grid::from_rows(&["ABC", "DEF", "GHI"]);
        assert_eq!(g.letter(Coord::new(1, 2)), Some('F'));
        assert_eq!(g.letter(Coord::new(2, 0)), Some('G'));
        assert_eq!(g.letter(Coord::new(3, 0)), None);
    }

    #[test]
    fn spell_follows_path_order() {
        let g = Grid::from_rows(&["ABC", "DEF", "GHI"]);
        let path = [Coord::new(2, 2), Coord::new(1, 1), Coord::new(0, 0)];
        assert_eq!(g.spell(&path), "IEA");
    }

    #[test]
    fn rows_yield_each_line() {
        let g = Grid::from_rows(&["AB", "CD"]);
        let rows: Vec<String> = g.rows().map(|r| r.iter().collect()).collect();
        assert_eq!(rows, vec!["AB".to_string(), "CD".to_string()]);
    }
}
