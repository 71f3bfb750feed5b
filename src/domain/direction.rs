/// Placement directions and grid coordinates.
/// Direction semantics live here so the generator and the resolver
/// agree on what a "line" through the grid is.

/// A grid coordinate. Row-major: `row` indexes lines, `col` indexes letters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Coord { row, col }
    }

    /// Step `k` times along `dir`. None if the result leaves `0..size`.
    pub fn offset(self, dir: Direction, k: usize, size: usize) -> Option<Coord> {
        let r = self.row as i64 + dir.d_row as i64 * k as i64;
        let c = self.col as i64 + dir.d_col as i64 * k as i64;
        if r < 0 || c < 0 || r >= size as i64 || c >= size as i64 {
            None
        } else {
            Some(Coord::new(r as usize, c as usize))
        }
    }
}

/// One of the 8 unit vectors a word can be laid along.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Direction {
    pub d_row: i8,
    pub d_col: i8,
}

impl Direction {
    pub const SOUTH: Direction = Direction { d_row: 1, d_col: 0 };
    pub const EAST: Direction = Direction { d_row: 0, d_col: 1 };
    pub const SOUTH_EAST: Direction = Direction { d_row: 1, d_col: 1 };
    pub const SOUTH_WEST: Direction = Direction { d_row: 1, d_col: -1 };
    pub const NORTH: Direction = Direction { d_row: -1, d_col: 0 };
    pub const WEST: Direction = Direction { d_row: 0, d_col: -1 };
    pub const NORTH_WEST: Direction = Direction { d_row: -1, d_col: -1 };
    pub const NORTH_EAST: Direction = Direction { d_row: -1, d_col: 1 };

    pub const ALL: [Direction; 8] = [
        Direction::SOUTH,
        Direction::EAST,
        Direction::SOUTH_EAST,
        Direction::SOUTH_WEST,
        Direction::NORTH,
        Direction::WEST,
        Direction::NORTH_WEST,
        Direction::NORTH_EAST,
    ];

    /// Unit step from `from` toward `to`, per axis sign.
    /// Returns None for the zero vector (from == to).
    pub fn toward(from: Coord, to: Coord) -> Option<Direction> {
        let d_row = sign(to.row as i64 - from.row as i64);
        let d_col = sign(to.col as i64 - from.col as i64);
        if d_row == 0 && d_col == 0 {
            None
        } else {
            Some(Direction { d_row, d_col })
        }
    }
}

fn sign(v: i64) -> i8 {
    match v {
        0 => 0,
        v if v > 0 => 1,
        _ => -1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn eight_distinct_non_zero_directions() {
        let set: HashSet<Direction> = Direction::ALL.iter().copied().collect();
        assert_eq!(set.len(), 8);
        assert!(Direction::ALL.iter().all(|d| d.d_row != 0 || d.d_col != 0));
    }

    #[test]
    fn offset_stays_in_bounds() {
        let c = Coord::new(0, 0);
        assert_eq!(c.offset(Direction::SOUTH_EAST, 2, 3), Some(Coord::new(2, 2)));
        assert_eq!(c.offset(Direction::SOUTH_EAST, 3, 3), None);
        assert_eq!(c.offset(Direction::NORTH, 1, 3), None);
        assert_eq!(c.offset(Direction::WEST, 0, 3), Some(c));
    }

    #[test]
    fn toward_uses_axis_signs() {
        let a = Coord::new(4, 1);
        assert_eq!(Direction::toward(a, Coord::new(0, 5)), Some(Direction::NORTH_EAST));
        assert_eq!(Direction::toward(a, Coord::new(4, 0)), Some(Direction::WEST));
        assert_eq!(Direction::toward(a, a), None);
    }
}
