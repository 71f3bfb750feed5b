/// Selection path resolver.
///
/// A selection is valid only along a straight line: horizontal, vertical
/// or an exact 45° diagonal. Anything else resolves to an empty path,
/// which the match engine treats as "no match".

use super::direction::{Coord, Direction};

/// Cells from `start` to `end` inclusive, or empty if the pick is not a line
/// or either endpoint is outside a `size`×`size` grid.
pub fn resolve_path(size: usize, start: Coord, end: Coord) -> Vec<Coord> {
    let in_grid = |c: Coord| c.row < size && c.col < size;
    if !in_grid(start) || !in_grid(end) {
        return vec![];
    }

    let d_row = start.row.abs_diff(end.row);
    let d_col = start.col.abs_diff(end.col);
    let straight = d_row == 0 || d_col == 0;
    let diagonal = d_row == d_col;
    if !straight && !diagonal {
        return vec![];
    }

    let dir = match Direction::toward(start, end) {
        Some(d) => d,
        None => return vec![start],
    };
    let len = d_row.max(d_col) + 1;
    (0..len).filter_map(|k| start.offset(dir, k, size)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(row: usize, col: usize) -> Coord {
        Coord::new(row, col)
    }

    #[test]
    fn knight_move_is_rejected() {
        assert!(resolve_path(10, c(0, 0), c(1, 2)).is_empty());
    }

    #[test]
    fn diagonal_down_right() {
        assert_eq!(resolve_path(10, c(0, 0), c(2, 2)), vec![c(0, 0), c(1, 1), c(2, 2)]);
    }

    #[test]
    fn single_cell() {
        assert_eq!(resolve_path(5, c(3, 1), c(3, 1)), vec![c(3, 1)]);
    }

    #[test]
    fn horizontal_reversed_order() {
        assert_eq!(
            resolve_path(10, c(0, 3), c(0, 0)),
            vec![c(0, 3), c(0, 2), c(0, 1), c(0, 0)]
        );
    }

    #[test]
    fn vertical_up() {
        assert_eq!(resolve_path(4, c(3, 2), c(1, 2)), vec![c(3, 2), c(2, 2), c(1, 2)]);
    }

    #[test]
    fn anti_diagonal() {
        assert_eq!(resolve_path(4, c(3, 0), c(0, 3)), vec![c(3, 0), c(2, 1), c(1, 2), c(0, 3)]);
    }

    #[test]
    fn length_is_max_delta_plus_one() {
        let p = resolve_path(18, c(17, 0), c(17, 17));
        assert_eq!(p.len(), 18);
        assert_eq!(p.first(), Some(&c(17, 0)));
        assert_eq!(p.last(), Some(&c(17, 17)));
    }

    #[test]
    fn off_grid_endpoint_is_rejected() {
        assert!(resolve_path(3, c(0, 0), c(0, 3)).is_empty());
    }
}
