use serde::{Deserialize, Serialize};

/// Single coordinate axis used for rows and columns.
pub type Coord = u8;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Side length of the square board.
pub const GRID_SIZE: Coord = 4;

/// Number of cells in a single row or column.
pub const LINE_LEN: usize = GRID_SIZE as usize;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn in_bounds((row, col): Coord2) -> bool {
    row < GRID_SIZE && col < GRID_SIZE
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Cells of the `line`-th row (horizontal moves) or column (vertical moves), ordered so that
    /// the first cell is the one tiles slide toward.
    ///
    /// This is the orientation transform that lets one left-compaction routine serve all four
    /// directions: rows as-is for `Left`, reversed rows for `Right`, columns (the transpose) for
    /// `Up` and reversed columns for `Down`.
    pub fn line_cells(self, line: Coord) -> [Coord2; LINE_LEN] {
        use Direction::*;

        let mut cells = [(0, 0); LINE_LEN];
        for (step, cell) in (0..GRID_SIZE).zip(cells.iter_mut()) {
            let far = GRID_SIZE - 1 - step;
            *cell = match self {
                Left => (line, step),
                Right => (line, far),
                Up => (step, line),
                Down => (far, line),
            };
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_cells_start_at_the_edge_tiles_slide_toward() {
        assert_eq!(Direction::Left.line_cells(1), [(1, 0), (1, 1), (1, 2), (1, 3)]);
        assert_eq!(Direction::Right.line_cells(1), [(1, 3), (1, 2), (1, 1), (1, 0)]);
        assert_eq!(Direction::Up.line_cells(2), [(0, 2), (1, 2), (2, 2), (3, 2)]);
        assert_eq!(Direction::Down.line_cells(2), [(3, 2), (2, 2), (1, 2), (0, 2)]);
    }

    #[test]
    fn every_direction_covers_every_cell_once() {
        for direction in Direction::ALL {
            let mut seen = [[false; LINE_LEN]; LINE_LEN];
            for line in 0..GRID_SIZE {
                for (row, col) in direction.line_cells(line) {
                    assert!(!seen[row as usize][col as usize], "{direction:?} visits twice");
                    seen[row as usize][col as usize] = true;
                }
            }
            assert!(seen.iter().flatten().all(|&cell| cell));
        }
    }
}
