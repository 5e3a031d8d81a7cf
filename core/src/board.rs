use alloc::vec::Vec;
use core::ops::Index;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Row-major tile values, `0` standing for an empty cell.
pub type ValueRows = [[u32; LINE_LEN]; LINE_LEN];

/// Fixed-size arena of tiles indexed by position.
///
/// A grid is a value: moves never mutate it, they produce the next snapshot. Every stored tile
/// carries the coordinates of the cell it is stored in.
///
/// Serialized as its tile list; deserializing goes through [`Grid::from_tiles`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Tile>", into = "Vec<Tile>")]
pub struct Grid {
    cells: Array2<Option<Tile>>,
}

impl Grid {
    pub fn empty() -> Self {
        Self {
            cells: Array2::default((GRID_SIZE, GRID_SIZE).to_nd_index()),
        }
    }

    /// Builds a grid from value rows, drawing ids for each tile from `spawner` in row-major order.
    pub fn from_values<S: TileSpawner + ?Sized>(rows: ValueRows, spawner: &mut S) -> Result<Self> {
        let mut grid = Self::empty();
        for (row, values) in (0..GRID_SIZE).zip(rows) {
            for (col, value) in (0..GRID_SIZE).zip(values) {
                if value == 0 {
                    continue;
                }
                if !is_valid_value(value) {
                    return Err(GameError::InvalidTileValue(value));
                }
                grid.place(Tile::new(spawner.next_id(), value, (row, col)));
            }
        }
        Ok(grid)
    }

    /// Rebuilds a grid from tiles that already carry their ids and positions.
    pub fn from_tiles(tiles: impl IntoIterator<Item = Tile>) -> Result<Self> {
        let mut grid = Self::empty();
        let mut ids = Vec::new();
        for tile in tiles {
            let coords = grid.validate_coords(tile.position())?;
            if !is_valid_value(tile.value) {
                return Err(GameError::InvalidTileValue(tile.value));
            }
            if grid[coords].is_some() || ids.contains(&tile.id) {
                return Err(GameError::DuplicateTile);
            }
            ids.push(tile.id);
            grid.place(tile);
        }
        Ok(grid)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn tile_at(&self, coords: Coord2) -> Result<Option<Tile>> {
        let coords = self.validate_coords(coords)?;
        Ok(self[coords])
    }

    pub fn is_empty_at(&self, coords: Coord2) -> bool {
        self[coords].is_none()
    }

    /// Stores `tile` at the cell named by its own coordinates.
    pub(crate) fn place(&mut self, tile: Tile) {
        self.cells[tile.position().to_nd_index()] = Some(tile);
    }

    /// Occupied cells in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.cells.iter().flatten().copied()
    }

    pub fn find(&self, id: TileId) -> Option<Tile> {
        self.tiles().find(|tile| tile.id == id)
    }

    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<Coord2> {
        self.cells
            .indexed_iter()
            .filter(|(_, cell)| cell.is_none())
            .map(|((row, col), _)| (row as Coord, col as Coord))
            .collect()
    }

    pub fn values(&self) -> ValueRows {
        let mut rows = [[0; LINE_LEN]; LINE_LEN];
        for tile in self.tiles() {
            rows[tile.row as usize][tile.col as usize] = tile.value;
        }
        rows
    }

    pub fn total_value(&self) -> u64 {
        self.tiles().map(|tile| u64::from(tile.value)).sum()
    }

    pub fn max_value(&self) -> u32 {
        self.tiles().map(|tile| tile.value).max().unwrap_or(0)
    }

    /// No empty cell and no mergeable pair of right or down neighbors, so no direction can
    /// change the grid.
    pub fn is_terminal(&self) -> bool {
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let Some(tile) = self[(row, col)] else {
                    return false;
                };
                let mergeable = |coords: Coord2| {
                    in_bounds(coords) && self[coords].is_some_and(|other| tile.merges_with(other))
                };
                if mergeable((row, col + 1)) || mergeable((row + 1, col)) {
                    return false;
                }
            }
        }
        true
    }

    /// Every stored tile's coordinates match the cell it is stored in.
    pub fn positions_consistent(&self) -> bool {
        self.cells.indexed_iter().all(|((row, col), cell)| {
            cell.is_none_or(|tile| tile.position() == (row as Coord, col as Coord))
        })
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

impl TryFrom<Vec<Tile>> for Grid {
    type Error = GameError;

    fn try_from(tiles: Vec<Tile>) -> Result<Self> {
        Self::from_tiles(tiles)
    }
}

impl From<Grid> for Vec<Tile> {
    fn from(grid: Grid) -> Self {
        grid.tiles().collect()
    }
}

impl Index<Coord2> for Grid {
    type Output = Option<Tile>;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn grid(rows: ValueRows) -> Grid {
        Grid::from_values(rows, &mut RandomSpawner::new(0, 0.1)).unwrap()
    }

    #[test]
    fn from_values_assigns_distinct_ids_and_positions() {
        let grid = grid([[2, 0, 0, 4], [0; 4], [0; 4], [8, 0, 0, 0]]);

        assert_eq!(grid.tile_count(), 3);
        assert_eq!(grid[(0, 3)].map(|tile| tile.value), Some(4));
        assert_eq!(grid[(3, 0)].map(|tile| tile.position()), Some((3, 0)));
        assert!(grid.positions_consistent());

        let mut ids: Vec<_> = grid.tiles().map(|tile| tile.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn from_values_rejects_non_power_of_two() {
        let rows = [[3, 0, 0, 0], [0; 4], [0; 4], [0; 4]];

        let result = Grid::from_values(rows, &mut RandomSpawner::new(0, 0.1));

        assert_eq!(result, Err(GameError::InvalidTileValue(3)));
    }

    #[test]
    fn from_tiles_rejects_duplicates_and_out_of_bounds() {
        let a = Tile::new(TileId(1), 2, (0, 0));
        let b = Tile::new(TileId(2), 2, (0, 0));
        let c = Tile::new(TileId(3), 2, (4, 0));

        assert_eq!(Grid::from_tiles([a, b]), Err(GameError::DuplicateTile));
        assert_eq!(Grid::from_tiles([c]), Err(GameError::InvalidCoords));
        assert_eq!(Grid::from_tiles([a]).unwrap().find(TileId(1)), Some(a));
    }

    #[test]
    fn empty_cells_are_row_major() {
        let grid = grid([[2, 2, 2, 2], [2, 0, 2, 2], [2, 2, 2, 2], [2, 2, 2, 0]]);

        assert_eq!(grid.empty_cells(), vec![(1, 1), (3, 3)]);
    }

    #[test]
    fn terminal_requires_full_grid_without_equal_neighbors() {
        let stuck = grid([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        let mergeable_down = grid([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [2, 8, 16, 32]]);
        let with_gap = grid([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 0]]);

        assert!(stuck.is_terminal());
        assert!(!mergeable_down.is_terminal());
        assert!(!with_gap.is_terminal());
        assert!(!Grid::empty().is_terminal());
    }

    #[test]
    fn from_values_rejects_tiles_past_the_largest() {
        let rows = [[1 << 31, 1 << 31, 0, 0], [0; 4], [0; 4], [0; 4]];

        let result = Grid::from_values(rows, &mut RandomSpawner::new(0, 0.1));

        assert_eq!(result, Err(GameError::InvalidTileValue(1 << 31)));
    }

    #[test]
    fn largest_tiles_side_by_side_are_terminal_when_full() {
        let max = MAX_TILE_VALUE;
        let rows = [[max, max, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]];

        assert!(grid(rows).is_terminal());
    }

    #[test]
    fn serde_goes_through_the_tile_list() {
        let grid = grid([[2, 0, 0, 4], [0; 4], [0, 8, 0, 0], [0; 4]]);

        let json = serde_json::to_string(&grid).unwrap();

        assert_eq!(serde_json::from_str::<Grid>(&json).unwrap(), grid);
    }

    #[test]
    fn deserializing_rejects_grids_that_break_invariants() {
        let ndarray_shaped =
            r#"{"cells":{"v":1,"dim":[1,1],"data":[{"id":1,"value":2,"row":0,"col":0}]}}"#;
        let off_board = r#"[{"id":1,"value":2,"row":0,"col":4}]"#;
        let shared_cell =
            r#"[{"id":1,"value":2,"row":0,"col":0},{"id":2,"value":4,"row":0,"col":0}]"#;
        let bad_value = r#"[{"id":1,"value":6,"row":0,"col":0}]"#;

        for json in [ndarray_shaped, off_board, shared_cell, bad_value] {
            assert!(serde_json::from_str::<Grid>(json).is_err(), "{json}");
        }
    }

    #[test]
    fn tile_at_validates_coords() {
        let grid = grid([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);

        assert_eq!(grid.tile_at((0, 0)).unwrap().map(|tile| tile.value), Some(2));
        assert_eq!(grid.tile_at((0, 4)), Err(GameError::InvalidCoords));
    }
}
