use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Two tiles folded into one during a move.
///
/// `tile` is the logical id of the new tile, which renderers use to key the merge animation, and
/// `position` is where that tile is stored in the resulting grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merge {
    pub position: Coord2,
    pub tile: TileId,
    pub consumed: [TileId; 2],
}

/// At most two merges per line.
pub type MergeList = SmallVec<[Merge; 2 * LINE_LEN]>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveResult {
    pub grid: Grid,
    pub score_delta: u32,
    pub moved: bool,
    pub spawned: Option<Coord2>,
    pub merges: MergeList,
}

impl MoveResult {
    fn rejected(grid: &Grid) -> Self {
        Self {
            grid: grid.clone(),
            score_delta: 0,
            moved: false,
            spawned: None,
            merges: MergeList::new(),
        }
    }

    pub fn spawned_tile(&self) -> Option<Tile> {
        self.spawned.and_then(|coords| self.grid.tile_at(coords).ok().flatten())
    }

    pub fn merged_tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.merges
            .iter()
            .filter_map(|merge| self.grid.tile_at(merge.position).ok().flatten())
    }
}

/// Fresh grid seeded with two random tiles.
pub fn init_board<S: TileSpawner + ?Sized>(spawner: &mut S) -> Grid {
    let mut grid = Grid::empty();
    for _ in 0..2 {
        spawn_tile(&mut grid, spawner);
    }
    log::debug!("Initialized board with {} tiles", grid.tile_count());
    grid
}

/// Slides every line of `grid` toward `direction`, merging equal neighbors once, then spawns a
/// tile if anything changed.
///
/// The input grid is left untouched; when nothing moves the result carries an identical grid, no
/// score and no spawn, and `spawner` is not consulted at all.
pub fn shift<S: TileSpawner + ?Sized>(
    grid: &Grid,
    direction: Direction,
    spawner: &mut S,
) -> MoveResult {
    let mut next = Grid::empty();
    let mut score_delta = 0;
    let mut moved = false;
    let mut merges = MergeList::new();

    for line in 0..GRID_SIZE {
        let cells = direction.line_cells(line);
        let before = cells.map(|coords| grid[coords]);
        let compacted = compact_line(&before, spawner);

        if compacted.moved {
            log::trace!("{:?} line {} changed, scored {}", direction, line, compacted.score);
        }
        moved |= compacted.moved;
        score_delta += compacted.score;

        for (tile, &coords) in compacted.tiles.iter().zip(&cells) {
            if let Some(tile) = tile {
                next.place(tile.placed_at(coords));
            }
        }
        merges.extend(compacted.merges.iter().map(|merge| Merge {
            position: cells[merge.slot],
            tile: merge.tile,
            consumed: merge.consumed,
        }));
    }

    if !moved {
        return MoveResult::rejected(grid);
    }
    debug_assert!(next.positions_consistent());

    let spawned = spawn_tile(&mut next, spawner);
    MoveResult {
        grid: next,
        score_delta,
        moved,
        spawned,
        merges,
    }
}

/// True when no direction can change the grid.
pub fn is_terminal(grid: &Grid) -> bool {
    grid.is_terminal()
}

/// Places one random tile on a random empty cell; a full grid is left as is.
fn spawn_tile<S: TileSpawner + ?Sized>(grid: &mut Grid, spawner: &mut S) -> Option<Coord2> {
    let empty = grid.empty_cells();
    let Some(coords) = spawner.pick_cell(&empty) else {
        log::warn!("No empty cell left, skipping spawn");
        return None;
    };
    let tile = Tile::new(spawner.next_id(), spawner.spawn_value(), coords);
    grid.place(tile);
    log::trace!("Spawned {} at {:?} with value {}", tile.id, coords, tile.value);
    Some(coords)
}

#[derive(Copy, Clone, Debug)]
struct LineMerge {
    slot: usize,
    tile: TileId,
    consumed: [TileId; 2],
}

#[derive(Debug)]
struct CompactedLine {
    tiles: [Option<Tile>; LINE_LEN],
    merges: SmallVec<[LineMerge; 2]>,
    score: u32,
    moved: bool,
}

/// Packs the tiles of one line toward slot 0, folding each adjacent equal pair into a new tile.
///
/// A new tile is never compared against the next original tile, so a tile takes part in at most
/// one merge per move.
fn compact_line<S: TileSpawner + ?Sized>(
    line: &[Option<Tile>; LINE_LEN],
    spawner: &mut S,
) -> CompactedLine {
    let mut tiles = [None; LINE_LEN];
    let mut merges = SmallVec::new();
    let mut score = 0;

    let mut remaining = line.iter().flatten().copied().peekable();
    let mut slot = 0;
    while let Some(tile) = remaining.next() {
        let placed = match remaining.next_if(|next| tile.merges_with(*next)) {
            Some(partner) => {
                let merged = Tile::new(spawner.next_id(), tile.value * 2, tile.position());
                score += merged.value;
                merges.push(LineMerge {
                    slot,
                    tile: merged.id,
                    consumed: [tile.id, partner.id],
                });
                merged
            }
            None => tile,
        };
        tiles[slot] = Some(placed);
        slot += 1;
    }

    let values = |cells: &[Option<Tile>; LINE_LEN]| cells.map(|cell| cell.map(|tile| tile.value));
    let moved = values(line) != values(&tiles);

    CompactedLine {
        tiles,
        merges,
        score,
        moved,
    }
}
