use crate::*;
pub use random::*;

mod random;

/// Source of everything non-deterministic in a move: new tile ids, spawned values and spawn
/// positions.
pub trait TileSpawner {
    /// Allocates a fresh tile id, never handed out before by this spawner since its last reset.
    fn next_id(&mut self) -> TileId;

    /// Value for a newly spawned tile, either [`BASE_VALUE`] or [`BONUS_VALUE`].
    fn spawn_value(&mut self) -> u32;

    /// Picks one of `empty` uniformly, `None` when there is nowhere to spawn.
    fn pick_cell(&mut self, empty: &[Coord2]) -> Option<Coord2>;
}
