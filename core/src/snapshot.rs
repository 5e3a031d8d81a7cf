use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::*;

/// Read-only picture of a session for renderers: tiles keyed by id plus the one-shot animation
/// triggers of the last move.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub tiles: Vec<Tile>,
    pub score: u32,
    pub best_score: u32,
    pub terminal: bool,
    pub spawned: Option<TileId>,
    pub merged: Vec<Merge>,
    pub milestones: Milestones,
}

impl SessionSnapshot {
    pub fn from_session<S: BestScoreStore>(session: &Session<S>) -> Self {
        Self {
            tiles: session.grid().tiles().collect(),
            score: session.score(),
            best_score: session.best_score(),
            terminal: session.is_terminal(),
            spawned: session.spawned_tile().map(|tile| tile.id),
            merged: session.merges().to_vec(),
            milestones: session.milestones(),
        }
    }

    /// Rebuilds the grid the snapshot was taken from.
    pub fn grid(&self) -> Result<Grid> {
        Grid::from_tiles(self.tiles.iter().copied())
    }

    pub fn validate(&self) -> Result<()> {
        let grid = self.grid()?;
        if let Some(id) = self.spawned {
            grid.find(id).ok_or(GameError::InconsistentSnapshot)?;
        }
        for merge in &self.merged {
            match grid.tile_at(merge.position)? {
                Some(tile) if tile.id == merge.tile => {}
                _ => return Err(GameError::InconsistentSnapshot),
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|err| GameError::Serialization(err.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let snapshot: Self =
            serde_json::from_str(text).map_err(|err| GameError::Serialization(err.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn played_session() -> Session<MemoryStore> {
        let mut session = Session::new(GameConfig::default(), 21, MemoryStore::new(10));
        for direction in Direction::ALL.iter().cycle().take(12) {
            session.apply_move(*direction);
        }
        session
    }

    #[test]
    fn from_session_mirrors_state() {
        let session = played_session();

        let snapshot = SessionSnapshot::from_session(&session);

        assert_eq!(snapshot.score, session.score());
        assert_eq!(snapshot.best_score, session.best_score());
        assert_eq!(snapshot.tiles.len(), session.grid().tile_count());
        assert_eq!(snapshot.spawned, session.spawned_tile().map(|tile| tile.id));
        assert_eq!(snapshot.grid().as_ref(), Ok(session.grid()));
        assert_eq!(snapshot.validate(), Ok(()));
    }

    #[test]
    fn json_keeps_everything() {
        let snapshot = SessionSnapshot::from_session(&played_session());

        let text = snapshot.to_json().unwrap();

        assert_eq!(SessionSnapshot::from_json(&text), Ok(snapshot));
    }

    #[test]
    fn validate_rejects_dangling_merge() {
        let mut snapshot = SessionSnapshot::from_session(&played_session());
        snapshot.merged.push(Merge {
            position: (0, 0),
            tile: TileId(u32::MAX),
            consumed: [TileId(1), TileId(2)],
        });

        assert_eq!(snapshot.validate(), Err(GameError::InconsistentSnapshot));
    }
}
