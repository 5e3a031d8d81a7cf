use alloc::string::String;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Invalid tile value {0}, tiles hold powers of two from 2 to 131072")]
    InvalidTileValue(u32),
    #[error("Two tiles share the same cell or id")]
    DuplicateTile,
    #[error("Unknown direction {0:?}")]
    UnknownDirection(String),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Snapshot refers to a tile that is not on its grid")]
    InconsistentSnapshot,
    #[error("Serialization failed: {0}")]
    Serialization(String),
    #[error("Best score storage failed: {0}")]
    Storage(String),
}

pub type Result<T> = core::result::Result<T, GameError>;
