use serde::{Deserialize, Serialize};

use crate::*;

/// Durable home of the best score, read once when a session starts and written on every new best.
pub trait BestScoreStore {
    fn load(&mut self) -> Result<u32>;
    fn save(&mut self, best_score: u32) -> Result<()>;
}

/// On-disk shape of the stored best score.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBest {
    pub best_score: u32,
}

/// Keeps the best score in memory, for tests and hosts that persist elsewhere.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    best_score: u32,
    saves: u32,
}

impl MemoryStore {
    pub fn new(best_score: u32) -> Self {
        Self { best_score, saves: 0 }
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn save_count(&self) -> u32 {
        self.saves
    }
}

impl BestScoreStore for MemoryStore {
    fn load(&mut self) -> Result<u32> {
        Ok(self.best_score)
    }

    fn save(&mut self, best_score: u32) -> Result<()> {
        self.best_score = best_score;
        self.saves += 1;
        Ok(())
    }
}

#[cfg(feature = "std")]
pub use file::JsonFileStore;

#[cfg(feature = "std")]
mod file {
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};
    use std::string::ToString;

    use super::*;

    /// Stores `{"best_score": n}` in a JSON file. A missing file reads as a best score of 0.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct JsonFileStore {
        path: PathBuf,
    }

    impl JsonFileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl BestScoreStore for JsonFileStore {
        fn load(&mut self) -> Result<u32> {
            let text = match std::fs::read_to_string(&self.path) {
                Ok(text) => text,
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    log::debug!("No best score stored at {}", self.path.display());
                    return Ok(0);
                }
                Err(err) => return Err(GameError::Storage(err.to_string())),
            };
            let stored: StoredBest =
                serde_json::from_str(&text).map_err(|err| GameError::Storage(err.to_string()))?;
            Ok(stored.best_score)
        }

        fn save(&mut self, best_score: u32) -> Result<()> {
            let text = serde_json::to_string(&StoredBest { best_score })
                .map_err(|err| GameError::Storage(err.to_string()))?;
            std::fs::write(&self.path, text).map_err(|err| GameError::Storage(err.to_string()))
        }
    }

}
