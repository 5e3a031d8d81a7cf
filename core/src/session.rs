use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::*;

/// Spacing between the seeds of consecutive games of one session.
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// Nothing moved, or the game was already over.
    NoChange,
    Moved,
    /// Tiles moved and left the grid without any possible move.
    GameOver,
}

impl MoveOutcome {
    pub const fn has_update(self) -> bool {
        use MoveOutcome::*;
        match self {
            NoChange => false,
            Moved => true,
            GameOver => true,
        }
    }
}

/// One-shot signals derived from the score, for cosmetic effects only.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestones {
    /// The last move crossed a multiple of `pulse_every`.
    pub pulse: bool,
    /// The last move crossed a multiple of `celebrate_every`.
    pub celebration: bool,
    /// Celebrations fired since the game started.
    pub celebrations: u32,
}

/// Whether going from `old` to `new` passes a multiple of `every`.
pub const fn crosses_multiple(old: u32, new: u32, every: NonZeroU32) -> bool {
    old / every.get() < new / every.get()
}

/// A game in progress plus the best score carried across games.
///
/// The session is driven by one input source: every direction event becomes one
/// [`apply_move`](Session::apply_move) call that runs to completion.
#[derive(Clone, Debug)]
pub struct Session<S> {
    config: GameConfig,
    spawner: RandomSpawner,
    store: S,
    seed: u64,
    games_started: u64,
    grid: Grid,
    score: u32,
    best_score: u32,
    terminal: bool,
    spawned: Option<Coord2>,
    merges: MergeList,
    milestones: Milestones,
}

impl<S: BestScoreStore> Session<S> {
    /// Loads the best score from `store` and starts the first game.
    pub fn new(config: GameConfig, seed: u64, mut store: S) -> Self {
        let best_score = store.load().unwrap_or_else(|err| {
            log::warn!("Failed to load best score, starting from 0: {}", err);
            0
        });
        let mut session = Self {
            spawner: RandomSpawner::from_config(seed, &config),
            config,
            store,
            seed,
            games_started: 0,
            grid: Grid::empty(),
            score: 0,
            best_score,
            terminal: false,
            spawned: None,
            merges: MergeList::new(),
            milestones: Milestones::default(),
        };
        session.start();
        session
    }

    /// Begins a new game: fresh board, zero score, ids restarting at 1. The best score is kept.
    pub fn start(&mut self) {
        let game_seed = self.seed.wrapping_add(self.games_started.wrapping_mul(SEED_STRIDE));
        self.games_started += 1;
        self.spawner.reset(game_seed);

        self.grid = init_board(&mut self.spawner);
        self.score = 0;
        self.terminal = false;
        self.clear_transient();
        self.milestones = Milestones::default();
        log::debug!("Started game {} with seed {}", self.games_started, game_seed);
    }

    pub fn restart(&mut self) {
        self.start();
    }

    pub fn apply_move(&mut self, direction: Direction) -> MoveOutcome {
        if self.terminal {
            return MoveOutcome::NoChange;
        }

        let result = shift(&self.grid, direction, &mut self.spawner);
        if !result.moved {
            self.clear_transient();
            return MoveOutcome::NoChange;
        }

        let old_score = self.score;
        self.score = self.score.saturating_add(result.score_delta);
        self.update_milestones(old_score);
        if self.score > self.best_score {
            self.record_best();
        }

        self.grid = result.grid;
        self.spawned = result.spawned;
        self.merges = result.merges;
        self.terminal = is_terminal(&self.grid);

        if self.terminal {
            log::debug!("Game over with score {}", self.score);
            MoveOutcome::GameOver
        } else {
            MoveOutcome::Moved
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Tile spawned by the last accepted move, `None` after a rejected move or a fresh start.
    pub fn spawned_tile(&self) -> Option<Tile> {
        self.spawned.and_then(|coords| self.grid[coords])
    }

    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    pub fn merged_tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.merges.iter().filter_map(|merge| self.grid[merge.position])
    }

    pub fn milestones(&self) -> Milestones {
        self.milestones
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn clear_transient(&mut self) {
        self.spawned = None;
        self.merges.clear();
        self.milestones.pulse = false;
        self.milestones.celebration = false;
    }

    fn update_milestones(&mut self, old_score: u32) {
        self.milestones.pulse = crosses_multiple(old_score, self.score, self.config.pulse_every);
        self.milestones.celebration =
            crosses_multiple(old_score, self.score, self.config.celebrate_every);
        if self.milestones.celebration {
            self.milestones.celebrations += 1;
            log::debug!("Score {} crossed a celebration milestone", self.score);
        }
    }

    fn record_best(&mut self) {
        self.best_score = self.score;
        if let Err(err) = self.store.save(self.best_score) {
            log::warn!("Failed to store best score {}: {}", self.best_score, err);
        }
    }
}
