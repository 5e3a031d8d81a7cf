use rand::prelude::*;

use super::*;

/// Seeded spawner: uniform cell choice, [`BONUS_VALUE`] with a fixed probability and a private id
/// counter that restarts with every reset.
#[derive(Clone, Debug)]
pub struct RandomSpawner {
    rng: SmallRng,
    last_id: u32,
    four_probability: f64,
}

impl RandomSpawner {
    pub fn new(seed: u64, four_probability: f64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            last_id: 0,
            four_probability: sanitize_probability(four_probability),
        }
    }

    pub fn from_config(seed: u64, config: &GameConfig) -> Self {
        Self::new(seed, config.four_probability)
    }

    /// Re-seeds the generator and restarts ids at 1.
    pub fn reset(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
        self.last_id = 0;
    }

    /// How many ids were handed out since the last reset.
    pub fn issued_ids(&self) -> u32 {
        self.last_id
    }

    pub fn four_probability(&self) -> f64 {
        self.four_probability
    }
}

impl TileSpawner for RandomSpawner {
    fn next_id(&mut self) -> TileId {
        self.last_id += 1;
        TileId(self.last_id)
    }

    fn spawn_value(&mut self) -> u32 {
        if self.rng.random_bool(self.four_probability) {
            BONUS_VALUE
        } else {
            BASE_VALUE
        }
    }

    fn pick_cell(&mut self, empty: &[Coord2]) -> Option<Coord2> {
        if empty.is_empty() {
            return None;
        }
        Some(empty[self.rng.random_range(0..empty.len())])
    }
}

fn sanitize_probability(probability: f64) -> f64 {
    if probability.is_nan() {
        log::warn!("Spawn probability is NaN, fallback to {}", DEFAULT_FOUR_PROBABILITY);
        DEFAULT_FOUR_PROBABILITY
    } else {
        probability.clamp(0.0, 1.0)
    }
}
