#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

use alloc::format;
use alloc::string::ToString;
use core::num::NonZeroU32;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use engine::*;
pub use error::*;
pub use input::*;
pub use session::*;
pub use snapshot::*;
pub use spawner::*;
pub use store::*;
pub use tile::*;
pub use types::*;

mod board;
mod engine;
mod error;
mod input;
mod session;
mod snapshot;
mod spawner;
mod store;
mod tile;
mod types;

pub const DEFAULT_FOUR_PROBABILITY: f64 = 0.1;
pub const DEFAULT_PULSE_EVERY: NonZeroU32 = NonZeroU32::new(100).unwrap();
pub const DEFAULT_CELEBRATE_EVERY: NonZeroU32 = NonZeroU32::new(500).unwrap();
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 30.0;

/// Tuning knobs of a session. None of them change the merge rules.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Chance that a spawned tile is a 4 rather than a 2.
    pub four_probability: f64,
    /// Score step that fires the pulse milestone.
    pub pulse_every: NonZeroU32,
    /// Score step that fires the celebration milestone.
    pub celebrate_every: NonZeroU32,
    /// Minimum swipe distance, in input units, for a gesture to count as a move.
    pub swipe_threshold: f32,
}

impl GameConfig {
    pub const fn new_unchecked(
        four_probability: f64,
        pulse_every: NonZeroU32,
        celebrate_every: NonZeroU32,
        swipe_threshold: f32,
    ) -> Self {
        Self {
            four_probability,
            pulse_every,
            celebrate_every,
            swipe_threshold,
        }
    }

    pub fn new(
        four_probability: f64,
        pulse_every: u32,
        celebrate_every: u32,
        swipe_threshold: f32,
    ) -> Self {
        let four_probability = if four_probability.is_nan() {
            DEFAULT_FOUR_PROBABILITY
        } else {
            four_probability.clamp(0.0, 1.0)
        };
        let pulse_every = NonZeroU32::new(pulse_every).unwrap_or(NonZeroU32::MIN);
        let celebrate_every = NonZeroU32::new(celebrate_every).unwrap_or(NonZeroU32::MIN);
        let swipe_threshold = if swipe_threshold.is_nan() {
            DEFAULT_SWIPE_THRESHOLD
        } else {
            swipe_threshold.max(0.0)
        };
        Self::new_unchecked(four_probability, pulse_every, celebrate_every, swipe_threshold)
    }

    /// Parses a JSON config, missing fields falling back to defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|err| GameError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.four_probability) {
            return Err(GameError::InvalidConfig(format!(
                "four_probability {} is outside 0..=1",
                self.four_probability
            )));
        }
        if self.swipe_threshold.is_nan() || self.swipe_threshold < 0.0 {
            return Err(GameError::InvalidConfig(format!(
                "swipe_threshold {} must be non-negative",
                self.swipe_threshold
            )));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(
            DEFAULT_FOUR_PROBABILITY,
            DEFAULT_PULSE_EVERY,
            DEFAULT_CELEBRATE_EVERY,
            DEFAULT_SWIPE_THRESHOLD,
        )
    }
}
