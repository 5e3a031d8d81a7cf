use alloc::string::ToString;
use core::fmt;
use core::str::FromStr;

use crate::*;

impl Direction {
    /// Maps a keyboard key name to a direction: arrow keys, `wasd` and `hjkl`.
    pub fn from_key(key: &str) -> Option<Self> {
        use Direction::*;

        Some(match key {
            "ArrowUp" | "w" | "W" | "k" | "K" => Up,
            "ArrowDown" | "s" | "S" | "j" | "J" => Down,
            "ArrowLeft" | "a" | "A" | "h" | "H" => Left,
            "ArrowRight" | "d" | "D" | "l" | "L" => Right,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        use Direction::*;

        match self {
            Up => "up",
            Down => "down",
            Left => "left",
            Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = GameError;

    fn from_str(text: &str) -> Result<Self> {
        let text = text.trim();
        Direction::ALL
            .into_iter()
            .find(|direction| direction.as_str().eq_ignore_ascii_case(text))
            .ok_or_else(|| GameError::UnknownDirection(text.to_string()))
    }
}

/// Turns a displacement into a direction along its dominant axis, if it is longer than
/// `threshold`. Screen coordinates: `y` grows downward.
pub fn classify_swipe(dx: f32, dy: f32, threshold: f32) -> Option<Direction> {
    let (abs_dx, abs_dy) = (dx.abs(), dy.abs());
    if abs_dx.max(abs_dy) <= threshold {
        return None;
    }

    Some(if abs_dx > abs_dy {
        if dx > 0.0 { Direction::Right } else { Direction::Left }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    })
}

/// Follows one touch gesture from start to end.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SwipeTracker {
    threshold: f32,
    start: Option<(f32, f32)>,
    end: Option<(f32, f32)>,
}

impl SwipeTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            start: None,
            end: None,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.swipe_threshold)
    }

    pub fn touch_start(&mut self, x: f32, y: f32) {
        self.end = None;
        self.start = Some((x, y));
    }

    pub fn touch_move(&mut self, x: f32, y: f32) {
        self.end = Some((x, y));
    }

    /// Finishes the gesture, yielding a direction for a long enough swipe. A touch that never
    /// moved yields nothing. The tracker is ready for the next gesture afterwards.
    pub fn touch_end(&mut self) -> Option<Direction> {
        let (start, end) = (self.start.take()?, self.end.take()?);
        let direction = classify_swipe(end.0 - start.0, end.1 - start.1, self.threshold);
        log::trace!("Swipe from {:?} to {:?} classified as {:?}", start, end, direction);
        direction
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_keys_map_to_directions() {
        assert_eq!(Direction::from_key("ArrowUp"), Some(Direction::Up));
        assert_eq!(Direction::from_key("ArrowDown"), Some(Direction::Down));
        assert_eq!(Direction::from_key("ArrowLeft"), Some(Direction::Left));
        assert_eq!(Direction::from_key("ArrowRight"), Some(Direction::Right));
        assert_eq!(Direction::from_key("h"), Some(Direction::Left));
        assert_eq!(Direction::from_key("Enter"), None);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("UP".parse::<Direction>(), Ok(Direction::Up));
        assert_eq!(" right ".parse::<Direction>(), Ok(Direction::Right));
        assert_eq!(
            "sideways".parse::<Direction>(),
            Err(GameError::UnknownDirection("sideways".to_string()))
        );
        for direction in Direction::ALL {
            assert_eq!(direction.to_string().parse::<Direction>(), Ok(direction));
        }
    }

    #[test]
    fn short_swipes_are_ignored() {
        assert_eq!(classify_swipe(30.0, 0.0, 30.0), None);
        assert_eq!(classify_swipe(-10.0, 25.0, 30.0), None);
    }

    #[test]
    fn dominant_axis_wins() {
        assert_eq!(classify_swipe(40.0, 10.0, 30.0), Some(Direction::Right));
        assert_eq!(classify_swipe(-40.0, 39.0, 30.0), Some(Direction::Left));
        assert_eq!(classify_swipe(5.0, 31.0, 30.0), Some(Direction::Down));
        assert_eq!(classify_swipe(5.0, -31.0, 30.0), Some(Direction::Up));
        // equal magnitudes fall to the vertical axis
        assert_eq!(classify_swipe(50.0, -50.0, 30.0), Some(Direction::Up));
    }

    #[test]
    fn tracker_needs_movement_and_resets() {
        let mut tracker = SwipeTracker::default();

        tracker.touch_start(100.0, 100.0);
        assert_eq!(tracker.touch_end(), None);

        tracker.touch_start(100.0, 100.0);
        tracker.touch_move(110.0, 140.0);
        tracker.touch_move(120.0, 180.0);
        assert_eq!(tracker.touch_end(), Some(Direction::Down));
        assert_eq!(tracker.touch_end(), None);
    }

    #[test]
    fn tracker_uses_configured_threshold() {
        let config = GameConfig::new(0.1, 100, 500, 80.0);
        let mut tracker = SwipeTracker::from_config(&config);

        tracker.touch_start(0.0, 0.0);
        tracker.touch_move(-60.0, 0.0);
        assert_eq!(tracker.touch_end(), None);

        tracker.touch_start(0.0, 0.0);
        tracker.touch_move(-90.0, 0.0);
        assert_eq!(tracker.touch_end(), Some(Direction::Left));
    }
}
