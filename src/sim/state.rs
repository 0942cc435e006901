//! Game state and core entity types

use std::fmt;

use crate::color::Rgb;

/// Identity of a balloon for the lifetime of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BalloonId(pub u32);

impl fmt::Display for BalloonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A balloon as rolled by the spawner
#[derive(Debug, Clone, PartialEq)]
pub struct Balloon {
    pub id: BalloonId,
    /// Diameter (px)
    pub size_px: i32,
    /// Left edge as a percentage of the play area width
    pub left_percent: i32,
    pub color: Rgb,
    /// Time to float from the bottom edge to fully off the top (ms)
    pub rise_ms: i32,
}

impl Balloon {
    /// Particles released when popped: one per 10px of diameter, capped
    pub fn particle_count(&self, max: u32) -> u32 {
        let n = (self.size_px as f32 / 10.0).round().max(0.0) as u32;
        n.min(max)
    }
}

/// Score, clock and run flag for the current round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    pub score: u32,
    pub time_left_secs: i32,
    /// True from `start` until `end`
    pub running: bool,
    /// Timers suspended while the page is hidden
    pub paused: bool,
}

impl GameState {
    /// Fresh running round with `round_secs` on the clock
    pub fn new_round(round_secs: i32) -> Self {
        Self {
            score: 0,
            time_left_secs: round_secs,
            running: true,
            paused: false,
        }
    }

    /// Time ran out
    pub fn is_expired(&self) -> bool {
        self.time_left_secs <= 0
    }
}
