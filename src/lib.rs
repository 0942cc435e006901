//! Balloon Pop - A timed balloon popping browser game
//!
//! Core modules:
//! - `sim`: Host-agnostic game rules (state, spawning, effects, timers)
//! - `platform`: Display surface + timer abstraction (web and headless hosts)
//! - `color`: Hex color helpers for effect tints
//! - `sound`: Pop sound synthesis
//! - `tuning`: Data-driven game balance

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod color;
pub mod platform;
pub mod sim;
pub mod sound;
pub mod tuning;

pub use color::{ColorError, Rgb};
pub use sound::SoundError;
pub use tuning::{Tuning, TuningError};

use rand::Rng;

/// Game configuration constants
pub mod consts {
    use crate::color::Rgb;

    /// Balloon palette, one is picked uniformly per balloon
    pub const PALETTE: [Rgb; 6] = [
        Rgb::new(0xFF, 0x6B, 0x6B),
        Rgb::new(0xFF, 0xD9, 0x3D),
        Rgb::new(0x6B, 0xCB, 0x77),
        Rgb::new(0x4D, 0x96, 0xFF),
        Rgb::new(0xB3, 0x88, 0xFF),
        Rgb::new(0xFF, 0x9F, 0x1C),
    ];

    /// Pop ring edge length (px)
    pub const RING_SIZE: f32 = 20.0;
    /// Particle dot edge length (px)
    pub const PARTICLE_SIZE: f32 = 8.0;

    /// Particle travel distance range (px)
    pub const PARTICLE_MIN_DIST: i32 = 18;
    pub const PARTICLE_MAX_DIST: i32 = 80;
    /// Extra upward drift added to every particle (px)
    pub const PARTICLE_MIN_LIFT: i32 = 6;
    pub const PARTICLE_MAX_LIFT: i32 = 30;
}

/// Uniform integer in `[min, max]` (both inclusive)
///
/// Swapped bounds are tolerated so a bad tuning file cannot panic the game.
#[inline]
pub fn rand_range<R: Rng>(rng: &mut R, min: i32, max: i32) -> i32 {
    if min >= max {
        return min.min(max);
    }
    rng.random_range(min..=max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_rand_range_degenerate() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(rand_range(&mut rng, 5, 5), 5);
        assert_eq!(rand_range(&mut rng, 9, 3), 3);
    }

    proptest! {
        #[test]
        fn rand_range_stays_inclusive(seed in any::<u64>(), min in -1000i32..1000, span in 0i32..500) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let v = rand_range(&mut rng, min, min + span);
            prop_assert!(v >= min && v <= min + span);
        }
    }
}
