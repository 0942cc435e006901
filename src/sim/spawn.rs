//! Balloon spawner
//!
//! Rolls size, position, color and rise time for each new balloon and hands
//! out unique ids.

use rand::Rng;

use super::state::{Balloon, BalloonId};
use crate::consts::PALETTE;
use crate::rand_range;
use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct BalloonSpawner {
    next_id: u32,
}

impl Default for BalloonSpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl BalloonSpawner {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Roll a new balloon
    pub fn spawn<R: Rng>(&mut self, rng: &mut R, tuning: &Tuning) -> Balloon {
        let id = BalloonId(self.next_id);
        self.next_id += 1;

        let size = tuning.balloon_size_px;
        let left = tuning.balloon_left_percent;
        let rise = tuning.balloon_rise_ms;
        Balloon {
            id,
            size_px: rand_range(rng, size.min, size.max),
            left_percent: rand_range(rng, left.min, left.max),
            color: PALETTE[rng.random_range(0..PALETTE.len())],
            rise_ms: rand_range(rng, rise.min, rise.max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_ids_are_unique() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut spawner = BalloonSpawner::new();
        let tuning = Tuning::default();
        let a = spawner.spawn(&mut rng, &tuning);
        let b = spawner.spawn(&mut rng, &tuning);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_every_palette_color_shows_up() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut spawner = BalloonSpawner::new();
        let tuning = Tuning::default();
        let seen: std::collections::HashSet<_> =
            (0..500).map(|_| spawner.spawn(&mut rng, &tuning).color).collect();
        assert_eq!(seen.len(), PALETTE.len());
    }

    proptest! {
        #[test]
        fn rolls_stay_in_range(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let tuning = Tuning::default();
            let b = BalloonSpawner::new().spawn(&mut rng, &tuning);
            prop_assert!(tuning.balloon_size_px.contains(b.size_px));
            prop_assert!(tuning.balloon_left_percent.contains(b.left_percent));
            prop_assert!(tuning.balloon_rise_ms.contains(b.rise_ms));
            prop_assert!(PALETTE.contains(&b.color));
        }
    }
}
