//! Pop effects: a ring and a burst of particles
//!
//! Only positions, colors and lifetimes are computed here. The display layer
//! animates the elements and removes them once `lifetime_ms` has passed.

use glam::Vec2;
use rand::Rng;

use crate::color::Rgb;
use crate::consts::*;
use crate::rand_range;
use crate::tuning::Tuning;

/// Expanding ring centered on the pop
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    /// Top-left corner relative to the play area (px)
    pub top_left: Vec2,
    pub size: f32,
    pub border: Rgb,
    pub lifetime_ms: u32,
}

/// A single dot flying away from the pop
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Top-left corner relative to the play area (px)
    pub top_left: Vec2,
    pub color: Rgb,
    /// Displacement the entrance animation travels to (px, y down)
    pub dx: i32,
    pub dy: i32,
    pub lifetime_ms: u32,
}

/// Ring at `center`, tinted toward white
pub fn ring(center: Vec2, color: Rgb, tuning: &Tuning) -> Ring {
    Ring {
        top_left: center - Vec2::splat(RING_SIZE / 2.0),
        size: RING_SIZE,
        border: color.lighten(tuning.ring_tint),
        lifetime_ms: tuning.ring_lifetime_ms,
    }
}

/// `count` particles at `center`, each in an independent random direction
pub fn particles<R: Rng>(
    rng: &mut R,
    center: Vec2,
    color: Rgb,
    count: u32,
    tuning: &Tuning,
) -> Vec<Particle> {
    let top_left = center - Vec2::splat(PARTICLE_SIZE / 2.0);
    (0..count)
        .map(|_| {
            let angle = rng.random::<f32>() * std::f32::consts::TAU;
            let dist = rand_range(rng, PARTICLE_MIN_DIST, PARTICLE_MAX_DIST) as f32;
            let lift = rand_range(rng, PARTICLE_MIN_LIFT, PARTICLE_MAX_LIFT) as f32;
            Particle {
                top_left,
                color,
                dx: (angle.cos() * dist).round() as i32,
                dy: (angle.sin() * dist - lift).round() as i32,
                lifetime_ms: tuning.particle_lifetime_ms,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_ring_is_centered_and_tinted() {
        let r = ring(Vec2::new(100.0, 50.0), Rgb::BLACK, &Tuning::default());
        assert_eq!(r.top_left, Vec2::new(90.0, 40.0));
        assert_eq!(r.size, 20.0);
        assert_eq!(r.border.to_hex(), "#999999");
        assert_eq!(r.lifetime_ms, 420);
    }

    #[test]
    fn test_particle_count_and_lifetime() {
        let mut rng = Pcg32::seed_from_u64(5);
        let ps = particles(&mut rng, Vec2::new(10.0, 10.0), Rgb::WHITE, 7, &Tuning::default());
        assert_eq!(ps.len(), 7);
        for p in &ps {
            assert_eq!(p.top_left, Vec2::new(6.0, 6.0));
            assert_eq!(p.lifetime_ms, 800);
        }
        assert!(particles(&mut rng, Vec2::ZERO, Rgb::WHITE, 0, &Tuning::default()).is_empty());
    }

    #[test]
    fn test_particle_displacement_bounds() {
        let mut rng = Pcg32::seed_from_u64(99);
        let ps = particles(&mut rng, Vec2::ZERO, Rgb::WHITE, 2000, &Tuning::default());
        for p in ps {
            assert!(p.dx.abs() <= PARTICLE_MAX_DIST);
            // Lift always pulls the target up by at least the minimum
            assert!(p.dy <= PARTICLE_MAX_DIST - PARTICLE_MIN_LIFT);
            assert!(p.dy >= -(PARTICLE_MAX_DIST + PARTICLE_MAX_LIFT));
        }
    }

    #[test]
    fn test_particles_spread_in_all_directions() {
        let mut rng = Pcg32::seed_from_u64(1234);
        let ps = particles(&mut rng, Vec2::ZERO, Rgb::WHITE, 400, &Tuning::default());
        assert!(ps.iter().any(|p| p.dx > 20));
        assert!(ps.iter().any(|p| p.dx < -20));
        assert!(ps.iter().any(|p| p.dy < -20));
    }
}
