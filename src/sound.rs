//! Pop sound synthesis
//!
//! The pop is a short burst of white noise with a quadratic decay, pushed
//! through a highpass filter and an exponential gain envelope. Sample
//! generation lives here so it runs (and is tested) off the web; the audio
//! graph itself is in `audio` (wasm only).

use rand::Rng;
use thiserror::Error;

/// Burst length (seconds)
pub const POP_DURATION_SECS: f64 = 0.06;
/// Extra time the source keeps running past the envelope (seconds)
pub const POP_TAIL_SECS: f64 = 0.02;
/// Highpass cutoff (Hz)
pub const POP_HIGHPASS_HZ: f32 = 1000.0;
/// Gain at the start of the envelope
pub const POP_GAIN_START: f32 = 0.22;
/// Gain the envelope ramps down to
pub const POP_GAIN_END: f32 = 0.001;

/// Audio failures. The game never surfaces these to the player.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SoundError {
    /// No audio context could be created (unsupported or blocked)
    #[error("audio context unavailable: {0}")]
    Unavailable(String),
    /// Building or starting the node graph failed
    #[error("audio graph failed: {0}")]
    Graph(String),
}

/// Number of samples in one pop at `sample_rate`
pub fn pop_len(sample_rate: f32) -> usize {
    (sample_rate as f64 * POP_DURATION_SECS).round().max(1.0) as usize
}

/// Quadratic decay applied to sample `i` of `n`
#[inline]
pub fn decay(i: usize, n: usize) -> f32 {
    let t = 1.0 - i as f32 / n as f32;
    t * t
}

/// Decaying white noise, one channel
pub fn synthesize_pop<R: Rng>(rng: &mut R, sample_rate: f32) -> Vec<f32> {
    let n = pop_len(sample_rate);
    (0..n)
        .map(|i| (rng.random::<f32>() * 2.0 - 1.0) * decay(i, n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_pop_len() {
        assert_eq!(pop_len(48_000.0), 2880);
        assert_eq!(pop_len(44_100.0), 2646);
    }

    #[test]
    fn test_decay_endpoints() {
        assert_eq!(decay(0, 100), 1.0);
        assert!((decay(50, 100) - 0.25).abs() < 1e-6);
        assert!(decay(99, 100) < 0.001);
    }

    #[test]
    fn test_samples_bounded_by_envelope() {
        let mut rng = Pcg32::seed_from_u64(42);
        let samples = synthesize_pop(&mut rng, 48_000.0);
        assert_eq!(samples.len(), 2880);
        for (i, s) in samples.iter().enumerate() {
            assert!(s.abs() <= decay(i, samples.len()) + 1e-6);
        }
    }

    #[test]
    fn test_tail_is_quieter_than_head() {
        let mut rng = Pcg32::seed_from_u64(7);
        let samples = synthesize_pop(&mut rng, 48_000.0);
        let energy = |s: &[f32]| s.iter().map(|x| x * x).sum::<f32>();
        let quarter = samples.len() / 4;
        assert!(energy(&samples[..quarter]) > energy(&samples[samples.len() - quarter..]));
    }
}
