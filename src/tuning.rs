//! Game balance knobs
//!
//! Defaults reproduce the classic 30 second round. A page can override any
//! subset of fields with a JSON blob; missing fields keep their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tuning failed to load
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Inclusive integer range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub min: i32,
    pub max: i32,
}

impl Span {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: i32) -> bool {
        v >= self.min && v <= self.max
    }
}

/// Game balance configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Round ===
    /// Seconds on the clock at start
    pub round_secs: i32,
    /// Countdown tick period (ms)
    pub countdown_ms: u32,

    // === Spawn scheduler ===
    /// First spawn period (ms)
    pub spawn_initial_ms: u32,
    /// Period reduction applied after every spawn (ms)
    pub spawn_step_ms: u32,
    /// Period never drops below this (ms)
    pub spawn_floor_ms: u32,

    // === Balloons ===
    /// Balloon diameter (px)
    pub balloon_size_px: Span,
    /// Horizontal position (% of play area width)
    pub balloon_left_percent: Span,
    /// Time to float off screen (ms)
    pub balloon_rise_ms: Span,

    // === Effects ===
    /// Pop ring lifetime (ms)
    pub ring_lifetime_ms: u32,
    /// Ring border blend toward white
    pub ring_tint: f32,
    /// Particle lifetime (ms)
    pub particle_lifetime_ms: u32,
    /// Upper bound on particles per pop
    pub max_particles: u32,

    // === Pause behaviour ===
    /// Restart the spawn scheduler when the tab comes back to the foreground.
    /// Off by default: only the countdown resumes.
    pub resume_spawner_on_visible: bool,

    /// Fixed RNG seed (otherwise seeded from the clock)
    pub seed: Option<u64>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            round_secs: 30,
            countdown_ms: 1000,

            spawn_initial_ms: 900,
            spawn_step_ms: 8,
            spawn_floor_ms: 350,

            balloon_size_px: Span::new(48, 120),
            balloon_left_percent: Span::new(6, 92),
            balloon_rise_ms: Span::new(4500, 12000),

            ring_lifetime_ms: 420,
            ring_tint: 0.6,
            particle_lifetime_ms: 800,
            max_particles: 12,

            resume_spawner_on_visible: false,
            seed: None,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON override
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check ranges and periods are usable
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.round_secs <= 0 {
            return Err(TuningError::Invalid(format!(
                "round_secs must be positive, got {}",
                self.round_secs
            )));
        }
        if self.countdown_ms == 0 || self.spawn_floor_ms == 0 {
            return Err(TuningError::Invalid("timer periods must be positive".into()));
        }
        if self.spawn_floor_ms > self.spawn_initial_ms {
            return Err(TuningError::Invalid(format!(
                "spawn_floor_ms ({}) exceeds spawn_initial_ms ({})",
                self.spawn_floor_ms, self.spawn_initial_ms
            )));
        }
        for (name, span) in [
            ("balloon_size_px", self.balloon_size_px),
            ("balloon_left_percent", self.balloon_left_percent),
            ("balloon_rise_ms", self.balloon_rise_ms),
        ] {
            if span.min > span.max {
                return Err(TuningError::Invalid(format!(
                    "{name}: min {} > max {}",
                    span.min, span.max
                )));
            }
        }
        if self.balloon_size_px.min <= 0 || self.balloon_rise_ms.min <= 0 {
            return Err(TuningError::Invalid("balloon size and rise time must be positive".into()));
        }
        Ok(())
    }

    /// Load the page's `<script id="tuning">` override (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("tuning"))
            .and_then(|el| el.text_content());

        if let Some(json) = json {
            match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning override");
                    return tuning;
                }
                Err(e) => log::warn!("Ignoring tuning override: {e}"),
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Native: `BALLOON_POP_TUNING` points at a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var("BALLOON_POP_TUNING") else {
            return Self::default();
        };
        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| TuningError::Invalid(format!("{path}: {e}")))
            .and_then(|json| Self::from_json(&json));
        match parsed {
            Ok(tuning) => {
                log::info!("Loaded tuning from {path}");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning override: {e}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let t = Tuning::default();
        assert!(t.validate().is_ok());
        assert_eq!(t.round_secs, 30);
        assert_eq!(t.spawn_initial_ms, 900);
        assert_eq!(t.spawn_floor_ms, 350);
        assert!(!t.resume_spawner_on_visible);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let t = Tuning::from_json(r#"{ "round_secs": 10, "seed": 7 }"#).unwrap();
        assert_eq!(t.round_secs, 10);
        assert_eq!(t.seed, Some(7));
        assert_eq!(t.spawn_step_ms, 8);
        assert_eq!(t.balloon_rise_ms, Span::new(4500, 12000));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(Tuning::from_json("{ nope"), Err(TuningError::Parse(_))));
    }

    #[test]
    fn test_rejects_inverted_span() {
        let err = Tuning::from_json(r#"{ "balloon_size_px": { "min": 100, "max": 50 } }"#);
        assert!(matches!(err, Err(TuningError::Invalid(_))));
    }

    #[test]
    fn test_rejects_floor_above_initial() {
        let t = Tuning {
            spawn_floor_ms: 1000,
            ..Default::default()
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_span_contains() {
        let s = Span::new(6, 92);
        assert!(s.contains(6) && s.contains(92));
        assert!(!s.contains(5) && !s.contains(93));
    }
}
