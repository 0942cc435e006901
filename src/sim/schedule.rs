//! Timer state machines
//!
//! The host owns the real timers; these only remember the active handle and,
//! for spawning, the current period.

use crate::platform::TimerHandle;
use crate::tuning::Tuning;

/// Period of the `n`-th scheduled spawn (n = 0 is the first)
pub fn spawn_period(n: u32, tuning: &Tuning) -> u32 {
    let reduction = tuning.spawn_step_ms.saturating_mul(n);
    tuning
        .spawn_initial_ms
        .saturating_sub(reduction)
        .max(tuning.spawn_floor_ms)
}

/// Self-accelerating one-shot spawn timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnScheduler {
    /// Period used for the next scheduling
    pub period_ms: u32,
    pub handle: Option<TimerHandle>,
    step_ms: u32,
    floor_ms: u32,
}

impl SpawnScheduler {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            period_ms: tuning.spawn_initial_ms,
            handle: None,
            step_ms: tuning.spawn_step_ms,
            floor_ms: tuning.spawn_floor_ms,
        }
    }

    /// Shorten the period after a spawn, never below the floor
    pub fn advance(&mut self) -> u32 {
        self.period_ms = self.period_ms.saturating_sub(self.step_ms).max(self.floor_ms);
        self.period_ms
    }

    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }
}

/// Repeating countdown timer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Countdown {
    pub handle: Option<TimerHandle>,
}

impl Countdown {
    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_spawn_period_ramp() {
        let t = Tuning::default();
        assert_eq!(spawn_period(0, &t), 900);
        assert_eq!(spawn_period(1, &t), 892);
        assert_eq!(spawn_period(10, &t), 820);
        // 900 - 8 * 69 = 348 -> floor
        assert_eq!(spawn_period(68, &t), 356);
        assert_eq!(spawn_period(69, &t), 350);
        assert_eq!(spawn_period(u32::MAX, &t), 350);
    }

    #[test]
    fn test_scheduler_floor() {
        let t = Tuning::default();
        let mut s = SpawnScheduler::new(&t);
        for _ in 0..200 {
            s.advance();
        }
        assert_eq!(s.period_ms, 350);
        assert!(!s.is_armed());
    }

    proptest! {
        #[test]
        fn scheduler_matches_closed_form(n in 0u32..300) {
            let t = Tuning::default();
            let mut s = SpawnScheduler::new(&t);
            for _ in 0..n {
                s.advance();
            }
            prop_assert_eq!(s.period_ms, spawn_period(n, &t));
            prop_assert_eq!(s.period_ms, 350.max(900i64 - 8 * n as i64) as u32);
        }

        #[test]
        fn period_never_increases(n in 0u32..300) {
            let t = Tuning::default();
            prop_assert!(spawn_period(n + 1, &t) <= spawn_period(n, &t));
        }
    }
}
