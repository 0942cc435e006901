//! Platform abstraction layer
//!
//! The game rules never touch the DOM or real timers directly. They drive a
//! [`Host`], which owns the display surface, the timer facility and audio,
//! and reports player/animation events back as [`HostEvent`]s.
//!
//! - `headless`: virtual clock + in-memory surface (tests, native binary)
//! - `web`: DOM elements, `setTimeout`/`setInterval`, Web Audio (wasm only)

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

use glam::Vec2;

use crate::sim::effects::{Particle, Ring};
use crate::sim::state::{Balloon, BalloonId};
use crate::sound::SoundError;

pub use headless::HeadlessHost;

/// Which periodic action a timer drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// One-shot; the game reschedules it with a shorter period after each firing
    Spawn,
    /// Repeats at a fixed period until cancelled
    Countdown,
}

impl TimerKind {
    pub fn repeats(self) -> bool {
        matches!(self, TimerKind::Countdown)
    }
}

/// Host-assigned timer id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub i32);

/// Something the host observed that the game must react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// A scheduled timer fired, tagged with the handle `schedule` returned
    Timer(TimerKind, TimerHandle),
    /// Pointer-down or touch-start landed on a balloon
    Pop(BalloonId),
    /// A balloon finished floating off screen
    RiseEnded(BalloonId),
}

/// Display surface, timers and audio as seen by the game loop
pub trait Host {
    /// Arm a timer; one-shot or repeating per [`TimerKind::repeats`].
    /// `None` if the host could not arm it.
    fn schedule(&mut self, kind: TimerKind, period_ms: u32) -> Option<TimerHandle>;
    /// Disarm a timer. Unknown handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);

    /// Remove every balloon and effect from the play area
    fn clear_surface(&mut self);
    /// Add a balloon and start its rise animation
    fn show_balloon(&mut self, balloon: &Balloon);
    /// Remove a balloon. Unknown ids are ignored.
    fn remove_balloon(&mut self, id: BalloonId);
    /// Current center of a balloon relative to the play area
    fn balloon_center(&self, id: BalloonId) -> Option<Vec2>;
    /// Leave balloons on screen but stop them reacting to the pointer
    fn freeze_balloons(&mut self);

    /// Show a ring; the host removes it after its lifetime
    fn show_ring(&mut self, ring: &Ring);
    /// Show a particle; the host removes it after its lifetime
    fn show_particle(&mut self, particle: &Particle);

    fn set_score(&mut self, score: u32);
    fn set_time_left(&mut self, secs: i32);
    fn show_game_over(&mut self, final_score: u32);
    fn hide_game_over(&mut self);

    /// Fire-and-forget pop sound
    fn play_pop(&mut self) -> Result<(), SoundError>;
}
