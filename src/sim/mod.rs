//! Game rules
//!
//! Everything here is host-agnostic: no DOM, no real timers, seeded RNG only.
//! The platform layer feeds events in and renders what comes out.

pub mod effects;
pub mod game;
pub mod schedule;
pub mod spawn;
pub mod state;

pub use effects::{Particle, Ring};
pub use game::GameLoop;
pub use schedule::{Countdown, SpawnScheduler, spawn_period};
pub use spawn::BalloonSpawner;
pub use state::{Balloon, BalloonId, GameState};
