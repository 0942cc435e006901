//! Game loop: round lifecycle, timers and pop handling
//!
//! Owns the score/clock state and the two periodic actions. Everything the
//! player sees goes through the [`Host`].

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::effects;
use super::schedule::{Countdown, SpawnScheduler};
use super::spawn::BalloonSpawner;
use super::state::{Balloon, BalloonId, GameState};
use crate::platform::{Host, HostEvent, TimerHandle, TimerKind};
use crate::tuning::Tuning;

pub struct GameLoop<H: Host> {
    host: H,
    tuning: Tuning,
    rng: Pcg32,
    state: GameState,
    spawner: BalloonSpawner,
    spawn: SpawnScheduler,
    countdown: Countdown,
    /// Balloons on screen, popped ones are removed immediately
    live: BTreeMap<BalloonId, Balloon>,
}

impl<H: Host> GameLoop<H> {
    pub fn new(host: H, tuning: Tuning, seed: u64) -> Self {
        let seed = tuning.seed.unwrap_or(seed);
        let spawn = SpawnScheduler::new(&tuning);
        Self {
            host,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            state: GameState::default(),
            spawner: BalloonSpawner::new(),
            spawn,
            countdown: Countdown::default(),
            live: BTreeMap::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Balloons that can still be popped or float away
    pub fn live_balloons(&self) -> impl Iterator<Item = &Balloon> {
        self.live.values()
    }

    /// Period the next spawn will be scheduled with
    pub fn spawn_period_ms(&self) -> u32 {
        self.spawn.period_ms
    }

    pub fn is_spawner_armed(&self) -> bool {
        self.spawn.is_armed()
    }

    pub fn is_countdown_armed(&self) -> bool {
        self.countdown.is_armed()
    }

    /// Begin a round. Ignored while one is running.
    pub fn start(&mut self) {
        if self.state.running {
            log::debug!("start ignored: round already running");
            return;
        }

        self.cancel_timers();
        self.state = GameState::new_round(self.tuning.round_secs);
        self.live.clear();
        self.host.clear_surface();
        self.host.hide_game_over();
        self.host.set_score(self.state.score);
        self.host.set_time_left(self.state.time_left_secs);

        self.spawn = SpawnScheduler::new(&self.tuning);
        self.arm_spawner();
        self.arm_countdown();

        log::info!("Round started ({}s)", self.state.time_left_secs);
    }

    /// Finish the round and show the final score. Runs at most once per round.
    pub fn end(&mut self) {
        if !self.state.running {
            return;
        }
        self.state.running = false;
        self.state.paused = false;
        self.cancel_timers();
        self.host.freeze_balloons();
        self.host.show_game_over(self.state.score);

        log::info!("Round over, score {}", self.state.score);
    }

    /// Route a host event to its handler
    pub fn handle(&mut self, event: HostEvent) {
        match event {
            HostEvent::Timer(kind, handle) => self.on_timer(kind, handle),
            HostEvent::Pop(id) => {
                self.pop(id);
            }
            HostEvent::RiseEnded(id) => self.balloon_expired(id),
        }
    }

    /// A timer fired. Firings from anything but the active timer of that
    /// kind are dropped.
    pub fn on_timer(&mut self, kind: TimerKind, handle: TimerHandle) {
        if !self.state.running {
            return;
        }
        match kind {
            TimerKind::Spawn => {
                if self.spawn.handle != Some(handle) {
                    log::trace!("stale spawn timer {handle:?} ignored");
                    return;
                }
                self.spawn.handle = None;
                self.spawn_balloon();
                self.spawn.advance();
                self.arm_spawner();
            }
            TimerKind::Countdown => {
                if self.countdown.handle != Some(handle) {
                    log::trace!("stale countdown timer {handle:?} ignored");
                    return;
                }
                self.tick_countdown();
            }
        }
    }

    /// Pop a balloon. Returns false if the round is over or the balloon is gone.
    pub fn pop(&mut self, id: BalloonId) -> bool {
        if !self.state.running {
            return false;
        }
        let Some(balloon) = self.live.remove(&id) else {
            log::trace!("balloon {id} already gone");
            return false;
        };

        if let Err(e) = self.host.play_pop() {
            log::debug!("Pop sound skipped: {e}");
        }

        self.state.score += 1;
        self.host.set_score(self.state.score);

        match self.host.balloon_center(id) {
            Some(center) => {
                    let ring = effects::ring(center, balloon.color, &self.tuning);
                self.host.show_ring(&ring);

                let count = balloon.particle_count(self.tuning.max_particles);
                for particle in
                    effects::particles(&mut self.rng, center, balloon.color, count, &self.tuning)
                {
                    self.host.show_particle(&particle);
                }
            }
            None => {
                log::warn!("Balloon {id} has no position on the surface, pop effects skipped")
            }
        }

        self.host.remove_balloon(id);
        log::debug!("Popped balloon {id}, score {}", self.state.score);
        true
    }

    /// A balloon floated away without being popped
    pub fn balloon_expired(&mut self, id: BalloonId) {
        if self.live.remove(&id).is_some() {
            log::trace!("balloon {id} escaped");
        }
        self.host.remove_balloon(id);
    }

    /// Page hidden: suspend both timers. Page visible again: restart the
    /// countdown, and the spawner only if `resume_spawner_on_visible` is set.
    pub fn visibility_changed(&mut self, hidden: bool) {
        if !self.state.running {
            return;
        }
        if hidden {
            self.cancel_timers();
            self.state.paused = true;
            log::info!("Paused (page hidden)");
            return;
        }

        if !self.countdown.is_armed() {
            self.arm_countdown();
            if self.tuning.resume_spawner_on_visible && !self.spawn.is_armed() {
                self.arm_spawner();
            }
            self.state.paused = false;
            log::info!("Resumed (page visible)");
        }
    }

    fn spawn_balloon(&mut self) {
        let balloon = self.spawner.spawn(&mut self.rng, &self.tuning);
        self.host.show_balloon(&balloon);
        log::trace!(
            "spawned balloon {} ({}px at {}%, {}ms)",
            balloon.id,
            balloon.size_px,
            balloon.left_percent,
            balloon.rise_ms
        );
        self.live.insert(balloon.id, balloon);
    }

    fn tick_countdown(&mut self) {
        self.state.time_left_secs -= 1;
        self.host.set_time_left(self.state.time_left_secs);
        if self.state.is_expired() {
            self.end();
        }
    }

    fn arm_spawner(&mut self) {
        self.spawn.handle = self.host.schedule(TimerKind::Spawn, self.spawn.period_ms);
    }

    fn arm_countdown(&mut self) {
        self.countdown.handle = self.host.schedule(TimerKind::Countdown, self.tuning.countdown_ms);
        if self.countdown.handle.is_none() {
            log::warn!("Countdown could not be armed, round clock stopped");
        }
    }

    fn cancel_timers(&mut self) {
        if let Some(handle) = self.spawn.handle.take() {
            self.host.cancel(handle);
        }
        if let Some(handle) = self.countdown.handle.take() {
            self.host.cancel(handle);
        }
    }
}
