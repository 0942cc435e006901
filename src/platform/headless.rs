//! Headless host with a virtual clock
//!
//! Timers, balloon rises and effect lifetimes all run against a millisecond
//! counter that only moves when [`GameLoop::advance`] is called, so whole
//! rounds replay instantly and deterministically.

use std::collections::BTreeMap;

use glam::Vec2;

use super::{Host, HostEvent, TimerHandle, TimerKind};
use crate::sim::GameLoop;
use crate::sim::effects::{Particle, Ring};
use crate::sim::state::{Balloon, BalloonId};
use crate::sound::SoundError;

/// Default play area (px)
pub const AREA_SIZE: Vec2 = Vec2::new(800.0, 600.0);

#[derive(Debug, Clone)]
struct VirtualTimer {
    handle: TimerHandle,
    kind: TimerKind,
    period_ms: u32,
    due_ms: u64,
}

#[derive(Debug, Clone)]
struct OnScreenBalloon {
    balloon: Balloon,
    spawned_ms: u64,
    inert: bool,
}

/// Running totals for everything the host was asked to show
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessStats {
    pub balloons_shown: u32,
    pub rings_shown: u32,
    pub particles_shown: u32,
    pub sounds_played: u32,
    pub sounds_failed: u32,
    pub game_overs_shown: u32,
}

#[derive(Debug, Clone)]
pub struct HeadlessHost {
    now_ms: u64,
    next_handle: i32,
    area: Vec2,
    timers: Vec<VirtualTimer>,
    balloons: BTreeMap<BalloonId, OnScreenBalloon>,
    rings: Vec<(Ring, u64)>,
    particles: Vec<(Particle, u64)>,
    score_text: String,
    time_text: String,
    game_over: Option<u32>,
    audio_blocked: bool,
    timers_blocked: bool,
    stats: HeadlessStats,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new(AREA_SIZE)
    }
}

impl HeadlessHost {
    pub fn new(area: Vec2) -> Self {
        Self {
            now_ms: 0,
            next_handle: 1,
            area,
            timers: Vec::new(),
            balloons: BTreeMap::new(),
            rings: Vec::new(),
            particles: Vec::new(),
            score_text: String::new(),
            time_text: String::new(),
            game_over: None,
            audio_blocked: false,
            timers_blocked: false,
            stats: HeadlessStats::default(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Make `play_pop` fail like a browser without audio permission
    pub fn set_audio_blocked(&mut self, blocked: bool) {
        self.audio_blocked = blocked;
    }

    /// Make `schedule` fail like a browser refusing a timer
    pub fn set_timers_blocked(&mut self, blocked: bool) {
        self.timers_blocked = blocked;
    }

    pub fn stats(&self) -> &HeadlessStats {
        &self.stats
    }

    pub fn score_text(&self) -> &str {
        &self.score_text
    }

    pub fn time_text(&self) -> &str {
        &self.time_text
    }

    /// Final score if the end-of-game panel is visible
    pub fn game_over(&self) -> Option<u32> {
        self.game_over
    }

    pub fn balloons_on_screen(&self) -> usize {
        self.balloons.len()
    }

    pub fn effects_on_screen(&self) -> usize {
        self.rings.len() + self.particles.len()
    }

    pub fn armed_timers(&self, kind: TimerKind) -> usize {
        self.timers.iter().filter(|t| t.kind == kind).count()
    }

    /// Handle of the first armed timer of `kind`
    pub fn armed_handle(&self, kind: TimerKind) -> Option<TimerHandle> {
        self.timers.iter().find(|t| t.kind == kind).map(|t| t.handle)
    }

    /// Period of the armed timer of `kind`, if any
    pub fn timer_period(&self, kind: TimerKind) -> Option<u32> {
        self.timers.iter().find(|t| t.kind == kind).map(|t| t.period_ms)
    }

    /// Simulate a pointer-down on a balloon; frozen or missing balloons
    /// swallow the press
    pub fn press(&self, id: BalloonId) -> Option<HostEvent> {
        self.balloons
            .get(&id)
            .filter(|b| !b.inert)
            .map(|_| HostEvent::Pop(id))
    }

    /// Pop the next event due at or before `until_ms`, moving the clock to it
    pub fn next_event(&mut self, until_ms: u64) -> Option<HostEvent> {
        let timer = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.handle.0))
            .map(|(i, t)| (i, t.due_ms));
        let rise = self
            .balloons
            .values()
            .map(|b| (b.balloon.id, b.spawned_ms + b.balloon.rise_ms as u64))
            .filter(|(_, end)| *end <= until_ms)
            .min_by_key(|(id, end)| (*end, *id));

        let event = match (timer, rise) {
            (Some((i, due)), Some((_, end))) if due <= end => self.fire_timer(i),
            (Some((i, _)), None) => self.fire_timer(i),
            (_, Some((id, end))) => {
                self.settle(end);
                self.balloons.remove(&id);
                HostEvent::RiseEnded(id)
            }
            (None, None) => return None,
        };
        Some(event)
    }

    /// Move the clock forward, dropping expired effects
    pub fn settle(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
        let now = self.now_ms;
        self.rings.retain(|(_, expires)| *expires > now);
        self.particles.retain(|(_, expires)| *expires > now);
    }

    fn fire_timer(&mut self, index: usize) -> HostEvent {
        let due = self.timers[index].due_ms;
        self.settle(due);
        let kind = self.timers[index].kind;
        let handle = self.timers[index].handle;
        if kind.repeats() {
            let timer = &mut self.timers[index];
            timer.due_ms += timer.period_ms as u64;
        } else {
            self.timers.remove(index);
        }
        HostEvent::Timer(kind, handle)
    }
}

impl Host for HeadlessHost {
    fn schedule(&mut self, kind: TimerKind, period_ms: u32) -> Option<TimerHandle> {
        if self.timers_blocked {
            return None;
        }
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.timers.push(VirtualTimer {
            handle,
            kind,
            period_ms,
            due_ms: self.now_ms + period_ms as u64,
        });
        Some(handle)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.retain(|t| t.handle != handle);
    }

    fn clear_surface(&mut self) {
        self.balloons.clear();
        self.rings.clear();
        self.particles.clear();
    }

    fn show_balloon(&mut self, balloon: &Balloon) {
        self.stats.balloons_shown += 1;
        self.balloons.insert(
            balloon.id,
            OnScreenBalloon {
                balloon: balloon.clone(),
                spawned_ms: self.now_ms,
                inert: false,
            },
        );
    }

    fn remove_balloon(&mut self, id: BalloonId) {
        self.balloons.remove(&id);
    }

    fn balloon_center(&self, id: BalloonId) -> Option<Vec2> {
        let b = self.balloons.get(&id)?;
        let size = b.balloon.size_px as f32;
        let elapsed = self.now_ms.saturating_sub(b.spawned_ms) as f32;
        let progress = (elapsed / b.balloon.rise_ms as f32).clamp(0.0, 1.0);
        // Linear rise from just below the bottom edge to just above the top
        let top = self.area.y - progress * (self.area.y + size);
        let left = self.area.x * b.balloon.left_percent as f32 / 100.0;
        Some(Vec2::new(left + size / 2.0, top + size / 2.0))
    }

    fn freeze_balloons(&mut self) {
        for b in self.balloons.values_mut() {
            b.inert = true;
        }
    }

    fn show_ring(&mut self, ring: &Ring) {
        self.stats.rings_shown += 1;
        self.rings
            .push((ring.clone(), self.now_ms + ring.lifetime_ms as u64));
    }

    fn show_particle(&mut self, particle: &Particle) {
        self.stats.particles_shown += 1;
        self.particles
            .push((particle.clone(), self.now_ms + particle.lifetime_ms as u64));
    }

    fn set_score(&mut self, score: u32) {
        self.score_text = score.to_string();
    }

    fn set_time_left(&mut self, secs: i32) {
        self.time_text = secs.to_string();
    }

    fn show_game_over(&mut self, final_score: u32) {
        self.stats.game_overs_shown += 1;
        self.game_over = Some(final_score);
    }

    fn hide_game_over(&mut self) {
        self.game_over = None;
    }

    fn play_pop(&mut self) -> Result<(), SoundError> {
        if self.audio_blocked {
            self.stats.sounds_failed += 1;
            return Err(SoundError::Unavailable("blocked by autoplay policy".into()));
        }
        self.stats.sounds_played += 1;
        Ok(())
    }
}

impl GameLoop<HeadlessHost> {
    /// Run the virtual clock forward by `ms`, delivering every event due
    pub fn advance(&mut self, ms: u64) {
        let until = self.host().now_ms() + ms;
        while let Some(event) = self.host_mut().next_event(until) {
            self.handle(event);
        }
        self.host_mut().settle(until);
    }

    /// Press every balloon that is on screen, returning how many popped
    pub fn press_all(&mut self) -> usize {
        let ids: Vec<BalloonId> = self.live_balloons().map(|b| b.id).collect();
        let mut popped = 0;
        for id in ids {
            if let Some(HostEvent::Pop(id)) = self.host().press(id) {
                if self.pop(id) {
                    popped += 1;
                }
            }
        }
        popped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    fn balloon(id: u32, rise_ms: i32) -> Balloon {
        Balloon {
            id: BalloonId(id),
            size_px: 100,
            left_percent: 50,
            color: Rgb::WHITE,
            rise_ms,
        }
    }

    #[test]
    fn test_one_shot_and_repeating_timers() {
        let mut host = HeadlessHost::default();
        let spawn = host.schedule(TimerKind::Spawn, 900).unwrap();
        let countdown = host.schedule(TimerKind::Countdown, 1000).unwrap();
        assert_ne!(spawn, countdown);

        assert_eq!(host.next_event(5000), Some(HostEvent::Timer(TimerKind::Spawn, spawn)));
        assert_eq!(host.now_ms(), 900);
        assert_eq!(host.next_event(5000), Some(HostEvent::Timer(TimerKind::Countdown, countdown)));
        assert_eq!(host.next_event(5000), Some(HostEvent::Timer(TimerKind::Countdown, countdown)));
        assert_eq!(host.now_ms(), 2000);
        assert_eq!(host.armed_timers(TimerKind::Spawn), 0);
        assert_eq!(host.armed_timers(TimerKind::Countdown), 1);
    }

    #[test]
    fn test_blocked_timers_are_not_armed() {
        let mut host = HeadlessHost::default();
        host.set_timers_blocked(true);
        assert_eq!(host.schedule(TimerKind::Countdown, 1000), None);
        assert_eq!(host.armed_timers(TimerKind::Countdown), 0);
        assert_eq!(host.next_event(10_000), None);
    }

    #[test]
    fn test_cancel_disarms() {
        let mut host = HeadlessHost::default();
        let h = host.schedule(TimerKind::Countdown, 1000).unwrap();
        host.cancel(h);
        assert_eq!(host.next_event(10_000), None);
    }

    #[test]
    fn test_balloon_rises_and_ends() {
        let mut host = HeadlessHost::default();
        host.show_balloon(&balloon(1, 4000));

        let start = host.balloon_center(BalloonId(1)).unwrap();
        assert_eq!(start, Vec2::new(450.0, 650.0));

        host.settle(2000);
        let mid = host.balloon_center(BalloonId(1)).unwrap();
        assert!(mid.y < start.y);

        assert_eq!(host.next_event(10_000), Some(HostEvent::RiseEnded(BalloonId(1))));
        assert_eq!(host.now_ms(), 4000);
        assert_eq!(host.balloons_on_screen(), 0);
    }

    #[test]
    fn test_effects_expire() {
        let mut host = HeadlessHost::default();
        let ring = crate::sim::effects::ring(Vec2::ZERO, Rgb::BLACK, &Default::default());
        host.show_ring(&ring);
        host.settle(419);
        assert_eq!(host.effects_on_screen(), 1);
        host.settle(420);
        assert_eq!(host.effects_on_screen(), 0);
    }

    #[test]
    fn test_frozen_balloon_ignores_press() {
        let mut host = HeadlessHost::default();
        host.show_balloon(&balloon(3, 5000));
        assert_eq!(host.press(BalloonId(3)), Some(HostEvent::Pop(BalloonId(3))));
        host.freeze_balloons();
        assert_eq!(host.press(BalloonId(3)), None);
        assert_eq!(host.press(BalloonId(99)), None);
    }
}
