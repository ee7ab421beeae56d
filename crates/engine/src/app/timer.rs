use std::time::{Duration, Instant};

/// Self-rescheduling repeat timer driving the sprite animation. Each expiry
/// re-arms the next deadline by one interval, indefinitely; the frame loop
/// has no other re-entry point that could restart it. A stalled loop yields
/// one tick per elapsed interval rather than dropping them, keeping every
/// sprite's frame parity in lockstep with wall time.
#[derive(Debug)]
pub struct AnimationTimer {
    interval: Duration,
    next_due: Instant,
}

impl AnimationTimer {
    /// `interval` must be non-zero; config validation enforces this before a
    /// timer is ever built.
    pub fn new(interval: Duration, now: Instant) -> Self {
        debug_assert!(!interval.is_zero());
        Self {
            interval,
            next_due: now + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of intervals that elapsed since the last call, advancing the
    /// deadline past `now`.
    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        let mut ticks = 0;
        while now >= self.next_due {
            self.next_due += self.interval;
            ticks += 1;
        }
        ticks
    }
}
