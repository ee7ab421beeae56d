use std::time::{Duration, Instant};

/// Periodic frame-rate readout; the loop logs each snapshot through tracing
/// instead of drawing an on-screen meter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStatsSnapshot {
    pub fps: f32,
    pub anim_ticks_per_second: f32,
    pub frame_time_ms: f32,
}

#[derive(Debug)]
pub(crate) struct FrameStats {
    interval_start: Instant,
    interval: Duration,
    frames: u32,
    anim_ticks: u32,
    frame_time_sum: Duration,
}

impl FrameStats {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval_start: Instant::now(),
            interval,
            frames: 0,
            anim_ticks: 0,
            frame_time_sum: Duration::ZERO,
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration) {
        self.frames = self.frames.saturating_add(1);
        self.frame_time_sum = self.frame_time_sum.saturating_add(frame_dt);
    }

    pub(crate) fn record_anim_tick(&mut self) {
        self.anim_ticks = self.anim_ticks.saturating_add(1);
    }

    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<FrameStatsSnapshot> {
        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed < self.interval {
            return None;
        }

        let elapsed_seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = if self.frames == 0 {
            0.0
        } else {
            (self.frame_time_sum.as_secs_f32() / self.frames as f32) * 1000.0
        };

        let snapshot = FrameStatsSnapshot {
            fps: self.frames as f32 / elapsed_seconds,
            anim_ticks_per_second: self.anim_ticks as f32 / elapsed_seconds,
            frame_time_ms,
        };

        self.interval_start = now;
        self.frames = 0;
        self.anim_ticks = 0;
        self.frame_time_sum = Duration::ZERO;

        Some(snapshot)
    }
}
