//! Frame timing utilities

use std::time::{Duration, Instant};

/// Wall-clock timer that hands out per-frame deltas and tracks FPS.
///
/// The clock starts on its first delta, which is always zero.
pub struct Clock {
    last_tick: Option<Instant>,
    elapsed: Duration,
    frame_count: u64,
    fps_timer: Option<Instant>,
    fps: f32,
    fps_frame_count: u32,
}

impl Clock {
    /// Create a clock that starts on its first tick
    pub fn new() -> Self {
        Self {
            last_tick: None,
            elapsed: Duration::ZERO,
            frame_count: 0,
            fps_timer: None,
            fps: 0.0,
            fps_frame_count: 0,
        }
    }

    /// Create a clock whose first delta is measured from `start`
    pub fn starting_at(start: Instant) -> Self {
        Self {
            last_tick: Some(start),
            fps_timer: Some(start),
            ..Self::new()
        }
    }

    /// True once the first delta has been taken
    pub fn is_running(&self) -> bool {
        self.last_tick.is_some()
    }

    /// Seconds elapsed since the previous call (zero on the first one)
    pub fn get_delta(&mut self) -> f32 {
        self.get_delta_at(Instant::now())
    }

    /// Same as [`Clock::get_delta`] with an explicit "now"
    pub fn get_delta_at(&mut self, now: Instant) -> f32 {
        let last_tick = *self.last_tick.get_or_insert(now);
        let fps_timer = *self.fps_timer.get_or_insert(now);

        // Instants handed in out of order clamp to zero instead of panicking
        let delta = now.saturating_duration_since(last_tick);
        self.last_tick = Some(now);
        self.elapsed += delta;
        self.frame_count += 1;
        self.fps_frame_count += 1;

        let fps_elapsed = now.saturating_duration_since(fps_timer);
        if fps_elapsed >= Duration::from_secs(1) {
            self.fps = self.fps_frame_count as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = 0;
            self.fps_timer = Some(now);
        }

        delta.as_secs_f32()
    }

    /// Total time handed out as deltas so far
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Current FPS (updated every second)
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Number of deltas taken
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
