use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Monotonic animation clock.
///
/// Elapsed time only moves forward: negative or non-finite steps are
/// dropped. While paused, wall-clock time is still consumed by [`tick`],
/// so resuming does not jump.
///
/// [`tick`]: FrameClock::tick
#[derive(Debug, Clone)]
pub struct FrameClock {
    elapsed: f32,
    frame: u64,
    paused: bool,
    time_scale: f32,
    last_instant: Option<Instant>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            frame: 0,
            paused: false,
            time_scale: 1.0,
            last_instant: None,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed animation time in seconds.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Number of steps taken so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Negative or non-finite scales are ignored.
    pub fn set_time_scale(&mut self, scale: f32) {
        if scale.is_finite() && scale >= 0.0 {
            self.time_scale = scale;
        } else {
            tracing::warn!(scale, "ignoring invalid time scale");
        }
    }

    /// Step by a fixed `dt` seconds. Returns the new elapsed time.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.frame += 1;
        if !(dt.is_finite() && dt >= 0.0) {
            tracing::trace!(dt, "dropping invalid clock step");
            return self.elapsed;
        }
        if !self.paused {
            let next = self.elapsed + dt * self.time_scale;
            if next.is_finite() {
                self.elapsed = next;
            }
        }
        self.elapsed
    }

    /// Step by the wall-clock time since the previous call, capped at
    /// `max_dt` so a stalled window does not fast-forward the animation.
    pub fn tick(&mut self, max_dt: f32) -> f32 {
        let now = Instant::now();
        let dt = self
            .last_instant
            .map(|last| (now - last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_instant = Some(now);
        self.advance(dt.min(max_dt))
    }
}

/// Rolling window of recent frame durations.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    samples: VecDeque<Duration>,
    capacity: usize,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(dt);
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }

    pub fn last(&self) -> Option<Duration> {
        self.samples.back().copied()
    }

    pub fn average(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        self.samples.iter().sum::<Duration>() / self.samples.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.samples.iter().copied().max().unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.samples.iter().copied().min().unwrap_or(Duration::ZERO)
    }

    /// Frames per second implied by the average duration, 0 when empty.
    pub fn fps(&self) -> f32 {
        let avg = self.average().as_secs_f32();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }
}
