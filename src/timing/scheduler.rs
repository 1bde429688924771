use std::thread;
use std::time::{Duration, Instant};

use crate::foundation::error::{PrismError, PrismResult};

/// Source of frame timestamps, in milliseconds.
///
/// `next_frame` waits for (or simulates) the next display refresh and returns its timestamp.
pub trait FrameScheduler {
    /// Current time without advancing.
    fn now(&self) -> f64;

    /// Advance to the next refresh and return its timestamp.
    fn next_frame(&mut self) -> f64;
}

/// Deterministic clock advancing by a fixed step per frame. Never sleeps.
#[derive(Clone, Debug)]
pub struct FixedStepScheduler {
    now_ms: f64,
    step_ms: f64,
}

impl FixedStepScheduler {
    /// Clock starting at `start_ms`, advancing `step_ms` per frame.
    pub fn new(start_ms: f64, step_ms: f64) -> PrismResult<Self> {
        if !start_ms.is_finite() {
            return Err(PrismError::config("scheduler start time must be finite"));
        }
        if !step_ms.is_finite() || step_ms <= 0.0 {
            return Err(PrismError::config(format!(
                "frame step must be finite and > 0, got {step_ms}"
            )));
        }
        Ok(Self { now_ms: start_ms, step_ms })
    }

    /// Clock starting at zero with one step per frame at `fps`.
    pub fn from_fps(fps: f64) -> PrismResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(PrismError::config(format!("fps must be > 0, got {fps}")));
        }
        Self::new(0.0, 1000.0 / fps)
    }

    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }
}

impl FrameScheduler for FixedStepScheduler {
    fn now(&self) -> f64 {
        self.now_ms
    }

    fn next_frame(&mut self) -> f64 {
        self.now_ms += self.step_ms;
        self.now_ms
    }
}

/// Wall clock that sleeps until the next refresh interval.
#[derive(Clone, Debug)]
pub struct RealtimeScheduler {
    origin: Instant,
    interval: Duration,
    next_deadline: Instant,
}

impl RealtimeScheduler {
    /// Scheduler ticking at `fps` refreshes per second.
    pub fn new(fps: f64) -> PrismResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(PrismError::config(format!("fps must be > 0, got {fps}")));
        }
        let origin = Instant::now();
        let interval = Duration::from_secs_f64(1.0 / fps);
        Ok(Self {
            origin,
            interval,
            next_deadline: origin + interval,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl FrameScheduler for RealtimeScheduler {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn next_frame(&mut self) -> f64 {
        let now = Instant::now();
        if now < self.next_deadline {
            thread::sleep(self.next_deadline - now);
            self.next_deadline += self.interval;
        } else {
            // Missed refreshes are dropped, not replayed.
            self.next_deadline = now + self.interval;
        }
        self.now()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timing/scheduler.rs"]
mod tests;
