use crate::animation::ease::Easing;

/// Once this little time (ms) remains, a transition snaps to its target and ends.
pub const SNAP_THRESHOLD_MS: f64 = 50.0;

/// Direction of travel of the slide strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Towards higher indices.
    Forward,
    /// Towards lower indices.
    Backward,
}

/// Whether a transition is running.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    /// At rest on `current`.
    Idle,
    /// Running until `end_ms`.
    Animating {
        /// Timestamp (ms) at which the transition is due to end.
        end_ms: f64,
    },
}

/// Navigation state of one layer.
///
/// Values are immutable; every transition step produces a new state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlideState {
    /// Target (or resting) slide index.
    pub current: usize,
    /// Index before the last accepted `go_to`.
    pub previous: usize,
    /// Number of slides the running transition spans. `1` at rest.
    pub offset: usize,
    pub phase: Phase,
}

impl Default for SlideState {
    fn default() -> Self {
        Self {
            current: 0,
            previous: 0,
            offset: 1,
            phase: Phase::Idle,
        }
    }
}

/// What to draw for one frame of a running transition.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePlan {
    /// Time left until the transition ends (ms, may be negative once overdue).
    pub remaining_ms: f64,
    /// Eased strip position, in slide units.
    pub progress: f64,
    pub direction: Direction,
    /// Slides to draw, in draw order.
    pub indices: Vec<usize>,
    /// This is the last frame; the transition settles after drawing it.
    pub snap: bool,
}

impl SlideState {
    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Animating { .. })
    }

    /// Direction implied by `previous -> current`.
    pub fn direction(&self) -> Direction {
        if self.current > self.previous {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    /// Start a transition to `target` at `now_ms`.
    ///
    /// Returns `None` (state unchanged) for the current index, an index outside
    /// `0..slide_count`, or while a transition is already running.
    pub fn begin(
        self,
        target: usize,
        slide_count: usize,
        now_ms: f64,
        duration_ms: f64,
    ) -> Option<Self> {
        if self.is_animating() || target == self.current || target >= slide_count {
            return None;
        }
        Some(Self {
            current: target,
            previous: self.current,
            offset: target.abs_diff(self.current),
            phase: Phase::Animating {
                end_ms: now_ms + duration_ms,
            },
        })
    }

    /// Plan the frame at `now_ms`; `None` when idle.
    ///
    /// Normalized remaining time is clamped to `[0, 1]` before easing. The strip position is
    /// `current - eased * offset` going forward and `current + eased * offset` going backward, so
    /// it starts on `previous` and converges on `current` as the remaining time drains.
    pub fn plan(&self, now_ms: f64, duration_ms: f64, easing: &dyn Easing) -> Option<FramePlan> {
        let Phase::Animating { end_ms } = self.phase else {
            return None;
        };
        let remaining_ms = end_ms - now_ms;
        let t = (remaining_ms / duration_ms).clamp(0.0, 1.0);
        let eased = easing.ease(t);
        // A misbehaving easing must not poison the strip position.
        let eased = if eased.is_finite() { eased } else { 0.0 };

        let offset = self.offset as f64;
        let current = self.current as f64;
        let direction = self.direction();
        let (progress, indices) = match direction {
            Direction::Forward => (
                current - eased * offset,
                (0..=self.offset).map(|i| self.current - i).collect(),
            ),
            Direction::Backward => (
                current + eased * offset,
                (0..=self.offset).map(|i| self.current + i).collect(),
            ),
        };

        Some(FramePlan {
            remaining_ms,
            progress,
            direction,
            indices,
            snap: remaining_ms < SNAP_THRESHOLD_MS,
        })
    }

    /// Resting state after the snap frame.
    pub fn settle(self) -> Self {
        Self {
            offset: 1,
            phase: Phase::Idle,
            ..self
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/transition.rs"]
mod tests;
