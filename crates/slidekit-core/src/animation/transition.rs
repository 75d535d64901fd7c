#![forbid(unsafe_code)]

//! Immutable description of one offset animation.

use std::time::Duration;

use super::spring::Spring;

/// Everything needed to run one animation: how long, how springy, and
/// which horizontal offsets it travels between.
///
/// A spec never changes once a transition has started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionSpec {
    pub duration: Duration,
    /// Damping ratio in `(0, 1]`.
    pub damping_ratio: f64,
    pub start_offset_x: f64,
    pub end_offset_x: f64,
}

impl TransitionSpec {
    /// Create a spec.
    #[must_use]
    pub const fn new(
        duration: Duration,
        damping_ratio: f64,
        start_offset_x: f64,
        end_offset_x: f64,
    ) -> Self {
        Self {
            duration,
            damping_ratio,
            start_offset_x,
            end_offset_x,
        }
    }

    /// Whether the transition completes without intermediate frames.
    #[inline]
    pub fn is_instant(&self) -> bool {
        self.duration.is_zero()
    }

    /// Offset at `progress` in `[0, 1]`.
    #[must_use]
    pub fn offset_at(&self, progress: f64) -> f64 {
        let p = progress.clamp(0.0, 1.0);
        if p >= 1.0 {
            return self.end_offset_x;
        }
        self.start_offset_x + (self.end_offset_x - self.start_offset_x) * p
    }

    /// Normalized spring that drives this transition's progress.
    #[must_use]
    pub fn spring(&self) -> Spring {
        Spring::normalized().with_damping_ratio(self.damping_ratio, self.duration)
    }
}
