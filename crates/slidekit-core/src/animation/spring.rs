#![forbid(unsafe_code)]

//! Normalized damped spring driving transition progress.
//!
//! A drawer transition is described by a duration and a damping ratio, not
//! by raw physics constants. [`Spring::with_damping_ratio`] converts that
//! pair:
//!
//!   ω = SETTLE_RATE / (ζ × T),  k = ω²,  c = 2ζω
//!
//! so the envelope `e^(-ζωt)` is down to about 0.1% after `T`.
//!
//! The spring always travels from `0.0` to `1.0`. Each tick integrates with
//! semi-implicit Euler in sub-steps of at most 4ms.

use std::time::Duration;

use super::Animation;

const MAX_STEP_SECS: f64 = 0.004;

/// Distance from the target and speed below which the spring rests.
const REST_POSITION: f64 = 0.001;
const REST_VELOCITY: f64 = 0.01;

const MIN_DAMPING_RATIO: f64 = 0.05;

/// `ln(1000)`.
const SETTLE_RATE: f64 = 6.907_755;

/// A spring from `0.0` to `1.0`.
///
/// ```
/// use std::time::Duration;
/// use slidekit_core::animation::{Animation, Spring};
///
/// let mut spring = Spring::normalized()
///     .with_damping_ratio(1.0, Duration::from_millis(500));
/// for _ in 0..60 {
///     spring.tick(Duration::from_millis(16));
/// }
/// assert!(spring.value() > 0.99);
/// ```
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    stiffness: f64,
    damping: f64,
    at_rest: bool,
}

impl Spring {
    /// A spring at `0.0` heading for `1.0`, critically damped over roughly
    /// half a second.
    #[must_use]
    pub fn normalized() -> Self {
        Self {
            position: 0.0,
            velocity: 0.0,
            stiffness: 0.0,
            damping: 0.0,
            at_rest: false,
        }
        .with_damping_ratio(1.0, Duration::from_millis(500))
    }

    /// Derive stiffness and damping so a spring of damping `ratio` settles
    /// within `settle`. Non-finite ratios become `1.0`; tiny ratios and
    /// settle times are clamped.
    #[must_use]
    pub fn with_damping_ratio(mut self, ratio: f64, settle: Duration) -> Self {
        let ratio = if ratio.is_finite() {
            ratio.max(MIN_DAMPING_RATIO)
        } else {
            1.0
        };
        let omega = SETTLE_RATE / (ratio * settle.as_secs_f64().max(0.001));
        self.stiffness = omega * omega;
        self.damping = 2.0 * ratio * omega;
        self
    }

    /// Raw position; may exceed `1.0` while an underdamped spring overshoots.
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * self.stiffness.sqrt())
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let step = remaining.min(MAX_STEP_SECS);
            let acceleration =
                -self.stiffness * (self.position - 1.0) - self.damping * self.velocity;
            self.velocity += acceleration * step;
            self.position += self.velocity * step;
            remaining -= step;
        }
        if (self.position - 1.0).abs() < REST_POSITION && self.velocity.abs() < REST_VELOCITY {
            self.position = 1.0;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }

    /// Position clamped to `[0.0, 1.0]`.
    fn value(&self) -> f64 {
        self.position.clamp(0.0, 1.0)
    }
}
