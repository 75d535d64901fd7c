#![forbid(unsafe_code)]

//! Animation primitives for drawer motion.
//!
//! - [`Spring`]: damped harmonic oscillator, stepped with real frame deltas.
//! - [`TransitionSpec`]: the immutable description of one offset animation.
//!
//! Both are driven by the runtime's transition runner; nothing here owns a
//! clock or a surface.

pub mod spring;
pub mod transition;

use std::time::Duration;

pub use spring::Spring;
pub use transition::TransitionSpec;

/// Something that advances with time and eventually completes.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has settled.
    fn is_complete(&self) -> bool;

    /// Normalized value in `[0.0, 1.0]`.
    fn value(&self) -> f64;
}
