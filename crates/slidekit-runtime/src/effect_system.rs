#![forbid(unsafe_code)]

//! Effect execution observability.
//!
//! - **Tracing spans**: every executed [`Effect`](crate::machine::Effect)
//!   runs inside a `drawer.effect` span carrying `effect_kind` and
//!   `duration_us`.
//! - **Counters**: `effects_executed_total` and
//!   `transitions_completed_total`, process-wide and monotonic.

use std::sync::atomic::{AtomicU64, Ordering};
use web_time::Instant;

// ---------------------------------------------------------------------------
// Monotonic counters
// ---------------------------------------------------------------------------

static EFFECTS_EXECUTED_TOTAL: AtomicU64 = AtomicU64::new(0);
static TRANSITIONS_COMPLETED_TOTAL: AtomicU64 = AtomicU64::new(0);

/// Total effects executed by every drawer in the process.
#[must_use]
pub fn effects_executed_total() -> u64 {
    EFFECTS_EXECUTED_TOTAL.load(Ordering::Relaxed)
}

/// Total transitions that reached their completion handler.
#[must_use]
pub fn transitions_completed_total() -> u64 {
    TRANSITIONS_COMPLETED_TOTAL.load(Ordering::Relaxed)
}

// ---------------------------------------------------------------------------
// Instrumentation
// ---------------------------------------------------------------------------

/// Run `f` as one effect of kind `effect_kind`.
pub fn trace_effect<F, R>(effect_kind: &'static str, f: F) -> R
where
    F: FnOnce() -> R,
{
    EFFECTS_EXECUTED_TOTAL.fetch_add(1, Ordering::Relaxed);

    let start = Instant::now();
    let span = tracing::debug_span!(
        "drawer.effect",
        effect_kind = effect_kind,
        duration_us = tracing::field::Empty,
    );
    let _entered = span.enter();

    let result = f();
    let duration_us = start.elapsed().as_micros() as u64;
    span.record("duration_us", duration_us);

    tracing::trace!(
        target: "slidekit.effect",
        effect_kind = effect_kind,
        duration_us = duration_us,
        "effect executed"
    );

    result
}

/// Record a completed transition.
pub fn record_transition_completed(kind: &'static str, token: u64) {
    TRANSITIONS_COMPLETED_TOTAL.fetch_add(1, Ordering::Relaxed);
    tracing::debug!(
        target: "slidekit.transition",
        kind = kind,
        token = token,
        "transition completed"
    );
}
