#![forbid(unsafe_code)]

//! Frame-driven transition runner.
//!
//! [`TransitionRunner::run`] returns immediately. Each [`tick`] advances
//! every running transition's spring by the frame delta, hands the
//! resulting progress to its `apply` callback and, once the transition has
//! settled, fires `on_complete` exactly once.
//!
//! # Invariants
//!
//! 1. Progress passed to `apply` never decreases and never exceeds `1.0`.
//! 2. The final `apply` call receives exactly `1.0`.
//! 3. `on_complete` runs on a later `tick` than `run`, never inside it.
//!    Zero-duration transitions apply `1.0` synchronously and complete on
//!    the next tick.
//! 4. A cancelled transition never completes.
//!
//! [`tick`]: TransitionRunner::tick

use std::collections::VecDeque;
use std::time::Duration;

use slidekit_core::animation::{Animation, Spring, TransitionSpec};

/// Progress callback, invoked with a value in `[0, 1]`.
pub type ApplyFn<C> = Box<dyn FnMut(&mut C, f64)>;

/// Completion callback.
pub type CompleteFn<C> = Box<dyn FnOnce(&mut C)>;

/// Handle for cancelling a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(u64);

impl TransitionId {
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

struct Running<C> {
    id: TransitionId,
    duration: Duration,
    elapsed: Duration,
    spring: Spring,
    progress: f64,
    apply: ApplyFn<C>,
    on_complete: CompleteFn<C>,
}

/// Runs spring transitions against a context `C`.
pub struct TransitionRunner<C> {
    next_id: u64,
    running: Vec<Running<C>>,
    settled: VecDeque<(TransitionId, CompleteFn<C>)>,
}

impl<C> std::fmt::Debug for TransitionRunner<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionRunner")
            .field("running", &self.running.len())
            .field("settled", &self.settled.len())
            .finish()
    }
}

impl<C> Default for TransitionRunner<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> TransitionRunner<C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            running: Vec::new(),
            settled: VecDeque::new(),
        }
    }

    /// Start a transition.
    pub fn run(
        &mut self,
        spec: TransitionSpec,
        ctx: &mut C,
        mut apply: impl FnMut(&mut C, f64) + 'static,
        on_complete: impl FnOnce(&mut C) + 'static,
    ) -> TransitionId {
        let id = TransitionId(self.next_id);
        self.next_id += 1;

        if spec.is_instant() {
            apply(ctx, 1.0);
            self.settled.push_back((id, Box::new(on_complete)));
            return id;
        }

        self.running.push(Running {
            id,
            duration: spec.duration,
            elapsed: Duration::ZERO,
            spring: spec.spring(),
            progress: 0.0,
            apply: Box::new(apply),
            on_complete: Box::new(on_complete),
        });
        id
    }

    /// Advance every transition by `dt`. Returns how many completed.
    pub fn tick(&mut self, ctx: &mut C, dt: Duration) -> usize {
        let mut fired = 0;
        while let Some((_, on_complete)) = self.settled.pop_front() {
            on_complete(ctx);
            fired += 1;
        }

        let running = std::mem::take(&mut self.running);
        for mut run in running {
            run.elapsed = run.elapsed.saturating_add(dt);
            run.spring.tick(dt);

            let settled = run.elapsed >= run.duration || run.spring.is_complete();
            let progress = if settled {
                1.0
            } else {
                run.spring.value().max(run.progress).min(1.0)
            };
            run.progress = progress;
            (run.apply)(ctx, progress);

            if progress >= 1.0 {
                (run.on_complete)(ctx);
                fired += 1;
            } else {
                self.running.push(run);
            }
        }
        fired
    }

    /// Drop a transition without completing it. Returns whether it existed.
    pub fn cancel(&mut self, id: TransitionId) -> bool {
        if let Some(index) = self.running.iter().position(|run| run.id == id) {
            self.running.remove(index);
            return true;
        }
        let before = self.settled.len();
        self.settled.retain(|(settled, _)| *settled != id);
        self.settled.len() != before
    }

    /// Drop every transition. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.active_count();
        self.running.clear();
        self.settled.clear();
        count
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.running.is_empty() && self.settled.is_empty()
    }

    /// Transitions that have not yet completed.
    #[inline]
    pub fn active_count(&self) -> usize {
        self.running.len() + self.settled.len()
    }
}
