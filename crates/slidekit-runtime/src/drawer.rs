#![forbid(unsafe_code)]

//! The drawer driver: owns the surfaces, runs the machine, performs effects.
//!
//! [`Drawer`] is the event-loop side of the pure
//! [`DrawerMachine`](crate::machine::DrawerMachine). Every public operation
//! turns into a [`DrawerInput`], the machine answers with effects, and the
//! drawer executes them against its surfaces, its
//! [`SurfaceLifecycle`](crate::surface::SurfaceLifecycle) and its
//! [`TransitionRunner`](crate::runner::TransitionRunner).
//!
//! The host drives time: call [`Drawer::tick`] once per frame. Transition
//! completions and queued bus commands are only processed inside `tick`
//! (or [`Drawer::pump`] for commands), never re-entrantly.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use slidekit_core::{DrawerConfig, Size};
//! use slidekit_runtime::{Drawer, DrawerState, HeadlessSurface};
//!
//! let mut drawer = Drawer::new(
//!     DrawerConfig::default(),
//!     Size::new(300.0, 600.0),
//!     HeadlessSurface::new(),
//!     Some(HeadlessSurface::new()),
//! );
//!
//! assert!(drawer.toggle());
//! assert_eq!(drawer.state(), DrawerState::Opening);
//!
//! drawer.settle(Duration::from_millis(16), 120);
//! assert_eq!(drawer.state(), DrawerState::Open);
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use slidekit_core::config::{ConfigError, DrawerConfig, ShadowStyle, StatusBarStyle};
use slidekit_core::geometry::{Rect, Size};
use slidekit_core::gesture::{GestureSample, GestureTranslator, Recognizer, RecognizerSet};

use crate::bus::{BusSubscription, EventBus};
use crate::effect_system;
use crate::machine::{
    DrawerCommand, DrawerInput, DrawerMachine, DrawerModel, DrawerState, Effect, MachineRules,
    Slot, Transition, TransitionKind,
};
use crate::runner::TransitionRunner;
use crate::surface::{AttachmentSet, ContainerId, ContentSurface, SurfaceId, SurfaceLifecycle};

/// Notifications a drawer publishes on its event bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerEvent {
    StateChanged { from: DrawerState, to: DrawerState },
    /// An open transition finished.
    Opened,
    /// A close transition finished.
    Closed,
    /// A swap finished; the incoming surface is now the main surface.
    MainSurfaceSwapped,
}

/// Surfaces handed back by [`Drawer::teardown`], all detached.
#[derive(Debug)]
pub struct DetachedSurfaces<S> {
    pub main: S,
    pub auxiliary: Option<S>,
    /// A surface whose swap was interrupted by teardown.
    pub incoming: Option<S>,
    /// Swapped-out main surfaces not yet taken, oldest first.
    pub retired: VecDeque<S>,
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Surfaces plus the bookkeeping transition callbacks operate on.
struct Stage<S> {
    main: S,
    auxiliary: Option<S>,
    incoming: Option<S>,
    retired: VecDeque<S>,
    lifecycle: SurfaceLifecycle,
    shadow: ShadowStyle,
    inbox: VecDeque<DrawerInput>,
}

impl<S: ContentSurface> Stage<S> {
    fn surface_mut(&mut self, slot: Slot) -> Option<&mut S> {
        match slot {
            Slot::Main => Some(&mut self.main),
            Slot::Auxiliary => self.auxiliary.as_mut(),
            Slot::Incoming => self.incoming.as_mut(),
        }
    }

    fn with_surface(&mut self, slot: Slot, f: impl FnOnce(&mut S, &mut SurfaceLifecycle)) {
        let Self {
            main,
            auxiliary,
            incoming,
            lifecycle,
            ..
        } = self;
        let surface = match slot {
            Slot::Main => Some(main),
            Slot::Auxiliary => auxiliary.as_mut(),
            Slot::Incoming => incoming.as_mut(),
        };
        match surface {
            Some(surface) => f(surface, lifecycle),
            None => tracing::warn!(
                target: "slidekit.drawer",
                slot = ?slot,
                "effect addressed an empty slot"
            ),
        }
    }

    fn set_offset(&mut self, slot: Slot, offset_x: f64) {
        if let Some(surface) = self.surface_mut(slot) {
            surface.set_offset_x(offset_x);
        }
    }

    fn relayout(&mut self, size: Size) {
        let bounds = Rect::from_size(size);
        self.lifecycle.set_bounds(bounds);
        let Self {
            main,
            auxiliary,
            incoming,
            lifecycle,
            ..
        } = self;
        let surfaces = std::iter::once(main)
            .chain(auxiliary.as_mut())
            .chain(incoming.as_mut());
        for surface in surfaces {
            if lifecycle.is_attached(surface.id()) {
                let x = surface.offset_x();
                surface.set_frame(bounds.with_x(x));
            }
        }
    }

    fn promote_incoming(&mut self) {
        if let Some(incoming) = self.incoming.take() {
            let outgoing = std::mem::replace(&mut self.main, incoming);
            self.retired.push_back(outgoing);
        }
    }
}

// ---------------------------------------------------------------------------
// Drawer
// ---------------------------------------------------------------------------

/// A drawer container managing a main surface and an optional auxiliary
/// panel revealed from the leading edge.
pub struct Drawer<S: ContentSurface + 'static> {
    config: DrawerConfig,
    machine: DrawerMachine,
    translator: GestureTranslator,
    stage: Stage<S>,
    runner: TransitionRunner<Stage<S>>,
    recognizers: RecognizerSet,
    commands: Rc<RefCell<VecDeque<DrawerCommand>>>,
    command_subscription: Option<BusSubscription>,
    events: Option<EventBus<DrawerEvent>>,
}

impl<S: ContentSurface + 'static> std::fmt::Debug for Drawer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Drawer")
            .field("state", &self.machine.state())
            .field("recognizers", &self.recognizers)
            .field("attached", &self.stage.lifecycle.attachments().len())
            .field("runner", &self.runner)
            .finish_non_exhaustive()
    }
}

impl<S: ContentSurface + 'static> Drawer<S> {
    /// Build a closed drawer with `main` attached.
    ///
    /// Invalid configuration values are logged and used as given; call
    /// [`try_new`](Self::try_new) to reject them instead.
    pub fn new(config: DrawerConfig, container: Size, main: S, auxiliary: Option<S>) -> Self {
        for problem in config.validate() {
            tracing::warn!(target: "slidekit.drawer", problem = %problem, "invalid drawer config");
        }
        Self::build(config, container, main, auxiliary)
    }

    /// Build a drawer, rejecting an invalid configuration.
    pub fn try_new(
        config: DrawerConfig,
        container: Size,
        main: S,
        auxiliary: Option<S>,
    ) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        Ok(Self::build(config, container, main, auxiliary))
    }

    fn build(config: DrawerConfig, container: Size, main: S, auxiliary: Option<S>) -> Self {
        let has_auxiliary = auxiliary.is_some();
        if !has_auxiliary {
            tracing::warn!(
                target: "slidekit.drawer",
                "no auxiliary surface; edge pan and commands are disabled"
            );
        }
        let machine = DrawerMachine::new(MachineRules::from(&config), container, has_auxiliary);
        let stage = Stage {
            main,
            auxiliary,
            incoming: None,
            retired: VecDeque::new(),
            lifecycle: SurfaceLifecycle::new(ContainerId::next(), Rect::from_size(container)),
            shadow: config.shadow,
            inbox: VecDeque::new(),
        };
        let mut drawer = Self {
            config,
            machine,
            translator: GestureTranslator::new(),
            stage,
            runner: TransitionRunner::new(),
            recognizers: RecognizerSet::empty(),
            commands: Rc::new(RefCell::new(VecDeque::new())),
            command_subscription: None,
            events: None,
        };
        for effect in drawer.machine.initial_effects() {
            drawer.execute(effect);
        }
        tracing::debug!(
            target: "slidekit.drawer",
            width = container.width,
            height = container.height,
            has_auxiliary,
            "drawer created"
        );
        drawer
    }

    /// Listen for commands on `bus`. A bus whose key differs from the
    /// configured toggle key is ignored.
    #[must_use]
    pub fn with_commands(mut self, bus: &EventBus<DrawerCommand>) -> Self {
        if !bus.has_key(&self.config.toggle_key) {
            tracing::warn!(
                target: "slidekit.drawer",
                bus_key = %bus.key(),
                toggle_key = %self.config.toggle_key,
                "command bus key mismatch; not subscribing"
            );
            return self;
        }
        let queue = Rc::clone(&self.commands);
        self.command_subscription =
            Some(bus.subscribe(move |command| queue.borrow_mut().push_back(*command)));
        self
    }

    /// Publish [`DrawerEvent`]s on `bus`.
    #[must_use]
    pub fn with_events(mut self, bus: EventBus<DrawerEvent>) -> Self {
        self.events = Some(bus);
        self
    }

    // -- operations ---------------------------------------------------------

    /// Open if closed, close if open. Returns whether the input was accepted.
    pub fn toggle(&mut self) -> bool {
        self.dispatch(DrawerInput::Command(DrawerCommand::Toggle))
    }

    pub fn open(&mut self) -> bool {
        self.dispatch(DrawerInput::Command(DrawerCommand::Open))
    }

    pub fn close(&mut self) -> bool {
        self.dispatch(DrawerInput::Command(DrawerCommand::Close))
    }

    /// Feed one recognizer sample. Samples from recognizers the current
    /// state does not accept are dropped.
    pub fn handle_gesture(&mut self, recognizer: Recognizer, sample: GestureSample) -> bool {
        match self
            .translator
            .translate(recognizer, sample, self.recognizers)
        {
            Some(input) => self.dispatch(DrawerInput::Gesture(input)),
            None => {
                tracing::debug!(
                    target: "slidekit.drawer",
                    recognizer = ?recognizer,
                    phase = ?sample.phase,
                    "gesture sample dropped"
                );
                false
            }
        }
    }

    /// Slide `surface` in as the new main surface. The surface is handed
    /// back when a swap is not possible (dragging, busy, mid-animation).
    pub fn swap_main_surface(&mut self, surface: S) -> Result<(), S> {
        let preview = self
            .machine
            .step(self.machine.model(), DrawerInput::SwapMainSurface);
        if !preview.accepted {
            tracing::debug!(
                target: "slidekit.drawer",
                state = self.state().name(),
                "swap rejected"
            );
            return Err(surface);
        }
        self.stage.incoming = Some(surface);
        self.dispatch(DrawerInput::SwapMainSurface);
        Ok(())
    }

    /// The container changed size.
    pub fn resize(&mut self, size: Size) {
        self.dispatch(DrawerInput::Resized(size));
    }

    /// Advance one frame: deliver queued commands, step animations and
    /// process their completions. Returns the completions fired.
    pub fn tick(&mut self, dt: Duration) -> usize {
        self.pump();
        let fired = self.runner.tick(&mut self.stage, dt);
        while let Some(input) = self.stage.inbox.pop_front() {
            self.dispatch(input);
        }
        fired
    }

    /// Tick with `frame` until idle or `max_frames` elapse. Returns the
    /// number of frames ticked.
    pub fn settle(&mut self, frame: Duration, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && self.has_work() {
            self.tick(frame);
            frames += 1;
        }
        frames
    }

    /// Deliver commands queued by the command bus. Returns how many were
    /// delivered.
    pub fn pump(&mut self) -> usize {
        let mut delivered = 0;
        loop {
            let next = self.commands.borrow_mut().pop_front();
            let Some(command) = next else {
                break;
            };
            self.dispatch(DrawerInput::Command(command));
            delivered += 1;
        }
        delivered
    }

    /// Detach every surface, cancel animations and drop the command
    /// subscription.
    pub fn teardown(mut self) -> DetachedSurfaces<S> {
        let cancelled = self.runner.cancel_all();
        if cancelled > 0 {
            tracing::debug!(target: "slidekit.transition", cancelled, "transitions cancelled");
        }
        self.command_subscription = None;
        let shadowed = self.machine.model().auxiliary_attached;

        let Stage {
            mut main,
            mut auxiliary,
            mut incoming,
            retired,
            mut lifecycle,
            ..
        } = self.stage;
        if shadowed {
            main.remove_shadow();
        }
        lifecycle.detach(&mut main);
        if let Some(surface) = auxiliary.as_mut() {
            lifecycle.detach(surface);
        }
        if let Some(surface) = incoming.as_mut() {
            lifecycle.detach(surface);
        }

        tracing::debug!(target: "slidekit.drawer", "drawer torn down");
        DetachedSurfaces {
            main,
            auxiliary,
            incoming,
            retired,
        }
    }

    // -- queries ------------------------------------------------------------

    #[inline]
    pub fn state(&self) -> DrawerState {
        self.machine.state()
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.state().is_open()
    }

    /// Whether a transition is in flight.
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.machine.model().is_busy()
    }

    #[inline]
    pub fn model(&self) -> &DrawerModel {
        self.machine.model()
    }

    #[inline]
    pub fn config(&self) -> &DrawerConfig {
        &self.config
    }

    pub fn status_bar_style(&self) -> StatusBarStyle {
        self.config.status_bar_style
    }

    /// Recognizers whose samples are currently delivered.
    #[inline]
    pub fn recognizers(&self) -> RecognizerSet {
        self.recognizers
    }

    pub fn main_surface(&self) -> &S {
        &self.stage.main
    }

    pub fn auxiliary_surface(&self) -> Option<&S> {
        self.stage.auxiliary.as_ref()
    }

    pub fn is_attached(&self, id: SurfaceId) -> bool {
        self.stage.lifecycle.is_attached(id)
    }

    pub fn attachments(&self) -> &AttachmentSet {
        self.stage.lifecycle.attachments()
    }

    pub fn container(&self) -> ContainerId {
        self.stage.lifecycle.container()
    }

    /// Take the oldest main surface replaced by a completed swap.
    pub fn take_retired_surface(&mut self) -> Option<S> {
        self.stage.retired.pop_front()
    }

    // -- internals ----------------------------------------------------------

    fn has_work(&self) -> bool {
        self.is_busy()
            || !self.runner.is_idle()
            || !self.stage.inbox.is_empty()
            || !self.commands.borrow().is_empty()
    }

    fn dispatch(&mut self, input: DrawerInput) -> bool {
        let from = self.machine.state();
        let step = self.machine.handle(input);
        if !step.accepted {
            tracing::debug!(
                target: "slidekit.drawer",
                input = input.name(),
                state = from.name(),
                busy = step.model.is_busy(),
                "input ignored"
            );
            return false;
        }

        for effect in step.effects {
            self.execute(effect);
        }

        let to = step.model.state;
        if from != to {
            tracing::debug!(
                target: "slidekit.drawer",
                input = input.name(),
                from = from.name(),
                to = to.name(),
                "state changed"
            );
            self.publish(DrawerEvent::StateChanged { from, to });
        }

        if let (Some(kind), DrawerInput::TransitionCompleted(token)) = (step.completed, input) {
            effect_system::record_transition_completed(kind.name(), token.get());
            self.publish(match kind {
                TransitionKind::Open => DrawerEvent::Opened,
                TransitionKind::Close => DrawerEvent::Closed,
                TransitionKind::Swap => DrawerEvent::MainSurfaceSwapped,
            });
        }
        true
    }

    fn publish(&self, event: DrawerEvent) {
        if let Some(bus) = &self.events {
            bus.publish(&event);
        }
    }

    fn execute(&mut self, effect: Effect) {
        let kind = effect.kind();
        effect_system::trace_effect(kind, || self.perform(effect));
    }

    fn perform(&mut self, effect: Effect) {
        match effect {
            Effect::Attach {
                slot,
                z_index,
                offset_x,
            } => self.stage.with_surface(slot, |surface, lifecycle| {
                lifecycle.attach(surface, z_index);
                surface.set_offset_x(offset_x);
            }),
            Effect::Detach { slot } => self.stage.with_surface(slot, |surface, lifecycle| {
                lifecycle.detach(surface);
            }),
            Effect::SetOffset { slot, offset_x } => self.stage.set_offset(slot, offset_x),
            Effect::ApplyShadow { slot } => {
                let shadow = self.stage.shadow;
                self.stage
                    .with_surface(slot, |surface, _| surface.apply_shadow(&shadow));
            }
            Effect::RemoveShadow { slot } => self
                .stage
                .with_surface(slot, |surface, _| surface.remove_shadow()),
            Effect::Relayout { size } => self.stage.relayout(size),
            Effect::Animate(transition) => self.animate(transition),
            Effect::SetRecognizers(set) => {
                tracing::trace!(target: "slidekit.drawer", recognizers = ?set, "recognizers changed");
                self.recognizers = set;
            }
            Effect::PromoteIncoming => self.stage.promote_incoming(),
        }
    }

    fn animate(&mut self, transition: Transition) {
        let timing = transition.timing();
        let Transition {
            token,
            kind,
            tracks,
        } = transition;
        tracing::debug!(
            target: "slidekit.transition",
            kind = kind.name(),
            token = token.get(),
            duration_ms = timing.duration.as_millis() as u64,
            tracks = tracks.len(),
            "transition started"
        );
        self.runner.run(
            timing,
            &mut self.stage,
            move |stage: &mut Stage<S>, progress| {
                for track in &tracks {
                    stage.set_offset(track.slot, track.spec.offset_at(progress));
                }
            },
            move |stage: &mut Stage<S>| {
                stage
                    .inbox
                    .push_back(DrawerInput::TransitionCompleted(token));
            },
        );
    }
}
