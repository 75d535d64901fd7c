#![forbid(unsafe_code)]

//! Pure drawer state machine.
//!
//! The machine is an Elm-style reducer: [`DrawerMachine::step`] takes the
//! current [`DrawerModel`] and one [`DrawerInput`] and returns the next model
//! plus the [`Effect`]s to perform. It never touches a surface, a clock or a
//! logger; the [`Drawer`](crate::drawer::Drawer) executes the effects.
//!
//! # State table
//!
//! | From              | Input                         | To                 |
//! |-------------------|-------------------------------|--------------------|
//! | Closed            | EdgeDragBegan                 | Dragging(Edge)     |
//! | Dragging(Edge)    | EdgeDragChanged               | Dragging(Edge)     |
//! | Dragging(Edge)    | EdgeDragEnded (threshold)     | Opening / Closing  |
//! | Opening           | open completed                | Open               |
//! | Open              | Tap, Toggle, Close            | Closing            |
//! | Open              | FreeDragBegan/Changed         | Dragging(Free)     |
//! | Dragging(Free)    | FreeDragChanged past center   | Closing            |
//! | Dragging(Free)    | FreeDragEnded                 | Closing            |
//! | Closing           | close completed               | Closed             |
//! | Closed / Open     | SwapMainSurface               | Closed / Closing   |
//!
//! # Invariants
//!
//! 1. The auxiliary surface is attached in every state except `Closed`, and
//!    a completed close (or swap) always detaches it.
//! 2. At most one transition is pending. While one is, every command,
//!    gesture and swap is rejected ("busy").
//! 3. A completion whose token does not match the pending transition is
//!    ignored.
//! 4. The accepted recognizer set is a function of the model, and a
//!    [`Effect::SetRecognizers`] is emitted whenever it changes.

use std::time::Duration;

use slidekit_core::animation::TransitionSpec;
use slidekit_core::config::{AuxiliaryMotion, DrawerConfig};
use slidekit_core::geometry::{GeometryPolicy, Size};
use slidekit_core::gesture::{GestureInput, RecognizerSet};

// ---------------------------------------------------------------------------
// States and inputs
// ---------------------------------------------------------------------------

/// Which recognizer started the current drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragSource {
    /// Edge pan from the closed position.
    Edge,
    /// Free pan over the open main surface.
    Free,
}

/// Drawer interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawerState {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
    Dragging(DragSource),
}

impl DrawerState {
    /// `Open`, `Opening` and a drag that started open count as open.
    #[inline]
    pub const fn is_open(self) -> bool {
        matches!(
            self,
            Self::Open | Self::Opening | Self::Dragging(DragSource::Free)
        )
    }

    #[inline]
    pub const fn is_dragging(self) -> bool {
        matches!(self, Self::Dragging(_))
    }

    /// Short name for logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Opening => "opening",
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Dragging(DragSource::Edge) => "dragging_edge",
            Self::Dragging(DragSource::Free) => "dragging_free",
        }
    }
}

/// What a transition is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    Open,
    Close,
    /// Replacing the main surface.
    Swap,
}

impl TransitionKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::Swap => "swap",
        }
    }
}

/// Identity of one started transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionToken(u64);

impl TransitionToken {
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Surface slots the machine addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Main,
    Auxiliary,
    /// The surface being swapped in as the new main.
    Incoming,
}

/// Programmatic commands, usually delivered over the command bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawerCommand {
    Toggle,
    Open,
    Close,
}

impl DrawerCommand {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Toggle => "toggle",
            Self::Open => "open",
            Self::Close => "close",
        }
    }
}

/// Everything the machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawerInput {
    Gesture(GestureInput),
    Command(DrawerCommand),
    /// Start replacing the main surface with the staged incoming one.
    SwapMainSurface,
    TransitionCompleted(TransitionToken),
    Resized(Size),
}

impl DrawerInput {
    /// Short name for logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Gesture(gesture) => gesture.name(),
            Self::Command(command) => command.name(),
            Self::SwapMainSurface => "swap_main_surface",
            Self::TransitionCompleted(_) => "transition_completed",
            Self::Resized(_) => "resized",
        }
    }
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// One surface moving during a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub slot: Slot,
    pub spec: TransitionSpec,
}

/// An animation to run. Every track shares the same timing.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub token: TransitionToken,
    pub kind: TransitionKind,
    pub tracks: Vec<Track>,
}

impl Transition {
    /// Timing shared by all tracks.
    pub fn timing(&self) -> TransitionSpec {
        self.tracks
            .first()
            .map(|track| track.spec)
            .unwrap_or_else(|| TransitionSpec::new(Duration::ZERO, 1.0, 0.0, 0.0))
    }

    /// Offset of every track at `progress`.
    pub fn offsets_at(&self, progress: f64) -> impl Iterator<Item = (Slot, f64)> + '_ {
        self.tracks
            .iter()
            .map(move |track| (track.slot, track.spec.offset_at(progress)))
    }
}

/// Side effects requested by the machine, performed in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Attach the slot's surface at stacking `z_index`, then place it.
    Attach {
        slot: Slot,
        z_index: usize,
        offset_x: f64,
    },
    Detach {
        slot: Slot,
    },
    /// Move without animation.
    SetOffset {
        slot: Slot,
        offset_x: f64,
    },
    ApplyShadow {
        slot: Slot,
    },
    RemoveShadow {
        slot: Slot,
    },
    /// The container changed size.
    Relayout {
        size: Size,
    },
    Animate(Transition),
    SetRecognizers(RecognizerSet),
    /// The incoming surface becomes the main surface.
    PromoteIncoming,
}

impl Effect {
    /// Short name for logs and spans.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Attach { .. } => "attach",
            Self::Detach { .. } => "detach",
            Self::SetOffset { .. } => "set_offset",
            Self::ApplyShadow { .. } => "apply_shadow",
            Self::RemoveShadow { .. } => "remove_shadow",
            Self::Relayout { .. } => "relayout",
            Self::Animate(_) => "animate",
            Self::SetRecognizers(_) => "set_recognizers",
            Self::PromoteIncoming => "promote_incoming",
        }
    }
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// The full observable state of one drawer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawerModel {
    pub state: DrawerState,
    pub container: Size,
    /// Last offset written to the main surface outside an animation.
    pub main_offset: f64,
    pub auxiliary_offset: f64,
    pub auxiliary_attached: bool,
    pub incoming_attached: bool,
    /// Main offset when the current free drag began.
    pub drag_origin: f64,
    pub pending: Option<(TransitionToken, TransitionKind)>,
    pub recognizers: RecognizerSet,
    pub has_auxiliary: bool,
    next_token: u64,
}

impl DrawerModel {
    /// A closed drawer in a container of `container` size.
    #[must_use]
    pub fn new(container: Size, has_auxiliary: bool) -> Self {
        let mut model = Self {
            state: DrawerState::Closed,
            container,
            main_offset: 0.0,
            auxiliary_offset: 0.0,
            auxiliary_attached: false,
            incoming_attached: false,
            drag_origin: 0.0,
            pending: None,
            recognizers: RecognizerSet::empty(),
            has_auxiliary,
            next_token: 1,
        };
        model.recognizers = model.accepted_recognizers();
        model
    }

    /// Whether a transition is in flight.
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Recognizers whose input the current state accepts.
    pub fn accepted_recognizers(&self) -> RecognizerSet {
        if self.is_busy() {
            return RecognizerSet::empty();
        }
        match self.state {
            DrawerState::Closed if self.has_auxiliary => RecognizerSet::EDGE_PAN,
            DrawerState::Dragging(DragSource::Edge) => RecognizerSet::EDGE_PAN,
            DrawerState::Open => RecognizerSet::FREE_PAN | RecognizerSet::TAP,
            DrawerState::Dragging(DragSource::Free) => RecognizerSet::FREE_PAN,
            _ => RecognizerSet::empty(),
        }
    }

    fn issue_token(&mut self) -> TransitionToken {
        let token = TransitionToken(self.next_token);
        self.next_token += 1;
        token
    }
}

/// Result of one reducer step.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub model: DrawerModel,
    pub effects: Vec<Effect>,
    /// `false` when the input was ignored in the current state.
    pub accepted: bool,
    /// The transition that finished during this step, if any.
    pub completed: Option<TransitionKind>,
}

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

/// Timing and geometry the reducer needs, derived once from a config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachineRules {
    pub geometry: GeometryPolicy,
    pub open_duration: Duration,
    pub close_duration: Duration,
    pub swap_duration: Duration,
    pub damping_ratio: f64,
    pub auxiliary_motion: AuxiliaryMotion,
}

impl From<&DrawerConfig> for MachineRules {
    fn from(config: &DrawerConfig) -> Self {
        Self {
            geometry: config.geometry(),
            open_duration: config.open_duration(),
            close_duration: config.close_duration(),
            swap_duration: config.swap_duration(),
            damping_ratio: config.damping_ratio,
            auxiliary_motion: config.auxiliary_motion,
        }
    }
}

/// The drawer reducer plus the model it currently holds.
#[derive(Debug, Clone)]
pub struct DrawerMachine {
    rules: MachineRules,
    model: DrawerModel,
}

impl DrawerMachine {
    #[must_use]
    pub fn new(rules: MachineRules, container: Size, has_auxiliary: bool) -> Self {
        Self {
            rules,
            model: DrawerModel::new(container, has_auxiliary),
        }
    }

    #[inline]
    pub fn model(&self) -> &DrawerModel {
        &self.model
    }

    #[inline]
    pub fn rules(&self) -> &MachineRules {
        &self.rules
    }

    #[inline]
    pub fn state(&self) -> DrawerState {
        self.model.state
    }

    /// Effects that stage a freshly constructed drawer: main attached at the
    /// closed offset and the initial recognizer set.
    pub fn initial_effects(&self) -> Vec<Effect> {
        vec![
            Effect::Attach {
                slot: Slot::Main,
                z_index: 0,
                offset_x: self.rules.geometry.closed_offset(),
            },
            Effect::SetRecognizers(self.model.recognizers),
        ]
    }

    /// Feed one input and keep the resulting model.
    pub fn handle(&mut self, input: DrawerInput) -> Step {
        let step = self.step(&self.model, input);
        self.model = step.model;
        step
    }

    /// Pure transition function.
    #[must_use]
    pub fn step(&self, model: &DrawerModel, input: DrawerInput) -> Step {
        let mut cx = StepCx {
            rules: &self.rules,
            model: *model,
            effects: Vec::new(),
            completed: None,
        };

        let accepted = match input {
            DrawerInput::Gesture(gesture) => cx.gesture(gesture),
            DrawerInput::Command(command) => cx.command(command),
            DrawerInput::SwapMainSurface => cx.swap(),
            DrawerInput::TransitionCompleted(token) => cx.complete(token),
            DrawerInput::Resized(size) => cx.resize(size),
        };

        let recognizers = cx.model.accepted_recognizers();
        if recognizers != cx.model.recognizers {
            cx.model.recognizers = recognizers;
            cx.effects.push(Effect::SetRecognizers(recognizers));
        }

        Step {
            model: cx.model,
            effects: cx.effects,
            accepted,
            completed: cx.completed,
        }
    }
}

struct StepCx<'a> {
    rules: &'a MachineRules,
    model: DrawerModel,
    effects: Vec<Effect>,
    completed: Option<TransitionKind>,
}

impl StepCx<'_> {
    #[inline]
    fn width(&self) -> f64 {
        self.model.container.width
    }

    fn slides_auxiliary(&self) -> bool {
        self.rules.auxiliary_motion == AuxiliaryMotion::Slide
    }

    fn set_main(&mut self, offset_x: f64) {
        self.model.main_offset = offset_x;
        self.effects.push(Effect::SetOffset {
            slot: Slot::Main,
            offset_x,
        });
    }

    /// Attach the auxiliary surface and shadow the main one, if not already.
    fn stage_auxiliary(&mut self, offset_x: f64) {
        if self.model.auxiliary_attached {
            return;
        }
        self.model.auxiliary_attached = true;
        self.model.auxiliary_offset = offset_x;
        self.effects.push(Effect::Attach {
            slot: Slot::Auxiliary,
            z_index: 0,
            offset_x,
        });
        self.effects.push(Effect::ApplyShadow { slot: Slot::Main });
    }

    fn animate(&mut self, kind: TransitionKind, duration: Duration, moves: &[(Slot, f64, f64)]) {
        let token = self.model.issue_token();
        let damping = self.rules.damping_ratio;
        let tracks = moves
            .iter()
            .map(|&(slot, from, to)| Track {
                slot,
                spec: TransitionSpec::new(duration, damping, from, to),
            })
            .collect();
        self.model.pending = Some((token, kind));
        self.effects.push(Effect::Animate(Transition {
            token,
            kind,
            tracks,
        }));
    }

    // -- gestures -----------------------------------------------------------

    fn gesture(&mut self, gesture: GestureInput) -> bool {
        if self.model.is_busy() {
            return false;
        }
        let state = self.model.state;
        match (state, gesture) {
            (DrawerState::Closed, GestureInput::EdgeDragBegan { x }) => {
                if !self.model.has_auxiliary {
                    return false;
                }
                self.stage_auxiliary(self.rules.geometry.auxiliary_shown_offset());
                self.model.state = DrawerState::Dragging(DragSource::Edge);
                self.follow_pointer(x);
                true
            }
            (
                DrawerState::Dragging(DragSource::Edge),
                GestureInput::EdgeDragBegan { x } | GestureInput::EdgeDragChanged { x },
            ) => {
                self.follow_pointer(x);
                true
            }
            (DrawerState::Dragging(DragSource::Edge), GestureInput::EdgeDragEnded) => {
                if self
                    .rules
                    .geometry
                    .passed_open_threshold(self.model.main_offset, self.width())
                {
                    self.begin_open();
                } else {
                    self.begin_close();
                }
                true
            }
            (DrawerState::Open, GestureInput::FreeDragBegan) => {
                self.begin_free_drag();
                true
            }
            (DrawerState::Open, GestureInput::FreeDragChanged { translation_x }) => {
                self.begin_free_drag();
                self.free_drag_to(translation_x);
                true
            }
            (
                DrawerState::Dragging(DragSource::Free),
                GestureInput::FreeDragChanged { translation_x },
            ) => {
                self.free_drag_to(translation_x);
                true
            }
            (DrawerState::Dragging(DragSource::Free), GestureInput::FreeDragEnded) => {
                self.begin_close();
                true
            }
            (DrawerState::Open, GestureInput::TapDetected) => {
                self.begin_close();
                true
            }
            _ => false,
        }
    }

    fn follow_pointer(&mut self, x: f64) {
        let offset = self.rules.geometry.drag_follow(x, self.width());
        self.set_main(offset);
    }

    fn begin_free_drag(&mut self) {
        self.model.drag_origin = self.model.main_offset;
        self.model.state = DrawerState::Dragging(DragSource::Free);
    }

    fn free_drag_to(&mut self, translation_x: f64) {
        let width = self.width().max(0.0);
        let target = self.model.drag_origin + translation_x;
        let offset = if target.is_nan() {
            self.model.main_offset
        } else {
            target.clamp(0.0, width)
        };
        if self
            .rules
            .geometry
            .follows_free_drag(self.model.drag_origin, offset, width)
        {
            self.set_main(offset);
        } else {
            self.begin_close();
        }
    }

    // -- commands -----------------------------------------------------------

    fn command(&mut self, command: DrawerCommand) -> bool {
        if self.model.is_busy() || !self.model.has_auxiliary {
            return false;
        }
        let open = self.model.state.is_open();
        match command {
            DrawerCommand::Toggle if open => self.begin_close(),
            DrawerCommand::Toggle => self.begin_open(),
            DrawerCommand::Open if self.model.state == DrawerState::Open => return false,
            DrawerCommand::Open => self.begin_open(),
            DrawerCommand::Close if self.model.state == DrawerState::Closed => return false,
            DrawerCommand::Close => self.begin_close(),
        }
        true
    }

    fn begin_open(&mut self) {
        let width = self.width();
        let geometry = self.rules.geometry;
        let hidden = if self.slides_auxiliary() {
            geometry.auxiliary_hidden_offset(width)
        } else {
            geometry.auxiliary_shown_offset()
        };
        self.stage_auxiliary(hidden);

        let mut moves = vec![(Slot::Main, self.model.main_offset, geometry.open_offset(width))];
        let shown = geometry.auxiliary_shown_offset();
        if self.model.auxiliary_offset != shown {
            moves.push((Slot::Auxiliary, self.model.auxiliary_offset, shown));
        }
        self.model.state = DrawerState::Opening;
        self.animate(TransitionKind::Open, self.rules.open_duration, &moves);
    }

    fn begin_close(&mut self) {
        let width = self.width();
        let geometry = self.rules.geometry;
        let mut moves = vec![(Slot::Main, self.model.main_offset, geometry.closed_offset())];
        if self.model.auxiliary_attached && self.slides_auxiliary() {
            moves.push((
                Slot::Auxiliary,
                self.model.auxiliary_offset,
                geometry.auxiliary_hidden_offset(width),
            ));
        }
        self.model.state = DrawerState::Closing;
        self.animate(TransitionKind::Close, self.rules.close_duration, &moves);
    }

    // -- swap ---------------------------------------------------------------

    fn swap(&mut self) -> bool {
        if self.model.is_busy() || self.model.incoming_attached {
            return false;
        }
        let next_state = match self.model.state {
            DrawerState::Closed => DrawerState::Closed,
            DrawerState::Open => DrawerState::Closing,
            _ => return false,
        };

        let width = self.width().max(0.0);
        // Above the outgoing main, which sits above the auxiliary if attached.
        let z_index = usize::from(self.model.auxiliary_attached) + 1;
        self.model.incoming_attached = true;
        self.effects.push(Effect::Attach {
            slot: Slot::Incoming,
            z_index,
            offset_x: width,
        });

        self.model.state = next_state;
        let moves = [
            (Slot::Main, self.model.main_offset, -width),
            (Slot::Incoming, width, 0.0),
        ];
        self.animate(TransitionKind::Swap, self.rules.swap_duration, &moves);
        true
    }

    // -- completion ---------------------------------------------------------

    fn complete(&mut self, token: TransitionToken) -> bool {
        let Some((pending, kind)) = self.model.pending else {
            return false;
        };
        if pending != token {
            return false;
        }
        self.model.pending = None;
        self.completed = Some(kind);

        let width = self.width();
        let geometry = self.rules.geometry;
        match kind {
            TransitionKind::Open => {
                self.model.state = DrawerState::Open;
                self.set_main(geometry.open_offset(width));
                let shown = geometry.auxiliary_shown_offset();
                self.model.auxiliary_offset = shown;
                self.effects.push(Effect::SetOffset {
                    slot: Slot::Auxiliary,
                    offset_x: shown,
                });
            }
            TransitionKind::Close => {
                self.model.state = DrawerState::Closed;
                self.release_auxiliary();
                self.set_main(geometry.closed_offset());
            }
            TransitionKind::Swap => {
                self.model.state = DrawerState::Closed;
                if self.model.auxiliary_attached {
                    self.effects.push(Effect::RemoveShadow { slot: Slot::Main });
                }
                self.effects.push(Effect::Detach { slot: Slot::Main });
                self.effects.push(Effect::PromoteIncoming);
                self.model.incoming_attached = false;
                self.set_main(geometry.closed_offset());
                if self.model.auxiliary_attached {
                    self.model.auxiliary_attached = false;
                    self.model.auxiliary_offset = 0.0;
                    self.effects.push(Effect::Detach {
                        slot: Slot::Auxiliary,
                    });
                }
            }
        }
        true
    }

    fn release_auxiliary(&mut self) {
        if !self.model.auxiliary_attached {
            return;
        }
        self.model.auxiliary_attached = false;
        self.model.auxiliary_offset = 0.0;
        self.effects.push(Effect::Detach {
            slot: Slot::Auxiliary,
        });
        self.effects.push(Effect::RemoveShadow { slot: Slot::Main });
    }

    // -- layout -------------------------------------------------------------

    fn resize(&mut self, size: Size) -> bool {
        self.model.container = size;
        self.effects.push(Effect::Relayout { size });
        if self.model.is_busy() {
            return true;
        }
        let width = size.width.max(0.0);
        match self.model.state {
            DrawerState::Open => {
                let offset = self.rules.geometry.open_offset(width);
                self.set_main(offset);
            }
            DrawerState::Dragging(_) if self.model.main_offset > width => {
                self.set_main(width);
            }
            _ => {}
        }
        true
    }
}
