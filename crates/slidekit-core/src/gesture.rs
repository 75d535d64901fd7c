#![forbid(unsafe_code)]

//! Gesture translation: raw recognizer samples to drawer inputs.
//!
//! The host platform owns three independent recognizers: an edge pan
//! restricted to the leading screen edge, a free pan over the main surface,
//! and a tap on the main surface. Each delivers [`GestureSample`]s in
//! temporal order. [`GestureTranslator`] maps a sample onto a
//! [`GestureInput`] for the drawer state machine, or drops it.
//!
//! # Gating
//!
//! The translator is stateless. Whether a recognizer is live is decided by
//! the drawer state and passed in as a [`RecognizerSet`]:
//!
//! - the edge pan is live only while the drawer is closed (or an edge drag
//!   is already in progress);
//! - the free pan and tap are live only while the drawer is open (or a free
//!   drag is already in progress).
//!
//! Ownership of drag handling therefore hands off from the edge recognizer to
//! the free recognizer when the drawer finishes opening, and back when it
//! finishes closing.
//!
//! # Invariants
//!
//! 1. A sample from a recognizer outside the accepted set yields `None`.
//! 2. `Cancelled` is treated as `Ended` for both pans, so every began drag
//!    is followed by exactly one terminal input.
//! 3. A tap yields `TapDetected` only on its `Ended` phase.

use bitflags::bitflags;

// ---------------------------------------------------------------------------
// Raw samples
// ---------------------------------------------------------------------------

/// Phase of a continuous gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

impl GesturePhase {
    /// Whether this phase terminates the gesture.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ended | Self::Cancelled)
    }
}

/// One event from a platform recognizer. Consumed per event, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub phase: GesturePhase,
    /// Pointer position in container coordinates.
    pub position_x: f64,
    /// Cumulative horizontal translation since `Began`.
    pub translation_x: f64,
}

impl GestureSample {
    /// Create a sample.
    #[must_use]
    pub const fn new(phase: GesturePhase, position_x: f64, translation_x: f64) -> Self {
        Self {
            phase,
            position_x,
            translation_x,
        }
    }

    /// A sample carrying only a pointer position.
    #[must_use]
    pub const fn at(phase: GesturePhase, position_x: f64) -> Self {
        Self::new(phase, position_x, 0.0)
    }

    /// A sample carrying only a translation.
    #[must_use]
    pub const fn moved(phase: GesturePhase, translation_x: f64) -> Self {
        Self::new(phase, 0.0, translation_x)
    }
}

// ---------------------------------------------------------------------------
// Recognizers
// ---------------------------------------------------------------------------

/// The three recognizers a drawer host provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recognizer {
    /// Pan starting at the leading screen edge.
    EdgePan,
    /// Pan anywhere on the main surface.
    FreePan,
    /// Tap on the main surface.
    Tap,
}

impl Recognizer {
    /// The flag for this recognizer in a [`RecognizerSet`].
    #[inline]
    pub const fn flag(self) -> RecognizerSet {
        match self {
            Self::EdgePan => RecognizerSet::EDGE_PAN,
            Self::FreePan => RecognizerSet::FREE_PAN,
            Self::Tap => RecognizerSet::TAP,
        }
    }
}

bitflags! {
    /// Set of recognizers that are live.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RecognizerSet: u8 {
        const EDGE_PAN = 0b001;
        const FREE_PAN = 0b010;
        const TAP      = 0b100;
    }
}

impl RecognizerSet {
    /// Whether `recognizer` is live in this set.
    #[inline]
    pub fn accepts(self, recognizer: Recognizer) -> bool {
        self.contains(recognizer.flag())
    }
}

// ---------------------------------------------------------------------------
// Translated inputs
// ---------------------------------------------------------------------------

/// Gesture inputs understood by the drawer state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureInput {
    /// Edge drag started with the pointer at `x`.
    EdgeDragBegan { x: f64 },
    /// Edge drag moved to pointer position `x`.
    EdgeDragChanged { x: f64 },
    /// Edge drag released or cancelled.
    EdgeDragEnded,
    /// Free drag started over the open main surface.
    FreeDragBegan,
    /// Free drag moved; `translation_x` is cumulative since it began.
    FreeDragChanged { translation_x: f64 },
    /// Free drag released or cancelled.
    FreeDragEnded,
    /// Tap on the main surface.
    TapDetected,
}

impl GestureInput {
    /// Short name for logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::EdgeDragBegan { .. } => "edge_drag_began",
            Self::EdgeDragChanged { .. } => "edge_drag_changed",
            Self::EdgeDragEnded => "edge_drag_ended",
            Self::FreeDragBegan => "free_drag_began",
            Self::FreeDragChanged { .. } => "free_drag_changed",
            Self::FreeDragEnded => "free_drag_ended",
            Self::TapDetected => "tap_detected",
        }
    }
}

// ---------------------------------------------------------------------------
// GestureTranslator
// ---------------------------------------------------------------------------

/// Stateless mapping from recognizer samples to [`GestureInput`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct GestureTranslator;

impl GestureTranslator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Translate one sample. Returns `None` when the recognizer is not in
    /// `accepted` or the phase carries no drawer meaning.
    #[must_use]
    pub fn translate(
        &self,
        recognizer: Recognizer,
        sample: GestureSample,
        accepted: RecognizerSet,
    ) -> Option<GestureInput> {
        if !accepted.accepts(recognizer) {
            return None;
        }

        match recognizer {
            Recognizer::EdgePan => Some(match sample.phase {
                GesturePhase::Began => GestureInput::EdgeDragBegan {
                    x: sample.position_x,
                },
                GesturePhase::Changed => GestureInput::EdgeDragChanged {
                    x: sample.position_x,
                },
                GesturePhase::Ended | GesturePhase::Cancelled => GestureInput::EdgeDragEnded,
            }),
            Recognizer::FreePan => Some(match sample.phase {
                GesturePhase::Began => GestureInput::FreeDragBegan,
                GesturePhase::Changed => GestureInput::FreeDragChanged {
                    translation_x: sample.translation_x,
                },
                GesturePhase::Ended | GesturePhase::Cancelled => GestureInput::FreeDragEnded,
            }),
            Recognizer::Tap => {
                (sample.phase == GesturePhase::Ended).then_some(GestureInput::TapDetected)
            }
        }
    }
}
