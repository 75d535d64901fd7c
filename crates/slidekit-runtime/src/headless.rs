#![forbid(unsafe_code)]

//! In-memory [`ContentSurface`] for tests and headless hosts.
//!
//! A `HeadlessSurface` is a cheap clonable handle: clones share one state
//! cell, so a test can hand one clone to the drawer and inspect the other.
//! The call history is bounded; attach and detach totals are kept
//! separately and never roll off.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use slidekit_core::config::ShadowStyle;
use slidekit_core::geometry::Rect;

use crate::surface::{ContainerId, ContentSurface, SurfaceId};

/// One recorded collaborator call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceCall {
    SetFrame(Rect),
    AttachTo { parent: ContainerId, index: usize },
    Detach,
    ApplyShadow,
    RemoveShadow,
}

/// Calls kept by [`HeadlessSurface::calls`] before the oldest are dropped.
pub const CALL_HISTORY_LIMIT: usize = 256;

#[derive(Debug)]
struct HeadlessState {
    frame: Rect,
    parent: Option<(ContainerId, usize)>,
    shadow: Option<ShadowStyle>,
    calls: VecDeque<SurfaceCall>,
    attaches: usize,
    detaches: usize,
}

/// A surface that records what the drawer does to it.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    id: SurfaceId,
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessSurface {
    /// A detached, zero-sized surface.
    #[must_use]
    pub fn new() -> Self {
        Self::with_frame(Rect::default())
    }

    /// A detached surface with an initial frame.
    #[must_use]
    pub fn with_frame(frame: Rect) -> Self {
        Self {
            id: SurfaceId::next(),
            state: Rc::new(RefCell::new(HeadlessState {
                frame,
                parent: None,
                shadow: None,
                calls: VecDeque::new(),
                attaches: 0,
                detaches: 0,
            })),
        }
    }

    /// Parent container and stacking index, if attached.
    pub fn parent(&self) -> Option<(ContainerId, usize)> {
        self.state.borrow().parent
    }

    /// Whether the surface is in a visual tree.
    pub fn is_in_tree(&self) -> bool {
        self.state.borrow().parent.is_some()
    }

    /// The shadow currently drawn, if any.
    pub fn shadow(&self) -> Option<ShadowStyle> {
        self.state.borrow().shadow
    }

    pub fn has_shadow(&self) -> bool {
        self.state.borrow().shadow.is_some()
    }

    /// The most recent calls, oldest first, at most
    /// [`CALL_HISTORY_LIMIT`] of them.
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.state.borrow().calls.iter().copied().collect()
    }

    /// Total `attach_to` calls since creation or the last
    /// [`clear_calls`](Self::clear_calls).
    pub fn attach_calls(&self) -> usize {
        self.state.borrow().attaches
    }

    pub fn detach_calls(&self) -> usize {
        self.state.borrow().detaches
    }

    /// Forget recorded calls and totals, keeping current state.
    pub fn clear_calls(&self) {
        let mut state = self.state.borrow_mut();
        state.calls.clear();
        state.attaches = 0;
        state.detaches = 0;
    }

    fn record(&self, call: SurfaceCall) {
        let mut state = self.state.borrow_mut();
        match call {
            SurfaceCall::AttachTo { .. } => state.attaches += 1,
            SurfaceCall::Detach => state.detaches += 1,
            _ => {}
        }
        if state.calls.len() == CALL_HISTORY_LIMIT {
            state.calls.pop_front();
        }
        state.calls.push_back(call);
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentSurface for HeadlessSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn frame(&self) -> Rect {
        self.state.borrow().frame
    }

    fn set_frame(&mut self, frame: Rect) {
        self.state.borrow_mut().frame = frame;
        self.record(SurfaceCall::SetFrame(frame));
    }

    fn attach_to(&mut self, parent: ContainerId, index: usize) {
        self.state.borrow_mut().parent = Some((parent, index));
        self.record(SurfaceCall::AttachTo { parent, index });
    }

    fn detach_from_parent(&mut self) {
        self.state.borrow_mut().parent = None;
        self.record(SurfaceCall::Detach);
    }

    fn apply_shadow(&mut self, shadow: &ShadowStyle) {
        self.state.borrow_mut().shadow = Some(*shadow);
        self.record(SurfaceCall::ApplyShadow);
    }

    fn remove_shadow(&mut self) {
        self.state.borrow_mut().shadow = None;
        self.record(SurfaceCall::RemoveShadow);
    }
}
