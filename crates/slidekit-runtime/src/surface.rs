#![forbid(unsafe_code)]

//! Content surfaces and their attachment lifecycle.
//!
//! A [`ContentSurface`] is an opaque handle to a unit of UI owned by the
//! host. The drawer never creates or destroys one; it only attaches it to
//! the container, moves it horizontally, toggles its shadow and detaches it.
//!
//! [`SurfaceLifecycle`] tracks which surfaces are currently children of the
//! container in an [`AttachmentSet`] so both operations are idempotent:
//!
//! - attaching an attached surface is a no-op;
//! - detaching a surface that is not attached is a no-op.
//!
//! # Invariants
//!
//! 1. `AttachmentSet` membership reflects the most recent attach/detach per
//!    surface.
//! 2. Stacking order is bottom-to-top; an attach at index `i` lands at
//!    `min(i, len)`.
//! 3. A newly attached surface is positioned at the container bounds before
//!    the caller moves it.

use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashSet;
use slidekit_core::config::ShadowStyle;
use slidekit_core::geometry::Rect;

static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a content surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(u64);

impl SurfaceId {
    /// Allocate a fresh id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Process-unique identity of a drawer container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(u64);

impl ContainerId {
    /// Allocate a fresh id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// The host-side contract for a unit of drawer content.
pub trait ContentSurface {
    /// Stable identity used for attachment bookkeeping.
    fn id(&self) -> SurfaceId;

    /// Current frame in container coordinates.
    fn frame(&self) -> Rect;

    /// Replace the frame.
    fn set_frame(&mut self, frame: Rect);

    /// Current horizontal offset.
    fn offset_x(&self) -> f64 {
        self.frame().x
    }

    /// Move horizontally, keeping size and vertical position.
    fn set_offset_x(&mut self, x: f64) {
        let frame = self.frame();
        self.set_frame(frame.with_x(x));
    }

    /// Insert into `parent`'s visual tree at stacking `index` (0 = bottom).
    fn attach_to(&mut self, parent: ContainerId, index: usize);

    /// Remove from the parent's visual tree.
    fn detach_from_parent(&mut self);

    /// Draw a drop shadow.
    fn apply_shadow(&mut self, shadow: &ShadowStyle);

    /// Stop drawing the drop shadow.
    fn remove_shadow(&mut self);
}

// ---------------------------------------------------------------------------
// AttachmentSet
// ---------------------------------------------------------------------------

/// Surfaces currently attached to a container, bottom-to-top.
#[derive(Debug, Clone, Default)]
pub struct AttachmentSet {
    order: Vec<SurfaceId>,
    members: AHashSet<SurfaceId>,
}

impl AttachmentSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is attached.
    #[inline]
    pub fn contains(&self, id: SurfaceId) -> bool {
        self.members.contains(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Attached ids, bottom-to-top.
    pub fn iter(&self) -> impl Iterator<Item = SurfaceId> + '_ {
        self.order.iter().copied()
    }

    /// Stacking index of `id`, if attached.
    pub fn index_of(&self, id: SurfaceId) -> Option<usize> {
        self.order.iter().position(|&member| member == id)
    }

    /// Insert at `index` (clamped). Returns the actual index, or `None` if
    /// already present.
    fn insert(&mut self, id: SurfaceId, index: usize) -> Option<usize> {
        if !self.members.insert(id) {
            return None;
        }
        let index = index.min(self.order.len());
        self.order.insert(index, id);
        Some(index)
    }

    /// Remove `id`. Returns whether it was present.
    fn remove(&mut self, id: SurfaceId) -> bool {
        if !self.members.remove(&id) {
            return false;
        }
        self.order.retain(|&member| member != id);
        true
    }
}

// ---------------------------------------------------------------------------
// SurfaceLifecycle
// ---------------------------------------------------------------------------

/// Attach/detach bookkeeping for one container.
#[derive(Debug, Clone)]
pub struct SurfaceLifecycle {
    container: ContainerId,
    bounds: Rect,
    attached: AttachmentSet,
}

impl SurfaceLifecycle {
    /// Create the lifecycle for a container with the given bounds.
    #[must_use]
    pub fn new(container: ContainerId, bounds: Rect) -> Self {
        Self {
            container,
            bounds,
            attached: AttachmentSet::new(),
        }
    }

    #[inline]
    pub fn container(&self) -> ContainerId {
        self.container
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Update the container bounds used for future attaches.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    #[inline]
    pub fn attachments(&self) -> &AttachmentSet {
        &self.attached
    }

    #[inline]
    pub fn is_attached(&self, id: SurfaceId) -> bool {
        self.attached.contains(id)
    }

    /// Attach `surface` at stacking `index`, positioned at the container
    /// bounds. Returns `false` if it was already attached.
    pub fn attach<S: ContentSurface + ?Sized>(&mut self, surface: &mut S, index: usize) -> bool {
        let Some(index) = self.attached.insert(surface.id(), index) else {
            return false;
        };
        surface.set_frame(self.bounds);
        surface.attach_to(self.container, index);
        true
    }

    /// Detach `surface`. Returns `false` if it was not attached.
    pub fn detach<S: ContentSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if !self.attached.remove(surface.id()) {
            return false;
        }
        surface.detach_from_parent();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessSurface;
    use slidekit_core::geometry::{Rect, Size};

    fn lifecycle() -> SurfaceLifecycle {
        SurfaceLifecycle::new(
            ContainerId::next(),
            Rect::from_size(Size::new(300.0, 600.0)),
        )
    }

    #[test]
    fn attach_is_idempotent() {
        let mut life = lifecycle();
        let mut surface = HeadlessSurface::new();

        assert!(life.attach(&mut surface, 0));
        assert!(!life.attach(&mut surface, 0));
        assert_eq!(life.attachments().len(), 1);
        assert_eq!(surface.attach_calls(), 1);
    }

    #[test]
    fn detach_is_idempotent() {
        let mut life = lifecycle();
        let mut surface = HeadlessSurface::new();

        assert!(!life.detach(&mut surface));
        assert_eq!(surface.detach_calls(), 0);

        life.attach(&mut surface, 0);
        assert!(life.detach(&mut surface));
        assert!(!life.detach(&mut surface));
        assert!(!life.is_attached(surface.id()));
        assert_eq!(surface.detach_calls(), 1);
    }

    #[test]
    fn attach_positions_at_bounds() {
        let mut life = lifecycle();
        let mut surface = HeadlessSurface::new();
        surface.set_frame(Rect::new(42.0, 7.0, 10.0, 10.0));

        life.attach(&mut surface, 0);
        assert_eq!(surface.frame(), Rect::new(0.0, 0.0, 300.0, 600.0));
        assert_eq!(surface.parent(), Some((life.container(), 0)));
    }

    #[test]
    fn stacking_index_is_clamped_and_ordered() {
        let mut life = lifecycle();
        let mut main = HeadlessSurface::new();
        let mut aux = HeadlessSurface::new();
        let mut incoming = HeadlessSurface::new();

        life.attach(&mut main, 0);
        life.attach(&mut aux, 0);
        life.attach(&mut incoming, 9);

        let order: Vec<_> = life.attachments().iter().collect();
        assert_eq!(order, vec![aux.id(), main.id(), incoming.id()]);
        assert_eq!(incoming.parent().map(|(_, index)| index), Some(2));
        assert_eq!(life.attachments().index_of(main.id()), Some(1));
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(SurfaceId::next(), SurfaceId::next());
        assert_ne!(ContainerId::next(), ContainerId::next());
    }
}
