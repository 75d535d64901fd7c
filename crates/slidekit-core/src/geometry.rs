#![forbid(unsafe_code)]

//! Geometric primitives and the drawer geometry policy.
//!
//! All coordinates are logical points with the origin at the top-left of the
//! container. Only the horizontal axis moves; surfaces always span the full
//! container height.
//!
//! # Invariants
//!
//! 1. [`GeometryPolicy::open_offset`] is never negative.
//! 2. [`GeometryPolicy::drag_follow`] stays within `[0, width]`.
//! 3. A zero, negative or non-finite container width yields `0` offsets and
//!    a threshold that never passes. No function divides by zero.

/// Width and height of a container or surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero, negative or not a number.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// A positioned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// The same rectangle moved horizontally to `x`.
    #[inline]
    #[must_use]
    pub const fn with_x(self, x: f64) -> Self {
        Self { x, ..self }
    }

    /// Size of the rectangle.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Horizontal center.
    #[inline]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

/// Pure offset and threshold computations for a drawer.
///
/// Offsets are horizontal origins of the main surface relative to the
/// container: `0` is closed, [`open_offset`](Self::open_offset) is open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryPolicy {
    /// Width of the strip of main surface left visible when open.
    pub max_auxiliary_inset: f64,
    /// The open threshold is `width / open_threshold_ratio`.
    pub open_threshold_ratio: f64,
}

impl Default for GeometryPolicy {
    fn default() -> Self {
        Self {
            max_auxiliary_inset: 80.0,
            open_threshold_ratio: 3.0,
        }
    }
}

/// Width usable for arithmetic: anything not strictly positive is zero.
#[inline]
fn usable(width: f64) -> f64 {
    if width > 0.0 && width.is_finite() {
        width
    } else {
        0.0
    }
}

impl GeometryPolicy {
    /// Create a policy from an inset and a threshold ratio.
    #[must_use]
    pub const fn new(max_auxiliary_inset: f64, open_threshold_ratio: f64) -> Self {
        Self {
            max_auxiliary_inset,
            open_threshold_ratio,
        }
    }

    /// Main surface offset when the drawer is fully open.
    #[must_use]
    pub fn open_offset(&self, container_width: f64) -> f64 {
        let width = usable(container_width);
        let inset = self.max_auxiliary_inset.max(0.0);
        (width - inset).max(0.0)
    }

    /// Main surface offset when the drawer is closed.
    #[inline]
    #[must_use]
    pub const fn closed_offset(&self) -> f64 {
        0.0
    }

    /// Map a pointer position onto a main surface offset.
    ///
    /// Identity inside the container, clamped to `[0, width]` outside it.
    #[must_use]
    pub fn drag_follow(&self, pointer_x: f64, container_width: f64) -> f64 {
        let width = usable(container_width);
        if pointer_x.is_nan() {
            return 0.0;
        }
        pointer_x.clamp(0.0, width)
    }

    /// Whether a released edge drag commits to opening (inclusive `>=`).
    #[must_use]
    pub fn passed_open_threshold(&self, current_offset_x: f64, container_width: f64) -> bool {
        let width = usable(container_width);
        if width == 0.0 || !(self.open_threshold_ratio > 0.0) {
            return false;
        }
        current_offset_x >= width / self.open_threshold_ratio
    }

    /// Whether a free drag that began at `origin_x` may keep following the
    /// pointer to `offset_x`.
    ///
    /// A drag that began right of the container's vertical centerline snaps
    /// closed once it crosses it. A drag that began at or left of the
    /// centerline (narrow containers) follows until it reaches the closed
    /// offset.
    #[must_use]
    pub fn follows_free_drag(&self, origin_x: f64, offset_x: f64, container_width: f64) -> bool {
        let width = usable(container_width);
        if width == 0.0 {
            return false;
        }
        let center = width / 2.0;
        if origin_x > center {
            offset_x > center
        } else {
            offset_x > self.closed_offset()
        }
    }

    /// Auxiliary surface offset while it is hidden off the leading edge.
    #[must_use]
    pub fn auxiliary_hidden_offset(&self, container_width: f64) -> f64 {
        -usable(container_width)
    }

    /// Auxiliary surface offset while it is revealed.
    #[inline]
    #[must_use]
    pub const fn auxiliary_shown_offset(&self) -> f64 {
        0.0
    }
}
