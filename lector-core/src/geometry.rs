use serde::{Deserialize, Serialize};

/// Bounding box of a rendered node, in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Any-edge-out test: true when the rect is fully past any single
    /// viewport edge. A rect that is merely clipped is still "in view".
    pub fn is_outside(&self, viewport: &Viewport) -> bool {
        self.bottom < 0.0
            || self.top > viewport.height
            || self.right < 0.0
            || self.left > viewport.width
    }
}

/// Visible page area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A requested page scroll position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollTarget {
    /// Document-space vertical offset to scroll to (never negative)
    pub top: f64,
    /// Smooth scrolling requested
    pub smooth: bool,
}

/// Compute the scroll needed to keep a highlighted line visible.
///
/// `rect` is the line's bounding box in viewport coordinates and
/// `offset_top` its document-space top. Returns `None` when the line is
/// already (at least partially) in view; otherwise a smooth scroll
/// target that vertically centers the line, clamped to the top of the
/// document.
pub fn autoscroll_target(rect: &Rect, offset_top: f64, viewport: &Viewport) -> Option<ScrollTarget> {
    if !rect.is_outside(viewport) {
        return None;
    }

    let top = offset_top - viewport.height / 2.0 + rect.height() / 2.0;
    Some(ScrollTarget {
        top: top.max(0.0),
        smooth: true,
    })
}
