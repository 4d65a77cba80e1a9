//! Geometry math for canvas interactions.
//!
//! Pure functions: drag translation with grid snapping, corner-handle
//! resizing, and drop-point resolution. They never reject input; results
//! are clamped so `x, y ≥ 0` and `width, height ≥ MIN_SIZE` always hold.

use crate::model::{Canvas, Dimensions, ElementKind, ElementNode, MIN_SIZE, Position, Rect};
use serde::{Deserialize, Serialize};

/// Round `value` to the nearest multiple of `grid`.
pub fn snap(value: f32, grid: f32) -> f32 {
    if grid <= 0.0 {
        return value;
    }
    (value / grid).round() * grid
}

/// Position after dragging by `(dx, dy)` from `origin` (the position at
/// gesture start). Snaps to the canvas grid when enabled; clamping is
/// re-applied after snapping.
pub fn drag_translate(origin: Position, dx: f32, dy: f32, canvas: &Canvas) -> Position {
    let mut x = (origin.x + dx).max(0.0);
    let mut y = (origin.y + dy).max(0.0);
    if canvas.snap_to_grid {
        x = snap(x, canvas.grid_size).max(0.0);
        y = snap(y, canvas.grid_size).max(0.0);
    }
    Position::new(x, y, origin.z)
}

/// Corner resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    Nw,
    Ne,
    Sw,
    Se,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 4] = [
        ResizeHandle::Nw,
        ResizeHandle::Ne,
        ResizeHandle::Sw,
        ResizeHandle::Se,
    ];

    /// Whether dragging this handle moves the left edge.
    fn moves_left(self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::Sw)
    }

    /// Whether dragging this handle moves the top edge.
    fn moves_top(self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::Ne)
    }

    /// The handle's point on `bounds`.
    pub fn anchor(self, bounds: &Rect) -> (f32, f32) {
        let x = if self.moves_left() {
            bounds.x
        } else {
            bounds.x + bounds.width
        };
        let y = if self.moves_top() {
            bounds.y
        } else {
            bounds.y + bounds.height
        };
        (x, y)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "nw" => Some(ResizeHandle::Nw),
            "ne" => Some(ResizeHandle::Ne),
            "sw" => Some(ResizeHandle::Sw),
            "se" => Some(ResizeHandle::Se),
            _ => None,
        }
    }
}

/// Geometry after dragging `handle` by `(dx, dy)` from the gesture-start
/// geometry. The corner opposite the handle stays fixed.
///
/// Size is clamped to `MIN_SIZE` first and the position shift is derived
/// from the clamped size change, so a clamped resize does not drift the
/// fixed corner. A shift that would push the element past the canvas
/// origin is absorbed by shrinking the growth instead.
pub fn resize(
    position: Position,
    dimensions: Dimensions,
    handle: ResizeHandle,
    dx: f32,
    dy: f32,
) -> (Position, Dimensions) {
    let (mut x, mut y) = (position.x, position.y);

    let width = if handle.moves_left() {
        let right = position.x + dimensions.width;
        let w = (dimensions.width - dx).max(MIN_SIZE);
        x = right - w;
        if x < 0.0 {
            x = 0.0;
        }
        // Keep the right edge fixed even after the origin clamp.
        (right - x).max(MIN_SIZE)
    } else {
        (dimensions.width + dx).max(MIN_SIZE)
    };

    let height = if handle.moves_top() {
        let bottom = position.y + dimensions.height;
        let h = (dimensions.height - dy).max(MIN_SIZE);
        y = bottom - h;
        if y < 0.0 {
            y = 0.0;
        }
        (bottom - y).max(MIN_SIZE)
    } else {
        (dimensions.height + dy).max(MIN_SIZE)
    };

    (
        Position::new(x, y, position.z),
        Dimensions::new(width, height),
    )
}

/// The resize handle of `node` within `tolerance` pixels of the point.
pub fn handle_at(node: &ElementNode, px: f32, py: f32, tolerance: f32) -> Option<ResizeHandle> {
    let bounds = node.bounds();
    ResizeHandle::ALL.into_iter().find(|h| {
        let (hx, hy) = h.anchor(&bounds);
        (px - hx).abs() <= tolerance && (py - hy).abs() <= tolerance
    })
}

/// Translate a viewport pointer position into canvas coordinates, given
/// the canvas element's top-left corner in the same viewport space.
pub fn canvas_point(client_x: f32, client_y: f32, canvas_left: f32, canvas_top: f32) -> (f32, f32) {
    (client_x - canvas_left, client_y - canvas_top)
}

/// Top-left position for a new element of `kind` so its visual center
/// lands on the drop point.
pub fn centered_drop_position(kind: ElementKind, px: f32, py: f32, z: i32) -> Position {
    let d = kind.default_dimensions();
    Position::new(px - d.width / 2.0, py - d.height / 2.0, z).clamped()
}
